// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Background extraction jobs.
//
// The pipeline blocks on decoding and on the OCR subprocess, so each job runs
// on tokio's blocking pool. Progress values stream over an unbounded channel;
// the terminal outcome arrives on a oneshot once the progress channel closes.
// Must be called from inside a tokio runtime.

use std::sync::Arc;

use ready_core::error::ReadyError;
use ready_core::human_errors::extraction_failure_message;
use ready_core::{ExtractionOutcome, ExtractionRequest, JobId};
use tokio::sync::{mpsc, oneshot};
use tracing::{Instrument, error, info, info_span};

use crate::pipeline::ExtractionPipeline;

/// Something that happened on a running job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// Percentage checkpoint, see [`ready_core::progress`].
    Progress(u8),
    /// Terminal outcome. Always the last event.
    Finished(ExtractionOutcome),
}

/// Receiving side of a spawned job.
pub struct ExtractionHandle {
    id: JobId,
    progress: mpsc::UnboundedReceiver<u8>,
    result: Option<oneshot::Receiver<ExtractionOutcome>>,
}

impl ExtractionHandle {
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Next event, or `None` once [`WorkerEvent::Finished`] has been returned.
    ///
    /// All progress values are delivered before the outcome.
    pub async fn next_event(&mut self) -> Option<WorkerEvent> {
        if let Some(value) = self.progress.recv().await {
            return Some(WorkerEvent::Progress(value));
        }
        let result = self.result.take()?;
        let outcome = result.await.unwrap_or_else(|_| {
            let err = ReadyError::Worker("job ended without reporting a result".into());
            ExtractionOutcome::failed(extraction_failure_message(&err))
        });
        Some(WorkerEvent::Finished(outcome))
    }

    /// Drain progress and return the outcome.
    pub async fn wait(mut self) -> ExtractionOutcome {
        loop {
            match self.next_event().await {
                Some(WorkerEvent::Progress(_)) => continue,
                Some(WorkerEvent::Finished(outcome)) => return outcome,
                None => {
                    let err = ReadyError::Worker("job result already consumed".into());
                    return ExtractionOutcome::failed(extraction_failure_message(&err));
                }
            }
        }
    }
}

/// Start `request` on the blocking pool and return immediately.
///
/// A panic inside the pipeline is reported as a failed outcome rather than
/// tearing down the caller.
pub fn spawn_extraction(
    pipeline: Arc<ExtractionPipeline>,
    request: ExtractionRequest,
) -> ExtractionHandle {
    let id = JobId::new();
    let (progress_tx, progress_rx) = mpsc::unbounded_channel();
    let (result_tx, result_rx) = oneshot::channel();
    let span = info_span!("extraction_job", job_id = %id);

    let blocking_span = span.clone();
    tokio::spawn(
        async move {
            info!("Extraction job queued");
            let job = tokio::task::spawn_blocking(move || {
                let _guard = blocking_span.enter();
                pipeline.run(&request, |value| {
                    // Receiver may already be gone if the UI dropped the handle.
                    let _ = progress_tx.send(value);
                })
            });

            let outcome = match job.await {
                Ok(outcome) => outcome,
                Err(join_err) => {
                    let detail = if join_err.is_panic() {
                        "extraction worker panicked".to_string()
                    } else {
                        format!("extraction worker was cancelled: {join_err}")
                    };
                    error!(%detail, "Extraction job aborted");
                    ExtractionOutcome::failed(extraction_failure_message(&ReadyError::Worker(
                        detail,
                    )))
                }
            };

            info!(
                completed_at = %outcome.completed_at.to_rfc3339(),
                failed = outcome.is_failure(),
                "Extraction job finished"
            );
            if result_tx.send(outcome).is_err() {
                info!("Extraction finished after its handle was dropped");
            }
        }
        .instrument(span),
    );

    ExtractionHandle {
        id,
        progress: progress_rx,
        result: Some(result_rx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::Preprocessor;
    use crate::test_support::{ScriptedEngine, page_fixture};
    use ready_core::{Adjustments, Language, OutcomeKind};

    fn shared(engine: ScriptedEngine) -> Arc<ExtractionPipeline> {
        Arc::new(ExtractionPipeline::new(Arc::new(engine), Preprocessor::default()))
    }

    #[tokio::test]
    async fn progress_precedes_outcome() {
        let (_dir, path) = page_fixture();
        let pipeline = shared(ScriptedEngine::texts(&["Hello"]));
        let request = ExtractionRequest::new(&path, Language::English, true, Adjustments::default());

        let mut handle = spawn_extraction(pipeline, request);
        let mut events = Vec::new();
        while let Some(event) = handle.next_event().await {
            events.push(event);
        }

        let progress: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                WorkerEvent::Progress(p) => Some(*p),
                WorkerEvent::Finished(_) => None,
            })
            .collect();
        assert_eq!(progress, vec![10, 30, 60, 90, 100]);
        match events.last() {
            Some(WorkerEvent::Finished(outcome)) => {
                assert_eq!(outcome.kind, OutcomeKind::Text("Hello".into()))
            }
            other => panic!("expected terminal outcome, got {other:?}"),
        }
        assert!(handle.next_event().await.is_none());
    }

    #[tokio::test]
    async fn panicking_engine_becomes_failed_outcome() {
        let (_dir, path) = page_fixture();
        let pipeline = shared(ScriptedEngine::panicking());
        let request = ExtractionRequest::new(&path, Language::French, false, Adjustments::default());

        let outcome = spawn_extraction(pipeline, request).wait().await;

        match outcome.kind {
            OutcomeKind::Failed(message) => {
                assert!(message.contains("extraction worker panicked"));
                assert!(message.starts_with("Error while extracting text: "));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_file_reports_failure() {
        let pipeline = shared(ScriptedEngine::texts(&["x"]));
        let request = ExtractionRequest::new(
            "/nonexistent/ready/scan.png",
            Language::French,
            true,
            Adjustments::default(),
        );

        let outcome = spawn_extraction(pipeline, request).wait().await;
        assert!(outcome.is_failure());
    }

    #[tokio::test]
    async fn jobs_get_distinct_ids() {
        let (_dir, path) = page_fixture();
        let pipeline = shared(ScriptedEngine::texts(&["a", "b"]));
        let req = ExtractionRequest::new(&path, Language::French, false, Adjustments::default());

        let first = spawn_extraction(pipeline.clone(), req.clone());
        let second = spawn_extraction(pipeline, req);
        assert_ne!(first.id(), second.id());
        first.wait().await;
        second.wait().await;
    }
}
