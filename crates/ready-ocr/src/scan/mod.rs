// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan preparation: turning photos and scans into OCR-ready binary images.

pub mod preprocess;

pub use preprocess::{PreprocessOptions, Preprocessor};
