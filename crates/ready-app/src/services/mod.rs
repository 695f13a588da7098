// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer: bridges the Dioxus UI to the ready backend crates and to the
// desktop (dialogs, clipboard).

pub mod app_services;
pub mod desktop;
