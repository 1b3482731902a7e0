// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for posting storage.

pub mod postings;
pub mod reconcile;
