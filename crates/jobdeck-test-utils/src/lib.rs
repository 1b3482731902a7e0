// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for jobdeck integration tests.
//!
//! Provides:
//! - [`MockSource`]: scripted job board adapter (candidates, failures, delays)
//! - [`TestHarness`]: `JobService` over a temp SQLite store
//! - [`candidate`]: a dated, remote candidate for quick fixtures

pub mod harness;
pub mod mock_source;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_source::{MockSource, candidate};
