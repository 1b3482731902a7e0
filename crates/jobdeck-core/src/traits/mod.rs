// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod source;
pub mod store;

pub use adapter::PluginAdapter;
pub use source::{CandidateStream, SourceAdapter};
pub use store::PostingStore;
