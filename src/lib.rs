// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Pingback Receiver
//!
//! This crate implements the receiving side of the XML-RPC Pingback 1.0
//! protocol:
//!
//! - `pingback.ping` payload validation
//! - Source document fetch with a bounded timeout
//! - Backlink verification and markup-title spam heuristic
//! - Fault classification (17, 32, 48) with spam camouflage
//! - Success events for a persistence collaborator

pub mod classifier;
pub mod config;
pub mod error;
pub mod examiner;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod notifier;
pub mod payload;
pub mod service;
pub mod store;
pub mod xmlrpc;

pub use classifier::{classify, Classification};
pub use config::Config;
pub use examiner::SourceExaminer;
pub use models::{ParsedPing, PingOutcome, PingRequest, SourceDocumentInfo, SuccessEvent};
pub use notifier::{extract_domain, notify};
pub use payload::{PayloadValidator, ValidationOutcome};
pub use service::{PingbackResult, PingbackService};
pub use store::{MemoryStore, PingbackStore};
