// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Value types threaded through the pingback pipeline.
//!
//! Every stage takes its input by value and returns a new value; nothing is
//! stored on the stage objects between calls.

use serde::Serialize;

/// Source and target extracted from a valid `pingback.ping` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedPing {
    pub source_url: String,
    pub target_url: String,
    pub remote_ip: String,
}

/// What was learned by fetching the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceDocumentInfo {
    /// Text of the first `<title>` element, trimmed. Empty when unavailable.
    pub title: String,
    /// The title text itself looks like HTML markup.
    pub contains_markup: bool,
    /// The body mentions the target URL (case-insensitive).
    pub has_backlink: bool,
}

impl SourceDocumentInfo {
    /// Document info used when the source could not be fetched.
    pub fn unreachable() -> Self {
        Self::default()
    }
}

/// A validated ping together with its examined source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PingRequest {
    pub source_url: String,
    pub target_url: String,
    pub remote_ip: String,
    pub title: String,
    pub contains_markup: bool,
    pub has_backlink: bool,
}

impl PingRequest {
    pub fn new(ping: ParsedPing, info: SourceDocumentInfo) -> Self {
        Self {
            source_url: ping.source_url,
            target_url: ping.target_url,
            remote_ip: ping.remote_ip,
            title: info.title,
            contains_markup: info.contains_markup,
            has_backlink: info.has_backlink,
        }
    }
}

/// Final classification of a pingback request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PingOutcome {
    InvalidRequest,
    /// Fault 32
    TargetNotFound,
    /// Fault 48
    AlreadyRegistered,
    Success,
    /// Fault 17
    SourceMissingBacklink,
    /// Backlink found but the source looks spoofed. Reported to the caller
    /// as "not found".
    SpamSuppressed,
    InternalError,
}

impl PingOutcome {
    /// Pingback fault code for outcomes that have one.
    pub fn fault_code(&self) -> Option<i32> {
        match self {
            Self::SourceMissingBacklink => Some(17),
            Self::TargetNotFound => Some(32),
            Self::AlreadyRegistered => Some(48),
            _ => None,
        }
    }

    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::TargetNotFound => "target_not_found",
            Self::AlreadyRegistered => "already_registered",
            Self::Success => "success",
            Self::SourceMissingBacklink => "source_missing_backlink",
            Self::SpamSuppressed => "spam_suppressed",
            Self::InternalError => "internal_error",
        }
    }
}

impl std::fmt::Display for PingOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emitted once per accepted pingback for the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessEvent {
    pub domain: String,
    pub request: PingRequest,
}
