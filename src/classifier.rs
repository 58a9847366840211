// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Pingback response classification.
//!
//! Decision order (first match wins):
//! 1. no request            -> `InvalidRequest`
//! 2. target does not exist -> `TargetNotFound` (fault 32)
//! 3. already pinged        -> `AlreadyRegistered` (fault 48)
//! 4. backlink, plain title -> `Success`
//! 5. no backlink           -> `SourceMissingBacklink` (fault 17)
//! 6. backlink, markup      -> `SpamSuppressed`
//!
//! The two lookups are evaluated lazily in that order, so the duplicate
//! check never runs for a missing target.

use crate::error::StoreError;
use crate::models::{PingOutcome, PingRequest, SuccessEvent};
use crate::notifier;
use tracing::{debug, warn};

/// Outcome of a classification plus the event to dispatch on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub outcome: PingOutcome,
    /// Present exactly when `outcome` is `Success`.
    pub event: Option<SuccessEvent>,
}

impl Classification {
    fn outcome(outcome: PingOutcome) -> Self {
        Self {
            outcome,
            event: None,
        }
    }

    fn success(event: SuccessEvent) -> Self {
        Self {
            outcome: PingOutcome::Success,
            event: Some(event),
        }
    }
}

/// Classify an examined request.
///
/// A lookup that fails yields `InternalError`; no error escapes.
pub fn classify<T, D>(
    request: Option<PingRequest>,
    target_exists: T,
    already_pinged: D,
) -> Classification
where
    T: FnOnce() -> Result<bool, StoreError>,
    D: FnOnce() -> Result<bool, StoreError>,
{
    let Some(request) = request else {
        debug!("No request to classify");
        return Classification::outcome(PingOutcome::InvalidRequest);
    };

    match target_exists() {
        Ok(true) => {}
        Ok(false) => {
            debug!(target = %request.target_url, "Pingback target not found");
            return Classification::outcome(PingOutcome::TargetNotFound);
        }
        Err(err) => {
            warn!(target = %request.target_url, error = %err, "Target lookup failed");
            return Classification::outcome(PingOutcome::InternalError);
        }
    }

    match already_pinged() {
        Ok(false) => {}
        Ok(true) => {
            debug!(
                source = %request.source_url,
                target = %request.target_url,
                "Pingback already registered"
            );
            return Classification::outcome(PingOutcome::AlreadyRegistered);
        }
        Err(err) => {
            warn!(source = %request.source_url, error = %err, "Duplicate lookup failed");
            return Classification::outcome(PingOutcome::InternalError);
        }
    }

    match (request.has_backlink, request.contains_markup) {
        (true, false) => Classification::success(notifier::notify(request)),
        (false, _) => Classification::outcome(PingOutcome::SourceMissingBacklink),
        (true, true) => {
            // Title is markup; answer like "not found" so the sender learns nothing
            warn!(
                source = %request.source_url,
                remote_ip = %request.remote_ip,
                "Suspected spam pingback suppressed"
            );
            Classification::outcome(PingOutcome::SpamSuppressed)
        }
    }
}
