// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Success events for accepted pingbacks.

use crate::models::{PingRequest, SuccessEvent};

/// Build the event handed to the persistence collaborator.
pub fn notify(request: PingRequest) -> SuccessEvent {
    SuccessEvent {
        domain: extract_domain(&request.source_url),
        request,
    }
}

/// Host part of a URL as stored with a pingback.
///
/// Takes everything after the first `://` up to the next `/` and drops a
/// leading `www.`. Input without a scheme is read from the start, so the
/// function is idempotent on its own output.
pub fn extract_domain(url: &str) -> String {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let host = rest.split('/').next().unwrap_or(rest);
    host.strip_prefix("www.").unwrap_or(host).to_string()
}
