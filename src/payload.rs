// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! XML-RPC pingback payload validator.
//!
//! Checks, in order:
//! - body and remote address are present
//! - the body names the `pingback.ping` method
//! - the body parses and carries source and target parameters

use crate::models::ParsedPing;
use tracing::debug;

/// Literal marker every pingback call must contain.
pub const PINGBACK_METHOD_MARKER: &str = "<methodName>pingback.ping</methodName>";

/// Result of payload validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Body is not a `pingback.ping` call
    MethodNotFound,
    /// Fewer than two non-empty parameters
    UrlMissing,
    /// Payload is a well-formed pingback call
    Valid(ParsedPing),
    /// Empty input or malformed XML
    ParseError,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }

    pub fn ping(&self) -> Option<&ParsedPing> {
        match self {
            ValidationOutcome::Valid(ping) => Some(ping),
            _ => None,
        }
    }

    pub fn into_ping(self) -> Option<ParsedPing> {
        match self {
            ValidationOutcome::Valid(ping) => Some(ping),
            _ => None,
        }
    }

    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationOutcome::MethodNotFound => "method_not_found",
            ValidationOutcome::UrlMissing => "url_missing",
            ValidationOutcome::Valid(_) => "valid",
            ValidationOutcome::ParseError => "parse_error",
        }
    }
}

/// Stateless validator for inbound `pingback.ping` bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadValidator;

impl PayloadValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a raw request body received from `remote_ip`.
    pub fn validate(&self, raw_body: &str, remote_ip: &str) -> ValidationOutcome {
        if raw_body.trim().is_empty() || remote_ip.trim().is_empty() {
            debug!("Empty body or remote address");
            return ValidationOutcome::ParseError;
        }

        // Cheap rejection before paying for a full parse
        if !raw_body.contains(PINGBACK_METHOD_MARKER) {
            debug!(remote_ip = %remote_ip, "Body is not a pingback.ping call");
            return ValidationOutcome::MethodNotFound;
        }

        let doc = match roxmltree::Document::parse(raw_body) {
            Ok(doc) => doc,
            Err(err) => {
                debug!(remote_ip = %remote_ip, error = %err, "Malformed XML-RPC payload");
                return ValidationOutcome::ParseError;
            }
        };

        let params = param_values(&doc);
        let (source, target) = match params.as_slice() {
            [source, target, ..] => (source.trim(), target.trim()),
            _ => {
                debug!(found = params.len(), "Pingback call missing parameters");
                return ValidationOutcome::UrlMissing;
            }
        };

        if source.is_empty() || target.is_empty() {
            debug!("Pingback call has an empty source or target");
            return ValidationOutcome::UrlMissing;
        }

        debug!(source = %source, target = %target, "Pingback payload valid");
        ValidationOutcome::Valid(ParsedPing {
            source_url: source.to_string(),
            target_url: target.to_string(),
            remote_ip: remote_ip.trim().to_string(),
        })
    }
}

/// Text of the first two `methodCall/params/param/value` nodes.
///
/// A value may hold its text directly or inside a type element such as
/// `<string>`; both read the same.
fn param_values(doc: &roxmltree::Document) -> Vec<String> {
    let root = doc.root_element();
    if !root.has_tag_name("methodCall") {
        return Vec::new();
    }

    let Some(params) = root.children().find(|n| n.has_tag_name("params")) else {
        return Vec::new();
    };

    params
        .children()
        .filter(|n| n.has_tag_name("param"))
        .filter_map(|param| param.children().find(|n| n.has_tag_name("value")))
        .map(|value| {
            value
                .descendants()
                .filter(|n| n.is_text())
                .filter_map(|n| n.text())
                .collect::<String>()
        })
        .take(2)
        .collect()
}
