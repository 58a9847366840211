// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! XML-RPC responses for pingback results.
//!
//! Pingback outcomes map to the fault codes of the Pingback 1.0
//! specification; payload problems map to the XML-RPC interoperability
//! codes. Suppressed spam is answered with a bare 404 so it cannot be
//! told apart from an unknown endpoint.

use crate::models::PingOutcome;
use crate::payload::ValidationOutcome;
use crate::service::PingbackResult;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// Generic pingback fault.
pub const FAULT_GENERIC: i32 = 0;
/// XML-RPC: parse error, not well formed.
pub const FAULT_PARSE_ERROR: i32 = -32700;
/// XML-RPC: requested method not found.
pub const FAULT_METHOD_NOT_FOUND: i32 = -32601;
/// XML-RPC: invalid method parameters.
pub const FAULT_INVALID_PARAMS: i32 = -32602;

/// Wire response for a processed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlRpcResponse {
    Success(String),
    Fault { code: i32, message: &'static str },
    NotFound,
}

impl From<&PingbackResult> for XmlRpcResponse {
    fn from(result: &PingbackResult) -> Self {
        match result {
            PingbackResult::Rejected(validation) => match validation {
                ValidationOutcome::MethodNotFound => XmlRpcResponse::Fault {
                    code: FAULT_METHOD_NOT_FOUND,
                    message: "server error. requested method not found",
                },
                ValidationOutcome::ParseError => XmlRpcResponse::Fault {
                    code: FAULT_PARSE_ERROR,
                    message: "parse error. not well formed",
                },
                ValidationOutcome::UrlMissing | ValidationOutcome::Valid(_) => {
                    XmlRpcResponse::Fault {
                        code: FAULT_INVALID_PARAMS,
                        message: "server error. invalid method parameters",
                    }
                }
            },
            PingbackResult::Classified {
                outcome,
                source_url,
                target_url,
            } => match outcome {
                PingOutcome::Success => XmlRpcResponse::Success(format!(
                    "Thanks! Pingback from {source_url} to {target_url} registered."
                )),
                PingOutcome::SourceMissingBacklink => XmlRpcResponse::Fault {
                    code: 17,
                    message: "The source URI does not contain a link to the target URI.",
                },
                PingOutcome::TargetNotFound => XmlRpcResponse::Fault {
                    code: 32,
                    message: "The specified target URI does not exist.",
                },
                PingOutcome::AlreadyRegistered => XmlRpcResponse::Fault {
                    code: 48,
                    message: "The pingback has already been registered.",
                },
                PingOutcome::SpamSuppressed => XmlRpcResponse::NotFound,
                PingOutcome::InvalidRequest | PingOutcome::InternalError => {
                    XmlRpcResponse::Fault {
                        code: FAULT_GENERIC,
                        message: "The pingback could not be processed.",
                    }
                }
            },
        }
    }
}

impl XmlRpcResponse {
    /// Serialized `methodResponse`, or `None` for a bare 404.
    pub fn body(&self) -> Option<String> {
        match self {
            XmlRpcResponse::Success(message) => Some(success_body(message)),
            XmlRpcResponse::Fault { code, message } => Some(fault_body(*code, message)),
            XmlRpcResponse::NotFound => None,
        }
    }
}

impl IntoResponse for XmlRpcResponse {
    fn into_response(self) -> Response {
        match self.body() {
            Some(body) => {
                (StatusCode::OK, [(header::CONTENT_TYPE, "text/xml")], body).into_response()
            }
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

/// `methodResponse` carrying a single string parameter.
pub fn success_body(message: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<methodResponse><params><param><value><string>{}</string></value></param></params></methodResponse>",
        escape(message)
    )
}

/// `methodResponse` carrying a fault struct.
pub fn fault_body(code: i32, message: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<methodResponse><fault><value><struct>\
         <member><name>faultCode</name><value><int>{}</int></value></member>\
         <member><name>faultString</name><value><string>{}</string></value></member>\
         </struct></value></fault></methodResponse>",
        code,
        escape(message)
    )
}

/// Escape text for an XML element body.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
