// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Source document verification.
//!
//! Fetches the claimed source of a pingback and checks that it really
//! mentions the target. Any fetch failure (DNS, refused connection,
//! timeout, non-2xx status) is reported as "no backlink" rather than an
//! error. Only the first `max_source_bytes` of a document are read.

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::models::{ParsedPing, PingRequest, SourceDocumentInfo};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));

static MARKUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?[A-Za-z][A-Za-z0-9]*(\s[^<>]*)?/?>").expect("valid markup regex")
});

/// Fetches and inspects pingback source documents.
#[derive(Debug, Clone)]
pub struct SourceExaminer {
    client: reqwest::Client,
    timeout: Duration,
    max_source_bytes: usize,
}

impl SourceExaminer {
    /// Create an examiner with its own HTTP client.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout(),
            max_source_bytes: config.max_source_bytes,
        })
    }

    /// Fetch `ping.source_url` and build the request for classification.
    ///
    /// Never fails: an unreachable source yields an empty title and no
    /// backlink.
    pub async fn examine(&self, ping: ParsedPing) -> PingRequest {
        let info = match self.fetch(&ping.source_url).await {
            Ok(body) => inspect_document(&body, &ping.target_url),
            Err(err) => {
                info!(
                    source = %ping.source_url,
                    error = %err,
                    "Source fetch failed, treating as no backlink"
                );
                SourceDocumentInfo::unreachable()
            }
        };

        debug!(
            source = %ping.source_url,
            target = %ping.target_url,
            has_backlink = info.has_backlink,
            contains_markup = info.contains_markup,
            "Source examined"
        );

        PingRequest::new(ping, info)
    }

    async fn fetch(&self, source_url: &str) -> Result<String, FetchError> {
        let url = Url::parse(source_url)
            .map_err(|_| FetchError::UnsupportedUrl(source_url.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(FetchError::UnsupportedUrl(source_url.to_string()));
        }

        let mut response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let room = self.max_source_bytes - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                debug!(
                    source = %source_url,
                    limit = self.max_source_bytes,
                    "Source document truncated"
                );
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Extract the title and backlink signals from a fetched document.
pub fn inspect_document(body: &str, target_url: &str) -> SourceDocumentInfo {
    let title = extract_title(body);
    let contains_markup = MARKUP_RE.is_match(&title);
    let has_backlink =
        !target_url.is_empty() && body.to_lowercase().contains(&target_url.to_lowercase());

    SourceDocumentInfo {
        title,
        contains_markup,
        has_backlink,
    }
}

/// Text of the first `<title>` element, trimmed; empty if there is none.
pub fn extract_title(body: &str) -> String {
    TITLE_RE
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}
