// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Storage collaborator for pingbacks.
//!
//! The pipeline only reads through `target_exists` and `already_pinged`;
//! `record` is called by the event consumer after a successful ping.

use crate::error::StoreError;
use crate::models::SuccessEvent;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::RwLock;
use tracing::info;

/// Lookups and persistence backing the classifier.
pub trait PingbackStore: Send + Sync {
    /// Whether `target_url` is a resource on this site.
    fn target_exists(&self, target_url: &str) -> Result<bool, StoreError>;

    /// Whether a pingback from `source_url` to `target_url` is already stored.
    fn already_pinged(&self, source_url: &str, target_url: &str) -> Result<bool, StoreError>;

    /// Persist an accepted pingback.
    fn record(&self, event: SuccessEvent) -> Result<(), StoreError>;
}

/// A stored pingback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PingbackRecord {
    pub source_url: String,
    pub target_url: String,
    pub domain: String,
    pub title: String,
    pub remote_ip: String,
    pub received_at: DateTime<Utc>,
}

impl From<SuccessEvent> for PingbackRecord {
    fn from(event: SuccessEvent) -> Self {
        Self {
            source_url: event.request.source_url,
            target_url: event.request.target_url,
            domain: event.domain,
            title: event.request.title,
            remote_ip: event.request.remote_ip,
            received_at: Utc::now(),
        }
    }
}

/// In-process store keyed by normalised target URL.
#[derive(Debug, Default)]
pub struct MemoryStore {
    targets: RwLock<HashSet<String>>,
    records: RwLock<Vec<PingbackRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that accepts pingbacks for the given targets.
    pub fn with_targets<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let targets = targets
            .into_iter()
            .map(|t| normalize_target(t.as_ref()))
            .filter(|t| !t.is_empty())
            .collect();

        Self {
            targets: RwLock::new(targets),
            records: RwLock::new(Vec::new()),
        }
    }

    /// Register another pingback target.
    pub fn add_target(&self, target_url: &str) -> Result<(), StoreError> {
        let mut targets = self.targets.write().map_err(|_| StoreError::Poisoned)?;
        targets.insert(normalize_target(target_url));
        Ok(())
    }

    /// Snapshot of stored pingbacks, oldest first.
    pub fn records(&self) -> Result<Vec<PingbackRecord>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.clone())
    }
}

impl PingbackStore for MemoryStore {
    fn target_exists(&self, target_url: &str) -> Result<bool, StoreError> {
        let targets = self.targets.read().map_err(|_| StoreError::Poisoned)?;
        Ok(targets.contains(&normalize_target(target_url)))
    }

    fn already_pinged(&self, source_url: &str, target_url: &str) -> Result<bool, StoreError> {
        let target = normalize_target(target_url);
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records
            .iter()
            .any(|r| r.source_url == source_url && normalize_target(&r.target_url) == target))
    }

    fn record(&self, event: SuccessEvent) -> Result<(), StoreError> {
        let record = PingbackRecord::from(event);
        info!(
            source = %record.source_url,
            target = %record.target_url,
            domain = %record.domain,
            "Pingback recorded"
        );
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        records.push(record);
        Ok(())
    }
}

/// Normalise a target URL for lookup (trimmed, no trailing slash).
fn normalize_target(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
