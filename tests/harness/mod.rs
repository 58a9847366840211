// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for pingback receiver flows.
//!
//! Provides payload generators and mock source sites so tests can drive
//! the full validate -> examine -> classify pipeline.

#![allow(dead_code)]

pub mod generators;
pub mod sources;

use pingback_receiver::{
    config::FetchConfig, examiner::SourceExaminer, models::SuccessEvent,
    service::PingbackService, store::MemoryStore,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// A service wired to an in-memory store and an observable event channel.
pub struct Pipeline {
    pub service: PingbackService,
    pub store: Arc<MemoryStore>,
    pub events: mpsc::UnboundedReceiver<SuccessEvent>,
}

/// Build a pipeline accepting pingbacks for `targets`.
pub fn pipeline(targets: &[&str], timeout_secs: u64) -> Pipeline {
    pipeline_with(
        targets,
        FetchConfig {
            timeout_secs,
            ..Default::default()
        },
    )
}

/// Build a pipeline whose examiner uses `fetch`.
pub fn pipeline_with(targets: &[&str], fetch: FetchConfig) -> Pipeline {
    let store = Arc::new(MemoryStore::with_targets(targets));
    let (tx, rx) = mpsc::unbounded_channel();
    let examiner = SourceExaminer::new(&fetch).expect("examiner");

    Pipeline {
        service: PingbackService::new(examiner, store.clone(), tx),
        store,
        events: rx,
    }
}

impl Pipeline {
    /// Drain every event emitted so far.
    pub fn drain_events(&mut self) -> Vec<SuccessEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}
