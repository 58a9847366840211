// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! End-to-end pingback processing.
//!
//! validate -> examine -> classify, with each stage able to end the flow.
//! Accepted pingbacks are sent as `SuccessEvent`s over a channel; the
//! result returned to the caller never depends on whether they persist.

use crate::classifier::classify;
use crate::examiner::SourceExaminer;
use crate::models::{PingOutcome, SuccessEvent};
use crate::payload::{PayloadValidator, ValidationOutcome};
use crate::store::PingbackStore;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Terminal result of processing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingbackResult {
    /// Payload failed validation; nothing was fetched.
    Rejected(ValidationOutcome),
    /// Payload was valid and the source was examined.
    Classified {
        outcome: PingOutcome,
        source_url: String,
        target_url: String,
    },
}

impl PingbackResult {
    /// Stable label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            PingbackResult::Rejected(validation) => validation.as_str(),
            PingbackResult::Classified { outcome, .. } => outcome.as_str(),
        }
    }

    pub fn outcome(&self) -> Option<PingOutcome> {
        match self {
            PingbackResult::Rejected(_) => None,
            PingbackResult::Classified { outcome, .. } => Some(*outcome),
        }
    }
}

/// Runs the pingback pipeline for independent requests.
pub struct PingbackService {
    validator: PayloadValidator,
    examiner: SourceExaminer,
    store: Arc<dyn PingbackStore>,
    events: mpsc::UnboundedSender<SuccessEvent>,
}

impl PingbackService {
    pub fn new(
        examiner: SourceExaminer,
        store: Arc<dyn PingbackStore>,
        events: mpsc::UnboundedSender<SuccessEvent>,
    ) -> Self {
        Self {
            validator: PayloadValidator::new(),
            examiner,
            store,
            events,
        }
    }

    /// Process one raw XML-RPC body received from `remote_ip`.
    pub async fn process(&self, raw_body: &str, remote_ip: &str) -> PingbackResult {
        let ping = match self.validator.validate(raw_body, remote_ip) {
            ValidationOutcome::Valid(ping) => ping,
            rejected => {
                info!(
                    remote_ip = %remote_ip,
                    result = rejected.as_str(),
                    "Pingback payload rejected"
                );
                return PingbackResult::Rejected(rejected);
            }
        };

        let source_url = ping.source_url.clone();
        let target_url = ping.target_url.clone();

        let request = self.examiner.examine(ping).await;

        let store = &self.store;
        let classification = classify(
            Some(request),
            || store.target_exists(&target_url),
            || store.already_pinged(&source_url, &target_url),
        );

        if let Some(event) = classification.event {
            self.dispatch(event);
        }

        info!(
            source = %source_url,
            target = %target_url,
            remote_ip = %remote_ip,
            outcome = %classification.outcome,
            "Pingback classified"
        );

        PingbackResult::Classified {
            outcome: classification.outcome,
            source_url,
            target_url,
        }
    }

    fn dispatch(&self, event: SuccessEvent) {
        if self.events.send(event).is_err() {
            warn!("Success event consumer is gone, pingback not persisted");
        }
    }
}

/// Persist success events until every sender is dropped.
pub fn spawn_recorder(
    store: Arc<dyn PingbackStore>,
    mut events: mpsc::UnboundedReceiver<SuccessEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let source = event.request.source_url.clone();
            if let Err(err) = store.record(event) {
                warn!(source = %source, error = %err, "Failed to persist pingback");
            }
        }
        debug!("Success event channel closed");
    })
}
