// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for pingback outcomes.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Outcome counters on a private registry.
#[derive(Clone)]
pub struct PingbackMetrics {
    registry: Registry,
    requests: IntCounterVec,
}

impl PingbackMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let requests = IntCounterVec::new(
            Opts::new(
                "pingback_requests_total",
                "Pingback requests by terminal outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(requests.clone()))?;

        Ok(Self { registry, requests })
    }

    /// Count one request ending in `outcome`.
    pub fn observe(&self, outcome: &str) {
        self.requests.with_label_values(&[outcome]).inc();
    }

    /// Current count for `outcome`.
    pub fn count(&self, outcome: &str) -> u64 {
        self.requests.with_label_values(&[outcome]).get()
    }

    /// Render the registry in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
