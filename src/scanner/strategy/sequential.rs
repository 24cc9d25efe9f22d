//! One probe at a time.

use super::ScanStrategy;
use crate::scanner::probe::{ProbeResult, SharedProbe};
use crate::types::Port;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

/// Probes ports strictly in order with an optional pause between probes.
///
/// Slow and predictable; never has more than one connection open. With a
/// non-zero delay this is the stealth profile.
#[derive(Debug, Clone, Copy)]
pub struct Sequential {
    delay: Duration,
}

impl Sequential {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl ScanStrategy for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn concurrency_limit(&self) -> usize {
        1
    }

    async fn execute(&self, probe: SharedProbe, ports: Vec<Port>) -> Vec<ProbeResult> {
        let mut results = Vec::with_capacity(ports.len());
        let last = ports.len().saturating_sub(1);

        for (i, port) in ports.into_iter().enumerate() {
            results.push(probe.probe(port).await);

            if i < last && !self.delay.is_zero() {
                sleep(self.delay).await;
            }
        }

        results
    }
}
