//! Bounded cooperative concurrency.
//!
//! All ports are submitted at once as futures polled on the calling task.
//! The stream buffer is as wide as the port list, so the counting semaphore
//! alone caps how many connect attempts are outstanding.

use super::ScanStrategy;
use crate::scanner::probe::{ProbeResult, SharedProbe};
use crate::types::Port;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tokio::sync::Semaphore;

/// Semaphore-gated async scanning. The fastest primitive.
#[derive(Debug, Clone, Copy)]
pub struct BoundedConcurrent {
    limit: usize,
}

impl BoundedConcurrent {
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.clamp(1, Semaphore::MAX_PERMITS),
        }
    }
}

#[async_trait]
impl ScanStrategy for BoundedConcurrent {
    fn name(&self) -> &'static str {
        "bounded concurrent"
    }

    fn concurrency_limit(&self) -> usize {
        self.limit
    }

    async fn execute(&self, probe: SharedProbe, ports: Vec<Port>) -> Vec<ProbeResult> {
        let semaphore = Semaphore::new(self.limit);
        let semaphore = &semaphore;
        let probe = &probe;
        let width = ports.len().max(1);

        stream::iter(ports)
            .map(move |port| async move {
                // The semaphore is never closed, so acquire cannot fail.
                let _permit = semaphore.acquire().await.ok();
                probe.probe(port).await
            })
            .buffer_unordered(width)
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::strategy::testing::{ports, sorted_ports, CountingProbe};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_bounded_respects_limit() {
        let probe = Arc::new(CountingProbe::new(&[], Duration::from_millis(5)));
        let strategy = BoundedConcurrent::new(5);

        let results = strategy.execute(probe.clone(), ports(100, 199)).await;

        assert_eq!(results.len(), 100);
        assert!(probe.peak() <= 5, "peak {} exceeded limit 5", probe.peak());
        assert_eq!(probe.peak(), 5);
    }

    #[tokio::test]
    async fn test_bounded_returns_every_port() {
        let probe = Arc::new(CountingProbe::new(&[150, 101], Duration::from_millis(1)));
        let results = BoundedConcurrent::new(1000)
            .execute(probe, ports(100, 160))
            .await;

        assert_eq!(sorted_ports(&results), (100..=160).collect::<Vec<u16>>());
        assert_eq!(results.iter().filter(|r| r.open).count(), 2);
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(BoundedConcurrent::new(0).concurrency_limit(), 1);
    }
}
