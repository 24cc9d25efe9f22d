//! Fixed-size pool of blocking worker threads.
//!
//! Workers pop ports from a mutex-guarded queue and send each result over a
//! channel to a single collector. The whole pool runs inside
//! `spawn_blocking` so the async caller stays responsive.

use super::ScanStrategy;
use crate::error::ProbeError;
use crate::scanner::probe::{ProbeResult, SharedProbe};
use crate::types::Port;
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;
use tracing::{debug, error, warn};

/// Drains the port list with `workers` OS threads, one connection each.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }
}

#[async_trait]
impl ScanStrategy for WorkerPool {
    fn name(&self) -> &'static str {
        "worker pool"
    }

    fn concurrency_limit(&self) -> usize {
        self.workers
    }

    async fn execute(&self, probe: SharedProbe, ports: Vec<Port>) -> Vec<ProbeResult> {
        if ports.is_empty() {
            return Vec::new();
        }

        let workers = self.workers;
        let expected = ports.clone();

        match tokio::task::spawn_blocking(move || run_pool(probe, ports, workers)).await {
            Ok(results) => results,
            Err(e) => {
                error!(error = %e, "worker pool aborted");
                fill_missing(&expected, Vec::new())
            }
        }
    }
}

fn run_pool(probe: SharedProbe, ports: Vec<Port>, workers: usize) -> Vec<ProbeResult> {
    let worker_count = workers.min(ports.len()).max(1);
    let expected = ports.clone();
    let queue = Arc::new(Mutex::new(VecDeque::from(ports)));
    let (tx, rx) = mpsc::channel();

    debug!(workers = worker_count, ports = expected.len(), "starting worker pool");

    let mut handles = Vec::with_capacity(worker_count);
    for id in 0..worker_count {
        let queue = Arc::clone(&queue);
        let probe = Arc::clone(&probe);
        let tx = tx.clone();

        let spawned = thread::Builder::new()
            .name(format!("ghostport-worker-{}", id))
            .spawn(move || loop {
                let next = queue
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .pop_front();

                let Some(port) = next else {
                    break;
                };

                if tx.send(probe.probe_blocking(port)).is_err() {
                    break;
                }
            });

        match spawned {
            Ok(handle) => handles.push(handle),
            Err(e) => warn!(worker = id, error = %e, "failed to spawn scan worker"),
        }
    }

    // The collector sees end-of-stream once every worker has exited.
    drop(tx);
    let results: Vec<ProbeResult> = rx.iter().collect();

    for handle in handles {
        if handle.join().is_err() {
            error!("scan worker panicked");
        }
    }

    fill_missing(&expected, results)
}

/// Record a closed result for any port a dead worker never reported.
fn fill_missing(expected: &[Port], mut results: Vec<ProbeResult>) -> Vec<ProbeResult> {
    if results.len() == expected.len() {
        return results;
    }

    let seen: HashSet<Port> = results.iter().map(|r| r.port).collect();
    for &port in expected {
        if !seen.contains(&port) {
            results.push(ProbeResult::closed(
                port,
                ProbeError::Network("worker exited before reporting".to_string()),
            ));
        }
    }
    results
}
