//! Scanner module - drives a strategy over a port range.
//!
//! [`run_scan`] is the single entry point: it validates the configuration,
//! expands the port range, hands the ports to the selected strategy, and
//! folds the per-port results into a sorted [`ScanOutcome`].

pub mod probe;
pub mod strategy;

use crate::error::{ScanError, ScanResult};
use crate::types::{Port, PortRange};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub use probe::{Probe, ProbeResult, ProgressProbe, SharedProbe, TcpProbe};
pub use strategy::{
    create_strategy, BoundedConcurrent, BoxedStrategy, Preset, ScanStrategy, Scheduling,
    Sequential, StrategyKind, WorkerPool,
};

/// Configuration for a single scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Hostname or IP literal to scan.
    pub target: String,
    /// Ports to probe.
    pub range: PortRange,
    /// Scheduling strategy.
    pub strategy: StrategyKind,
    /// Per-probe connect timeout.
    pub timeout: Duration,
    /// Worker count or in-flight limit.
    pub concurrency: usize,
    /// Pause between sequential probes.
    pub delay: Duration,
    /// Draw a progress bar while scanning.
    pub show_progress: bool,
}

impl ScanConfig {
    /// Create a configuration using the strategy's preset parameters.
    pub fn new(target: impl Into<String>, range: PortRange, strategy: StrategyKind) -> Self {
        let preset = strategy.preset();
        Self {
            target: target.into(),
            range,
            strategy,
            timeout: preset.timeout,
            concurrency: preset.concurrency,
            delay: preset.delay,
            show_progress: false,
        }
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the worker count / in-flight limit.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the inter-probe delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Enable the progress bar.
    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }
}

/// Aggregated result of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Open ports, ascending, without duplicates.
    pub open_ports: Vec<Port>,
    /// Wall time from dispatch to collection.
    pub duration: Duration,
    /// Number of distinct ports attempted.
    pub probed_count: usize,
}

impl ScanOutcome {
    /// Fold probe results into an outcome. Ordering of `results` is irrelevant.
    pub fn from_results(results: &[ProbeResult], duration: Duration) -> Self {
        let mut probed = HashSet::with_capacity(results.len());
        let mut open = BTreeSet::new();

        for result in results {
            probed.insert(result.port);
            if result.open {
                open.insert(result.port);
            }
        }

        Self {
            open_ports: open.into_iter().collect(),
            duration,
            probed_count: probed.len(),
        }
    }
}

/// Check the target is usable and return it in the form the probe expects.
///
/// Only the shape is checked; resolution is left to the connect call.
pub fn validate_target(target: &str) -> ScanResult<&str> {
    let trimmed = target.trim();
    if trimmed.is_empty() {
        return Err(ScanError::InvalidTarget("target is empty".to_string()));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(ScanError::InvalidTarget(format!(
            "'{}' contains whitespace",
            trimmed
        )));
    }

    // Accept bracketed IPv6 literals such as "[::1]".
    Ok(trimmed
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .unwrap_or(trimmed))
}

/// Execute a complete port scan with a TCP connect probe.
pub async fn run_scan(config: ScanConfig) -> ScanResult<ScanOutcome> {
    let host = validate_target(&config.target)?.to_string();
    let probe: SharedProbe = Arc::new(TcpProbe::new(host, config.timeout));
    run_scan_with_probe(config, probe).await
}

/// Execute a scan with a caller-supplied probe.
pub async fn run_scan_with_probe(config: ScanConfig, probe: SharedProbe) -> ScanResult<ScanOutcome> {
    validate_target(&config.target)?;

    let ports = config.range.to_ports();
    let total = ports.len();
    let strategy = config.strategy.build(config.concurrency, config.delay);

    let progress = config.show_progress.then(|| progress_bar(total));
    let probe: SharedProbe = match &progress {
        Some(pb) => Arc::new(ProgressProbe::new(probe, pb.clone())),
        None => probe,
    };

    info!(
        host = %config.target,
        strategy = %config.strategy,
        range = %config.range,
        ports = total,
        limit = strategy.concurrency_limit(),
        timeout_ms = config.timeout.as_millis() as u64,
        "starting scan"
    );

    let start = Instant::now();
    let results = strategy.execute(probe, ports).await;
    let duration = start.elapsed();

    if let Some(pb) = progress {
        pb.finish_with_message("Scan complete");
    }

    let outcome = ScanOutcome::from_results(&results, duration);
    for port in &outcome.open_ports {
        debug!(%port, "open");
    }

    info!(
        open = outcome.open_ports.len(),
        probed = outcome.probed_count,
        elapsed_ms = duration.as_millis() as u64,
        "scan complete"
    );

    Ok(outcome)
}

fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    pb.set_style(style);
    pb
}
