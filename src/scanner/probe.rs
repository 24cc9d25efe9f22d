//! TCP connect probe.
//!
//! A probe performs exactly one connect attempt against `(host, port)` and
//! reports whether the port accepted the connection. It completes the full
//! TCP handshake, so it needs no privileges but is easy to log on the target.
//!
//! Every probe is available in two flavours: an async call used by the
//! sequential and bounded-concurrent strategies, and a blocking call used by
//! worker-pool threads. Both classify failures the same way.

use crate::error::ProbeError;
use crate::types::Port;
use async_trait::async_trait;
use indicatif::ProgressBar;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Outcome of probing a single port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// The port that was probed.
    pub port: Port,
    /// Whether the connection was accepted.
    pub open: bool,
    /// Why the port is considered closed, if it is.
    pub error: Option<ProbeError>,
}

impl ProbeResult {
    pub fn open(port: Port) -> Self {
        Self {
            port,
            open: true,
            error: None,
        }
    }

    pub fn closed(port: Port, error: ProbeError) -> Self {
        Self {
            port,
            open: false,
            error: Some(error),
        }
    }
}

/// Something that can test a single port.
///
/// Strategies only ever talk to this trait, which keeps scheduling separate
/// from the connect logic and lets tests substitute instrumented probes.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Probe a port without blocking the executor.
    async fn probe(&self, port: Port) -> ProbeResult;

    /// Probe a port on the current thread, blocking until it resolves.
    fn probe_blocking(&self, port: Port) -> ProbeResult;
}

/// A probe shared between strategy workers.
pub type SharedProbe = Arc<dyn Probe>;

/// Plain TCP connect probe against one host.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    timeout: Duration,
    /// Addresses for the blocking path, looked up once per probe instance.
    resolved: OnceLock<Result<Vec<IpAddr>, String>>,
}

impl TcpProbe {
    /// Create a probe for `host` (hostname or IP literal).
    ///
    /// The async path resolves inside `timeout` on every attempt. The
    /// blocking path resolves the host once and reuses the addresses for
    /// every port. A zero timeout is raised to one millisecond.
    pub fn new(host: impl Into<String>, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            timeout: timeout.max(Duration::from_millis(1)),
            resolved: OnceLock::new(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn addresses(&self) -> Result<&[IpAddr], ProbeError> {
        let resolved = self.resolved.get_or_init(|| {
            if let Ok(ip) = self.host.parse::<IpAddr>() {
                return Ok(vec![ip]);
            }
            let addrs: Vec<IpAddr> = (self.host.as_str(), 0)
                .to_socket_addrs()
                .map_err(|e| e.to_string())?
                .map(|addr| addr.ip())
                .collect();
            trace!(host = %self.host, count = addrs.len(), "resolved");
            Ok(addrs)
        });

        match resolved {
            Ok(addrs) if addrs.is_empty() => Err(ProbeError::Network(format!(
                "no addresses for {}",
                self.host
            ))),
            Ok(addrs) => Ok(addrs.as_slice()),
            Err(e) => Err(ProbeError::Network(e.clone())),
        }
    }

    fn refused_or_failed(&self, port: Port, error: ProbeError) -> ProbeResult {
        trace!(host = %self.host, %port, %error, "probe failed");
        ProbeResult::closed(port, error)
    }
}

#[async_trait]
impl Probe for TcpProbe {
    async fn probe(&self, port: Port) -> ProbeResult {
        let connect = TcpStream::connect((self.host.as_str(), port.as_u16()));

        match timeout(self.timeout, connect).await {
            Ok(Ok(stream)) => {
                drop(stream);
                ProbeResult::open(port)
            }
            Ok(Err(e)) => self.refused_or_failed(port, e.into()),
            Err(_) => self.refused_or_failed(port, ProbeError::TimedOut),
        }
    }

    fn probe_blocking(&self, port: Port) -> ProbeResult {
        let addrs = match self.addresses() {
            Ok(addrs) => addrs,
            Err(e) => return self.refused_or_failed(port, e),
        };

        // One deadline covers every address the host resolved to.
        let deadline = Instant::now() + self.timeout;
        let mut last_error = ProbeError::TimedOut;
        for &ip in addrs {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return self.refused_or_failed(port, ProbeError::TimedOut);
            }
            let addr = SocketAddr::new(ip, port.as_u16());
            match std::net::TcpStream::connect_timeout(&addr, remaining) {
                Ok(stream) => {
                    drop(stream);
                    return ProbeResult::open(port);
                }
                Err(e) => last_error = e.into(),
            }
        }

        self.refused_or_failed(port, last_error)
    }
}

/// Wraps another probe and ticks a progress bar after every attempt.
pub struct ProgressProbe {
    inner: SharedProbe,
    progress: ProgressBar,
}

impl ProgressProbe {
    pub fn new(inner: SharedProbe, progress: ProgressBar) -> Self {
        Self { inner, progress }
    }

    fn record(&self, result: ProbeResult) -> ProbeResult {
        self.progress.inc(1);
        if result.open {
            self.progress
                .set_message(format!("Found open port: {}", result.port));
        }
        result
    }
}

#[async_trait]
impl Probe for ProgressProbe {
    async fn probe(&self, port: Port) -> ProbeResult {
        let result = self.inner.probe(port).await;
        self.record(result)
    }

    fn probe_blocking(&self, port: Port) -> ProbeResult {
        let result = self.inner.probe_blocking(port);
        self.record(result)
    }
}
