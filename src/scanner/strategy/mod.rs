//! Scan scheduling strategies.
//!
//! There are three primitive ways to schedule probes over a port list:
//!
//! - [`Sequential`]: one probe at a time, optionally sleeping between probes
//! - [`WorkerPool`]: a fixed set of OS threads draining a shared queue
//! - [`BoundedConcurrent`]: every port in flight at once on a single task,
//!   gated by a semaphore
//!
//! The seven user-facing [`StrategyKind`]s are presets over these three
//! primitives; none of them carries its own probing loop.

mod bounded;
mod sequential;
mod worker_pool;

pub use bounded::BoundedConcurrent;
pub use sequential::Sequential;
pub use worker_pool::WorkerPool;

use crate::error::{ScanError, ScanResult};
use crate::scanner::probe::{ProbeResult, SharedProbe};
use crate::types::Port;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A scheduling policy for running probes across a batch of ports.
///
/// Implementations must return exactly one [`ProbeResult`] per submitted
/// port, in any order, and must never have more than
/// [`concurrency_limit`](ScanStrategy::concurrency_limit) probes in flight.
#[async_trait]
pub trait ScanStrategy: Send + Sync {
    /// Short human-readable name.
    fn name(&self) -> &'static str;

    /// Maximum number of probes this strategy runs at once.
    fn concurrency_limit(&self) -> usize;

    /// Probe every port and collect the results.
    async fn execute(&self, probe: SharedProbe, ports: Vec<Port>) -> Vec<ProbeResult>;
}

/// A boxed strategy for dynamic dispatch.
pub type BoxedStrategy = Box<dyn ScanStrategy>;

/// The primitive scheduling model behind a [`StrategyKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduling {
    Sequential,
    WorkerPool,
    BoundedConcurrent,
}

/// Default parameters for a [`StrategyKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub scheduling: Scheduling,
    pub timeout: Duration,
    /// Worker count or semaphore capacity. Ignored by sequential scheduling.
    pub concurrency: usize,
    /// Pause between probes. Only honoured by sequential scheduling.
    pub delay: Duration,
}

/// Named scan strategies selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StrategyKind {
    /// One port at a time with a generous timeout.
    #[default]
    Sequential,
    /// Sequential with a short timeout.
    FastSequential,
    /// Fixed pool of blocking worker threads.
    WorkerPool,
    /// Semaphore-gated async probes on a single task.
    BoundedConcurrent,
    /// Sequential with a long timeout and a pause between probes.
    Stealth,
    /// Bounded-concurrent with a tight timeout and a wide limit.
    Aggressive,
    /// Worker pool with a moderate worker count.
    Balanced,
}

impl StrategyKind {
    /// Every strategy, in mode-number order.
    pub const ALL: [Self; 7] = [
        Self::Sequential,
        Self::FastSequential,
        Self::WorkerPool,
        Self::BoundedConcurrent,
        Self::Stealth,
        Self::Aggressive,
        Self::Balanced,
    ];

    /// Look a strategy up by its numeric mode (1-7).
    pub fn from_mode(mode: i64) -> ScanResult<Self> {
        usize::try_from(mode)
            .ok()
            .and_then(|m| m.checked_sub(1))
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| ScanError::StrategyDispatch(format!("mode {} (expected 1-7)", mode)))
    }

    /// Numeric mode of this strategy.
    pub fn mode(self) -> u8 {
        match self {
            Self::Sequential => 1,
            Self::FastSequential => 2,
            Self::WorkerPool => 3,
            Self::BoundedConcurrent => 4,
            Self::Stealth => 5,
            Self::Aggressive => 6,
            Self::Balanced => 7,
        }
    }

    /// Canonical command-line name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::FastSequential => "fast-sequential",
            Self::WorkerPool => "worker-pool",
            Self::BoundedConcurrent => "bounded-concurrent",
            Self::Stealth => "stealth",
            Self::Aggressive => "aggressive",
            Self::Balanced => "balanced",
        }
    }

    /// Default timeout, concurrency and delay for this strategy.
    pub fn preset(self) -> Preset {
        let (scheduling, timeout_ms, concurrency, delay_ms) = match self {
            Self::Sequential => (Scheduling::Sequential, 1000, 1, 0),
            Self::FastSequential => (Scheduling::Sequential, 300, 1, 0),
            Self::WorkerPool => (Scheduling::WorkerPool, 200, 100, 0),
            Self::BoundedConcurrent => (Scheduling::BoundedConcurrent, 150, 500, 0),
            Self::Stealth => (Scheduling::Sequential, 2000, 1, 1000),
            Self::Aggressive => (Scheduling::BoundedConcurrent, 50, 1000, 0),
            Self::Balanced => (Scheduling::WorkerPool, 500, 50, 0),
        };

        Preset {
            scheduling,
            timeout: Duration::from_millis(timeout_ms),
            concurrency,
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// Build the strategy with explicit concurrency and delay.
    pub fn build(self, concurrency: usize, delay: Duration) -> BoxedStrategy {
        create_strategy(self.preset().scheduling, concurrency, delay)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('_', "-");
        if let Ok(mode) = key.parse::<i64>() {
            return Self::from_mode(mode);
        }

        match key.as_str() {
            "sequential" => Ok(Self::Sequential),
            "fast-sequential" | "fast" => Ok(Self::FastSequential),
            "worker-pool" | "threaded" | "multi-threaded" => Ok(Self::WorkerPool),
            "bounded-concurrent" | "async" => Ok(Self::BoundedConcurrent),
            "stealth" => Ok(Self::Stealth),
            "aggressive" => Ok(Self::Aggressive),
            "balanced" => Ok(Self::Balanced),
            _ => Err(ScanError::StrategyDispatch(s.to_string())),
        }
    }
}

/// Create a primitive strategy. `concurrency` is clamped to at least one.
pub fn create_strategy(
    scheduling: Scheduling,
    concurrency: usize,
    delay: Duration,
) -> BoxedStrategy {
    let concurrency = concurrency.max(1);
    match scheduling {
        Scheduling::Sequential => Box::new(Sequential::new(delay)),
        Scheduling::WorkerPool => Box::new(WorkerPool::new(concurrency)),
        Scheduling::BoundedConcurrent => Box::new(BoundedConcurrent::new(concurrency)),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Instrumented probes shared by the strategy tests.

    use super::*;
    use crate::error::ProbeError;
    use crate::scanner::probe::Probe;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Probe that reports a fixed set of ports open, sleeps to simulate
    /// latency, and records the peak number of concurrent calls.
    pub struct CountingProbe {
        open: HashSet<u16>,
        latency: Duration,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: Mutex<Vec<u16>>,
    }

    impl CountingProbe {
        pub fn new(open: &[u16], latency: Duration) -> Self {
            Self {
                open: open.iter().copied().collect(),
                latency,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }

        pub fn calls(&self) -> Vec<u16> {
            self.calls.lock().unwrap().clone()
        }

        fn enter(&self, port: Port) {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.calls.lock().unwrap().push(port.as_u16());
        }

        fn leave(&self, port: Port) -> ProbeResult {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if self.open.contains(&port.as_u16()) {
                ProbeResult::open(port)
            } else {
                ProbeResult::closed(port, ProbeError::Refused)
            }
        }
    }

    #[async_trait]
    impl Probe for CountingProbe {
        async fn probe(&self, port: Port) -> ProbeResult {
            self.enter(port);
            tokio::time::sleep(self.latency).await;
            self.leave(port)
        }

        fn probe_blocking(&self, port: Port) -> ProbeResult {
            self.enter(port);
            std::thread::sleep(self.latency);
            self.leave(port)
        }
    }

    pub fn ports(start: u16, end: u16) -> Vec<Port> {
        (start..=end).filter_map(Port::new).collect()
    }

    pub fn sorted_ports(results: &[ProbeResult]) -> Vec<u16> {
        let mut ports: Vec<u16> = results.iter().map(|r| r.port.as_u16()).collect();
        ports.sort_unstable();
        ports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mode() {
        assert_eq!(StrategyKind::from_mode(1).unwrap(), StrategyKind::Sequential);
        assert_eq!(StrategyKind::from_mode(7).unwrap(), StrategyKind::Balanced);
        assert!(matches!(
            StrategyKind::from_mode(0),
            Err(ScanError::StrategyDispatch(_))
        ));
        assert!(StrategyKind::from_mode(8).is_err());
        assert!(StrategyKind::from_mode(-3).is_err());
    }

    #[test]
    fn test_mode_round_trip() {
        for kind in StrategyKind::ALL {
            assert_eq!(StrategyKind::from_mode(kind.mode().into()).unwrap(), kind);
            assert_eq!(kind.name().parse::<StrategyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("ASYNC".parse::<StrategyKind>().unwrap(), StrategyKind::BoundedConcurrent);
        assert_eq!("worker_pool".parse::<StrategyKind>().unwrap(), StrategyKind::WorkerPool);
        assert_eq!("4".parse::<StrategyKind>().unwrap(), StrategyKind::BoundedConcurrent);
        assert!(matches!(
            "turbo".parse::<StrategyKind>(),
            Err(ScanError::StrategyDispatch(_))
        ));
    }

    #[test]
    fn test_derived_presets_share_primitives() {
        assert_eq!(StrategyKind::Stealth.preset().scheduling, Scheduling::Sequential);
        assert_eq!(StrategyKind::FastSequential.preset().scheduling, Scheduling::Sequential);
        assert_eq!(StrategyKind::Aggressive.preset().scheduling, Scheduling::BoundedConcurrent);
        assert_eq!(StrategyKind::Balanced.preset().scheduling, Scheduling::WorkerPool);

        let stealth = StrategyKind::Stealth.preset();
        let sequential = StrategyKind::Sequential.preset();
        assert!(stealth.timeout > sequential.timeout);
        assert!(!stealth.delay.is_zero());

        let aggressive = StrategyKind::Aggressive.preset();
        let bounded = StrategyKind::BoundedConcurrent.preset();
        assert!(aggressive.timeout < bounded.timeout);
        assert!(aggressive.concurrency > bounded.concurrency);
    }

    #[test]
    fn test_create_strategy_clamps_concurrency() {
        let strategy = create_strategy(Scheduling::WorkerPool, 0, Duration::ZERO);
        assert_eq!(strategy.concurrency_limit(), 1);
        assert_eq!(strategy.name(), "worker pool");

        let strategy = StrategyKind::Aggressive.build(1000, Duration::ZERO);
        assert_eq!(strategy.concurrency_limit(), 1000);
        assert_eq!(strategy.name(), "bounded concurrent");
    }
}
