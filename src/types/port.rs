//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortRange` is the inclusive range a scan covers, parsed from `"N"` or
//! `"N-M"`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(value.into()))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u64),
    #[error("invalid port number: {0:?}")]
    InvalidFormat(String),
    #[error("start ({0}) > end ({1})")]
    Reversed(u16, u16),
    #[error("empty port specification")]
    Empty,
}

/// An inclusive range of ports. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPortRange", into = "RawPortRange")]
pub struct PortRange {
    start: Port,
    end: Port,
}

/// Unchecked wire form of [`PortRange`]; validated on the way in.
#[derive(Serialize, Deserialize)]
struct RawPortRange {
    start: u16,
    end: u16,
}

impl TryFrom<RawPortRange> for PortRange {
    type Error = PortError;

    fn try_from(raw: RawPortRange) -> Result<Self, Self::Error> {
        Self::from_bounds(raw.start, raw.end)
    }
}

impl From<PortRange> for RawPortRange {
    fn from(range: PortRange) -> Self {
        Self {
            start: range.start.0,
            end: range.end.0,
        }
    }
}

impl PortRange {
    /// Create a new port range.
    pub fn new(start: Port, end: Port) -> Result<Self, PortError> {
        if start.0 > end.0 {
            Err(PortError::Reversed(start.0, end.0))
        } else {
            Ok(Self { start, end })
        }
    }

    /// Create a range containing a single port.
    pub const fn single(port: Port) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    /// Build a range straight from raw numbers.
    pub fn from_bounds(start: u16, end: u16) -> Result<Self, PortError> {
        Self::new(Port::try_from(start)?, Port::try_from(end)?)
    }

    pub const fn start(&self) -> Port {
        self.start
    }

    pub const fn end(&self) -> Port {
        self.end
    }

    /// Get the number of ports in this range.
    pub const fn len(&self) -> usize {
        self.end.0.saturating_sub(self.start.0) as usize + 1
    }

    /// A valid range always holds at least one port.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over all ports in this range, ascending.
    pub fn iter(&self) -> impl Iterator<Item = Port> {
        (self.start.0..=self.end.0).map(Port)
    }

    /// Expand the range into a concrete port list.
    pub fn to_ports(&self) -> Vec<Port> {
        self.iter().collect()
    }
}

impl Default for PortRange {
    /// The well-known ports, 1-1024.
    fn default() -> Self {
        Self {
            start: Port(1),
            end: Port(1024),
        }
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

fn parse_bound(s: &str) -> Result<Port, PortError> {
    let s = s.trim();
    // Parse wide so "70000" reports out-of-range rather than bad format.
    let value: u64 = s
        .parse()
        .map_err(|_| PortError::InvalidFormat(s.to_string()))?;
    u16::try_from(value)
        .ok()
        .and_then(Port::new)
        .ok_or(PortError::OutOfRange(value))
}

impl FromStr for PortRange {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PortError::Empty);
        }

        match s.split_once('-') {
            Some((start, end)) => {
                if end.contains('-') {
                    return Err(PortError::InvalidFormat(s.to_string()));
                }
                Self::new(parse_bound(start)?, parse_bound(end)?)
            }
            None => parse_bound(s).map(Self::single),
        }
    }
}
