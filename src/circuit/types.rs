//! Core types for circuit representation.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// A unique identifier for a placed component.
///
/// Ids are handed out by the [`ComponentRegistry`](super::ComponentRegistry)
/// from a monotonically increasing counter and are never reused, even after
/// the component is removed or the registry is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u64);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

impl FromStr for ComponentId {
    type Err = std::num::ParseIntError;

    /// Accepts both the display form (`C12`) and a bare number (`12`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('C')
            .or_else(|| s.strip_prefix('c'))
            .unwrap_or(s);
        digits.parse().map(ComponentId)
    }
}

impl Serialize for ComponentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The kind of a circuit element. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Power source
    Battery,
    /// Load
    Bulb,
    /// Caller-operated switch
    Switch,
    /// Plain conductor
    Wire,
}

impl ComponentKind {
    /// Parse a kind from its keyword (case-insensitive).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "battery" | "bat" => Some(Self::Battery),
            "bulb" | "lamp" => Some(Self::Bulb),
            "switch" | "sw" => Some(Self::Switch),
            "wire" => Some(Self::Wire),
            _ => None,
        }
    }

    /// The state a freshly placed component of this kind starts in.
    pub fn initial_state(&self) -> Option<ComponentState> {
        match self {
            Self::Bulb => Some(ComponentState::Off),
            Self::Switch => Some(ComponentState::Open),
            Self::Battery | Self::Wire => None,
        }
    }

    /// Lowercase name, as used in scripts and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Battery => "battery",
            Self::Bulb => "bulb",
            Self::Switch => "switch",
            Self::Wire => "wire",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-kind state. Bulbs are `On`/`Off`, switches `Open`/`Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    /// Bulb lit
    On,
    /// Bulb dark
    Off,
    /// Switch not conducting
    Open,
    /// Switch conducting
    Closed,
}

/// Advisory canvas position. Only the renderer cares about it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
