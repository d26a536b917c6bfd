//! Analysis results.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::circuit::{Component, ComponentId, ComponentKind, ComponentState};

/// How the bulbs are wired relative to the battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// No battery, or no bulbs
    #[default]
    None,
    /// Exactly one bulb
    Simple,
    Series,
    Parallel,
}

impl Topology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Simple => "simple",
            Self::Series => "series",
            Self::Parallel => "parallel",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "simple" => Ok(Self::Simple),
            "series" => Ok(Self::Series),
            "parallel" => Ok(Self::Parallel),
            other => Err(format!("unknown topology '{}'", other)),
        }
    }
}

/// Immutable snapshot produced by one analysis pass.
///
/// `closed` implies `topology != None`. `current` and `voltage` are present
/// exactly when a battery and at least one bulb are placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitState {
    /// Every component as of this pass, oldest first
    pub components: Vec<Component>,
    pub topology: Topology,
    pub closed: bool,
    /// Amperes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    /// Volts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage: Option<f64>,
}

impl CircuitState {
    /// Look up a component in the snapshot.
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Check whether a bulb was lit by this pass.
    pub fn is_lit(&self, id: ComponentId) -> bool {
        self.component(id)
            .map_or(false, |c| c.kind == ComponentKind::Bulb && c.state == Some(ComponentState::On))
    }

    /// Plain-text description, one fact per line.
    pub fn summary(&self) -> String {
        self.to_string()
    }

    /// Serialize to a single-line JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.topology {
            Topology::None => writeln!(f, "Topology: No circuit")?,
            topology => writeln!(f, "Topology: {}", topology)?,
        }
        if self.closed {
            write!(f, "Status: Closed (current flows)")?;
        } else {
            write!(f, "Status: Open (no current)")?;
        }
        if let Some(current) = self.current {
            write!(f, "\nCurrent: {:.2} A", current)?;
        }
        if let Some(voltage) = self.voltage {
            write!(f, "\nVoltage: {:.1} V", voltage)?;
        }
        Ok(())
    }
}

/// The circuit a lab step asks the student to build.
///
/// A step is complete when every field that is set matches the snapshot.
/// An expectation with no fields set is always met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepExpectation {
    pub topology: Option<Topology>,
    pub closed: Option<bool>,
}

impl StepExpectation {
    /// Create an empty expectation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a topology.
    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = Some(topology);
        self
    }

    /// Require the circuit to be closed (or open).
    pub fn with_closed(mut self, closed: bool) -> Self {
        self.closed = Some(closed);
        self
    }

    /// Check a snapshot against this expectation.
    pub fn is_met(&self, state: &CircuitState) -> bool {
        self.topology.map_or(true, |t| t == state.topology)
            && self.closed.map_or(true, |c| c == state.closed)
    }
}

impl fmt::Display for StepExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(topology) = self.topology {
            parts.push(format!("topology={}", topology));
        }
        if let Some(closed) = self.closed {
            parts.push(format!("closed={}", closed));
        }
        if parts.is_empty() {
            write!(f, "anything")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(topology: Topology, closed: bool, current: Option<f64>) -> CircuitState {
        CircuitState {
            components: Vec::new(),
            topology,
            closed,
            current,
            voltage: current.map(|_| 9.0),
        }
    }

    #[test]
    fn test_expectation_matching() {
        let series_closed = state(Topology::Series, true, Some(0.5));

        assert!(StepExpectation::new().is_met(&series_closed));
        assert!(StepExpectation::new().with_topology(Topology::Series).is_met(&series_closed));
        assert!(StepExpectation::new()
            .with_topology(Topology::Series)
            .with_closed(true)
            .is_met(&series_closed));
        assert!(!StepExpectation::new().with_closed(false).is_met(&series_closed));
        assert!(!StepExpectation::new()
            .with_topology(Topology::Parallel)
            .is_met(&series_closed));
    }

    #[test]
    fn test_summary_text() {
        let text = state(Topology::Parallel, true, Some(0.8)).summary();
        assert_eq!(
            text,
            "Topology: parallel\nStatus: Closed (current flows)\nCurrent: 0.80 A\nVoltage: 9.0 V"
        );

        let text = state(Topology::None, false, None).summary();
        assert_eq!(text, "Topology: No circuit\nStatus: Open (no current)");
    }

    #[test]
    fn test_json_omits_missing_reading() {
        let json = state(Topology::None, false, None).to_json().unwrap();
        assert_eq!(json, r#"{"components":[],"topology":"none","closed":false}"#);

        let json = state(Topology::Simple, true, Some(0.5)).to_json().unwrap();
        assert!(json.contains(r#""current":0.5"#));
        assert!(json.contains(r#""voltage":9.0"#));
    }

    #[test]
    fn test_topology_parse() {
        assert_eq!("Series".parse::<Topology>(), Ok(Topology::Series));
        assert!("mesh".parse::<Topology>().is_err());
    }

    #[test]
    fn test_expectation_display() {
        let exp = StepExpectation::new().with_topology(Topology::Series).with_closed(true);
        assert_eq!(exp.to_string(), "topology=series closed=true");
        assert_eq!(StepExpectation::new().to_string(), "anything");
    }
}
