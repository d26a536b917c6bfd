//! Circuit analysis.
//!
//! Every analysis pass runs three stages from scratch over the current
//! registry contents:
//!
//! 1. [`ConnectivityAnalyzer`] decides whether the battery lies on a closed
//!    conduction loop.
//! 2. [`TopologyClassifier`] labels the bulb wiring as none, simple, series
//!    or parallel.
//! 3. [`ElectricalModel`] derives a simplified current/voltage reading and
//!    writes the on/off state of every bulb.
//!
//! The [`Analyzer`] façade runs the stages in order and returns an
//! immutable [`CircuitState`] snapshot. Nothing is cached between passes.
//!
//! ## Switches
//!
//! By default every connection conducts, whatever state a switch is in
//! ([`SwitchConduction::IgnoreState`]). With
//! [`SwitchConduction::OpenSwitchBreaks`] the closed-loop check refuses to
//! route through an open switch. Topology classification is about wiring
//! only and ignores switch state in both modes.

mod connectivity;
mod electrical;
mod state;
mod topology;

pub use connectivity::ConnectivityAnalyzer;
pub use electrical::{ElectricalModel, Reading};
pub use state::{CircuitState, StepExpectation, Topology};
pub use topology::{PathSearch, SearchLimits, TopologyClassifier};

use crate::circuit::{ComponentKind, ComponentRegistry};

/// Battery voltage reported whenever a battery and a bulb are placed.
pub const DEFAULT_BATTERY_VOLTAGE: f64 = 9.0;

/// Current through a closed simple or series circuit, in amperes.
pub const BASE_CURRENT: f64 = 0.5;

/// Per-bulb multiplier applied to [`BASE_CURRENT`] in a parallel circuit.
pub const PARALLEL_CURRENT_FACTOR: f64 = 0.8;

/// Maximum simple paths collected by one enumeration.
pub const DEFAULT_MAX_PATHS: usize = 256;

/// Maximum number of components on one enumerated path.
pub const DEFAULT_MAX_PATH_LEN: usize = 256;

/// Ceiling for the path length setting; it is also the search's recursion
/// depth.
pub const MAX_PATH_LEN_LIMIT: usize = 1024;

/// Maximum node expansions spent by one enumeration.
pub const DEFAULT_MAX_STEPS: usize = 20_000;

/// How the closed-loop check treats switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchConduction {
    /// Every connection conducts; switch state is not consulted.
    #[default]
    IgnoreState,
    /// An open switch blocks conduction through itself.
    OpenSwitchBreaks,
}

impl SwitchConduction {
    /// Parse from a keyword (`ignore` or `gate`).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "ignore" | "ignore-state" => Some(Self::IgnoreState),
            "gate" | "break" | "open-switch-breaks" => Some(Self::OpenSwitchBreaks),
            _ => None,
        }
    }
}

/// Configuration for the analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Whether open switches break the closed-loop check.
    pub switch_conduction: SwitchConduction,
    /// Maximum simple paths collected per enumeration.
    pub max_paths: usize,
    /// Maximum components on one enumerated path.
    pub max_path_len: usize,
    /// Maximum node expansions per enumeration.
    pub max_steps: usize,
    /// Voltage reported when a battery and a bulb are present.
    pub battery_voltage: f64,
    /// Current through a closed simple/series circuit.
    pub base_current: f64,
    /// Per-bulb multiplier for parallel circuits.
    pub parallel_factor: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            switch_conduction: SwitchConduction::default(),
            max_paths: DEFAULT_MAX_PATHS,
            max_path_len: DEFAULT_MAX_PATH_LEN,
            max_steps: DEFAULT_MAX_STEPS,
            battery_voltage: DEFAULT_BATTERY_VOLTAGE,
            base_current: BASE_CURRENT,
            parallel_factor: PARALLEL_CURRENT_FACTOR,
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how switches are treated by the closed-loop check.
    pub fn with_switch_conduction(mut self, switch_conduction: SwitchConduction) -> Self {
        self.switch_conduction = switch_conduction;
        self
    }

    /// Set the per-enumeration path cap.
    pub fn with_max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = max_paths.max(1);
        self
    }

    /// Set the maximum path length, in components.
    ///
    /// Clamped to `2..=MAX_PATH_LEN_LIMIT`.
    pub fn with_max_path_len(mut self, max_path_len: usize) -> Self {
        self.max_path_len = max_path_len.clamp(2, MAX_PATH_LEN_LIMIT);
        self
    }

    /// Set the per-enumeration node expansion budget.
    ///
    /// Lower budgets keep analysis fast on dense graphs at the cost of
    /// classifying from fewer paths.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Set the reported battery voltage.
    pub fn with_battery_voltage(mut self, volts: f64) -> Self {
        self.battery_voltage = volts;
        self
    }

    /// Limits handed to path enumeration.
    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            max_paths: self.max_paths,
            max_path_len: self.max_path_len,
            max_steps: self.max_steps,
        }
    }
}

/// Runs the three analysis stages and produces a snapshot.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    /// Create an analyzer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with custom configuration.
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect on the next pass.
    pub fn set_config(&mut self, config: AnalyzerConfig) {
        self.config = config;
    }

    /// Analyze the registry.
    ///
    /// Total for every registry state, including the empty one. The only
    /// write is the derived on/off state of bulbs.
    pub fn analyze(&self, registry: &mut ComponentRegistry) -> CircuitState {
        let _span = tracing::debug_span!("analyze", components = registry.len()).entered();

        let battery = registry.first_of(ComponentKind::Battery);
        let bulbs = registry.ids_of(ComponentKind::Bulb);

        let (closed, topology) = match battery {
            Some(battery) if !bulbs.is_empty() => {
                let connectivity = ConnectivityAnalyzer::new(self.config.switch_conduction);
                let classifier = TopologyClassifier::new(self.config.search_limits());
                (
                    connectivity.is_closed(registry, battery),
                    classifier.classify(registry, Some(battery), &bulbs),
                )
            }
            _ => (false, Topology::None),
        };

        let reading = ElectricalModel::from_config(&self.config).derive(registry, closed, topology);

        tracing::debug!(closed, %topology, current = ?reading.current, "analysis complete");

        CircuitState {
            components: registry.all(),
            topology,
            closed,
            current: reading.current,
            voltage: reading.voltage,
        }
    }
}
