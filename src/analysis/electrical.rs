//! Simplified electrical reading and bulb state propagation.
//!
//! This is not circuit analysis: there is no resistance and no Ohm's law.
//! The battery always reports a fixed voltage, and current is a constant
//! picked by topology. Every bulb in a closed circuit is simply `on`; series
//! and parallel bulbs are not given different brightness even though real
//! bulbs would differ.

use crate::circuit::{ComponentKind, ComponentRegistry};

use super::{AnalyzerConfig, Topology, BASE_CURRENT, DEFAULT_BATTERY_VOLTAGE, PARALLEL_CURRENT_FACTOR};

/// Current and voltage derived by one pass. Both are `None` unless a battery
/// and at least one bulb are placed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Reading {
    pub current: Option<f64>,
    pub voltage: Option<f64>,
}

/// Derives the reading and lights or darkens bulbs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElectricalModel {
    battery_voltage: f64,
    base_current: f64,
    parallel_factor: f64,
}

impl Default for ElectricalModel {
    fn default() -> Self {
        Self {
            battery_voltage: DEFAULT_BATTERY_VOLTAGE,
            base_current: BASE_CURRENT,
            parallel_factor: PARALLEL_CURRENT_FACTOR,
        }
    }
}

impl ElectricalModel {
    /// Take the constants from an analyzer configuration.
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            battery_voltage: config.battery_voltage,
            base_current: config.base_current,
            parallel_factor: config.parallel_factor,
        }
    }

    /// Compute the reading without touching any component.
    ///
    /// `powered` means a battery and at least one bulb are placed.
    pub fn reading(&self, powered: bool, closed: bool, topology: Topology, bulb_count: usize) -> Reading {
        if !powered {
            return Reading::default();
        }

        let current = if !closed {
            0.0
        } else {
            match topology {
                Topology::Simple | Topology::Series => self.base_current,
                Topology::Parallel => self.base_current * bulb_count as f64 * self.parallel_factor,
                Topology::None => 0.0,
            }
        };

        Reading {
            current: Some(current),
            voltage: Some(self.battery_voltage),
        }
    }

    /// Compute the reading and set every bulb on (closed) or off (open).
    ///
    /// Bulb state is overwritten on every call, even when there is no
    /// reading. Switch state is left alone.
    pub fn derive(&self, registry: &mut ComponentRegistry, closed: bool, topology: Topology) -> Reading {
        let bulb_count = registry.count(ComponentKind::Bulb);
        let powered = bulb_count > 0 && registry.first_of(ComponentKind::Battery).is_some();

        registry.set_bulb_states(closed);
        self.reading(powered, closed, topology, bulb_count)
    }
}
