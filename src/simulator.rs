//! Main simulator interface.
//!
//! A [`CircuitSimulator`] is one student's in-progress circuit: the
//! component registry plus the analyzer that reads it. The UI calls a
//! mutation, then [`CircuitSimulator::analyze`] for a fresh snapshot.

use crate::analysis::{Analyzer, AnalyzerConfig, CircuitState};
use crate::circuit::{Component, ComponentId, ComponentKind, ComponentRegistry};

/// The circuit engine for one lab session.
#[derive(Debug, Clone, Default)]
pub struct CircuitSimulator {
    registry: ComponentRegistry,
    analyzer: Analyzer,
}

impl CircuitSimulator {
    /// Create an empty simulator with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty simulator with custom configuration.
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self {
            registry: ComponentRegistry::new(),
            analyzer: Analyzer::with_config(config),
        }
    }

    /// Get the analyzer configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        self.analyzer.config()
    }

    /// Replace the analyzer configuration.
    pub fn set_config(&mut self, config: AnalyzerConfig) {
        self.analyzer.set_config(config);
    }

    /// Place a component.
    pub fn add_component(&mut self, kind: ComponentKind, x: f64, y: f64) -> Component {
        self.registry.add(kind, x, y)
    }

    /// Remove a component and every wire attached to it.
    pub fn remove_component(&mut self, id: ComponentId) -> bool {
        self.registry.remove(id)
    }

    /// Look up a component.
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.registry.get(id)
    }

    /// Copy of every component.
    pub fn components(&self) -> Vec<Component> {
        self.registry.all()
    }

    /// Wire two components together.
    pub fn connect(&mut self, a: ComponentId, b: ComponentId) -> bool {
        self.registry.connect(a, b)
    }

    /// Remove the wire between two components.
    pub fn disconnect(&mut self, a: ComponentId, b: ComponentId) -> bool {
        self.registry.disconnect(a, b)
    }

    /// Move a component on the canvas.
    pub fn move_component(&mut self, id: ComponentId, x: f64, y: f64) -> bool {
        self.registry.move_component(id, x, y)
    }

    /// Flip a switch.
    pub fn toggle_switch(&mut self, id: ComponentId) -> bool {
        self.registry.toggle_switch(id)
    }

    /// Set a switch open or closed.
    pub fn set_switch(&mut self, id: ComponentId, closed: bool) -> bool {
        self.registry.set_switch(id, closed)
    }

    /// Remove every component.
    pub fn reset(&mut self) {
        self.registry.clear();
    }

    /// Run a full analysis pass.
    pub fn analyze(&mut self) -> CircuitState {
        self.analyzer.analyze(&mut self.registry)
    }

    /// Get a reference to the registry.
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Topology;

    #[test]
    fn test_build_and_analyze() {
        let mut sim = CircuitSimulator::new();
        let bat = sim.add_component(ComponentKind::Battery, 0.0, 0.0).id;
        let bulb = sim.add_component(ComponentKind::Bulb, 50.0, 0.0).id;
        let wire = sim.add_component(ComponentKind::Wire, 25.0, 25.0).id;

        sim.connect(bat, bulb);
        assert!(!sim.analyze().closed);

        sim.connect(bulb, wire);
        sim.connect(wire, bat);
        let state = sim.analyze();
        assert!(state.closed);
        assert_eq!(state.topology, Topology::Simple);
        assert!(state.is_lit(bulb));

        sim.disconnect(wire, bat);
        let state = sim.analyze();
        assert!(!state.closed);
        assert!(!state.is_lit(bulb));
    }

    #[test]
    fn test_moving_does_not_change_analysis() {
        let mut sim = CircuitSimulator::new();
        let bat = sim.add_component(ComponentKind::Battery, 0.0, 0.0).id;
        let bulb = sim.add_component(ComponentKind::Bulb, 0.0, 0.0).id;
        let wire = sim.add_component(ComponentKind::Wire, 0.0, 0.0).id;
        sim.connect(bat, bulb);
        sim.connect(bulb, wire);
        sim.connect(wire, bat);

        let before = sim.analyze();
        sim.move_component(bulb, 300.0, 120.0);
        let after = sim.analyze();

        assert_eq!(before.closed, after.closed);
        assert_eq!(before.topology, after.topology);
        assert_eq!(before.current, after.current);
    }

    #[test]
    fn test_reset() {
        let mut sim = CircuitSimulator::new();
        let old = sim.add_component(ComponentKind::Battery, 0.0, 0.0).id;
        sim.reset();

        assert!(sim.components().is_empty());
        assert!(sim.component(old).is_none());
        let state = sim.analyze();
        assert_eq!(state.topology, Topology::None);

        let fresh = sim.add_component(ComponentKind::Battery, 0.0, 0.0).id;
        assert_ne!(old, fresh);
    }
}
