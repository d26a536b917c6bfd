//! Closed-loop detection.

use std::collections::{HashMap, VecDeque};

use crate::circuit::{ComponentId, ComponentRegistry};

use super::SwitchConduction;

/// How the traversal reached a component.
#[derive(Debug, Clone, Copy)]
struct Visit {
    /// The battery neighbour this branch started from
    branch: ComponentId,
    /// The component the traversal arrived from
    from: ComponentId,
}

/// Decides whether the battery sits on a closed conduction loop.
///
/// The graph is undirected, so naively "coming back to a visited node"
/// is not a loop: walking from the battery to a wire and straight back just
/// retraces the edge. The traversal starts one branch per battery
/// neighbour and records, for every component, the branch it belongs to and
/// the component it was reached from. The edge back to that predecessor is
/// never followed. A loop through the battery exists exactly when two
/// different branches meet, because then battery, ..., x, y, ..., battery
/// uses no edge twice.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectivityAnalyzer {
    switch_conduction: SwitchConduction,
}

impl ConnectivityAnalyzer {
    /// Create an analyzer with the given switch treatment.
    pub fn new(switch_conduction: SwitchConduction) -> Self {
        Self { switch_conduction }
    }

    /// Check whether `battery` lies on a cycle of the connection graph.
    ///
    /// False for an unknown id, an unconnected battery, or a graph where
    /// every route out of the battery dead-ends.
    pub fn is_closed(&self, registry: &ComponentRegistry, battery: ComponentId) -> bool {
        let Some(source) = registry.get(battery) else {
            return false;
        };

        let mut reached: HashMap<ComponentId, Visit> = HashMap::new();
        let mut queue = VecDeque::new();

        for &root in &source.peers {
            if self.conducts(registry, root) {
                reached.insert(
                    root,
                    Visit {
                        branch: root,
                        from: battery,
                    },
                );
                queue.push_back(root);
            }
        }

        while let Some(node) = queue.pop_front() {
            let Some(&visit) = reached.get(&node) else {
                continue;
            };

            for peer in registry.peers(node) {
                if peer == visit.from {
                    continue;
                }
                if peer == battery {
                    tracing::trace!(%battery, via = %node, "returned to battery");
                    return true;
                }
                if !self.conducts(registry, peer) {
                    continue;
                }

                match reached.get(&peer) {
                    Some(other) if other.branch != visit.branch => {
                        tracing::trace!(%battery, a = %node, b = %peer, "branches meet");
                        return true;
                    }
                    Some(_) => {}
                    None => {
                        reached.insert(
                            peer,
                            Visit {
                                branch: visit.branch,
                                from: node,
                            },
                        );
                        queue.push_back(peer);
                    }
                }
            }
        }

        false
    }

    fn conducts(&self, registry: &ComponentRegistry, id: ComponentId) -> bool {
        match self.switch_conduction {
            SwitchConduction::IgnoreState => true,
            SwitchConduction::OpenSwitchBreaks => registry
                .get(id)
                .map_or(false, |component| !component.is_open_switch()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::ComponentKind;

    fn chain(reg: &mut ComponentRegistry, ids: &[ComponentId]) {
        for pair in ids.windows(2) {
            reg.connect(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_single_edge_is_not_a_loop() {
        let mut reg = ComponentRegistry::new();
        let bat = reg.add(ComponentKind::Battery, 0.0, 0.0).id;
        let wire = reg.add(ComponentKind::Wire, 0.0, 0.0).id;
        reg.connect(bat, wire);

        assert!(!ConnectivityAnalyzer::default().is_closed(&reg, bat));
    }

    #[test]
    fn test_dead_end_chain_is_open() {
        let mut reg = ComponentRegistry::new();
        let bat = reg.add(ComponentKind::Battery, 0.0, 0.0).id;
        let wire = reg.add(ComponentKind::Wire, 0.0, 0.0).id;
        let bulb = reg.add(ComponentKind::Bulb, 0.0, 0.0).id;
        chain(&mut reg, &[bat, wire, bulb]);

        assert!(!ConnectivityAnalyzer::default().is_closed(&reg, bat));
    }

    #[test]
    fn test_ring_through_battery_is_closed() {
        let mut reg = ComponentRegistry::new();
        let bat = reg.add(ComponentKind::Battery, 0.0, 0.0).id;
        let w1 = reg.add(ComponentKind::Wire, 0.0, 0.0).id;
        let bulb = reg.add(ComponentKind::Bulb, 0.0, 0.0).id;
        let w2 = reg.add(ComponentKind::Wire, 0.0, 0.0).id;
        chain(&mut reg, &[bat, w1, bulb, w2, bat]);

        assert!(ConnectivityAnalyzer::default().is_closed(&reg, bat));
    }

    #[test]
    fn test_loop_away_from_battery_is_open() {
        // battery hangs off a triangle that doesn't include it
        let mut reg = ComponentRegistry::new();
        let bat = reg.add(ComponentKind::Battery, 0.0, 0.0).id;
        let a = reg.add(ComponentKind::Wire, 0.0, 0.0).id;
        let b = reg.add(ComponentKind::Bulb, 0.0, 0.0).id;
        let c = reg.add(ComponentKind::Wire, 0.0, 0.0).id;
        chain(&mut reg, &[bat, a, b, c, a]);

        assert!(!ConnectivityAnalyzer::default().is_closed(&reg, bat));
    }

    #[test]
    fn test_unknown_or_isolated_battery() {
        let mut reg = ComponentRegistry::new();
        let bat = reg.add(ComponentKind::Battery, 0.0, 0.0).id;
        let analyzer = ConnectivityAnalyzer::default();

        assert!(!analyzer.is_closed(&reg, bat));
        assert!(!analyzer.is_closed(&reg, ComponentId(404)));
    }

    #[test]
    fn test_open_switch_only_breaks_when_gated() {
        let mut reg = ComponentRegistry::new();
        let bat = reg.add(ComponentKind::Battery, 0.0, 0.0).id;
        let bulb = reg.add(ComponentKind::Bulb, 0.0, 0.0).id;
        let sw = reg.add(ComponentKind::Switch, 0.0, 0.0).id;
        let wire = reg.add(ComponentKind::Wire, 0.0, 0.0).id;
        chain(&mut reg, &[bat, bulb, sw, wire, bat]);

        let gated = ConnectivityAnalyzer::new(SwitchConduction::OpenSwitchBreaks);
        assert!(ConnectivityAnalyzer::default().is_closed(&reg, bat));
        assert!(!gated.is_closed(&reg, bat));

        reg.set_switch(sw, true);
        assert!(gated.is_closed(&reg, bat));
    }

    #[test]
    fn test_open_switch_bypassed_by_parallel_wire() {
        let mut reg = ComponentRegistry::new();
        let bat = reg.add(ComponentKind::Battery, 0.0, 0.0).id;
        let bulb = reg.add(ComponentKind::Bulb, 0.0, 0.0).id;
        let sw = reg.add(ComponentKind::Switch, 0.0, 0.0).id;
        let bypass = reg.add(ComponentKind::Wire, 0.0, 0.0).id;
        chain(&mut reg, &[bat, bulb, sw, bat]);
        chain(&mut reg, &[bulb, bypass, bat]);

        let gated = ConnectivityAnalyzer::new(SwitchConduction::OpenSwitchBreaks);
        assert!(gated.is_closed(&reg, bat));
    }
}
