//! The mutable component graph of one lab session.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::types::{ComponentId, ComponentKind, ComponentState, Position};

/// One placed circuit element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    pub id: ComponentId,
    pub kind: ComponentKind,
    pub position: Position,
    /// Ids of the components this one is wired to
    pub peers: BTreeSet<ComponentId>,
    /// Bulb on/off or switch open/closed; `None` for batteries and wires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ComponentState>,
}

impl Component {
    fn new(id: ComponentId, kind: ComponentKind, position: Position) -> Self {
        Self {
            id,
            kind,
            position,
            peers: BTreeSet::new(),
            state: kind.initial_state(),
        }
    }

    /// Check whether this component is wired directly to `other`.
    pub fn is_connected_to(&self, other: ComponentId) -> bool {
        self.peers.contains(&other)
    }

    /// True for a switch whose state is `Open`.
    pub fn is_open_switch(&self) -> bool {
        self.kind == ComponentKind::Switch && self.state == Some(ComponentState::Open)
    }
}

/// Owner of every component and connection.
///
/// Components live in an id-keyed map and connections are stored as id sets
/// on both endpoints. Ids come from a counter and are allocated in creation
/// order, so iterating the map yields components oldest first.
///
/// Nothing here fails: unknown ids make mutations a no-op (reported as
/// `false`) and lookups return `None`.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: BTreeMap<ComponentId, Component>,
    next_id: u64,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a new component and return a copy of it.
    pub fn add(&mut self, kind: ComponentKind, x: f64, y: f64) -> Component {
        let id = ComponentId(self.next_id);
        self.next_id += 1;

        let component = Component::new(id, kind, Position::new(x, y));
        tracing::debug!(%id, %kind, x, y, "component added");
        self.components.insert(id, component.clone());
        component
    }

    /// Remove a component and strip it from every peer set.
    ///
    /// Returns `false` if the id is unknown.
    pub fn remove(&mut self, id: ComponentId) -> bool {
        let Some(removed) = self.components.remove(&id) else {
            tracing::trace!(%id, "remove ignored: unknown id");
            return false;
        };

        for peer in &removed.peers {
            if let Some(component) = self.components.get_mut(peer) {
                component.peers.remove(&id);
            }
        }

        tracing::debug!(%id, kind = %removed.kind, peers = removed.peers.len(), "component removed");
        true
    }

    /// Look up a component.
    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id)
    }

    /// Copy of every component, oldest first.
    pub fn all(&self) -> Vec<Component> {
        self.components.values().cloned().collect()
    }

    /// Iterate over components without copying, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// Update a component's canvas position.
    pub fn move_component(&mut self, id: ComponentId, x: f64, y: f64) -> bool {
        match self.components.get_mut(&id) {
            Some(component) => {
                component.position = Position::new(x, y);
                tracing::trace!(%id, x, y, "component moved");
                true
            }
            None => false,
        }
    }

    /// Wire two components together.
    ///
    /// Returns `true` only when a new connection was made. Connecting an
    /// already connected pair, a component to itself, or an unknown id is a
    /// no-op.
    pub fn connect(&mut self, a: ComponentId, b: ComponentId) -> bool {
        if a == b || !self.components.contains_key(&a) || !self.components.contains_key(&b) {
            tracing::trace!(%a, %b, "connect ignored");
            return false;
        }

        let added = self
            .components
            .get_mut(&a)
            .map_or(false, |c| c.peers.insert(b));
        if let Some(c) = self.components.get_mut(&b) {
            c.peers.insert(a);
        }

        if added {
            tracing::debug!(%a, %b, "components connected");
        }
        added
    }

    /// Remove the wire between two components, if there is one.
    pub fn disconnect(&mut self, a: ComponentId, b: ComponentId) -> bool {
        if !self.components.contains_key(&a) || !self.components.contains_key(&b) {
            tracing::trace!(%a, %b, "disconnect ignored");
            return false;
        }

        let removed = self
            .components
            .get_mut(&a)
            .map_or(false, |c| c.peers.remove(&b));
        if let Some(c) = self.components.get_mut(&b) {
            c.peers.remove(&a);
        }

        if removed {
            tracing::debug!(%a, %b, "components disconnected");
        }
        removed
    }

    /// Set a switch open or closed. No-op for anything but a switch.
    pub fn set_switch(&mut self, id: ComponentId, closed: bool) -> bool {
        match self.components.get_mut(&id) {
            Some(component) if component.kind == ComponentKind::Switch => {
                let state = if closed {
                    ComponentState::Closed
                } else {
                    ComponentState::Open
                };
                component.state = Some(state);
                tracing::debug!(%id, ?state, "switch set");
                true
            }
            _ => false,
        }
    }

    /// Flip a switch between open and closed.
    pub fn toggle_switch(&mut self, id: ComponentId) -> bool {
        let closed = match self.components.get(&id) {
            Some(component) if component.kind == ComponentKind::Switch => component.is_open_switch(),
            _ => return false,
        };
        self.set_switch(id, closed)
    }

    /// Write the derived on/off state onto every bulb.
    ///
    /// Only the electrical model calls this; switch state is never touched.
    pub(crate) fn set_bulb_states(&mut self, lit: bool) {
        let state = if lit {
            ComponentState::On
        } else {
            ComponentState::Off
        };
        for component in self.components.values_mut() {
            if component.kind == ComponentKind::Bulb {
                component.state = Some(state);
            }
        }
    }

    /// Remove every component. Id allocation carries on where it left off.
    pub fn clear(&mut self) {
        tracing::debug!(removed = self.components.len(), "registry cleared");
        self.components.clear();
    }

    /// Number of live components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if there are no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Number of live components of one kind.
    pub fn count(&self, kind: ComponentKind) -> usize {
        self.iter().filter(|c| c.kind == kind).count()
    }

    /// Ids of every component of one kind, oldest first.
    pub fn ids_of(&self, kind: ComponentKind) -> Vec<ComponentId> {
        self.iter().filter(|c| c.kind == kind).map(|c| c.id).collect()
    }

    /// The oldest component of one kind.
    pub fn first_of(&self, kind: ComponentKind) -> Option<ComponentId> {
        self.iter().find(|c| c.kind == kind).map(|c| c.id)
    }

    /// Direct neighbours of a component. Empty for unknown ids.
    pub fn peers(&self, id: ComponentId) -> impl Iterator<Item = ComponentId> + '_ {
        self.components
            .get(&id)
            .into_iter()
            .flat_map(|c| c.peers.iter().copied())
    }

    /// Add a one-sided peer entry, bypassing symmetry. Test use only.
    #[cfg(test)]
    pub(crate) fn insert_raw_peer(&mut self, a: ComponentId, b: ComponentId) {
        if let Some(c) = self.components.get_mut(&a) {
            c.peers.insert(b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::validate_registry;
    use proptest::prelude::*;

    #[test]
    fn test_add_assigns_fresh_ids_and_initial_state() {
        let mut reg = ComponentRegistry::new();
        let bat = reg.add(ComponentKind::Battery, 0.0, 0.0);
        let bulb = reg.add(ComponentKind::Bulb, 10.0, 0.0);
        let sw = reg.add(ComponentKind::Switch, 20.0, 0.0);

        assert_ne!(bat.id, bulb.id);
        assert_ne!(bulb.id, sw.id);
        assert_eq!(bat.state, None);
        assert_eq!(bulb.state, Some(ComponentState::Off));
        assert_eq!(sw.state, Some(ComponentState::Open));
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn test_ids_never_reused() {
        let mut reg = ComponentRegistry::new();
        let first = reg.add(ComponentKind::Wire, 0.0, 0.0).id;
        reg.remove(first);
        reg.clear();
        let second = reg.add(ComponentKind::Wire, 0.0, 0.0).id;
        assert!(second > first);
    }

    #[test]
    fn test_connect_is_symmetric_and_idempotent() {
        let mut reg = ComponentRegistry::new();
        let a = reg.add(ComponentKind::Battery, 0.0, 0.0).id;
        let b = reg.add(ComponentKind::Wire, 0.0, 0.0).id;

        assert!(reg.connect(a, b));
        assert!(!reg.connect(a, b));
        assert!(!reg.connect(b, a));

        assert!(reg.get(a).unwrap().is_connected_to(b));
        assert!(reg.get(b).unwrap().is_connected_to(a));
        assert_eq!(reg.get(a).unwrap().peers.len(), 1);
    }

    #[test]
    fn test_connect_unknown_or_self_is_noop() {
        let mut reg = ComponentRegistry::new();
        let a = reg.add(ComponentKind::Wire, 0.0, 0.0).id;

        assert!(!reg.connect(a, ComponentId(999)));
        assert!(!reg.connect(a, a));
        assert!(reg.get(a).unwrap().peers.is_empty());
    }

    #[test]
    fn test_disconnect() {
        let mut reg = ComponentRegistry::new();
        let a = reg.add(ComponentKind::Wire, 0.0, 0.0).id;
        let b = reg.add(ComponentKind::Wire, 0.0, 0.0).id;
        reg.connect(a, b);

        assert!(reg.disconnect(b, a));
        assert!(!reg.disconnect(a, b));
        assert!(reg.get(a).unwrap().peers.is_empty());
        assert!(reg.get(b).unwrap().peers.is_empty());
    }

    #[test]
    fn test_remove_strips_peers() {
        let mut reg = ComponentRegistry::new();
        let a = reg.add(ComponentKind::Battery, 0.0, 0.0).id;
        let b = reg.add(ComponentKind::Wire, 0.0, 0.0).id;
        let c = reg.add(ComponentKind::Bulb, 0.0, 0.0).id;
        reg.connect(a, b);
        reg.connect(b, c);
        reg.connect(c, a);

        assert!(reg.remove(b));
        assert!(!reg.remove(b));
        assert!(reg.get(b).is_none());
        assert!(reg.iter().all(|comp| !comp.peers.contains(&b)));
        assert!(reg.get(a).unwrap().is_connected_to(c));
    }

    #[test]
    fn test_all_is_a_copy() {
        let mut reg = ComponentRegistry::new();
        let a = reg.add(ComponentKind::Wire, 0.0, 0.0).id;

        let mut snapshot = reg.all();
        snapshot[0].position = Position::new(99.0, 99.0);
        snapshot.clear();

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get(a).unwrap().position, Position::new(0.0, 0.0));
    }

    #[test]
    fn test_move_component() {
        let mut reg = ComponentRegistry::new();
        let a = reg.add(ComponentKind::Bulb, 1.0, 2.0).id;

        assert!(reg.move_component(a, 5.0, 6.0));
        assert!(!reg.move_component(ComponentId(77), 5.0, 6.0));
        assert_eq!(reg.get(a).unwrap().position, Position::new(5.0, 6.0));
    }

    #[test]
    fn test_switch_toggle_only_affects_switches() {
        let mut reg = ComponentRegistry::new();
        let sw = reg.add(ComponentKind::Switch, 0.0, 0.0).id;
        let bulb = reg.add(ComponentKind::Bulb, 0.0, 0.0).id;

        assert!(reg.toggle_switch(sw));
        assert_eq!(reg.get(sw).unwrap().state, Some(ComponentState::Closed));
        assert!(reg.toggle_switch(sw));
        assert_eq!(reg.get(sw).unwrap().state, Some(ComponentState::Open));

        assert!(!reg.toggle_switch(bulb));
        assert!(!reg.set_switch(bulb, true));
        assert_eq!(reg.get(bulb).unwrap().state, Some(ComponentState::Off));
    }

    #[test]
    fn test_bulb_states_leave_switches_alone() {
        let mut reg = ComponentRegistry::new();
        let sw = reg.add(ComponentKind::Switch, 0.0, 0.0).id;
        let bulb = reg.add(ComponentKind::Bulb, 0.0, 0.0).id;
        reg.set_switch(sw, true);

        reg.set_bulb_states(true);
        assert_eq!(reg.get(bulb).unwrap().state, Some(ComponentState::On));
        reg.set_bulb_states(false);
        assert_eq!(reg.get(bulb).unwrap().state, Some(ComponentState::Off));
        assert_eq!(reg.get(sw).unwrap().state, Some(ComponentState::Closed));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8),
        Remove(usize),
        Connect(usize, usize),
        Disconnect(usize, usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..4).prop_map(Op::Add),
            (0usize..16).prop_map(Op::Remove),
            (0usize..16, 0usize..16).prop_map(|(a, b)| Op::Connect(a, b)),
            (0usize..16, 0usize..16).prop_map(|(a, b)| Op::Disconnect(a, b)),
        ]
    }

    proptest! {
        #[test]
        fn prop_invariants_hold_after_any_mutations(ops in prop::collection::vec(op(), 0..64)) {
            let kinds = [
                ComponentKind::Battery,
                ComponentKind::Bulb,
                ComponentKind::Switch,
                ComponentKind::Wire,
            ];
            let mut reg = ComponentRegistry::new();
            // Ids ever handed out, including removed ones, so ops also hit stale ids.
            let mut issued: Vec<ComponentId> = Vec::new();
            let pick = |issued: &[ComponentId], i: usize| issued.get(i % issued.len().max(1)).copied();

            for op in ops {
                match op {
                    Op::Add(k) => issued.push(reg.add(kinds[k as usize], 0.0, 0.0).id),
                    Op::Remove(i) => {
                        if let Some(id) = pick(&issued, i) {
                            reg.remove(id);
                            prop_assert!(reg.iter().all(|c| !c.peers.contains(&id)));
                        }
                    }
                    Op::Connect(a, b) => {
                        if let (Some(a), Some(b)) = (pick(&issued, a), pick(&issued, b)) {
                            reg.connect(a, b);
                        }
                    }
                    Op::Disconnect(a, b) => {
                        if let (Some(a), Some(b)) = (pick(&issued, a), pick(&issued, b)) {
                            reg.disconnect(a, b);
                        }
                    }
                }
                prop_assert!(validate_registry(&reg).is_ok());
            }
        }
    }
}
