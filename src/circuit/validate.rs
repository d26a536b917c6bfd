//! Registry invariant validation.

use crate::error::{LabError, Result};

use super::ComponentRegistry;

/// Validate the structural invariants of a registry.
///
/// Checks:
/// - Every connection is recorded on both endpoints
/// - No peer set refers to a removed component
///
/// The registry upholds these itself; this is for frontends and tests that
/// want to assert it after a sequence of edits.
pub fn validate_registry(registry: &ComponentRegistry) -> Result<()> {
    for component in registry.iter() {
        for &peer in &component.peers {
            let Some(other) = registry.get(peer) else {
                return Err(LabError::DanglingPeer {
                    component: component.id,
                    peer,
                });
            };
            if !other.is_connected_to(component.id) {
                return Err(LabError::AsymmetricConnection {
                    from: component.id,
                    to: peer,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{ComponentId, ComponentKind};

    #[test]
    fn test_valid_registry() {
        let mut reg = ComponentRegistry::new();
        let a = reg.add(ComponentKind::Battery, 0.0, 0.0).id;
        let b = reg.add(ComponentKind::Bulb, 0.0, 0.0).id;
        reg.connect(a, b);
        assert!(validate_registry(&reg).is_ok());
    }

    #[test]
    fn test_detects_asymmetric_connection() {
        let mut reg = ComponentRegistry::new();
        let a = reg.add(ComponentKind::Wire, 0.0, 0.0).id;
        let b = reg.add(ComponentKind::Wire, 0.0, 0.0).id;
        reg.insert_raw_peer(a, b);

        let err = validate_registry(&reg).unwrap_err();
        assert!(matches!(err, LabError::AsymmetricConnection { from, to } if from == a && to == b));
    }

    #[test]
    fn test_detects_dangling_peer() {
        let mut reg = ComponentRegistry::new();
        let a = reg.add(ComponentKind::Wire, 0.0, 0.0).id;
        reg.insert_raw_peer(a, ComponentId(500));

        let err = validate_registry(&reg).unwrap_err();
        assert!(matches!(err, LabError::DanglingPeer { peer, .. } if peer == ComponentId(500)));
    }
}
