//! WASM bindings for Circuit Lab.
//!
//! This module exposes the circuit engine to the browser lab UI. Component
//! ids cross the boundary as strings (`"C12"`), and snapshots as JSON.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCircuitLab } from 'circuit_lab';
//!
//! await init();
//!
//! const lab = new WasmCircuitLab();
//! const battery = lab.add_component('battery', 40, 40);
//! const bulb = lab.add_component('bulb', 160, 40);
//! lab.connect(battery, bulb);
//!
//! const state = JSON.parse(lab.analyze());
//! console.log(state.topology, state.closed);
//! ```

use std::str::FromStr;

use wasm_bindgen::prelude::*;

use crate::analysis::SwitchConduction;
use crate::circuit::{ComponentId, ComponentKind};
use crate::error::LabError;
use crate::simulator::CircuitSimulator;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: LabError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_id(id: &str) -> Result<ComponentId, JsValue> {
    ComponentId::from_str(id).map_err(|_| {
        to_js(LabError::WasmError {
            message: format!("invalid component id '{}'", id),
        })
    })
}

/// One lab session's circuit, driven from JavaScript.
#[wasm_bindgen]
pub struct WasmCircuitLab {
    simulator: CircuitSimulator,
}

#[wasm_bindgen]
impl WasmCircuitLab {
    /// Create an empty lab with default analysis settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmCircuitLab {
        WasmCircuitLab {
            simulator: CircuitSimulator::new(),
        }
    }

    /// Place a component and return its id.
    ///
    /// # Arguments
    /// * `kind` - `battery`, `bulb`, `switch` or `wire`
    /// * `x`, `y` - Canvas position
    #[wasm_bindgen]
    pub fn add_component(&mut self, kind: &str, x: f64, y: f64) -> Result<String, JsValue> {
        let kind = ComponentKind::from_keyword(kind).ok_or_else(|| {
            to_js(LabError::WasmError {
                message: format!("unknown component kind '{}'", kind),
            })
        })?;
        Ok(self.simulator.add_component(kind, x, y).id.to_string())
    }

    /// Remove a component and its wires. Returns false if the id is unknown.
    #[wasm_bindgen]
    pub fn remove_component(&mut self, id: &str) -> Result<bool, JsValue> {
        Ok(self.simulator.remove_component(parse_id(id)?))
    }

    #[wasm_bindgen]
    pub fn connect(&mut self, a: &str, b: &str) -> Result<bool, JsValue> {
        Ok(self.simulator.connect(parse_id(a)?, parse_id(b)?))
    }

    #[wasm_bindgen]
    pub fn disconnect(&mut self, a: &str, b: &str) -> Result<bool, JsValue> {
        Ok(self.simulator.disconnect(parse_id(a)?, parse_id(b)?))
    }

    #[wasm_bindgen]
    pub fn move_component(&mut self, id: &str, x: f64, y: f64) -> Result<bool, JsValue> {
        Ok(self.simulator.move_component(parse_id(id)?, x, y))
    }

    /// Flip a switch. Returns false if the id is not a switch.
    #[wasm_bindgen]
    pub fn toggle_switch(&mut self, id: &str) -> Result<bool, JsValue> {
        Ok(self.simulator.toggle_switch(parse_id(id)?))
    }

    /// Remove every component.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.simulator.reset();
    }

    /// Choose whether open switches break the circuit.
    #[wasm_bindgen]
    pub fn set_gate_switches(&mut self, gate: bool) {
        let conduction = if gate {
            SwitchConduction::OpenSwitchBreaks
        } else {
            SwitchConduction::IgnoreState
        };
        let config = self.simulator.config().clone().with_switch_conduction(conduction);
        self.simulator.set_config(config);
    }

    #[wasm_bindgen(getter)]
    pub fn component_count(&self) -> usize {
        self.simulator.registry().len()
    }

    /// Every component as a JSON array, without analyzing.
    #[wasm_bindgen]
    pub fn components_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.simulator.components()).map_err(|e| to_js(e.into()))
    }

    /// Run a full analysis pass and return the snapshot as JSON.
    #[wasm_bindgen]
    pub fn analyze(&mut self) -> Result<String, JsValue> {
        self.simulator.analyze().to_json().map_err(|e| to_js(e.into()))
    }
}

impl Default for WasmCircuitLab {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
