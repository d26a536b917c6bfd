//! # Circuit Lab
//!
//! The circuit engine behind a hands-on electricity lab, where students
//! place batteries, bulbs, switches and wires and wire them together.
//!
//! This library provides:
//! - An id-keyed component graph with symmetric connections
//! - Closed-loop detection through the battery
//! - Series/parallel classification of the bulb wiring
//! - A simplified current/voltage reading and bulb on/off state
//! - A small script language for replaying lab scenarios
//!
//! ## Architecture
//!
//! - [`circuit`] - Components, ids and the [`ComponentRegistry`]
//! - [`analysis`] - The three analysis stages and the [`Analyzer`] façade
//! - [`simulator`] - [`CircuitSimulator`], one lab session's engine
//! - [`dsl`] - Parser for lab scripts
//! - [`runner`] - Executes lab scripts against a simulator
//!
//! ## Usage
//!
//! ### Native
//!
//! ```
//! use circuit_lab::{CircuitSimulator, ComponentKind, Topology};
//!
//! let mut sim = CircuitSimulator::new();
//! let battery = sim.add_component(ComponentKind::Battery, 0.0, 0.0).id;
//! let bulb = sim.add_component(ComponentKind::Bulb, 100.0, 0.0).id;
//! let wire = sim.add_component(ComponentKind::Wire, 50.0, 50.0).id;
//! sim.connect(battery, bulb);
//! sim.connect(bulb, wire);
//! sim.connect(wire, battery);
//!
//! let state = sim.analyze();
//! assert!(state.closed);
//! assert_eq!(state.topology, Topology::Simple);
//! ```
//!
//! ### CLI
//!
//! ```bash
//! RUST_LOG=circuit_lab=debug circuit-lab series.lab --json
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmCircuitLab } from 'circuit_lab';
//!
//! const lab = new WasmCircuitLab();
//! const battery = lab.add_component('battery', 40, 40);
//! const state = JSON.parse(lab.analyze());
//! ```
//!
//! ## Analysis Model
//!
//! Every call to `analyze` re-derives everything from the current graph;
//! there is no cached state between calls. The reading is deliberately
//! simple: a fixed 9 V battery and a fixed current per topology, not a
//! solution of Ohm's or Kirchhoff's laws.

pub mod analysis;
pub mod circuit;
pub mod dsl;
pub mod error;
pub mod runner;
pub mod simulator;

// Re-export main types for convenience
pub use analysis::{Analyzer, AnalyzerConfig, CircuitState, StepExpectation, SwitchConduction, Topology};
pub use circuit::{Component, ComponentId, ComponentKind, ComponentRegistry, ComponentState};
pub use error::{LabError, Result};
pub use simulator::CircuitSimulator;

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmCircuitLab;
