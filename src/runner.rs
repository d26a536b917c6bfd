//! Lab script execution.
//!
//! Binds script-local names to generated component ids and replays each
//! statement against a [`CircuitSimulator`], the same way the lab UI drives
//! the engine: mutate, then analyze.

use std::collections::HashMap;

use crate::analysis::{AnalyzerConfig, CircuitState};
use crate::circuit::ComponentId;
use crate::dsl::{LabScript, Statement, StatementKind};
use crate::error::{LabError, Result};
use crate::simulator::CircuitSimulator;

/// A snapshot recorded while running a script.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Line of the `.analyze` that recorded it; `None` for the implicit
    /// end-of-script pass
    pub line: Option<usize>,
    pub state: CircuitState,
}

/// Replays lab scripts against one simulator.
#[derive(Debug, Default)]
pub struct ScriptRunner {
    simulator: CircuitSimulator,
    names: HashMap<String, ComponentId>,
}

impl ScriptRunner {
    /// Create a runner with an empty circuit.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            simulator: CircuitSimulator::with_config(config),
            names: HashMap::new(),
        }
    }

    /// Run every statement in order.
    ///
    /// Returns one snapshot per `.analyze`, or a single final snapshot if
    /// the script has none.
    pub fn run(&mut self, script: &LabScript) -> Result<Vec<Snapshot>> {
        let mut snapshots = Vec::new();
        for statement in &script.statements {
            if let Some(snapshot) = self.execute(statement)? {
                snapshots.push(snapshot);
            }
        }

        if !script.has_analyze() {
            snapshots.push(Snapshot {
                line: None,
                state: self.simulator.analyze(),
            });
        }
        Ok(snapshots)
    }

    /// Run one statement.
    pub fn execute(&mut self, statement: &Statement) -> Result<Option<Snapshot>> {
        let line = statement.line;

        match &statement.kind {
            StatementKind::Place {
                kind,
                name,
                x,
                y,
                closed,
            } => {
                if self.names.contains_key(name) {
                    return Err(LabError::DuplicateComponent {
                        name: name.clone(),
                        line,
                    });
                }
                let id = self.simulator.add_component(*kind, *x, *y).id;
                if let Some(closed) = closed {
                    self.simulator.set_switch(id, *closed);
                }
                self.names.insert(name.clone(), id);
            }
            StatementKind::Connect { a, b } => {
                let (a, b) = (self.resolve(a, line)?, self.resolve(b, line)?);
                self.simulator.connect(a, b);
            }
            StatementKind::Disconnect { a, b } => {
                let (a, b) = (self.resolve(a, line)?, self.resolve(b, line)?);
                self.simulator.disconnect(a, b);
            }
            StatementKind::Move { name, x, y } => {
                let id = self.resolve(name, line)?;
                self.simulator.move_component(id, *x, *y);
            }
            StatementKind::Remove { name } => {
                let id = self.resolve(name, line)?;
                self.simulator.remove_component(id);
                self.names.remove(name);
            }
            StatementKind::Toggle { name } => {
                let id = self.resolve(name, line)?;
                if !self.simulator.toggle_switch(id) {
                    return Err(LabError::invalid_argument(line, format!("'{}' is not a switch", name)));
                }
            }
            StatementKind::Switches(conduction) => {
                let config = self.simulator.config().clone().with_switch_conduction(*conduction);
                self.simulator.set_config(config);
            }
            StatementKind::Analyze => {
                return Ok(Some(Snapshot {
                    line: Some(line),
                    state: self.simulator.analyze(),
                }));
            }
            StatementKind::Expect(expectation) => {
                let state = self.simulator.analyze();
                if !expectation.is_met(&state) {
                    return Err(LabError::UnmetExpectation {
                        line,
                        expected: expectation.to_string(),
                        topology: state.topology,
                        closed: state.closed,
                    });
                }
                tracing::info!(line, %expectation, "expectation met");
            }
            StatementKind::Clear => {
                self.simulator.reset();
                self.names.clear();
            }
        }

        Ok(None)
    }

    /// The id bound to a script name.
    pub fn id_of(&self, name: &str) -> Option<ComponentId> {
        self.names.get(name).copied()
    }

    /// Get a reference to the simulator.
    pub fn simulator(&self) -> &CircuitSimulator {
        &self.simulator
    }

    fn resolve(&self, name: &str, line: usize) -> Result<ComponentId> {
        self.id_of(name)
            .ok_or_else(|| LabError::unknown_component(name, line))
    }
}

/// Run an already parsed script on a fresh circuit.
pub fn run_script(script: &LabScript, config: AnalyzerConfig) -> Result<Vec<Snapshot>> {
    ScriptRunner::new(config).run(script)
}
