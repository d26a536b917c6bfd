//! Abstract Syntax Tree types for lab scripts.

use crate::analysis::{StepExpectation, SwitchConduction};
use crate::circuit::ComponentKind;

/// A parsed lab script: statements in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabScript {
    pub statements: Vec<Statement>,
}

impl LabScript {
    /// Create a new empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the script records any snapshot explicitly.
    pub fn has_analyze(&self) -> bool {
        self.statements
            .iter()
            .any(|s| matches!(s.kind, StatementKind::Analyze))
    }
}

/// One script line.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    /// Source line number for error reporting
    pub line: usize,
}

/// What a script line does.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `<kind> <name> [x y] [open|closed]`
    Place {
        kind: ComponentKind,
        name: String,
        x: f64,
        y: f64,
        /// Initial switch position; only valid for switches
        closed: Option<bool>,
    },
    /// `connect <a> <b>`
    Connect { a: String, b: String },
    /// `disconnect <a> <b>`
    Disconnect { a: String, b: String },
    /// `move <name> <x> <y>`
    Move { name: String, x: f64, y: f64 },
    /// `remove <name>`
    Remove { name: String },
    /// `toggle <name>`
    Toggle { name: String },
    /// `.switches ignore|gate`
    Switches(SwitchConduction),
    /// `.analyze`
    Analyze,
    /// `.expect [topology=<t>] [closed=<bool>]`
    Expect(StepExpectation),
    /// `.clear`
    Clear,
}
