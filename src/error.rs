//! Error types for the circuit lab.
//!
//! The circuit core itself never fails: unknown ids degrade to no-ops and
//! analysis is total. [`LabError`] covers the layers wrapped around it:
//! lab script parsing and execution, invariant validation, and the CLI and
//! WASM frontends.

use thiserror::Error;

use crate::analysis::Topology;
use crate::circuit::ComponentId;

/// Result type alias using [`LabError`].
pub type Result<T> = std::result::Result<T, LabError>;

/// Unified error type for all lab operations outside the core.
#[derive(Error, Debug)]
pub enum LabError {
    // ============ Script Parsing Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Unknown component kind keyword
    #[error("Unknown component kind '{kind}' at line {line}")]
    UnknownComponentKind { kind: String, line: usize },

    // ============ Script Execution Errors ============
    /// A statement names a component that was never placed (or was removed)
    #[error("Unknown component '{name}' at line {line}")]
    UnknownComponent { name: String, line: usize },

    /// A live component name was placed a second time
    #[error("Duplicate component name '{name}' at line {line}")]
    DuplicateComponent { name: String, line: usize },

    /// Invalid argument to an operation
    #[error("Invalid argument at line {line}: {message}")]
    InvalidArgument { line: usize, message: String },

    /// A `.expect` directive did not match the snapshot
    #[error(
        "Expectation failed at line {line}: expected {expected}, got topology={topology} closed={closed}"
    )]
    UnmetExpectation {
        line: usize,
        expected: String,
        topology: Topology,
        closed: bool,
    },

    // ============ Registry Invariant Errors ============
    /// A connection is recorded on one endpoint only
    #[error("Connection {from} -> {to} has no matching {to} -> {from}")]
    AsymmetricConnection { from: ComponentId, to: ComponentId },

    /// A peer set refers to a component that no longer exists
    #[error("Component {component} lists missing peer {peer}")]
    DanglingPeer {
        component: ComponentId,
        peer: ComponentId,
    },

    // ============ I/O Errors ============
    /// Error reading a lab script file
    #[error("Failed to read lab script '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a snapshot
    #[error("Output error: {message}")]
    OutputError { message: String },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl LabError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an unknown component error
    pub fn unknown_component(name: impl Into<String>, line: usize) -> Self {
        Self::UnknownComponent {
            name: name.into(),
            line,
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            line,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for LabError {
    fn from(e: serde_json::Error) -> Self {
        Self::OutputError {
            message: e.to_string(),
        }
    }
}
