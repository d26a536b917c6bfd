//! Lab script language.
//!
//! A small line-oriented language for building a circuit step by step and
//! checking the analysis along the way. Scripts drive the CLI and make
//! lab scenarios easy to write down in tests.
//!
//! # Grammar Overview
//!
//! ```text
//! script     = { line }
//! line       = comment | directive | command | place | empty
//! comment    = ('#' | ';') { any_char }
//! place      = kind name [number number] ['open' | 'closed']
//! command    = 'connect' name name
//!            | 'disconnect' name name
//!            | 'move' name number number
//!            | 'remove' name
//!            | 'toggle' name
//! directive  = '.analyze'
//!            | '.clear'
//!            | '.switches' ('ignore' | 'gate')
//!            | '.expect' { key '=' value }
//!
//! kind       = 'battery' | 'bulb' | 'switch' | 'wire'
//! name       = (letter | '_') { letter | digit | '_' | '-' }
//! ```
//!
//! # Example
//!
//! ```text
//! # Two bulbs in series
//! battery B 0 0
//! bulb L1 100 0
//! bulb L2 200 0
//! connect B L1
//! connect L1 L2
//! connect L2 B
//! .expect topology=series closed=true
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::{LabError, Result};

/// Parse a lab script string.
pub fn parse(input: &str) -> Result<LabScript> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer);
    parser.parse()
}

/// Parse a lab script file.
pub fn parse_file(path: &std::path::Path) -> Result<LabScript> {
    let content = std::fs::read_to_string(path).map_err(|e| LabError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
