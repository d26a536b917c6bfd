//! Parser for lab scripts.

use super::ast::*;
use super::lexer::{Lexer, Token, TokenKind};
use crate::analysis::{StepExpectation, SwitchConduction, Topology};
use crate::circuit::ComponentKind;
use crate::error::{LabError, Result};

/// Parser for lab scripts.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            current: Token {
                kind: TokenKind::Newline,
                text: String::new(),
                line: 1,
                column: 1,
            },
        }
    }

    /// Parse the entire script.
    pub fn parse(&mut self) -> Result<LabScript> {
        let mut script = LabScript::new();
        self.advance()?;

        while self.current.kind != TokenKind::Eof {
            // Skip empty lines
            if self.current.kind == TokenKind::Newline {
                self.advance()?;
                continue;
            }

            let statement = match self.current.kind {
                TokenKind::Directive => self.parse_directive()?,
                TokenKind::Identifier => self.parse_command()?,
                _ => {
                    return Err(LabError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            };
            script.statements.push(statement);

            match self.current.kind {
                TokenKind::Newline => self.advance()?,
                TokenKind::Eof => {}
                _ => {
                    return Err(LabError::parse(
                        self.current.line,
                        format!("unexpected trailing token: {:?}", self.current.text),
                    ));
                }
            }
        }

        Ok(script)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(LabError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    fn name(&mut self) -> Result<String> {
        Ok(self.expect(TokenKind::Identifier)?.text)
    }

    fn number(&mut self) -> Result<f64> {
        let tok = self.expect(TokenKind::Number)?;
        tok.text
            .parse()
            .map_err(|_| LabError::parse(tok.line, format!("invalid number: {}", tok.text)))
    }

    fn parse_command(&mut self) -> Result<Statement> {
        let word = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        let kind = match word.to_ascii_lowercase().as_str() {
            "connect" => StatementKind::Connect {
                a: self.name()?,
                b: self.name()?,
            },
            "disconnect" => StatementKind::Disconnect {
                a: self.name()?,
                b: self.name()?,
            },
            "move" => StatementKind::Move {
                name: self.name()?,
                x: self.number()?,
                y: self.number()?,
            },
            "remove" => StatementKind::Remove { name: self.name()? },
            "toggle" => StatementKind::Toggle { name: self.name()? },
            _ => {
                let kind = ComponentKind::from_keyword(&word)
                    .ok_or(LabError::UnknownComponentKind { kind: word, line })?;
                self.parse_place(kind, line)?
            }
        };

        Ok(Statement { kind, line })
    }

    fn parse_place(&mut self, kind: ComponentKind, line: usize) -> Result<StatementKind> {
        let name = self.name()?;

        let (x, y) = if self.current.kind == TokenKind::Number {
            (self.number()?, self.number()?)
        } else {
            (0.0, 0.0)
        };

        let closed = if self.current.kind == TokenKind::Identifier {
            let word = self.name()?;
            match word.to_ascii_lowercase().as_str() {
                "open" => Some(false),
                "closed" => Some(true),
                _ => return Err(LabError::parse(line, format!("unexpected '{}' after {} {}", word, kind, name))),
            }
        } else {
            None
        };

        if closed.is_some() && kind != ComponentKind::Switch {
            return Err(LabError::invalid_argument(
                line,
                format!("only switches take open/closed, not {} '{}'", kind, name),
            ));
        }

        Ok(StatementKind::Place {
            kind,
            name,
            x,
            y,
            closed,
        })
    }

    fn parse_directive(&mut self) -> Result<Statement> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        let kind = match directive.to_ascii_lowercase().as_str() {
            ".analyze" => StatementKind::Analyze,
            ".clear" => StatementKind::Clear,
            ".switches" => {
                let mode = self.name()?;
                let conduction = SwitchConduction::from_keyword(&mode).ok_or_else(|| {
                    LabError::parse(line, format!("unknown switch mode '{}' (use ignore or gate)", mode))
                })?;
                StatementKind::Switches(conduction)
            }
            ".expect" => StatementKind::Expect(self.parse_expectation(line)?),
            _ => {
                return Err(LabError::parse(line, format!("unknown directive: {}", directive)));
            }
        };

        Ok(Statement { kind, line })
    }

    fn parse_expectation(&mut self, line: usize) -> Result<StepExpectation> {
        let mut expectation = StepExpectation::new();
        let mut any = false;

        while self.current.kind == TokenKind::Identifier {
            let key = self.name()?;
            self.expect(TokenKind::Equals)?;
            let value = self.name()?;

            match key.to_ascii_lowercase().as_str() {
                "topology" => {
                    let topology: Topology = value.parse().map_err(|msg: String| LabError::parse(line, msg))?;
                    expectation = expectation.with_topology(topology);
                }
                "closed" => {
                    let closed = match value.to_ascii_lowercase().as_str() {
                        "true" | "yes" => true,
                        "false" | "no" => false,
                        _ => return Err(LabError::parse(line, format!("closed must be true or false, got '{}'", value))),
                    };
                    expectation = expectation.with_closed(closed);
                }
                _ => return Err(LabError::parse(line, format!("unknown expectation key '{}'", key))),
            }
            any = true;
        }

        if !any {
            return Err(LabError::parse(line, ".expect needs topology=<t> and/or closed=<bool>"));
        }
        Ok(expectation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_place() {
        let script = super::super::parse("bulb L1 100 20\nswitch S closed\nwire W").unwrap();
        assert_eq!(script.statements.len(), 3);
        assert_eq!(
            script.statements[0].kind,
            StatementKind::Place {
                kind: ComponentKind::Bulb,
                name: "L1".to_string(),
                x: 100.0,
                y: 20.0,
                closed: None,
            }
        );
        assert_eq!(
            script.statements[1].kind,
            StatementKind::Place {
                kind: ComponentKind::Switch,
                name: "S".to_string(),
                x: 0.0,
                y: 0.0,
                closed: Some(true),
            }
        );
        assert_eq!(script.statements[2].line, 3);
    }

    #[test]
    fn test_parse_commands() {
        let input = "connect A B\ndisconnect B A\nmove A 1 -2\nremove B\ntoggle S";
        let script = super::super::parse(input).unwrap();
        assert_eq!(
            script.statements[0].kind,
            StatementKind::Connect {
                a: "A".to_string(),
                b: "B".to_string()
            }
        );
        assert_eq!(
            script.statements[2].kind,
            StatementKind::Move {
                name: "A".to_string(),
                x: 1.0,
                y: -2.0
            }
        );
        assert_eq!(
            script.statements[4].kind,
            StatementKind::Toggle { name: "S".to_string() }
        );
    }

    #[test]
    fn test_parse_directives() {
        let input = ".switches gate\n.analyze\n.expect topology=series closed=true\n.clear";
        let script = super::super::parse(input).unwrap();
        assert_eq!(
            script.statements[0].kind,
            StatementKind::Switches(SwitchConduction::OpenSwitchBreaks)
        );
        assert_eq!(script.statements[1].kind, StatementKind::Analyze);
        assert_eq!(
            script.statements[2].kind,
            StatementKind::Expect(
                StepExpectation::new()
                    .with_topology(Topology::Series)
                    .with_closed(true)
            )
        );
        assert_eq!(script.statements[3].kind, StatementKind::Clear);
        assert!(script.has_analyze());
    }

    #[test]
    fn test_parse_with_comments() {
        let input = "# Two bulbs\nbattery B ; the source\n\n";
        let script = super::super::parse(input).unwrap();
        assert_eq!(script.statements.len(), 1);
        assert_eq!(script.statements[0].line, 2);
    }

    #[test]
    fn test_unknown_kind() {
        let err = super::super::parse("wire W\nresistor R1").unwrap_err();
        assert!(matches!(err, LabError::UnknownComponentKind { line: 2, .. }));
    }

    #[test]
    fn test_state_only_for_switches() {
        let err = super::super::parse("bulb L closed").unwrap_err();
        assert!(matches!(err, LabError::InvalidArgument { line: 1, .. }));
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let err = super::super::parse("remove A B").unwrap_err();
        assert!(matches!(err, LabError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_bad_expectations() {
        assert!(super::super::parse(".expect").is_err());
        assert!(super::super::parse(".expect topology=mesh").is_err());
        assert!(super::super::parse(".expect closed=maybe").is_err());
        assert!(super::super::parse(".expect lit=true").is_err());
    }
}
