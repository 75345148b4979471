use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::ast::{ConfigDeclaration, Declaration, Program, Property, Section, SectionKind, Statement};
use crate::lexer::{Lexer, Spanned, Token};
use crate::value::{Expression, Value};

/// Errors that can occur while turning source text into a [`Program`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected character '{found}' at line {line}, column {column}")]
    UnexpectedCharacter {
        found: char,
        line: usize,
        column: usize,
    },
    #[error("unterminated string starting at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },
    #[error("unterminated block comment starting at line {line}")]
    UnterminatedComment { line: usize },
    #[error("indentation at line {line} does not match any enclosing block")]
    InconsistentDedent { line: usize },
    #[error("expected {expected} but found {found} at line {line}, column {column}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },
    #[error("section '{name}' at line {line} has no body")]
    EmptySection { name: String, line: usize },
    #[error("property '{name}' at line {line} must be inside a section")]
    PropertyOutsideSection { name: String, line: usize },
    #[error("{keyword} declaration '{name}' at line {line} must be nested inside a section")]
    DeclarationOutsideSection {
        keyword: String,
        name: String,
        line: usize,
    },
    /// Failed to read the input file.
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}

/// Parse configuration source into a [`Program`].
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let tokens = Lexer::new(source).tokenize()?;
    let program = Parser::new(tokens).parse_program()?;
    debug!(sections = program.sections.len(), "parsed program");
    Ok(program)
}

/// Read and parse a configuration file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Program, ParseError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|err| ParseError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    parse(&source)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Spanned>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::default();
        loop {
            match self.peek().clone() {
                Token::Eof => break,
                Token::Newline => {
                    self.advance();
                }
                Token::Ident(_) | Token::Str(_) => {
                    let line = self.current().line;
                    let name = self.expect_name()?;
                    match self.peek().clone() {
                        Token::Colon => {
                            let kind = SectionKind::from_root_name(&name);
                            program.add_section(self.parse_section(name, kind, line)?);
                        }
                        Token::Equals => {
                            return Err(ParseError::PropertyOutsideSection { name, line });
                        }
                        Token::Ident(_) | Token::Str(_) if is_declaration_keyword(&name) => {
                            let inner = self.expect_name()?;
                            return Err(ParseError::DeclarationOutsideSection {
                                keyword: name,
                                name: inner,
                                line,
                            });
                        }
                        _ => return Err(self.unexpected("':' after section name")),
                    }
                }
                _ => return Err(self.unexpected("section name")),
            }
        }
        Ok(program)
    }

    /// Parse `: NEWLINE INDENT body DEDENT` after a section name.
    fn parse_section(
        &mut self,
        name: String,
        kind: SectionKind,
        line: usize,
    ) -> Result<Section, ParseError> {
        let statements = self.parse_body(&name, line)?;
        Ok(Section::with_statements(name, kind, statements))
    }

    fn parse_body(&mut self, name: &str, line: usize) -> Result<Vec<Statement>, ParseError> {
        self.expect(Token::Colon, "':'")?;
        self.expect(Token::Newline, "end of line after ':'")?;
        if *self.peek() != Token::Indent {
            return Err(ParseError::EmptySection {
                name: name.to_string(),
                line,
            });
        }
        self.advance();

        let mut statements = Vec::new();
        loop {
            match self.peek().clone() {
                Token::Dedent => {
                    self.advance();
                    break;
                }
                Token::Eof => break,
                Token::Newline => {
                    self.advance();
                }
                Token::Ident(_) | Token::Str(_) => statements.push(self.parse_statement()?),
                _ => return Err(self.unexpected("property or section")),
            }
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let line = self.current().line;
        let name = self.expect_name()?;
        match self.peek().clone() {
            Token::Equals => {
                self.advance();
                let value = self.parse_expression()?;
                self.expect_line_end()?;
                Ok(Property::new(name, value).into())
            }
            Token::Colon => Ok(self.parse_section(name, SectionKind::Custom, line)?.into()),
            Token::Ident(_) | Token::Str(_) if is_declaration_keyword(&name) => {
                let inner = self.expect_name()?;
                let statements = self.parse_body(&inner, line)?;
                let decl = if name == "config" {
                    Declaration::Config(ConfigDeclaration::new(inner, statements))
                } else {
                    Declaration::Interface {
                        name: inner,
                        statements,
                    }
                };
                Ok(decl.into())
            }
            _ => Err(self.unexpected("'=' or ':'")),
        }
    }

    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let token = self.peek().clone();
        let expr = match token {
            Token::Str(text) => Value::string(text).into(),
            Token::Number(n) => Value::number(n).into(),
            Token::Bool(b) => Value::boolean(b).into(),
            Token::IpAddress(v) => Value::ip_address(v).into(),
            Token::IpCidr(v) => Value::ip_cidr(v).into(),
            Token::IpRange(value) => Value::IpRange { value }.into(),
            Token::Ipv6Address(value) => Value::Ipv6Address { value }.into(),
            Token::Ipv6Cidr(value) => Value::Ipv6Cidr { value }.into(),
            Token::Ipv6Range(value) => Value::Ipv6Range { value }.into(),
            Token::Ident(word) => name_expression(&word),
            Token::LBracket => {
                self.advance();
                return self.parse_list();
            }
            _ => return Err(self.unexpected("value")),
        };
        self.advance();
        Ok(expr)
    }

    fn parse_list(&mut self) -> Result<Expression, ParseError> {
        let mut items = Vec::new();
        loop {
            if *self.peek() == Token::RBracket {
                self.advance();
                break;
            }
            match self.parse_expression()? {
                Expression::Value { value } => items.push(value),
                // Names inside lists are kept as their text.
                other => items.push(Value::string(other.to_string())),
            }
            match self.peek() {
                Token::Comma => {
                    self.advance();
                }
                Token::RBracket => {}
                _ => return Err(self.unexpected("',' or ']'")),
            }
        }
        Ok(Value::list(items).into())
    }

    fn expect_name(&mut self) -> Result<String, ParseError> {
        match self.peek().clone() {
            Token::Ident(name) | Token::Str(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("name")),
        }
    }

    fn expect_line_end(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            Token::Newline => {
                self.advance();
                Ok(())
            }
            Token::Dedent | Token::Eof => Ok(()),
            _ => Err(self.unexpected("end of line")),
        }
    }

    fn expect(&mut self, token: Token, expected: &str) -> Result<(), ParseError> {
        if *self.peek() == token {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let current = self.current();
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: current.token.describe(),
            line: current.line,
            column: current.column,
        }
    }

    fn current(&self) -> &Spanned {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    fn peek(&self) -> &Token {
        &self.current().token
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }
}

fn is_declaration_keyword(name: &str) -> bool {
    matches!(name, "config" | "interface")
}

/// Bare words become identifiers; dotted words starting with a letter become
/// property references.
fn name_expression(word: &str) -> Expression {
    let starts_alpha = word
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let segments: Vec<&str> = word.split('.').collect();
    if !starts_alpha || segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
        return Expression::identifier(word);
    }
    let mut expr = Expression::identifier(segments[0]);
    for segment in &segments[1..] {
        expr = Expression::property_reference(expr, *segment);
    }
    expr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_names_become_references() {
        let expr = name_expression("wan.ip.address");
        assert_eq!(
            expr,
            Expression::property_reference(
                Expression::property_reference(Expression::identifier("wan"), "ip"),
                "address"
            )
        );
        assert_eq!(name_expression("999.1.1.1"), Expression::identifier("999.1.1.1"));
    }

    #[test]
    fn root_property_is_rejected() {
        let err = parse("hostname = \"r1\"\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::PropertyOutsideSection {
                name: "hostname".into(),
                line: 1
            }
        );
    }

    #[test]
    fn empty_section_is_rejected() {
        let err = parse("device:\nip:\n    dns-server = 1.1.1.1\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::EmptySection {
                name: "device".into(),
                line: 1
            }
        );
    }

    #[test]
    fn missing_colon_reports_position() {
        let err = parse("device\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken { line: 1, column: 7, .. }
        ));
    }
}
