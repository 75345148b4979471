//! Syntax tree, parser and symbol table for a RouterOS configuration DSL.

pub mod ast;
pub mod datatype;
pub mod format;
pub mod lexer;
pub mod parser;
pub mod symbols;
pub mod value;

pub use ast::{
    Block, ConfigDeclaration, Declaration, Program, Property, Section, SectionKind, SectionVisit,
    Statement,
};
pub use datatype::Datatype;
pub use format::{format_json, format_tree};
pub use parser::{parse, parse_file, ParseError};
pub use symbols::{Symbol, SymbolTable};
pub use value::{quote, yes_no, Expression, Value};
