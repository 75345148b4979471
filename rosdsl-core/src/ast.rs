use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::value::Expression;

/// Kind tag carried by every section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Device,
    Interfaces,
    Ip,
    Routing,
    Firewall,
    System,
    Custom,
}

impl SectionKind {
    /// Kind assigned to a top-level section by its name.
    pub fn from_root_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "device" => SectionKind::Device,
            "interfaces" => SectionKind::Interfaces,
            "ip" => SectionKind::Ip,
            "routing" => SectionKind::Routing,
            "firewall" => SectionKind::Firewall,
            "system" => SectionKind::System,
            _ => SectionKind::Custom,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Device => "device",
            SectionKind::Interfaces => "interfaces",
            SectionKind::Ip => "ip",
            SectionKind::Routing => "routing",
            SectionKind::Firewall => "firewall",
            SectionKind::System => "system",
            SectionKind::Custom => "custom",
        }
    }

    /// Kind a section behaves as given its enclosing section's effective kind.
    ///
    /// Only `Custom` sections inherit, and only from interfaces, IP, routing
    /// and firewall parents.
    pub fn effective(self, parent: Option<SectionKind>) -> SectionKind {
        match (self, parent) {
            (
                SectionKind::Custom,
                Some(
                    inherited @ (SectionKind::Interfaces
                    | SectionKind::Ip
                    | SectionKind::Routing
                    | SectionKind::Firewall),
                ),
            ) => inherited,
            (own, _) => own,
        }
    }
}

impl Display for SectionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `name = value` assignment. The value may be absent in hand-built trees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub name: String,
    pub value: Option<Expression>,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<Expression>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Property without a value.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Unquoted value text, empty when the value is absent.
    pub fn plain(&self) -> String {
        self.value.as_ref().map(Expression::plain).unwrap_or_default()
    }
}

/// Ordered statement sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Property(prop) => Some(prop),
            _ => None,
        })
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Section(section) => Some(section),
            _ => None,
        })
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Declaration(decl) => Some(decl),
            _ => None,
        })
    }

    /// First property with the given name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties().find(|prop| prop.name == name)
    }
}

/// A named, typed configuration block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub name: String,
    pub kind: SectionKind,
    pub block: Option<Block>,
}

impl Section {
    pub fn new(name: impl Into<String>, kind: SectionKind, block: Option<Block>) -> Self {
        Self {
            name: name.into(),
            kind,
            block,
        }
    }

    /// Section with a block built from the given statements.
    pub fn with_statements(
        name: impl Into<String>,
        kind: SectionKind,
        statements: Vec<Statement>,
    ) -> Self {
        Self::new(name, kind, Some(Block::new(statements)))
    }

    /// Nested `Custom` section, the way the parser builds inner sections.
    pub fn custom(name: impl Into<String>, statements: Vec<Statement>) -> Self {
        Self::with_statements(name, SectionKind::Custom, statements)
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.block.iter().flat_map(Block::properties)
    }

    pub fn subsections(&self) -> impl Iterator<Item = &Section> {
        self.block.iter().flat_map(Block::sections)
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.block.iter().flat_map(Block::declarations)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties().find(|prop| prop.name == name)
    }

    /// First property matching any of the given spellings.
    pub fn property_any(&self, names: &[&str]) -> Option<&Property> {
        names.iter().find_map(|name| self.property(name))
    }

    /// Unquoted value of the first matching property, skipping empty text.
    pub fn text_any(&self, names: &[&str]) -> Option<String> {
        self.property_any(names)
            .map(Property::plain)
            .filter(|text| !text.is_empty())
    }

    pub fn subsection(&self, name: &str) -> Option<&Section> {
        self.subsections().find(|section| section.name == name)
    }

    pub fn has_subsections(&self) -> bool {
        self.subsections().next().is_some()
    }

    /// Visit this section and every nested section in pre-order.
    ///
    /// The visitor receives the enclosing section as a borrowed parent link
    /// and the effective kind computed from the parent chain.
    pub fn walk<'a, F>(&'a self, parent_kind: Option<SectionKind>, visit: &mut F)
    where
        F: FnMut(SectionVisit<'a>),
    {
        self.walk_inner(None, parent_kind, 0, visit);
    }

    fn walk_inner<'a, F>(
        &'a self,
        parent: Option<&'a Section>,
        parent_kind: Option<SectionKind>,
        depth: usize,
        visit: &mut F,
    ) where
        F: FnMut(SectionVisit<'a>),
    {
        let effective_kind = self.kind.effective(parent_kind);
        visit(SectionVisit {
            section: self,
            parent,
            effective_kind,
            depth,
        });
        for child in self.subsections() {
            child.walk_inner(Some(self), Some(effective_kind), depth + 1, visit);
        }
    }
}

/// One step of [`Section::walk`].
#[derive(Debug, Clone, Copy)]
pub struct SectionVisit<'a> {
    pub section: &'a Section,
    /// Non-owning link to the enclosing section.
    pub parent: Option<&'a Section>,
    pub effective_kind: SectionKind,
    /// Zero for the section `walk` was called on.
    pub depth: usize,
}

/// Statement variants that may appear inside a block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "statement", rename_all = "snake_case")]
pub enum Statement {
    Property(Property),
    Block(Block),
    Section(Section),
    Declaration(Declaration),
}

impl From<Property> for Statement {
    fn from(prop: Property) -> Self {
        Statement::Property(prop)
    }
}

impl From<Section> for Statement {
    fn from(section: Section) -> Self {
        Statement::Section(section)
    }
}

impl From<Declaration> for Statement {
    fn from(decl: Declaration) -> Self {
        Statement::Declaration(decl)
    }
}

/// Named statement list whose menu path is inferred from its name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigDeclaration {
    pub name: String,
    pub statements: Vec<Statement>,
}

impl ConfigDeclaration {
    pub fn new(name: impl Into<String>, statements: Vec<Statement>) -> Self {
        Self {
            name: name.into(),
            statements,
        }
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Property(prop) => Some(prop),
            _ => None,
        })
    }
}

/// Declaration containers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "declaration", rename_all = "snake_case")]
pub enum Declaration {
    Config(ConfigDeclaration),
    Program(Program),
    /// Legacy single-property container.
    Property(Property),
    /// Legacy interface container.
    Interface {
        name: String,
        statements: Vec<Statement>,
    },
}

/// Root of a parsed configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    pub sections: Vec<Section>,
}

impl Program {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    /// Visit every section of every root in pre-order.
    pub fn walk<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(SectionVisit<'a>),
    {
        for section in &self.sections {
            section.walk(None, visit);
        }
    }
}

const INDENT: &str = "    ";

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            write_section(f, section, 0)?;
        }
        Ok(())
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_section(f, self, 0)
    }
}

impl Display for Property {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} = {}", self.name, value),
            None => write!(f, "{} = \"\"", self.name),
        }
    }
}

fn write_section(f: &mut Formatter<'_>, section: &Section, depth: usize) -> fmt::Result {
    writeln!(
        f,
        "{}{}:",
        INDENT.repeat(depth),
        render_name(&section.name)
    )?;
    if let Some(block) = &section.block {
        write_statements(f, &block.statements, depth + 1)?;
    }
    Ok(())
}

fn write_statements(f: &mut Formatter<'_>, statements: &[Statement], depth: usize) -> fmt::Result {
    let pad = INDENT.repeat(depth);
    for stmt in statements {
        match stmt {
            Statement::Property(prop) => writeln!(f, "{pad}{prop}")?,
            Statement::Block(block) => write_statements(f, &block.statements, depth)?,
            Statement::Section(section) => write_section(f, section, depth)?,
            Statement::Declaration(decl) => write_declaration(f, decl, depth)?,
        }
    }
    Ok(())
}

fn write_declaration(f: &mut Formatter<'_>, decl: &Declaration, depth: usize) -> fmt::Result {
    let pad = INDENT.repeat(depth);
    match decl {
        Declaration::Config(config) => {
            writeln!(f, "{pad}config {}:", render_name(&config.name))?;
            write_statements(f, &config.statements, depth + 1)
        }
        Declaration::Program(program) => {
            for section in &program.sections {
                write_section(f, section, depth)?;
            }
            Ok(())
        }
        Declaration::Property(prop) => writeln!(f, "{pad}{prop}"),
        Declaration::Interface { name, statements } => {
            writeln!(f, "{pad}interface {}:", render_name(name))?;
            write_statements(f, statements, depth + 1)
        }
    }
}

/// Names with characters outside the bare-name alphabet are quoted.
fn render_name(name: &str) -> String {
    let bare = !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | '/'));
    if bare {
        name.to_string()
    } else {
        crate::value::quote(name)
    }
}
