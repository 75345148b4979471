use std::collections::HashMap;

use serde::Serialize;

use crate::datatype::Datatype;

/// A bound name and its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub name: String,
    pub datatype: Datatype,
}

impl Symbol {
    pub fn new(name: impl Into<String>, datatype: Datatype) -> Self {
        Self {
            name: name.into(),
            datatype,
        }
    }
}

/// Stack of lexical scopes. Starts with one global scope.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, Symbol>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pop the innermost scope. Returns false when there is nothing to pop.
    pub fn exit_scope(&mut self) -> bool {
        self.scopes.pop().is_some()
    }

    /// Number of open scopes.
    pub fn scope_level(&self) -> usize {
        self.scopes.len()
    }

    /// Bind a name in the innermost scope.
    ///
    /// Returns false if the name already exists in that scope or if no scope
    /// is open. Outer bindings may be shadowed.
    pub fn bind(&mut self, name: &str, symbol: Symbol) -> bool {
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        if scope.contains_key(name) {
            return false;
        }
        scope.insert(name.to_string(), symbol);
        true
    }

    /// Look a name up from the innermost scope outwards.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Look a name up in the innermost scope only.
    pub fn current_scope_lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.last().and_then(|scope| scope.get(name))
    }
}
