use std::collections::BTreeMap;

use crate::ast::ast::{DeclId, ScopeId};

/// All declarations sharing one name in one scope, in declaration order.
pub type OverloadSet = Vec<DeclId>;

/// Identifies the construct a saved scope belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    /// Parameters of a function or coroutine, members of a class or extension.
    Decl(DeclId),
    /// A compound statement.
    Block(u32),
    /// The body expression of an expression-bodied function.
    Body(DeclId),
}

#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    pub names: BTreeMap<String, OverloadSet>,
}

impl Scope {
    pub fn new(parent: Option<ScopeId>) -> Self {
        Scope {
            parent,
            names: BTreeMap::new(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&OverloadSet> {
        self.names.get(name)
    }

    pub fn declare(&mut self, name: &str, decl: DeclId) {
        self.names.entry(name.to_string()).or_default().push(decl);
    }

    /// Appends `overloads` to the set named `name`, creating it if needed.
    pub fn merge(&mut self, name: &str, overloads: &[DeclId]) {
        self.names
            .entry(name.to_string())
            .or_default()
            .extend_from_slice(overloads);
    }
}
