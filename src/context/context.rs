use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::{
    ast::ast::{Decl, DeclId, ScopeId},
    errors::errors::{Error, ErrorImpl},
    evaluator::evaluator::Value,
    Position,
};

use super::scope::{OverloadSet, Scope, ScopeKey};

/// The shared state of one compilation: declarations, scopes, saved scopes,
/// the active scope stack and the compile-time constant store.
#[derive(Debug)]
pub struct Context {
    decls: Vec<Decl>,
    scopes: Vec<Scope>,
    saved: HashMap<ScopeKey, ScopeId>,
    active: Vec<ScopeId>,
    constants: HashMap<DeclId, Value>,
    /// Constants whose values are being computed.
    binding: HashSet<DeclId>,
    next_block: u32,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Context {
            decls: vec![],
            scopes: vec![Scope::new(None)],
            saved: HashMap::new(),
            active: vec![ScopeId(0)],
            constants: HashMap::new(),
            binding: HashSet::new(),
            next_block: 0,
        }
    }

    pub fn global_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn make_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope::new(Some(parent)));
        ScopeId(self.scopes.len() - 1)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }

    pub fn current_scope(&self) -> ScopeId {
        self.active.last().copied().unwrap_or(ScopeId(0))
    }

    pub fn push_scope(&mut self, scope: ScopeId) {
        trace!(scope = scope.0, depth = self.active.len(), "enter scope");
        self.active.push(scope);
    }

    pub fn pop_scope(&mut self) {
        self.active.pop();
    }

    /// Depth of the active scope stack.
    pub fn depth(&self) -> usize {
        self.active.len()
    }

    pub fn save_scope(&mut self, key: ScopeKey, scope: ScopeId) {
        self.saved.insert(key, scope);
    }

    pub fn saved_scope(&self, key: ScopeKey) -> Result<ScopeId, Error> {
        self.saved.get(&key).copied().ok_or_else(|| {
            Error::new(
                ErrorImpl::ImplementationError {
                    message: format!("no saved scope for {:?}", key),
                },
                Position::null(),
            )
        })
    }

    pub fn set_parent(&mut self, scope: ScopeId, parent: ScopeId) {
        self.scopes[scope.0].parent = Some(parent);
    }

    /// Looks `name` up in the current scope, then in each lexically
    /// enclosing scope.
    pub fn lookup(&self, name: &str) -> Option<&OverloadSet> {
        self.lookup_from(self.current_scope(), name)
    }

    pub fn lookup_from(&self, scope: ScopeId, name: &str) -> Option<&OverloadSet> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.0];
            if let Some(overloads) = scope.lookup(name) {
                return Some(overloads);
            }
            current = scope.parent;
        }
        None
    }

    /// Adds `decl` to the arena and binds its name in its scope.
    pub fn declare(&mut self, decl: Decl) -> DeclId {
        let scope = decl.scope;
        let name = decl.name.clone();
        let id = self.add_decl(decl);
        self.scopes[scope.0].declare(&name, id);
        id
    }

    /// Adds `decl` to the arena without making it visible to lookup.
    pub fn add_decl(&mut self, decl: Decl) -> DeclId {
        self.decls.push(decl);
        DeclId(self.decls.len() - 1)
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.0]
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.0]
    }

    /// Removes the declarations matching `remove` from the set `name` in
    /// `scope`.
    pub fn retain_overloads(
        &mut self,
        scope: ScopeId,
        name: &str,
        mut remove: impl FnMut(&Decl) -> bool,
    ) {
        let Some(overloads) = self.scopes[scope.0].names.get(name) else {
            return;
        };

        let kept = overloads
            .iter()
            .copied()
            .filter(|id| !remove(&self.decls[id.0]))
            .collect::<Vec<_>>();

        self.scopes[scope.0].names.insert(name.to_string(), kept);
    }

    pub fn store(&mut self, decl: DeclId, value: Value) {
        self.constants.insert(decl, value);
    }

    pub fn constant(&self, decl: DeclId) -> Option<&Value> {
        self.constants.get(&decl)
    }

    /// Marks `decl` as being bound. Returns false if it already was, which
    /// means its value depends on itself.
    pub fn begin_binding(&mut self, decl: DeclId) -> bool {
        self.binding.insert(decl)
    }

    pub fn end_binding(&mut self, decl: DeclId) {
        self.binding.remove(&decl);
    }

    pub fn next_block_id(&mut self) -> u32 {
        let id = self.next_block;
        self.next_block += 1;
        id
    }
}

/// Anything that runs with a [`Context`] and can enter scopes.
pub trait WithContext {
    fn context(&mut self) -> &mut Context;

    /// Runs `f` with `scope` active. The scope is left on every path out of
    /// `f`, including when `f` returns an error.
    fn in_scope<T>(&mut self, scope: ScopeId, f: impl FnOnce(&mut Self) -> T) -> T {
        self.context().push_scope(scope);
        let result = f(self);
        self.context().pop_scope();
        result
    }

    /// Runs `f` in a fresh, unsaved child of the current scope.
    fn in_new_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let cxt = self.context();
        let parent = cxt.current_scope();
        let scope = cxt.make_scope(parent);
        self.in_scope(scope, f)
    }
}

impl WithContext for Context {
    fn context(&mut self) -> &mut Context {
        self
    }
}
