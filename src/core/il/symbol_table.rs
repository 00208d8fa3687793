use crate::core::il::value::ILValue;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

/// block scoped identifiers, innermost scope last
#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, ILValue>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// bind `name` in the innermost scope, err if it is already bound there
    pub fn add(&mut self, name: &str, value: ILValue) -> Result<(), ILValue> {
        if self.scopes.is_empty() {
            self.push_scope();
        }
        let Some(scope) = self.scopes.last_mut() else {
            return Err(value);
        };
        if scope.contains_key(name) {
            return Err(value);
        }
        scope.insert(name.to_string(), value);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&ILValue> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}

/// anything that owns a symbol table
pub trait Scoped {
    fn symbols_mut(&mut self) -> &mut SymbolTable;
}

impl Scoped for SymbolTable {
    fn symbols_mut(&mut self) -> &mut SymbolTable {
        self
    }
}

/// open scope, popped when the guard drops even on early return
pub struct ScopeGuard<'s, T: Scoped> {
    owner: &'s mut T,
}

impl<'s, T: Scoped> ScopeGuard<'s, T> {
    pub fn enter(owner: &'s mut T) -> Self {
        owner.symbols_mut().push_scope();
        Self { owner }
    }
}

impl<T: Scoped> Deref for ScopeGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.owner
    }
}

impl<T: Scoped> DerefMut for ScopeGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.owner
    }
}

impl<T: Scoped> Drop for ScopeGuard<'_, T> {
    fn drop(&mut self) {
        self.owner.symbols_mut().pop_scope();
    }
}
