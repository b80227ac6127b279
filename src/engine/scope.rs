//! Lexical scope chain
//!
//! A [`Scope`] owns a map of variable bindings plus an optional parent link.
//! Scopes are created per program run and per function invocation; closures
//! keep their declaring scope alive through the shared `Rc`, so two closures
//! produced by the same factory each see their own captured state.
//!
//! Lookup policy is silent-success: reading a name bound nowhere in the chain
//! yields `undefined`, and `set` always writes into the *current* scope —
//! assignment to an undeclared name creates a local binding rather than
//! walking to a parent or failing. That is a deliberate simplification of
//! full lexical semantics, not a defect.

use crate::engine::value::Value;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct Scope {
    inner: Rc<RefCell<ScopeData>>,
}

#[derive(Debug)]
struct ScopeData {
    variables: FxHashMap<String, Value>,
    parent: Option<Scope>,
}

impl Scope {
    /// Create a root scope with no parent
    pub fn new() -> Self {
        Scope {
            inner: Rc::new(RefCell::new(ScopeData {
                variables: FxHashMap::default(),
                parent: None,
            })),
        }
    }

    /// Create a child scope whose lookups fall back to `self`
    pub fn child(&self) -> Self {
        Scope {
            inner: Rc::new(RefCell::new(ScopeData {
                variables: FxHashMap::default(),
                parent: Some(self.clone()),
            })),
        }
    }

    /// Get a variable value, traversing the scope chain; `undefined` on miss
    pub fn get(&self, name: &str) -> Value {
        let data = self.inner.borrow();
        if let Some(value) = data.variables.get(name) {
            return value.clone();
        }
        match &data.parent {
            Some(parent) => parent.get(name),
            None => Value::Undefined,
        }
    }

    /// Set a variable in the current scope (never a parent)
    pub fn set(&self, name: &str, value: Value) {
        self.inner
            .borrow_mut()
            .variables
            .insert(name.to_string(), value);
    }

    /// Check whether a name is bound anywhere in the chain
    pub fn has(&self, name: &str) -> bool {
        let data = self.inner.borrow();
        if data.variables.contains_key(name) {
            return true;
        }
        match &data.parent {
            Some(parent) => parent.has(name),
            None => false,
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_parent_chain() {
        let root = Scope::new();
        root.set("x", Value::Number(1.0));
        let child = root.child();
        assert!(matches!(child.get("x"), Value::Number(n) if n == 1.0));
        assert!(child.has("x"));
    }

    #[test]
    fn test_missing_binding_is_undefined() {
        let scope = Scope::new();
        assert!(matches!(scope.get("nope"), Value::Undefined));
        assert!(!scope.has("nope"));
    }

    #[test]
    fn test_set_shadows_instead_of_writing_parent() {
        let root = Scope::new();
        root.set("x", Value::Number(1.0));
        let child = root.child();
        child.set("x", Value::Number(2.0));
        assert!(matches!(child.get("x"), Value::Number(n) if n == 2.0));
        assert!(matches!(root.get("x"), Value::Number(n) if n == 1.0));
    }

    #[test]
    fn test_sibling_children_are_independent() {
        let root = Scope::new();
        let a = root.child();
        let b = root.child();
        a.set("v", Value::Number(10.0));
        b.set("v", Value::Number(20.0));
        assert!(matches!(a.get("v"), Value::Number(n) if n == 10.0));
        assert!(matches!(b.get("v"), Value::Number(n) if n == 20.0));
    }
}
