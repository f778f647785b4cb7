//! Environment for variable scoping.
//!
//! Uses a scope stack (not cloning) for efficient scope management. Scopes
//! chain to their parents, so a function call installs its closure scope as
//! the parent and caller locals stay invisible.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use zscript_ir::Name;

use crate::Value;

/// A single-threaded scope handle: reference-counted interior mutability.
///
/// The evaluator runs single-threaded, so `Rc` rather than `Arc`. The
/// `#[repr(transparent)]` wrapper keeps every scope allocation behind one
/// factory and makes the sharing model explicit at use sites.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A single scope containing variable bindings.
#[derive(Debug, Default)]
pub struct Scope {
    /// `FxHashMap` for fast hashing with `Name` keys.
    bindings: FxHashMap<Name, Value>,
    /// Parent scope for lexical lookup.
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Define a variable in this scope. Redeclaration replaces the binding.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.bindings.insert(name, value);
    }

    /// Look up a variable here or in any parent scope.
    pub fn lookup(&self, name: Name) -> Option<Value> {
        if let Some(value) = self.bindings.get(&name) {
            return Some(value.clone());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow().lookup(name);
        }
        None
    }

    /// Assign to an existing variable here or in a parent scope. Returns
    /// `false` when no scope in the chain defines it; assignment never
    /// creates a binding.
    pub fn assign(&mut self, name: Name, value: Value) -> bool {
        if let Some(slot) = self.bindings.get_mut(&name) {
            *slot = value;
            return true;
        }
        if let Some(parent) = &self.parent {
            return parent.borrow_mut().assign(name, value);
        }
        false
    }
}

/// Scope stack for the evaluator.
///
/// The global scope sits at the bottom and survives for the life of the
/// interpreter, so a REPL keeps definitions across inputs.
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<LocalScope<Scope>>,
    global: LocalScope<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        let global = LocalScope::new(Scope::new());
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Push a block scope chained to the current one.
    #[inline]
    pub fn push_scope(&mut self) {
        let parent = self.current_scope();
        self.scopes.push(LocalScope::new(Scope::with_parent(parent)));
    }

    /// Push a call scope chained to a closure's captured scope instead of
    /// the current one.
    #[inline]
    pub fn push_scope_with_parent(&mut self, parent: LocalScope<Scope>) {
        self.scopes.push(LocalScope::new(Scope::with_parent(parent)));
    }

    /// Pop the current scope. The global scope is never popped.
    #[inline]
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// The scope new closures capture.
    #[inline]
    pub fn current_scope(&self) -> LocalScope<Scope> {
        self.scopes.last().unwrap_or(&self.global).clone()
    }

    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow_mut()
            .define(name, value);
    }

    #[inline]
    pub fn lookup(&self, name: Name) -> Option<Value> {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow()
            .lookup(name)
    }

    /// Assign to an existing variable. Returns `false` if undefined.
    #[inline]
    pub fn assign(&mut self, name: Name, value: Value) -> bool {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow_mut()
            .assign(name, value)
    }

    /// Define directly in the global scope, regardless of current depth.
    pub fn define_global(&mut self, name: Name, value: Value) {
        self.global.borrow_mut().define(name, value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zscript_ir::Interner;

    fn names(interner: &Interner, raw: &[&str]) -> Vec<Name> {
        raw.iter().map(|s| interner.intern(s)).collect()
    }

    #[test]
    fn define_lookup_assign() {
        let interner = Interner::new();
        let ns = names(&interner, &["x"]);
        let mut env = Environment::new();

        assert_eq!(env.lookup(ns[0]), None);
        env.define(ns[0], Value::Number(1.0));
        assert_eq!(env.lookup(ns[0]), Some(Value::Number(1.0)));
        assert!(env.assign(ns[0], Value::Number(2.0)));
        assert_eq!(env.lookup(ns[0]), Some(Value::Number(2.0)));
    }

    #[test]
    fn assignment_never_creates_bindings() {
        let interner = Interner::new();
        let ns = names(&interner, &["ghost"]);
        let mut env = Environment::new();
        assert!(!env.assign(ns[0], Value::Null));
        assert_eq!(env.lookup(ns[0]), None);
    }

    #[test]
    fn inner_scopes_shadow_and_unwind() {
        let interner = Interner::new();
        let ns = names(&interner, &["x"]);
        let mut env = Environment::new();
        env.define(ns[0], Value::Number(1.0));

        env.push_scope();
        env.define(ns[0], Value::Number(2.0));
        assert_eq!(env.lookup(ns[0]), Some(Value::Number(2.0)));
        env.pop_scope();

        assert_eq!(env.lookup(ns[0]), Some(Value::Number(1.0)));
    }

    #[test]
    fn assign_in_inner_scope_writes_outer_binding() {
        let interner = Interner::new();
        let ns = names(&interner, &["x"]);
        let mut env = Environment::new();
        env.define(ns[0], Value::Number(1.0));

        env.push_scope();
        assert!(env.assign(ns[0], Value::Number(5.0)));
        env.pop_scope();

        assert_eq!(env.lookup(ns[0]), Some(Value::Number(5.0)));
    }

    #[test]
    fn closure_parent_hides_caller_locals() {
        let interner = Interner::new();
        let ns = names(&interner, &["global", "local", "captured"]);
        let mut env = Environment::new();
        env.define(ns[0], Value::Number(0.0));
        let captured = env.current_scope();

        // Caller pushes a scope with a local.
        env.push_scope();
        env.define(ns[1], Value::Number(1.0));

        // Call scope parents to the captured scope, not the caller.
        env.push_scope_with_parent(captured);
        assert_eq!(env.lookup(ns[1]), None);
        assert_eq!(env.lookup(ns[0]), Some(Value::Number(0.0)));
        env.pop_scope();

        assert_eq!(env.lookup(ns[1]), Some(Value::Number(1.0)));
    }

    #[test]
    fn global_scope_is_never_popped() {
        let interner = Interner::new();
        let ns = names(&interner, &["x"]);
        let mut env = Environment::new();
        env.define(ns[0], Value::Number(1.0));
        env.pop_scope();
        env.pop_scope();
        assert_eq!(env.lookup(ns[0]), Some(Value::Number(1.0)));
        assert_eq!(env.depth(), 1);
    }
}
