//! Runtime scope chain.
//!
//! Each [`Environment`] owns its own bindings and points at the scope that
//! encloses it.  Scopes are shared (`Rc<RefCell<_>>`): a closure keeps the
//! scope it was defined in alive, and sibling closures defined in the same
//! block see each other's writes because they hold the very same scope.
//! Cycles (an instance whose field holds a method bound to that instance) are
//! tolerated and simply leak until the process ends.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;

/// Shared handle to a scope.
pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    /// A root scope (the globals).
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Wrap in a fresh shared handle.
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Bind `name` in this scope, overwriting any existing binding here.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Look `name` up in this scope and then outward.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined(name))
        }
    }

    /// Rebind an existing `name`, searching outward.  Never creates a binding.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined(name))
        }
    }

    /// The scope `distance` hops outward from `env` (`0` is `env` itself).
    pub fn ancestor(env: &EnvRef, distance: usize) -> Result<EnvRef> {
        let mut current: EnvRef = Rc::clone(env);

        for hop in 0..distance {
            let next = current.borrow().enclosing.clone().ok_or_else(|| {
                LoxError::internal(format!(
                    "scope chain ended after {hop} of {distance} hops"
                ))
            })?;
            current = next;
        }

        Ok(current)
    }

    /// Read `name` from exactly the scope `distance` hops out.
    pub fn get_at(env: &EnvRef, distance: usize, name: &Token) -> Result<Value> {
        debug!("get_at '{}' distance {}", name.lexeme, distance);

        let scope = Self::ancestor(env, distance)?;
        let value = scope.borrow().values.get(&name.lexeme).cloned();

        value.ok_or_else(|| {
            LoxError::internal(format!(
                "'{}' resolved at distance {distance} but is not bound there",
                name.lexeme
            ))
        })
    }

    /// Overwrite `name` in exactly the scope `distance` hops out.
    pub fn assign_at(env: &EnvRef, distance: usize, name: &Token, value: Value) -> Result<()> {
        debug!("assign_at '{}' distance {}", name.lexeme, distance);

        let scope = Self::ancestor(env, distance)?;
        let mut scope = scope.borrow_mut();

        match scope.values.get_mut(&name.lexeme) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(LoxError::internal(format!(
                "'{}' resolved at distance {distance} but is not bound there",
                name.lexeme
            ))),
        }
    }
}

fn undefined(name: &Token) -> LoxError {
    LoxError::runtime(name, format!("Undefined variable '{}'.", name.lexeme))
}
