//! Scope-chain tests, including a property test that resolved lookups
//! (`get_at` / `assign_at`) agree with a plain outward search.

use std::rc::Rc;

use proptest::prelude::*;

use rox::environment::{EnvRef, Environment};
use rox::error::LoxError;
use rox::token::{Token, TokenType};
use rox::value::Value;

const NAMES: [&str; 4] = ["a", "b", "c", "d"];

fn ident(name: &str) -> Token {
    Token::new(TokenType::IDENTIFIER, name, 1)
}

/// Builds a chain from `scopes`, outermost first, and returns the innermost.
fn build_chain(scopes: &[Vec<(usize, i32)>]) -> EnvRef {
    let mut env: Option<EnvRef> = None;

    for bindings in scopes {
        let mut scope = match env {
            Some(enclosing) => Environment::with_enclosing(enclosing),
            None => Environment::new(),
        };

        for (name, value) in bindings {
            scope.define(NAMES[*name], Value::Number(f64::from(*value)));
        }

        env = Some(scope.into_ref());
    }

    env.unwrap_or_else(|| Environment::new().into_ref())
}

/// Distance and value of the nearest binding of `name`, searching outward.
fn nearest(scopes: &[Vec<(usize, i32)>], name: usize) -> Option<(usize, i32)> {
    scopes.iter().rev().enumerate().find_map(|(distance, bindings)| {
        bindings
            .iter()
            .rev()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| (distance, *value))
    })
}

fn scopes_strategy() -> impl Strategy<Value = Vec<Vec<(usize, i32)>>> {
    prop::collection::vec(
        prop::collection::vec((0..NAMES.len(), -1000i32..1000), 0..4),
        1..8,
    )
}

#[test]
fn test_define_get_assign() {
    let mut env = Environment::new();
    env.define("a", Value::from(1.0));

    assert_eq!(env.get(&ident("a")).unwrap(), Value::Number(1.0));

    env.assign(&ident("a"), Value::from("one")).unwrap();
    assert_eq!(env.get(&ident("a")).unwrap(), Value::from("one"));

    // Redefinition in the same scope overwrites.
    env.define("a", Value::Nil);
    assert_eq!(env.get(&ident("a")).unwrap(), Value::Nil);
}

#[test]
fn test_undefined_variable() {
    let mut env = Environment::new();

    let err = env.get(&ident("missing")).unwrap_err();
    assert_eq!(err.to_string(), "Undefined variable 'missing'.\n[line 1]");

    // Assignment never creates a binding.
    let err = env.assign(&ident("missing"), Value::Nil).unwrap_err();
    assert!(matches!(err, LoxError::Runtime { .. }));
    assert!(env.get(&ident("missing")).is_err());
}

#[test]
fn test_inner_scope_shadows_and_assigns_outward() {
    let globals = Environment::new().into_ref();
    globals.borrow_mut().define("a", Value::from(1.0));
    globals.borrow_mut().define("b", Value::from(2.0));

    let inner = Environment::with_enclosing(Rc::clone(&globals)).into_ref();
    inner.borrow_mut().define("a", Value::from(10.0));

    assert_eq!(inner.borrow().get(&ident("a")).unwrap(), Value::Number(10.0));
    assert_eq!(inner.borrow().get(&ident("b")).unwrap(), Value::Number(2.0));

    inner.borrow_mut().assign(&ident("b"), Value::from(20.0)).unwrap();
    assert_eq!(globals.borrow().get(&ident("b")).unwrap(), Value::Number(20.0));
    assert_eq!(globals.borrow().get(&ident("a")).unwrap(), Value::Number(1.0));
}

#[test]
fn test_get_at_reads_exact_scope() {
    let outer = Environment::new().into_ref();
    outer.borrow_mut().define("x", Value::from("outer"));

    let middle = Environment::with_enclosing(Rc::clone(&outer)).into_ref();
    let inner = Environment::with_enclosing(Rc::clone(&middle)).into_ref();
    inner.borrow_mut().define("x", Value::from("inner"));

    assert_eq!(Environment::get_at(&inner, 0, &ident("x")).unwrap(), Value::from("inner"));
    assert_eq!(Environment::get_at(&inner, 2, &ident("x")).unwrap(), Value::from("outer"));

    Environment::assign_at(&inner, 2, &ident("x"), Value::from("changed")).unwrap();
    assert_eq!(outer.borrow().get(&ident("x")).unwrap(), Value::from("changed"));
    assert_eq!(inner.borrow().get(&ident("x")).unwrap(), Value::from("inner"));
}

#[test]
fn test_resolution_mismatch_is_internal_error() {
    let outer = Environment::new().into_ref();
    let inner = Environment::with_enclosing(Rc::clone(&outer)).into_ref();

    // Not bound at the given distance.
    let err = Environment::get_at(&inner, 1, &ident("x")).unwrap_err();
    assert!(matches!(err, LoxError::Internal { .. }));

    // Chain too short.
    let err = Environment::assign_at(&inner, 5, &ident("x"), Value::Nil).unwrap_err();
    assert!(matches!(err, LoxError::Internal { .. }));
    assert!(err.is_runtime());
}

#[test]
fn test_shared_scope_is_seen_by_every_holder() {
    let shared = Environment::new().into_ref();
    shared.borrow_mut().define("count", Value::from(0.0));

    let first = Environment::with_enclosing(Rc::clone(&shared)).into_ref();
    let second = Environment::with_enclosing(Rc::clone(&shared)).into_ref();

    Environment::assign_at(&first, 1, &ident("count"), Value::from(1.0)).unwrap();

    assert_eq!(
        Environment::get_at(&second, 1, &ident("count")).unwrap(),
        Value::Number(1.0)
    );
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// A lookup at the distance an outward search finds returns the same value.
    #[test]
    fn prop_get_at_matches_outward_search(scopes in scopes_strategy()) {
        let env = build_chain(&scopes);

        for (index, name) in NAMES.iter().enumerate() {
            let token = ident(name);

            match nearest(&scopes, index) {
                Some((distance, value)) => {
                    let expected = Value::Number(f64::from(value));

                    prop_assert_eq!(Environment::get_at(&env, distance, &token).unwrap(), expected.clone());
                    prop_assert_eq!(env.borrow().get(&token).unwrap(), expected);
                }
                None => prop_assert!(env.borrow().get(&token).is_err()),
            }
        }
    }

    /// Assigning at a resolved distance changes only that scope.
    #[test]
    fn prop_assign_at_touches_one_scope(scopes in scopes_strategy(), name in 0..NAMES.len()) {
        let env = build_chain(&scopes);
        let token = ident(NAMES[name]);

        if let Some((distance, _)) = nearest(&scopes, name) {
            Environment::assign_at(&env, distance, &token, Value::from("new")).unwrap();

            prop_assert_eq!(env.borrow().get(&token).unwrap(), Value::from("new"));

            // Any shadowed binding further out keeps its old value.
            let outer = &scopes[..scopes.len() - 1 - distance];
            if let Some((further, old)) = nearest(outer, name) {
                prop_assert_eq!(
                    Environment::get_at(&env, distance + 1 + further, &token).unwrap(),
                    Value::Number(f64::from(old))
                );
            }
        }
    }
}
