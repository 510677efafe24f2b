//! Shared test functions and a counting resolver.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mapcat_core::prelude::Schema;
use mapcat_operators::{
    DynFn, FlatMapOperator, FnName, LazySeq, Registry, ResolveError, Resolver, RuntimeError, Value,
};

pub const NS: &str = "test.fns";

/// Resolver test double: counts lookups, delegates to a `Registry`.
pub struct CountingResolver {
    pub inner: Registry,
    pub calls: AtomicUsize,
}

impl CountingResolver {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Resolver for CountingResolver {
    fn resolve(&self, name: &FnName) -> Result<Arc<dyn DynFn>, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(name)
    }
}

fn copy_scalar(v: &Value) -> Result<Value, RuntimeError> {
    match v {
        Value::Nil => Ok(Value::Nil),
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::Float(f) => Ok(Value::Float(*f)),
        Value::Str(s) => Ok(Value::Str(s.clone())),
        Value::Bytes(b) => Ok(Value::Bytes(b.clone())),
        other => Err(RuntimeError::new(format!("cannot copy a {}", other.type_name()))),
    }
}

/// Registry with the functions used across the integration tests.
///
/// `pulled` counts elements produced by `test.fns/lazy-range`.
pub fn registry(pulled: Arc<AtomicUsize>) -> Registry {
    let reg = Registry::new();

    // One output per input: the input itself.
    reg.register(NS, "identity", |args: Vec<Value>| {
        Ok(Value::List(vec![Value::List(args)]))
    });

    // (x) -> [[x + 1]]
    reg.register(NS, "inc", |args: Vec<Value>| match args.as_slice() {
        [Value::Int(x)] => Ok(Value::list([Value::list([Value::Int(x + 1)])])),
        _ => Err(RuntimeError::new("inc expects one int")),
    });

    // Every field value v becomes one output (v, v).
    reg.register(NS, "dup", |args: Vec<Value>| {
        let out = args
            .iter()
            .map(|v| -> Result<Value, RuntimeError> {
                Ok(Value::list([copy_scalar(v)?, copy_scalar(v)?]))
            })
            .collect::<Result<Vec<_>, RuntimeError>>()?;
        Ok(Value::List(out))
    });

    // (a, b, ...) -> [[a], [b], ...]
    reg.register(NS, "split", |args: Vec<Value>| {
        Ok(Value::List(
            args.into_iter().map(|v| Value::List(vec![v])).collect(),
        ))
    });

    reg.register(NS, "empty", |_args: Vec<Value>| Ok(Value::List(vec![])));
    reg.register(NS, "nil", |_args: Vec<Value>| Ok(Value::Nil));

    // Throws on 13, otherwise behaves like identity.
    reg.register(NS, "unlucky", |args: Vec<Value>| {
        if matches!(args.as_slice(), [Value::Int(13)]) {
            return Err(RuntimeError::new("13 is unlucky"));
        }
        Ok(Value::List(vec![Value::List(args)]))
    });

    // Second element has the wrong arity.
    reg.register(NS, "bad-shape", |_args: Vec<Value>| {
        Ok(Value::list([
            Value::list([Value::Int(1)]),
            Value::list([Value::Int(1), Value::Int(2)]),
            Value::list([Value::Int(3)]),
        ]))
    });

    // (n) -> lazily produced [[0], [1], ..., [n - 1]]
    reg.register(NS, "lazy-range", move |args: Vec<Value>| match args.as_slice() {
        [Value::Int(n)] => {
            let pulled = Arc::clone(&pulled);
            Ok(Value::Lazy(LazySeq::new((0..*n).map(move |i| {
                pulled.fetch_add(1, Ordering::SeqCst);
                Ok(Value::list([Value::Int(i)]))
            }))))
        }
        _ => Err(RuntimeError::new("lazy-range expects one int")),
    });

    // Lazy sequence whose third element fails to produce.
    reg.register(NS, "lazy-broken", |_args: Vec<Value>| {
        Ok(Value::Lazy(LazySeq::new((0..5i64).map(|i| {
            if i == 2 {
                Err(RuntimeError::new("generator blew up"))
            } else {
                Ok(Value::list([Value::Int(i)]))
            }
        }))))
    });

    // (text) -> one (word, length) per whitespace-separated word, as maps.
    reg.register(NS, "words", |args: Vec<Value>| match args.as_slice() {
        [Value::Str(text)] => Ok(Value::List(
            text.split_whitespace()
                .map(|w| {
                    Value::Map(vec![
                        (Value::from("len"), Value::Int(w.len() as i64)),
                        (Value::from("word"), Value::from(w)),
                    ])
                })
                .collect(),
        )),
        _ => Err(RuntimeError::new("words expects one string")),
    });

    reg
}

pub fn counting_resolver() -> Arc<CountingResolver> {
    Arc::new(CountingResolver {
        inner: registry(Arc::new(AtomicUsize::new(0))),
        calls: AtomicUsize::new(0),
    })
}

pub fn flat_map(fields: &[&str], function: &str, resolver: Arc<dyn Resolver>) -> FlatMapOperator {
    FlatMapOperator::new(
        Schema::of_names(fields.iter().copied()),
        FnName::new(NS, function),
        resolver,
    )
}
