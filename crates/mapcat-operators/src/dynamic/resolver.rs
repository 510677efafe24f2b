//! Function lookup by namespace-qualified name.
//!
//! `Registry` is an in-memory resolver. Namespaces are either filled eagerly
//! with `register`, or registered with a loader that installs their functions
//! the first time anything in them is resolved.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use super::function::{DynFn, FnName, RuntimeError};
use super::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("invalid function name '{0}' (expected ns/name)")]
    InvalidName(String),

    #[error("unknown namespace '{0}'")]
    UnknownNamespace(String),

    #[error("no function '{name}' in namespace '{ns}'")]
    UnknownFunction { ns: String, name: String },

    #[error("loading namespace '{ns}' failed: {source}")]
    Load {
        ns: String,
        #[source]
        source: RuntimeError,
    },
}

/// Maps a function name to something invocable.
pub trait Resolver: Send + Sync {
    fn resolve(&self, name: &FnName) -> Result<Arc<dyn DynFn>, ResolveError>;
}

impl<R: Resolver + ?Sized> Resolver for Arc<R> {
    fn resolve(&self, name: &FnName) -> Result<Arc<dyn DynFn>, ResolveError> {
        (**self).resolve(name)
    }
}

/// Function table of one namespace.
#[derive(Default)]
pub struct Namespace {
    fns: HashMap<String, Arc<dyn DynFn>>,
}

impl Namespace {
    pub fn define<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(Vec<Value>) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        self.insert(name, Arc::new(f))
    }

    /// Install an already-built function object.
    pub fn insert(&mut self, name: impl Into<String>, f: Arc<dyn DynFn>) -> &mut Self {
        self.fns.insert(name.into(), f);
        self
    }

    pub fn len(&self) -> usize {
        self.fns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fns.is_empty()
    }
}

type Loader = Arc<dyn Fn(&mut Namespace) -> Result<(), RuntimeError> + Send + Sync>;

struct Slot {
    fns: Namespace,
    loader: Option<Loader>,
    loaded: bool,
}

/// In-memory `Resolver`.
#[derive(Default)]
pub struct Registry {
    namespaces: Mutex<HashMap<String, Slot>>,
    lookups: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `ns/name` immediately.
    pub fn register<F>(&self, ns: impl Into<String>, name: impl Into<String>, f: F) -> &Self
    where
        F: Fn(Vec<Value>) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        self.register_dyn(ns, name, Arc::new(f))
    }

    /// Define `ns/name` from an already-built function object.
    pub fn register_dyn(
        &self,
        ns: impl Into<String>,
        name: impl Into<String>,
        f: Arc<dyn DynFn>,
    ) -> &Self {
        let mut namespaces = self.lock();
        let slot = namespaces.entry(ns.into()).or_insert_with(|| Slot {
            fns: Namespace::default(),
            loader: None,
            loaded: true,
        });
        slot.fns.insert(name, f);
        self
    }

    /// Register a namespace whose functions are installed on first resolve.
    ///
    /// The loader runs without the registry lock held, so it may resolve
    /// other namespaces. Its definitions replace same-named eager ones.
    /// A failed load leaves the namespace unloaded; the next resolve retries.
    pub fn register_loader<L>(&self, ns: impl Into<String>, loader: L) -> &Self
    where
        L: Fn(&mut Namespace) -> Result<(), RuntimeError> + Send + Sync + 'static,
    {
        let mut namespaces = self.lock();
        let slot = namespaces.entry(ns.into()).or_insert_with(|| Slot {
            fns: Namespace::default(),
            loader: None,
            loaded: false,
        });
        slot.loader = Some(Arc::new(loader));
        slot.loaded = false;
        self
    }

    /// Number of `resolve` calls served so far, successful or not.
    pub fn resolve_count(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Slot>> {
        // Critical sections only touch the map; a poisoned guard is still consistent.
        self.namespaces
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Resolver for Registry {
    fn resolve(&self, name: &FnName) -> Result<Arc<dyn DynFn>, ResolveError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);

        let loader = {
            let namespaces = self.lock();
            let slot = namespaces
                .get(&name.ns)
                .ok_or_else(|| ResolveError::UnknownNamespace(name.ns.clone()))?;
            if slot.loaded {
                return lookup(slot, name);
            }
            slot.loader.clone()
        };

        let mut fresh = Namespace::default();
        if let Some(loader) = loader {
            loader(&mut fresh).map_err(|source| ResolveError::Load {
                ns: name.ns.clone(),
                source,
            })?;
        }

        let mut namespaces = self.lock();
        let slot = namespaces
            .get_mut(&name.ns)
            .ok_or_else(|| ResolveError::UnknownNamespace(name.ns.clone()))?;
        // Two first resolves may race; whichever merges first wins.
        if !slot.loaded {
            slot.fns.fns.extend(fresh.fns);
            slot.loaded = true;
            tracing::debug!(ns = %name.ns, functions = slot.fns.len(), "namespace loaded");
        }
        lookup(slot, name)
    }
}

fn lookup(slot: &Slot, name: &FnName) -> Result<Arc<dyn DynFn>, ResolveError> {
    slot.fns
        .fns
        .get(&name.name)
        .cloned()
        .ok_or_else(|| ResolveError::UnknownFunction {
            ns: name.ns.clone(),
            name: name.name.clone(),
        })
}
