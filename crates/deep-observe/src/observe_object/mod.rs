//! Observed object graphs.
//!
//! [`ObserveObject::create`] wraps a plain object or array. Reads through the
//! wrapper hand out [`ObservedNode`]s for nested containers, each knowing its
//! dot path from the root; writes through any node compare the old and new
//! value with [`is_equal`] and, on a real change, run the change cascade on
//! the root's listener registry:
//!
//! 1. `change` with the written path,
//! 2. `change.<path>` for the written path,
//! 3. `change.<ancestor>` for every ancestor, most specific first.
//!
//! Listeners run synchronously inside the write.

use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use deep_observe_util::path::{assign, child, ensure_containers, get, join_path, split_path};
use deep_observe_util::{is_equal, Array, Object, Value};
use tracing::warn;

use crate::error::ObserveError;
use crate::options::ObserveOptions;

mod events;
mod registry;

pub use events::{event_key, ChangeEvent, EventKeys, ListenerId, CHANGE_EVENT};
use registry::Registry;

/// The raw container behind a node.
#[derive(Clone)]
pub enum Container {
    Object(Object),
    Array(Array),
}

impl Container {
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(obj) => Some(Container::Object(obj)),
            Value::Array(arr) => Some(Container::Array(arr)),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Container::Object(obj) => Value::Object(obj.clone()),
            Container::Array(arr) => Value::Array(arr.clone()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Container::Object(obj) => obj.len(),
            Container::Array(arr) => arr.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Object> for Container {
    fn from(obj: Object) -> Self {
        Container::Object(obj)
    }
}

impl From<Array> for Container {
    fn from(arr: Array) -> Self {
        Container::Array(arr)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_value(), f)
    }
}

/// Result of reading a property through a node.
#[derive(Debug, Clone)]
pub enum Observed {
    /// The property holds a container; writes through it are observed.
    Node(ObservedNode),
    Value(Value),
}

impl Observed {
    pub fn node(self) -> Option<ObservedNode> {
        match self {
            Observed::Node(node) => Some(node),
            Observed::Value(_) => None,
        }
    }

    /// The raw value, unwrapping a node to its container.
    pub fn into_value(self) -> Value {
        match self {
            Observed::Node(node) => node.target.to_value(),
            Observed::Value(value) => value,
        }
    }
}

/// A container inside an observed graph, addressed by its path from the root.
///
/// Nodes are cheap handles created on each read. They reach the listener
/// registry through a weak reference: once the [`ObserveObject`] and all its
/// clones are dropped, writes still land but notify nobody.
#[derive(Clone)]
pub struct ObservedNode {
    target: Container,
    path: Rc<str>,
    registry: Weak<Registry>,
}

impl ObservedNode {
    /// Dot path from the root; empty for the root itself.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw container, shared with the graph.
    pub fn target(&self) -> Value {
        self.target.to_value()
    }

    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Reads `key`, wrapping containers as child nodes.
    pub fn get(&self, key: &str) -> Observed {
        let value = self.value(key);
        match Container::from_value(value.clone()) {
            Some(target) => Observed::Node(self.wrap(target, join_path(&self.path, key))),
            None => Observed::Value(value),
        }
    }

    /// Raw value under `key`, `Undefined` when absent.
    pub fn value(&self, key: &str) -> Value {
        child(&self.target.to_value(), key).unwrap_or_default()
    }

    /// Child node under `key`, if it holds a container.
    pub fn child(&self, key: &str) -> Option<ObservedNode> {
        self.get(key).node()
    }

    /// Walks a relative dot path down to a container node.
    pub fn at(&self, path: &str) -> Option<ObservedNode> {
        let mut node = self.clone();
        for segment in split_path(path) {
            node = node.child(segment)?;
        }
        Some(node)
    }

    /// Raw value at a relative dot path, `Undefined` when absent.
    pub fn read(&self, path: &str) -> Value {
        get(path, &self.target.to_value())
    }

    /// Writes `key` and runs the change cascade if the value really changed.
    ///
    /// The write is stored even when the new value equals the old one. Returns
    /// `true` when the value changed. Writing an array under a non-index key,
    /// or under an index far past its end, is ignored.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> bool {
        let new_value = value.into();
        let target = self.target.to_value();
        let old_value = child(&target, key).unwrap_or_default();
        let unchanged = is_equal(&old_value, &new_value);
        if !assign(&target, key, new_value.clone()) {
            warn!(
                path = %self.path,
                key,
                "ignoring array write to a non-index or out-of-range key"
            );
            return false;
        }
        if unchanged {
            return false;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.dispatch(&ChangeEvent {
                path: join_path(&self.path, key),
                old_value,
                new_value,
            });
        }
        true
    }

    /// Appends to an array node. Returns `false` for object nodes.
    pub fn push(&self, value: impl Into<Value>) -> bool {
        match &self.target {
            Container::Array(arr) => self.set(&arr.len().to_string(), value),
            Container::Object(_) => false,
        }
    }

    fn wrap(&self, target: Container, path: String) -> ObservedNode {
        ObservedNode {
            target,
            path: path.into(),
            registry: Weak::clone(&self.registry),
        }
    }
}

impl fmt::Debug for ObservedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservedNode")
            .field("path", &self.path)
            .field("target", &self.target)
            .finish()
    }
}

/// The observed root: owns the listener registry for the whole graph.
///
/// Dereferences to the root [`ObservedNode`], so reads and writes work the
/// same on the root as on any nested node. Clones share the registry.
#[derive(Clone)]
pub struct ObserveObject {
    registry: Rc<Registry>,
    root: ObservedNode,
}

impl ObserveObject {
    pub fn create(target: impl Into<Container>) -> Self {
        Self::with_options(target, ObserveOptions::default())
    }

    pub fn with_options(target: impl Into<Container>, options: ObserveOptions) -> Self {
        let registry = Rc::new(Registry::new(options));
        let root = ObservedNode {
            target: target.into(),
            path: Rc::from(""),
            registry: Rc::downgrade(&registry),
        };
        Self { registry, root }
    }

    /// Observes `value` if it is an object or array.
    pub fn try_from_value(value: Value) -> Result<Self, ObserveError> {
        let kind = value.kind();
        match Container::from_value(value) {
            Some(target) => Ok(Self::create(target)),
            None => {
                warn!(kind, "refusing to observe a non-container value");
                Err(ObserveError::NotObservable { kind })
            }
        }
    }

    /// Like [`ObserveObject::try_from_value`], but silently yields `None`.
    pub fn observe(value: Value) -> Option<Self> {
        Container::from_value(value).map(Self::create)
    }

    /// Subscribes `callback` under one or several event keys.
    ///
    /// Keys are `change` for every write, or `change.<path>` for writes at
    /// `path` or below it.
    pub fn on<K, F>(&self, keys: K, callback: F) -> ListenerId
    where
        K: EventKeys,
        F: Fn(&ChangeEvent) + 'static,
    {
        self.registry.on(keys.into_event_keys(), Rc::new(callback))
    }

    /// Removes one subscription from one key.
    pub fn off(&self, key: &str, id: ListenerId) -> bool {
        self.registry.off(key, id)
    }

    /// Removes one subscription from every key; returns how many entries went.
    pub fn off_all(&self, id: ListenerId) -> usize {
        self.registry.off_all(id)
    }

    pub fn listener_count(&self, key: &str) -> usize {
        self.registry.listener_count(key)
    }

    pub fn options(&self) -> &ObserveOptions {
        self.registry.options()
    }

    pub fn node(&self) -> &ObservedNode {
        &self.root
    }

    /// Raw value at a dot path from the root.
    pub fn get_path(&self, path: &str) -> Value {
        self.root.read(path)
    }

    /// Writes along a dot path from the root.
    ///
    /// Missing intermediate segments are created as plain objects without
    /// notification; the final segment is written through the observing node,
    /// so the cascade covers the full path and its ancestors.
    pub fn set_path(&self, path: &str, value: impl Into<Value>) -> bool {
        let segments: Vec<&str> = split_path(path).collect();
        let Some((last, parents)) = segments.split_last() else {
            return false;
        };
        let parent =
            ensure_containers(&self.root.target(), parents).and_then(Container::from_value);
        match parent {
            Some(target) => self.root.wrap(target, parents.join(".")).set(last, value),
            None => {
                warn!(path, "cannot create intermediate containers for write");
                false
            }
        }
    }
}

impl Deref for ObserveObject {
    type Target = ObservedNode;

    fn deref(&self) -> &ObservedNode {
        &self.root
    }
}

impl fmt::Debug for ObserveObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserveObject")
            .field("target", &self.root.target)
            .field("options", self.registry.options())
            .finish()
    }
}
