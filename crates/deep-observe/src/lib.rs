//! deep-observe - change notification for nested plain values.
//!
//! - [`ObserveObject`] wraps an object graph and fires path-keyed change
//!   events (`change`, `change.some.element`, ...) on every real change.
//! - [`Watchers`] binds component methods to state paths.
//!
//! The standalone helpers (`is_equal`, `stringify`, `get`, `set`) live in
//! [`deep_observe_util`] and are re-exported as [`helpers`].

pub mod component;
pub mod error;
pub mod observe_object;
pub mod options;
pub mod watch;

pub use component::{Component, ComponentStatus, Lifecycle};
pub use error::ObserveError;
pub use observe_object::{
    event_key, ChangeEvent, Container, EventKeys, ListenerId, ObserveObject, Observed,
    ObservedNode, CHANGE_EVENT,
};
pub use options::{ObserveOptions, Reentrancy};
pub use watch::{BoundWatchers, WatchBinding, Watchers};

/// Standalone value helpers.
pub mod helpers {
    pub use deep_observe_util::{
        deep_clone, get, is_equal, set, stringify, stringify_with, StringifyOptions,
        REF_OBJECT_MARKER,
    };
}

pub use deep_observe_util::{Array, Function, Host, Object, Value};
