//! Method path-watchers.
//!
//! [`Watchers`] associates component methods with the state paths they react
//! to. The registry is built once per component type and realized per
//! instance: [`Watchers::attach`] binds on the instance's `Ready` transition,
//! [`Watchers::bind`] binds right away.
//!
//! Binding one watch calls the method once with the current value at the
//! path, then again after every change cascade that reaches `change.<path>`,
//! i.e. writes at the path or below it.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use deep_observe::{Component, ComponentStatus, Lifecycle, ObserveObject, Watchers};
//! use deep_observe_util::Value;
//! use serde_json::json;
//!
//! struct Toolbar {
//!     lifecycle: Lifecycle,
//!     fields: ObserveObject,
//!     seen: RefCell<Vec<String>>,
//! }
//!
//! impl Component for Toolbar {
//!     fn lifecycle(&self) -> &Lifecycle {
//!         &self.lifecycle
//!     }
//!
//!     fn observed(&self) -> Option<ObserveObject> {
//!         Some(self.fields.clone())
//!     }
//! }
//!
//! let watchers = Watchers::new().watch("state.mode", "on_mode", |bar: &Toolbar, mode: &Value| {
//!     bar.seen.borrow_mut().push(mode.to_string());
//! });
//!
//! let state = json!({"state": {"mode": "wysiwyg"}});
//! let fields = ObserveObject::observe(Value::from(state)).unwrap();
//! let bar = Rc::new(Toolbar { lifecycle: Lifecycle::new(), fields, seen: RefCell::default() });
//! watchers.attach(&bar);
//! bar.lifecycle().set_status(ComponentStatus::Ready);
//!
//! bar.fields.set_path("state.mode", "source");
//! assert_eq!(*bar.seen.borrow(), vec![r#""wysiwyg""#, r#""source""#]);
//! ```

use std::fmt;
use std::rc::Rc;

use deep_observe_util::path::split_path;
use deep_observe_util::Value;
use tracing::{debug, warn};

use crate::component::{Component, ComponentStatus};
use crate::observe_object::{event_key, ChangeEvent, ListenerId, ObserveObject};

type Method<C> = Rc<dyn Fn(&C, &Value)>;

/// Which method reacts to which path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchBinding {
    pub watched_path: String,
    pub method_name: String,
    /// Call the method once when the binding is realized.
    pub immediate: bool,
}

pub struct Watchers<C> {
    entries: Vec<(WatchBinding, Method<C>)>,
}

impl<C> Clone for Watchers<C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<C> Default for Watchers<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C> fmt::Debug for Watchers<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(binding, _)| binding))
            .finish()
    }
}

impl<C: Component> Watchers<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Watches `path` with `method`, calling it once on bind.
    pub fn watch<F>(
        self,
        path: impl Into<String>,
        method_name: impl Into<String>,
        method: F,
    ) -> Self
    where
        F: Fn(&C, &Value) + 'static,
    {
        self.push(path.into(), method_name.into(), true, Rc::new(method))
    }

    /// Watches `path` with `method`, only calling it on later changes.
    pub fn watch_deferred<F>(
        self,
        path: impl Into<String>,
        method_name: impl Into<String>,
        method: F,
    ) -> Self
    where
        F: Fn(&C, &Value) + 'static,
    {
        self.push(path.into(), method_name.into(), false, Rc::new(method))
    }

    fn push(
        mut self,
        watched_path: String,
        method_name: String,
        immediate: bool,
        method: Method<C>,
    ) -> Self {
        self.entries.push((
            WatchBinding {
                watched_path,
                method_name,
                immediate,
            },
            method,
        ));
        self
    }

    pub fn bindings(&self) -> impl Iterator<Item = &WatchBinding> {
        self.entries.iter().map(|(binding, _)| binding)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Binds on the instance's transition to `Ready` (at once if it is ready
    /// already). An instance that never gets ready keeps its watchers dormant.
    pub fn attach(&self, instance: &Rc<C>) {
        let watchers = self.clone();
        let weak = Rc::downgrade(instance);
        instance
            .lifecycle()
            .hook_status(ComponentStatus::Ready, move || {
                if let Some(instance) = weak.upgrade() {
                    watchers.bind(&instance);
                }
            });
    }

    /// Realizes every binding on `instance`, in registration order.
    pub fn bind(&self, instance: &Rc<C>) -> BoundWatchers {
        let Some(observed) = instance.observed() else {
            warn!(
                watchers = self.entries.len(),
                "component exposes no observed state; watchers stay dormant"
            );
            return BoundWatchers::default();
        };
        let mut registrations = Vec::with_capacity(self.entries.len());
        for (binding, method) in &self.entries {
            if binding.immediate {
                initial_call(instance.as_ref(), &observed, binding, method);
            }
            let key = event_key(&binding.watched_path);
            let id = observed.on(key.as_str(), listener(instance, binding, method));
            registrations.push((key, id));
        }
        BoundWatchers {
            observed: Some(observed),
            registrations,
        }
    }
}

fn initial_call<C>(
    instance: &C,
    observed: &ObserveObject,
    binding: &WatchBinding,
    method: &Method<C>,
) {
    let field = split_path(&binding.watched_path).next().unwrap_or_default();
    if observed.value(field).is_undefined() {
        debug!(
            path = %binding.watched_path,
            method = %binding.method_name,
            "watched field is absent; skipping initial call"
        );
        return;
    }
    method(instance, &observed.get_path(&binding.watched_path));
}

/// The change listener for one binding. It holds the instance weakly and
/// re-reads the value at the watched path on every call.
fn listener<C: Component>(
    instance: &Rc<C>,
    binding: &WatchBinding,
    method: &Method<C>,
) -> impl Fn(&ChangeEvent) + 'static {
    let weak = Rc::downgrade(instance);
    let method = Rc::clone(method);
    let path = binding.watched_path.clone();
    move |_event: &ChangeEvent| {
        let Some(instance) = weak.upgrade() else {
            return;
        };
        if instance.lifecycle().is_in_destruct() {
            return;
        }
        let value = instance
            .observed()
            .map(|observed| observed.get_path(&path))
            .unwrap_or_default();
        method(instance.as_ref(), &value);
    }
}

/// Listener registrations made by one [`Watchers::bind`] call.
#[derive(Debug, Default)]
pub struct BoundWatchers {
    observed: Option<ObserveObject>,
    registrations: Vec<(String, ListenerId)>,
}

impl BoundWatchers {
    pub fn registrations(&self) -> &[(String, ListenerId)] {
        &self.registrations
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Removes every listener this bind registered; returns how many went.
    pub fn unbind(self) -> usize {
        let Some(observed) = self.observed else {
            return 0;
        };
        self.registrations
            .iter()
            .filter(|(key, id)| observed.off(key, *id))
            .count()
    }
}
