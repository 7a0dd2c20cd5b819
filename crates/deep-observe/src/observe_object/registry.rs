use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::{debug, trace, warn};

use super::events::{cascade_keys, ChangeEvent, ListenerId};
use crate::options::{ObserveOptions, Reentrancy};

pub(crate) type Listener = Rc<dyn Fn(&ChangeEvent)>;

/// Listener registry shared by every node of one observed graph.
pub(crate) struct Registry {
    options: ObserveOptions,
    next_listener_id: Cell<u64>,
    listeners: RefCell<HashMap<String, Vec<(ListenerId, Listener)>>>,
    /// Keys whose listeners are running right now.
    active: RefCell<HashSet<String>>,
    depth: Cell<usize>,
}

impl Registry {
    pub(crate) fn new(options: ObserveOptions) -> Self {
        Self {
            options,
            next_listener_id: Cell::new(1),
            listeners: RefCell::new(HashMap::new()),
            active: RefCell::new(HashSet::new()),
            depth: Cell::new(0),
        }
    }

    pub(crate) fn options(&self) -> &ObserveOptions {
        &self.options
    }

    pub(crate) fn on(&self, keys: Vec<String>, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener_id.get());
        self.next_listener_id.set(id.0.saturating_add(1));
        if keys.is_empty() {
            debug!(?id, "listener registered without event keys");
        }
        let mut listeners = self.listeners.borrow_mut();
        for key in keys {
            listeners
                .entry(key)
                .or_default()
                .push((id, Rc::clone(&listener)));
        }
        id
    }

    pub(crate) fn off(&self, key: &str, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(list) = listeners.get_mut(key) else {
            return false;
        };
        let before = list.len();
        list.retain(|(listener_id, _)| *listener_id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            listeners.remove(key);
        }
        removed
    }

    pub(crate) fn off_all(&self, id: ListenerId) -> usize {
        let mut listeners = self.listeners.borrow_mut();
        let mut removed = 0;
        listeners.retain(|_, list| {
            let before = list.len();
            list.retain(|(listener_id, _)| *listener_id != id);
            removed += before - list.len();
            !list.is_empty()
        });
        removed
    }

    pub(crate) fn listener_count(&self, key: &str) -> usize {
        self.listeners.borrow().get(key).map_or(0, Vec::len)
    }

    /// Runs the change cascade for one write.
    ///
    /// A subscription registered under several keys runs at most once per
    /// cascade.
    pub(crate) fn dispatch(&self, event: &ChangeEvent) {
        if self.listeners.borrow().is_empty() {
            return;
        }
        let depth = self.depth.get();
        if self.options.reentrancy == Reentrancy::Allow && depth >= self.options.max_depth {
            warn!(
                path = %event.path,
                depth,
                "change cascade suppressed at maximum re-entrant depth"
            );
            return;
        }
        trace!(path = %event.path, depth, "dispatching change cascade");
        self.depth.set(depth + 1);
        let _depth = DepthGuard(&self.depth);

        let mut fired: Vec<ListenerId> = Vec::new();
        for key in cascade_keys(&event.path) {
            self.fire_key(&key, event, &mut fired);
        }
    }

    fn fire_key(&self, key: &str, event: &ChangeEvent, fired: &mut Vec<ListenerId>) {
        // Iterate a snapshot so listeners may subscribe or unsubscribe meanwhile
        let snapshot: Vec<(ListenerId, Listener)> = match self.listeners.borrow().get(key) {
            Some(list) => list.clone(),
            None => return,
        };
        let _lock = match self.options.reentrancy {
            Reentrancy::SkipActive => {
                if !self.active.borrow_mut().insert(key.to_owned()) {
                    debug!(
                        key,
                        path = %event.path,
                        "skipping re-entrant dispatch of an active key"
                    );
                    return;
                }
                Some(KeyLock {
                    active: &self.active,
                    key,
                })
            }
            Reentrancy::Allow => None,
        };
        for (id, listener) in snapshot {
            if fired.contains(&id) {
                continue;
            }
            fired.push(id);
            listener(event);
        }
    }
}

struct DepthGuard<'a>(&'a Cell<usize>);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

struct KeyLock<'a> {
    active: &'a RefCell<HashSet<String>>,
    key: &'a str,
}

impl Drop for KeyLock<'_> {
    fn drop(&mut self) {
        self.active.borrow_mut().remove(self.key);
    }
}
