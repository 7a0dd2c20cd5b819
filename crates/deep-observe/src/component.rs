//! Component lifecycle.
//!
//! A component moves through [`ComponentStatus`] values; code can hook a
//! status to run once the component reaches it. Watchers use the `Ready`
//! transition to bind themselves.

use std::cell::{Cell, RefCell};
use std::fmt;

use tracing::debug;

use crate::observe_object::ObserveObject;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ComponentStatus {
    #[default]
    BeforeInit,
    Ready,
    BeforeDestruct,
    Destructed,
}

type Hook = Box<dyn FnOnce()>;

#[derive(Default)]
pub struct Lifecycle {
    status: Cell<ComponentStatus>,
    hooks: RefCell<Vec<(ComponentStatus, Hook)>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ComponentStatus {
        self.status.get()
    }

    pub fn is_ready(&self) -> bool {
        self.status() == ComponentStatus::Ready
    }

    pub fn is_in_destruct(&self) -> bool {
        matches!(
            self.status(),
            ComponentStatus::BeforeDestruct | ComponentStatus::Destructed
        )
    }

    /// Moves to `status` and runs the hooks waiting for it, in hook order.
    pub fn set_status(&self, status: ComponentStatus) {
        if self.status.get() == status {
            return;
        }
        debug!(from = ?self.status.get(), to = ?status, "component status change");
        self.status.set(status);
        let due: Vec<Hook> = {
            let mut hooks = self.hooks.borrow_mut();
            let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut *hooks)
                .into_iter()
                .partition(|(wanted, _)| *wanted == status);
            *hooks = waiting;
            due.into_iter().map(|(_, hook)| hook).collect()
        };
        for hook in due {
            hook();
        }
    }

    /// Runs `hook` when the component reaches `status`, or right away if it
    /// is already there.
    pub fn hook_status<F>(&self, status: ComponentStatus, hook: F)
    where
        F: FnOnce() + 'static,
    {
        if self.status.get() == status {
            hook();
            return;
        }
        self.hooks.borrow_mut().push((status, Box::new(hook)));
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("status", &self.status.get())
            .field("pending_hooks", &self.hooks.borrow().len())
            .finish()
    }
}

/// An object with a lifecycle and observed fields.
pub trait Component: 'static {
    fn lifecycle(&self) -> &Lifecycle;

    /// The observed root holding the component's fields; watched paths such
    /// as `state.some.element` start with a field name. `None` leaves any
    /// watchers dormant.
    fn observed(&self) -> Option<ObserveObject>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn hooks_run_on_matching_status_only() {
        let lifecycle = Lifecycle::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (Rc::clone(&log), Rc::clone(&log));
        lifecycle.hook_status(ComponentStatus::Ready, move || a.borrow_mut().push("ready"));
        lifecycle.hook_status(ComponentStatus::Destructed, move || b.borrow_mut().push("gone"));

        lifecycle.set_status(ComponentStatus::Ready);
        assert_eq!(*log.borrow(), vec!["ready"]);
        lifecycle.set_status(ComponentStatus::Ready);
        assert_eq!(*log.borrow(), vec!["ready"]);

        lifecycle.set_status(ComponentStatus::Destructed);
        assert_eq!(*log.borrow(), vec!["ready", "gone"]);
        assert!(lifecycle.is_in_destruct());
    }

    #[test]
    fn hook_runs_immediately_when_already_in_status() {
        let lifecycle = Lifecycle::new();
        lifecycle.set_status(ComponentStatus::Ready);
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        lifecycle.hook_status(ComponentStatus::Ready, move || flag.set(true));
        assert!(ran.get());
    }

    #[test]
    fn hook_may_register_another_hook() {
        let lifecycle = Rc::new(Lifecycle::new());
        let ran = Rc::new(Cell::new(0));
        let (inner, counter) = (Rc::clone(&lifecycle), Rc::clone(&ran));
        lifecycle.hook_status(ComponentStatus::Ready, move || {
            let counter = Rc::clone(&counter);
            inner.hook_status(ComponentStatus::Destructed, move || counter.set(counter.get() + 1));
        });
        lifecycle.set_status(ComponentStatus::Ready);
        lifecycle.set_status(ComponentStatus::Destructed);
        assert_eq!(ran.get(), 1);
    }
}
