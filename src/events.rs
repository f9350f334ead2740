use crate::element::UiString;
use crate::tree::{EventTarget, InstanceId};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A shared zero-argument event callback.
///
/// Handlers are compared by pointer identity: a fresh closure built on every
/// render pass counts as a change, while a handler cloned from a previous
/// pass does not.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn()>);

impl EventHandler {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self) {
        (self.0)()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventHandler")
    }
}

/// Map an `onClick`-style prop key to its event name (`"click"`).
///
/// A key is recognized when it starts with `on` followed by an uppercase
/// letter; everything after the prefix is lowercased.
pub fn event_name_of_prop(key: &str) -> Option<UiString> {
    let rest = key.strip_prefix("on")?;
    let first = rest.chars().next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    Some(rest.to_ascii_lowercase().into())
}

/// Invoke the listener registered for `event` on `instance`, if any.
///
/// The handler is cloned out of the tree before it runs, so a handler is
/// free to borrow the tree again, including re-entering `render`.
pub fn dispatch_event<T: EventTarget>(
    tree: &Rc<RefCell<T>>,
    instance: InstanceId,
    event: &str,
) -> bool {
    let handler = tree.borrow().handler(instance, event);
    match handler {
        Some(handler) => {
            handler.call();
            true
        }
        None => false,
    }
}
