use super::node::InstanceId;
use crate::error::Result;
use crate::events::EventHandler;

/// The primitive operations a target environment must implement to be
/// driven by the host adapter. Each call is a single, immediate,
/// synchronous mutation or pure construction.
pub trait TargetTree {
    /// Allocate a new, parentless element node of the given type.
    fn create_element_node(&mut self, ty: &str) -> InstanceId;

    /// Allocate a new, parentless text leaf.
    fn create_text_node(&mut self, text: &str) -> InstanceId;

    /// Overwrite one attribute. Idempotent.
    fn set_attribute(&mut self, instance: InstanceId, key: &str, value: &str) -> Result<()>;

    /// Replace an element's inline text content (distinct from a text leaf).
    fn set_text_content(&mut self, instance: InstanceId, value: &str) -> Result<()>;

    /// Append to the end of the parent's child order. Fails when `child`
    /// already has a different parent; re-appending under the same parent
    /// moves it to the end. This trait never re-parents implicitly.
    fn append_child(&mut self, parent: InstanceId, child: InstanceId) -> Result<()>;

    /// Detach one direct child. Never recursive: the caller only names the
    /// top node of a removed subtree and descendants stay with it.
    fn remove_child(&mut self, parent: InstanceId, child: InstanceId) -> Result<()>;

    /// Overwrite a text leaf's payload.
    fn set_text(&mut self, instance: InstanceId, value: &str) -> Result<()>;

    /// First entry of the parent's child order, if any. Read access the
    /// adapter needs to drain a container through `remove_child`.
    fn first_child(&self, parent: InstanceId) -> Option<InstanceId>;
}

/// Listener registration, the one part of instance setup the structural
/// primitives cannot express.
pub trait EventTarget {
    /// Register or replace the listener for one event name on one element.
    fn add_event_listener(
        &mut self,
        instance: InstanceId,
        event: &str,
        handler: EventHandler,
    ) -> Result<()>;

    /// Current listener for an event name, if one is registered.
    fn handler(&self, instance: InstanceId, event: &str) -> Option<EventHandler>;
}
