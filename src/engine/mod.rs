mod reconciler;

pub use reconciler::Reconciler;

use crate::element::Element;
use crate::error::Result;
use crate::tree::InstanceId;

/// Identifier of a root container owned by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(pub(crate) u32);

/// Opaque handle to one scheduled or completed update, returned unchanged
/// through `render`. Monotonically increasing per engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UpdateHandle(pub(crate) u64);

/// Completion callback invoked after a commit finishes.
pub type CommitCallback = Box<dyn FnOnce()>;

/// The calling contract of the external reconciliation engine. The root
/// binder depends only on this interface; any engine honoring the
/// [`HostConfig`](crate::adapter::HostConfig) protocol can be injected.
pub trait Engine {
    /// Create a persistent container bound to a concrete root node. The
    /// mutation capability is fixed for the container's lifetime.
    fn create_container(&mut self, root: InstanceId, supports_mutation: bool) -> ContainerId;

    /// Reconcile the container against a new tree description: compute what
    /// changed, then realize it through the host callbacks.
    fn update_container(
        &mut self,
        element: Element,
        container: ContainerId,
        callback: Option<CommitCallback>,
    ) -> Result<UpdateHandle>;
}
