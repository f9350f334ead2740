use super::context::HostContext;
use super::payload::UpdatePayload;
use crate::element::Props;
use crate::error::Result;
use crate::tree::InstanceId;
use std::time::Duration;

/// The fixed callback contract a reconciliation engine drives a host
/// through. The engine invokes these serially on one thread, with a strict
/// phase discipline per commit: every build-phase callback completes before
/// the first commit-phase callback runs.
///
/// Build-phase callbacks assemble new subtrees off the visible tree and
/// compute update payloads; they must never mutate a node that is already
/// attached. Commit-phase callbacks attach, update and detach against the
/// visible tree. There is no atomicity across callbacks: a failing commit
/// callback aborts the commit and already-applied mutations stay.
pub trait HostConfig {
    /// Capability flag: this host mutates the retained tree in place rather
    /// than rebuilding a persistent parallel tree. Selects which subset of
    /// the callback surface an engine will invoke.
    fn supports_mutation(&self) -> bool;

    // Build phase.

    fn get_root_host_context(&self) -> HostContext;

    fn get_child_host_context(&self, parent: &HostContext, ty: &str) -> HostContext;

    /// True when the element's `children` prop is a single primitive, which
    /// means "render as inline text, not as child nodes".
    fn should_set_text_content(&self, ty: &str, props: &Props) -> bool;

    /// Allocate a fresh instance and apply every prop except nested child
    /// nodes. Must not attach the instance anywhere and must not register
    /// cross-tree side effects; only the freshly created node is touched.
    fn create_instance(
        &mut self,
        ty: &str,
        props: &Props,
        root: InstanceId,
        ctx: &HostContext,
    ) -> Result<InstanceId>;

    fn create_text_instance(&mut self, text: &str) -> InstanceId;

    /// Append into a parent that is still being assembled off-tree.
    fn append_initial_child(&mut self, parent: InstanceId, child: InstanceId) -> Result<()>;

    /// Last chance to mutate an instance before it is attached. Returns
    /// whether the instance wants a notification once it is in the tree.
    fn finalize_initial_children(&mut self, instance: InstanceId, ty: &str, props: &Props)
        -> bool;

    /// Compute the payload a later commit will apply. Pure with respect to
    /// the tree: no mutation happens here.
    fn prepare_update(&self, instance: InstanceId, old_props: &Props, new_props: &Props)
        -> UpdatePayload;

    // Commit phase.

    fn commit_update(
        &mut self,
        instance: InstanceId,
        payload: &UpdatePayload,
        ty: &str,
        old_props: &Props,
        new_props: &Props,
    ) -> Result<()>;

    fn commit_text_update(
        &mut self,
        instance: InstanceId,
        old_text: &str,
        new_text: &str,
    ) -> Result<()>;

    /// Attach an already-built subtree's top node under a parent.
    fn append_child(&mut self, parent: InstanceId, child: InstanceId) -> Result<()>;

    /// Attach an already-built subtree's top node under the container root.
    fn append_child_to_container(&mut self, root: InstanceId, child: InstanceId) -> Result<()>;

    /// Detach the top node of a removed subtree. Called once per subtree;
    /// descendants go with it.
    fn remove_child(&mut self, parent: InstanceId, child: InstanceId) -> Result<()>;

    /// Remove every child of the container root. Idempotent.
    fn clear_container(&mut self, root: InstanceId) -> Result<()>;

    /// Bracket around a whole commit. The default host does nothing, but an
    /// adapter may use the pair to suspend event delivery for the duration.
    fn prepare_for_commit(&mut self);

    fn reset_after_commit(&mut self);

    /// Monotonic non-decreasing clock an engine may use for scheduling.
    fn now(&self) -> Duration;
}
