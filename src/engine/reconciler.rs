use super::{CommitCallback, ContainerId, Engine, UpdateHandle};
use crate::adapter::{HostConfig, HostContext, UpdatePayload};
use crate::element::{Child, Element, PropValue, Props, UiString};
use crate::error::{Result, TreeError};
use crate::tree::InstanceId;
use tracing::debug;

/// Minimal synchronous reconciliation engine.
///
/// Serves as the external collaborator for the host adapter protocol: it
/// diffs the previously committed description against a new one during the
/// build phase, assembling new subtrees off-tree and collecting an ordered
/// list of commit operations, then applies that list through the
/// commit-phase callbacks. No scheduling, no interruption: one call, one
/// complete commit.
pub struct Reconciler<H: HostConfig> {
    host: H,
    containers: Vec<Container>,
    next_update: u64,
}

struct Container {
    root: InstanceId,
    supports_mutation: bool,
    mounted: Option<Mounted>,
    committed_once: bool,
}

/// Bookkeeping for one committed node, pairing the instance with the
/// description it was last reconciled against.
#[derive(Clone)]
enum Mounted {
    Element(MountedElement),
    Text { instance: InstanceId, text: UiString },
}

#[derive(Clone)]
struct MountedElement {
    instance: InstanceId,
    ty: UiString,
    props: Props,
    text_mode: bool,
    children: Vec<Mounted>,
}

impl Mounted {
    fn instance(&self) -> InstanceId {
        match self {
            Mounted::Element(el) => el.instance,
            Mounted::Text { instance, .. } => *instance,
        }
    }
}

/// One deferred mutation, produced in the build phase and applied through a
/// commit-phase callback.
enum CommitOp {
    ClearContainer { root: InstanceId },
    AppendToContainer { root: InstanceId, child: InstanceId },
    Append { parent: InstanceId, child: InstanceId },
    Update {
        instance: InstanceId,
        payload: UpdatePayload,
        ty: UiString,
        old: Props,
        new: Props,
    },
    UpdateText {
        instance: InstanceId,
        old: UiString,
        new: UiString,
    },
    Remove { parent: InstanceId, child: InstanceId },
}

impl<H: HostConfig> Reconciler<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            containers: Vec::new(),
            next_update: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn container_root(&self, container: ContainerId) -> Option<InstanceId> {
        self.containers.get(container.0 as usize).map(|c| c.root)
    }

    /// Assemble a fresh subtree off the visible tree. Children are created
    /// depth-first and appended while the parent is still detached.
    fn mount_element(
        &mut self,
        element: &Element,
        root: InstanceId,
        ctx: &HostContext,
    ) -> Result<MountedElement> {
        let text_mode = self.host.should_set_text_content(element.ty(), element.props());
        let instance = self
            .host
            .create_instance(element.ty(), element.props(), root, ctx)?;

        let mut children = Vec::new();
        if !text_mode {
            if let Some(PropValue::Nodes(nodes)) = element.props().children() {
                let child_ctx = self.host.get_child_host_context(ctx, element.ty());
                for child in nodes {
                    let mounted = self.mount_child(child, root, &child_ctx)?;
                    self.host.append_initial_child(instance, mounted.instance())?;
                    children.push(mounted);
                }
            }
        }

        let _wants_mount_notification =
            self.host
                .finalize_initial_children(instance, element.ty(), element.props());

        Ok(MountedElement {
            instance,
            ty: element.ty().into(),
            props: element.props().clone(),
            text_mode,
            children,
        })
    }

    fn mount_child(&mut self, child: &Child, root: InstanceId, ctx: &HostContext) -> Result<Mounted> {
        match child {
            Child::Element(el) => Ok(Mounted::Element(self.mount_element(el, root, ctx)?)),
            Child::Text(text) => Ok(Mounted::Text {
                instance: self.host.create_text_instance(text.as_str()),
                text: text.clone(),
            }),
        }
    }

    /// Diff a kept node against its new description. Caller guarantees the
    /// type and text mode match; mismatches are replacements, not diffs.
    fn diff_element(
        &mut self,
        old: MountedElement,
        new: &Element,
        root: InstanceId,
        ctx: &HostContext,
        ops: &mut Vec<CommitOp>,
    ) -> Result<MountedElement> {
        let payload = self.host.prepare_update(old.instance, &old.props, new.props());
        if !payload.is_noop() {
            ops.push(CommitOp::Update {
                instance: old.instance,
                payload,
                ty: old.ty.clone(),
                old: old.props.clone(),
                new: new.props().clone(),
            });
        }

        let mut children = Vec::new();
        if !old.text_mode {
            let child_ctx = self.host.get_child_host_context(ctx, new.ty());
            let new_children: &[Child] = match new.props().children() {
                Some(PropValue::Nodes(nodes)) => nodes,
                _ => &[],
            };

            let parent = old.instance;
            let mut old_children = old.children.into_iter();
            for new_child in new_children {
                match (old_children.next(), new_child) {
                    (Some(Mounted::Element(old_el)), Child::Element(new_el))
                        if self.same_shape(&old_el, new_el) =>
                    {
                        children.push(Mounted::Element(
                            self.diff_element(old_el, new_el, root, &child_ctx, ops)?,
                        ));
                    }
                    (Some(Mounted::Text { instance, text }), Child::Text(new_text)) => {
                        if text != *new_text {
                            ops.push(CommitOp::UpdateText {
                                instance,
                                old: text,
                                new: new_text.clone(),
                            });
                        }
                        children.push(Mounted::Text {
                            instance,
                            text: new_text.clone(),
                        });
                    }
                    (Some(old_mismatch), _) => {
                        ops.push(CommitOp::Remove {
                            parent,
                            child: old_mismatch.instance(),
                        });
                        let mounted = self.mount_child(new_child, root, &child_ctx)?;
                        ops.push(CommitOp::Append {
                            parent,
                            child: mounted.instance(),
                        });
                        children.push(mounted);
                    }
                    (None, _) => {
                        let mounted = self.mount_child(new_child, root, &child_ctx)?;
                        ops.push(CommitOp::Append {
                            parent,
                            child: mounted.instance(),
                        });
                        children.push(mounted);
                    }
                }
            }
            for leftover in old_children {
                ops.push(CommitOp::Remove {
                    parent,
                    child: leftover.instance(),
                });
            }
        }

        Ok(MountedElement {
            instance: old.instance,
            ty: old.ty,
            props: new.props().clone(),
            text_mode: old.text_mode,
            children,
        })
    }

    /// A kept node must keep both its type and its text-content mode; a
    /// flip of either replaces the subtree.
    fn same_shape(&self, old: &MountedElement, new: &Element) -> bool {
        old.ty.as_str() == new.ty()
            && old.text_mode == self.host.should_set_text_content(new.ty(), new.props())
    }

    fn apply_commit_op(&mut self, op: CommitOp) -> Result<()> {
        match op {
            CommitOp::ClearContainer { root } => self.host.clear_container(root),
            CommitOp::AppendToContainer { root, child } => {
                self.host.append_child_to_container(root, child)
            }
            CommitOp::Append { parent, child } => self.host.append_child(parent, child),
            CommitOp::Update {
                instance,
                payload,
                ty,
                old,
                new,
            } => self
                .host
                .commit_update(instance, &payload, ty.as_str(), &old, &new),
            CommitOp::UpdateText { instance, old, new } => {
                self.host
                    .commit_text_update(instance, old.as_str(), new.as_str())
            }
            CommitOp::Remove { parent, child } => self.host.remove_child(parent, child),
        }
    }
}

impl<H: HostConfig> Engine for Reconciler<H> {
    fn create_container(&mut self, root: InstanceId, supports_mutation: bool) -> ContainerId {
        let id = ContainerId(self.containers.len() as u32);
        self.containers.push(Container {
            root,
            supports_mutation,
            mounted: None,
            committed_once: false,
        });
        id
    }

    fn update_container(
        &mut self,
        element: Element,
        container: ContainerId,
        callback: Option<CommitCallback>,
    ) -> Result<UpdateHandle> {
        let started = self.host.now();
        let (root, old_mounted, first_commit) = {
            let c = self
                .containers
                .get(container.0 as usize)
                .ok_or_else(|| TreeError::invalid(format!("unknown container {container:?}")))?;
            if !(c.supports_mutation && self.host.supports_mutation()) {
                return Err(TreeError::invalid(
                    "this engine only drives mutation-mode hosts",
                ));
            }
            (c.root, c.mounted.clone(), !c.committed_once)
        };

        // Build phase: assemble subtrees off-tree, compute payloads, and
        // defer every visible-tree mutation into the op list.
        let mut ops = Vec::new();
        let ctx = self.host.get_root_host_context();
        if first_commit {
            ops.push(CommitOp::ClearContainer { root });
        }
        let new_mounted = match old_mounted {
            Some(Mounted::Element(old_el)) if self.same_shape(&old_el, &element) => {
                Mounted::Element(self.diff_element(old_el, &element, root, &ctx, &mut ops)?)
            }
            Some(old) => {
                ops.push(CommitOp::Remove {
                    parent: root,
                    child: old.instance(),
                });
                let mounted = self.mount_element(&element, root, &ctx)?;
                ops.push(CommitOp::AppendToContainer {
                    root,
                    child: mounted.instance,
                });
                Mounted::Element(mounted)
            }
            None => {
                let mounted = self.mount_element(&element, root, &ctx)?;
                ops.push(CommitOp::AppendToContainer {
                    root,
                    child: mounted.instance,
                });
                Mounted::Element(mounted)
            }
        };

        // Commit phase: a failing op aborts here with whatever has already
        // been applied left in place.
        debug!(?container, ops = ops.len(), "committing");
        self.host.prepare_for_commit();
        for op in ops {
            self.apply_commit_op(op)?;
        }
        self.host.reset_after_commit();

        let c = &mut self.containers[container.0 as usize];
        c.mounted = Some(new_mounted);
        c.committed_once = true;

        if let Some(callback) = callback {
            callback();
        }

        self.next_update += 1;
        let elapsed = self.host.now() - started;
        debug!(?elapsed, "commit finished");
        Ok(UpdateHandle(self.next_update))
    }
}
