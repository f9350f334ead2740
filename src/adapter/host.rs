use super::config::HostConfig;
use super::context::HostContext;
use super::payload::{PropChange, UpdatePayload};
use crate::element::{PropValue, Props, render_number};
use crate::error::{Result, TreeError};
use crate::events::event_name_of_prop;
use crate::tree::{EventTarget, InstanceId, TargetTree};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{trace, warn};

/// Host adapter over any target tree: translates the engine's callback
/// protocol into target-tree primitive calls.
///
/// The tree is shared because the environment that owns the root node and
/// dispatches events holds it too; the adapter borrows it only for the
/// duration of one primitive call.
pub struct HostAdapter<T> {
    tree: Rc<RefCell<T>>,
    origin: Instant,
    conservative: bool,
}

impl<T: TargetTree + EventTarget> HostAdapter<T> {
    pub fn new(tree: Rc<RefCell<T>>) -> Self {
        Self {
            tree,
            origin: Instant::now(),
            conservative: false,
        }
    }

    /// Switch `prepare_update` to the coarse policy: whenever old and new
    /// props differ at all, signal a full reapplication instead of a
    /// field-by-field delta. More commit work, no diffing cost.
    pub fn conservative_updates(mut self) -> Self {
        self.conservative = true;
        self
    }

    pub fn tree(&self) -> &Rc<RefCell<T>> {
        &self.tree
    }

    /// Shared prop application for instance creation and full-replace
    /// commits. Nested child nodes are skipped here; the engine drives
    /// child instances through the append callbacks.
    fn apply_props(&mut self, instance: InstanceId, ty: &str, props: &Props) -> Result<()> {
        let mut tree = self.tree.borrow_mut();
        for (key, value) in props.iter() {
            if key.as_str() == Props::CHILDREN {
                match value {
                    PropValue::Text(s) => tree.set_text_content(instance, s.as_str())?,
                    PropValue::Number(n) => {
                        tree.set_text_content(instance, render_number(*n).as_str())?
                    }
                    PropValue::Nodes(_) => {}
                    PropValue::Bool(_) | PropValue::Handler(_) => {
                        return Err(TreeError::unsupported(ty));
                    }
                }
            } else if let PropValue::Handler(handler) = value {
                match event_name_of_prop(key.as_str()) {
                    Some(event) => {
                        tree.add_event_listener(instance, event.as_str(), handler.clone())?
                    }
                    None => warn!(key = key.as_str(), "handler prop without an event name"),
                }
            } else if key.as_str() == "className" {
                let text = value.as_attr_text().unwrap_or_default();
                tree.set_attribute(instance, "class", text.as_str())?;
            } else if let Some(text) = value.as_attr_text() {
                tree.set_attribute(instance, key.as_str(), text.as_str())?;
            } else {
                warn!(key = key.as_str(), "prop value has no attribute form");
            }
        }
        Ok(())
    }

    /// Field-by-field diff over the new props. Keys present only in the old
    /// props are left untouched: the commit loop reconciles new props, and
    /// the primitive surface has no attribute removal.
    fn diff_props(&self, old: &Props, new: &Props) -> SmallVec<[PropChange; 4]> {
        let mut changes = SmallVec::new();
        for (key, value) in new.iter() {
            if old.get(key.as_str()) == Some(value) {
                continue;
            }
            if key.as_str() == Props::CHILDREN {
                match value {
                    PropValue::Text(s) => changes.push(PropChange::TextContent { value: s.clone() }),
                    PropValue::Number(n) => changes.push(PropChange::TextContent {
                        value: render_number(*n),
                    }),
                    // Nested child nodes are the engine's business.
                    _ => {}
                }
            } else if let PropValue::Handler(handler) = value {
                if let Some(event) = event_name_of_prop(key.as_str()) {
                    changes.push(PropChange::Listener {
                        event,
                        handler: handler.clone(),
                    });
                }
            } else if key.as_str() == "className" {
                changes.push(PropChange::Attribute {
                    key: "class".into(),
                    value: value.as_attr_text().unwrap_or_default(),
                });
            } else if let Some(text) = value.as_attr_text() {
                changes.push(PropChange::Attribute {
                    key: key.clone(),
                    value: text,
                });
            }
        }
        changes
    }
}

impl<T: TargetTree + EventTarget> HostConfig for HostAdapter<T> {
    fn supports_mutation(&self) -> bool {
        true
    }

    fn get_root_host_context(&self) -> HostContext {
        HostContext::ROOT
    }

    fn get_child_host_context(&self, _parent: &HostContext, _ty: &str) -> HostContext {
        HostContext::ROOT
    }

    fn should_set_text_content(&self, _ty: &str, props: &Props) -> bool {
        props.children().is_some_and(PropValue::is_text_like)
    }

    fn create_instance(
        &mut self,
        ty: &str,
        props: &Props,
        _root: InstanceId,
        _ctx: &HostContext,
    ) -> Result<InstanceId> {
        trace!(ty, "create instance");
        let instance = self.tree.borrow_mut().create_element_node(ty);
        self.apply_props(instance, ty, props)?;
        Ok(instance)
    }

    fn create_text_instance(&mut self, text: &str) -> InstanceId {
        trace!(text, "create text instance");
        self.tree.borrow_mut().create_text_node(text)
    }

    fn append_initial_child(&mut self, parent: InstanceId, child: InstanceId) -> Result<()> {
        self.tree.borrow_mut().append_child(parent, child)
    }

    fn finalize_initial_children(
        &mut self,
        _instance: InstanceId,
        _ty: &str,
        _props: &Props,
    ) -> bool {
        // Everything was applied at creation; no mounted notification needed.
        false
    }

    fn prepare_update(
        &self,
        instance: InstanceId,
        old_props: &Props,
        new_props: &Props,
    ) -> UpdatePayload {
        trace!(?instance, "prepare update");
        if self.conservative {
            if old_props == new_props {
                UpdatePayload::NoUpdate
            } else {
                UpdatePayload::FullReplace
            }
        } else {
            let changes = self.diff_props(old_props, new_props);
            if changes.is_empty() {
                UpdatePayload::NoUpdate
            } else {
                UpdatePayload::AttributeDelta(changes)
            }
        }
    }

    fn commit_update(
        &mut self,
        instance: InstanceId,
        payload: &UpdatePayload,
        ty: &str,
        _old_props: &Props,
        new_props: &Props,
    ) -> Result<()> {
        trace!(?instance, ?payload, "commit update");
        match payload {
            UpdatePayload::NoUpdate => Ok(()),
            UpdatePayload::AttributeDelta(changes) => {
                let mut tree = self.tree.borrow_mut();
                for change in changes {
                    match change {
                        PropChange::Attribute { key, value } => {
                            tree.set_attribute(instance, key.as_str(), value.as_str())?
                        }
                        PropChange::Listener { event, handler } => {
                            tree.add_event_listener(instance, event.as_str(), handler.clone())?
                        }
                        PropChange::TextContent { value } => {
                            tree.set_text_content(instance, value.as_str())?
                        }
                    }
                }
                Ok(())
            }
            UpdatePayload::FullReplace => self.apply_props(instance, ty, new_props),
        }
    }

    fn commit_text_update(
        &mut self,
        instance: InstanceId,
        _old_text: &str,
        new_text: &str,
    ) -> Result<()> {
        self.tree.borrow_mut().set_text(instance, new_text)
    }

    fn append_child(&mut self, parent: InstanceId, child: InstanceId) -> Result<()> {
        self.tree.borrow_mut().append_child(parent, child)
    }

    fn append_child_to_container(&mut self, root: InstanceId, child: InstanceId) -> Result<()> {
        self.tree.borrow_mut().append_child(root, child)
    }

    fn remove_child(&mut self, parent: InstanceId, child: InstanceId) -> Result<()> {
        self.tree.borrow_mut().remove_child(parent, child)
    }

    fn clear_container(&mut self, root: InstanceId) -> Result<()> {
        let mut tree = self.tree.borrow_mut();
        while let Some(child) = tree.first_child(root) {
            tree.remove_child(root, child)?;
        }
        Ok(())
    }

    fn prepare_for_commit(&mut self) {
        trace!("prepare for commit");
    }

    fn reset_after_commit(&mut self) {
        trace!("reset after commit");
    }

    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::events::EventHandler;
    use crate::tree::DisplayTree;

    fn adapter() -> HostAdapter<DisplayTree> {
        HostAdapter::new(Rc::new(RefCell::new(DisplayTree::new())))
    }

    #[test]
    fn test_text_only_detection() {
        let host = adapter();
        let number = Element::new("div").content(42);
        let nested = Element::new("div").child(Element::new("span"));
        let empty = Element::new("div");

        assert!(host.should_set_text_content("div", number.props()));
        assert!(!host.should_set_text_content("div", nested.props()));
        assert!(!host.should_set_text_content("div", empty.props()));
    }

    #[test]
    fn test_create_instance_applies_props() {
        let mut host = adapter();
        let root = host.tree().borrow_mut().create_element_node("root");
        let el = Element::new("div")
            .class_name("x")
            .attr("id", "main")
            .content("hello");

        let instance = host
            .create_instance("div", el.props(), root, &HostContext::ROOT)
            .unwrap();

        let tree = host.tree().borrow();
        assert_eq!(tree.attribute(instance, "class"), Some("x"));
        assert_eq!(tree.attribute(instance, "id"), Some("main"));
        assert_eq!(tree.text_of(instance), Some("hello"));
        // Freshly created, not attached anywhere.
        assert_eq!(tree.parent_of(instance), None);
    }

    #[test]
    fn test_create_instance_registers_click_listener() {
        let mut host = adapter();
        let root = host.tree().borrow_mut().create_element_node("root");
        let el = Element::new("button").on_click(EventHandler::new(|| {}));

        let instance = host
            .create_instance("button", el.props(), root, &HostContext::ROOT)
            .unwrap();

        assert!(host.tree().borrow().handler(instance, "click").is_some());
    }

    #[test]
    fn test_create_instance_rejects_invalid_children() {
        let mut host = adapter();
        let root = host.tree().borrow_mut().create_element_node("root");
        let el = Element::new("div").content(true);

        let err = host
            .create_instance("div", el.props(), root, &HostContext::ROOT)
            .unwrap_err();
        assert!(matches!(err, TreeError::UnsupportedContentType { .. }));
    }

    #[test]
    fn test_prepare_update_returns_minimal_delta() {
        let mut host = adapter();
        let root = host.tree().borrow_mut().create_element_node("root");
        let old = Element::new("div").attr("a", 1).attr("b", 2);
        let new = Element::new("div").attr("a", 1).attr("b", 3);
        let instance = host
            .create_instance("div", old.props(), root, &HostContext::ROOT)
            .unwrap();

        let payload = host.prepare_update(instance, old.props(), new.props());
        match payload {
            UpdatePayload::AttributeDelta(changes) => {
                assert_eq!(changes.len(), 1);
                assert!(matches!(
                    &changes[0],
                    PropChange::Attribute { key, value }
                        if key.as_str() == "b" && value.as_str() == "3"
                ));
            }
            other => panic!("expected attribute delta, got {:?}", other),
        }
    }

    #[test]
    fn test_prepare_update_no_update_when_equal() {
        let host = adapter();
        let props = Element::new("div").attr("a", 1).content("x");
        let same = props.clone();

        let payload = host.prepare_update(InstanceId(0), props.props(), same.props());
        assert!(payload.is_noop());
    }

    #[test]
    fn test_conservative_mode_signals_full_replace() {
        let host = adapter().conservative_updates();
        let old = Element::new("div").attr("a", 1);
        let new = Element::new("div").attr("a", 2);

        let payload = host.prepare_update(InstanceId(0), old.props(), new.props());
        assert_eq!(payload, UpdatePayload::FullReplace);

        let payload = host.prepare_update(InstanceId(0), old.props(), old.props());
        assert!(payload.is_noop());
    }

    #[test]
    fn test_clear_container_is_idempotent() {
        let mut host = adapter();
        let root = host.tree().borrow_mut().create_element_node("root");
        for _ in 0..3 {
            let child = host.tree().borrow_mut().create_element_node("div");
            host.tree().borrow_mut().append_child(root, child).unwrap();
        }

        host.clear_container(root).unwrap();
        assert!(host.tree().borrow().children_of(root).is_empty());

        host.clear_container(root).unwrap();
        assert!(host.tree().borrow().children_of(root).is_empty());
    }

    #[test]
    fn test_now_is_monotonic() {
        let host = adapter();
        let a = host.now();
        let b = host.now();
        assert!(b >= a);
    }
}
