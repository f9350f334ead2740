use super::node::InstanceId;
use super::traits::{EventTarget, TargetTree};
use crate::element::UiString;
use crate::error::Result;
use crate::events::EventHandler;

/// One successfully executed primitive call.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveOp {
    CreateElementNode { instance: InstanceId, ty: UiString },
    CreateTextNode { instance: InstanceId, text: UiString },
    SetAttribute { instance: InstanceId, key: UiString, value: UiString },
    SetTextContent { instance: InstanceId, value: UiString },
    AppendChild { parent: InstanceId, child: InstanceId },
    RemoveChild { parent: InstanceId, child: InstanceId },
    SetText { instance: InstanceId, value: UiString },
    AddEventListener { instance: InstanceId, event: UiString },
}

/// Instrumented target that records every primitive call in order before
/// forwarding it, so tests can observe what was mutated and when.
pub struct RecordingTree<T> {
    inner: T,
    ops: Vec<PrimitiveOp>,
}

impl<T> RecordingTree<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[PrimitiveOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<PrimitiveOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T: TargetTree> TargetTree for RecordingTree<T> {
    fn create_element_node(&mut self, ty: &str) -> InstanceId {
        let instance = self.inner.create_element_node(ty);
        self.ops.push(PrimitiveOp::CreateElementNode {
            instance,
            ty: ty.into(),
        });
        instance
    }

    fn create_text_node(&mut self, text: &str) -> InstanceId {
        let instance = self.inner.create_text_node(text);
        self.ops.push(PrimitiveOp::CreateTextNode {
            instance,
            text: text.into(),
        });
        instance
    }

    fn set_attribute(&mut self, instance: InstanceId, key: &str, value: &str) -> Result<()> {
        self.inner.set_attribute(instance, key, value)?;
        self.ops.push(PrimitiveOp::SetAttribute {
            instance,
            key: key.into(),
            value: value.into(),
        });
        Ok(())
    }

    fn set_text_content(&mut self, instance: InstanceId, value: &str) -> Result<()> {
        self.inner.set_text_content(instance, value)?;
        self.ops.push(PrimitiveOp::SetTextContent {
            instance,
            value: value.into(),
        });
        Ok(())
    }

    fn append_child(&mut self, parent: InstanceId, child: InstanceId) -> Result<()> {
        self.inner.append_child(parent, child)?;
        self.ops.push(PrimitiveOp::AppendChild { parent, child });
        Ok(())
    }

    fn remove_child(&mut self, parent: InstanceId, child: InstanceId) -> Result<()> {
        self.inner.remove_child(parent, child)?;
        self.ops.push(PrimitiveOp::RemoveChild { parent, child });
        Ok(())
    }

    fn set_text(&mut self, instance: InstanceId, value: &str) -> Result<()> {
        self.inner.set_text(instance, value)?;
        self.ops.push(PrimitiveOp::SetText {
            instance,
            value: value.into(),
        });
        Ok(())
    }

    fn first_child(&self, parent: InstanceId) -> Option<InstanceId> {
        self.inner.first_child(parent)
    }
}

impl<T: EventTarget> EventTarget for RecordingTree<T> {
    fn add_event_listener(
        &mut self,
        instance: InstanceId,
        event: &str,
        handler: EventHandler,
    ) -> Result<()> {
        self.inner.add_event_listener(instance, event, handler)?;
        self.ops.push(PrimitiveOp::AddEventListener {
            instance,
            event: event.into(),
        });
        Ok(())
    }

    fn handler(&self, instance: InstanceId, event: &str) -> Option<EventHandler> {
        self.inner.handler(instance, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::DisplayTree;

    #[test]
    fn test_records_successful_ops_in_order() {
        let mut tree = RecordingTree::new(DisplayTree::new());
        let div = tree.create_element_node("div");
        let text = tree.create_text_node("x");
        tree.set_attribute(div, "class", "app").unwrap();
        tree.append_child(div, text).unwrap();

        let ops = tree.take_ops();
        assert_eq!(ops.len(), 4);
        assert!(matches!(&ops[2], PrimitiveOp::SetAttribute { key, .. } if key.as_str() == "class"));
        assert!(matches!(&ops[3], PrimitiveOp::AppendChild { parent, child } if *parent == div && *child == text));
        assert!(tree.ops().is_empty());
    }

    #[test]
    fn test_failed_ops_are_not_recorded() {
        let mut tree = RecordingTree::new(DisplayTree::new());
        let a = tree.create_element_node("div");
        let b = tree.create_element_node("div");
        let child = tree.create_element_node("span");
        tree.append_child(a, child).unwrap();
        tree.clear_ops();

        assert!(tree.append_child(b, child).is_err());
        assert!(tree.ops().is_empty());
    }
}
