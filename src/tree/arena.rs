use super::node::{DisplayNode, InstanceId};
use super::traits::{EventTarget, TargetTree};
use crate::element::UiString;
use crate::error::{Result, TreeError};
use crate::events::EventHandler;
use tracing::trace;

const NO_CHILDREN: &[InstanceId] = &[];

/// Arena-backed retained display tree.
///
/// Slots are reused through a free list. Detached subtrees stay allocated
/// until the environment reclaims them with [`DisplayTree::reclaim_subtree`];
/// the host adapter never tears down descendants itself.
pub struct DisplayTree {
    nodes: Vec<Option<DisplayNode>>,
    parents: Vec<Option<InstanceId>>,
    free_list: Vec<u32>,
}

impl DisplayTree {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            parents: Vec::new(),
            free_list: Vec::new(),
        }
    }

    fn create(&mut self, node: DisplayNode) -> InstanceId {
        let index = if let Some(idx) = self.free_list.pop() {
            idx as usize
        } else {
            self.nodes.len()
        };

        if index >= self.nodes.len() {
            self.nodes.push(Some(node));
            self.parents.push(None);
        } else {
            self.nodes[index] = Some(node);
            self.parents[index] = None;
        }

        InstanceId(index as u32)
    }

    pub fn get(&self, id: InstanceId) -> Option<&DisplayNode> {
        self.nodes.get(id.0 as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut DisplayNode> {
        self.nodes.get_mut(id.0 as usize)?.as_mut()
    }

    pub fn parent_of(&self, id: InstanceId) -> Option<InstanceId> {
        *self.parents.get(id.0 as usize)?
    }

    pub fn children_of(&self, id: InstanceId) -> &[InstanceId] {
        match self.get(id) {
            Some(DisplayNode::Element(el)) => &el.children,
            _ => NO_CHILDREN,
        }
    }

    pub fn attribute(&self, id: InstanceId, key: &str) -> Option<&str> {
        self.get(id)?
            .as_element()?
            .attributes
            .get(key)
            .map(|v| v.as_str())
    }

    /// Text payload of a leaf, or the inline text content of an element.
    pub fn text_of(&self, id: InstanceId) -> Option<&str> {
        match self.get(id)? {
            DisplayNode::Text(t) => Some(t.text.as_str()),
            DisplayNode::Element(el) => el.text.as_deref(),
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Free a detached subtree's slots. Fails when the root of the subtree
    /// is still attached to a parent.
    pub fn reclaim_subtree(&mut self, id: InstanceId) -> Result<()> {
        if self.parent_of(id).is_some() {
            return Err(TreeError::invalid(format!(
                "{id:?} is still attached and cannot be reclaimed"
            )));
        }
        let mut postorder = Vec::new();
        self.collect_postorder(id, &mut postorder);
        for node in postorder {
            self.dispose(node);
        }
        Ok(())
    }

    fn collect_postorder(&self, id: InstanceId, out: &mut Vec<InstanceId>) {
        for child in self.children_of(id).to_vec() {
            self.collect_postorder(child, out);
        }
        out.push(id);
    }

    fn dispose(&mut self, id: InstanceId) {
        let idx = id.0 as usize;
        if idx < self.nodes.len() && self.nodes[idx].is_some() {
            self.nodes[idx] = None;
            self.parents[idx] = None;
            self.free_list.push(id.0);
        }
    }

    fn element_mut(&mut self, id: InstanceId) -> Result<&mut super::node::ElementNode> {
        self.get_mut(id)
            .ok_or_else(|| TreeError::invalid(format!("no such node: {id:?}")))?
            .as_element_mut()
            .ok_or_else(|| TreeError::invalid(format!("{id:?} is not an element node")))
    }

    fn ensure_exists(&self, id: InstanceId) -> Result<()> {
        if self.get(id).is_none() {
            return Err(TreeError::invalid(format!("no such node: {id:?}")));
        }
        Ok(())
    }
}

impl Default for DisplayTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetTree for DisplayTree {
    fn create_element_node(&mut self, ty: &str) -> InstanceId {
        let id = self.create(DisplayNode::element(ty));
        trace!(?id, ty, "create element node");
        id
    }

    fn create_text_node(&mut self, text: &str) -> InstanceId {
        let id = self.create(DisplayNode::text(text));
        trace!(?id, "create text node");
        id
    }

    fn set_attribute(&mut self, instance: InstanceId, key: &str, value: &str) -> Result<()> {
        trace!(?instance, key, value, "set attribute");
        let el = self.element_mut(instance)?;
        el.attributes
            .insert(UiString::from(key), UiString::from(value));
        Ok(())
    }

    fn set_text_content(&mut self, instance: InstanceId, value: &str) -> Result<()> {
        trace!(?instance, value, "set text content");
        let el = self.element_mut(instance)?;
        el.text = Some(UiString::from(value));
        Ok(())
    }

    fn append_child(&mut self, parent: InstanceId, child: InstanceId) -> Result<()> {
        trace!(?parent, ?child, "append child");
        self.ensure_exists(child)?;
        if parent == child {
            return Err(TreeError::invalid("cannot append a node to itself"));
        }
        match self.parent_of(child) {
            Some(current) if current != parent => {
                return Err(TreeError::invalid(format!(
                    "{child:?} already has parent {current:?} and must be detached first"
                )));
            }
            _ => {}
        }
        // Walking up from the parent catches attempts to append an ancestor.
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(TreeError::invalid(format!(
                    "appending {child:?} under {parent:?} would create a cycle"
                )));
            }
            cursor = self.parent_of(node);
        }

        {
            let el = self.element_mut(parent)?;
            el.children.retain(|c| *c != child);
            el.children.push(child);
        }
        self.parents[child.0 as usize] = Some(parent);
        Ok(())
    }

    fn remove_child(&mut self, parent: InstanceId, child: InstanceId) -> Result<()> {
        trace!(?parent, ?child, "remove child");
        if self.parent_of(child) != Some(parent) {
            return Err(TreeError::invalid(format!(
                "{child:?} is not a direct child of {parent:?}"
            )));
        }
        {
            let el = self.element_mut(parent)?;
            el.children.retain(|c| *c != child);
        }
        self.parents[child.0 as usize] = None;
        Ok(())
    }

    fn set_text(&mut self, instance: InstanceId, value: &str) -> Result<()> {
        trace!(?instance, value, "set text");
        match self.get_mut(instance) {
            Some(DisplayNode::Text(t)) => {
                t.text = UiString::from(value);
                Ok(())
            }
            Some(DisplayNode::Element(_)) => Err(TreeError::invalid(format!(
                "{instance:?} is not a text node"
            ))),
            None => Err(TreeError::invalid(format!("no such node: {instance:?}"))),
        }
    }

    fn first_child(&self, parent: InstanceId) -> Option<InstanceId> {
        self.children_of(parent).first().copied()
    }
}

impl EventTarget for DisplayTree {
    fn add_event_listener(
        &mut self,
        instance: InstanceId,
        event: &str,
        handler: EventHandler,
    ) -> Result<()> {
        trace!(?instance, event, "add event listener");
        let el = self.element_mut(instance)?;
        el.listeners.insert(UiString::from(event), handler);
        Ok(())
    }

    fn handler(&self, instance: InstanceId, event: &str) -> Option<EventHandler> {
        self.get(instance)?.as_element()?.listeners.get(event).cloned()
    }
}
