use crate::element::UiString;
use crate::events::EventHandler;
use std::collections::{BTreeMap, HashMap};

/// Unique identifier for a live node in the retained tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub(crate) u32);

/// A live element node: type tag, mutable attributes, ordered children,
/// optional inline text content and registered event listeners.
#[derive(Debug, Clone)]
pub struct ElementNode {
    pub ty: UiString,
    pub attributes: BTreeMap<UiString, UiString>,
    pub children: Vec<InstanceId>,
    /// Inline text content, distinct from dedicated text leaves. Set when
    /// an element renders primitive children as text.
    pub text: Option<UiString>,
    pub listeners: HashMap<UiString, EventHandler>,
}

/// A live text leaf holding a single mutable payload.
#[derive(Debug, Clone)]
pub struct TextNode {
    pub text: UiString,
}

#[derive(Debug, Clone)]
pub enum DisplayNode {
    Element(ElementNode),
    Text(TextNode),
}

impl DisplayNode {
    pub fn element(ty: impl Into<UiString>) -> Self {
        DisplayNode::Element(ElementNode {
            ty: ty.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            text: None,
            listeners: HashMap::new(),
        })
    }

    pub fn text(text: impl Into<UiString>) -> Self {
        DisplayNode::Text(TextNode { text: text.into() })
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            DisplayNode::Element(el) => Some(el),
            DisplayNode::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
        match self {
            DisplayNode::Element(el) => Some(el),
            DisplayNode::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            DisplayNode::Element(_) => None,
            DisplayNode::Text(t) => Some(t),
        }
    }
}
