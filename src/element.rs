use crate::events::EventHandler;
use smartstring::{LazyCompact, SmartString};
use std::collections::BTreeMap;

pub type UiString = SmartString<LazyCompact>;

/// A description of desired UI state for one render pass.
///
/// Elements are ephemeral: a producer builds a fresh tree of them every
/// pass and never mutates one after construction. The reconciliation
/// engine diffs the previous description against the next one; the
/// retained tree is only touched through the host adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    ty: UiString,
    props: Props,
}

impl Element {
    pub fn new(ty: impl Into<UiString>) -> Self {
        Self {
            ty: ty.into(),
            props: Props::new(),
        }
    }

    pub fn ty(&self) -> &str {
        self.ty.as_str()
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Set one prop. Later calls with the same key overwrite.
    pub fn attr(mut self, key: impl Into<UiString>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Shorthand for the class-like prop recognized by the adapter.
    pub fn class_name(self, name: impl Into<UiString>) -> Self {
        self.attr("className", PropValue::Text(name.into()))
    }

    /// Register a click handler under the recognized `onClick` key.
    pub fn on_click(self, handler: EventHandler) -> Self {
        self.attr("onClick", PropValue::Handler(handler))
    }

    /// Set the `children` prop to a primitive value. Text and numbers make
    /// the node render as inline text content instead of child nodes.
    pub fn content(mut self, value: impl Into<PropValue>) -> Self {
        self.props.insert(Props::CHILDREN, value.into());
        self
    }

    /// Append a nested element to the `children` sequence.
    pub fn child(self, child: Element) -> Self {
        self.push_child(Child::Element(child))
    }

    /// Append a text entry to the `children` sequence. Unlike `content`,
    /// this becomes a dedicated text leaf in the retained tree.
    pub fn child_text(self, text: impl Into<UiString>) -> Self {
        self.push_child(Child::Text(text.into()))
    }

    fn push_child(mut self, child: Child) -> Self {
        match self.props.entries.get_mut(Props::CHILDREN) {
            Some(PropValue::Nodes(nodes)) => nodes.push(child),
            _ => {
                self.props
                    .insert(Props::CHILDREN, PropValue::Nodes(vec![child]));
            }
        }
        self
    }
}

/// One entry of a `children` sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Element(Element),
    Text(UiString),
}

/// The prop mapping of an element. Keys are unique; the `children` key is
/// special and carries either primitive content or nested nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    entries: BTreeMap<UiString, PropValue>,
}

impl Props {
    pub const CHILDREN: &'static str = "children";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<UiString>, value: impl Into<PropValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn children(&self) -> Option<&PropValue> {
        self.entries.get(Self::CHILDREN)
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&UiString, &PropValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A prop value. `Nodes` is only meaningful under the `children` key.
#[derive(Debug, Clone)]
pub enum PropValue {
    Text(UiString),
    Number(f64),
    Bool(bool),
    Handler(EventHandler),
    Nodes(Vec<Child>),
}

impl PropValue {
    /// True for values that `should_set_text_content` treats as inline text.
    pub fn is_text_like(&self) -> bool {
        matches!(self, PropValue::Text(_) | PropValue::Number(_))
    }

    /// Render the value as attribute text, if it has a textual form.
    pub fn as_attr_text(&self) -> Option<UiString> {
        match self {
            PropValue::Text(s) => Some(s.clone()),
            PropValue::Number(n) => Some(render_number(*n)),
            PropValue::Bool(b) => Some(if *b { "true".into() } else { "false".into() }),
            PropValue::Handler(_) | PropValue::Nodes(_) => None,
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Text(a), PropValue::Text(b)) => a == b,
            (PropValue::Number(a), PropValue::Number(b)) => a == b,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            // Handlers have no structural identity; two are equal only when
            // they are the same shared closure.
            (PropValue::Handler(a), PropValue::Handler(b)) => a.ptr_eq(b),
            (PropValue::Nodes(a), PropValue::Nodes(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.into())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(value.into())
    }
}

impl From<UiString> for PropValue {
    fn from(value: UiString) -> Self {
        PropValue::Text(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<EventHandler> for PropValue {
    fn from(value: EventHandler) -> Self {
        PropValue::Handler(value)
    }
}

impl From<Vec<Child>> for PropValue {
    fn from(value: Vec<Child>) -> Self {
        PropValue::Nodes(value)
    }
}

/// Numbers display integer-like when they have no fractional part, so
/// `content(42)` renders as "42" rather than "42.0".
pub(crate) fn render_number(n: f64) -> UiString {
    if n.is_finite() && n == n.trunc() && n.abs() < 1e15 {
        (n as i64).to_string().into()
    } else {
        n.to_string().into()
    }
}
