use crate::element::UiString;
use crate::events::EventHandler;
use smallvec::SmallVec;

/// One concrete change `commit_update` has to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum PropChange {
    Attribute { key: UiString, value: UiString },
    Listener { event: UiString, handler: EventHandler },
    TextContent { value: UiString },
}

/// What `prepare_update` computed during the build phase and `commit_update`
/// applies during the commit phase. Computing a payload never mutates the
/// tree; only applying it does.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum UpdatePayload {
    /// Nothing changed; the commit skips this instance.
    #[default]
    NoUpdate,
    /// Exactly the listed changes, in order.
    AttributeDelta(SmallVec<[PropChange; 4]>),
    /// No structured delta; the commit reconciles all new props the same
    /// way instance creation applies them.
    FullReplace,
}

impl UpdatePayload {
    pub fn is_noop(&self) -> bool {
        matches!(self, UpdatePayload::NoUpdate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_detection() {
        assert!(UpdatePayload::NoUpdate.is_noop());
        assert!(!UpdatePayload::FullReplace.is_noop());
        assert!(!UpdatePayload::AttributeDelta(SmallVec::new()).is_noop());
    }
}
