use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A structural mutation that would corrupt the retained tree, such as
    /// attaching a child that already has a different parent or removing a
    /// node that is not a direct child of the given parent.
    #[error("invalid tree operation: {reason}")]
    InvalidTreeOperation { reason: String },

    /// The `children` prop held a value that is neither text-like content
    /// nor a sequence of nested nodes. This is a programming error in the
    /// tree producer and is propagated, never swallowed.
    #[error("unsupported content type for <{ty}>: children must be text or nested nodes")]
    UnsupportedContentType { ty: String },
}

impl TreeError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        TreeError::InvalidTreeOperation {
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(ty: impl Into<String>) -> Self {
        TreeError::UnsupportedContentType { ty: ty.into() }
    }
}

pub type Result<T> = std::result::Result<T, TreeError>;
