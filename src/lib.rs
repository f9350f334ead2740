//! Host adapter for a generic tree-reconciliation engine.
//!
//! A declarative caller describes desired UI state as a tree of
//! [`Element`] values and hands it to [`RootBinder::render`]. An injected
//! engine (any [`Engine`]; [`Reconciler`] is the built-in one) diffs that
//! description against what was committed before and drives the
//! [`HostConfig`] callback protocol; the [`HostAdapter`] realizes each
//! decision against a retained [`DisplayTree`] through the
//! [`TargetTree`] primitives.
//!
//! Everything is single-threaded and synchronous: callbacks run serially
//! on the calling thread, build-phase work never touches attached nodes,
//! and commit-phase work makes no atomicity promise beyond each primitive.

pub mod adapter;
mod binder;
mod element;
pub mod engine;
mod error;
mod events;
pub mod tree;

pub use adapter::{HostAdapter, HostConfig, HostContext, PropChange, UpdatePayload};
pub use binder::RootBinder;
pub use element::{Child, Element, PropValue, Props, UiString};
pub use engine::{CommitCallback, ContainerId, Engine, Reconciler, UpdateHandle};
pub use error::{Result, TreeError};
pub use events::{dispatch_event, event_name_of_prop, EventHandler};
pub use tree::{DisplayNode, DisplayTree, EventTarget, InstanceId, PrimitiveOp, RecordingTree, TargetTree};

use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a display tree (interior mutability handled internally).
pub type SharedDisplayTree = Rc<RefCell<DisplayTree>>;
