mod arena;
mod node;
mod recording;
mod traits;

pub use arena::DisplayTree;
pub use node::{DisplayNode, ElementNode, InstanceId, TextNode};
pub use recording::{PrimitiveOp, RecordingTree};
pub use traits::{EventTarget, TargetTree};
