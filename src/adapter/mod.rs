mod config;
mod context;
mod host;
mod payload;

pub use config::HostConfig;
pub use context::HostContext;
pub use host::HostAdapter;
pub use payload::{PropChange, UpdatePayload};
