/// Inherited "current place in the tree" token passed down during the build
/// phase. This adapter carries no per-subtree information, but the contract
/// threads the value through `get_root_host_context` and
/// `get_child_host_context` so adapters where it varies still fit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostContext;

impl HostContext {
    pub const ROOT: HostContext = HostContext;
}
