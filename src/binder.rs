use crate::element::Element;
use crate::engine::{CommitCallback, ContainerId, Engine, UpdateHandle};
use crate::error::Result;
use crate::tree::InstanceId;
use std::collections::HashMap;
use tracing::debug;

/// The public entry point: binds tree descriptions to concrete root nodes
/// and forwards updates into the injected engine.
///
/// Binding is idempotent. The first `render` against a root node creates a
/// container (mutation capability fixed for its lifetime) and caches its id
/// in a side-table keyed by root-node identity; every later `render`
/// against the same root reuses it.
pub struct RootBinder<E: Engine> {
    engine: E,
    containers: HashMap<InstanceId, ContainerId>,
}

impl<E: Engine> RootBinder<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            containers: HashMap::new(),
        }
    }

    /// Project `tree` onto `root`. Returns the engine's update handle
    /// unchanged; the optional callback runs once the commit completes.
    pub fn render(
        &mut self,
        tree: Element,
        root: InstanceId,
        callback: Option<CommitCallback>,
    ) -> Result<UpdateHandle> {
        let container = match self.containers.get(&root) {
            Some(id) => *id,
            None => {
                let id = self.engine.create_container(root, true);
                debug!(?root, ?id, "bound root container");
                self.containers.insert(root, id);
                id
            }
        };
        self.engine.update_container(tree, container, callback)
    }

    /// Container bound to a root node, if any.
    pub fn container_for(&self, root: InstanceId) -> Option<ContainerId> {
        self.containers.get(&root).copied()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TreeError;

    /// Engine double counting container creations.
    struct CountingEngine {
        created: Vec<InstanceId>,
        updates: u64,
    }

    impl CountingEngine {
        fn new() -> Self {
            Self {
                created: Vec::new(),
                updates: 0,
            }
        }
    }

    impl Engine for CountingEngine {
        fn create_container(&mut self, root: InstanceId, _supports_mutation: bool) -> ContainerId {
            self.created.push(root);
            ContainerId((self.created.len() - 1) as u32)
        }

        fn update_container(
            &mut self,
            _element: Element,
            container: ContainerId,
            callback: Option<CommitCallback>,
        ) -> std::result::Result<UpdateHandle, TreeError> {
            if container.0 as usize >= self.created.len() {
                return Err(TreeError::invalid("unknown container"));
            }
            if let Some(callback) = callback {
                callback();
            }
            self.updates += 1;
            Ok(UpdateHandle(self.updates))
        }
    }

    fn root(id: u32) -> InstanceId {
        InstanceId(id)
    }

    #[test]
    fn test_binding_is_idempotent() {
        let mut binder = RootBinder::new(CountingEngine::new());

        binder.render(Element::new("div"), root(0), None).unwrap();
        let first = binder.container_for(root(0)).unwrap();
        binder.render(Element::new("div"), root(0), None).unwrap();
        binder.render(Element::new("span"), root(0), None).unwrap();

        assert_eq!(binder.container_for(root(0)), Some(first));
        assert_eq!(binder.engine().created.len(), 1);
    }

    #[test]
    fn test_distinct_roots_get_distinct_containers() {
        let mut binder = RootBinder::new(CountingEngine::new());

        binder.render(Element::new("div"), root(0), None).unwrap();
        binder.render(Element::new("div"), root(1), None).unwrap();

        assert_ne!(binder.container_for(root(0)), binder.container_for(root(1)));
        assert_eq!(binder.engine().created.len(), 2);
    }

    #[test]
    fn test_render_returns_engine_handle() {
        let mut binder = RootBinder::new(CountingEngine::new());

        let a = binder.render(Element::new("div"), root(0), None).unwrap();
        let b = binder.render(Element::new("div"), root(0), None).unwrap();
        assert_eq!(a, UpdateHandle(1));
        assert_eq!(b, UpdateHandle(2));
    }
}
