//! Mutation listener: injects each node as it enters the tree.

use tracing::trace;

use crate::error::InjectResult;
use crate::injection::Injector;
use crate::tree::{inject_node, NodeAddedHandler, NodeHandle};

/// Pass-through from "node added" notifications to the injector.
///
/// Injects exactly the notified node, never its descendants; the host
/// notifies each node of an attached subtree on its own.
#[derive(Debug, Clone)]
pub struct MutationListener {
    injector: Injector,
}

impl MutationListener {
    pub fn new(injector: Injector) -> Self {
        Self { injector }
    }

    pub fn on_node_added<N: NodeHandle>(&self, node: &N) -> InjectResult<()> {
        if !inject_node(&self.injector, node)? {
            trace!(node = %node.name(), "added node has nothing to inject");
        }
        Ok(())
    }

    /// Wraps the listener as a handler for
    /// [`HostTree::subscribe_node_added`](crate::tree::HostTree::subscribe_node_added).
    pub fn into_handler<N: NodeHandle + 'static>(self) -> NodeAddedHandler<N> {
        Box::new(move |node: &N| self.on_node_added(node))
    }
}
