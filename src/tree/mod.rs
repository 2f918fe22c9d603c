//! Host tree contract, startup walk and mutation listener.
//!
//! The engine never builds or destroys nodes. It needs a root handle, the
//! children of a node, access to the node's injectable object, and a
//! "node added" notification stream.

pub mod listener;
pub mod memory;
pub mod walker;

pub use listener::MutationListener;
pub use memory::{SceneNode, SceneTree};
pub use walker::{TreeWalker, WalkFailure, WalkReport};

use crate::error::InjectResult;
use crate::injection::{InjectTarget, Injector};

/// Callback invoked once for every node that enters the tree.
pub type NodeAddedHandler<N> = Box<dyn FnMut(&N) -> InjectResult<()>>;

/// Opaque handle to one tree node.
pub trait NodeHandle: Clone {
    /// Name used in logs and walk reports.
    fn name(&self) -> String;

    /// Current children, in tree order.
    fn children(&self) -> Vec<Self>;

    /// Runs `visit` on the node's injectable object; `None` when the node
    /// carries none.
    fn with_target<R>(&self, visit: impl FnOnce(&mut dyn InjectTarget) -> R) -> Option<R>;
}

/// The tree the engine keeps wired.
pub trait HostTree {
    type Node: NodeHandle;

    fn root(&self) -> Self::Node;

    /// Registers `handler` for every future node addition. Hosts must notify
    /// once per node, including each node of a subtree attached in one
    /// operation.
    fn subscribe_node_added(&self, handler: NodeAddedHandler<Self::Node>);
}

/// Injects the object carried by `node`. Returns `Ok(false)` when the node
/// has no object or its type has nothing to inject.
pub(crate) fn inject_node<N: NodeHandle>(injector: &Injector, node: &N) -> InjectResult<bool> {
    node.with_target(|target| {
        if injector.plan_for(target).is_empty() {
            return Ok(false);
        }
        injector.inject(target).map(|()| true)
    })
    .unwrap_or(Ok(false))
}
