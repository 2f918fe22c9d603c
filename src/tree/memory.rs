//! In-memory host tree.
//!
//! A minimal scene tree for hosts without one of their own and for tests.
//! Nodes are reference counted handles; each may carry one script object.
//! Attaching a subtree through [`SceneTree::attach`] emits one "node added"
//! notification per node, parents before children.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::InjectResult;
use crate::injection::{InjectTarget, Injectable};
use crate::tree::{HostTree, NodeAddedHandler, NodeHandle};

struct NodeInner {
    name: String,
    script: RefCell<Option<Box<dyn InjectTarget>>>,
    children: RefCell<Vec<SceneNode>>,
    parent: RefCell<Weak<NodeInner>>,
}

/// Handle to a scene node. Clones refer to the same node.
#[derive(Clone)]
pub struct SceneNode {
    inner: Rc<NodeInner>,
}

impl SceneNode {
    /// A node without a script.
    pub fn new(name: impl Into<String>) -> Self {
        Self::build(name.into(), None)
    }

    /// A node whose script is a fresh `T::default()`.
    pub fn with_script<T: Injectable>(name: impl Into<String>) -> Self {
        Self::from_script(name, T::default())
    }

    /// A node carrying `script`.
    pub fn from_script<T: Injectable>(name: impl Into<String>, script: T) -> Self {
        Self::from_boxed(name, Box::new(script))
    }

    pub fn from_boxed(name: impl Into<String>, script: Box<dyn InjectTarget>) -> Self {
        Self::build(name.into(), Some(script))
    }

    fn build(name: String, script: Option<Box<dyn InjectTarget>>) -> Self {
        Self {
            inner: Rc::new(NodeInner {
                name,
                script: RefCell::new(script),
                children: RefCell::new(Vec::new()),
                parent: RefCell::new(Weak::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Appends `child` without emitting notifications.
    ///
    /// Use this to assemble a detached subtree; use [`SceneTree::attach`] to
    /// add nodes to a live tree.
    pub fn add_child(&self, child: SceneNode) -> &Self {
        *child.inner.parent.borrow_mut() = Rc::downgrade(&self.inner);
        self.inner.children.borrow_mut().push(child);
        self
    }

    pub fn children(&self) -> Vec<SceneNode> {
        self.inner.children.borrow().clone()
    }

    pub fn parent(&self) -> Option<SceneNode> {
        self.inner.parent.borrow().upgrade().map(|inner| SceneNode { inner })
    }

    pub fn has_script(&self) -> bool {
        self.inner.script.borrow().is_some()
    }

    /// Reads the script if it is a `T`.
    pub fn script<T: Injectable, R>(&self, read: impl FnOnce(&T) -> R) -> Option<R> {
        let script = self.inner.script.borrow();
        script.as_deref()?.downcast_ref::<T>().map(read)
    }

    /// Mutates the script if it is a `T`.
    pub fn script_mut<T: Injectable, R>(&self, update: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut script = self.inner.script.borrow_mut();
        script.as_deref_mut()?.downcast_mut::<T>().map(update)
    }

    pub fn ptr_eq(&self, other: &SceneNode) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// This node and all of its descendants, pre-order.
    pub fn descendants(&self) -> Vec<SceneNode> {
        let mut nodes = Vec::new();
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            stack.extend(node.children().into_iter().rev());
            nodes.push(node);
        }
        nodes
    }
}

impl NodeHandle for SceneNode {
    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn children(&self) -> Vec<Self> {
        SceneNode::children(self)
    }

    fn with_target<R>(&self, visit: impl FnOnce(&mut dyn InjectTarget) -> R) -> Option<R> {
        let mut script = self.inner.script.borrow_mut();
        script.as_deref_mut().map(|target| visit(target))
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.inner.name)
            .field("has_script", &self.has_script())
            .field("children", &self.inner.children.borrow().len())
            .finish()
    }
}

/// A live scene tree with "node added" notifications.
pub struct SceneTree {
    root: SceneNode,
    handlers: RefCell<Vec<NodeAddedHandler<SceneNode>>>,
    pending: RefCell<VecDeque<SceneNode>>,
    dispatching: Cell<bool>,
}

impl SceneTree {
    /// A tree with an empty root named `"root"`.
    pub fn new() -> Self {
        Self::with_root(SceneNode::new("root"))
    }

    /// A tree whose startup contents are `root` and its subtree.
    pub fn with_root(root: SceneNode) -> Self {
        Self {
            root,
            handlers: RefCell::new(Vec::new()),
            pending: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
        }
    }

    pub fn root(&self) -> SceneNode {
        self.root.clone()
    }

    /// Adds `child` (and its subtree) under `parent` and notifies every
    /// subscriber once per added node, parents first.
    ///
    /// Every node is notified even if a handler fails; the first handler
    /// error is returned. Attaching from inside a handler queues the new
    /// nodes behind the ones already pending.
    pub fn attach(&self, parent: &SceneNode, child: SceneNode) -> InjectResult<SceneNode> {
        parent.add_child(child.clone());
        self.pending.borrow_mut().extend(child.descendants());
        if self.dispatching.get() {
            return Ok(child);
        }

        self.dispatching.set(true);
        let result = self.dispatch_pending();
        self.dispatching.set(false);
        result.map(|()| child)
    }

    fn dispatch_pending(&self) -> InjectResult<()> {
        let mut first_error = None;
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(node) = next else { break };

            // Handlers run detached so they may subscribe or attach
            let mut handlers = std::mem::take(&mut *self.handlers.borrow_mut());
            for handler in handlers.iter_mut() {
                if let Err(error) = handler(&node) {
                    first_error.get_or_insert(error);
                }
            }
            let mut slot = self.handlers.borrow_mut();
            let subscribed_meanwhile = std::mem::replace(&mut *slot, handlers);
            slot.extend(subscribed_meanwhile);
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Number of registered "node added" handlers.
    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl HostTree for SceneTree {
    type Node = SceneNode;

    fn root(&self) -> SceneNode {
        self.root.clone()
    }

    fn subscribe_node_added(&self, handler: NodeAddedHandler<SceneNode>) {
        self.handlers.borrow_mut().push(handler);
    }
}

impl fmt::Debug for SceneTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneTree")
            .field("root", &self.root)
            .field("subscribers", &self.handlers.borrow().len())
            .finish()
    }
}
