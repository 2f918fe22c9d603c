//! Startup walk over the pre-existing tree.

use tracing::{debug, trace, warn};

use crate::error::{InjectError, InjectResult};
use crate::injection::Injector;
use crate::options::FailurePolicy;
use crate::tree::{inject_node, NodeHandle};

/// A node whose injection failed during a `LogAndContinue` walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkFailure {
    pub node: String,
    pub error: InjectError,
}

/// Outcome of a startup walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    /// Every node reached
    pub visited: usize,
    /// Nodes whose object had a non-empty plan and was injected
    pub injected: usize,
    /// Nodes without an object or with an empty plan
    pub skipped: usize,
    /// Failures tolerated under [`FailurePolicy::LogAndContinue`]
    pub failures: Vec<WalkFailure>,
}

impl WalkReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One-time, pre-order traversal injecting every eligible node.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    injector: Injector,
}

impl TreeWalker {
    pub fn new(injector: Injector) -> Self {
        Self { injector }
    }

    /// Visits every node reachable from `root` and injects each one whose
    /// plan is non-empty.
    ///
    /// Under [`FailurePolicy::Abort`] the first failure ends the walk and is
    /// returned. Under [`FailurePolicy::LogAndContinue`] it is logged,
    /// recorded in the report and the walk goes on.
    pub fn walk_and_inject_all<N: NodeHandle>(&self, root: &N) -> InjectResult<WalkReport> {
        let policy = self.injector.options().failure_policy;
        let mut report = WalkReport::default();
        let mut stack = vec![root.clone()];

        while let Some(node) = stack.pop() {
            report.visited += 1;
            match inject_node(&self.injector, &node) {
                Ok(true) => report.injected += 1,
                Ok(false) => {
                    trace!(node = %node.name(), "nothing to inject");
                    report.skipped += 1;
                }
                Err(error) => match policy {
                    FailurePolicy::Abort => return Err(error),
                    FailurePolicy::LogAndContinue => {
                        warn!(node = %node.name(), %error, "injection failed; continuing walk");
                        report.failures.push(WalkFailure {
                            node: node.name(),
                            error,
                        });
                    }
                },
            }

            // Reversed so the first child is popped next
            stack.extend(node.children().into_iter().rev());
        }

        debug!(
            visited = report.visited,
            injected = report.injected,
            skipped = report.skipped,
            failures = report.failures.len(),
            "startup walk complete"
        );
        Ok(report)
    }
}
