//! Dependency resolver adapter: the injector's only path to the container.

use std::sync::Arc;

use tracing::debug;

use crate::error::InjectResult;
use crate::key::Key;
use crate::traits::{AnyArc, ServiceContainer};

/// Thin façade over a [`ServiceContainer`].
#[derive(Clone)]
pub struct DependencyResolver {
    container: Arc<dyn ServiceContainer>,
}

impl DependencyResolver {
    pub fn new(container: Arc<dyn ServiceContainer>) -> Self {
        Self { container }
    }

    /// Resolves `key`; an unregistered key fails with
    /// [`InjectError::Resolution`](crate::InjectError::Resolution).
    pub fn resolve(&self, key: &Key) -> InjectResult<AnyArc> {
        self.container.resolve_any(key).inspect_err(|error| {
            debug!(requested = key.display_name(), %error, "resolution failed");
        })
    }

    /// Resolves every key in order, stopping at the first failure.
    pub fn resolve_all(&self, keys: &[Key]) -> InjectResult<Vec<AnyArc>> {
        keys.iter().map(|key| self.resolve(key)).collect()
    }

    pub fn container(&self) -> &Arc<dyn ServiceContainer> {
        &self.container
    }
}

impl std::fmt::Debug for DependencyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyResolver").finish_non_exhaustive()
    }
}
