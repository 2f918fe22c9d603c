//! Service provider module.
//!
//! The `ServiceProvider` is the container the injection engine resolves
//! from. It is read-only once built.

use std::sync::Arc;

use crate::error::{InjectError, InjectResult};
use crate::internal::circular::with_circular_guard;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::{Registration, Registry};
use crate::traits::{AnyArc, ServiceContainer};
use crate::ServiceDescriptor;

/// Built container of the bundled service collection.
///
/// Cloning is cheap (the registry is shared behind an `Arc`) and the
/// provider is `Send + Sync`, so a host may hold it on any thread.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{ServiceCollection, ServiceContainerExt};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(Database { url: "postgres://localhost".to_string() });
/// collection.add_transient_factory::<UserService, _>(|provider| {
///     UserService { db: provider.get_required::<Database>() }
/// });
///
/// let provider = collection.build();
/// let user_service = provider.get_required::<UserService>();
/// assert_eq!(user_service.db.url, "postgres://localhost");
/// ```
#[derive(Clone)]
pub struct ServiceProvider {
    inner: Arc<Registry>,
}

impl ServiceProvider {
    pub(crate) fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(registry),
        }
    }

    /// Descriptors of every registration, in first-registration order.
    pub fn service_descriptors(&self) -> Vec<ServiceDescriptor> {
        self.inner
            .iter()
            .map(|(key, reg)| ServiceDescriptor {
                key: *key,
                lifetime: reg.lifetime,
            })
            .collect()
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    #[cfg(feature = "once-cell")]
    fn resolve_singleton(&self, reg: &Registration) -> InjectResult<AnyArc> {
        if let Some(cell) = &reg.single_runtime {
            if let Some(value) = cell.get() {
                return Ok(value.clone());
            }
            // Factory runs outside the cell; the first stored value wins
            let value = (reg.ctor)(self)?;
            return Ok(cell.get_or_init(|| value).clone());
        }
        (reg.ctor)(self)
    }

    #[cfg(not(feature = "once-cell"))]
    fn resolve_singleton(&self, reg: &Registration) -> InjectResult<AnyArc> {
        if let Some(slot) = &reg.single_runtime {
            let mut guard = crate::internal::sync::lock(slot);
            if let Some(value) = guard.as_ref() {
                return Ok(value.clone());
            }
            let value = (reg.ctor)(self)?;
            *guard = Some(value.clone());
            return Ok(value);
        }
        (reg.ctor)(self)
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Service Provider Debug ===\n");
        for (key, reg) in self.inner.iter() {
            s.push_str(&format!("  {}: {:?}\n", key, reg.lifetime));
        }
        s
    }
}

impl ServiceContainer for ServiceProvider {
    fn resolve_any(&self, key: &Key) -> InjectResult<AnyArc> {
        let reg = self
            .inner
            .get(key)
            .ok_or(InjectError::Resolution(key.display_name()))?;
        with_circular_guard(key, || match reg.lifetime {
            Lifetime::Singleton => self.resolve_singleton(reg),
            Lifetime::Transient => (reg.ctor)(self),
        })
    }

    fn contains(&self, key: &Key) -> bool {
        self.inner.contains_key(key)
    }
}

impl std::fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("services", &self.inner.len())
            .finish()
    }
}
