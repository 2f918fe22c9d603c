//! Service descriptors for introspection and diagnostics.

use crate::key::Key;
use crate::lifetime::Lifetime;

/// Metadata about one container registration.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Lifetime, ServiceCollection};
///
/// struct Database { url: String }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
/// services.add_transient_factory::<u64, _>(|_| 7);
///
/// let descriptors = services.service_descriptors();
/// assert_eq!(descriptors.len(), 2);
/// assert!(descriptors[0].type_name().contains("Database"));
/// assert_eq!(descriptors[1].lifetime, Lifetime::Transient);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// The service key
    pub key: Key,
    /// Service lifetime
    pub lifetime: Lifetime,
}

impl ServiceDescriptor {
    /// Get the type/trait name
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }
}
