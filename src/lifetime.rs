//! Service lifetime definitions.

/// Caching behavior of a container registration.
///
/// The bundled container only knows two lifetimes. Request scopes and
/// disposal belong to a full container and are not modelled here.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Lifetime, ServiceCollection, ServiceContainerExt};
/// use std::sync::Arc;
///
/// struct Clock;
/// struct Tick;
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton_factory::<Clock, _>(|_| Clock);
/// services.add_transient_factory::<Tick, _>(|_| Tick);
///
/// let provider = services.build();
/// let a = provider.get_required::<Clock>();
/// let b = provider.get_required::<Clock>();
/// assert!(Arc::ptr_eq(&a, &b));
///
/// let t1 = provider.get_required::<Tick>();
/// let t2 = provider.get_required::<Tick>();
/// assert!(!Arc::ptr_eq(&t1, &t2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Built once on first request, then shared
    Singleton,
    /// Built on every resolution, never cached
    Transient,
}
