//! The container contract consumed by the injection engine.

use std::any::Any;
use std::sync::Arc;

use crate::error::InjectResult;
use crate::key::Key;
use crate::traits::Dependency;

/// Type-erased service value.
///
/// Containers store a service registered for `T` as an `Arc<T>` wrapped in
/// this `Arc<dyn Any>`; this works the same for sized types and for trait
/// objects (`Arc<dyn Logger>`).
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Object-safe resolve contract.
///
/// This is the only thing the injection engine needs from a container. The
/// bundled [`ServiceProvider`](crate::ServiceProvider) implements it; hosts
/// with their own container implement it on an adapter.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{AnyArc, InjectError, InjectResult, Key, ServiceContainer, ServiceContainerExt};
/// use std::sync::Arc;
///
/// struct OnlyNumbers;
///
/// impl ServiceContainer for OnlyNumbers {
///     fn resolve_any(&self, key: &Key) -> InjectResult<AnyArc> {
///         if *key == Key::of::<u32>() {
///             Ok(Arc::new(Arc::new(7u32)))
///         } else {
///             Err(InjectError::Resolution(key.display_name()))
///         }
///     }
///
///     fn contains(&self, key: &Key) -> bool {
///         *key == Key::of::<u32>()
///     }
/// }
///
/// let container = OnlyNumbers;
/// assert_eq!(*container.get::<u32>().unwrap(), 7);
/// assert!(container.get::<String>().is_err());
/// ```
pub trait ServiceContainer: Send + Sync {
    /// Resolves the service registered for `key`.
    ///
    /// Returns [`InjectError::Resolution`](crate::InjectError::Resolution)
    /// when nothing is registered.
    fn resolve_any(&self, key: &Key) -> InjectResult<AnyArc>;

    /// Whether a registration exists for `key`.
    fn contains(&self, key: &Key) -> bool;
}

/// Typed helpers over [`ServiceContainer`].
pub trait ServiceContainerExt: ServiceContainer {
    /// Resolves `T` (sized or `dyn Trait`).
    fn get<T: ?Sized + Send + Sync + 'static>(&self) -> InjectResult<Arc<T>> {
        let any = self.resolve_any(&Key::of::<T>())?;
        <Arc<T> as Dependency>::from_resolved(any)
    }

    /// Resolves `T`, panicking on failure.
    fn get_required<T: ?Sized + Send + Sync + 'static>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e))
    }

    /// Whether `T` is registered.
    fn contains_type<T: ?Sized + 'static>(&self) -> bool {
        self.contains(&Key::of::<T>())
    }
}

impl<C: ServiceContainer + ?Sized> ServiceContainerExt for C {}
