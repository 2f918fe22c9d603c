//! Service collection module.
//!
//! `ServiceCollection` is the registration table handed to configurators at
//! bootstrap. Building it yields the [`ServiceProvider`] the injection engine
//! resolves from.

use std::sync::Arc;

use crate::error::InjectResult;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::provider::ServiceProvider;
use crate::registration::{Registration, Registry};
use crate::traits::AnyArc;
use crate::ServiceDescriptor;

pub mod configurator;
pub use configurator::{ConfiguratorEntry, ConfiguratorRegistry, ServicesConfigurator};

/// Registration table for the bundled container.
///
/// Registering the same type twice replaces the earlier registration.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{ServiceCollection, ServiceContainerExt};
/// use std::sync::Arc;
///
/// struct Config { port: u16 }
/// struct Server { config: Arc<Config> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Config { port: 8080 });
/// services.add_singleton_factory::<Server, _>(|provider| Server {
///     config: provider.get_required::<Config>(),
/// });
///
/// let provider = services.build();
/// assert_eq!(provider.get_required::<Server>().config.port, 8080);
/// ```
pub struct ServiceCollection {
    registry: Registry,
}

impl ServiceCollection {
    /// Creates a new empty service collection.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    // ----- Concrete Type Registrations -----

    /// Registers an already-built value shared by every resolution.
    pub fn add_singleton<T: Send + Sync + 'static>(&mut self, value: T) -> &mut Self {
        self.add_singleton_arc(Arc::new(value))
    }

    /// Registers a shared value the caller also keeps a handle to.
    ///
    /// Works for trait objects as well: `add_singleton_arc::<dyn Logger>(logger)`.
    pub fn add_singleton_arc<T: ?Sized + Send + Sync + 'static>(&mut self, value: Arc<T>) -> &mut Self {
        let stored: AnyArc = Arc::new(value);
        self.insert::<T>(Lifetime::Singleton, Arc::new(move |_: &ServiceProvider| -> InjectResult<AnyArc> {
            Ok(stored.clone())
        }))
    }

    /// Registers a factory run once, on first request.
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Singleton, factory)
    }

    /// Registers a factory run on every request.
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Transient, factory)
    }

    fn add_factory<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> T + Send + Sync + 'static,
    {
        self.insert::<T>(
            lifetime,
            Arc::new(move |provider: &ServiceProvider| -> InjectResult<AnyArc> {
                let stored: AnyArc = Arc::new(Arc::new(factory(provider)));
                Ok(stored)
            }),
        )
    }

    // ----- Trait Registrations -----

    /// Binds a trait object shared by every resolution.
    ///
    /// ```rust
    /// use ferrous_inject::{ServiceCollection, ServiceContainerExt};
    /// use std::sync::Arc;
    ///
    /// trait Greeter: Send + Sync {
    ///     fn greet(&self) -> String;
    /// }
    ///
    /// struct English;
    /// impl Greeter for English {
    ///     fn greet(&self) -> String { "hello".to_string() }
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton_trait::<dyn Greeter>(Arc::new(English));
    ///
    /// let provider = services.build();
    /// assert_eq!(provider.get_required::<dyn Greeter>().greet(), "hello");
    /// ```
    pub fn add_singleton_trait<T>(&mut self, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.add_singleton_arc(value)
    }

    /// Binds a trait object only if nothing is bound to `T` yet.
    pub fn try_add_singleton_trait<T>(&mut self, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        if !self.contains::<T>() {
            self.add_singleton_arc(value);
        }
        self
    }

    /// Binds a trait object built fresh on every request.
    pub fn add_transient_trait_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Arc<T> + Send + Sync + 'static,
    {
        self.insert::<T>(
            Lifetime::Transient,
            Arc::new(move |provider: &ServiceProvider| -> InjectResult<AnyArc> {
                let stored: AnyArc = Arc::new(factory(provider));
                Ok(stored)
            }),
        )
    }

    fn insert<T: ?Sized + 'static>(&mut self, lifetime: Lifetime, ctor: crate::registration::Ctor) -> &mut Self {
        self.registry
            .insert(Key::of::<T>(), Registration::new(lifetime, ctor));
        self
    }

    // ----- Introspection -----

    /// Whether `T` has a registration.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.registry.contains_key(&Key::of::<T>())
    }

    /// Number of distinct registered types.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Descriptors of every registration, in first-registration order.
    pub fn service_descriptors(&self) -> Vec<ServiceDescriptor> {
        self.registry
            .iter()
            .map(|(key, reg)| ServiceDescriptor {
                key: *key,
                lifetime: reg.lifetime,
            })
            .collect()
    }

    /// Runs a configurator against this collection.
    pub fn add_configurator<C: ServicesConfigurator>(&mut self) -> &mut Self {
        C::configure_services(self);
        self
    }

    /// Freezes the registrations into a container.
    pub fn build(self) -> ServiceProvider {
        ServiceProvider::new(self.registry)
    }
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}
