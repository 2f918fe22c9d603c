//! Explicit configurator registry.
//!
//! Configurators contribute registrations to the one container built at
//! bootstrap. The host lists them in a [`ConfiguratorRegistry`]; nothing is
//! discovered by scanning the process.

use tracing::debug;

use crate::collection::ServiceCollection;
use crate::provider::ServiceProvider;

/// A type that contributes registrations at bootstrap.
///
/// # Example
///
/// ```rust
/// use ferrous_inject::{ConfiguratorRegistry, ServiceCollection, ServiceContainerExt, ServicesConfigurator};
///
/// struct Settings { volume: u8 }
///
/// struct AudioServices;
///
/// impl ServicesConfigurator for AudioServices {
///     fn configure_services(services: &mut ServiceCollection) {
///         services.add_singleton(Settings { volume: 7 });
///     }
/// }
///
/// let provider = ConfiguratorRegistry::new()
///     .with::<AudioServices>()
///     .build_container();
/// assert_eq!(provider.get_required::<Settings>().volume, 7);
/// ```
pub trait ServicesConfigurator {
    /// Adds this configurator's registrations to `services`.
    fn configure_services(services: &mut ServiceCollection);
}

/// One entry of a [`ConfiguratorRegistry`].
#[derive(Clone, Copy)]
pub struct ConfiguratorEntry {
    name: &'static str,
    configure: fn(&mut ServiceCollection),
}

impl ConfiguratorEntry {
    /// Diagnostic name (the configurator's type name for typed entries)
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl std::fmt::Debug for ConfiguratorEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguratorEntry").field("name", &self.name).finish()
    }
}

/// Ordered table of configurators supplied by the host.
///
/// Configurators run in registration order, so a later one can replace a
/// registration made by an earlier one.
#[derive(Debug, Clone, Default)]
pub struct ConfiguratorRegistry {
    entries: Vec<ConfiguratorEntry>,
}

impl ConfiguratorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends configurator `C`.
    pub fn register<C: ServicesConfigurator>(&mut self) -> &mut Self {
        self.register_fn(std::any::type_name::<C>(), C::configure_services)
    }

    /// Appends configurator `C`, builder style.
    pub fn with<C: ServicesConfigurator>(mut self) -> Self {
        self.register::<C>();
        self
    }

    /// Appends a plain configure function under `name`.
    pub fn register_fn(&mut self, name: &'static str, configure: fn(&mut ServiceCollection)) -> &mut Self {
        self.entries.push(ConfiguratorEntry { name, configure });
        self
    }

    /// Registered entries, in order.
    pub fn entries(&self) -> &[ConfiguratorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs every configurator against `services`, in order.
    pub fn configure(&self, services: &mut ServiceCollection) {
        for entry in &self.entries {
            debug!(configurator = entry.name, "configuring services");
            (entry.configure)(services);
        }
    }

    /// Runs every configurator against a fresh collection and builds it.
    pub fn build_container(&self) -> ServiceProvider {
        let mut services = ServiceCollection::new();
        self.configure(&mut services);
        debug!(
            configurators = self.entries.len(),
            services = services.len(),
            "service container built"
        );
        services.build()
    }
}
