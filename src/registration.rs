//! Service registration types.

use std::sync::Arc;

use crate::error::InjectResult;
use crate::internal::FastMap;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::provider::ServiceProvider;
use crate::traits::AnyArc;

#[cfg(feature = "once-cell")]
use once_cell::sync::OnceCell;

pub(crate) type Ctor = Arc<dyn Fn(&ServiceProvider) -> InjectResult<AnyArc> + Send + Sync>;

/// Service registration with lifetime and constructor
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    pub(crate) ctor: Ctor,
    /// Singleton cache
    #[cfg(feature = "once-cell")]
    pub(crate) single_runtime: Option<OnceCell<AnyArc>>,
    #[cfg(not(feature = "once-cell"))]
    pub(crate) single_runtime: Option<crate::internal::sync::Mutex<Option<AnyArc>>>,
}

impl Registration {
    pub(crate) fn new(lifetime: Lifetime, ctor: Ctor) -> Self {
        let single_runtime = match lifetime {
            Lifetime::Singleton => {
                #[cfg(feature = "once-cell")]
                { Some(OnceCell::new()) }
                #[cfg(not(feature = "once-cell"))]
                { Some(crate::internal::sync::Mutex::new(None)) }
            }
            Lifetime::Transient => None,
        };

        Self { lifetime, ctor, single_runtime }
    }
}

/// Service registry holding all registrations
#[derive(Default)]
pub(crate) struct Registry {
    entries: FastMap<Key, Registration>,
    /// First-registration order, for descriptors and diagnostics
    order: Vec<Key>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts a registration, replacing any earlier one for the same key
    pub(crate) fn insert(&mut self, key: Key, registration: Registration) {
        if self.entries.insert(key, registration).is_none() {
            self.order.push(key);
        }
    }

    #[inline(always)]
    pub(crate) fn get(&self, key: &Key) -> Option<&Registration> {
        self.entries.get(key)
    }

    #[inline(always)]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    /// Registrations in first-registration order
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Key, &Registration)> {
        self.order
            .iter()
            .filter_map(move |key| self.entries.get(key).map(|reg| (key, reg)))
    }
}
