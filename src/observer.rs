//! Observers for injection events.
//!
//! Hooks let a host trace what the engine does: which plans get built, which
//! instances get injected, how long it took, and what failed.

use std::sync::Arc;
use std::time::Duration;

use crate::error::InjectError;
use crate::injection::TypePlan;

/// Observer trait for injection events.
///
/// Observer calls are made synchronously on the tree thread during
/// injection. Keep implementations lightweight.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{InjectError, InjectionObserver};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct CountingObserver {
///     injected: AtomicUsize,
/// }
///
/// impl InjectionObserver for CountingObserver {
///     fn injecting(&self, _type_name: &'static str) {}
///
///     fn injected(&self, _type_name: &'static str, _duration: Duration) {
///         self.injected.fetch_add(1, Ordering::Relaxed);
///     }
///
///     fn injection_failed(&self, type_name: &'static str, error: &InjectError) {
///         eprintln!("{type_name}: {error}");
///     }
/// }
/// ```
pub trait InjectionObserver: Send + Sync {
    /// Called after a type's plan is scanned and stored for the first time.
    fn plan_built(&self, plan: &TypePlan) {
        let _ = plan;
    }

    /// Called before a target's plan is applied.
    fn injecting(&self, type_name: &'static str);

    /// Called after every descriptor of a target was applied.
    fn injected(&self, type_name: &'static str, duration: Duration);

    /// Called when applying a target's plan failed.
    fn injection_failed(&self, type_name: &'static str, error: &InjectError);
}

/// Registered observers.
///
/// Minimal overhead when nothing is registered.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn InjectionObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn InjectionObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn plan_built(&self, plan: &TypePlan) {
        for observer in &self.observers {
            observer.plan_built(plan);
        }
    }

    #[inline]
    pub(crate) fn injecting(&self, type_name: &'static str) {
        for observer in &self.observers {
            observer.injecting(type_name);
        }
    }

    #[inline]
    pub(crate) fn injected(&self, type_name: &'static str, duration: Duration) {
        for observer in &self.observers {
            observer.injected(type_name, duration);
        }
    }

    #[inline]
    pub(crate) fn injection_failed(&self, type_name: &'static str, error: &InjectError) {
        for observer in &self.observers {
            observer.injection_failed(type_name, error);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.observers.len())
            .finish()
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// ```
/// use ferrous_inject::{InjectionManager, TracingObserver};
/// use std::sync::Arc;
///
/// let builder = InjectionManager::builder()
///     .observer(Arc::new(TracingObserver::new()));
/// # drop(builder);
/// ```
#[derive(Debug, Clone)]
pub struct TracingObserver {
    label: &'static str,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self {
            label: "ferrous_inject",
        }
    }

    /// Tags every event with `label`.
    pub fn with_label(label: &'static str) -> Self {
        Self { label }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl InjectionObserver for TracingObserver {
    fn plan_built(&self, plan: &TypePlan) {
        tracing::debug!(
            label = self.label,
            target_type = plan.target().display_name(),
            descriptors = plan.len(),
            "plan built"
        );
    }

    fn injecting(&self, type_name: &'static str) {
        tracing::trace!(label = self.label, target_type = type_name, "injecting");
    }

    fn injected(&self, type_name: &'static str, duration: Duration) {
        tracing::debug!(
            label = self.label,
            target_type = type_name,
            elapsed_us = duration.as_micros() as u64,
            "injected"
        );
    }

    fn injection_failed(&self, type_name: &'static str, error: &InjectError) {
        tracing::warn!(label = self.label, target_type = type_name, %error, "injection failed");
    }
}
