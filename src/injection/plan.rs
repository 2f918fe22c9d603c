//! Type injection plans and the memoizing plan cache.

use std::any::TypeId;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::injection::scanner::{scan_type, InjectTarget, Injectable};
use crate::injection::MemberDescriptor;
use crate::internal::sync::{self, RwLock};
use crate::internal::FastMap;
use crate::key::Key;

/// Ordered member descriptors for exactly one type.
///
/// Immutable once built and shared by every instance of the type.
#[derive(Clone)]
pub struct TypePlan {
    target: Key,
    descriptors: Vec<MemberDescriptor>,
}

impl TypePlan {
    pub(crate) fn new(target: Key, descriptors: Vec<MemberDescriptor>) -> Self {
        Self { target, descriptors }
    }

    /// The type this plan belongs to.
    pub fn target(&self) -> Key {
        self.target
    }

    pub fn descriptors(&self) -> &[MemberDescriptor] {
        &self.descriptors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MemberDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// An empty plan means instances of the type are skipped entirely.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl<'a> IntoIterator for &'a TypePlan {
    type Item = &'a MemberDescriptor;
    type IntoIter = std::slice::Iter<'a, MemberDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

impl fmt::Debug for TypePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypePlan")
            .field("target", &self.target)
            .field("descriptors", &self.descriptors)
            .finish()
    }
}

/// Memoized plans keyed by runtime type.
///
/// The first request for a type scans it; later requests return the stored
/// plan. Concurrent first requests may both scan, but only the first stored
/// plan is kept and every caller gets that same `Arc`. Plans are never
/// evicted.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{Injectable, PlanCache};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Crate;
/// impl Injectable for Crate {}
///
/// let cache = PlanCache::new();
/// let first = cache.plan_of::<Crate>();
/// let second = cache.plan_of::<Crate>();
/// assert!(Arc::ptr_eq(&first, &second));
/// assert!(first.is_empty());
/// ```
pub struct PlanCache {
    plans: RwLock<FastMap<TypeId, Arc<TypePlan>>>,
}

impl PlanCache {
    pub fn new() -> Self {
        Self {
            plans: RwLock::new(FastMap::default()),
        }
    }

    /// The process-wide cache used unless a manager is given its own.
    pub fn global() -> Arc<PlanCache> {
        static GLOBAL: OnceLock<Arc<PlanCache>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(PlanCache::new())).clone()
    }

    /// Plan for `T`.
    pub fn plan_of<T: Injectable>(&self) -> Arc<TypePlan> {
        self.get_or_scan(Key::of::<T>(), scan_type::<T>).0
    }

    /// Plan for the runtime type of `target`.
    pub fn plan_for(&self, target: &dyn InjectTarget) -> Arc<TypePlan> {
        self.get_or_scan(target.target_key(), || target.scan_plan()).0
    }

    /// Returns the cached plan, scanning on a miss. The flag is `true` when
    /// this call stored the plan.
    pub(crate) fn get_or_scan(&self, key: Key, scan: impl FnOnce() -> TypePlan) -> (Arc<TypePlan>, bool) {
        let cached = sync::read(&self.plans).get(&key.type_id()).cloned();
        if let Some(plan) = cached {
            return (plan, false);
        }

        // Scan outside the lock; scanning a type with bases never re-enters the cache
        let scanned = Arc::new(scan());
        let mut plans = sync::write(&self.plans);
        match plans.entry(key.type_id()) {
            Entry::Occupied(existing) => (existing.get().clone(), false),
            Entry::Vacant(slot) => {
                slot.insert(scanned.clone());
                (scanned, true)
            }
        }
    }

    /// Whether a plan for `key` has been stored.
    pub fn contains(&self, key: &Key) -> bool {
        sync::read(&self.plans).contains_key(&key.type_id())
    }

    pub fn contains_type<T: ?Sized + 'static>(&self) -> bool {
        self.contains(&Key::of::<T>())
    }

    /// Number of cached plans.
    pub fn len(&self) -> usize {
        sync::read(&self.plans).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let plans = sync::read(&self.plans);
        let mut sorted: Vec<_> = plans.values().collect();
        sorted.sort_by_key(|plan| plan.target().display_name());

        let mut s = String::new();
        s.push_str("=== Plan Cache Debug ===\n");
        for plan in sorted {
            s.push_str(&format!("{} ({} members)\n", plan.target(), plan.len()));
            for descriptor in plan.iter() {
                s.push_str(&format!(
                    "  {:?} {} -> {:?}\n",
                    descriptor.kind(),
                    descriptor.identity(),
                    descriptor.declared_types()
                ));
            }
        }
        s
    }
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PlanCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanCache").field("plans", &self.len()).finish()
    }
}
