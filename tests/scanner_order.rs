//! Descriptor order across declaring types, observed through method side
//! effects.

use ferrous_inject::{
    scan_type, Injectable, InjectionContext, Injector, MemberCategory, MemberScanner, PlanCache, ServiceCollection,
    Visibility,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Journal {
    entries: Mutex<Vec<&'static str>>,
}

impl Journal {
    fn record(&self, entry: &'static str) {
        self.entries.lock().unwrap().push(entry);
    }

    fn take(&self) -> Vec<&'static str> {
        std::mem::take(&mut *self.entries.lock().unwrap())
    }
}

#[derive(Default)]
struct Root {
    journal: Option<Arc<Journal>>,
}

impl Injectable for Root {
    fn declare_members(members: &mut MemberScanner<Self>) {
        members
            .method("root_method")
            .inject(|_: &mut Self, (j,): (Arc<Journal>,)| j.record("root_method"))
            .field("root_field")
            .inject(|r: &mut Self, j: Arc<Journal>| {
                j.record("root_field");
                r.journal = Some(j);
            });
    }
}

#[derive(Default)]
struct Middle {
    root: Root,
}

impl Injectable for Middle {
    fn declare_members(members: &mut MemberScanner<Self>) {
        members
            .extends(|m: &mut Self| &mut m.root)
            .method("middle_method")
            .protected()
            .inject(|_: &mut Self, (j,): (Arc<Journal>,)| j.record("middle_method"))
            .property("middle_property")
            .inject(|_: &mut Self, j: Arc<Journal>| j.record("middle_property"));
    }
}

#[derive(Default)]
struct Leaf {
    middle: Middle,
}

impl Injectable for Leaf {
    fn declare_members(members: &mut MemberScanner<Self>) {
        members
            .method("leaf_method")
            .private()
            .inject(|_: &mut Self, (j,): (Arc<Journal>,)| j.record("leaf_method"))
            .field("leaf_field")
            .inject(|_: &mut Self, j: Arc<Journal>| j.record("leaf_field"))
            .property("leaf_property")
            .inject(|_: &mut Self, j: Arc<Journal>| j.record("leaf_property"))
            .extends(|l: &mut Self| &mut l.middle);
    }
}

fn injector(journal: Arc<Journal>) -> Injector {
    let mut services = ServiceCollection::new();
    services.add_singleton_arc(journal);
    Injector::new(InjectionContext::new(Arc::new(services.build())).with_plan_cache(Arc::new(PlanCache::new())))
}

#[test]
fn most_derived_first_values_before_methods() {
    let journal = Arc::new(Journal::default());
    let injector = injector(journal.clone());

    let mut leaf = Leaf::default();
    injector.inject(&mut leaf).unwrap();

    assert_eq!(
        journal.take(),
        [
            "leaf_field",
            "leaf_property",
            "leaf_method",
            "middle_property",
            "middle_method",
            "root_field",
            "root_method",
        ]
    );
    assert!(leaf.middle.root.journal.is_some());
}

#[test]
fn order_is_stable_across_injections() {
    let journal = Arc::new(Journal::default());
    let injector = injector(journal.clone());

    injector.inject(&mut Middle::default()).unwrap();
    let first = journal.take();
    injector.inject(&mut Middle::default()).unwrap();

    assert_eq!(first, journal.take());
    assert_eq!(first, ["middle_property", "middle_method", "root_field", "root_method"]);
}

#[test]
fn inherited_descriptors_keep_their_metadata() {
    let plan = scan_type::<Leaf>();
    let summary: Vec<_> = plan
        .iter()
        .map(|d| (d.name(), d.identity().category(), d.identity().visibility()))
        .collect();

    assert_eq!(
        summary,
        [
            ("leaf_field", MemberCategory::Field, Visibility::Public),
            ("leaf_property", MemberCategory::Property, Visibility::Public),
            ("leaf_method", MemberCategory::Method, Visibility::Private),
            ("middle_property", MemberCategory::Property, Visibility::Public),
            ("middle_method", MemberCategory::Method, Visibility::Protected),
            ("root_field", MemberCategory::Field, Visibility::Public),
            ("root_method", MemberCategory::Method, Visibility::Public),
        ]
    );
    assert!(plan.descriptors()[6].identity().declaring_type().ends_with("Root"));
}
