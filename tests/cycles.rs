//! Cyclic and shared nested graphs, and the nesting depth limit.

mod common;

use common::Config;
use ferrous_inject::{
    EngineOptions, InjectError, Injectable, InjectionContext, Injector, MemberScanner, PlanCache, ServiceCollection,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Hits(AtomicUsize);

fn injector(options: EngineOptions) -> (Injector, Arc<Hits>) {
    let hits = Arc::new(Hits::default());
    let mut services = ServiceCollection::new();
    services.add_singleton(Config { name: "cycle" });
    services.add_singleton_arc(hits.clone());
    let context = InjectionContext::new(Arc::new(services.build()))
        .with_options(options)
        .with_plan_cache(Arc::new(PlanCache::new()));
    (Injector::new(context), hits)
}

#[derive(Default)]
struct Link {
    config: Option<Arc<Config>>,
    next: Option<Rc<RefCell<Link>>>,
}

impl Injectable for Link {
    fn declare_members(members: &mut MemberScanner<Self>) {
        members
            .field("config")
            .inject(|l: &mut Self, c: Arc<Config>| l.config = Some(c))
            .field("next")
            .inject_members_shared(|l: &Self| l.next.as_ref());
    }
}

#[test]
fn cyclic_shared_graph_terminates() {
    let (injector, _) = injector(EngineOptions::default());
    let a = Rc::new(RefCell::new(Link::default()));
    let b = Rc::new(RefCell::new(Link::default()));
    a.borrow_mut().next = Some(b.clone());
    b.borrow_mut().next = Some(a.clone());

    injector.inject(&mut *a.borrow_mut()).unwrap();

    assert!(a.borrow().config.is_some());
    assert!(b.borrow().config.is_some());

    b.borrow_mut().next = None;
}

#[test]
fn self_reference_terminates() {
    let (injector, _) = injector(EngineOptions::default());
    let a = Rc::new(RefCell::new(Link::default()));
    a.borrow_mut().next = Some(a.clone());

    injector.inject(&mut *a.borrow_mut()).unwrap();

    assert!(a.borrow().config.is_some());
    a.borrow_mut().next = None;
}

#[derive(Default)]
struct Shared {
    calls: usize,
}

impl Injectable for Shared {
    fn declare_members(members: &mut MemberScanner<Self>) {
        members.method("init").inject(|s: &mut Self, (hits,): (Arc<Hits>,)| {
            hits.0.fetch_add(1, Ordering::SeqCst);
            s.calls += 1;
        });
    }
}

#[derive(Default)]
struct Diamond {
    left: Option<Rc<RefCell<Shared>>>,
    right: Option<Rc<RefCell<Shared>>>,
}

impl Injectable for Diamond {
    fn declare_members(members: &mut MemberScanner<Self>) {
        members
            .field("left")
            .inject_members_shared(|d: &Self| d.left.as_ref())
            .field("right")
            .inject_members_shared(|d: &Self| d.right.as_ref());
    }
}

#[test]
fn shared_value_is_injected_once_per_call() {
    let (injector, hits) = injector(EngineOptions::default());
    let shared = Rc::new(RefCell::new(Shared::default()));
    let mut diamond = Diamond {
        left: Some(shared.clone()),
        right: Some(shared.clone()),
    };

    injector.inject(&mut diamond).unwrap();
    assert_eq!(shared.borrow().calls, 1);

    injector.inject(&mut diamond).unwrap();
    assert_eq!(shared.borrow().calls, 2);
    assert_eq!(hits.0.load(Ordering::SeqCst), 2);
}

#[derive(Default)]
struct Chain {
    config: Option<Arc<Config>>,
    next: Option<Box<Chain>>,
}

impl Chain {
    fn of_length(len: usize) -> Chain {
        let mut chain = Chain::default();
        for _ in 1..len {
            chain = Chain {
                config: None,
                next: Some(Box::new(chain)),
            };
        }
        chain
    }

    fn all_configured(&self) -> bool {
        self.config.is_some() && self.next.as_ref().map_or(true, |next| next.all_configured())
    }
}

impl Injectable for Chain {
    fn declare_members(members: &mut MemberScanner<Self>) {
        members
            .field("config")
            .inject(|c: &mut Self, config: Arc<Config>| c.config = Some(config))
            .field("next")
            .inject_members(|c: &mut Self| c.next.as_deref_mut());
    }
}

#[test]
fn nesting_within_the_limit_succeeds() {
    let (injector, _) = injector(EngineOptions::new().with_max_depth(3));
    let mut chain = Chain::of_length(4);

    injector.inject(&mut chain).unwrap();

    assert!(chain.all_configured());
}

#[test]
fn nesting_past_the_limit_fails() {
    let (injector, _) = injector(EngineOptions::new().with_max_depth(3));
    let mut chain = Chain::of_length(5);

    assert_eq!(injector.inject(&mut chain), Err(InjectError::DepthExceeded(3)));
}

#[derive(Default)]
struct Leaf {
    config: Option<Arc<Config>>,
}

impl Injectable for Leaf {
    fn declare_members(members: &mut MemberScanner<Self>) {
        members
            .field("config")
            .inject(|l: &mut Self, c: Arc<Config>| l.config = Some(c));
    }
}

#[derive(Default)]
struct Holder {
    child: Option<Box<Leaf>>,
}

impl Injectable for Holder {
    fn declare_members(members: &mut MemberScanner<Self>) {
        members.field("child").inject_members(|h: &mut Self| h.child.as_deref_mut());
    }
}

#[derive(Default)]
struct Swapper {
    own: Option<Box<Leaf>>,
    holder: Holder,
}

impl Injectable for Swapper {
    fn declare_members(members: &mut MemberScanner<Self>) {
        members
            .field("own")
            .inject_members(|s: &mut Self| s.own.as_deref_mut())
            .method("swap")
            .inject(|s: &mut Self, (): ()| {
                // Frees the first leaf; the replacement may reuse its allocation
                s.own = None;
                s.holder.child = Some(Box::new(Leaf::default()));
            })
            .extends(|s: &mut Self| &mut s.holder);
    }
}

#[test]
fn value_replacing_a_freed_sibling_is_still_injected() {
    let (injector, _) = injector(EngineOptions::default());
    let mut swapper = Swapper {
        own: Some(Box::default()),
        holder: Holder::default(),
    };

    injector.inject(&mut swapper).unwrap();

    assert!(swapper.own.is_none());
    let child = swapper.holder.child.as_ref().unwrap();
    assert!(child.config.is_some());
}

#[test]
fn owned_values_are_injected_on_every_visit() {
    let (injector, _) = injector(EngineOptions::default());
    let mut chain = Chain::of_length(3);

    injector.inject(&mut chain).unwrap();
    chain.next.as_mut().unwrap().config = None;
    injector.inject(&mut chain).unwrap();

    assert!(chain.all_configured());
}

#[test]
fn default_limit_accepts_deep_acyclic_nesting() {
    // Unoptimized builds use large frames; give the descent room
    let worker = std::thread::Builder::new()
        .stack_size(32 * 1024 * 1024)
        .spawn(|| {
            let (injector, _) = injector(EngineOptions::default());
            let mut chain = Chain::of_length(ferrous_inject::DEFAULT_MAX_DEPTH + 1);

            injector.inject(&mut chain).unwrap();
            chain.all_configured()
        })
        .unwrap();

    assert!(worker.join().unwrap());
}
