//! Startup walk and mutation listener over the in-memory scene tree.

mod common;

use common::{Config, CountingContainer, Unregistered};
use ferrous_inject::{
    EngineOptions, FailurePolicy, HostTree, InjectError, Injectable, InjectionContext, Injector, MemberScanner,
    MutationListener, PlanCache, SceneNode, SceneTree, ServiceCollection, TreeWalker,
};
use std::sync::Arc;

fn injector(options: EngineOptions) -> (Injector, Arc<CountingContainer>) {
    let mut services = ServiceCollection::new();
    services.add_singleton(Config { name: "tree" });
    let container = CountingContainer::new(services.build());
    let context = InjectionContext::new(container.clone())
        .with_options(options)
        .with_plan_cache(Arc::new(PlanCache::new()));
    (Injector::new(context), container)
}

#[derive(Default)]
struct Wired {
    config: Option<Arc<Config>>,
    injections: usize,
}

impl Injectable for Wired {
    fn declare_members(members: &mut MemberScanner<Self>) {
        members
            .field("config")
            .inject(|w: &mut Self, c: Arc<Config>| w.config = Some(c))
            .method("count")
            .inject(|w: &mut Self, (): ()| w.injections += 1);
    }
}

#[derive(Default)]
struct Decoration;

impl Injectable for Decoration {}

#[derive(Default)]
struct Broken {
    missing: Option<Arc<Unregistered>>,
}

impl Injectable for Broken {
    fn declare_members(members: &mut MemberScanner<Self>) {
        members
            .field("missing")
            .inject(|b: &mut Self, m: Arc<Unregistered>| b.missing = Some(m));
    }
}

fn injections(node: &SceneNode) -> usize {
    node.script(|w: &Wired| w.injections).unwrap()
}

#[test]
fn walk_injects_every_eligible_node() {
    let (injector, _) = injector(EngineOptions::default());
    let root = SceneNode::new("root");
    let a = SceneNode::with_script::<Wired>("a");
    let b = SceneNode::with_script::<Wired>("b");
    let deco = SceneNode::with_script::<Decoration>("deco");
    a.add_child(b.clone()).add_child(deco);
    root.add_child(a.clone());

    let report = TreeWalker::new(injector).walk_and_inject_all(&root).unwrap();

    assert_eq!(report.visited, 4);
    assert_eq!(report.injected, 2);
    assert_eq!(report.skipped, 2);
    assert!(report.is_clean());
    assert_eq!(injections(&a), 1);
    assert_eq!(injections(&b), 1);
}

#[test]
fn nodes_without_plans_cause_no_container_calls() {
    let (injector, container) = injector(EngineOptions::default());
    let root = SceneNode::with_script::<Decoration>("root");
    root.add_child(SceneNode::new("plain"));

    let report = TreeWalker::new(injector).walk_and_inject_all(&root).unwrap();

    assert_eq!(report.injected, 0);
    assert_eq!(container.calls(), 0);
}

#[test]
fn abort_policy_returns_the_first_failure() {
    let (injector, _) = injector(EngineOptions::default());
    let root = SceneNode::new("root");
    let broken = SceneNode::with_script::<Broken>("broken");
    let later = SceneNode::with_script::<Wired>("later");
    root.add_child(broken).add_child(later.clone());

    let err = TreeWalker::new(injector).walk_and_inject_all(&root).unwrap_err();

    assert!(matches!(err, InjectError::Resolution(_)));
    assert_eq!(injections(&later), 0);
}

#[test]
fn log_and_continue_records_failures_and_keeps_walking() {
    let (injector, _) = injector(EngineOptions::new().with_failure_policy(FailurePolicy::LogAndContinue));
    let root = SceneNode::new("root");
    let later = SceneNode::with_script::<Wired>("later");
    root.add_child(SceneNode::with_script::<Broken>("broken"))
        .add_child(later.clone());

    let report = TreeWalker::new(injector).walk_and_inject_all(&root).unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].node, "broken");
    assert!(matches!(report.failures[0].error, InjectError::Resolution(_)));
    assert_eq!(injections(&later), 1);
    assert!(!report.is_clean());
}

#[test]
fn listener_injects_exactly_the_notified_node() {
    let (injector, _) = injector(EngineOptions::default());
    let parent = SceneNode::with_script::<Wired>("parent");
    let child = SceneNode::with_script::<Wired>("child");
    parent.add_child(child.clone());

    MutationListener::new(injector).on_node_added(&parent).unwrap();

    assert_eq!(injections(&parent), 1);
    assert_eq!(injections(&child), 0);
}

#[test]
fn attached_subtree_is_injected_once_per_node() {
    let (injector, _) = injector(EngineOptions::default());
    let tree = SceneTree::new();
    tree.subscribe_node_added(MutationListener::new(injector).into_handler());

    let branch = SceneNode::with_script::<Wired>("branch");
    let leaf = SceneNode::with_script::<Wired>("leaf");
    branch.add_child(leaf.clone());
    tree.attach(&tree.root(), branch.clone()).unwrap();

    assert_eq!(injections(&branch), 1);
    assert_eq!(injections(&leaf), 1);
    let config = leaf.script(|w: &Wired| w.config.clone()).unwrap().unwrap();
    assert_eq!(config.name, "tree");
}

#[test]
fn listener_failure_reaches_the_attaching_caller() {
    let (injector, _) = injector(EngineOptions::default());
    let tree = SceneTree::new();
    tree.subscribe_node_added(MutationListener::new(injector).into_handler());

    let result = tree.attach(&tree.root(), SceneNode::with_script::<Broken>("broken"));

    assert!(matches!(result, Err(InjectError::Resolution(_))));
    assert_eq!(tree.root().children().len(), 1);
}
