//! Engine bootstrap: the single injection manager of a process.
//!
//! The manager owns the built container and the injection context, runs the
//! startup walk when attached to a tree, and then subscribes the mutation
//! listener. Only one manager may be alive at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::collection::{ConfiguratorRegistry, ServicesConfigurator};
use crate::error::{InjectError, InjectResult};
use crate::injection::{InjectionContext, Injector, PlanCache};
use crate::observer::{InjectionObserver, Observers};
use crate::options::EngineOptions;
use crate::traits::ServiceContainer;
use crate::tree::{HostTree, MutationListener, TreeWalker, WalkReport};

static MANAGER_ALIVE: AtomicBool = AtomicBool::new(false);

/// Claim on the process-wide manager slot, released on drop.
#[derive(Debug)]
struct ManagerSlot(());

impl ManagerSlot {
    fn acquire() -> InjectResult<Self> {
        MANAGER_ALIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ManagerSlot(()))
            .map_err(|_| InjectError::DuplicateManager)
    }
}

impl Drop for ManagerSlot {
    fn drop(&mut self) {
        MANAGER_ALIVE.store(false, Ordering::Release);
    }
}

/// Builder for [`InjectionManager`].
///
/// The container comes either from an explicit [`container`](Self::container)
/// or from the configurators listed on the builder, run in order against one
/// fresh service collection.
#[derive(Default)]
pub struct ManagerBuilder {
    configurators: ConfiguratorRegistry,
    container: Option<Arc<dyn ServiceContainer>>,
    options: EngineOptions,
    observers: Observers,
    plans: Option<Arc<PlanCache>>,
}

impl ManagerBuilder {
    /// Appends configurator `C`.
    pub fn configurator<C: ServicesConfigurator>(mut self) -> Self {
        self.configurators.register::<C>();
        self
    }

    /// Replaces the configurator table.
    pub fn configurators(mut self, configurators: ConfiguratorRegistry) -> Self {
        self.configurators = configurators;
        self
    }

    /// Uses an already-built container; configurators are then ignored.
    pub fn container(mut self, container: Arc<dyn ServiceContainer>) -> Self {
        self.container = Some(container);
        self
    }

    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn InjectionObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    /// Uses `plans` instead of the process-wide plan cache.
    pub fn plan_cache(mut self, plans: Arc<PlanCache>) -> Self {
        self.plans = Some(plans);
        self
    }

    /// Builds the manager.
    ///
    /// Fails with [`InjectError::DuplicateManager`] while another manager is
    /// alive, and with [`InjectError::InvalidOptions`] for unusable options.
    pub fn build(self) -> InjectResult<InjectionManager> {
        self.options.validate()?;
        let slot = ManagerSlot::acquire()?;

        let container: Arc<dyn ServiceContainer> = match self.container {
            Some(container) => container,
            None => Arc::new(self.configurators.build_container()),
        };

        let mut context = InjectionContext::new(container)
            .with_options(self.options)
            .with_observers(self.observers);
        if let Some(plans) = self.plans {
            context = context.with_plan_cache(plans);
        }

        Ok(InjectionManager {
            injector: Injector::new(context),
            attached: AtomicBool::new(false),
            _slot: slot,
        })
    }
}

impl std::fmt::Debug for ManagerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagerBuilder")
            .field("configurators", &self.configurators)
            .field("has_container", &self.container.is_some())
            .field("options", &self.options)
            .field("observers", &self.observers)
            .finish()
    }
}

/// The top-level coordinator of the injection engine.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{
///     InjectionManager, Injectable, MemberScanner, SceneNode, SceneTree, ServiceCollection,
///     ServicesConfigurator,
/// };
/// use std::sync::Arc;
///
/// struct Greeting(&'static str);
///
/// struct GameServices;
/// impl ServicesConfigurator for GameServices {
///     fn configure_services(services: &mut ServiceCollection) {
///         services.add_singleton(Greeting("hi"));
///     }
/// }
///
/// #[derive(Default)]
/// struct Npc {
///     greeting: Option<Arc<Greeting>>,
/// }
///
/// impl Injectable for Npc {
///     fn declare_members(members: &mut MemberScanner<Self>) {
///         members.field("greeting").inject(|n: &mut Self, g: Arc<Greeting>| n.greeting = Some(g));
///     }
/// }
///
/// let tree = SceneTree::with_root(SceneNode::with_script::<Npc>("npc"));
/// let manager = InjectionManager::builder()
///     .configurator::<GameServices>()
///     .build()
///     .unwrap();
///
/// let report = manager.attach(&tree).unwrap();
/// assert_eq!(report.injected, 1);
///
/// let late = tree.attach(&tree.root(), SceneNode::with_script::<Npc>("late")).unwrap();
/// assert_eq!(late.script(|n: &Npc| n.greeting.as_ref().map(|g| g.0)), Some(Some("hi")));
/// ```
#[derive(Debug)]
pub struct InjectionManager {
    injector: Injector,
    attached: AtomicBool,
    _slot: ManagerSlot,
}

impl InjectionManager {
    pub fn builder() -> ManagerBuilder {
        ManagerBuilder::default()
    }

    /// Whether a manager is currently alive in this process.
    pub fn is_active() -> bool {
        MANAGER_ALIVE.load(Ordering::Acquire)
    }

    /// Wires `tree`: injects every node present now, then subscribes the
    /// mutation listener for nodes added later.
    ///
    /// Startup nodes are all injected before the listener is subscribed, so
    /// no node is injected twice. A manager attaches to one tree only;
    /// a second call fails with [`InjectError::AlreadyAttached`]. When the
    /// walk fails the listener is not subscribed.
    pub fn attach<T: HostTree>(&self, tree: &T) -> InjectResult<WalkReport>
    where
        T::Node: 'static,
    {
        if self.attached.swap(true, Ordering::AcqRel) {
            return Err(InjectError::AlreadyAttached);
        }

        let report = TreeWalker::new(self.injector.clone()).walk_and_inject_all(&tree.root())?;
        tree.subscribe_node_added(MutationListener::new(self.injector.clone()).into_handler());

        info!(
            visited = report.visited,
            injected = report.injected,
            failures = report.failures.len(),
            "injection manager attached"
        );
        Ok(report)
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    pub fn injector(&self) -> &Injector {
        &self.injector
    }

    /// The container every injection resolves from.
    pub fn container(&self) -> &Arc<dyn ServiceContainer> {
        self.injector.context().resolver().container()
    }
}
