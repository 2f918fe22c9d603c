//! Object injector: applies a type's plan to one instance.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, trace};

use crate::error::{InjectError, InjectResult};
use crate::injection::member::{MemberAction, Nested};
use crate::injection::{DependencyResolver, InjectTarget, PlanCache, TypePlan};
use crate::internal::FastMap;
use crate::observer::{InjectionObserver, Observers};
use crate::options::EngineOptions;
use crate::traits::ServiceContainer;

/// Shared values entered during one top-level `inject` call, keyed by
/// allocation address. Holding the `Rc` keeps the address from being reused
/// before the call ends.
type Visited = FastMap<usize, Rc<RefCell<dyn InjectTarget>>>;

/// Everything the walker, the listener and the injector share.
///
/// Built once and passed around by `Arc`; there is no global accessor.
pub struct InjectionContext {
    resolver: DependencyResolver,
    plans: Arc<PlanCache>,
    observers: Observers,
    options: EngineOptions,
}

impl InjectionContext {
    /// Context over `container` using the process-wide plan cache and
    /// default options.
    pub fn new(container: Arc<dyn ServiceContainer>) -> Self {
        Self {
            resolver: DependencyResolver::new(container),
            plans: PlanCache::global(),
            observers: Observers::new(),
            options: EngineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_plan_cache(mut self, plans: Arc<PlanCache>) -> Self {
        self.plans = plans;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn InjectionObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    pub(crate) fn with_observers(mut self, observers: Observers) -> Self {
        self.observers = observers;
        self
    }

    pub fn resolver(&self) -> &DependencyResolver {
        &self.resolver
    }

    pub fn plans(&self) -> &Arc<PlanCache> {
        &self.plans
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }
}

impl std::fmt::Debug for InjectionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectionContext")
            .field("plans", &self.plans)
            .field("observers", &self.observers)
            .field("options", &self.options)
            .finish()
    }
}

/// Applies plans to instances.
///
/// Cheap to clone; clones share one [`InjectionContext`].
///
/// # Examples
///
/// ```
/// use ferrous_inject::{Injectable, Injector, MemberScanner, ServiceCollection};
/// use std::sync::Arc;
///
/// struct Score(u32);
///
/// #[derive(Default)]
/// struct Board {
///     score: Option<Arc<Score>>,
/// }
///
/// impl Injectable for Board {
///     fn declare_members(members: &mut MemberScanner<Self>) {
///         members.field("score").inject(|b: &mut Self, s: Arc<Score>| b.score = Some(s));
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Score(10));
/// let injector = Injector::from_container(Arc::new(services.build()));
///
/// let mut board = Board::default();
/// injector.inject(&mut board).unwrap();
/// assert_eq!(board.score.unwrap().0, 10);
/// ```
#[derive(Clone, Debug)]
pub struct Injector {
    context: Arc<InjectionContext>,
}

impl Injector {
    pub fn new(context: InjectionContext) -> Self {
        Self {
            context: Arc::new(context),
        }
    }

    pub fn from_container(container: Arc<dyn ServiceContainer>) -> Self {
        Self::new(InjectionContext::new(container))
    }

    pub fn context(&self) -> &InjectionContext {
        &self.context
    }

    pub fn options(&self) -> &EngineOptions {
        &self.context.options
    }

    /// Cached plan for the runtime type of `target`.
    pub fn plan_for(&self, target: &dyn InjectTarget) -> Arc<TypePlan> {
        let (plan, built) = self
            .context
            .plans
            .get_or_scan(target.target_key(), || target.scan_plan());
        if built {
            debug!(target_type = plan.target().display_name(), descriptors = plan.len(), "plan built");
            self.context.observers.plan_built(&plan);
        }
        plan
    }

    /// Applies the plan of `target`'s runtime type, in descriptor order.
    ///
    /// The first failing descriptor aborts the rest and its error is
    /// returned. Recursive members are injected through their own runtime
    /// type; a shared value reached twice within one call is injected once.
    pub fn inject(&self, target: &mut dyn InjectTarget) -> InjectResult<()> {
        let mut visited = Visited::default();
        self.inject_at(target, 0, &mut visited)
    }

    fn inject_at(
        &self,
        target: &mut dyn InjectTarget,
        depth: usize,
        visited: &mut Visited,
    ) -> InjectResult<()> {
        let max_depth = self.context.options.max_depth;
        if depth > max_depth {
            return Err(InjectError::DepthExceeded(max_depth));
        }

        let plan = self.plan_for(target);
        if plan.is_empty() {
            return Ok(());
        }

        let type_name = plan.target().display_name();
        let started = self.context.observers.has_observers().then(|| {
            self.context.observers.injecting(type_name);
            Instant::now()
        });

        let result = self.apply(&plan, target, depth, visited);
        match &result {
            Ok(()) => {
                if let Some(started) = started {
                    self.context.observers.injected(type_name, started.elapsed());
                }
                debug!(target_type = type_name, depth, "injected");
            }
            Err(error) => {
                self.context.observers.injection_failed(type_name, error);
                debug!(target_type = type_name, depth, %error, "injection aborted");
            }
        }
        result
    }

    fn apply(
        &self,
        plan: &TypePlan,
        target: &mut dyn InjectTarget,
        depth: usize,
        visited: &mut Visited,
    ) -> InjectResult<()> {
        let resolver = &self.context.resolver;
        for descriptor in plan {
            match descriptor.action() {
                MemberAction::Assign { key, assign } => {
                    let value = resolver.resolve(key)?;
                    assign(target.as_any_mut(), value)?;
                }
                MemberAction::Descend { descend, .. } => {
                    let mut visit = |nested: Nested<'_>| self.inject_nested(nested, depth + 1, visited);
                    descend(target.as_any_mut(), &mut visit)?;
                }
                MemberAction::Invoke { params, invoke } => {
                    let args = resolver.resolve_all(params)?;
                    invoke(target.as_any_mut(), args)?;
                }
            }
        }
        Ok(())
    }

    fn inject_nested(&self, nested: Nested<'_>, depth: usize, visited: &mut Visited) -> InjectResult<()> {
        match nested {
            Nested::Owned(target) => self.inject_at(target, depth, visited),
            Nested::Shared(cell) => {
                let address = Rc::as_ptr(&cell) as *const () as usize;
                if visited.contains_key(&address) {
                    trace!(depth, "shared member already injected in this pass; skipping");
                    return Ok(());
                }
                visited.insert(address, cell.clone());
                if let Ok(mut target) = cell.try_borrow_mut() {
                    return self.inject_at(&mut *target, depth, visited);
                }
                // Borrowed further up the stack: this value is being injected already
                trace!(depth, "shared member in use; skipping");
                Ok(())
            }
        }
    }
}
