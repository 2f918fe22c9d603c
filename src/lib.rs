//! # ferrous-inject
//!
//! Marker-driven dependency injection for objects living in a mutating
//! scene tree.
//!
//! ## Features
//!
//! - **Declarative markers**: a type lists its injectable fields, properties
//!   and methods once, in [`Injectable::declare_members`]
//! - **Cached plans**: each type is scanned once per process; the plan is
//!   shared by every instance
//! - **Recursive descent**: nested objects are injected through their own
//!   runtime type
//! - **Tree wiring**: a startup walk injects every existing node, then a
//!   listener injects each node as it is added
//! - **Pluggable container**: anything implementing [`ServiceContainer`];
//!   a small [`ServiceCollection`] is bundled
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_inject::{
//!     InjectionManager, Injectable, Logger, LoggingConfigurator, MemberScanner, SceneNode,
//!     SceneTree, ServiceCollection, ServicesConfigurator,
//! };
//! use std::sync::Arc;
//!
//! struct Inventory {
//!     slots: usize,
//! }
//!
//! struct GameServices;
//!
//! impl ServicesConfigurator for GameServices {
//!     fn configure_services(services: &mut ServiceCollection) {
//!         services.add_singleton(Inventory { slots: 12 });
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Player {
//!     inventory: Option<Arc<Inventory>>,
//!     logger: Option<Arc<dyn Logger>>,
//! }
//!
//! impl Injectable for Player {
//!     fn declare_members(members: &mut MemberScanner<Self>) {
//!         members
//!             .field("inventory")
//!             .private()
//!             .inject(|p: &mut Self, inventory: Arc<Inventory>| p.inventory = Some(inventory))
//!             .method("ready")
//!             .inject(|p: &mut Self, (logger,): (Arc<dyn Logger>,)| {
//!                 logger.info("player ready");
//!                 p.logger = Some(logger);
//!             });
//!     }
//! }
//!
//! let tree = SceneTree::new();
//! let manager = InjectionManager::builder()
//!     .configurator::<LoggingConfigurator>()
//!     .configurator::<GameServices>()
//!     .build()
//!     .unwrap();
//! manager.attach(&tree).unwrap();
//!
//! // Nodes added later are injected as they enter the tree
//! let player = tree.attach(&tree.root(), SceneNode::with_script::<Player>("player")).unwrap();
//! let slots = player.script(|p: &Player| p.inventory.as_ref().map(|i| i.slots));
//! assert_eq!(slots, Some(Some(12)));
//! ```
//!
//! ## Member Kinds
//!
//! - **Direct value** (`field(..).inject(..)`): the member receives the value
//!   resolved for its declared type
//! - **Recursive members** (`field(..).inject_members(..)`): the member's
//!   current value is injected in turn; an absent value is left alone
//! - **Method parameters** (`method(..).inject(..)`): every parameter is
//!   resolved, then the method runs; it runs again on every injection
//!
//! ## Errors
//!
//! A missing registration aborts the injection of the current instance with
//! [`InjectError::Resolution`]; members after the failing one are not
//! touched. What the startup walk does next is the host's choice, see
//! [`FailurePolicy`].

// Module declarations
pub mod collection;
pub mod descriptors;
pub mod error;
pub mod injection;
pub mod key;
pub mod lifetime;
pub mod manager;
pub mod observer;
pub mod options;
pub mod provider;
pub mod services;
pub mod traits;
pub mod tree;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use collection::{ConfiguratorEntry, ConfiguratorRegistry, ServiceCollection, ServicesConfigurator};
pub use descriptors::ServiceDescriptor;
pub use error::{InjectError, InjectResult};
pub use injection::{
    scan_type, DependencyResolver, InjectTarget, Injectable, InjectionContext, Injector, MemberCategory,
    MemberDescriptor, MemberIdentity, MemberKind, MemberScanner, MethodMember, NestedTarget, PlanCache,
    TypePlan, ValueMember, Visibility,
};
pub use key::{key_of_type, Key};
pub use lifetime::Lifetime;
pub use manager::{InjectionManager, ManagerBuilder};
pub use observer::{InjectionObserver, TracingObserver};
pub use options::{EngineOptions, FailurePolicy, DEFAULT_MAX_DEPTH};
pub use provider::ServiceProvider;
pub use services::{LogLevel, Logger, LoggingConfigurator, LoggingServicesExt, TracingLogger};
pub use traits::{AnyArc, Dependency, MethodArgs, ServiceContainer, ServiceContainerExt};
pub use tree::{
    HostTree, MutationListener, NodeAddedHandler, NodeHandle, SceneNode, SceneTree, TreeWalker, WalkFailure,
    WalkReport,
};
