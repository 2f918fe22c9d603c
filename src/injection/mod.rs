//! The injection engine: member scanning, plans, resolution and injection.

pub mod injector;
pub mod member;
pub mod plan;
pub mod resolver;
pub mod scanner;

pub use injector::{InjectionContext, Injector};
pub use member::{MemberCategory, MemberDescriptor, MemberIdentity, MemberKind, Visibility};
pub use plan::{PlanCache, TypePlan};
pub use resolver::DependencyResolver;
pub use scanner::{scan_type, InjectTarget, Injectable, MemberScanner, MethodMember, NestedTarget, ValueMember};
