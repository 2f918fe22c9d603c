//! Core traits shared by the container and the injection engine.

mod container;
mod dependency;

pub use container::{AnyArc, ServiceContainer, ServiceContainerExt};
pub use dependency::{Dependency, MethodArgs};
