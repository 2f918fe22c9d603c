//! Error types for the injection engine.

use thiserror::Error;

/// Injection errors
///
/// Every failure is surfaced to whoever started the injection (the startup
/// walk, the mutation listener, or a direct `Injector::inject` call). Nothing
/// is retried inside the engine: a missing registration is a configuration
/// defect, not a transient condition.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{InjectError, ServiceCollection, ServiceContainerExt};
///
/// let provider = ServiceCollection::new().build();
/// match provider.get::<String>() {
///     Err(InjectError::Resolution(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectError {
    /// The container has no registration for the requested type
    #[error("Service not registered: {0}")]
    Resolution(&'static str),
    /// A stored value or target did not have the expected type
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// A factory resolved, directly or indirectly, the type it is building
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),
    /// A second injection manager was constructed while one is alive
    #[error("Only one InjectionManager may exist per process")]
    DuplicateManager,
    /// The manager was asked to attach to a second tree
    #[error("InjectionManager is already attached to a tree")]
    AlreadyAttached,
    /// Nested member descent went deeper than the configured limit
    #[error("Max nesting depth {0} exceeded")]
    DepthExceeded(usize),
    /// Engine options failed validation or could not be parsed
    #[error("Invalid engine options: {0}")]
    InvalidOptions(String),
}

/// Result type for injection operations
pub type InjectResult<T> = Result<T, InjectError>;
