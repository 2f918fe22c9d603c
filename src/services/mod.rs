//! Services the crate can register for injected nodes.

pub mod logger;

pub use logger::{LogLevel, Logger, LoggingConfigurator, LoggingServicesExt, TracingLogger};
