//! Host logger service.
//!
//! Registers a [`Logger`] that forwards to `tracing`, so injected nodes can
//! log without knowing which subscriber the host installed.

use std::sync::Arc;

use crate::collection::{ServiceCollection, ServicesConfigurator};

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Logging service resolved by nodes.
///
/// ```
/// use ferrous_inject::{LogLevel, Logger, LoggingServicesExt, ServiceCollection, ServiceContainerExt};
///
/// let mut services = ServiceCollection::new();
/// services.add_tracing_logger();
///
/// let logger = services.build().get_required::<dyn Logger>();
/// logger.info("level loaded");
/// logger.log(LogLevel::Warn, "low on memory");
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);

    fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message);
    }

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// [`Logger`] backed by `tracing` events.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    category: &'static str,
}

impl TracingLogger {
    pub fn new() -> Self {
        Self { category: "scene" }
    }

    /// Tags every line with `category`.
    pub fn with_category(category: &'static str) -> Self {
        Self { category }
    }

    pub fn category(&self) -> &'static str {
        self.category
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        let category = self.category;
        match level {
            LogLevel::Trace => tracing::trace!(category, "{message}"),
            LogLevel::Debug => tracing::debug!(category, "{message}"),
            LogLevel::Info => tracing::info!(category, "{message}"),
            LogLevel::Warn => tracing::warn!(category, "{message}"),
            LogLevel::Error => tracing::error!(category, "{message}"),
        }
    }
}

/// Registration helpers for the logger service.
pub trait LoggingServicesExt {
    /// Binds `dyn Logger` to a [`TracingLogger`] unless a logger is already
    /// bound.
    fn add_tracing_logger(&mut self) -> &mut Self;

    /// Binds `dyn Logger` to `logger`, replacing any earlier binding.
    fn add_logger(&mut self, logger: Arc<dyn Logger>) -> &mut Self;
}

impl LoggingServicesExt for ServiceCollection {
    fn add_tracing_logger(&mut self) -> &mut Self {
        self.try_add_singleton_trait::<dyn Logger>(Arc::new(TracingLogger::new()))
    }

    fn add_logger(&mut self, logger: Arc<dyn Logger>) -> &mut Self {
        self.add_singleton_trait::<dyn Logger>(logger)
    }
}

/// Configurator registering the tracing logger.
#[derive(Debug)]
pub struct LoggingConfigurator;

impl ServicesConfigurator for LoggingConfigurator {
    fn configure_services(services: &mut ServiceCollection) {
        services.add_tracing_logger();
    }
}
