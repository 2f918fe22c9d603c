//! Engine options.
//!
//! A small, explicit set of knobs for the injection engine. With the `config`
//! feature the options can be loaded from JSON.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{InjectError, InjectResult};

/// Default limit for nested member descent.
///
/// Cycles through shared values are cut by the injector itself; this limit
/// bounds the call stack used by long acyclic chains of owned values. Raise
/// it for deeper object graphs when the injecting thread has the stack for
/// them.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// What the startup walk does when injecting one node fails.
///
/// The engine never recovers from a failed injection on its own; this is the
/// host's choice between stopping the walk and skipping the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum FailurePolicy {
    /// Stop the walk and return the first error.
    #[default]
    Abort,
    /// Log the error, record it in the walk report, and keep walking.
    LogAndContinue,
}

/// Options shared by the injector, the tree walker and the mutation listener.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{EngineOptions, FailurePolicy};
///
/// let options = EngineOptions::new()
///     .with_failure_policy(FailurePolicy::LogAndContinue)
///     .with_max_depth(32);
///
/// assert_eq!(options.failure_policy, FailurePolicy::LogAndContinue);
/// assert!(options.validate().is_ok());
/// assert!(EngineOptions::new().with_max_depth(0).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct EngineOptions {
    /// Startup walk behaviour on a failed node
    pub failure_policy: FailurePolicy,
    /// Deepest allowed chain of recursive-members descents. A stack bound,
    /// not a cycle guard: an acyclic graph deeper than this fails with
    /// [`InjectError::DepthExceeded`].
    pub max_depth: usize,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Checks the options for values the engine cannot run with.
    pub fn validate(&self) -> InjectResult<()> {
        if self.max_depth == 0 {
            return Err(InjectError::InvalidOptions(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses and validates options from a JSON document.
    ///
    /// Missing fields take their default values.
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> InjectResult<Self> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| InjectError::InvalidOptions(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Abort,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_abort_with_generous_depth() {
        let options = EngineOptions::default();
        assert_eq!(options.failure_policy, FailurePolicy::Abort);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn zero_depth_is_rejected() {
        let err = EngineOptions::new().with_max_depth(0).validate().unwrap_err();
        assert!(matches!(err, InjectError::InvalidOptions(_)));
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let options = EngineOptions::from_json_str(r#"{ "failure_policy": "log_and_continue" }"#).unwrap();
        assert_eq!(options.failure_policy, FailurePolicy::LogAndContinue);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_errors_are_invalid_options() {
        assert!(matches!(
            EngineOptions::from_json_str(r#"{ "max_depth": 0 }"#),
            Err(InjectError::InvalidOptions(_))
        ));
        assert!(matches!(
            EngineOptions::from_json_str("not json"),
            Err(InjectError::InvalidOptions(_))
        ));
    }
}
