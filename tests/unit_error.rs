/// Unit tests for InjectError and InjectResult

use ferrous_inject::{InjectError, InjectResult};
use std::error::Error;

#[test]
fn test_error_display_resolution() {
    let error = InjectError::Resolution("TestService");
    let display_str = format!("{}", error);
    assert_eq!(display_str, "Service not registered: TestService");
    assert!(display_str.contains("TestService"));
}

#[test]
fn test_error_display_type_mismatch() {
    let error = InjectError::TypeMismatch("std::string::String");
    assert_eq!(format!("{}", error), "Type mismatch for: std::string::String");
}

#[test]
fn test_error_display_circular() {
    let error = InjectError::Circular(vec!["ServiceA", "ServiceB", "ServiceA"]);
    assert_eq!(error.to_string(), "Circular dependency: ServiceA -> ServiceB -> ServiceA");
}

#[test]
fn test_error_display_duplicate_manager() {
    let display_str = InjectError::DuplicateManager.to_string();
    assert_eq!(display_str, "Only one InjectionManager may exist per process");
}

#[test]
fn test_error_display_already_attached() {
    assert_eq!(
        InjectError::AlreadyAttached.to_string(),
        "InjectionManager is already attached to a tree"
    );
}

#[test]
fn test_error_display_depth_exceeded() {
    let display_str = InjectError::DepthExceeded(100).to_string();
    assert_eq!(display_str, "Max nesting depth 100 exceeded");
    assert!(display_str.contains("100"));
}

#[test]
fn test_error_display_invalid_options() {
    let error = InjectError::InvalidOptions("max_depth must be at least 1".to_string());
    assert_eq!(error.to_string(), "Invalid engine options: max_depth must be at least 1");
}

#[test]
fn test_error_is_std_error_without_source() {
    let error = InjectError::Resolution("Svc");
    let dyn_error: &dyn Error = &error;
    assert!(dyn_error.source().is_none());
}

#[test]
fn test_error_equality_and_clone() {
    let error = InjectError::DepthExceeded(3);
    assert_eq!(error.clone(), InjectError::DepthExceeded(3));
    assert_ne!(error, InjectError::DepthExceeded(4));
}

#[test]
fn test_result_alias() {
    fn fails() -> InjectResult<u8> {
        Err(InjectError::AlreadyAttached)
    }
    fn succeeds() -> InjectResult<u8> {
        Ok(1)
    }

    assert_eq!(succeeds(), Ok(1));
    assert!(matches!(fails(), Err(InjectError::AlreadyAttached)));
}
