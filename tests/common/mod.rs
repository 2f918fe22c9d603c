//! Shared fixtures for integration tests.
#![allow(dead_code)]

use ferrous_inject::{AnyArc, InjectResult, Key, ServiceContainer, ServiceProvider};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Container wrapper that records every resolve call.
pub struct CountingContainer {
    inner: ServiceProvider,
    calls: AtomicUsize,
    requested: Mutex<Vec<&'static str>>,
}

impl CountingContainer {
    pub fn new(inner: ServiceProvider) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<&'static str> {
        self.requested.lock().unwrap().clone()
    }
}

impl ServiceContainer for CountingContainer {
    fn resolve_any(&self, key: &Key) -> InjectResult<AnyArc> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(key.display_name());
        self.inner.resolve_any(key)
    }

    fn contains(&self, key: &Key) -> bool {
        self.inner.contains(key)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Config {
    pub name: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Clock {
    pub tick: u64,
}

/// Never registered in any fixture container.
#[derive(Debug)]
pub struct Unregistered;
