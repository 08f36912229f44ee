#![allow(dead_code)]
//! Test harness utilities for cutline-core integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::Value;

use cutline_core::config::Config;
use cutline_core::hooks::RefreshHooks;
use cutline_core::store::ProjectStore;
use cutline_core::transport::Transport;
use cutline_types::ClipDraft;

/// Hooks that count every call and remember the last resize duration.
#[derive(Default)]
pub struct RecordingHooks {
    pub sorts: AtomicUsize,
    pub resizes: AtomicUsize,
    pub rebuilds: AtomicUsize,
    pub last_resize: Mutex<Option<f64>>,
}

impl RecordingHooks {
    pub fn sorts(&self) -> usize {
        self.sorts.load(Ordering::SeqCst)
    }

    pub fn resizes(&self) -> usize {
        self.resizes.load(Ordering::SeqCst)
    }

    pub fn rebuilds(&self) -> usize {
        self.rebuilds.load(Ordering::SeqCst)
    }

    pub fn last_resize(&self) -> Option<f64> {
        *self.last_resize.lock().unwrap()
    }
}

impl RefreshHooks for RecordingHooks {
    fn sort_items(&self) {
        self.sorts.fetch_add(1, Ordering::SeqCst);
    }

    fn resize_timeline(&self, duration: f64) {
        self.resizes.fetch_add(1, Ordering::SeqCst);
        *self.last_resize.lock().unwrap() = Some(duration);
    }

    fn rebuild_index(&self) {
        self.rebuilds.fetch_add(1, Ordering::SeqCst);
    }
}

/// Transport that records every call into a shared log.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    pub calls: Arc<Mutex<Vec<(String, Vec<Value>)>>>,
}

impl RecordingTransport {
    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn invoke(&self, method: &str, args: Vec<Value>) -> Option<Value> {
        self.calls.lock().unwrap().push((method.to_string(), args));
        None
    }
}

/// Config with a short readiness budget and index settle.
pub fn fast_config() -> Config {
    Config::from_toml_str(
        "[scheduler]\nready_poll_interval_ms = 2\nready_attempts = 5\n[refresh]\nrebuild_settle_ms = 20\n",
    )
    .unwrap()
}

/// Ready store with recording hooks.
pub fn recording_store() -> (ProjectStore, Arc<RecordingHooks>) {
    let hooks = Arc::new(RecordingHooks::default());
    let store = ProjectStore::ready(&fast_config(), hooks.clone());
    (store, hooks)
}

pub fn clip(id: &str, layer: i64, position: f64, duration: f64) -> ClipDraft {
    ClipDraft {
        id: Some(id.to_string()),
        layer: Some(layer as f64),
        position: Some(position),
        start: Some(0.0),
        duration: Some(duration),
        ..Default::default()
    }
}

/// Poll `cond` until it holds, or panic after `timeout`.
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) {
    let start = Instant::now();
    while Instant::now().duration_since(start) < timeout {
        if cond() {
            return;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    panic!("Timed out after {:?}", timeout);
}
