//! Test utilities for autocpp unit tests.
//!
//! [`ScriptedLookup`] stands in for the host search path: each executable
//! name can be given a path, a delay, a gate the test opens by hand, or a
//! panic. Every lookup is counted so tests can assert how many lookup
//! "subprocesses" a discovery run spawned.
//!
//! # Example
//!
//! ```rust,ignore
//! let lookup = ScriptedLookup::new()
//!     .found_after("gcc", "/usr/bin/gcc", Duration::from_millis(50))
//!     .found("clang", "/usr/bin/clang");
//! let gate = lookup.gate("cl");
//! // ... start discovery, assert, then:
//! gate.open();
//! ```

use std::collections::HashMap;
use std::env::consts::EXE_SUFFIX;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::discovery::ExecutableLookup;

#[derive(Debug, Clone, Default)]
struct Script {
    path: Option<PathBuf>,
    delay: Duration,
    gate: Option<Arc<Semaphore>>,
    panic: bool,
}

#[derive(Debug, Default)]
struct Scripts {
    entries: HashMap<String, Script>,
    calls: HashMap<String, usize>,
}

/// Scripted executable lookup.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLookup {
    inner: Arc<Mutex<Scripts>>,
}

impl ScriptedLookup {
    /// A lookup where nothing is found.
    pub fn new() -> Self {
        ScriptedLookup::default()
    }

    /// `name` resolves to `path` immediately.
    pub fn found(self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.found_after(name, path, Duration::ZERO)
    }

    /// `name` resolves to `path` after `delay`.
    pub fn found_after(self, name: &str, path: impl Into<PathBuf>, delay: Duration) -> Self {
        self.update(name, |s| {
            s.path = Some(path.into());
            s.delay = delay;
        });
        self
    }

    /// `name` is not found, but only after `delay`.
    pub fn missing_after(self, name: &str, delay: Duration) -> Self {
        self.update(name, |s| {
            s.path = None;
            s.delay = delay;
        });
        self
    }

    /// Looking up `name` panics.
    pub fn panics(self, name: &str) -> Self {
        self.update(name, |s| s.panic = true);
        self
    }

    /// Change what `name` resolves to for later lookups.
    pub fn set(&self, name: &str, path: Option<PathBuf>) {
        self.update(name, |s| s.path = path);
    }

    /// Hold lookups of `name` until the returned gate is opened.
    pub fn gate(&self, name: &str) -> Gate {
        let semaphore = Arc::new(Semaphore::new(0));
        let gate = Gate(Arc::clone(&semaphore));
        self.update(name, |s| s.gate = Some(semaphore));
        gate
    }

    /// Number of lookups of `name` so far.
    pub fn calls(&self, name: &str) -> usize {
        self.lock().calls.get(name).copied().unwrap_or(0)
    }

    /// Number of lookups of any name so far.
    pub fn total_calls(&self) -> usize {
        self.lock().calls.values().sum()
    }

    fn update(&self, name: &str, f: impl FnOnce(&mut Script)) {
        f(self.lock().entries.entry(name.to_string()).or_default());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Scripts> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ExecutableLookup for ScriptedLookup {
    async fn find(&self, name: &str) -> Option<PathBuf> {
        let script = {
            let mut scripts = self.lock();
            *scripts.calls.entry(name.to_string()).or_default() += 1;
            scripts.entries.get(name).cloned().unwrap_or_default()
        };

        if script.panic {
            panic!("scripted lookup panic for {name}");
        }
        if let Some(gate) = script.gate {
            // Opened gates stay open.
            let _ = gate.acquire().await;
        }
        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }
        script.path
    }
}

/// Releases lookups held by [`ScriptedLookup::gate`].
#[derive(Debug, Clone)]
pub struct Gate(Arc<Semaphore>);

impl Gate {
    pub fn open(&self) {
        self.0.close();
    }
}

/// Create a fake bundled toolchain under `base/bin`.
pub fn write_embedded_toolchain(base: &Path, tools: &[&str]) {
    let bin = base.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    for tool in tools {
        std::fs::write(bin.join(format!("{}{}", tool, EXE_SUFFIX)), b"").unwrap();
    }
}
