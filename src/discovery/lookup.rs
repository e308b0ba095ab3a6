//! Executable lookup on the host search path.
//!
//! Lookups never fail: a missing lookup tool, a non-zero exit, unreadable
//! output, or a path that does not exist all collapse to `None`.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;

/// Resolves an executable name to an absolute path.
#[async_trait]
pub trait ExecutableLookup: Send + Sync {
    /// Find `name` on the search path.
    async fn find(&self, name: &str) -> Option<PathBuf>;
}

/// How executables are located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupMethod {
    /// Spawn the platform lookup tool (`which` / `where`).
    #[default]
    Command,
    /// Walk `PATH` in-process.
    Path,
}

impl std::str::FromStr for LookupMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "command" => Ok(LookupMethod::Command),
            "path" => Ok(LookupMethod::Path),
            _ => Err(format!(
                "invalid lookup method '{}'; expected 'command' or 'path'",
                s
            )),
        }
    }
}

impl LookupMethod {
    /// Create the lookup implementation for this method.
    pub fn into_lookup(self) -> Box<dyn ExecutableLookup> {
        match self {
            LookupMethod::Command => Box::new(CommandLookup::new()),
            LookupMethod::Path => Box::new(PathLookup),
        }
    }
}

/// Lookup through the platform's `which`/`where` command.
#[derive(Debug, Clone)]
pub struct CommandLookup {
    tool: &'static str,
}

impl CommandLookup {
    pub fn new() -> Self {
        let tool = if cfg!(windows) { "where" } else { "which" };
        CommandLookup { tool }
    }
}

impl Default for CommandLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutableLookup for CommandLookup {
    async fn find(&self, name: &str) -> Option<PathBuf> {
        let output = Command::new(self.tool)
            .arg(name)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await;

        let output = match output {
            Ok(out) if out.status.success() => out,
            Ok(out) => {
                tracing::debug!("`{} {}` exited with {:?}", self.tool, name, out.status.code());
                return None;
            }
            Err(e) => {
                tracing::debug!("failed to run `{} {}`: {}", self.tool, name, e);
                return None;
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let found = first_existing_line(&stdout);
        tracing::debug!("lookup {} -> {:?}", name, found);
        found
    }
}

/// Lookup by walking `PATH` in-process with the `which` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathLookup;

#[async_trait]
impl ExecutableLookup for PathLookup {
    async fn find(&self, name: &str) -> Option<PathBuf> {
        let owned = name.to_string();
        let found = tokio::task::spawn_blocking(move || which::which(owned).ok())
            .await
            .ok()
            .flatten()
            .filter(|p| p.exists());
        tracing::debug!("lookup {} -> {:?}", name, found);
        found
    }
}

/// Take the first line of lookup output and keep it only if it exists.
///
/// `where` prints every match, one per line, with CRLF endings.
fn first_existing_line(stdout: &str) -> Option<PathBuf> {
    let first = stdout.lines().next()?.trim();
    if first.is_empty() {
        return None;
    }
    let path = Path::new(first);
    path.exists().then(|| path.to_path_buf())
}
