//! Bundled toolchain shipped alongside the application.
//!
//! The bundle is a MinGW-style tree:
//!
//! ```text
//! <base>/bin/gcc[.exe]
//! <base>/bin/g++[.exe]
//! <base>/bin/gdb[.exe]
//! ```
//!
//! Only the C compiler is required; the other binaries are picked up when
//! present. No process is spawned.

use std::env::consts::EXE_SUFFIX;
use std::path::{Path, PathBuf};

use crate::core::{Compilers, ToolchainIdentity, ToolchainResult};

/// Name of the bundle directory next to the running executable.
pub const DEFAULT_BUNDLE_DIR: &str = "toolchain";

/// Resolves the embedded toolchain from a fixed base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedResolver {
    base: Option<PathBuf>,
}

impl EmbeddedResolver {
    /// Resolver rooted at `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        EmbeddedResolver {
            base: Some(base.into()),
        }
    }

    /// Resolver that never finds anything.
    pub fn disabled() -> Self {
        EmbeddedResolver { base: None }
    }

    /// Resolver rooted at `toolchain/` beside the current executable.
    pub fn beside_current_exe() -> Self {
        match std::env::current_exe() {
            Ok(exe) => match exe.parent() {
                Some(dir) => EmbeddedResolver::new(dir.join(DEFAULT_BUNDLE_DIR)),
                None => EmbeddedResolver::disabled(),
            },
            Err(e) => {
                tracing::debug!("cannot locate current executable: {}", e);
                EmbeddedResolver::disabled()
            }
        }
    }

    pub fn base(&self) -> Option<&Path> {
        self.base.as_deref()
    }

    /// Path the bundled C compiler is expected at.
    pub fn c_compiler_path(&self) -> Option<PathBuf> {
        self.base.as_ref().map(|b| bundled(b, "gcc"))
    }

    /// Resolve the bundled toolchain, if its C compiler exists.
    pub fn resolve(&self) -> Option<ToolchainResult> {
        let base = self.base.as_ref()?;
        let c = bundled(base, "gcc");
        if !c.exists() {
            tracing::debug!("no embedded compiler at {}", c.display());
            return None;
        }

        let cpp = Some(bundled(base, "g++")).filter(|p| p.exists());
        let debugger = Some(bundled(base, "gdb")).filter(|p| p.exists());

        tracing::debug!("embedded toolchain at {}", base.display());
        Some(ToolchainResult {
            identity: ToolchainIdentity::Embedded,
            compilers: Compilers { c: Some(c), cpp },
            debugger,
        })
    }
}

fn bundled(base: &Path, tool: &str) -> PathBuf {
    base.join("bin").join(format!("{}{}", tool, EXE_SUFFIX))
}
