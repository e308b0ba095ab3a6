//! Command implementations

pub mod build;
pub mod completions;
pub mod debug;
pub mod detect;
pub mod setup;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::DiscoveryArgs;
use autocpp::core::ToolchainResult;
use autocpp::discovery::DiscoveryCoordinator;
use autocpp::editor::EditorOptions;
use autocpp::ops::BuildOptions;
use autocpp::util::config::{load_config_for, Config};
use autocpp::util::shell::Status;
use autocpp::util::Shell;

/// State shared by the commands that discover a toolchain.
pub struct CommandContext {
    pub shell: Arc<Shell>,
    pub config: Config,
    pub cwd: PathBuf,
}

impl CommandContext {
    /// Load configuration for the current directory and apply CLI overrides.
    pub fn new(shell: Arc<Shell>, discovery: DiscoveryArgs) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to determine current directory")?;

        let mut config = load_config_for(&cwd);
        discovery.apply(&mut config.discovery);
        tracing::debug!("discovery settings: {:?}", config.discovery);

        Ok(CommandContext { shell, config, cwd })
    }

    /// Run toolchain discovery to completion on a single-threaded runtime.
    ///
    /// With `fast`, returns as soon as any usable toolchain is known.
    pub fn discover(&self, fast: bool) -> Result<Arc<ToolchainResult>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;

        let coordinator = DiscoveryCoordinator::from_config(&self.config.discovery);
        let _span = self.shell.span(Status::Probing, "C/C++ toolchains");

        let toolchain = runtime.block_on(async {
            if fast {
                coordinator.request_toolchain().await
            } else {
                coordinator.final_toolchain().await
            }
        });

        Ok(toolchain)
    }

    pub fn editor_options(&self) -> EditorOptions {
        EditorOptions {
            cflags: self.config.editor.cflags.clone(),
            ..EditorOptions::default()
        }
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            cflags: self.config.editor.cflags.clone(),
        }
    }

    /// Resolve a user-supplied path against the working directory.
    pub fn resolve(&self, path: PathBuf) -> PathBuf {
        if path.is_absolute() {
            path
        } else {
            self.cwd.join(path)
        }
    }
}
