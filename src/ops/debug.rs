//! Implementation of `autocpp debug`.
//!
//! The debugger is checked before anything is compiled, so a missing
//! debugger fails fast.

use std::path::Path;
use std::process::ExitStatus;

use anyhow::Result;

use super::build::{output_path, plan_build, BuildOptions};
use super::errors::WorkflowError;
use crate::core::{DebuggerKind, ToolchainResult};
use crate::util::process::ProcessBuilder;

/// Debugger invocation for `program`: `gdb <program>` or `lldb -- <program>`.
pub fn debugger_command(
    toolchain: &ToolchainResult,
    program: &Path,
) -> Result<ProcessBuilder, WorkflowError> {
    let debugger = toolchain
        .debugger
        .as_deref()
        .ok_or_else(|| WorkflowError::NoDebugger {
            program: program.to_path_buf(),
        })?;

    let cmd = ProcessBuilder::new(debugger);
    let cmd = match DebuggerKind::from_path(debugger) {
        DebuggerKind::Gdb => cmd.arg(program),
        DebuggerKind::Lldb => cmd.arg("--").arg(program),
    };

    Ok(match program.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => cmd.cwd(dir),
        None => cmd,
    })
}

/// Validate that `source` can be built and debugged.
///
/// Returns the debugger command to run once the build has succeeded.
pub fn prepare_debug(
    toolchain: &ToolchainResult,
    source: &Path,
    opts: &BuildOptions,
) -> Result<ProcessBuilder, WorkflowError> {
    plan_build(toolchain, source, opts)?;
    debugger_command(toolchain, &output_path(source))
}

/// Run the debugger interactively and wait for it to exit.
pub fn launch(command: &ProcessBuilder) -> Result<ExitStatus> {
    tracing::debug!("launching `{}`", command.display_command());
    command.status()
}
