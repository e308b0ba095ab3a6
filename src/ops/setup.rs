//! Implementation of `autocpp setup`.
//!
//! Materializes the editor configuration for a discovered toolchain into a
//! workspace directory. Existing files are kept unless a reset is requested.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::Value;

use super::errors::WorkflowError;
use crate::core::ToolchainResult;
use crate::editor::{self, EditorOptions, LAUNCH_FILE, TASKS_FILE};
use crate::util::config::DEFAULT_EDITOR_DIR;
use crate::util::fs::{remove_file_if_exists, write_string};

/// Options for writing editor configuration.
#[derive(Debug, Clone)]
pub struct SetupOptions {
    /// Delete and regenerate existing files
    pub reset: bool,

    /// Directory, relative to the workspace, receiving the files
    pub config_dir: String,

    pub editor: EditorOptions,
}

impl Default for SetupOptions {
    fn default() -> Self {
        SetupOptions {
            reset: false,
            config_dir: DEFAULT_EDITOR_DIR.to_string(),
            editor: EditorOptions::default(),
        }
    }
}

/// What happened to one configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Created,
    Replaced,
    Kept,
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileAction::Created => "created",
            FileAction::Replaced => "replaced",
            FileAction::Kept => "kept",
        })
    }
}

#[derive(Debug, Clone)]
pub struct SetupFile {
    pub path: PathBuf,
    pub action: FileAction,
}

/// Result of a setup run.
#[derive(Debug, Clone)]
pub struct SetupReport {
    /// Directory the files live in
    pub dir: PathBuf,
    pub files: Vec<SetupFile>,
}

/// Write `tasks.json` and `launch.json` for `toolchain` under `workspace`.
pub fn setup_workspace(
    workspace: &Path,
    toolchain: &ToolchainResult,
    opts: &SetupOptions,
) -> Result<SetupReport> {
    if !toolchain.is_usable() {
        return Err(WorkflowError::NoToolchain.into());
    }

    let dir = workspace.join(&opts.config_dir);
    let documents = [
        (TASKS_FILE, editor::tasks_json(toolchain, &opts.editor)),
        (LAUNCH_FILE, editor::launch_json(toolchain, &opts.editor)),
    ];

    let mut files = Vec::with_capacity(documents.len());
    for (name, document) in documents {
        let path = dir.join(name);
        let action = materialize(&path, &document, opts.reset)?;
        tracing::debug!("{} {}", action, path.display());
        files.push(SetupFile { path, action });
    }

    Ok(SetupReport { dir, files })
}

fn materialize(path: &Path, document: &Value, reset: bool) -> Result<FileAction> {
    let action = if path.exists() {
        if !reset {
            return Ok(FileAction::Kept);
        }
        remove_file_if_exists(path)?;
        FileAction::Replaced
    } else {
        FileAction::Created
    };

    write_string(path, &editor::render(document)?)?;
    Ok(action)
}
