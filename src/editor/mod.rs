//! Editor configuration generated from a discovered toolchain.

pub mod vscode;

pub use vscode::{launch_json, render, tasks_json, EditorOptions, LAUNCH_FILE, TASKS_FILE};
