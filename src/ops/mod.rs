//! High-level operations.
//!
//! This module contains the implementation of autocpp commands that act on
//! a discovered toolchain.

pub mod build;
pub mod debug;
pub mod errors;
pub mod setup;

pub use build::{build_file, output_path, plan_build, BuildOptions, BuildOutput, BuildPlan};
pub use debug::{debugger_command, launch, prepare_debug};
pub use errors::WorkflowError;
pub use setup::{setup_workspace, FileAction, SetupFile, SetupOptions, SetupReport};
