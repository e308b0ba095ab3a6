//! autocpp - C/C++ toolchain discovery and editor setup
//!
//! This crate provides the core library functionality for autocpp:
//! concurrent toolchain discovery, editor configuration generation, and
//! single-file build and debug workflows.

pub mod core;
pub mod discovery;
pub mod editor;
pub mod ops;
pub mod util;

/// Test utilities for autocpp unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides a scripted executable lookup and filesystem fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{Family, SourceLanguage, ToolchainIdentity, ToolchainResult};
pub use discovery::DiscoveryCoordinator;
pub use util::config::Config;
