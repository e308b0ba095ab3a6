//! Core data structures for autocpp.
//!
//! - Toolchain families, probe results and the resolved toolchain
//! - Source language detection

pub mod language;
pub mod toolchain;

pub use language::SourceLanguage;
pub use toolchain::{
    CompileStyle, Compilers, DebuggerKind, Family, PerFamily, ProbeResult, ToolchainIdentity,
    ToolchainResult,
};
