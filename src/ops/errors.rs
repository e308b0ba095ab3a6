//! Workflow error types and diagnostics.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::SourceLanguage;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error from a user-facing workflow (setup, build, debug).
///
/// Discovery itself never fails; these arise when a workflow needs a tool
/// the discovered toolchain does not have.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("no C/C++ compiler found")]
    NoToolchain,

    #[error("no {language} compiler found for `{}`", .file.display())]
    NoCompiler {
        language: SourceLanguage,
        file: PathBuf,
    },

    #[error("unsupported file type: `{}`", .file.display())]
    UnsupportedFileType { file: PathBuf },

    #[error("source file not found: `{}`", .file.display())]
    SourceNotFound { file: PathBuf },

    #[error("no debugger found")]
    NoDebugger { program: PathBuf },

    #[error("failed to compile `{}`", .file.display())]
    BuildFailed {
        file: PathBuf,
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl WorkflowError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());

        match self {
            WorkflowError::NoToolchain => diag
                .with_context("searched: gcc, g++, clang, clang++, cl and the bundled toolchain")
                .with_suggestion(suggestions::INSTALL_COMPILER)
                .with_suggestion(suggestions::MINGW_DOWNLOAD)
                .with_suggestion(suggestions::EMBEDDED_DIR)
                .with_suggestion(suggestions::VERBOSE_DETECT),

            WorkflowError::NoCompiler { language, file } => {
                let diag = diag.with_location(file);
                let diag = match language {
                    SourceLanguage::Cpp => {
                        diag.with_context("C++ sources are never compiled with a C compiler")
                    }
                    SourceLanguage::C => diag,
                };
                diag.with_suggestion(suggestions::INSTALL_COMPILER)
            }

            WorkflowError::UnsupportedFileType { file } => diag
                .with_location(file)
                .with_suggestion(suggestions::SUPPORTED_FILES),

            WorkflowError::SourceNotFound { file } => diag.with_location(file),

            WorkflowError::NoDebugger { program } => diag
                .with_context(format!("program was built at {}", program.display()))
                .with_suggestion(suggestions::INSTALL_DEBUGGER),

            WorkflowError::BuildFailed {
                file,
                command,
                code,
                stderr,
            } => {
                let mut diag = diag
                    .with_location(file)
                    .with_context(format!("command: {}", command));
                if let Some(code) = code {
                    diag = diag.with_context(format!("exit code: {}", code));
                }
                for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
                    diag = diag.with_context(line.to_string());
                }
                diag.with_suggestion(suggestions::BUILD_FAILED)
            }
        }
    }
}
