//! User-friendly diagnostic messages.
//!
//! Every user-facing failure names the root cause and, where there is one,
//! a concrete next step.

use std::fmt;
use std::path::PathBuf;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when no compiler was found anywhere.
    pub const INSTALL_COMPILER: &str =
        "Install GCC, Clang or MSVC and make sure it is on PATH";

    /// Suggestion pointing at a MinGW distribution on Windows.
    pub const MINGW_DOWNLOAD: &str =
        "On Windows, a MinGW-w64 build is available from https://github.com/niXman/mingw-builds-binaries/releases";

    /// Suggestion to use a bundled toolchain.
    pub const EMBEDDED_DIR: &str =
        "Point `--embedded-dir` (or AUTOCPP_EMBEDDED_DIR) at a bundled toolchain containing bin/gcc";

    /// Suggestion when a debugger is missing.
    pub const INSTALL_DEBUGGER: &str = "Install gdb or lldb and make sure it is on PATH";

    /// Suggestion when a build fails.
    pub const BUILD_FAILED: &str = "Fix the compiler errors above and run the command again";

    /// Suggestion when a file type is not recognised.
    pub const SUPPORTED_FILES: &str =
        "Supported extensions: .c, .h (C) and .cpp, .cc, .cxx, .hpp (C++)";

    /// Suggestion to inspect detection in detail.
    pub const VERBOSE_DETECT: &str = "Run `autocpp detect --verbose` to see every lookup";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(message)
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = match (self.severity, color) {
            (Severity::Error, true) => "\x1b[1;31merror\x1b[0m",
            (Severity::Warning, true) => "\x1b[1;33mwarning\x1b[0m",
            (Severity::Error, false) => "error",
            (Severity::Warning, false) => "warning",
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("no C/C++ compiler found")
            .with_location("src/main.c")
            .with_context("searched: gcc, g++, clang, clang++, cl")
            .with_suggestion(suggestions::INSTALL_COMPILER)
            .with_suggestion(suggestions::EMBEDDED_DIR);

        let output = diag.format(false);
        assert!(output.starts_with("error: no C/C++ compiler found\n"));
        assert!(output.contains("  --> src/main.c"));
        assert!(output.contains("  = searched: gcc"));
        assert!(output.contains("help: consider:"));
        assert!(output.contains("1. Install GCC"));
        assert!(output.contains("2. Point `--embedded-dir`"));
    }

    #[test]
    fn test_warning_without_suggestions() {
        let output = Diagnostic::warning("no debugger found").format(false);
        assert_eq!(output, "warning: no debugger found\n");
    }

    #[test]
    fn test_colored_prefix() {
        let output = Diagnostic::error("boom").format(true);
        assert!(output.starts_with("\x1b[1;31merror\x1b[0m: boom"));
    }
}
