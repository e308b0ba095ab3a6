//! Source language detection.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Language of a single source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    C,
    #[serde(alias = "c++", alias = "cxx")]
    Cpp,
}

impl SourceLanguage {
    /// Get the language name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLanguage::C => "c",
            SourceLanguage::Cpp => "c++",
        }
    }

    /// Detect the language from a file extension (case-insensitive).
    ///
    /// Returns `None` for files that are neither C nor C++.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "c" | "h" => Some(SourceLanguage::C),
            "cpp" | "cc" | "cxx" | "hpp" => Some(SourceLanguage::Cpp),
            _ => None,
        }
    }

    /// Label of the editor build task for this language.
    pub fn build_task_label(&self) -> &'static str {
        match self {
            SourceLanguage::C => "Build C",
            SourceLanguage::Cpp => "Build C++",
        }
    }

    /// Label of the editor debug configuration for this language.
    pub fn debug_config_name(&self) -> &'static str {
        match self {
            SourceLanguage::C => "Debug C",
            SourceLanguage::Cpp => "Debug C++",
        }
    }
}

impl std::fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SourceLanguage::C => "C",
            SourceLanguage::Cpp => "C++",
        })
    }
}
