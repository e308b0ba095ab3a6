//! Toolchain families and discovery results.
//!
//! A discovery run probes each [`Family`] independently and records a
//! [`ProbeResult`] per family. The selection step folds those into a single
//! [`ToolchainResult`] whose [`ToolchainIdentity`] records where the paths
//! came from.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::language::SourceLanguage;

/// A compiler/debugger vendor set that can be probed on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// GCC with GDB
    Gnu,
    /// Clang with LLDB
    Clang,
    /// Microsoft Visual C++ (`cl`)
    Msvc,
}

/// Executable names a family is looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyTools {
    pub c: &'static str,
    pub cpp: &'static str,
    pub debugger: Option<&'static str>,
}

impl Family {
    /// All families, in selection priority order.
    pub const ALL: [Family; 3] = [Family::Gnu, Family::Clang, Family::Msvc];

    /// Get the family name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Gnu => "gnu",
            Family::Clang => "clang",
            Family::Msvc => "msvc",
        }
    }

    /// Canonical executable names for this family.
    ///
    /// MSVC uses `cl` as both the C and C++ driver and has no debugger that
    /// is reachable through the search path.
    pub fn tools(&self) -> FamilyTools {
        match self {
            Family::Gnu => FamilyTools {
                c: "gcc",
                cpp: "g++",
                debugger: Some("gdb"),
            },
            Family::Clang => FamilyTools {
                c: "clang",
                cpp: "clang++",
                debugger: Some("lldb"),
            },
            Family::Msvc => FamilyTools {
                c: "cl",
                cpp: "cl",
                debugger: None,
            },
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per toolchain family.
///
/// Indexing by [`Family`] keeps every consumer exhaustive over the three
/// families without string keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerFamily<T> {
    pub gnu: T,
    pub clang: T,
    pub msvc: T,
}

impl<T> PerFamily<T> {
    /// Build a map by evaluating `f` for every family.
    pub fn from_fn(mut f: impl FnMut(Family) -> T) -> Self {
        PerFamily {
            gnu: f(Family::Gnu),
            clang: f(Family::Clang),
            msvc: f(Family::Msvc),
        }
    }

    /// Iterate in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Family, &T)> {
        Family::ALL.into_iter().map(move |family| (family, &self[family]))
    }
}

impl<T> Index<Family> for PerFamily<T> {
    type Output = T;

    fn index(&self, family: Family) -> &T {
        match family {
            Family::Gnu => &self.gnu,
            Family::Clang => &self.clang,
            Family::Msvc => &self.msvc,
        }
    }
}

impl<T> IndexMut<Family> for PerFamily<T> {
    fn index_mut(&mut self, family: Family) -> &mut T {
        match family {
            Family::Gnu => &mut self.gnu,
            Family::Clang => &mut self.clang,
            Family::Msvc => &mut self.msvc,
        }
    }
}

/// Where a resolved toolchain came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolchainIdentity {
    Gnu,
    Clang,
    Msvc,
    /// Fields assembled from more than one family
    Combo,
    /// Toolchain bundled with the application
    Embedded,
}

impl ToolchainIdentity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolchainIdentity::Gnu => "gnu",
            ToolchainIdentity::Clang => "clang",
            ToolchainIdentity::Msvc => "msvc",
            ToolchainIdentity::Combo => "combo",
            ToolchainIdentity::Embedded => "embedded",
        }
    }
}

impl From<Family> for ToolchainIdentity {
    fn from(family: Family) -> Self {
        match family {
            Family::Gnu => ToolchainIdentity::Gnu,
            Family::Clang => ToolchainIdentity::Clang,
            Family::Msvc => ToolchainIdentity::Msvc,
        }
    }
}

impl fmt::Display for ToolchainIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// C and C++ compiler paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compilers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpp: Option<PathBuf>,
}

impl Compilers {
    /// True if at least one compiler path is present.
    pub fn any(&self) -> bool {
        self.c.is_some() || self.cpp.is_some()
    }
}

/// Outcome of probing a single family.
///
/// All fields are optional; a partial result is still a valid result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResult {
    pub compilers: Compilers,
    pub debugger: Option<PathBuf>,
}

impl ProbeResult {
    /// A result with nothing found.
    pub fn empty() -> Self {
        ProbeResult::default()
    }

    /// A probe result is only a candidate when it found some compiler.
    pub fn has_compiler(&self) -> bool {
        self.compilers.any()
    }

    /// C++ compiler and debugger both present.
    pub fn is_complete(&self) -> bool {
        self.compilers.cpp.is_some() && self.debugger.is_some()
    }
}

/// Which debugger front-end a debugger path drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebuggerKind {
    Gdb,
    Lldb,
}

impl DebuggerKind {
    /// Infer the debugger kind from its executable name.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_lowercase();

        if name.contains("lldb") {
            DebuggerKind::Lldb
        } else {
            DebuggerKind::Gdb
        }
    }

    /// The `MIMode` value the editor's C/C++ debug adapter expects.
    pub fn mi_mode(&self) -> &'static str {
        match self {
            DebuggerKind::Gdb => "gdb",
            DebuggerKind::Lldb => "lldb",
        }
    }
}

/// The resolved toolchain handed to callers.
///
/// Immutable once built; the coordinator shares it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainResult {
    #[serde(rename = "toolchain")]
    pub identity: ToolchainIdentity,
    pub compilers: Compilers,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debugger: Option<PathBuf>,
}

impl ToolchainResult {
    /// Build a result for a single family from its probe outcome.
    pub fn from_probe(family: Family, probe: &ProbeResult) -> Self {
        ToolchainResult {
            identity: family.into(),
            compilers: probe.compilers.clone(),
            debugger: probe.debugger.clone(),
        }
    }

    /// A combo with nothing in it.
    pub fn empty_combo() -> Self {
        ToolchainResult {
            identity: ToolchainIdentity::Combo,
            compilers: Compilers::default(),
            debugger: None,
        }
    }

    /// False when no compiler is known.
    ///
    /// Consumers treat an unusable result as "no toolchain found".
    pub fn is_usable(&self) -> bool {
        self.compilers.any()
    }

    /// Compiler to use for a source file of the given language.
    ///
    /// C sources may be compiled with the C++ driver when no C compiler is
    /// known; C++ sources always need the C++ driver.
    pub fn compiler_for(&self, lang: SourceLanguage) -> Option<&Path> {
        match lang {
            SourceLanguage::C => self.compilers.c.as_deref().or(self.compilers.cpp.as_deref()),
            SourceLanguage::Cpp => self.compilers.cpp.as_deref(),
        }
    }

    pub fn debugger_kind(&self) -> Option<DebuggerKind> {
        self.debugger.as_deref().map(DebuggerKind::from_path)
    }
}

/// Whether a compiler path names the MSVC driver.
pub fn is_cl(path: &Path) -> bool {
    path.file_stem()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.eq_ignore_ascii_case("cl"))
}

/// Command-line dialect of a compiler driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStyle {
    /// gcc / clang style flags
    Gnu,
    /// cl.exe style flags
    Msvc,
}

impl CompileStyle {
    pub fn for_compiler(path: &Path) -> Self {
        if is_cl(path) {
            CompileStyle::Msvc
        } else {
            CompileStyle::Gnu
        }
    }

    /// Arguments compiling `source` straight to the executable `output`
    /// with debug info. `extra` flags go before the source file.
    pub fn compile_args(&self, source: &str, output: &str, extra: &[String]) -> Vec<String> {
        let mut args: Vec<String> = match self {
            CompileStyle::Gnu => vec!["-fdiagnostics-color=always".into(), "-g".into()],
            CompileStyle::Msvc => vec!["/nologo".into(), "/Zi".into(), "/EHsc".into()],
        };
        args.extend(extra.iter().cloned());
        args.push(source.to_string());

        match self {
            CompileStyle::Gnu => {
                args.push("-o".into());
                args.push(output.to_string());
            }
            CompileStyle::Msvc => args.push(format!("/Fe:{}", output)),
        }
        args
    }

    /// Editor problem matcher for this dialect's diagnostics.
    pub fn problem_matcher(&self) -> &'static str {
        match self {
            CompileStyle::Gnu => "$gcc",
            CompileStyle::Msvc => "$msCompile",
        }
    }
}
