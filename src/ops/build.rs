//! Implementation of `autocpp build`.
//!
//! Compiles a single source file into an executable next to it, using the
//! compiler the discovered toolchain has for the file's language.

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::errors::WorkflowError;
use crate::core::{CompileStyle, SourceLanguage, ToolchainResult};
use crate::util::process::ProcessBuilder;

/// Options for building a single file.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Extra compiler flags
    pub cflags: Vec<String>,
}

/// A compile step ready to run.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub source: PathBuf,
    pub language: SourceLanguage,
    pub compiler: PathBuf,
    pub program: PathBuf,
    pub command: ProcessBuilder,
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub language: SourceLanguage,
    pub compiler: PathBuf,
    pub program: PathBuf,
    /// Compiler diagnostics (warnings) from a successful run
    pub stderr: String,
}

/// Directory a source file is compiled in.
fn source_dir(source: &Path) -> &Path {
    source
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

/// Executable produced for `source`: `<dir>/<stem><EXE_SUFFIX>`.
pub fn output_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    source_dir(source).join(format!("{}{}", stem, std::env::consts::EXE_SUFFIX))
}

/// Work out how `source` would be compiled, without running anything.
pub fn plan_build(
    toolchain: &ToolchainResult,
    source: &Path,
    opts: &BuildOptions,
) -> Result<BuildPlan, WorkflowError> {
    if !source.is_file() {
        return Err(WorkflowError::SourceNotFound {
            file: source.to_path_buf(),
        });
    }

    let language =
        SourceLanguage::from_path(source).ok_or_else(|| WorkflowError::UnsupportedFileType {
            file: source.to_path_buf(),
        })?;

    let compiler = toolchain
        .compiler_for(language)
        .ok_or_else(|| WorkflowError::NoCompiler {
            language,
            file: source.to_path_buf(),
        })?
        .to_path_buf();

    let program = output_path(source);
    let file_name = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    // Compiled from the source's directory so the program lands beside it.
    let args = CompileStyle::for_compiler(&compiler).compile_args(
        &file_name(source),
        &file_name(&program),
        &opts.cflags,
    );
    let command = ProcessBuilder::new(&compiler)
        .args(args)
        .cwd(source_dir(source));

    Ok(BuildPlan {
        source: source.to_path_buf(),
        language,
        compiler,
        program,
        command,
    })
}

/// Compile `source` with the toolchain.
pub fn build_file(
    toolchain: &ToolchainResult,
    source: &Path,
    opts: &BuildOptions,
) -> Result<BuildOutput> {
    let plan = plan_build(toolchain, source, opts)?;
    tracing::debug!("running `{}`", plan.command.display_command());

    let output = plan.command.exec()?;
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        // cl reports errors on stdout
        let mut details = stderr;
        details.push_str(&String::from_utf8_lossy(&output.stdout));
        return Err(WorkflowError::BuildFailed {
            file: plan.source,
            command: plan.command.display_command(),
            code: output.status.code(),
            stderr: details,
        }
        .into());
    }

    tracing::info!("built {}", plan.program.display());
    Ok(BuildOutput {
        language: plan.language,
        compiler: plan.compiler,
        program: plan.program,
        stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Compilers, ToolchainIdentity};
    use std::fs;
    use tempfile::TempDir;

    fn toolchain(c: Option<&str>, cpp: Option<&str>) -> ToolchainResult {
        ToolchainResult {
            identity: ToolchainIdentity::Combo,
            compilers: Compilers {
                c: c.map(PathBuf::from),
                cpp: cpp.map(PathBuf::from),
            },
            debugger: None,
        }
    }

    fn source(tmp: &TempDir, name: &str) -> PathBuf {
        let path = tmp.path().join(name);
        fs::write(&path, "int main(void) { return 0; }\n").unwrap();
        path
    }

    #[test]
    fn test_output_path() {
        let exe = std::env::consts::EXE_SUFFIX;
        assert_eq!(
            output_path(Path::new("/work/hello.c")),
            PathBuf::from(format!("/work/hello{}", exe))
        );
        assert_eq!(
            output_path(Path::new("hello.cpp")),
            PathBuf::from(format!("./hello{}", exe))
        );
    }

    #[test]
    fn test_plan_for_c_file() {
        let tmp = TempDir::new().unwrap();
        let main = source(&tmp, "main.c");
        let tc = toolchain(Some("/usr/bin/gcc"), Some("/usr/bin/g++"));

        let plan = plan_build(&tc, &main, &BuildOptions::default()).unwrap();

        assert_eq!(plan.language, SourceLanguage::C);
        assert_eq!(plan.compiler, PathBuf::from("/usr/bin/gcc"));
        assert_eq!(plan.program, output_path(&main));
        let args = plan.command.get_args();
        assert!(args.contains(&"main.c".to_string()));
        assert_eq!(args[args.len() - 2], "-o");
        assert_eq!(
            args[args.len() - 1],
            format!("main{}", std::env::consts::EXE_SUFFIX)
        );
    }

    #[test]
    fn test_c_file_falls_back_to_cpp_compiler() {
        let tmp = TempDir::new().unwrap();
        let main = source(&tmp, "main.c");
        let tc = toolchain(None, Some("/usr/bin/clang++"));

        let plan = plan_build(&tc, &main, &BuildOptions::default()).unwrap();
        assert_eq!(plan.compiler, PathBuf::from("/usr/bin/clang++"));
    }

    #[test]
    fn test_cpp_file_never_uses_c_compiler() {
        let tmp = TempDir::new().unwrap();
        let main = source(&tmp, "main.cpp");
        let tc = toolchain(Some("/usr/bin/gcc"), None);

        let err = plan_build(&tc, &main, &BuildOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::NoCompiler {
                language: SourceLanguage::Cpp,
                ..
            }
        ));
    }

    #[test]
    fn test_unsupported_and_missing_files() {
        let tmp = TempDir::new().unwrap();
        let notes = source(&tmp, "notes.txt");
        let tc = toolchain(Some("/usr/bin/gcc"), Some("/usr/bin/g++"));

        let err = plan_build(&tc, &notes, &BuildOptions::default()).unwrap_err();
        assert!(matches!(err, WorkflowError::UnsupportedFileType { .. }));

        let err = plan_build(&tc, &tmp.path().join("gone.c"), &BuildOptions::default())
            .unwrap_err();
        assert!(matches!(err, WorkflowError::SourceNotFound { .. }));
    }

    #[test]
    fn test_cflags_are_passed() {
        let tmp = TempDir::new().unwrap();
        let main = source(&tmp, "main.c");
        let tc = toolchain(Some("/usr/bin/gcc"), None);
        let opts = BuildOptions {
            cflags: vec!["-Wall".to_string(), "-O0".to_string()],
        };

        let plan = plan_build(&tc, &main, &opts).unwrap();
        let args = plan.command.get_args();
        assert_eq!(&args[2..4], ["-Wall", "-O0"]);
    }

    #[cfg(unix)]
    fn fake_compiler(dir: &Path, name: &str, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_build_runs_compiler() {
        let tmp = TempDir::new().unwrap();
        let main = source(&tmp, "main.c");
        let gcc = fake_compiler(
            tmp.path(),
            "gcc",
            "for a; do last=$a; done; : > \"$last\"; echo 'warning: unused' >&2",
        );
        let tc = toolchain(Some(gcc.to_str().unwrap()), None);

        let output = build_file(&tc, &main, &BuildOptions::default()).unwrap();

        assert!(output.program.exists());
        assert_eq!(output.compiler, gcc);
        assert!(output.stderr.contains("warning: unused"));
    }

    #[cfg(unix)]
    #[test]
    fn test_build_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        let main = source(&tmp, "main.c");
        let gcc = fake_compiler(tmp.path(), "gcc", "echo 'main.c:1: error: boom' >&2; exit 1");
        let tc = toolchain(Some(gcc.to_str().unwrap()), None);

        let err = build_file(&tc, &main, &BuildOptions::default()).unwrap_err();
        match err.downcast_ref::<WorkflowError>() {
            Some(WorkflowError::BuildFailed { code, stderr, .. }) => {
                assert_eq!(*code, Some(1));
                assert!(stderr.contains("boom"));
            }
            other => panic!("expected BuildFailed, got {:?}", other),
        }
    }
}
