//! VS Code `tasks.json` / `launch.json` generation.
//!
//! Tasks compile the active file into an executable next to it; launch
//! configurations build through the matching task and start the debugger.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};

use crate::core::{CompileStyle, DebuggerKind, SourceLanguage, ToolchainResult};

pub const TASKS_FILE: &str = "tasks.json";
pub const LAUNCH_FILE: &str = "launch.json";

const TASKS_VERSION: &str = "2.0.0";
const LAUNCH_VERSION: &str = "0.2.0";

/// Options affecting generated editor configuration.
#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// Suffix of produced executables (`.exe` on Windows).
    pub exe_suffix: String,
    /// Extra compiler flags placed before the source file.
    pub cflags: Vec<String>,
}

impl Default for EditorOptions {
    fn default() -> Self {
        EditorOptions {
            exe_suffix: std::env::consts::EXE_SUFFIX.to_string(),
            cflags: Vec::new(),
        }
    }
}

impl EditorOptions {
    /// Path of the built program, in editor variable syntax.
    pub fn program(&self) -> String {
        format!(
            "${{fileDirname}}/${{fileBasenameNoExtension}}{}",
            self.exe_suffix
        )
    }
}

/// Languages the toolchain can compile, C first.
pub fn available_languages(toolchain: &ToolchainResult) -> Vec<SourceLanguage> {
    [SourceLanguage::C, SourceLanguage::Cpp]
        .into_iter()
        .filter(|lang| toolchain.compiler_for(*lang).is_some())
        .collect()
}

/// Build the `tasks.json` document.
pub fn tasks_json(toolchain: &ToolchainResult, opts: &EditorOptions) -> Value {
    let program = opts.program();
    let tasks: Vec<Value> = available_languages(toolchain)
        .into_iter()
        .enumerate()
        .filter_map(|(i, lang)| {
            let compiler = toolchain.compiler_for(lang)?;
            let style = CompileStyle::for_compiler(compiler);
            let group = if i == 0 {
                json!({ "kind": "build", "isDefault": true })
            } else {
                json!("build")
            };

            Some(json!({
                "type": "cppbuild",
                "label": lang.build_task_label(),
                "command": compiler.display().to_string(),
                "args": style.compile_args("${file}", &program, &opts.cflags),
                "options": { "cwd": "${fileDirname}" },
                "problemMatcher": [style.problem_matcher()],
                "group": group,
                "detail": format!("compiler: {}", compiler.display()),
            }))
        })
        .collect();

    json!({
        "version": TASKS_VERSION,
        "tasks": tasks,
    })
}

/// Build the `launch.json` document.
pub fn launch_json(toolchain: &ToolchainResult, opts: &EditorOptions) -> Value {
    let program = opts.program();
    let configurations: Vec<Value> = available_languages(toolchain)
        .into_iter()
        .filter_map(|lang| {
            let compiler = toolchain.compiler_for(lang)?;
            Some(match CompileStyle::for_compiler(compiler) {
                CompileStyle::Msvc => vsdbg_configuration(lang, &program),
                CompileStyle::Gnu => mi_configuration(toolchain, lang, &program),
            })
        })
        .collect();

    json!({
        "version": LAUNCH_VERSION,
        "configurations": configurations,
    })
}

fn mi_configuration(toolchain: &ToolchainResult, lang: SourceLanguage, program: &str) -> Value {
    let mi_mode = toolchain
        .debugger_kind()
        .unwrap_or(DebuggerKind::Gdb)
        .mi_mode();
    let debugger_path = toolchain
        .debugger
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "gdb".to_string());

    json!({
        "name": lang.debug_config_name(),
        "type": "cppdbg",
        "request": "launch",
        "program": program,
        "args": [],
        "stopAtEntry": false,
        "cwd": "${fileDirname}",
        "environment": [],
        "externalConsole": false,
        "MIMode": mi_mode,
        "miDebuggerPath": debugger_path,
        "setupCommands": [
            {
                "description": "Enable pretty-printing for gdb",
                "text": "-enable-pretty-printing",
                "ignoreFailures": true
            },
            {
                "description": "Set disassembly flavor to Intel",
                "text": "-gdb-set disassembly-flavor intel",
                "ignoreFailures": true
            }
        ],
        "preLaunchTask": lang.build_task_label(),
        "logging": {
            "moduleLoad": false,
            "engineLogging": false,
            "trace": false
        }
    })
}

fn vsdbg_configuration(lang: SourceLanguage, program: &str) -> Value {
    json!({
        "name": lang.debug_config_name(),
        "type": "cppvsdbg",
        "request": "launch",
        "program": program,
        "args": [],
        "stopAtEntry": false,
        "cwd": "${fileDirname}",
        "environment": [],
        "console": "integratedTerminal",
        "preLaunchTask": lang.build_task_label(),
    })
}

/// Serialize a document with four-space indentation and a trailing newline.
pub fn render(value: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .context("failed to serialize editor configuration")?;

    let mut text = String::from_utf8(buf).context("editor configuration is not UTF-8")?;
    text.push('\n');
    Ok(text)
}
