//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use autocpp::discovery::LookupMethod;
use autocpp::util::config::DiscoveryConfig;
use autocpp::util::shell::ColorChoice;

/// autocpp - find a C/C++ toolchain and wire it into your editor
#[derive(Parser)]
#[command(name = "autocpp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    #[command(flatten)]
    pub discovery: DiscoveryArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Discovery overrides shared by every command.
#[derive(Args)]
pub struct DiscoveryArgs {
    /// How executables are located: command (which/where) or path
    #[arg(long, global = true, env = "AUTOCPP_LOOKUP", value_name = "METHOD")]
    pub lookup: Option<LookupMethod>,

    /// Directory of the bundled fallback toolchain
    #[arg(long, global = true, env = "AUTOCPP_EMBEDDED_DIR", value_name = "DIR")]
    pub embedded_dir: Option<PathBuf>,

    /// Per-probe timeout in milliseconds (0 disables it)
    #[arg(long, global = true, env = "AUTOCPP_PROBE_TIMEOUT_MS", value_name = "MS")]
    pub probe_timeout_ms: Option<u64>,
}

impl DiscoveryArgs {
    /// Apply the overrides on top of file configuration.
    pub fn apply(self, config: &mut DiscoveryConfig) {
        if let Some(lookup) = self.lookup {
            config.lookup = Some(lookup);
        }
        if let Some(dir) = self.embedded_dir {
            config.embedded_dir = Some(dir);
        }
        if let Some(ms) = self.probe_timeout_ms {
            config.probe_timeout_ms = Some(ms);
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect the C/C++ toolchain
    Detect(DetectArgs),

    /// Write tasks.json and launch.json for the detected toolchain
    Setup(SetupArgs),

    /// Compile a single C/C++ source file
    Build(FileArgs),

    /// Compile a source file and start the debugger on it
    Debug(FileArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct DetectArgs {
    /// Return the first usable toolchain instead of waiting for every probe
    #[arg(long)]
    pub fast: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct SetupArgs {
    /// Workspace directory (defaults to current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Delete existing configuration and regenerate it
    #[arg(long)]
    pub reset: bool,
}

#[derive(Args)]
pub struct FileArgs {
    /// Source file (.c, .h, .cpp, .cc, .cxx, .hpp)
    pub file: PathBuf,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
