//! autocpp CLI - C/C++ toolchain discovery and editor setup

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use autocpp::ops::WorkflowError;
use autocpp::util::diagnostic;
use autocpp::util::Shell;
use cli::{Cli, Commands};
use commands::CommandContext;

fn main() {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("autocpp=debug")
    } else {
        EnvFilter::new("autocpp=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json = matches!(&cli.command, Commands::Detect(args) if args.json);
    let shell = Arc::new(Shell::from_flags(cli.quiet, cli.verbose, cli.color, json));

    if let Err(e) = run(cli, &shell) {
        report(&shell, &e);
        std::process::exit(1);
    }
}

fn run(cli: Cli, shell: &Arc<Shell>) -> Result<()> {
    let Cli {
        command, discovery, ..
    } = cli;
    let context = move || CommandContext::new(Arc::clone(shell), discovery);

    // Execute command
    match command {
        Commands::Detect(args) => commands::detect::execute(&context()?, args),
        Commands::Setup(args) => commands::setup::execute(&context()?, args),
        Commands::Build(args) => commands::build::execute(&context()?, args),
        Commands::Debug(args) => commands::debug::execute(&context()?, args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

fn report(shell: &Shell, err: &anyhow::Error) {
    if shell.is_json() {
        shell.error(format!("{:#}", err));
        return;
    }

    match err.downcast_ref::<WorkflowError>() {
        Some(workflow) => diagnostic::emit(&workflow.to_diagnostic(), shell.use_color()),
        None => eprintln!("error: {:#}", err),
    }
}
