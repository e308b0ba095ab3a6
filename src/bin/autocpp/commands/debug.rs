//! `autocpp debug` command

use anyhow::Result;

use crate::cli::FileArgs;
use crate::commands::CommandContext;
use autocpp::ops::{build_file, launch, prepare_debug};
use autocpp::util::shell::Status;

pub fn execute(ctx: &CommandContext, args: FileArgs) -> Result<()> {
    let source = ctx.resolve(args.file);
    let toolchain = ctx.discover(false)?;
    let opts = ctx.build_options();

    // Fails before compiling when there is no debugger
    let debugger = prepare_debug(&toolchain, &source, &opts)?;

    ctx.shell.status(Status::Compiling, source.display());
    let output = build_file(&toolchain, &source, &opts)?;
    if !output.stderr.trim().is_empty() && !ctx.shell.is_quiet() {
        eprint!("{}", output.stderr);
    }

    ctx.shell.status(Status::Debugging, output.program.display());
    let status = launch(&debugger)?;
    if !status.success() {
        ctx.shell.warn(format!("debugger exited with {}", status));
    }

    Ok(())
}
