//! `autocpp build` command

use anyhow::Result;

use crate::cli::FileArgs;
use crate::commands::CommandContext;
use autocpp::ops::build_file;
use autocpp::util::shell::Status;

pub fn execute(ctx: &CommandContext, args: FileArgs) -> Result<()> {
    let source = ctx.resolve(args.file);
    let toolchain = ctx.discover(true)?;

    ctx.shell.status(Status::Compiling, source.display());
    let output = build_file(&toolchain, &source, &ctx.build_options())?;

    if !output.stderr.trim().is_empty() && !ctx.shell.is_quiet() {
        eprint!("{}", output.stderr);
    }

    ctx.shell.status(
        Status::Finished,
        format!("{} ({})", output.program.display(), output.compiler.display()),
    );

    Ok(())
}
