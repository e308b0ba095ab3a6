//! `autocpp detect` command

use anyhow::{Context, Result};

use crate::cli::DetectArgs;
use crate::commands::CommandContext;
use autocpp::ops::WorkflowError;
use autocpp::util::shell::Status;

pub fn execute(ctx: &CommandContext, args: DetectArgs) -> Result<()> {
    let toolchain = ctx.discover(args.fast)?;

    // Exit non-zero when nothing usable was found
    if !toolchain.is_usable() {
        return Err(WorkflowError::NoToolchain.into());
    }

    if args.json {
        let value = serde_json::to_value(&*toolchain).context("failed to serialize toolchain")?;
        ctx.shell.json(&value);
        return Ok(());
    }

    let shell = &ctx.shell;
    shell.status(Status::Selected, format!("`{}` toolchain", toolchain.identity));

    let tools = [
        ("C compiler", &toolchain.compilers.c),
        ("C++ compiler", &toolchain.compilers.cpp),
        ("debugger", &toolchain.debugger),
    ];
    for (role, path) in tools {
        match path {
            Some(path) => shell.status(Status::Found, format!("{}: {}", role, path.display())),
            None => shell.status(Status::Missing, role),
        }
    }

    Ok(())
}
