//! `autocpp setup` command

use anyhow::Result;

use crate::cli::SetupArgs;
use crate::commands::CommandContext;
use autocpp::ops::{setup_workspace, FileAction, SetupOptions};
use autocpp::util::shell::Status;

pub fn execute(ctx: &CommandContext, args: SetupArgs) -> Result<()> {
    let workspace = match args.path {
        Some(path) => ctx.resolve(path),
        None => ctx.cwd.clone(),
    };

    let toolchain = ctx.discover(false)?;

    let opts = SetupOptions {
        reset: args.reset,
        config_dir: ctx.config.editor.config_dir().to_string(),
        editor: ctx.editor_options(),
    };
    let report = setup_workspace(&workspace, &toolchain, &opts)?;

    let shell = &ctx.shell;
    shell.status(Status::Selected, format!("`{}` toolchain", toolchain.identity));

    for file in &report.files {
        let path = file.path.display();
        match file.action {
            FileAction::Created => shell.status(Status::Created, path),
            FileAction::Replaced => {
                shell.status(Status::Removed, &path);
                shell.status(Status::Created, path);
            }
            FileAction::Kept => shell.status(
                Status::Skipped,
                format!("{} (already exists, use --reset to regenerate)", path),
            ),
        }
    }

    if toolchain.debugger.is_none() {
        shell.warn("no debugger found; launch configurations fall back to `gdb`");
    }

    Ok(())
}
