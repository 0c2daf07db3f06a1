use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandGroup};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "version",
            CommandGroup::Shell,
            "version",
            "Show build metadata",
            cmd_version,
        ),
        CommandEntry::new(
            "help",
            CommandGroup::Shell,
            "help [command]",
            "Show available commands",
            cmd_help,
        ),
        CommandEntry::new(
            "exit",
            CommandGroup::Shell,
            "exit",
            "Exit the shell",
            cmd_exit,
        )
        .aliases(&["quit"]),
    ]
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(meta.summary());
    io::print_info(format!("  Built at : {}", meta.timestamp));
    io::print_info(format!("  Target   : {}", meta.target));
    io::print_info(format!("  Profile  : {}", meta.profile));
    io::print_info(format!("  Rustc    : {}", meta.rustc));
    io::print_info(format!(
        "  Data dir : {}",
        context
            .config_manager
            .data_dir(&context.config)
            .display()
    ));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(name) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
