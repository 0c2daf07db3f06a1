use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandGroup};
use crate::config::Config;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        CommandGroup::Settings,
        "config [show|set <key> <value>]",
        "View and change preferences",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::KEYS.join("|")
                )));
            }
            set_config_value(context, args[1], args[2..].join(" ").trim())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "Unknown config action `{}`",
            other
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output_section("Configuration");
    for (key, value) in context.config.entries() {
        io::print_info(format!("  {:<14}: {}", key, value));
    }
    io::print_info(format!(
        "  {:<14}: {}",
        "file",
        context.config_manager.path().display()
    ));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let key = key.to_lowercase();
    let mut updated = context.config.clone();
    updated
        .set(&key, value)
        .map_err(CommandError::InvalidArguments)?;
    context.config = updated;
    context.persist_config()?;
    io::apply_config(&context.config);
    tracing::info!(key = %key, "config updated");

    match key.as_str() {
        "data_dir" | "roster_name" => {
            io::print_success(format!("{} updated.", key));
            io::print_hint("Takes effect the next time the shell starts.");
        }
        _ => io::print_success(format!("{} updated.", key)),
    }
    Ok(())
}
