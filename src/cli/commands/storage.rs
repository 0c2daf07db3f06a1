use std::path::Path;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandGroup};
use crate::core::LoadMetadata;
use crate::storage::canonical_name;

use super::require_args;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "save",
            CommandGroup::Storage,
            "save [name|path.json]",
            "Save the roster, optionally under a new name or to a .json path",
            cmd_save,
        ),
        CommandEntry::new(
            "load",
            CommandGroup::Storage,
            "load [name|path.json]",
            "Open a saved roster or a .json file; without arguments, list rosters",
            cmd_load,
        ),
        CommandEntry::new(
            "backups",
            CommandGroup::Storage,
            "backups",
            "List backups of the current roster, newest first",
            cmd_backups,
        ),
        CommandEntry::new(
            "restore",
            CommandGroup::Storage,
            "restore <backup>",
            "Replace the current roster with one of its backups",
            cmd_restore,
        ),
    ]
}

fn looks_like_path(raw: &str) -> bool {
    raw.contains('/') || raw.contains(std::path::MAIN_SEPARATOR) || raw.ends_with(".json")
}

fn cmd_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(target) = args.first() else {
        let path = context.manager().save()?;
        io::print_success(format!("Roster saved to {}.", path.display()));
        return Ok(());
    };

    if looks_like_path(target) {
        context.manager().save_to_path(Path::new(target))?;
        io::print_success(format!("Roster exported to {}.", target));
        return Ok(());
    }

    let name = args.join(" ");
    let path = context.manager_mut().save_as(&name)?;
    remember_roster(context, &name)?;
    io::print_success(format!("Roster saved as `{}` ({}).", name, path.display()));
    Ok(())
}

fn cmd_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(target) = args.first() else {
        return list_rosters(context);
    };

    let meta = if looks_like_path(target) {
        context.manager_mut().load_from_path(Path::new(target))?
    } else {
        context.manager_mut().load(&args.join(" "))?
    };
    finish_load(context, &meta)?;
    io::print_success(format!(
        "Loaded roster `{}` ({} students).",
        meta.name,
        context.with_roster(|roster| roster.student_count())
    ));
    Ok(())
}

fn list_rosters(context: &ShellContext) -> CommandResult {
    let names = context.manager().list_rosters()?;
    if names.is_empty() {
        io::print_info("No saved rosters yet.");
        return Ok(());
    }
    let current = canonical_name(context.manager().current_name());
    output_section("Saved rosters");
    for name in names {
        let marker = if name == current { "*" } else { " " };
        io::print_info(format!("{} {}", marker, name));
    }
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.manager().list_backups()?;
    if backups.is_empty() {
        io::print_info("No backups yet; one is taken each time the roster is overwritten.");
        return Ok(());
    }
    output_section(format!("Backups of `{}`", context.manager().current_name()));
    for backup in backups {
        io::print_info(format!("  {}", backup));
    }
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "restore needs a backup name (see `backups`)")?;
    let meta = context.manager_mut().restore(args[0])?;
    finish_load(context, &meta)?;
    io::print_success(format!("Restored `{}` from {}.", meta.name, args[0]));
    Ok(())
}

fn finish_load(context: &mut ShellContext, meta: &LoadMetadata) -> CommandResult {
    context.filter = None;
    context.report_load(meta);
    remember_roster(context, &meta.name)
}

/// Makes `name` the roster opened on the next start.
fn remember_roster(context: &mut ShellContext, name: &str) -> CommandResult {
    if context.config.roster_name == name {
        return Ok(());
    }
    context
        .config
        .set("roster_name", name)
        .map_err(CommandError::InvalidArguments)?;
    context.persist_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::process_script;
    use tempfile::TempDir;

    #[test]
    fn path_like_targets_are_detected() {
        assert!(looks_like_path("exports/term.json"));
        assert!(looks_like_path("term.json"));
        assert!(!looks_like_path("Term 4"));
    }

    #[test]
    fn export_then_import_through_a_path() {
        let temp = TempDir::new().unwrap();
        let export = temp.path().join("export.json");
        let save_line = format!("save \"{}\"", export.display());
        let load_line = format!("load \"{}\"", export.display());
        process_script(
            temp.path(),
            "2026-10-19",
            &[
                "add-student \"Alex Yeoh\" 91234567 Mon 1600",
                save_line.as_str(),
            ],
        )
        .unwrap();
        assert!(export.exists());

        let other = TempDir::new().unwrap();
        let context = process_script(other.path(), "2026-10-19", &[load_line.as_str()]).unwrap();
        context.with_roster(|roster| assert_eq!(roster.student_count(), 1));
    }

    #[test]
    fn restore_brings_back_the_previous_version() {
        let temp = TempDir::new().unwrap();
        let context = process_script(
            temp.path(),
            "2026-10-19",
            &[
                "add-student \"Alex Yeoh\" 91234567 Mon 1600",
                "add-student \"Bea Tan\" 92222222 Tue 1500",
            ],
        )
        .unwrap();
        let backups = context.manager().list_backups().unwrap();
        assert!(!backups.is_empty());
        let restore_line = format!("restore {}", backups[0]);
        drop(context);

        let context = process_script(temp.path(), "2026-10-19", &[restore_line.as_str()]).unwrap();
        context.with_roster(|roster| assert_eq!(roster.student_count(), 1));
    }
}
