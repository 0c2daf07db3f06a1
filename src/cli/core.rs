use std::{
    env, io,
    path::PathBuf,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::{NaiveDate, NaiveDateTime};
use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use uuid::Uuid;

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};
use crate::config::ConfigManager;
use crate::core::services::ServiceError;
use crate::core::utils::PathResolver;
use crate::core::{Clock, FixedClock, LoadMetadata, RosterManager, SystemClock};
use crate::domain::Roster;
pub use crate::cli::shell_context::{CliMode, ShellContext};
pub use crate::errors::CliError;
use crate::errors::{RosterError, StorageError};
use crate::storage::JsonStorage;

/// Pins the shell clock to a `YYYY-MM-DD` day.
pub const TODAY_ENV: &str = "ROSTER_CORE_TODAY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir(), clock_from_env()?)
    }

    /// Builds a shell whose config, rosters and backups all live under `base`.
    pub fn with_base_dir(
        mode: CliMode,
        base: PathBuf,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        cli_io::apply_config(&config);

        let storage = JsonStorage::new(Some(config_manager.data_dir(&config)), None)?;
        let mut manager = RosterManager::new(&config.roster_name, Box::new(storage), clock);
        let loaded = manager.open_or_create(&config.roster_name)?;

        let context = Self {
            mode,
            registry,
            manager: Arc::new(RwLock::new(manager)),
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            filter: None,
            last_command: None,
            running: true,
        };
        if let Some(meta) = loaded {
            context.report_load(&meta);
        }
        Ok(context)
    }

    pub(crate) fn manager(&self) -> RwLockReadGuard<'_, RosterManager> {
        self.manager.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn manager_mut(&self) -> RwLockWriteGuard<'_, RosterManager> {
        self.manager.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn with_roster<T>(&self, f: impl FnOnce(&Roster) -> T) -> T {
        f(self.manager().roster())
    }

    /// Runs a mutation against the working roster and saves it when the
    /// mutation succeeded and touched the roster.
    pub(crate) fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Roster, NaiveDate) -> Result<T, CommandError>,
    ) -> Result<T, CommandError> {
        let mut manager = self.manager_mut();
        let today = manager.today();
        let before = manager.roster().updated_at;
        let value = f(manager.roster_mut(), today)?;
        if manager.roster().updated_at != before {
            let path = manager.save()?;
            tracing::debug!(path = %path.display(), "roster auto-saved");
        }
        Ok(value)
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.manager().today()
    }

    pub(crate) fn reference_instant(&self) -> NaiveDateTime {
        self.manager().reference_instant()
    }

    pub(crate) fn prompt(&self) -> String {
        format!("roster({})> ", self.manager().current_name())
    }

    pub(crate) fn command(&self, word: &str) -> Option<&CommandEntry> {
        self.registry.resolve(word)
    }

    /// Student ids in the order the last listing showed them.
    pub(crate) fn visible_ids(&self) -> Vec<Uuid> {
        self.with_roster(|roster| match &self.filter {
            Some(ids) => ids
                .iter()
                .copied()
                .filter(|id| roster.student(*id).is_some())
                .collect(),
            None => roster.students.iter().map(|student| student.id).collect(),
        })
    }

    /// Resolves a 1-based position in the visible student list.
    pub(crate) fn student_id_at(&self, raw: &str) -> Result<Uuid, CommandError> {
        let index = parse_index(raw, "student")?;
        self.visible_ids().get(index).copied().ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "No student at position {} in the current list",
                index + 1
            ))
        })
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn report_load(&self, meta: &LoadMetadata) {
        for warning in &meta.warnings {
            cli_io::print_warning(warning);
        }
        let regenerated = meta.refresh.added();
        if regenerated > 0 && self.mode == CliMode::Interactive {
            cli_io::print_info(format!(
                "Refreshed {} system reminder(s) for today.",
                regenerated
            ));
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.resolve(command).map(|entry| entry.handler) {
            tracing::debug!(command, args = args.len(), "dispatching command");
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(command);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        crate::cli::shell::handle_line(self, line)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(name) = self.registry.closest(input) {
            cli_io::print_info(format!("Suggestion: `{}`?", name));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                match self.last_usage() {
                    Some(usage) => cli_io::print_hint(format!("Usage: {}", usage)),
                    None => cli_io::print_hint("Use `help <command>` for usage details."),
                }
                Ok(())
            }
            CommandError::Storage(err @ StorageError::Io(_)) => {
                tracing::error!(error = %err, "storage failure");
                cli_io::print_error(err);
                Ok(())
            }
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }

    fn last_usage(&self) -> Option<&'static str> {
        let line = self.last_command.as_deref()?;
        let word = line.split_whitespace().next()?;
        self.command(word).map(|entry| entry.usage)
    }
}

/// Parses a 1-based position into a 0-based index.
pub(crate) fn parse_index(raw: &str, what: &str) -> Result<usize, CommandError> {
    match raw.trim().parse::<usize>() {
        Ok(position) if position > 0 => Ok(position - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{}` is not a valid {} position",
            raw, what
        ))),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| CommandError::Roster(RosterError::InvalidDateFormat(raw.to_string())))
}

fn clock_from_env() -> Result<Box<dyn Clock>, CliError> {
    match env::var(TODAY_ENV) {
        Ok(raw) => {
            let today = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                CliError::Input(format!("{} must be YYYY-MM-DD, got `{}`", TODAY_ENV, raw))
            })?;
            tracing::info!(%today, "clock pinned");
            Ok(Box::new(FixedClock::new(today)))
        }
        Err(_) => Ok(Box::new(SystemClock)),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Roster(err) => CommandError::Roster(err),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
            ServiceError::NotFound(message) | ServiceError::Locked(message) => {
                CommandError::Message(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Input(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    base: &std::path::Path,
    today: &str,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let today = NaiveDate::parse_from_str(today, "%Y-%m-%d")
        .map_err(|err| CliError::Input(err.to_string()))?;
    let mut app = ShellContext::with_base_dir(
        CliMode::Script,
        base.to_path_buf(),
        Box::new(FixedClock::new(today)),
    )?;
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err)?,
        }
    }
    Ok(app)
}
