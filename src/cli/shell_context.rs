use std::sync::{Arc, RwLock};

use dialoguer::theme::ColorfulTheme;
use uuid::Uuid;

use crate::{
    config::{Config, ConfigManager},
    core::RosterManager,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: Arc<RwLock<RosterManager>>,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    /// Students shown by the last `find`, in display order. `None` means the
    /// whole roster is in view.
    pub filter: Option<Vec<Uuid>>,
    pub last_command: Option<String>,
    pub running: bool,
}
