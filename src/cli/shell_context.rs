//! Shared runtime state for CLI interactions and command execution.

use std::{path::PathBuf, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use spendbook_config::{Config, ConfigManager};
use spendbook_storage_json::JsonFileStore;

use crate::core::TrackerManager;
use crate::currency::MoneyFormatter;

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub tracker: TrackerManager,
    pub theme: ColorfulTheme,
    pub store: Arc<JsonFileStore>,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub home: PathBuf,
    pub money: MoneyFormatter,
}
