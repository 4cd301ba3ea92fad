//! Core CLI loop, dispatch, and shell context helpers.

use std::{io, path::PathBuf, sync::Arc};

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm};
use spendbook_config::{Config, ConfigError, ConfigManager};
use spendbook_core::{CoreError, LocalStore, SystemClock};
use spendbook_domain::{parse_user_date, ViewMode};
use spendbook_storage_json::JsonFileStore;
use strsim::levenshtein;

pub use crate::errors::CliError;
use crate::core::{SyncStatus, TrackerManager, UserProfile};
use crate::currency::MoneyFormatter;
use crate::errors::TrackerError;
use crate::storage::RestBackend;

use super::commands;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

const DATA_BACKUPS_DIR: &str = "backups";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    /// Opens the shell against `$SPENDBOOK_HOME` (or `~/.spendbook`).
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_home(mode, Config::default_home())
    }

    pub fn with_home(mode: CliMode, home: PathBuf) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(home.clone())?;
        let config = config_manager.load()?;
        output::apply_config(&config);

        let store = Arc::new(JsonFileStore::open(
            config.resolve_data_dir(&home),
            home.join(DATA_BACKUPS_DIR),
        )?);
        let local: Arc<dyn LocalStore> = store.clone();
        let profile = UserProfile {
            user_id: config.user_id.clone(),
            user_name: config.user_name.clone(),
        };
        let mut tracker = TrackerManager::open(local, Arc::new(SystemClock), profile)?;
        if let Some(settings) = config.active_remote() {
            match RestBackend::new(settings) {
                Ok(backend) => tracker = tracker.with_remote(Box::new(backend)),
                Err(err) => output::warning(format!("Remote disabled: {err}")),
            }
        }
        if let Some(view_mode) = ViewMode::parse(&config.default_view) {
            tracker.switch_view(view_mode);
        }

        let mut app = ShellContext {
            mode,
            registry,
            tracker,
            theme: ColorfulTheme::default(),
            store,
            money: MoneyFormatter::from_config(&config),
            config_manager,
            config,
            home,
        };
        app.initial_sync()?;
        Ok(app)
    }

    fn initial_sync(&mut self) -> Result<(), CliError> {
        if !self.tracker.has_remote() {
            return Ok(());
        }
        match self.tracker.sync_from_remote()? {
            SyncStatus::LocalOnly(reason) => {
                output::warning(format!("Working offline, remote unavailable: {reason}"))
            }
            SyncStatus::Synced => output::info("Loaded data from remote."),
            SyncStatus::Offline => {}
        }
        Ok(())
    }

    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    /// `(name, usage)` for every registered command.
    pub(crate) fn command_usages(&self) -> Vec<(&'static str, &'static str)> {
        self.registry
            .list()
            .into_iter()
            .map(|entry| (entry.name, entry.usage))
            .collect()
    }

    pub(crate) fn prompt(&self) -> String {
        format!(
            "spendbook [{} | {}]> ",
            self.tracker.book().active_slug(),
            self.tracker.view().mode
        )
    }

    pub(crate) fn money(&self, amount: f64) -> String {
        self.money.format(amount)
    }

    /// Re-applies formatting preferences after the configuration changed.
    pub(crate) fn refresh_formatting(&mut self) {
        self.money = MoneyFormatter::from_config(&self.config);
        output::apply_config(&self.config);
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        self.ask("Exit shell?", true)
            .map_err(|err| CliError::Command(err.to_string()))
    }

    /// Asks before destructive changes in interactive mode. Scripts never prompt.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if !self.can_prompt() {
            return Ok(true);
        }
        self.ask(prompt, false)
    }

    fn ask(&self, prompt: &str, default: bool) -> Result<bool, CommandError> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Tracker(err) if !err.is_validation() => {
                self.print_error(&err.to_string());
                self.print_hint("Set RUST_LOG=spendbook=debug for more detail.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    /// Tells the user when a change did not reach the remote backend.
    pub(crate) fn report_sync(&self, sync: &SyncStatus) {
        match sync {
            SyncStatus::Synced => output::info("Synced with remote."),
            SyncStatus::LocalOnly(reason) => {
                output::warning(format!("Saved locally only: {reason}"))
            }
            SyncStatus::Offline => {}
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        output::error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        output::warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        output::hint(message);
    }

    /// Resolves a full id or a unique id prefix to the stored transaction id.
    pub(crate) fn resolve_transaction_id(&self, reference: &str) -> Result<String, CommandError> {
        if self.tracker.transaction(reference).is_some() {
            return Ok(reference.to_string());
        }
        let matches: Vec<&str> = self
            .tracker
            .all_transactions()
            .into_iter()
            .filter(|txn| txn.id.starts_with(reference))
            .map(|txn| txn.id.as_str())
            .collect();
        match matches.as_slice() {
            [only] => Ok(only.to_string()),
            [] => Err(CoreError::TransactionNotFound(reference.to_string()).into()),
            _ => Err(CommandError::InvalidArguments(format!(
                "id prefix `{reference}` matches {} transactions",
                matches.len()
            ))),
        }
    }
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    parse_user_date(input).map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

pub(crate) fn parse_amount(input: &str) -> Result<f64, CommandError> {
    input
        .trim()
        .trim_start_matches(['₹', '$'])
        .replace(',', "")
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{}`", input)))
}

/// Removes `--name <value>` (or `-short <value>`) from `args`.
pub(crate) fn take_option<'a>(
    args: &[&'a str],
    long: &str,
    short: &str,
) -> Result<(Option<&'a str>, Vec<&'a str>), CommandError> {
    let mut value = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        if arg == long || arg == short {
            let next = iter.next().ok_or_else(|| {
                CommandError::InvalidArguments(format!("`{}` expects a value", long))
            })?;
            value = Some(next);
        } else {
            rest.push(arg);
        }
    }
    Ok((value, rest))
}

pub(crate) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::Tracker(TrackerError::from(err))
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::Tracker(TrackerError::from(err))
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Tracker(inner),
            CliError::Command(message) => CommandError::Message(message),
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(home: PathBuf, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_home(CliMode::Script, home)?;
    crate::cli::shell::run_script(&mut app, io::Cursor::new(lines.join("\n")))?;
    Ok(app)
}
