use spendbook_config::Config;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const CONFIG_USAGE: &str = "usage: config [show|set <key> <value>|backup [note]|backups|restore <name>]";

/// Keys read only while the shell starts.
const RESTART_KEYS: &[&str] = &[
    "user_id",
    "user_name",
    "remote.url",
    "remote.api_key",
    "remote.access_token",
    "data_dir",
    "log_filter",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and manage preferences",
        "config [show|set <key> <value>|backup [note]|backups|restore <name>]",
        cmd_config,
    )
    .with_details(&[
        "set <key> <value>   an empty value clears optional keys",
        "backup [note]       snapshot the current preferences",
        "restore <name>      name as printed by `config backups`",
    ])]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 2 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::keys().join("|")
                )));
            }
            let key = args[1].to_lowercase();
            let value = args[2..].join(" ");
            set_config_value(context, &key, value.trim())
        }
        "backup" => {
            let note = if args.len() > 1 {
                Some(args[1..].join(" "))
            } else {
                None
            };
            let name = context
                .config_manager
                .backup(&context.config, note.as_deref())?;
            output::success(format!("Configuration backed up as {}.", name));
            Ok(())
        }
        "backups" => {
            let backups = context.config_manager.list_backups()?;
            if backups.is_empty() {
                output::info("No configuration backups yet.");
                return Ok(());
            }
            output::section("Configuration backups");
            for name in backups {
                output::info(format!("  {}", name));
            }
            Ok(())
        }
        "restore" => {
            let name = args.get(1).ok_or_else(|| {
                CommandError::InvalidArguments("usage: config restore <name>".into())
            })?;
            if !context.confirm(&format!("Replace current preferences with {}?", name))? {
                output::info("Operation cancelled.");
                return Ok(());
            }
            context.config = context.config_manager.restore(name)?;
            context.refresh_formatting();
            output::success(format!("Configuration restored from {}.", name));
            output::hint("Restart the shell to apply user, remote, and storage settings.");
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(CONFIG_USAGE.into())),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output::section("Configuration");
    for (key, value) in context.config.entries() {
        output::info(format!("  {:<20}: {}", key, value));
    }
    output::info(format!(
        "  {:<20}: {}",
        "config file",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

/// Validates on a copy so a rejected value leaves the live settings untouched.
fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut updated = context.config.clone();
    updated.set(key, value)?;
    context.config = updated;
    context.persist_config()?;
    context.refresh_formatting();
    output::success(format!("{} updated.", key));
    if RESTART_KEYS.contains(&key) {
        output::hint("Restart the shell for this setting to take effect.");
    }
    Ok(())
}
