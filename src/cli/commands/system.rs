use chrono::Local;
use spendbook_core::EXPORT_VERSION;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("status", "Show user, category, and view", "status", cmd_status),
        CommandEntry::new(
            "version",
            "Show version, commit, and export format",
            "version",
            cmd_version,
        ),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let label = context.tracker.period_label();
    output::section("Status");
    output::info(format!(
        "  User         : {} ({})",
        context.tracker.user_name(),
        context.tracker.user_id()
    ));
    let book = context.tracker.book();
    let category = book
        .active()
        .map(|category| category.name.clone())
        .unwrap_or_default();
    output::info(format!(
        "  Category     : {} [{}]",
        category,
        book.active_slug()
    ));
    output::info(format!(
        "  View         : {} ({}: {})",
        context.tracker.view().mode,
        label.title,
        label.detail
    ));
    let remote = if context.tracker.has_remote() {
        "connected"
    } else {
        "local only"
    };
    output::info(format!("  Storage      : {}", remote));
    let last_saved = match context.tracker.last_saved()? {
        Some(at) => at.with_timezone(&Local).format("%b %-d, %Y %H:%M").to_string(),
        None => "never".to_string(),
    };
    output::info(format!("  Last saved   : {}", last_saved));
    output::info(format!("  Home         : {}", context.home.display()));
    output::info(format!("  Data file    : {}", context.store.path().display()));
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section(build_info::banner());
    output::info(format!("  Export format: v{}", EXPORT_VERSION));
    output::info(format!("  Platform     : {}", build_info::platform()));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        if let Some(command) = context.command(&command) {
            help::print_command(command);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
