use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "backup",
            "Snapshot the local data file",
            "backup [note]",
            cmd_backup,
        ),
        CommandEntry::new(
            "backups",
            "List local data snapshots",
            "backups",
            cmd_backups,
        ),
        CommandEntry::new(
            "restore",
            "Replace local data with a snapshot",
            "restore <id>",
            cmd_restore,
        ),
    ]
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = (!args.is_empty()).then(|| args.join(" "));
    let info = context.store.backup(note.as_deref())?;
    output::success(format!("Backup created: {}", info.id));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.store.list_backups()?;
    if backups.is_empty() {
        output::info("No backups found.");
        return Ok(());
    }
    output::section("Backups");
    for (idx, backup) in backups.iter().enumerate() {
        let created = backup
            .created_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".into());
        output::info(format!(
            "  {:>2}. {:<40} {}  {} bytes",
            idx + 1,
            backup.id,
            created,
            backup.size_bytes
        ));
    }
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let reference = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: restore <id|number>".into()))?;
    let backups = context.store.list_backups()?;
    let chosen = match reference.parse::<usize>() {
        Ok(index) if index >= 1 && index <= backups.len() => backups.get(index - 1),
        _ => backups.iter().find(|backup| backup.id == *reference),
    }
    .ok_or_else(|| CommandError::Message(format!("backup `{}` not found", reference)))?;

    if !context.confirm(&format!("Replace local data with {}?", chosen.id))? {
        output::info("Operation cancelled.");
        return Ok(());
    }
    context.store.restore_backup(chosen)?;
    context.tracker.reload()?;
    output::success(format!("Restored {}.", chosen.id));
    Ok(())
}
