use std::path::PathBuf;

use spendbook_storage_json::{load_text_from_path, save_text_to_path};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "export",
            "Write the active category to a JSON file",
            "export [path]",
            cmd_export,
        )
        .with_details(&["Without a path the file lands in the working directory."]),
        CommandEntry::new(
            "import",
            "Merge transactions from an exported JSON file",
            "import <path>",
            cmd_import,
        )
        .with_details(&["Transactions whose id already exists are skipped."]),
    ]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (file_name, json) = context.tracker.export()?;
    let path = args
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(file_name));
    save_text_to_path(&path, &json)?;
    let count = context.tracker.book().active_transactions().len();
    output::success(format!(
        "Exported {} transaction(s) to {}.",
        count,
        path.display()
    ));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = args
        .first()
        .map(PathBuf::from)
        .ok_or_else(|| CommandError::InvalidArguments("usage: import <path>".into()))?;
    let raw = load_text_from_path(&path)?;
    let applied = context.tracker.import(&raw)?;
    let outcome = applied.value;
    output::success(format!("Imported {} new transactions.", outcome.added));
    if outcome.duplicates > 0 {
        output::info(format!("Skipped {} already present.", outcome.duplicates));
    }
    if outcome.skipped > 0 {
        output::warning(format!("Ignored {} malformed entries.", outcome.skipped));
    }
    context.report_sync(&applied.sync);
    Ok(())
}
