use spendbook_domain::{TransactionDraft, TransactionKind};

use crate::cli::core::{
    parse_amount, parse_date, short_id, take_option, CommandError, CommandResult, ShellContext,
};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::currency::format_date;

const ADD_USAGE: &str = "usage: add <expense|income> <amount> <description...> [--date YYYY-MM-DD]";
const EDIT_USAGE: &str =
    "usage: edit <id> <expense|income> <amount> <description...> [--date YYYY-MM-DD]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Record an expense or income in the active category",
            "add <expense|income> <amount> <description...> [--date YYYY-MM-DD]",
            cmd_add,
        )
        .with_details(&["The date defaults to today."]),
        CommandEntry::new(
            "edit",
            "Replace the fields of a transaction",
            "edit <id> <expense|income> <amount> <description...> [--date YYYY-MM-DD]",
            cmd_edit,
        )
        .with_details(&[
            "<id> accepts the short id shown by `list`.",
            "The date is kept unless --date is given.",
        ]),
        CommandEntry::new("delete", "Delete a transaction", "delete <id>", cmd_delete),
        CommandEntry::new(
            "list",
            "List transactions in the current view",
            "list",
            cmd_list,
        ),
    ]
}

/// Parses `<kind> <amount> <description...> [--date]` shared by add and edit.
fn parse_draft(args: &[&str], usage: &str) -> Result<TransactionDraft, CommandError> {
    let (date, rest) = take_option(args, "--date", "-d")?;
    if rest.len() < 3 {
        return Err(CommandError::InvalidArguments(usage.into()));
    }
    let kind = TransactionKind::parse(rest[0]).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown transaction type `{}` (use expense or income)",
            rest[0]
        ))
    })?;
    let amount = parse_amount(rest[1])?;
    let description = rest[2..].join(" ");
    let date = date.map(parse_date).transpose()?;
    Ok(TransactionDraft::new(description, amount, kind, date))
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = parse_draft(args, ADD_USAGE)?;
    let applied = context.tracker.add_transaction(&draft)?;
    let txn = &applied.value;
    output::success(format!(
        "{} of {} added on {} [{}].",
        txn.kind,
        context.money(txn.amount),
        format_date(txn.date),
        short_id(&txn.id)
    ));
    context.report_sync(&applied.sync);
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((reference, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(EDIT_USAGE.into()));
    };
    let id = context.resolve_transaction_id(reference)?;
    let mut draft = parse_draft(rest, EDIT_USAGE)?;
    if draft.date.is_none() {
        draft.date = context.tracker.transaction(&id).map(|txn| txn.date);
    }
    let applied = context.tracker.edit_transaction(&id, &draft)?;
    output::success(format!("Transaction {} updated.", short_id(&applied.value.id)));
    context.report_sync(&applied.sync);
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let reference = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: delete <id>".into()))?;
    let id = context.resolve_transaction_id(reference)?;
    let description = context
        .tracker
        .transaction(&id)
        .map(|txn| txn.description.clone())
        .unwrap_or_default();
    if !context.confirm(&format!("Delete \"{}\"?", description))? {
        output::info("Operation cancelled.");
        return Ok(());
    }
    let applied = context.tracker.delete_transaction(&id)?;
    output::success(format!("Deleted \"{}\".", applied.value.description));
    context.report_sync(&applied.sync);
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let label = context.tracker.period_label();
    output::section(format!("{} ({})", label.title, label.detail));
    let rows: Vec<String> = context
        .tracker
        .filtered()
        .into_iter()
        .map(|txn| {
            let sign = if txn.is_income() { "+" } else { "-" };
            format!(
                "  {}  {}  {:<7}  {}{:>12}  {}",
                short_id(&txn.id),
                txn.date.format("%Y-%m-%d"),
                txn.kind,
                sign,
                context.money(txn.amount),
                txn.description
            )
        })
        .collect();
    if rows.is_empty() {
        output::info("No transactions in this period.");
        return Ok(());
    }
    for row in &rows {
        output::info(row);
    }
    output::info(format!("  {} transaction(s)", rows.len()));
    Ok(())
}
