use chrono::NaiveDate;
use spendbook_domain::{ViewMode, YearMonth};

use crate::cli::core::{parse_date, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const VIEW_USAGE: &str =
    "usage: view [daily [date]|monthly [YYYY-MM]|yearly [YYYY]|custom <start> <end>|all]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "view",
            "Switch the period summaries and lists are scoped to",
            "view [daily [date]|monthly [YYYY-MM]|yearly [YYYY]|custom <start> <end>|all]",
            cmd_view,
        )
        .with_details(&[
            "daily [YYYY-MM-DD]   one day (default: selected or today)",
            "monthly [YYYY-MM]    one calendar month",
            "yearly [YYYY]        one calendar year",
            "custom <start> <end> inclusive date range",
            "all                  every transaction",
        ]),
        CommandEntry::new("next", "Move the view forward", "next [steps]", cmd_next),
        CommandEntry::new("prev", "Move the view back", "prev [steps]", cmd_prev),
        CommandEntry::new(
            "today",
            "Reset the view to the current period",
            "today",
            cmd_today,
        ),
        CommandEntry::new(
            "range",
            "Show an inclusive custom date range",
            "range <start> <end>",
            cmd_range,
        ),
        CommandEntry::new(
            "quick",
            "Show the range from <days> days ago through today",
            "quick <days>",
            cmd_quick,
        ),
    ]
}

fn cmd_view(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(first) = args.first() else {
        announce(context);
        return Ok(());
    };
    let mode = ViewMode::parse(first)
        .ok_or_else(|| CommandError::InvalidArguments(VIEW_USAGE.into()))?;
    let value = args.get(1).copied();
    match (mode, value) {
        (ViewMode::Daily, Some(date)) => context.tracker.select_day(parse_date(date)?),
        (ViewMode::Monthly, Some(month)) => {
            let month = YearMonth::parse(month).map_err(|_| {
                CommandError::InvalidArguments(format!("invalid month `{}` (use YYYY-MM)", month))
            })?;
            context.tracker.select_month(month);
        }
        (ViewMode::Yearly, Some(year)) => {
            let year = year
                .parse::<i32>()
                .ok()
                .filter(|year| NaiveDate::from_ymd_opt(*year, 1, 1).is_some())
                .ok_or_else(|| CommandError::InvalidArguments(format!("invalid year `{}`", year)))?;
            context.tracker.select_year(year);
        }
        (ViewMode::Custom, Some(_)) => return cmd_range(context, &args[1..]),
        (mode, _) => context.tracker.switch_view(mode),
    }
    announce(context);
    Ok(())
}

fn parse_steps(args: &[&str]) -> Result<i32, CommandError> {
    match args.first() {
        Some(value) => value
            .parse::<i32>()
            .ok()
            .filter(|steps| *steps > 0)
            .ok_or_else(|| CommandError::InvalidArguments(format!("invalid step count `{}`", value))),
        None => Ok(1),
    }
}

fn cmd_next(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let steps = parse_steps(args)?;
    context.tracker.navigate(steps)?;
    announce(context);
    Ok(())
}

fn cmd_prev(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let steps = parse_steps(args)?;
    context.tracker.navigate(-steps)?;
    announce(context);
    Ok(())
}

fn cmd_today(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.tracker.go_to_current();
    announce(context);
    Ok(())
}

fn cmd_range(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: range <start> <end>".into(),
        ));
    }
    let start = parse_date(args[0])?;
    let end = parse_date(args[1])?;
    context.tracker.apply_custom_range(Some(start), Some(end))?;
    announce(context);
    Ok(())
}

fn cmd_quick(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let days = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: quick <days>".into()))?;
    let days = days
        .parse::<i64>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid day count `{}`", days)))?;
    context.tracker.apply_quick_range(days)?;
    announce(context);
    Ok(())
}

fn announce(context: &ShellContext) {
    let label = context.tracker.period_label();
    output::info(format!(
        "Viewing {}: {} ({})",
        context.tracker.view().mode,
        label.title,
        label.detail
    ));
}
