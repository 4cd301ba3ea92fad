use spendbook_core::{InsightTone, MAX_TREND_DAYS};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Show totals and daily averages for the current view",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "insights",
            "Compare this month with earlier spending",
            "insights",
            cmd_insights,
        ),
        CommandEntry::new(
            "trend",
            "Show the income and expense series for the current view",
            "trend [days]",
            cmd_trend,
        )
        .with_details(&["[days] only applies to the daily view (default: config trend_days)."]),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let label = context.tracker.period_label();
    let summary = context.tracker.summary();
    output::section(format!("{} ({})", label.title, label.detail));
    output::info(format!("  Income       : {}", context.money(summary.total_income)));
    output::info(format!("  Expenses     : {}", context.money(summary.total_expense)));
    output::info(format!("  Balance      : {}", context.money(summary.balance)));
    output::info(format!("  Avg income   : {}/day", context.money(summary.avg_income)));
    output::info(format!("  Avg expenses : {}/day", context.money(summary.avg_expense)));
    output::info(format!("  Avg balance  : {}/day", context.money(summary.avg_balance)));
    output::info(format!(
        "  Days         : {} ({} transactions)",
        summary.day_count, summary.transaction_count
    ));
    if let Some(rate) = summary.savings_rate() {
        output::info(format!("  Savings rate : {}%", rate));
    }
    Ok(())
}

fn cmd_insights(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Insights");
    let money = |amount: f64| context.money(amount);
    for insight in context.tracker.insights() {
        let mut line = format!("{}: {}", insight.headline(), insight.detail(money));
        if let Some(value) = insight.value(money) {
            line.push_str(&format!(" ({value})"));
        }
        match insight.tone() {
            InsightTone::Positive => output::success(line),
            InsightTone::Warning => output::warning(line),
            InsightTone::Negative => output::error(line),
            InsightTone::Neutral => output::info(line),
        }
    }
    Ok(())
}

fn cmd_trend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let days = match args.first() {
        Some(value) => value
            .parse::<u32>()
            .ok()
            .filter(|days| (1..=MAX_TREND_DAYS).contains(days))
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "invalid day count `{}` (1 to {MAX_TREND_DAYS})",
                    value
                ))
            })?,
        None => context.config.trend_days,
    };
    let trend = context.tracker.trend(days)?;
    output::section(&trend.title);
    if trend.buckets.is_empty() {
        output::info("No data to chart yet.");
        return Ok(());
    }
    output::info(format!(
        "  {:<12} {:>14} {:>14} {:>14}",
        "Period", "Income", "Expenses", "Savings"
    ));
    for bucket in &trend.buckets {
        output::info(format!(
            "  {:<12} {:>14} {:>14} {:>14}",
            bucket.label,
            context.money(bucket.income),
            context.money(bucket.expense),
            context.money(bucket.savings())
        ));
    }
    for highlight in &trend.highlights {
        output::info(format!("  * {}", highlight.describe(|amount| context.money(amount))));
    }
    Ok(())
}
