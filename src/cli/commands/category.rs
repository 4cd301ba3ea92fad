use crate::cli::core::{take_option, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const CATEGORY_USAGE: &str = "usage: category <add|edit|delete|switch|list|next|prev>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "category",
        "Manage categories and pick the active one",
        "category <add|edit|delete|switch|list|next|prev>",
        cmd_category,
    )
    .with_details(&[
        "add <name...> [--icon <icon>]",
        "edit <slug> <name...> [--icon <icon>]",
        "delete <slug>        removes the category and its transactions",
        "switch <slug>",
        "list | next | prev",
    ])]
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        return list_categories(context);
    };

    match action.to_lowercase().as_str() {
        "add" => add_category(context, rest),
        "edit" => edit_category(context, rest),
        "delete" | "remove" => delete_category(context, rest),
        "switch" | "use" => {
            let slug = rest.first().ok_or_else(|| {
                CommandError::InvalidArguments("usage: category switch <slug>".into())
            })?;
            context.tracker.switch_category(slug)?;
            announce_active(context);
            Ok(())
        }
        "list" => list_categories(context),
        "next" => {
            context.tracker.next_category();
            announce_active(context);
            Ok(())
        }
        "prev" | "previous" => {
            context.tracker.previous_category();
            announce_active(context);
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(CATEGORY_USAGE.into())),
    }
}

fn add_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (icon, name) = take_option(args, "--icon", "-i")?;
    if name.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: category add <name...> [--icon <icon>]".into(),
        ));
    }
    let applied = context.tracker.add_category(&name.join(" "), icon)?;
    output::success(format!("Category `{}` created.", applied.value));
    context.report_sync(&applied.sync);
    Ok(())
}

fn edit_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (icon, rest) = take_option(args, "--icon", "-i")?;
    if rest.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: category edit <slug> <name...> [--icon <icon>]".into(),
        ));
    }
    let applied = context
        .tracker
        .edit_category(rest[0], &rest[1..].join(" "), icon)?;
    output::success(format!("Category `{}` updated.", rest[0]));
    context.report_sync(&applied.sync);
    Ok(())
}

fn delete_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let slug = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: category delete <slug>".into()))?;
    let count = context
        .tracker
        .book()
        .category(slug)
        .map(|category| category.transactions.len())
        .unwrap_or(0);
    let prompt = format!("Delete `{}` and its {} transaction(s)?", slug, count);
    if !context.confirm(&prompt)? {
        output::info("Operation cancelled.");
        return Ok(());
    }
    let applied = context.tracker.delete_category(slug)?;
    output::success(format!("Category `{}` deleted.", applied.value.name));
    context.report_sync(&applied.sync);
    Ok(())
}

fn list_categories(context: &ShellContext) -> CommandResult {
    output::section("Categories");
    let active = context.tracker.book().active_slug();
    for (slug, category) in context.tracker.categories() {
        let marker = if slug == active { "*" } else { " " };
        output::info(format!(
            "{} {:<16} {:<24} {:>4} txn  {}",
            marker,
            slug,
            category.name,
            category.transactions.len(),
            category.icon
        ));
    }
    Ok(())
}

fn announce_active(context: &ShellContext) {
    let book = context.tracker.book();
    let name = book
        .active()
        .map(|category| category.name.as_str())
        .unwrap_or_default();
    output::info(format!("Active category: {} [{}]", name, book.active_slug()));
}
