//! Command definitions grouped by concern. Registration order is the order
//! shown by `help`.

pub mod backup;
pub mod category;
pub mod config;
pub mod exchange;
pub mod report;
pub mod system;
pub mod transaction;
pub mod view;

use crate::cli::registry::{CommandEntry, CommandRegistry};

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(transaction::definitions());
    commands.extend(view::definitions());
    commands.extend(report::definitions());
    commands.extend(category::definitions());
    commands.extend(exchange::definitions());
    commands.extend(backup::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in all_definitions() {
        registry.register(entry);
    }
}
