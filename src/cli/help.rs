use crate::cli::commands::{CommandDefinition, CommandRegistry};
use crate::cli::output;
use crate::roles::Session;

/// Lists commands; with a session, only the ones its role may run.
pub fn print_overview(registry: &CommandRegistry, session: Option<&Session>) {
    output::section("Available commands");
    for entry in registry.iter() {
        let allowed = match (entry.view, session) {
            (None, _) => true,
            (Some(view), Some(session)) => session.permits(view),
            (Some(_), None) => true,
        };
        if allowed {
            output::info(format!("  {:<12} {}", entry.name, entry.description));
        }
    }
    output::info("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandDefinition) {
    output::section(format!("Help: {}", entry.name));
    output::info(format!("  Description: {}", entry.description));
    output::info(format!("  Usage: {}", entry.usage));
    if let Some(view) = entry.view {
        output::info(format!("  Requires: {:?} view", view));
    }
}
