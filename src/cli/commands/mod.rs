use std::collections::HashMap;
use std::str::FromStr;

pub mod dashboard;
pub mod fee;
pub mod school;
pub mod score;
pub mod session;
pub mod store;
pub mod student;
pub mod system;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::roles::View;

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(session::definitions());
    commands.extend(store::definitions());
    commands.extend(dashboard::definitions());
    commands.extend(school::definitions());
    commands.extend(student::definitions());
    commands.extend(score::definitions());
    commands.extend(fee::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    /// View the signed-in role must hold; `None` runs without a session.
    pub view: Option<View>,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        view: Option<View>,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            view,
            handler,
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

/// Positional argument `index`, or a usage error naming the expected form.
pub(crate) fn arg<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("Usage: {}", usage)))
}

pub(crate) fn parse_arg<T>(value: &str, what: &str) -> Result<T, CommandError>
where
    T: FromStr,
{
    value
        .trim()
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{}` is not a valid {}", value, what)))
}

/// Joins the trailing arguments, so unquoted names with spaces still work.
pub(crate) fn rest(args: &[&str], from: usize) -> Option<String> {
    let joined = args.get(from..)?.join(" ");
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_name_is_unique() {
        let definitions = all_definitions();
        let registry = CommandRegistry::new(definitions.clone());
        assert_eq!(registry.iter().count(), definitions.len());
    }

    #[test]
    fn argument_helpers_report_usage() {
        let args = ["STU-0001", "Basic", "Science"];
        assert_eq!(arg(&args, 0, "x").unwrap(), "STU-0001");
        assert!(matches!(
            arg(&args, 5, "report <student> <term>"),
            Err(CommandError::InvalidArguments(message)) if message.contains("report <student>")
        ));
        assert_eq!(rest(&args, 1).as_deref(), Some("Basic Science"));
        assert_eq!(rest(&args, 3), None);
        assert!(parse_arg::<i64>("ten", "mark").is_err());
    }
}
