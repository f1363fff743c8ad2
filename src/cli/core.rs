use std::io;
use std::path::PathBuf;

use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::config::{Config, ConfigManager};
use crate::core::services::ServiceError;
use crate::core::store_manager::{LoadReport, StoreManager};
use crate::core::utils::PathResolver;
use crate::errors::SchoolError;
use crate::records::{SchoolRecords, Student};
use crate::roles::{Session, View};
use crate::storage::JsonStorage;

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::output::{self, OutputPreferences};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No record store open. Use `open <name>`, `new <name>` or `seed`.")]
    StoreNotLoaded,
    #[error("Not signed in. Use `login <role>` first.")]
    NotSignedIn,
    #[error("{role} cannot access {view:?}")]
    Forbidden { role: String, view: View },
    #[error("{0}")]
    OutOfScope(String),
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(SchoolError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<SchoolError> for CommandError {
    fn from(err: SchoolError) -> Self {
        match err {
            SchoolError::NotLoaded => CommandError::StoreNotLoaded,
            SchoolError::InvalidInput(message) => CommandError::InvalidArguments(message),
            other => CommandError::Core(other),
        }
    }
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Records(err) => err.into(),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] SchoolError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Everything a command handler may touch: the open store, the signed-in
/// session and persisted preferences.
pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) registry: CommandRegistry,
    pub(crate) manager: StoreManager,
    pub(crate) config_manager: ConfigManager,
    pub(crate) config: Config,
    pub(crate) session: Option<Session>,
    pub(crate) theme: ColorfulTheme,
    pub(crate) running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir())
    }

    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let storage = JsonStorage::new(Some(base.clone()), None)?;
        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        output::set_preferences(OutputPreferences {
            plain: mode == CliMode::Script,
            quiet: false,
        });

        let mut context = ShellContext {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            manager: StoreManager::new(Box::new(storage)),
            config_manager,
            config,
            session: None,
            theme: ColorfulTheme::default(),
            running: true,
        };
        context.auto_load_last();
        Ok(context)
    }

    fn auto_load_last(&mut self) {
        if self.mode != CliMode::Interactive {
            return;
        }
        let Some(name) = self.config.last_opened_store.clone() else {
            return;
        };
        match self.manager.load(&name) {
            Ok(report) => {
                self.report_load(&report);
                output::success(format!("Reopened last store `{}`.", name));
            }
            Err(err) => output::warning(format!("Could not reopen `{}`: {}", name, err)),
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        let store = match self.manager.current_name() {
            Some(name) if self.manager.is_dirty() => format!("{}*", name),
            Some(name) => name.to_string(),
            None => "no store".into(),
        };
        let who = match &self.session {
            Some(session) => match session.branch_scope() {
                Some(branch) => format!("{}@{}", session.role.slug(), branch),
                None => session.role.slug().to_string(),
            },
            None => "guest".into(),
        };
        format!("school [{} | {}]> ", store, who)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(definition) = self.registry.get(command).cloned() else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        if let Some(view) = definition.view {
            self.require_view(view)?;
        }
        match (definition.handler)(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, input), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Did you mean `{}`?", name));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::NotSignedIn => {
                output::error(CommandError::NotSignedIn);
                output::hint("Roles: super-admin, branch-admin, teacher, student, bursar, librarian, receptionist.");
            }
            other => output::error(other.to_string()),
        }
    }

    /// Asks before leaving with unsaved changes. Script runs never block.
    pub(crate) fn confirm_exit(&self) -> Result<bool, CommandError> {
        if !self.manager.is_dirty() {
            return Ok(true);
        }
        if self.mode == CliMode::Script {
            output::warning("Exiting with unsaved changes.");
            return Ok(true);
        }
        self.confirm("Discard unsaved changes and exit?", false)
    }

    pub(crate) fn confirm(&self, prompt: &str, default: bool) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(CommandError::from)
    }

    pub(crate) fn session(&self) -> Result<&Session, CommandError> {
        self.session.as_ref().ok_or(CommandError::NotSignedIn)
    }

    pub(crate) fn require_view(&self, view: View) -> CommandResult {
        let session = self.session()?;
        if session.permits(view) {
            Ok(())
        } else {
            Err(CommandError::Forbidden {
                role: session.role.title().to_string(),
                view,
            })
        }
    }

    pub(crate) fn records(&self) -> Result<&SchoolRecords, CommandError> {
        self.manager.records().map_err(CommandError::from)
    }

    /// Applies a mutation to the open store; the store is only marked unsaved
    /// when the mutation succeeds.
    pub(crate) fn with_records_mut<T>(
        &mut self,
        f: impl FnOnce(&mut SchoolRecords) -> Result<T, CommandError>,
    ) -> Result<T, CommandError> {
        self.manager.with_records_mut(f)
    }

    /// Branch filter for listings: the session scope wins over any request.
    pub(crate) fn branch_filter(&self, requested: Option<&str>) -> Result<Option<String>, CommandError> {
        let session = self.session()?;
        match (session.branch_scope(), requested) {
            (Some(scope), Some(requested)) if scope != requested => Err(CommandError::OutOfScope(
                format!("Your session is limited to branch {}", scope),
            )),
            (Some(scope), _) => Ok(Some(scope.to_string())),
            (None, requested) => Ok(requested.map(String::from)),
        }
    }

    pub(crate) fn ensure_branch_visible(&self, branch_id: &str) -> CommandResult {
        if self.session()?.can_see_branch(branch_id) {
            Ok(())
        } else {
            Err(CommandError::OutOfScope(format!(
                "Branch {} is outside your session",
                branch_id
            )))
        }
    }

    /// Looks up a student the session is allowed to see.
    pub(crate) fn visible_student(&self, student_id: &str) -> Result<Student, CommandError> {
        let session = self.session()?;
        let student = self
            .records()?
            .student(student_id)
            .cloned()
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!("Student `{}` not found", student_id))
            })?;
        if session.can_see_student(&student.id, &student.branch_id) {
            Ok(student)
        } else {
            Err(CommandError::OutOfScope(format!(
                "Student {} is outside your session",
                student.id
            )))
        }
    }

    pub(crate) fn currency(&self) -> &str {
        &self.config.currency
    }

    pub(crate) fn remember_store(&mut self) {
        let name = self.manager.current_name().map(String::from);
        if self.config.last_opened_store == name {
            return;
        }
        self.config.last_opened_store = name;
        if let Err(err) = self.config_manager.save(&self.config) {
            output::warning(format!("Could not update preferences: {}", err));
        }
    }

    pub(crate) fn report_load(&self, report: &LoadReport) {
        for warning in &report.warnings {
            output::warning(warning);
        }
    }
}
