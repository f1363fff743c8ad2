use std::collections::BTreeMap;
use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output;
use crate::records::StaffRole;
use crate::roles::Role;

/// Set to any value to read commands from stdin without prompts or colour.
pub const SCRIPT_ENV: &str = "SCHOOL_CORE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    output::section("School Core console");
    output::info("Type `help` for commands or `login <role>` to begin.");

    let mut editor = Editor::<ConsoleHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(ConsoleHelper::new(context)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    while context.running {
        // Logins and store switches change what may be completed.
        if let Some(helper) = editor.helper_mut() {
            helper.refresh(context);
        }
        match editor.readline(&context.prompt()) {
            Ok(line) if line.trim().is_empty() => {}
            Ok(line) => {
                editor.add_history_entry(line.trim()).ok();
                execute(context, &line);
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                if context.confirm_exit()? {
                    context.running = false;
                }
            }
            Err(err) => return Err(err.into()),
        }
    }
    output::info("Goodbye.");
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        execute(context, &line?);
        if !context.running {
            return Ok(());
        }
    }
    // End of input is treated like `exit`.
    context.confirm_exit()?;
    Ok(())
}

/// Runs one console line. Failures are reported and the session carries on.
fn execute(context: &mut ShellContext, line: &str) {
    let outcome = tokenize(line).and_then(|tokens| match tokens.split_first() {
        Some((raw, rest)) => {
            let args: Vec<&str> = rest.iter().map(String::as_str).collect();
            context.dispatch(&raw.to_lowercase(), raw, &args)
        }
        None => Ok(LoopControl::Continue),
    });
    match outcome {
        Ok(LoopControl::Continue) => {}
        Ok(LoopControl::Exit) => context.running = false,
        Err(err) => context.report_error(err),
    }
}

/// Splits a console line with shell quoting, so `"Basic Science"` stays one argument.
pub(crate) fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    shell_words::split(line)
        .map_err(|err| CommandError::InvalidArguments(format!("Could not read line: {}", err)))
}

/// Values offered for arguments, drawn from the open store and limited to the session.
#[derive(Debug, Default)]
struct Vocabulary {
    commands: Vec<&'static str>,
    students: Vec<String>,
    classes: Vec<String>,
    branches: Vec<String>,
    schools: Vec<String>,
}

/// Tab completion for the console: command names the signed-in role may run,
/// then argument values picked by the placeholders in each command's usage line.
struct ConsoleHelper {
    slots: BTreeMap<&'static str, Vec<&'static str>>,
    words: Vocabulary,
}

impl ConsoleHelper {
    fn new(context: &ShellContext) -> Self {
        let slots = context
            .registry
            .iter()
            .map(|definition| (definition.name, placeholders(definition.usage)))
            .collect();
        let mut helper = Self {
            slots,
            words: Vocabulary::default(),
        };
        helper.refresh(context);
        helper
    }

    fn refresh(&mut self, context: &ShellContext) {
        let session = context.session.as_ref();
        let mut words = Vocabulary {
            commands: context
                .registry
                .iter()
                .filter(|definition| {
                    definition
                        .view
                        .map_or(true, |view| session.map_or(false, |s| s.permits(view)))
                })
                .map(|definition| definition.name)
                .collect(),
            ..Vocabulary::default()
        };
        words.commands.sort_unstable();

        if let Ok(records) = context.records() {
            words.students = records
                .students
                .iter()
                .filter(|student| {
                    session.map_or(true, |s| s.can_see_student(&student.id, &student.branch_id))
                })
                .map(|student| student.id.clone())
                .collect();
            words.classes = records.classes();
            words.branches = records
                .branches
                .iter()
                .filter(|branch| session.map_or(true, |s| s.can_see_branch(&branch.id)))
                .map(|branch| branch.id.clone())
                .collect();
            words.schools = records.schools.iter().map(|school| school.id.clone()).collect();
        }
        self.words = words;
    }

    /// Candidates for argument `index` of `command`.
    fn argument_values(&self, command: &str, index: usize) -> Vec<String> {
        if !self.words.commands.iter().any(|name| *name == command) {
            return Vec::new();
        }
        let Some(slot) = self.slots.get(command).and_then(|slots| slots.get(index)) else {
            return Vec::new();
        };
        // `[cash|transfer|card|cheque]` style slots list their literal choices.
        if slot.contains('|') && !slot.contains(char::is_whitespace) {
            return slot.split('|').map(String::from).collect();
        }

        let mut values = Vec::new();
        match *slot {
            "role" if command == "login" => {
                values.extend(Role::ALL.iter().map(|role| role.slug().to_string()))
            }
            "role" => values.extend(
                StaffRole::ALL
                    .iter()
                    .map(|role| role.label().to_ascii_lowercase().replace(' ', "-")),
            ),
            "term" => values.extend(["1", "2", "3"].map(String::from)),
            "command" => values.extend(self.words.commands.iter().map(|name| name.to_string())),
            _ => {}
        }
        if slot.contains("student-id") {
            values.extend(self.words.students.iter().cloned());
        }
        if slot.contains("class") {
            values.extend(self.words.classes.iter().cloned());
        }
        if slot.contains("branch-id") {
            values.extend(self.words.branches.iter().cloned());
        }
        if slot.contains("school-id") {
            values.extend(self.words.schools.iter().cloned());
        }
        values
    }

    /// Returns the byte offset of the word being completed and its matches.
    fn complete_words(&self, before_cursor: &str) -> (usize, Vec<String>) {
        let start = before_cursor
            .char_indices()
            .rev()
            .find(|(_, ch)| ch.is_whitespace())
            .map_or(0, |(idx, ch)| idx + ch.len_utf8());
        let needle = before_cursor[start..].to_ascii_lowercase();
        let mut finished = before_cursor[..start].split_whitespace();
        let pool = match finished.next() {
            None => self
                .words
                .commands
                .iter()
                .map(|name| name.to_string())
                .collect(),
            Some(command) => self.argument_values(&command.to_ascii_lowercase(), finished.count()),
        };
        let matches = pool
            .into_iter()
            .filter(|word| word.to_ascii_lowercase().starts_with(&needle))
            .collect();
        (start, matches)
    }
}

/// Bracketed placeholders of a usage line, e.g. `["student-id", "term"]` for
/// `report <student-id> <term>`.
fn placeholders(usage: &str) -> Vec<&str> {
    let mut slots = Vec::new();
    let mut rest = usage;
    while let Some(open) = rest.find(['<', '[']) {
        let close = if rest[open..].starts_with('<') { '>' } else { ']' };
        let Some(len) = rest[open + 1..].find(close) else {
            break;
        };
        slots.push(rest[open + 1..open + 1 + len].trim());
        rest = &rest[open + 1 + len + 1..];
    }
    slots
}

impl Helper for ConsoleHelper {}

impl Completer for ConsoleHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = self.complete_words(&line[..pos]);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ConsoleHelper {
    type Hint = String;
}

impl Highlighter for ConsoleHelper {}

impl Validator for ConsoleHelper {}
