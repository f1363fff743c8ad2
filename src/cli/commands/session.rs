use tracing::info;

use crate::cli::commands::{arg, parse_arg, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::roles::{Role, Session};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "login",
            "Sign in as a role, optionally scoped to a branch or student",
            "login <role> [branch-id | student-id]",
            None,
            cmd_login,
        ),
        CommandDefinition::new("logout", "End the current session", "logout", None, cmd_logout),
        CommandDefinition::new("whoami", "Show the signed-in role and scope", "whoami", None, cmd_whoami),
    ]
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "login <role> [branch-id | student-id]";
    let role: Role = parse_arg(arg(args, 0, usage)?, "role")?;
    let scope = args
        .get(1)
        .map(|value| value.to_string())
        .or_else(|| role.is_branch_scoped().then(|| context.config.default_branch.clone()).flatten());

    let session = match (role, scope) {
        (Role::StudentParent, None) => {
            return Err(CommandError::InvalidArguments(
                "Students and parents sign in with their student id: login student <student-id>"
                    .into(),
            ))
        }
        (Role::StudentParent, Some(student_id)) => {
            let student = context.records()?.student(&student_id).ok_or_else(|| {
                CommandError::InvalidArguments(format!("Student `{}` not found", student_id))
            })?;
            Session::for_student(student.id.clone(), student.branch_id.clone())
        }
        (Role::SuperAdmin, Some(_)) => {
            return Err(CommandError::InvalidArguments(
                "Super admins are not limited to a branch".into(),
            ))
        }
        (role, Some(branch_id)) => {
            if let Ok(records) = context.records() {
                if records.branch(&branch_id).is_none() {
                    return Err(CommandError::InvalidArguments(format!(
                        "Branch `{}` not found",
                        branch_id
                    )));
                }
            }
            Session::for_branch(role, branch_id)
        }
        (role, None) => Session::new(role),
    };

    info!(role = session.role.slug(), branch = ?session.branch_id, "session started");
    output::success(format!("Signed in as {}.", describe(&session)));
    context.session = Some(session);
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.session.take() {
        Some(session) => output::success(format!("Signed out {}.", session.role)),
        None => output::info("No active session."),
    }
    Ok(())
}

fn cmd_whoami(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = context.session()?;
    output::info(format!("Signed in as {}.", describe(session)));
    let views: Vec<String> = session
        .role
        .views()
        .iter()
        .map(|view| format!("{:?}", view))
        .collect();
    output::info(format!("Views: {}", views.join(", ")));
    Ok(())
}

fn describe(session: &Session) -> String {
    match (&session.student_id, &session.branch_id) {
        (Some(student), _) => format!("{} for {}", session.role, student),
        (None, Some(branch)) => format!("{} ({})", session.role, branch),
        (None, None) => session.role.to_string(),
    }
}
