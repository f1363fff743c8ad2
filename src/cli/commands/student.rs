use chrono::Local;

use crate::cli::commands::{arg, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::table::{Align, Table};
use crate::core::services::{NewStudent, StudentService};
use crate::currency::format_amount;
use crate::roles::View;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "student-add",
            "Admit a student into a branch and class",
            "student-add <branch-id> <class> <name> [guardian]",
            Some(View::Admissions),
            cmd_student_add,
        ),
        CommandDefinition::new(
            "student-class",
            "Move a student to another class",
            "student-class <student-id> <class>",
            Some(View::Admissions),
            cmd_student_class,
        ),
        CommandDefinition::new(
            "students",
            "List students",
            "students [class] [branch-id]",
            Some(View::Students),
            cmd_students,
        ),
    ]
}

fn cmd_student_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "student-add <branch-id> <class> <name> [guardian]";
    let branch_id = arg(args, 0, usage)?;
    let class_id = arg(args, 1, usage)?;
    let name = arg(args, 2, usage)?;
    context.ensure_branch_visible(branch_id)?;
    let admission = NewStudent {
        name,
        class_id,
        branch_id,
        guardian: args.get(3).copied(),
        enrolled_on: Local::now().date_naive(),
    };
    let id = context.with_records_mut(|records| {
        StudentService::admit(records, admission).map_err(CommandError::from)
    })?;
    output::success(format!("Admitted {} as {}.", name, id));
    Ok(())
}

fn cmd_student_class(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "student-class <student-id> <class>";
    let student = context.visible_student(arg(args, 0, usage)?)?;
    let class_id = arg(args, 1, usage)?;
    context.with_records_mut(|records| {
        StudentService::change_class(records, &student.id, class_id).map_err(CommandError::from)
    })?;
    let records = context.records()?;
    let ledger = records.ledger(StudentService::find(records, &student.id)?);
    output::success(format!(
        "{} moved to {}; fees now {}.",
        student.id,
        ledger.class_id,
        format_amount(ledger.expected, context.currency())
    ));
    Ok(())
}

fn cmd_students(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let class = args.first().copied();
    let branch = context.branch_filter(args.get(1).copied())?;
    let records = context.records()?;
    let mut table = Table::new()
        .column("ID", Align::Left)
        .column("Name", Align::Left)
        .column("Class", Align::Left)
        .column("Branch", Align::Left)
        .column("Guardian", Align::Left);
    for student in records.students_filtered(branch.as_deref(), class) {
        table.row([
            student.id.clone(),
            student.name.clone(),
            student.class_id.clone(),
            student.branch_id.clone(),
            student.guardian.clone().unwrap_or_default(),
        ]);
    }
    if table.is_empty() {
        output::info("No students match.");
    } else {
        table.print();
    }
    Ok(())
}
