use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::core::services::FeeService;
use crate::currency::format_amount;
use crate::records::Term;
use crate::roles::View;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "dashboard",
        "Overview for the signed-in role",
        "dashboard",
        Some(View::Overview),
        cmd_dashboard,
    )]
}

fn cmd_dashboard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = context.session()?.clone();
    let records = context.records()?;
    let currency = context.currency();
    output::section(format!("{} dashboard", session.role));

    if let Some(student_id) = &session.student_id {
        let student = context.visible_student(student_id)?;
        output::info(format!("{} ({}) in {}", student.name, student.id, student.class_id));
        let view = records.ledger(&student);
        output::info(format!(
            "Fees: {} paid of {} ({})",
            format_amount(view.total_paid, currency),
            format_amount(view.expected, currency),
            view.status
        ));
        for term in [Term::First, Term::Second, Term::Third] {
            let subjects = records.scores_for(&student.id, term).count();
            if subjects > 0 {
                output::info(format!("{}: {} subjects graded", term, subjects));
            }
        }
        return Ok(());
    }

    let branch = session.branch_scope();
    if branch.is_none() {
        output::info(format!("Schools  : {}", records.schools.len()));
        output::info(format!("Branches : {}", records.branches.len()));
    } else if let Some(found) = branch.and_then(|id| records.branch(id)) {
        output::info(format!("Branch   : {} ({})", found.name, found.id));
    }
    output::info(format!(
        "Students : {}",
        records.students_filtered(branch, None).count()
    ));
    if session.permits(View::Staff) {
        let staff = records
            .staff
            .iter()
            .filter(|member| branch.map_or(true, |b| member.branch_id == b))
            .count();
        output::info(format!("Staff    : {}", staff));
    }
    if session.permits(View::Scores) {
        let classes: Vec<String> = records
            .students_filtered(branch, None)
            .map(|student| student.class_id.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        output::info(format!("Classes  : {}", classes.join(", ")));
    }
    if session.permits(View::Ledger) {
        let summary = FeeService::collection(records, branch, None);
        output::info(format!(
            "Fees     : {} of {} collected ({:.1}%), {} outstanding",
            format_amount(summary.collected, currency),
            format_amount(summary.expected, currency),
            summary.collection_rate(),
            format_amount(summary.outstanding, currency)
        ));
        output::info(format!(
            "Status   : {} paid, {} partial, {} unpaid",
            summary.paid, summary.partial, summary.unpaid
        ));
    }
    Ok(())
}
