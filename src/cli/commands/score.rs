use crate::cli::commands::{arg, parse_arg, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::table::{Align, Table};
use crate::core::services::ScoreService;
use crate::grading::{band_for, class_standings, report_card, EvaluatedScore, ScoreComponents, ScoreField};
use crate::records::Term;
use crate::roles::View;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "score-set",
            "Enter all four marks for a subject",
            "score-set <student-id> <subject> <term> <test1> <test2> <assignment> <exam>",
            Some(View::Scores),
            cmd_score_set,
        ),
        CommandDefinition::new(
            "score-edit",
            "Change one mark and regrade",
            "score-edit <student-id> <subject> <term> <test1|test2|assignment|exam> <value>",
            Some(View::Scores),
            cmd_score_edit,
        ),
        CommandDefinition::new(
            "grade",
            "Look up the grade for a total",
            "grade <total>",
            Some(View::Overview),
            cmd_grade,
        ),
        CommandDefinition::new(
            "report",
            "Show a student's report card for a term",
            "report <student-id> <term>",
            Some(View::Reports),
            cmd_report,
        ),
        CommandDefinition::new(
            "ranking",
            "Rank a class by term average",
            "ranking <class> <term> [branch-id]",
            Some(View::Reports),
            cmd_ranking,
        ),
    ]
}

fn parse_mark(field: ScoreField, raw: &str) -> Result<i64, CommandError> {
    let value: i64 = parse_arg(raw, &format!("{} mark", field.label()))?;
    if field.clamp(value) as i64 != value {
        output::warning(format!(
            "{} limited to the range 0-{}; stored {}.",
            field.label(),
            field.cap(),
            field.clamp(value)
        ));
    }
    Ok(value)
}

fn print_evaluated(subject: &str, evaluated: &EvaluatedScore) {
    output::success(format!(
        "{}: {} + {} + {} + {} = {} ({}, {})",
        subject,
        evaluated.components.test1(),
        evaluated.components.test2(),
        evaluated.components.assignment(),
        evaluated.components.exam(),
        evaluated.total,
        evaluated.grade,
        evaluated.remark
    ));
}

fn cmd_score_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "score-set <student-id> <subject> <term> <test1> <test2> <assignment> <exam>";
    let student = context.visible_student(arg(args, 0, usage)?)?;
    let subject = arg(args, 1, usage)?;
    let term: Term = parse_arg(arg(args, 2, usage)?, "term")?;
    let mut marks = [0_i64; 4];
    for (index, field) in ScoreField::ALL.into_iter().enumerate() {
        marks[index] = parse_mark(field, arg(args, 3 + index, usage)?)?;
    }
    let components = ScoreComponents::clamped(marks[0], marks[1], marks[2], marks[3]);
    let evaluated = context.with_records_mut(|records| {
        ScoreService::record(records, &student.id, subject, term, components)
            .map_err(CommandError::from)
    })?;
    print_evaluated(subject, &evaluated);
    Ok(())
}

fn cmd_score_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "score-edit <student-id> <subject> <term> <test1|test2|assignment|exam> <value>";
    let student = context.visible_student(arg(args, 0, usage)?)?;
    let subject = arg(args, 1, usage)?;
    let term: Term = parse_arg(arg(args, 2, usage)?, "term")?;
    let field: ScoreField = parse_arg(arg(args, 3, usage)?, "score field")?;
    let value = parse_mark(field, arg(args, 4, usage)?)?;
    let evaluated = context.with_records_mut(|records| {
        ScoreService::edit_field(records, &student.id, subject, term, field, value)
            .map_err(CommandError::from)
    })?;
    print_evaluated(subject, &evaluated);
    Ok(())
}

fn cmd_grade(_context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let total: u32 = parse_arg(arg(args, 0, "grade <total>")?, "total")?;
    let band = band_for(total)?;
    output::info(format!(
        "{} -> {} ({}), band {}-{}",
        total, band.grade, band.remark, band.min, band.max
    ));
    Ok(())
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "report <student-id> <term>";
    let student = context.visible_student(arg(args, 0, usage)?)?;
    let term: Term = parse_arg(arg(args, 1, usage)?, "term")?;
    let card = report_card(context.records()?, &student.id, term)?;

    output::section(format!("Report card: {} ({})", card.student_name, card.student_id));
    output::info(format!("Class {} | {}", card.class_id, card.term));
    if card.lines.is_empty() {
        output::info("No scores recorded for this term.");
        output::info(format!("Promotion: {}", card.promotion));
        return Ok(());
    }

    let mut table = Table::new()
        .column("Subject", Align::Left)
        .column("T1", Align::Right)
        .column("T2", Align::Right)
        .column("Asg", Align::Right)
        .column("Exam", Align::Right)
        .column("Total", Align::Right)
        .column("Grade", Align::Left)
        .column("Remark", Align::Left);
    for line in &card.lines {
        let score = &line.score;
        table.row([
            line.subject.clone(),
            score.components.test1().to_string(),
            score.components.test2().to_string(),
            score.components.assignment().to_string(),
            score.components.exam().to_string(),
            score.total.to_string(),
            score.grade.to_string(),
            score.remark.to_string(),
        ]);
    }
    table.print();
    output::info(format!(
        "Grand total {} | Average {:.2} | Passed {}/{}",
        card.grand_total,
        card.average,
        card.subjects_passed(),
        card.lines.len()
    ));
    if let Some(position) = card.position {
        output::info(format!("Position {} of {}", position, card.class_size));
    }
    output::info(format!("Promotion: {}", card.promotion));
    Ok(())
}

fn cmd_ranking(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "ranking <class> <term> [branch-id]";
    if context.session()?.student_id.is_some() {
        return Err(CommandError::OutOfScope(
            "Class rankings are not available to student sessions".into(),
        ));
    }
    let class = arg(args, 0, usage)?;
    let term: Term = parse_arg(arg(args, 1, usage)?, "term")?;
    let branch = context
        .branch_filter(args.get(2).copied())?
        .ok_or_else(|| CommandError::InvalidArguments(format!("Usage: {}", usage)))?;
    let records = context.records()?;
    let standings = class_standings(records, class, &branch, term);
    if standings.is_empty() {
        output::info("No scores recorded for that class and term.");
        return Ok(());
    }
    output::section(format!("{} {} ({})", class.to_ascii_uppercase(), term, branch));
    let mut table = Table::new()
        .column("Pos", Align::Right)
        .column("ID", Align::Left)
        .column("Name", Align::Left)
        .column("Total", Align::Right)
        .column("Average", Align::Right);
    for row in &standings {
        let name = records
            .student(&row.student_id)
            .map(|student| student.name.clone())
            .unwrap_or_default();
        table.row([
            row.position.to_string(),
            row.student_id.clone(),
            name,
            row.grand_total.to_string(),
            format!("{:.2}", row.average),
        ]);
    }
    table.print();
    Ok(())
}
