use chrono::{Local, NaiveDate};

use crate::cli::commands::{arg, parse_arg, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::table::{Align, Table};
use crate::core::services::{FeeService, PaymentRequest};
use crate::currency::{format_amount, parse_amount};
use crate::fees::{LedgerView, PaymentMethod};
use crate::roles::View;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "fee-set",
            "Set the fee structure for a class",
            "fee-set <class> <tuition> <development> <other>",
            Some(View::FeeStructures),
            cmd_fee_set,
        ),
        CommandDefinition::new(
            "fees",
            "List fee structures",
            "fees",
            Some(View::FeeStructures),
            cmd_fees,
        ),
        CommandDefinition::new(
            "pay",
            "Record a fee payment",
            "pay <student-id> <amount> [cash|transfer|card|cheque] [reference] [YYYY-MM-DD]",
            Some(View::Payments),
            cmd_pay,
        ),
        CommandDefinition::new(
            "payments",
            "Show the payment log",
            "payments [student-id]",
            Some(View::Payments),
            cmd_payments,
        ),
        CommandDefinition::new(
            "ledger",
            "Show expected, paid and balance per student",
            "ledger [student-id | class]",
            Some(View::Ledger),
            cmd_ledger,
        ),
        CommandDefinition::new(
            "collection",
            "Summarize fee collection",
            "collection [class]",
            Some(View::Payments),
            cmd_collection,
        ),
    ]
}

fn amount_arg(context: &ShellContext, raw: &str) -> Result<i64, CommandError> {
    Ok(parse_amount(raw, context.currency())?)
}

fn cmd_fee_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "fee-set <class> <tuition> <development> <other>";
    let class = arg(args, 0, usage)?;
    let tuition = amount_arg(context, arg(args, 1, usage)?)?;
    let development = amount_arg(context, arg(args, 2, usage)?)?;
    let other = amount_arg(context, arg(args, 3, usage)?)?;
    let structure = context.with_records_mut(|records| {
        FeeService::set_structure(records, class, tuition, development, other)
            .map_err(CommandError::from)
    })?;
    output::success(format!(
        "{} fees set to {}.",
        structure.class_id,
        format_amount(structure.total(), context.currency())
    ));
    Ok(())
}

fn cmd_fees(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let records = context.records()?;
    let currency = context.currency();
    if records.fee_structures.is_empty() {
        output::info("No fee structures defined.");
        return Ok(());
    }
    let mut table = Table::new()
        .column("Class", Align::Left)
        .column("Tuition", Align::Right)
        .column("Development", Align::Right)
        .column("Other", Align::Right)
        .column("Total", Align::Right);
    for structure in &records.fee_structures {
        table.row([
            structure.class_id.clone(),
            format_amount(structure.tuition, currency),
            format_amount(structure.development, currency),
            format_amount(structure.other, currency),
            format_amount(structure.total(), currency),
        ]);
    }
    table.print();
    Ok(())
}

fn cmd_pay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "pay <student-id> <amount> [cash|transfer|card|cheque] [reference] [YYYY-MM-DD]";
    let student = context.visible_student(arg(args, 0, usage)?)?;
    let amount = amount_arg(context, arg(args, 1, usage)?)?;
    let method: PaymentMethod = match args.get(2) {
        Some(raw) => parse_arg(raw, "payment method")?,
        None => PaymentMethod::default(),
    };
    let paid_on: NaiveDate = match args.get(4) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            CommandError::InvalidArguments(format!("`{}` is not a date (YYYY-MM-DD)", raw))
        })?,
        None => Local::now().date_naive(),
    };
    let request = PaymentRequest {
        student_id: &student.id,
        amount,
        method,
        paid_on,
        reference: args.get(3).copied(),
    };
    let view = context.with_records_mut(|records| {
        FeeService::record_payment(records, request).map_err(CommandError::from)
    })?;
    let currency = context.currency();
    output::success(format!(
        "Received {} from {} by {}.",
        format_amount(amount, currency),
        student.id,
        method
    ));
    print_ledger_line(&student.name, &view, currency);
    Ok(())
}

fn cmd_payments(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let filter = match args.first() {
        Some(id) => Some(context.visible_student(id)?.id),
        None => None,
    };
    let branch = context.branch_filter(None)?;
    let records = context.records()?;
    let currency = context.currency();
    let mut table = Table::new()
        .column("Date", Align::Left)
        .column("Student", Align::Left)
        .column("Amount", Align::Right)
        .column("Method", Align::Left)
        .column("Reference", Align::Left);
    for payment in records.payments.iter().filter(|payment| {
        filter.as_deref().map_or(true, |id| payment.student_id == id)
            && branch.as_deref().map_or(true, |branch| {
                records
                    .student(&payment.student_id)
                    .map_or(false, |student| student.branch_id == branch)
            })
    }) {
        table.row([
            payment.paid_on.to_string(),
            payment.student_id.clone(),
            format_amount(payment.amount, currency),
            payment.method.to_string(),
            payment.reference.clone().unwrap_or_default(),
        ]);
    }
    if table.is_empty() {
        output::info("No payments recorded.");
    } else {
        table.print();
    }
    Ok(())
}

fn cmd_ledger(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let own = context.session()?.student_id.clone();
    let requested = args.first().copied().or(own.as_deref());
    let currency = context.currency().to_string();

    if let Some(id) = requested {
        if context.records()?.student(id).is_some() || own.is_some() {
            let student = context.visible_student(id)?;
            let view = FeeService::ledger(context.records()?, &student.id)?;
            output::section(format!("Fee ledger: {} ({})", student.name, student.id));
            print_ledger_line(&student.name, &view, &currency);
            return Ok(());
        }
    }

    let branch = context.branch_filter(None)?;
    let rows = FeeService::ledgers(context.records()?, branch.as_deref(), requested);
    if rows.is_empty() {
        output::info("No students match.");
        return Ok(());
    }
    let mut table = Table::new()
        .column("ID", Align::Left)
        .column("Name", Align::Left)
        .column("Class", Align::Left)
        .column("Expected", Align::Right)
        .column("Paid", Align::Right)
        .column("Balance", Align::Right)
        .column("Status", Align::Left);
    for (student, view) in &rows {
        table.row([
            student.id.clone(),
            student.name.clone(),
            view.class_id.clone(),
            format_amount(view.expected, &currency),
            format_amount(view.total_paid, &currency),
            format_amount(view.balance, &currency),
            view.status.to_string(),
        ]);
    }
    table.print();
    Ok(())
}

fn cmd_collection(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let branch = context.branch_filter(None)?;
    let class = args.first().copied();
    let summary = FeeService::collection(context.records()?, branch.as_deref(), class);
    let currency = context.currency();
    output::section(match (&branch, class) {
        (Some(branch), Some(class)) => format!("Collection: {} {}", branch, class),
        (Some(branch), None) => format!("Collection: {}", branch),
        (None, Some(class)) => format!("Collection: {}", class),
        (None, None) => "Collection: all branches".into(),
    });
    output::info(format!("Students     : {}", summary.students));
    output::info(format!("Expected     : {}", format_amount(summary.expected, currency)));
    output::info(format!("Collected    : {}", format_amount(summary.collected, currency)));
    output::info(format!("Outstanding  : {}", format_amount(summary.outstanding, currency)));
    output::info(format!("Rate         : {:.1}%", summary.collection_rate()));
    output::info(format!(
        "Paid / Partial / Unpaid : {} / {} / {}",
        summary.paid, summary.partial, summary.unpaid
    ));
    Ok(())
}

fn print_ledger_line(name: &str, view: &LedgerView, currency: &str) {
    output::info(format!(
        "{} [{}] expected {} | paid {} | balance {} | {}",
        name,
        view.class_id,
        format_amount(view.expected, currency),
        format_amount(view.total_paid, currency),
        format_amount(view.balance, currency),
        view.status
    ));
    if view.overpaid() > 0 {
        output::warning(format!(
            "Overpaid by {}.",
            format_amount(view.overpaid(), currency)
        ));
    }
}
