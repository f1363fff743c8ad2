use crate::cli::commands::{arg, parse_arg, rest, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::table::{Align, Table};
use crate::core::services::SchoolService;
use crate::records::StaffRole;
use crate::roles::View;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "school-add",
            "Register a school",
            "school-add <name> [address]",
            Some(View::Schools),
            cmd_school_add,
        ),
        CommandDefinition::new(
            "schools",
            "List registered schools",
            "schools",
            Some(View::Schools),
            cmd_schools,
        ),
        CommandDefinition::new(
            "branch-add",
            "Open a branch under a school",
            "branch-add <school-id> <name>",
            Some(View::Schools),
            cmd_branch_add,
        ),
        CommandDefinition::new(
            "branches",
            "List branches",
            "branches [school-id]",
            Some(View::Branches),
            cmd_branches,
        ),
        CommandDefinition::new(
            "staff-add",
            "Add a staff member to a branch",
            "staff-add <branch-id> <role> <name> [subject,subject...]",
            Some(View::Staff),
            cmd_staff_add,
        ),
        CommandDefinition::new(
            "staff",
            "List staff",
            "staff [branch-id]",
            Some(View::Staff),
            cmd_staff,
        ),
    ]
}

fn cmd_school_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = arg(args, 0, "school-add <name> [address]")?;
    let address = rest(args, 1);
    let id = context.with_records_mut(|records| {
        SchoolService::add_school(records, name, address.as_deref()).map_err(CommandError::from)
    })?;
    output::success(format!("Registered {} ({}).", name, id));
    Ok(())
}

fn cmd_schools(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let records = context.records()?;
    if records.schools.is_empty() {
        output::info("No schools registered.");
        return Ok(());
    }
    let mut table = Table::new()
        .column("ID", Align::Left)
        .column("Name", Align::Left)
        .column("Branches", Align::Right)
        .column("Address", Align::Left);
    for school in &records.schools {
        table.row([
            school.id.clone(),
            school.name.clone(),
            records.branches_of(&school.id).count().to_string(),
            school.address.clone().unwrap_or_default(),
        ]);
    }
    table.print();
    Ok(())
}

fn cmd_branch_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "branch-add <school-id> <name>";
    let school_id = arg(args, 0, usage)?;
    let name = rest(args, 1)
        .ok_or_else(|| CommandError::InvalidArguments(format!("Usage: {}", usage)))?;
    let id = context.with_records_mut(|records| {
        SchoolService::add_branch(records, school_id, &name).map_err(CommandError::from)
    })?;
    output::success(format!("Opened branch {} ({}).", name, id));
    Ok(())
}

fn cmd_branches(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let scope = context.branch_filter(None)?;
    let records = context.records()?;
    let school_filter = args.first().copied();
    let mut table = Table::new()
        .column("ID", Align::Left)
        .column("School", Align::Left)
        .column("Name", Align::Left)
        .column("Students", Align::Right)
        .column("Staff", Align::Right);
    for branch in records.branches.iter().filter(|branch| {
        school_filter.map_or(true, |school| branch.school_id == school)
            && scope.as_deref().map_or(true, |scope| branch.id == scope)
    }) {
        table.row([
            branch.id.clone(),
            branch.school_id.clone(),
            branch.name.clone(),
            records
                .students_filtered(Some(&branch.id), None)
                .count()
                .to_string(),
            records.staff_in_branch(&branch.id).count().to_string(),
        ]);
    }
    if table.is_empty() {
        output::info("No branches found.");
    } else {
        table.print();
    }
    Ok(())
}

fn cmd_staff_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "staff-add <branch-id> <role> <name> [subject,subject...]";
    let branch_id = arg(args, 0, usage)?;
    let role: StaffRole = parse_arg(arg(args, 1, usage)?, "staff role")?;
    let name = arg(args, 2, usage)?;
    let subjects: Vec<&str> = args
        .get(3)
        .map(|list| list.split(',').collect())
        .unwrap_or_default();
    context.ensure_branch_visible(branch_id)?;
    let id = context.with_records_mut(|records| {
        SchoolService::add_staff(records, branch_id, name, role, &subjects)
            .map_err(CommandError::from)
    })?;
    output::success(format!("Added {} {} ({}).", role, name, id));
    Ok(())
}

fn cmd_staff(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let branch = context.branch_filter(args.first().copied())?;
    let records = context.records()?;
    let mut table = Table::new()
        .column("ID", Align::Left)
        .column("Branch", Align::Left)
        .column("Name", Align::Left)
        .column("Role", Align::Left)
        .column("Subjects", Align::Left);
    for member in records
        .staff
        .iter()
        .filter(|member| branch.as_deref().map_or(true, |b| member.branch_id == b))
    {
        table.row([
            member.id.clone(),
            member.branch_id.clone(),
            member.name.clone(),
            member.role.to_string(),
            member.subjects.join(", "),
        ]);
    }
    if table.is_empty() {
        output::info("No staff found.");
    } else {
        table.print();
    }
    Ok(())
}
