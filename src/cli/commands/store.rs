use crate::cli::commands::{arg, rest, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::table::{Align, Table};
use crate::records::fixtures::demo_records;
use crate::roles::View;

const DEMO_STORE: &str = "demo";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "new",
            "Start an empty record store",
            "new <name>",
            Some(View::Store),
            cmd_new,
        ),
        CommandDefinition::new("open", "Open a saved record store", "open <name>", None, cmd_open),
        CommandDefinition::new("stores", "List saved record stores", "stores", None, cmd_stores),
        CommandDefinition::new(
            "save",
            "Write the open store to disk",
            "save [name]",
            Some(View::Overview),
            cmd_save,
        ),
        CommandDefinition::new(
            "backup",
            "Snapshot the open store",
            "backup [note]",
            Some(View::Store),
            cmd_backup,
        ),
        CommandDefinition::new(
            "backups",
            "List snapshots of the open store",
            "backups",
            Some(View::Store),
            cmd_backups,
        ),
        CommandDefinition::new(
            "restore",
            "Replace the open store with a snapshot",
            "restore <backup-file | number>",
            Some(View::Store),
            cmd_restore,
        ),
        CommandDefinition::new(
            "seed",
            "Load the demo school as an unsaved store",
            "seed [name]",
            Some(View::Store),
            cmd_seed,
        ),
    ]
}

fn confirm_discard(context: &ShellContext) -> Result<bool, CommandError> {
    if !context.manager.is_dirty() {
        return Ok(true);
    }
    context.confirm("The open store has unsaved changes. Discard them?", false)
}

fn cmd_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = arg(args, 0, "new <name>")?;
    if context.manager.storage().exists(name) {
        return Err(CommandError::InvalidArguments(format!(
            "A store named `{}` already exists; use `open {}`",
            name, name
        )));
    }
    if !confirm_discard(context)? {
        return Ok(());
    }
    context.manager.create(name);
    output::success(format!("Created store `{}`. Use `save` to write it.", name));
    Ok(())
}

fn cmd_open(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = arg(args, 0, "open <name>")?;
    if !confirm_discard(context)? {
        return Ok(());
    }
    let report = context.manager.load(name)?;
    context.report_load(&report);
    context.remember_store();
    output::success(format!("Opened store `{}`.", report.name));
    Ok(())
}

fn cmd_stores(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let names = context.manager.storage().list_stores()?;
    if names.is_empty() {
        output::info("No saved stores yet.");
        return Ok(());
    }
    output::section("Record stores");
    let current = context.manager.current_name();
    for name in &names {
        let marker = if Some(name.as_str()) == current { "*" } else { " " };
        output::info(format!(" {} {}", marker, name));
    }
    Ok(())
}

fn cmd_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = match args.first() {
        Some(name) => context.manager.save_as(name)?,
        None => context.manager.save()?,
    };
    context.remember_store();
    output::success(format!("Saved to {}", path.display()));
    Ok(())
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = rest(args, 0);
    let info = context.manager.backup(note.as_deref())?;
    output::success(format!("Backup written: {}", info.file_name));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.manager.list_backups()?;
    if backups.is_empty() {
        output::info("No backups for this store.");
        return Ok(());
    }
    let mut table = Table::new()
        .column("#", Align::Right)
        .column("File", Align::Left)
        .column("Created (UTC)", Align::Left);
    for (index, backup) in backups.iter().enumerate() {
        table.row([
            (index + 1).to_string(),
            backup.file_name.clone(),
            backup
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".into()),
        ]);
    }
    table.print();
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let reference = arg(args, 0, "restore <backup-file | number>")?;
    let file_name = match reference.parse::<usize>() {
        Ok(number) => context
            .manager
            .list_backups()?
            .into_iter()
            .nth(number.saturating_sub(1))
            .filter(|_| number > 0)
            .map(|backup| backup.file_name)
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!("No backup numbered {}", number))
            })?,
        Err(_) => reference.to_string(),
    };
    if !context.confirm(&format!("Restore `{}` over the open store?", file_name), false)? {
        return Ok(());
    }
    let report = context.manager.restore(&file_name)?;
    context.report_load(&report);
    output::success(format!("Restored `{}` from {}.", report.name, file_name));
    Ok(())
}

fn cmd_seed(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args.first().copied().unwrap_or(DEMO_STORE);
    if !confirm_discard(context)? {
        return Ok(());
    }
    context.manager.adopt(demo_records(), name);
    let records = context.records()?;
    output::success(format!(
        "Seeded `{}`: {} branches, {} students. Use `save` to keep it.",
        name,
        records.branches.len(),
        records.students.len()
    ));
    Ok(())
}
