mod init;
pub use init::cmd_init;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::lock::DataLock;
use crate::io::storage::{self, FileStorage};
use crate::model::config::Config;
use crate::model::task::{Priority, Status, Task};
use crate::ops::draft::TaskDraft;
use crate::ops::notify::{DesktopNotifier, Notifier};
use crate::ops::store::{StatusFilter, TaskError};
use crate::ops::timer::FocusTimer;
use crate::ops::workspace::Workspace;
use crate::view::{board_view, list_view, summary_view};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let data_dir = storage::resolve_data_dir(cli.data_dir.as_deref().map(Path::new));

    match cli.command {
        None => {
            eprintln!("no command given (try `taskmate --help`)");
            Ok(())
        }
        Some(cmd) => match cmd {
            // Init is handled in main.rs before the workspace is opened
            Commands::Init(args) => cmd_init(args, Some(data_dir.as_path())),

            // Read commands
            Commands::List(args) => cmd_list(&data_dir, args, json),
            Commands::Show(args) => cmd_show(&data_dir, args, json),
            Commands::Board => cmd_board(&data_dir, json),
            Commands::Stats => cmd_stats(&data_dir, json),
            Commands::Export(args) => cmd_export(&data_dir, args),

            // Write commands
            Commands::Add(args) => cmd_add(&data_dir, args),
            Commands::Edit(args) => cmd_edit(&data_dir, args),
            Commands::Status(args) => cmd_status(&data_dir, &args.id, &args.status),
            Commands::Done(args) => cmd_status(&data_dir, &args.id, "done"),
            Commands::Toggle(args) => cmd_toggle(&data_dir, args),
            Commands::Step(cmd) => cmd_step(&data_dir, cmd),
            Commands::Delete(args) => cmd_delete(&data_dir, args),
            Commands::Theme(args) => cmd_theme(&data_dir, args),

            // Focus session
            Commands::Focus(args) => cmd_focus(&data_dir, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_workspace(data_dir: &Path) -> Result<(Workspace, Config), Box<dyn std::error::Error>> {
    let config = config_io::read_config(data_dir)?;
    let timer = FocusTimer::new(config.timer.duration_secs());
    let ws = Workspace::open(Box::new(FileStorage::new(data_dir)), timer)?;
    Ok((ws, config))
}

fn find_task<'a>(ws: &'a Workspace, id: &str) -> Result<&'a Task, TaskError> {
    ws.store()
        .get(id)
        .ok_or_else(|| TaskError::NotFound(id.to_string()))
}

/// Convert a 1-based step number to an index
fn step_index(number: usize) -> Result<usize, String> {
    number
        .checked_sub(1)
        .ok_or_else(|| "step numbers start at 1".to_string())
}

fn confirm(prompt: &str) -> Result<bool, std::io::Error> {
    eprint!("{} [y/n] ", prompt);
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(data_dir: &Path, args: ListArgs, json: bool) -> CmdResult {
    let filter: StatusFilter = args.filter.parse()?;
    let (ws, _) = open_workspace(data_dir)?;
    let view = list_view(ws.store(), &args.search, filter);
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_lines(&format_list(&view));
    }
    Ok(())
}

fn cmd_show(data_dir: &Path, args: ShowArgs, json: bool) -> CmdResult {
    let (ws, _) = open_workspace(data_dir)?;
    let task = find_task(&ws, &args.id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        print_lines(&format_task_detail(task));
    }
    Ok(())
}

fn cmd_board(data_dir: &Path, json: bool) -> CmdResult {
    let (ws, _) = open_workspace(data_dir)?;
    let board = board_view(ws.store());
    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        print_lines(&format_board(&board));
    }
    Ok(())
}

fn cmd_stats(data_dir: &Path, json: bool) -> CmdResult {
    let (ws, _) = open_workspace(data_dir)?;
    let summary = summary_view(ws.store());
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_lines(&format_summary(&summary));
    }
    Ok(())
}

fn cmd_export(data_dir: &Path, args: ExportArgs) -> CmdResult {
    let (ws, _) = open_workspace(data_dir)?;
    let path = PathBuf::from(&args.file);
    ws.export(&path)?;
    println!("exported {} tasks to {}", ws.store().len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(data_dir: &Path, args: AddArgs) -> CmdResult {
    let priority: Priority = args.priority.parse()?;
    let _lock = DataLock::acquire_default(data_dir)?;
    let (mut ws, _) = open_workspace(data_dir)?;

    let draft = TaskDraft {
        title: args.title,
        priority,
        notes: args.notes.unwrap_or_default(),
        due: args.due.unwrap_or_default(),
        steps: Some(args.steps),
        ..Default::default()
    };
    let id = ws.submit(draft)?;
    println!("{}", id);
    Ok(())
}

fn cmd_edit(data_dir: &Path, args: EditArgs) -> CmdResult {
    let priority = args.priority.as_deref().map(str::parse::<Priority>).transpose()?;
    let _lock = DataLock::acquire_default(data_dir)?;
    let (mut ws, _) = open_workspace(data_dir)?;

    let mut draft = TaskDraft::from_task(find_task(&ws, &args.id)?);
    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(priority) = priority {
        draft.priority = priority;
    }
    if let Some(notes) = args.notes {
        draft.notes = notes;
    }
    if let Some(due) = args.due {
        draft.due = due;
    }
    if args.clear_steps {
        draft.steps = Some(Vec::new());
    } else if !args.steps.is_empty() {
        draft.steps = Some(args.steps);
    }

    let id = ws.submit(draft)?;
    println!("{}", id);
    Ok(())
}

fn cmd_status(data_dir: &Path, id: &str, status: &str) -> CmdResult {
    let status: Status = status.parse()?;
    let _lock = DataLock::acquire_default(data_dir)?;
    let (mut ws, _) = open_workspace(data_dir)?;

    if !ws.set_status(id, status)? {
        return Err(TaskError::NotFound(id.to_string()).into());
    }
    println!("{} {}", id, status);
    Ok(())
}

fn cmd_toggle(data_dir: &Path, args: IdArg) -> CmdResult {
    let _lock = DataLock::acquire_default(data_dir)?;
    let (mut ws, _) = open_workspace(data_dir)?;

    let status = ws
        .toggle_done(&args.id)?
        .ok_or_else(|| TaskError::NotFound(args.id.clone()))?;
    println!("{} {}", args.id, status);
    Ok(())
}

fn cmd_step(data_dir: &Path, cmd: StepCmd) -> CmdResult {
    let _lock = DataLock::acquire_default(data_dir)?;
    let (mut ws, _) = open_workspace(data_dir)?;

    match cmd.action {
        StepAction::Add(args) => {
            find_task(&ws, &args.id)?;
            if !ws.add_subtask(&args.id, &args.text)? {
                return Err("step text must not be empty".into());
            }
            let p = crate::ops::store::progress(find_task(&ws, &args.id)?);
            println!("{} step {} added", args.id, p.total);
        }
        StepAction::Toggle(args) => {
            find_task(&ws, &args.id)?;
            let idx = step_index(args.number)?;
            let done = ws
                .toggle_subtask(&args.id, idx)?
                .ok_or_else(|| format!("task {} has no step {}", args.id, args.number))?;
            println!(
                "{} step {} {}",
                args.id,
                args.number,
                if done { "done" } else { "open" }
            );
        }
        StepAction::Rm(args) => {
            find_task(&ws, &args.id)?;
            let idx = step_index(args.number)?;
            let removed = ws
                .remove_subtask(&args.id, idx)?
                .ok_or_else(|| format!("task {} has no step {}", args.id, args.number))?;
            println!("{} removed step: {}", args.id, removed.text);
        }
    }
    Ok(())
}

fn cmd_delete(data_dir: &Path, args: DeleteArgs) -> CmdResult {
    let _lock = DataLock::acquire_default(data_dir)?;
    let (mut ws, _) = open_workspace(data_dir)?;

    for id in &args.ids {
        find_task(&ws, id)?;
    }

    if !args.yes {
        for id in &args.ids {
            let task = find_task(&ws, id)?;
            eprintln!("  {} {}", task.id, task.title);
        }
        if !confirm(&format!("Delete {} task(s)?", args.ids.len()))? {
            println!("cancelled");
            return Ok(());
        }
    }

    for id in &args.ids {
        if ws.delete(id)?.is_some() {
            println!("deleted {}", id);
        }
    }
    Ok(())
}

fn cmd_theme(data_dir: &Path, args: ThemeArgs) -> CmdResult {
    let Some(name) = args.name else {
        let (ws, _) = open_workspace(data_dir)?;
        println!("{}", ws.theme());
        return Ok(());
    };
    if name != "dark" && name != "light" {
        return Err(format!("unknown theme '{}' (expected: dark, light)", name).into());
    }
    let _lock = DataLock::acquire_default(data_dir)?;
    let (mut ws, _) = open_workspace(data_dir)?;
    ws.set_theme(&name)?;
    println!("{}", name);
    Ok(())
}

// ---------------------------------------------------------------------------
// Focus session
// ---------------------------------------------------------------------------

/// Run a blocking countdown. The data lock is only taken at the end, to
/// mark the focused task done, so other commands keep working meanwhile.
fn cmd_focus(data_dir: &Path, args: FocusArgs, json: bool) -> CmdResult {
    let (mut ws, config) = open_workspace(data_dir)?;

    ws.reset_timer(session_secs(&args, &config));
    if let Some(id) = &args.id {
        ws.bind_timer(id)?;
    }
    ws.start_timer();

    match ws.timer().bound_task().and_then(|id| ws.store().get(id)) {
        Some(task) => eprintln!("Focusing on {} {} for {}", task.id, task.title, ws.timer().display()),
        None => eprintln!("Focusing for {}", ws.timer().display()),
    }

    let completion = loop {
        eprint!("\r{} ", ws.timer().display());
        std::io::stderr().flush()?;
        thread::sleep(Duration::from_secs(1));
        if let Some(done) = ws.tick_timer() {
            break done;
        }
    };
    eprintln!("\r{} ", ws.timer().display());

    let mut notifier = DesktopNotifier::from_config(&config.notify);
    if !notifier.notify(&completion.message) && !json {
        println!("{}", completion.message);
    }

    let mut marked_done = false;
    if let Some(id) = &completion.task
        && (args.yes || confirm("Mark focused task as done?")?)
    {
        let _lock = DataLock::acquire_default(data_dir)?;
        // Re-read: the list may have changed during the session
        let (mut fresh, _) = open_workspace(data_dir)?;
        marked_done = fresh.set_status(id, Status::Done)?;
        if !marked_done {
            log::warn!("focused task {} no longer exists", id);
        } else if !json {
            println!("{} done", id);
        }
    }

    if json {
        let out = serde_json::json!({
            "message": completion.message,
            "task": completion.task,
            "marked_done": marked_done,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    }
    Ok(())
}

fn session_secs(args: &FocusArgs, config: &Config) -> u32 {
    match (args.seconds, args.minutes) {
        (Some(s), _) => s,
        (None, Some(m)) => m.max(1).saturating_mul(60),
        (None, None) => config.timer.duration_secs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focus_args(minutes: Option<u32>, seconds: Option<u32>) -> FocusArgs {
        FocusArgs {
            id: None,
            minutes,
            seconds,
            yes: false,
        }
    }

    #[test]
    fn session_length_from_flags_or_config() {
        let config = Config::default();
        assert_eq!(session_secs(&focus_args(None, None), &config), 25 * 60);
        assert_eq!(session_secs(&focus_args(Some(0), None), &config), 60);
        assert_eq!(session_secs(&focus_args(Some(5), Some(7)), &config), 7);
        assert_eq!(session_secs(&focus_args(Some(u32::MAX), None), &config), u32::MAX);
    }

    #[test]
    fn step_numbers_are_one_based() {
        assert_eq!(step_index(1), Ok(0));
        assert_eq!(step_index(3), Ok(2));
        assert!(step_index(0).is_err());
    }
}
