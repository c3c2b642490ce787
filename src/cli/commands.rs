use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "taskmate", about = concat!("taskmate v", env!("CARGO_PKG_VERSION"), " - tasks, a board, and a focus timer"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory and a commented taskmate.toml
    Init(InitArgs),
    /// Add a task (inserted at the top of the list)
    Add(AddArgs),
    /// Edit a task's fields
    Edit(EditArgs),
    /// List tasks, optionally searched and filtered
    List(ListArgs),
    /// Show task details
    Show(ShowArgs),
    /// Show the kanban board
    Board,
    /// Show task counts per status
    Stats,
    /// Set a task's status (todo, doing, done)
    Status(StatusArgs),
    /// Mark a task done (shortcut for status <ID> done)
    Done(IdArg),
    /// Toggle a task between done and todo
    Toggle(IdArg),
    /// Add, toggle or remove checklist steps
    Step(StepCmd),
    /// Permanently delete tasks
    Delete(DeleteArgs),
    /// Export all tasks as a JSON file
    Export(ExportArgs),
    /// Run a focus session in the terminal
    Focus(FocusArgs),
    /// Show or set the theme (dark, light)
    Theme(ThemeArgs),
}

// ---------------------------------------------------------------------------
// Task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing taskmate.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Priority (low, medium, high)
    #[arg(short, long, default_value = "medium")]
    pub priority: String,
    /// Free-text notes
    #[arg(short, long)]
    pub notes: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(short, long)]
    pub due: Option<String>,
    /// Checklist step (repeatable)
    #[arg(short, long = "step")]
    pub steps: Vec<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New priority (low, medium, high)
    #[arg(short, long)]
    pub priority: Option<String>,
    /// Replace notes
    #[arg(short, long)]
    pub notes: Option<String>,
    /// Replace due date (YYYY-MM-DD, empty to clear)
    #[arg(short, long)]
    pub due: Option<String>,
    /// Replace the checklist with these steps (repeatable)
    #[arg(short, long = "step")]
    pub steps: Vec<String>,
    /// Remove all checklist steps
    #[arg(long, conflicts_with = "steps")]
    pub clear_steps: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Case-insensitive title search
    #[arg(short, long, default_value = "")]
    pub search: String,
    /// Status filter (all, active, completed)
    #[arg(short, long, default_value = "all")]
    pub filter: String,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task ID to show
    pub id: String,
}

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Task ID
    pub id: String,
    /// New status (todo, doing, done)
    pub status: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Task IDs to delete
    #[arg(required = true)]
    pub ids: Vec<String>,
    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file
    #[arg(default_value = "mytasks.json")]
    pub file: String,
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct StepCmd {
    #[command(subcommand)]
    pub action: StepAction,
}

#[derive(Subcommand)]
pub enum StepAction {
    /// Append a step
    Add(StepAddArgs),
    /// Toggle a step done/undone
    Toggle(StepIndexArgs),
    /// Remove a step
    Rm(StepIndexArgs),
}

#[derive(Args)]
pub struct StepAddArgs {
    /// Task ID
    pub id: String,
    /// Step text
    pub text: String,
}

#[derive(Args)]
pub struct StepIndexArgs {
    /// Task ID
    pub id: String,
    /// Step number (1-based)
    pub number: usize,
}

// ---------------------------------------------------------------------------
// Focus and theme
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct FocusArgs {
    /// Task to focus on (default: first open task)
    pub id: Option<String>,
    /// Session length in minutes (default: from taskmate.toml)
    #[arg(short, long)]
    pub minutes: Option<u32>,
    /// Session length in seconds (overrides --minutes)
    #[arg(long, hide = true)]
    pub seconds: Option<u32>,
    /// Mark the task done at the end without asking
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ThemeArgs {
    /// Theme to store (dark, light); omit to print the current one
    pub name: Option<String>,
}
