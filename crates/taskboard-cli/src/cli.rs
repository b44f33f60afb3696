use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Drive a task board against a JSON task file", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON task collection acting as the server (or set TASKBOARD_TASKS)
    #[arg(long, value_name = "FILE", env = "TASKBOARD_TASKS", global = true)]
    pub tasks: Option<PathBuf>,

    /// Directory for column order and preferences (or set TASKBOARD_STATE_DIR)
    #[arg(long, value_name = "DIR", env = "TASKBOARD_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the board columns and the archive
    Board {
        /// Override the saved focus mode (none, dueSoon, overdue)
        #[arg(long)]
        focus: Option<String>,
    },
    /// Print overdue, due-soon and recently completed counts
    Metrics,
    /// Change a task's status
    Move {
        id: String,
        status: String,
    },
    /// Reorder a task within its column
    Reorder(ReorderArgs),
    /// Archive every task in a column
    ArchiveColumn {
        status: String,
    },
    /// View preferences
    Prefs(PrefsCommand),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct ReorderArgs {
    pub id: String,
    /// Place the task before this one
    #[arg(long, conflicts_with = "end", required_unless_present = "end")]
    pub before: Option<String>,
    /// Place the task at the end of its column
    #[arg(long)]
    pub end: bool,
}

#[derive(Args)]
pub struct PrefsCommand {
    #[command(subcommand)]
    pub action: PrefsAction,
}

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Show current preferences
    Show,
    /// Set card density, or cycle to the next one when omitted
    Density { value: Option<String> },
    /// Set the focus mode (none, dueSoon, overdue)
    Focus { mode: String },
    /// Toggle a column's collapsed state
    Collapse { status: String },
}
