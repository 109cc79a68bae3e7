use crate::model::Status;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kanban", version, about = "Three-column kanban board in the terminal")]
pub struct Cli {
    /// Config file (defaults to config.yml in the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Log file (overrides the config file)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Launch the interactive board
    Tui {
        /// Start without the sample tasks
        #[arg(long)]
        empty: bool,
    },
    /// Print a single rendered frame of the board
    Snapshot {
        /// Terminal width to render at
        #[arg(long, default_value_t = 120)]
        width: u16,
        /// Terminal height to render at
        #[arg(long, default_value_t = 30)]
        height: u16,
        /// Column to focus
        #[arg(long, value_enum, default_value_t = Status::Todo)]
        focus: Status,
        /// Start without the sample tasks
        #[arg(long)]
        empty: bool,
    },
}
