mod app;
mod board;
mod cli;
mod commands;
mod config;
mod form;
mod model;
mod ui;

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::{self, OpenOptions};

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let config = config::load_config(args.config.as_deref())?;
    init_logging(&args, &config);
    log::info!("kanban {} starting", env!("CARGO_PKG_VERSION"));

    let command = args.command.unwrap_or(cli::Command::Tui { empty: false });
    match command {
        cli::Command::Tui { empty } => commands::tui(&config, empty),
        cli::Command::Snapshot {
            width,
            height,
            focus,
            empty,
        } => commands::snapshot(&config, width, height, focus, empty),
    }
}

/// Logs go to a file since stdout belongs to the terminal UI. If the file
/// can't be opened, logging stays off.
fn init_logging(args: &cli::Cli, config: &config::Config) {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        config.log_level
    };
    let path = args
        .log_file
        .clone()
        .or_else(|| config.log_file.clone())
        .or_else(config::default_log_path);
    let Some(path) = path else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
        let _ = WriteLogger::init(level, log_config, file);
    }
}
