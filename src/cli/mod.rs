//! Command-line interface for tick
//!
//! This module defines the CLI structure using clap derive macros.
//! Command bodies live in [`task`].

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::task::{Filter, TaskId};

mod task;

/// tick - a small persistent task list
///
/// Run without a subcommand to open the interactive list. Subcommands apply
/// the same gestures from the shell.
#[derive(Parser, Debug)]
#[command(name = "tick")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true, env = "TICK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the task list
    #[arg(long, global = true, env = "TICK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Slot name the list is stored under
    #[arg(long, global = true)]
    pub slot: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive task list (default)
    Ui {
        /// Do not capture the mouse
        #[arg(long)]
        no_mouse: bool,
    },

    /// Add a task
    Add {
        /// Task text; multiple words are joined with spaces
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// List tasks
    #[command(alias = "ls")]
    List {
        /// Which tasks to show: all, active, completed
        #[arg(short, long, default_value = "all")]
        filter: Filter,
    },

    /// Flip a task between active and completed
    Toggle {
        /// Task ID
        id: TaskId,
    },

    /// Delete a task
    Rm {
        /// Task ID
        id: TaskId,
    },

    /// Delete every completed task
    Clear,

    /// Move the task at one listed position onto another
    Mv {
        /// Position of the task to move (1-based, as shown by `list`)
        from: usize,

        /// Position to drop it on
        to: usize,

        /// Positions refer to this filtered listing
        #[arg(short, long, default_value = "all")]
        filter: Filter,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let store = task::StoreArgs {
            config: self.config,
            data_dir: self.data_dir,
            slot: self.slot,
        };
        let output = crate::output::OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        match self.command.unwrap_or(Commands::Ui { no_mouse: false }) {
            Commands::Ui { no_mouse } => task::run_ui(task::UiOptions { store, no_mouse }),
            Commands::Add { text } => task::run_add(task::AddOptions {
                text: text.join(" "),
                store,
                output,
            }),
            Commands::List { filter } => task::run_list(task::ListOptions {
                filter,
                store,
                output,
            }),
            Commands::Toggle { id } => task::run_toggle(task::IdOptions { id, store, output }),
            Commands::Rm { id } => task::run_rm(task::IdOptions { id, store, output }),
            Commands::Clear => task::run_clear(task::ClearOptions { store, output }),
            Commands::Mv { from, to, filter } => task::run_mv(task::MoveOptions {
                from,
                to,
                filter,
                store,
                output,
            }),
        }
    }
}
