//! tick - a small persistent task list
//!
//! This library provides the core functionality for the tick CLI and its
//! terminal UI.
//!
//! # Core Concepts
//!
//! - **Store**: the ordered task list, persisted to one durable slot after
//!   every change
//! - **Surface**: the retained display the list is rendered onto
//! - **Controller**: turns user gestures (submit, toggle, delete, filter,
//!   drag and drop) into store mutations and re-renders
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes
//! - `output`: Human and JSON output for CLI commands
//! - `storage`: Durable slot backends (filesystem and in-memory)
//! - `store`: The task list store
//! - `task`: Task records, ids and filters
//! - `ui`: Surface, controller and the ratatui terminal UI

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod output;
pub mod storage;
pub mod store;
pub mod task;
pub mod ui;

pub use error::{Error, Result};
