//! Terminal subsystem for MiniOS.
//!
//! Provides the command-line interface fed by the keyboard decoder.
//!
//! # Architecture
//!
//! - `shell`: line editor and prompt
//! - `history`: bounded history of submitted lines
//! - `commands`: built-in shell commands

pub mod commands;
pub mod history;
pub mod shell;

pub use commands::{Command, Session};
pub use history::{History, Recall};
pub use shell::{Line, LineBuffer, Shell, HISTORY_CAPACITY, LINE_CAPACITY, PROMPT};
