//! Styled console messages.
//!
//! Every message is also logged, the console copy is for the user.

use colored::Colorize;
use std::fmt::Display;

/// Plain progress message.
pub fn message(msg: impl Display) {
    log::info!("{msg}");
    println!("{msg}");
}

/// Result the user is waiting for.
pub fn info(msg: impl Display) {
    log::info!("{msg}");
    println!("{}", msg.to_string().green());
}

pub fn warning(msg: impl Display) {
    log::warn!("{msg}");
    println!("{} {}", "WARN".on_yellow(), msg.to_string().yellow());
}

pub fn error(msg: impl Display) {
    log::error!("{msg}");
    eprintln!("{} {}", "ERROR".on_red(), msg.to_string().red());
}
