/*!
 * Shell Module
 * Interactive command parsing and dispatch
 */

pub mod command;
pub mod console;
pub mod input;

pub use command::Command;
pub use console::{Console, Reply};
pub use input::spawn_line_reader;
