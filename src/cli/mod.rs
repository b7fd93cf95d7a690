pub mod commands;

pub use commands::{run_shell, Cli};
