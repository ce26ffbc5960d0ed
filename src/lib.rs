// Library interface for earnclock
// Exposes the accounting core for the `ec` binary, tests and other hosts

pub mod cli;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod driver;
pub mod earnings;
pub mod errors;
pub mod format;
pub mod logging;
pub mod scheduler;
pub mod state;
pub mod suggestions;
pub mod time;
