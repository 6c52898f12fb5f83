//! SpamScan web front end
//!
//! The `spamscan` binary: a two-screen web UI over the prediction service,
//! a JSON check endpoint, and a one-shot `check` command.

pub mod cli;
pub mod config;
pub mod server;
pub mod shell;
pub mod state;

pub use cli::*;
pub use config::*;
pub use server::*;
pub use shell::*;
pub use state::*;
