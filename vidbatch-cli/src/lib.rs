// vidbatch-cli/src/lib.rs
//
// Library portion of the vidbatch CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, EncodeArgs, PlanArgs, RunArgs};
pub use commands::encode::run_encode;
pub use commands::plan::run_plan;
pub use config::resolve_config;
