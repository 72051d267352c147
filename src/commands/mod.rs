//! CLI command handlers.

mod config;
mod paths;
mod prompt;
mod resolve;
mod simulate;

pub use config::run_config_show_command;
pub use paths::{resolve_path_bundle, run_paths_command};
pub use prompt::run_prompt_command;
pub use resolve::{run_resolve_destination_command, run_resolve_url_command};
pub use simulate::run_simulate_command;
