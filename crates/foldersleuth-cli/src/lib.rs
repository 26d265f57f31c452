/// FolderSleuth CLI — command-line frontend.
///
/// This crate contains argument parsing, configuration layering and console
/// rendering. Business logic lives in `foldersleuth-core`.
pub mod args;
pub mod commands;
pub mod config;
pub mod render;

pub use args::{Cli, Command};
pub use config::{AppConfig, ConfigLoader};

/// Load configuration, apply the command's flags on top and dispatch.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ConfigLoader::new(cli.config.as_deref()).load()?;

    match &cli.command {
        Command::Analyze(args) => {
            config.apply_analyze_overrides(args);
            commands::analyze(args, &config)
        }
        Command::List(args) => {
            config.apply_list_overrides(args);
            commands::list(args, &config)
        }
        Command::Summarize(args) => {
            config.apply_summarize_overrides(args);
            commands::summarize(args, &config)
        }
    }
}
