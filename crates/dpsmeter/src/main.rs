mod cli;
mod commands;
mod settings;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // stdout carries the display output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Watch {
            dir,
            file,
            config,
            json,
        } => commands::watch::run(dir, file, config.as_deref(), json),
        Commands::Summary { file, config } => commands::summary::run(&file, config.as_deref()),
        Commands::Breakdown {
            file,
            session,
            config,
        } => commands::breakdown::run(&file, session.as_deref(), config.as_deref()),
        Commands::Version => commands::version::run(),
    }
}
