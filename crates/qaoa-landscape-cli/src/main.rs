//! QAOA Landscape CLI Entry Point

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use qaoa_landscape_cli::{commands, config, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Landscape(args) => commands::landscape::run(args, &config)?,
        Commands::Compare(args) => commands::compare::run(args, &config)?,
        Commands::Clusters(args) => commands::clusters::run(args, &config)?,
        Commands::WarmStarts(args) => commands::warm_starts::run(args)?,
        Commands::Maxcut(args) => commands::maxcut::run(args, &config)?,
        Commands::Version => {
            println!("qaoa-landscape {}", env!("CARGO_PKG_VERSION"));
            println!("library version: {}", qaoa_landscape::VERSION);
        }
    }

    Ok(())
}
