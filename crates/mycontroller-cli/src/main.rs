use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use mycontroller_cli::cli::{Cli, Commands};
use mycontroller_cli::commands::{CommandContext, UiOptions, cmd_config, cmd_set, cmd_show};
use mycontroller_cli::config::{Config, resolve_server};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "mcsettings", &mut io::stdout());
        return Ok(());
    }

    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr so JSON output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Config::path);

    match cli.command {
        Commands::Config { ref action } => cmd_config(action.clone(), &config_path),
        Commands::Show { screen } => {
            let ctx = connect(&cli, &config_path)?;
            cmd_show(&ctx, screen).await
        }
        Commands::Set { ref target } => {
            let ctx = connect(&cli, &config_path)?;
            cmd_set(&ctx, target.clone()).await
        }
        Commands::Completions { .. } => Ok(()),
    }
}

fn connect(cli: &Cli, config_path: &Path) -> Result<CommandContext> {
    let config = Config::load_from(config_path);
    let server = resolve_server(cli.server.clone(), &config);
    let config_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::dir);

    let ui = UiOptions {
        format: cli.output_format(),
        no_color: cli.no_color || config.no_color,
        quiet: cli.quiet,
        assume_yes: cli.yes || config.assume_yes,
    };
    tracing::debug!("Using server {}", server);
    CommandContext::connect(&server, &config, &config_dir, ui)
}
