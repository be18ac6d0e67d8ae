// crates/retag/src/main.rs
// retag - rewrite the image reference in a deployment manifest

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, UpdateArgs};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    if let Ok(cwd) = std::env::current_dir() {
        cli::load_env_files(&cwd, dirs::home_dir().as_deref());
    }

    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        None => cli::run_update_command(UpdateArgs::default(), cli.config).await?,
        Some(Commands::Update(args)) => cli::run_update_command(args, cli.config).await?,
        Some(Commands::Images { namespace }) => cli::run_images(namespace).await?,
        Some(Commands::Tools { server }) => cli::run_tools(server, cli.config).await?,
        Some(Commands::Check) => cli::run_check(cli.config)?,
    }

    Ok(())
}
