// crates/retag/src/cli/mod.rs
// CLI module for retag commands

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use retag::config::{EnvConfig, RetagConfig};
use retag::mcp_client::McpServerConfig;
use std::path::{Path, PathBuf};

pub mod check;
pub mod images;
pub mod tools;
pub mod update;

pub use check::run_check;
pub use images::run_images;
pub use tools::run_tools;
pub use update::run_update_command;

#[derive(Parser)]
#[command(name = "retag")]
#[command(about = "Rewrite the container image reference in a deployment manifest")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file (default: ./retag.toml, then ~/.retag/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Update the image tag in the manifest (default)
    Update(UpdateArgs),

    /// List `repo:tag` images available on Docker Hub
    Images {
        /// Docker Hub namespace (default: DOCKERHUB_NAMESPACE)
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// List the tools offered by the file-access server
    Tools {
        /// Named server from .mcp.json instead of the configured one
        #[arg(long)]
        server: Option<String>,
    },

    /// Show configuration status
    Check,
}

#[derive(Args, Debug, Default, Clone)]
pub struct UpdateArgs {
    /// New image name:tag (e.g. demo_serve:02)
    #[arg(long, conflicts_with_all = ["stdin", "pick"])]
    pub image_tag: Option<String>,

    /// Read the image name:tag from the first line of stdin (needs --yes)
    #[arg(long, conflicts_with = "pick", requires = "yes")]
    pub stdin: bool,

    /// Choose the image from the Docker Hub catalog
    #[arg(long)]
    pub pick: bool,

    /// Manifest path on the file server
    #[arg(long)]
    pub file_path: Option<String>,

    /// Registry/namespace prefix in front of the replaced tag
    #[arg(long)]
    pub prefix: Option<String>,

    /// Write without asking for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Named server from .mcp.json instead of the configured one
    #[arg(long)]
    pub server: Option<String>,
}

/// Load `.env` files: `<project>/.env` wins over `<home>/.retag/.env`.
/// Neither overrides variables already set in the process environment.
pub fn load_env_files(project_dir: &Path, home: Option<&Path>) {
    let _ = dotenvy::from_path(project_dir.join(".env"));
    if let Some(home) = home {
        let _ = dotenvy::from_path(home.join(".retag/.env"));
    }
}

/// Load env and file settings; `--config` beats RETAG_CONFIG
pub fn load_settings(config_override: Option<PathBuf>) -> (EnvConfig, RetagConfig) {
    let env = EnvConfig::load();
    let path = config_override.or_else(|| env.config_path.clone());
    let config = RetagConfig::load(path.as_deref());
    (env, config)
}

/// Named server from .mcp.json, else the `[server]` section
pub fn resolve_server(name: Option<&str>, config: &RetagConfig) -> Result<McpServerConfig> {
    match name {
        Some(name) => {
            let cwd = std::env::current_dir().ok();
            Ok(McpServerConfig::from_mcp_configs(name, cwd.as_deref())?)
        }
        None => Ok(McpServerConfig::from_section(&config.server)),
    }
}
