// crates/retag/src/cli/update.rs
// `retag update` - wires config, catalog, MCP client and terminal into the flow

use super::{UpdateArgs, load_settings, resolve_server};
use anyhow::{Result, bail};
use retag::catalog::DockerHubClient;
use retag::config::EnvConfig;
use retag::flow::{Checkpoint, ConfirmPolicy, Outcome, UpdateRequest, ValueSource, run_update};
use retag::mcp_client::McpFileClient;
use retag::patch::MatchPattern;
use retag::prompt::TerminalOperator;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Run one manifest update from the command line
pub async fn run_update_command(args: UpdateArgs, config_override: Option<PathBuf>) -> Result<()> {
    let (env, config) = load_settings(config_override);
    debug!(deployment_id = ?env.deployment_id, "LLM deployment");

    let path = args.file_path.clone().unwrap_or(config.manifest.path.clone());
    let prefix = args.prefix.clone().unwrap_or(config.pattern.prefix.clone());
    let pattern = MatchPattern::new(&config.pattern.field, &prefix)?;

    let policy = if args.yes {
        ConfirmPolicy::AssumeYes
    } else {
        ConfirmPolicy::Ask
    };

    if needs_terminal(&args, policy) && !std::io::stdin().is_terminal() {
        bail!(
            "This run needs an interactive terminal for prompts.\n\
             Use --image-tag <name:tag> --yes (or --stdin --yes) for unattended runs."
        );
    }

    let source = select_source(&args, &env).await;
    let request = UpdateRequest {
        path,
        pattern,
        source,
        policy,
    };

    let server = resolve_server(args.server.as_deref(), &config)?;
    let client = McpFileClient::connect(&server).await?;

    let mut operator = TerminalOperator;
    let result = run_update(&client, &mut operator, &request).await;
    client.shutdown().await;

    match result? {
        Outcome::Written { .. } => {}
        Outcome::Declined(Checkpoint::NoMatch) => println!("Aborted: pattern not found."),
        Outcome::Declined(Checkpoint::Write) => println!("Aborted: nothing written."),
    }
    Ok(())
}

/// Prompting runs and confirmations read answers from stdin
fn needs_terminal(args: &UpdateArgs, policy: ConfirmPolicy) -> bool {
    let prompts_for_value = args.image_tag.is_none() && !args.stdin;
    prompts_for_value || policy == ConfirmPolicy::Ask
}

async fn select_source(args: &UpdateArgs, env: &EnvConfig) -> ValueSource {
    if let Some(ref tag) = args.image_tag {
        return ValueSource::Flag(tag.clone());
    }
    if args.stdin {
        return ValueSource::Stdin;
    }
    if args.pick {
        let Some(ref namespace) = env.dockerhub.namespace else {
            eprintln!("DOCKERHUB_NAMESPACE is not set; falling back to manual entry.");
            return ValueSource::Prompt;
        };
        let hub = DockerHubClient::from_env(&env.dockerhub).await;
        match hub.list_images(namespace).await {
            Ok(images) if !images.is_empty() => return ValueSource::Pick(images),
            Ok(_) => eprintln!("No images found for namespace {}; falling back to manual entry.", namespace),
            Err(e) => {
                warn!(error = %e, "Failed to fetch images from Docker Hub");
                eprintln!("Failed to fetch images from Docker Hub: {}", e);
            }
        }
    }
    ValueSource::Prompt
}
