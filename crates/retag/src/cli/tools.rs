// crates/retag/src/cli/tools.rs
// `retag tools` - show what the file-access server offers

use super::{load_settings, resolve_server};
use anyhow::Result;
use retag::mcp_client::{McpFileClient, READ_TOOL, WRITE_TOOL};
use std::path::PathBuf;

pub async fn run_tools(server: Option<String>, config_override: Option<PathBuf>) -> Result<()> {
    let (_env, config) = load_settings(config_override);
    let server = resolve_server(server.as_deref(), &config)?;
    let client = McpFileClient::connect(&server).await?;

    let tools = client.list_tools();
    let missing: Vec<&str> = [READ_TOOL, WRITE_TOOL]
        .into_iter()
        .filter(|t| !client.has_tool(t))
        .collect();
    client.shutdown().await;

    println!("Available MCP tools ({}):", tools.len());
    for tool in &tools {
        if tool.description.is_empty() {
            println!("  {}", tool.name);
        } else {
            println!("  {} - {}", tool.name, first_line(&tool.description));
        }
    }
    if !missing.is_empty() {
        println!("\nMissing tools required by `retag update`: {}", missing.join(", "));
    }
    Ok(())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}
