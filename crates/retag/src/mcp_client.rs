// crates/retag/src/mcp_client.rs
// MCP client for the external file-access server (read_file / write_file)

use crate::config::ServerSection;
use crate::error::{Result, RetagError};
use async_trait::async_trait;
use rmcp::model::{CallToolRequestParam, CallToolResult, ClientInfo, Implementation, JsonObject};
use rmcp::service::RunningService;
use rmcp::transport::child_process::TokioChildProcess;
use rmcp::{RoleClient, serve_client};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Tool used to fetch a file's content
pub const READ_TOOL: &str = "read_file";

/// Tool used to replace a file's content
pub const WRITE_TOOL: &str = "write_file";

/// Read/write capability over files held by some remote service
#[async_trait]
pub trait FileAccess: Send + Sync {
    /// Full text of the file at `path`
    async fn read_file(&self, path: &str) -> Result<String>;

    /// Replace the file at `path` with `content`; returns the server acknowledgement
    async fn write_file(&self, path: &str, content: &str) -> Result<String>;
}

/// How to launch a file-access MCP server
#[derive(Debug, Clone, PartialEq)]
pub struct McpServerConfig {
    pub name: String,
    pub command: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
}

impl McpServerConfig {
    /// Server definition from the `[server]` config section
    pub fn from_section(section: &ServerSection) -> Self {
        Self {
            name: "filesystem".to_string(),
            command: section.command.clone(),
            args: section.args.clone(),
            env: section.env.clone(),
        }
    }

    /// Look up a named server in ./.mcp.json, then ~/.claude/mcp.json.
    /// The project file wins when both define the name.
    pub fn from_mcp_configs(name: &str, project_dir: Option<&Path>) -> Result<Self> {
        let mut configs = Vec::new();
        let mut seen = HashSet::new();

        let mut candidates = Vec::new();
        if let Some(dir) = project_dir {
            candidates.push(dir.join(".mcp.json"));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".claude/mcp.json"));
        }

        for path in candidates {
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            match serde_json::from_str::<Value>(&content) {
                Ok(parsed) => Self::parse_mcp_servers(&parsed, &mut configs, &mut seen),
                Err(e) => warn!(path = %path.display(), error = %e, "Ignoring malformed MCP config"),
            }
        }

        configs
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| RetagError::Config(format!("MCP server '{}' not configured", name)))
    }

    /// Parse mcpServers from a JSON config object
    fn parse_mcp_servers(config: &Value, configs: &mut Vec<Self>, seen: &mut HashSet<String>) {
        let servers = match config.get("mcpServers").and_then(|v| v.as_object()) {
            Some(s) => s,
            None => return,
        };

        for (name, server_config) in servers {
            // Earlier files take precedence
            if seen.contains(name) {
                continue;
            }

            let command = match server_config.get("command").and_then(|v| v.as_str()) {
                Some(c) => c.to_string(),
                None => continue,
            };

            let args: Vec<String> = server_config
                .get("args")
                .and_then(|v| v.as_array())
                .map(|arr| {
                    arr.iter()
                        .filter_map(|v| v.as_str())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default();

            let env: HashMap<String, String> = server_config
                .get("env")
                .and_then(|v| v.as_object())
                .map(|obj| {
                    obj.iter()
                        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                        .collect()
                })
                .unwrap_or_default();

            seen.insert(name.clone());
            configs.push(Self {
                name: name.clone(),
                command,
                args,
                env,
            });
        }
    }
}

/// Name and description of a tool offered by the server
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// Live session with a file-access MCP server running as a child process.
///
/// Dropping it cancels the transport and kills the child; `shutdown` does the
/// same and waits for the service task to finish.
pub struct McpFileClient {
    server: String,
    tools: Vec<rmcp::model::Tool>,
    service: RunningService<RoleClient, ClientInfo>,
}

impl McpFileClient {
    /// Spawn the server, run the MCP handshake and fetch its tool list
    pub async fn connect(config: &McpServerConfig) -> Result<Self> {
        let env_keys: Vec<&str> = config.env.keys().map(|k| k.as_str()).collect();
        debug!(
            server = %config.name,
            command = %config.command,
            args = ?config.args,
            env_vars = ?env_keys,
            "Spawning file server child process"
        );

        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args);
        for (key, value) in &config.env {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let transport = TokioChildProcess::new(cmd).map_err(|e| {
            RetagError::Connect(format!("failed to spawn '{}': {}", config.command, e))
        })?;

        let client_info = ClientInfo {
            meta: None,
            protocol_version: Default::default(),
            capabilities: Default::default(),
            client_info: Implementation {
                name: "retag".into(),
                title: Some("retag manifest updater".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
        };

        let service = serve_client(client_info, transport).await.map_err(|e| {
            RetagError::Connect(format!("MCP handshake with '{}' failed: {}", config.name, e))
        })?;

        let tools = service
            .peer()
            .list_all_tools()
            .await
            .map_err(|e| RetagError::Connect(format!("failed to list tools: {}", e)))?;

        info!(
            server = %config.name,
            tools = ?tools.iter().map(|t| t.name.to_string()).collect::<Vec<_>>(),
            "Connected to file server"
        );

        let client = Self {
            server: config.name.clone(),
            tools,
            service,
        };
        for required in [READ_TOOL, WRITE_TOOL] {
            if !client.has_tool(required) {
                warn!(server = %client.server, tool = required, "File server does not advertise tool");
            }
        }
        Ok(client)
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name == name)
    }

    /// Tools advertised by the server at connect time
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name.to_string(),
                description: t.description.as_deref().unwrap_or("").to_string(),
            })
            .collect()
    }

    /// Cancel the session and reap the child process
    pub async fn shutdown(self) {
        info!(server = %self.server, "Disconnecting from file server");
        if let Err(e) = self.service.cancel().await {
            warn!(server = %self.server, error = %e, "File server task did not shut down cleanly");
        }
    }

    async fn call(&self, tool: &str, args: Value) -> std::result::Result<String, String> {
        debug!(server = %self.server, tool, "Calling MCP tool");

        let result: CallToolResult = self
            .service
            .peer()
            .call_tool(CallToolRequestParam {
                name: tool.to_string().into(),
                arguments: tool_arguments(args),
                meta: None,
                task: None,
            })
            .await
            .map_err(|e| format!("MCP tool call failed: {}", e))?;

        let text = result_text(&result);
        if result.is_error == Some(true) {
            return Err(if text.is_empty() {
                format!("{} reported an error", tool)
            } else {
                text
            });
        }
        Ok(text)
    }
}

#[async_trait]
impl FileAccess for McpFileClient {
    async fn read_file(&self, path: &str) -> Result<String> {
        self.call(READ_TOOL, json!({ "path": path }))
            .await
            .map_err(|reason| RetagError::Read {
                path: path.to_string(),
                reason,
            })
    }

    async fn write_file(&self, path: &str, content: &str) -> Result<String> {
        self.call(WRITE_TOOL, json!({ "path": path, "content": content }))
            .await
            .map_err(|reason| RetagError::Write {
                path: path.to_string(),
                reason,
            })
    }
}

fn tool_arguments(args: Value) -> Option<JsonObject> {
    match args {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Join every text-bearing content part with `\n`
fn result_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| c.as_text().map(|t| t.text.to_string()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::Content;

    #[test]
    fn test_parse_mcp_servers_basic() {
        let config: Value = json!({
            "mcpServers": {
                "fs": {
                    "command": "npx",
                    "args": ["-y", "@modelcontextprotocol/server-filesystem", "."],
                    "env": {"NODE_ENV": "production"}
                }
            }
        });

        let mut configs = Vec::new();
        let mut seen = HashSet::new();
        McpServerConfig::parse_mcp_servers(&config, &mut configs, &mut seen);

        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].name, "fs");
        assert_eq!(configs[0].command, "npx");
        assert_eq!(configs[0].args[1], "@modelcontextprotocol/server-filesystem");
        assert_eq!(configs[0].env.get("NODE_ENV").unwrap(), "production");
    }

    #[test]
    fn test_parse_mcp_servers_first_file_wins() {
        let project: Value = json!({"mcpServers": {"fs": {"command": "project-fs"}}});
        let global: Value = json!({"mcpServers": {"fs": {"command": "global-fs"}, "other": {"command": "x"}}});

        let mut configs = Vec::new();
        let mut seen = HashSet::new();
        McpServerConfig::parse_mcp_servers(&project, &mut configs, &mut seen);
        McpServerConfig::parse_mcp_servers(&global, &mut configs, &mut seen);

        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].command, "project-fs");
    }

    #[test]
    fn test_parse_mcp_servers_missing_command() {
        let config: Value = json!({
            "mcpServers": {
                "no_cmd": {"args": ["arg1"]},
                "has_cmd": {"command": "test", "args": []}
            }
        });

        let mut configs = Vec::new();
        let mut seen = HashSet::new();
        McpServerConfig::parse_mcp_servers(&config, &mut configs, &mut seen);

        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].name, "has_cmd");
    }

    #[test]
    fn test_from_mcp_configs_project_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".mcp.json"),
            r#"{"mcpServers": {"files": {"command": "mcp-fs", "args": ["/srv"]}}}"#,
        )
        .unwrap();

        let config = McpServerConfig::from_mcp_configs("files", Some(dir.path())).unwrap();
        assert_eq!(config.command, "mcp-fs");
        assert_eq!(config.args, vec!["/srv"]);
    }

    #[test]
    fn test_from_mcp_configs_unknown_name() {
        let dir = tempfile::tempdir().unwrap();
        let err = McpServerConfig::from_mcp_configs("definitely-not-configured-xyz", Some(dir.path()))
            .unwrap_err();
        assert!(matches!(err, RetagError::Config(_)));
    }

    #[test]
    fn test_from_section_defaults() {
        let config = McpServerConfig::from_section(&ServerSection::default());
        assert_eq!(config.command, "npx");
        assert_eq!(config.args.last().unwrap(), ".");
    }

    #[test]
    fn test_tool_arguments_object_only() {
        assert!(tool_arguments(json!({"path": "a"})).is_some());
        assert!(tool_arguments(json!("a")).is_none());
    }

    #[test]
    fn test_result_text_joins_text_parts() {
        let result = CallToolResult::success(vec![
            Content::text("apiVersion: v1"),
            Content::text("kind: Pod"),
        ]);
        assert_eq!(result_text(&result), "apiVersion: v1\nkind: Pod");
    }
}
