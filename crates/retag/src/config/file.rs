// crates/retag/src/config/file.rs
// File-based configuration from retag.toml / ~/.retag/config.toml

use crate::error::Result;
use crate::patch::{DEFAULT_FIELD, DEFAULT_PREFIX, MatchPattern};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Manifest edited when no `--file-path` is given
pub const DEFAULT_MANIFEST_PATH: &str = "pipelines/serving.yaml";

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = "retag.toml";

/// Top-level config structure
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct RetagConfig {
    #[serde(default)]
    pub manifest: ManifestConfig,
    #[serde(default)]
    pub pattern: PatternConfig,
    #[serde(default)]
    pub server: ServerSection,
}

/// Manifest section
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ManifestConfig {
    #[serde(default = "default_manifest_path")]
    pub path: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path: default_manifest_path(),
        }
    }
}

/// Match pattern section
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PatternConfig {
    #[serde(default = "default_field")]
    pub field: String,
    /// Registry/namespace prefix, taken literally
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            field: default_field(),
            prefix: default_prefix(),
        }
    }
}

impl PatternConfig {
    pub fn compile(&self) -> Result<MatchPattern> {
        MatchPattern::new(&self.field, &self.prefix)
    }
}

/// File-access server launch settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerSection {
    #[serde(default = "default_server_command")]
    pub command: String,
    #[serde(default = "default_server_args")]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            command: default_server_command(),
            args: default_server_args(),
            env: HashMap::new(),
        }
    }
}

fn default_manifest_path() -> String {
    DEFAULT_MANIFEST_PATH.to_string()
}

fn default_field() -> String {
    DEFAULT_FIELD.to_string()
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_server_command() -> String {
    "npx".to_string()
}

fn default_server_args() -> Vec<String> {
    vec![
        "-y".to_string(),
        "@modelcontextprotocol/server-filesystem".to_string(),
        ".".to_string(),
    ]
}

impl RetagConfig {
    /// Load config: explicit path, else ./retag.toml, else ~/.retag/config.toml
    pub fn load(explicit: Option<&Path>) -> Self {
        match Self::config_path(explicit) {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Load a specific file; unreadable or invalid files fall back to defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config from file");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config file");
                    Self::default()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
        }
    }

    fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(p) = explicit {
            return Some(p.to_path_buf());
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        let global = dirs::home_dir()?.join(".retag").join("config.toml");
        global.is_file().then_some(global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[manifest]
path = "deploy/app.yaml"

[pattern]
prefix = "ghcr.io/acme/"

[server]
command = "mcp-fs"
args = ["--root", "/srv"]
env = { FS_READONLY = "0" }
"#;
        let config: RetagConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.manifest.path, "deploy/app.yaml");
        assert_eq!(config.pattern.field, "image:");
        assert_eq!(config.pattern.prefix, "ghcr.io/acme/");
        assert_eq!(config.server.command, "mcp-fs");
        assert_eq!(config.server.args, vec!["--root", "/srv"]);
        assert_eq!(config.server.env.get("FS_READONLY").unwrap(), "0");
    }

    #[test]
    fn test_parse_empty_config() {
        let config: RetagConfig = toml::from_str("").unwrap();
        assert_eq!(config, RetagConfig::default());
        assert_eq!(config.manifest.path, DEFAULT_MANIFEST_PATH);
        assert_eq!(config.server.command, "npx");
        assert_eq!(config.server.args.len(), 3);
    }

    #[test]
    fn test_pattern_compiles() {
        let config = RetagConfig::default();
        let pattern = config.pattern.compile().unwrap();
        assert_eq!(pattern.prefix(), DEFAULT_PREFIX);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[manifest]\npath = \"k8s/serve.yaml\"").unwrap();
        let config = RetagConfig::load_from(file.path());
        assert_eq!(config.manifest.path, "k8s/serve.yaml");
    }

    #[test]
    fn test_load_invalid_file_gives_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[manifest\npath = ").unwrap();
        assert_eq!(RetagConfig::load_from(file.path()), RetagConfig::default());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RetagConfig::load(Some(&dir.path().join("nope.toml")));
        assert_eq!(config, RetagConfig::default());
    }
}
