// crates/retag/src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use std::path::PathBuf;
use tracing::{debug, info};

/// Docker Hub access loaded from environment variables
#[derive(Clone, Default)]
pub struct DockerHubEnv {
    /// Namespace whose repositories are listed (DOCKERHUB_NAMESPACE)
    pub namespace: Option<String>,
    /// Login user (DOCKERHUB_USERNAME)
    pub username: Option<String>,
    /// Login password or access token (DOCKERHUB_PASSWORD)
    pub password: Option<String>,
}

impl DockerHubEnv {
    pub fn from_env() -> Self {
        Self {
            namespace: read_var("DOCKERHUB_NAMESPACE"),
            username: read_var("DOCKERHUB_USERNAME"),
            password: read_var("DOCKERHUB_PASSWORD"),
        }
    }

    /// Username and password, only when both are present
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) => Some((u.as_str(), p.as_str())),
            _ => None,
        }
    }
}

impl std::fmt::Debug for DockerHubEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockerHubEnv")
            .field("namespace", &self.namespace)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl std::fmt::Display for DockerHubEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "namespace={} auth={}",
            self.namespace.as_deref().unwrap_or("(unset)"),
            if self.credentials().is_some() { "yes" } else { "no" }
        )
    }
}

/// Findings of `EnvConfig::validate`; only errors make it invalid
#[derive(Debug, Default)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ConfigValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors then warnings, one bullet each
    pub fn report(&self) -> String {
        if self.errors.is_empty() && self.warnings.is_empty() {
            return "Configuration OK".to_string();
        }
        let mut out = Vec::new();
        for (heading, items) in [("Errors:", &self.errors), ("Warnings:", &self.warnings)] {
            if items.is_empty() {
                continue;
            }
            out.push(heading.to_string());
            out.extend(items.iter().map(|item| format!("  - {}", item)));
        }
        out.join("\n")
    }
}

/// Environment configuration - all env vars in one place
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    /// LLM deployment identifier (DEPLOYMENT_ID). Not used by the update flow.
    pub deployment_id: Option<String>,
    /// Docker Hub catalog access
    pub dockerhub: DockerHubEnv,
    /// Explicit settings file (RETAG_CONFIG)
    pub config_path: Option<PathBuf>,
}

impl EnvConfig {
    /// Load all environment configuration (call once at startup)
    pub fn load() -> Self {
        info!("Loading environment configuration");

        let config = Self {
            deployment_id: read_var("DEPLOYMENT_ID"),
            dockerhub: DockerHubEnv::from_env(),
            config_path: read_var("RETAG_CONFIG").map(PathBuf::from),
        };
        debug!(
            deployment_id = config.deployment_id.is_some(),
            dockerhub = %config.dockerhub,
            "Environment loaded"
        );
        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::default();

        if self.deployment_id.is_none() {
            validation.warnings.push("DEPLOYMENT_ID is not set. LLM deployment is unconfigured.".to_string());
        }

        if self.dockerhub.namespace.is_none() {
            validation.warnings.push(
                "DOCKERHUB_NAMESPACE is not set. `retag images` and `--pick` are unavailable."
                    .to_string(),
            );
        }

        match (&self.dockerhub.username, &self.dockerhub.password) {
            (Some(_), None) => {
                validation.errors.push("DOCKERHUB_USERNAME is set but DOCKERHUB_PASSWORD is missing.".to_string())
            }
            (None, Some(_)) => {
                validation.errors.push("DOCKERHUB_PASSWORD is set but DOCKERHUB_USERNAME is missing.".to_string())
            }
            _ => {}
        }

        if let Some(ref path) = self.config_path
            && !path.is_file()
        {
            validation.warnings.push(format!(
                "RETAG_CONFIG points to {}, which does not exist. Defaults apply.",
                path.display()
            ));
        }

        validation
    }
}

/// Read a single variable, filtering empty values
fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_empty_env() {
        let config = EnvConfig::default();
        let validation = config.validate();
        assert!(validation.is_valid()); // Warnings don't make it invalid
        assert_eq!(validation.warnings.len(), 2);
    }

    #[test]
    fn test_validation_half_credentials() {
        let config = EnvConfig {
            deployment_id: Some("d0ed15d3637c8205".to_string()),
            dockerhub: DockerHubEnv {
                namespace: Some("tanmay471".to_string()),
                username: Some("tanmay".to_string()),
                password: None,
            },
            config_path: None,
        };
        let validation = config.validate();
        assert!(!validation.is_valid());
        assert!(validation.report().contains("DOCKERHUB_PASSWORD is missing"));
    }

    #[test]
    fn test_validation_ok_report() {
        let config = EnvConfig {
            deployment_id: Some("dep".to_string()),
            dockerhub: DockerHubEnv {
                namespace: Some("ns".to_string()),
                username: None,
                password: None,
            },
            config_path: None,
        };
        assert_eq!(config.validate().report(), "Configuration OK");
    }

    #[test]
    fn test_report_lists_errors_before_warnings() {
        let validation = ConfigValidation {
            warnings: vec!["w1".to_string()],
            errors: vec!["e1".to_string(), "e2".to_string()],
        };
        assert!(!validation.is_valid());
        assert_eq!(validation.report(), "Errors:\n  - e1\n  - e2\nWarnings:\n  - w1");
    }

    #[test]
    fn test_credentials_require_both() {
        let mut hub = DockerHubEnv {
            namespace: None,
            username: Some("u".to_string()),
            password: None,
        };
        assert!(hub.credentials().is_none());
        hub.password = Some("p".to_string());
        assert_eq!(hub.credentials(), Some(("u", "p")));
    }

    #[test]
    fn test_display_hides_password() {
        let hub = DockerHubEnv {
            namespace: Some("ns".to_string()),
            username: Some("u".to_string()),
            password: Some("hunter2".to_string()),
        };
        let shown = hub.to_string();
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("auth=yes"));
        assert!(!format!("{:?}", hub).contains("hunter2"));
    }
}
