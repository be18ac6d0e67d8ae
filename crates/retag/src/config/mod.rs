// crates/retag/src/config/mod.rs
// Configuration and shared constants

pub mod env;
pub mod file;

pub use env::{ConfigValidation, DockerHubEnv, EnvConfig};
pub use file::{DEFAULT_MANIFEST_PATH, ManifestConfig, PatternConfig, RetagConfig, ServerSection};
