// crates/retag/src/cli/check.rs
// `retag check` - configuration status report

use super::load_settings;
use anyhow::{Result, bail};
use std::path::PathBuf;

pub fn run_check(config_override: Option<PathBuf>) -> Result<()> {
    let (env, config) = load_settings(config_override);

    println!("Manifest:   {}", config.manifest.path);
    println!("Pattern:    {} <{}>name:tag", config.pattern.field, config.pattern.prefix);
    println!("Server:     {} {}", config.server.command, config.server.args.join(" "));
    println!(
        "Deployment: {}",
        env.deployment_id.as_deref().unwrap_or("(unset)")
    );
    println!("Docker Hub: {}", env.dockerhub);
    println!();

    // Fails on an unusable field/prefix
    config.pattern.compile()?;

    let validation = env.validate();
    println!("{}", validation.report());
    if !validation.is_valid() {
        bail!("configuration has errors");
    }
    Ok(())
}
