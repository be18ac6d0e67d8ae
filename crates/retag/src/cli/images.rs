// crates/retag/src/cli/images.rs
// `retag images` - print the Docker Hub catalog for a namespace

use anyhow::{Result, anyhow};
use retag::catalog::DockerHubClient;
use retag::config::EnvConfig;

pub async fn run_images(namespace: Option<String>) -> Result<()> {
    let env = EnvConfig::load();
    let namespace = namespace
        .or_else(|| env.dockerhub.namespace.clone())
        .ok_or_else(|| anyhow!("Set DOCKERHUB_NAMESPACE or pass --namespace"))?;

    let hub = DockerHubClient::from_env(&env.dockerhub).await;
    let images = hub.list_images(&namespace).await?;

    if images.is_empty() {
        println!("No images found for namespace {}.", namespace);
        return Ok(());
    }
    for image in &images {
        println!("{}", image);
    }
    Ok(())
}
