// crates/retag/src/catalog.rs
// Docker Hub catalog - lists `repo:tag` images available under a namespace

use crate::config::DockerHubEnv;
use crate::error::{Result, RetagError};
use crate::http::create_shared_client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, warn};

/// Public Docker Hub API root
pub const DOCKER_HUB_URL: &str = "https://hub.docker.com";

/// Results requested per page
pub const PAGE_SIZE: u32 = 100;

/// Safety cap on pages followed per listing
const MAX_PAGES: usize = 200;

/// One page of a paginated Docker Hub listing
#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default)]
    next: Option<String>,
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Repository {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Docker Hub API client
pub struct DockerHubClient {
    http: reqwest::Client,
    base_url: String,
    jwt: Option<String>,
}

impl DockerHubClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_base_url(http, DOCKER_HUB_URL)
    }

    pub fn with_base_url(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            jwt: None,
        }
    }

    /// Build a client from environment settings, logging in when credentials exist.
    /// A failed login is logged and the client continues anonymously.
    pub async fn from_env(env: &DockerHubEnv) -> Self {
        let mut client = Self::new(create_shared_client());
        if let Some((username, password)) = env.credentials()
            && let Err(e) = client.login(username, password).await
        {
            warn!(error = %e, "Docker Hub login failed, continuing anonymously");
        }
        client
    }

    /// Exchange credentials for a JWT used on later requests
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let url = format!("{}/v2/users/login", self.base_url);
        let res = self
            .http
            .post(&url)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(RetagError::Catalog(format!(
                "Docker Hub login failed: {} {}",
                status, body
            )));
        }

        let login: LoginResponse = res.json().await?;
        self.jwt = Some(login.token);
        debug!("Docker Hub login succeeded");
        Ok(())
    }

    /// All `repo:tag` names under `namespace`, sorted ascending
    pub async fn list_images(&self, namespace: &str) -> Result<Vec<String>> {
        let repos: Vec<Repository> = self.paginate(&repositories_url(&self.base_url, namespace)).await?;

        let mut images = Vec::new();
        for repo in &repos {
            let tags: Vec<Tag> = self
                .paginate(&tags_url(&self.base_url, namespace, &repo.name))
                .await?;
            images.extend(tags.into_iter().map(|t| format!("{}:{}", repo.name, t.name)));
        }

        images.sort();
        info!(namespace, repos = repos.len(), images = images.len(), "Listed Docker Hub images");
        Ok(images)
    }

    async fn paginate<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(url.to_string());
        let mut pages = 0;

        while let Some(url) = next.take() {
            pages += 1;
            if pages > MAX_PAGES {
                warn!(url = %url, "Page limit reached, listing truncated");
                break;
            }
            let page: Page<T> = self.fetch_json(&url).await?;
            items.extend(page.results);
            next = page.next.filter(|n| !n.is_empty());
        }

        Ok(items)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut req = self.http.get(url).header("Accept", "application/json");
        if let Some(ref jwt) = self.jwt {
            req = req.header("Authorization", format!("JWT {}", jwt));
        }

        let res = req.send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(RetagError::Catalog(format!(
                "request failed {} for {}: {}",
                status, url, body
            )));
        }
        Ok(res.json().await?)
    }
}

fn repositories_url(base: &str, namespace: &str) -> String {
    format!(
        "{}/v2/repositories/{}/?page_size={}",
        base,
        urlencoding::encode(namespace),
        PAGE_SIZE
    )
}

fn tags_url(base: &str, namespace: &str, repo: &str) -> String {
    format!(
        "{}/v2/repositories/{}/{}/tags?page_size={}",
        base,
        urlencoding::encode(namespace),
        urlencoding::encode(repo),
        PAGE_SIZE
    )
}
