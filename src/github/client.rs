//! GitHub REST implementation of [`ApprovalApi`].

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::{header, Client};
use serde_json::{json, Value};

use super::ApprovalApi;
use crate::config::GitHubConfig;
use crate::models::review::ReviewRequestRef;
use crate::{AppError, Result};

const USER_AGENT: &str = concat!("pr-approve-bot/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

/// Submits pull request reviews through the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: String,
    token: String,
    timeout: Duration,
}

impl GitHubClient {
    /// Create a client for `base_url` authenticating with `token`.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            token: token.into(),
            timeout,
        }
    }

    /// Create a client from the loaded GitHub configuration.
    #[must_use]
    pub fn from_config(config: &GitHubConfig) -> Self {
        Self::new(
            config.api_base_url.clone(),
            config.token.clone(),
            config.request_timeout(),
        )
    }

    fn reviews_url(&self, pull_request: &ReviewRequestRef) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}/reviews",
            self.base_url, pull_request.owner, pull_request.repo, pull_request.number
        )
    }

    async fn post_approval(&self, pull_request: &ReviewRequestRef) -> Result<()> {
        let response = self
            .http
            .post(self.reviews_url(pull_request))
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header(header::USER_AGENT, USER_AGENT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .timeout(self.timeout)
            .json(&json!({ "event": "APPROVE" }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|value| value["message"].as_str().map(str::to_owned))
            .unwrap_or(body);
        Err(AppError::GitHub(format!("GitHub API {status}: {message}")))
    }
}

impl ApprovalApi for GitHubClient {
    fn create_approval<'a>(
        &'a self,
        pull_request: &'a ReviewRequestRef,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(self.post_approval(pull_request))
    }
}
