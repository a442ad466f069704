use reqwest::{Method, StatusCode, Url};
use thiserror::Error;
use tracing::warn;

use crate::models::{ErrorResponse, MessageResponse, RosterSnapshot};

/// Shown when the server rejects a request without a readable detail.
pub const FALLBACK_DETAIL: &str = "An error occurred";

/// Shown when the server applied a change but its reply could not be read.
pub const APPLIED_FALLBACK: &str = "Request completed";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid roster url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    /// The request never completed, or the reply could not be read.
    #[error("roster request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// The server answered with a failure status; `detail` is its message.
    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },
}

#[derive(Debug, Clone)]
pub struct RosterClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RosterClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: base_url.to_string(),
                reason: "not a base url".to_string(),
            });
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: parsed,
        })
    }

    pub async fn fetch_roster(&self) -> Result<RosterSnapshot, ClientError> {
        let url = self.endpoint(&["activities"])?;
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(rejected(status, resp).await);
        }
        Ok(resp.json::<RosterSnapshot>().await?)
    }

    /// Returns the server's success message.
    pub async fn signup(&self, activity_name: &str, email: &str) -> Result<String, ClientError> {
        self.mutate(Method::POST, activity_name, "signup", email)
            .await
    }

    pub async fn unregister(&self, activity_name: &str, email: &str) -> Result<String, ClientError> {
        self.mutate(Method::DELETE, activity_name, "unregister", email)
            .await
    }

    async fn mutate(
        &self,
        method: Method,
        activity_name: &str,
        action: &str,
        email: &str,
    ) -> Result<String, ClientError> {
        let mut url = self.endpoint(&["activities", activity_name, action])?;
        url.query_pairs_mut().append_pair("email", email);

        let resp = self.http.request(method, url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(rejected(status, resp).await);
        }
        // Any 2xx means the change was applied, readable body or not.
        match resp.json::<MessageResponse>().await {
            Ok(body) => Ok(body.message),
            Err(e) => {
                warn!(status = %status, "unreadable success reply: {}", e);
                Ok(APPLIED_FALLBACK.to_string())
            }
        }
    }

    /// Appends percent-encoded path segments to the base url.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| ClientError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "not a base url".to_string(),
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }
}

async fn rejected(status: StatusCode, resp: reqwest::Response) -> ClientError {
    let detail = resp
        .json::<ErrorResponse>()
        .await
        .map(|body| body.detail)
        .unwrap_or_else(|_| FALLBACK_DETAIL.to_string());
    ClientError::Rejected { status, detail }
}
