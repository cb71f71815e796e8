use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const USERS_PATH: &str = "/users";

#[derive(Debug, Error)]
pub enum UserCountError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("listing endpoint answered {status}")]
    Status { status: reqwest::StatusCode },
    #[error("malformed listing body: {0}")]
    Body(#[from] serde_json::Error),
    #[error("listing body has no `utilisateurs` array")]
    MissingCollection,
}

#[derive(Debug, Deserialize)]
struct UserListing {
    utilisateurs: Vec<Value>,
}

/// Number of entries in the `utilisateurs` collection of a listing body.
pub fn count_from_body(body: &str) -> Result<usize, UserCountError> {
    let value: Value = serde_json::from_str(body)?;
    if !value.get("utilisateurs").is_some_and(Value::is_array) {
        return Err(UserCountError::MissingCollection);
    }
    let listing: UserListing = serde_json::from_value(value)?;
    Ok(listing.utilisateurs.len())
}

/// Reusable handle on the listing endpoint.
#[derive(Debug, Clone)]
pub struct UserCountClient {
    client: Client,
    base_url: String,
}

impl UserCountClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn users_url(&self) -> String {
        format!("{}{}", self.base_url, USERS_PATH)
    }

    pub async fn fetch(&self) -> Result<usize, UserCountError> {
        let url = self.users_url();
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let request_failed = |source| UserCountError::Request {
            url: url.clone(),
            source,
        };
        let response = self
            .client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "user listing request rejected");
            return Err(UserCountError::Status { status });
        }

        let body = response.text().await.map_err(request_failed)?;
        let count = count_from_body(&body)?;
        debug!(%url, count, "user listing fetched");
        Ok(count)
    }
}

/// One-shot fetch against `base_url`.
pub async fn fetch_user_count(base_url: &str) -> Result<usize, UserCountError> {
    UserCountClient::new(base_url).fetch().await
}
