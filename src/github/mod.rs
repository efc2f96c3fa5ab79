//! GitHub REST access: the [`GithubApi`] seam and its reqwest implementation.

pub mod types;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{StatusCode, Url};

use crate::error::{Error, FetchError, Result as SetupResult};
use crate::search::validate_query;

pub use types::{AccountKind, Repository, User, UserId, UserSearchPage};

/// Default REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const USER_AGENT_VALUE: &str = concat!("gh-user-search/", env!("CARGO_PKG_VERSION"));

/// The two calls the UI needs. Implemented by [`GithubClient`] and by fakes in tests.
#[async_trait]
pub trait GithubApi: Send + Sync {
    /// `GET /search/users`. Blank queries are rejected before any request.
    async fn search_users(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<UserSearchPage, FetchError>;

    /// `GET /users/{owner}/repos`. An empty owner yields an empty list without a request.
    async fn list_repositories(
        &self,
        owner: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Repository>, FetchError>;
}

/// reqwest-backed client.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    base_url: Url,
}

impl GithubClient {
    /// Build a client for `base_url`. A malformed base or token is a config error.
    pub fn new(base_url: &str, token: Option<&str>) -> SetupResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid API base {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!("invalid API base {base_url}")));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        if let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| Error::Config(format!("invalid token header: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments (percent-encoded) to the base URL.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn search_users_url(&self, query: &str, page: u32, per_page: u32) -> Url {
        let mut url = self.endpoint(&["search", "users"]);
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        url
    }

    pub fn repositories_url(&self, owner: &str, page: u32, per_page: u32) -> Url {
        let mut url = self.endpoint(&["users", owner, "repos"]);
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        url
    }

    async fn get_body(&self, url: Url) -> Result<String, FetchError> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            let exhausted = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v == "0");
            if exhausted {
                let retry_after = response
                    .headers()
                    .get("x-ratelimit-reset")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .map(|reset| {
                        let now = std::time::SystemTime::now()
                            .duration_since(std::time::UNIX_EPOCH)
                            .map(|d| d.as_secs())
                            .unwrap_or(0);
                        reset.saturating_sub(now)
                    })
                    .unwrap_or(60);
                return Err(FetchError::RateLimited { retry_after });
            }
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status: status.as_u16(), message });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn search_users(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<UserSearchPage, FetchError> {
        let query = validate_query(query)?;
        let body = self.get_body(self.search_users_url(query, page, per_page)).await?;
        types::decode_user_search(&body)
    }

    async fn list_repositories(
        &self,
        owner: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Repository>, FetchError> {
        if owner.is_empty() {
            return Ok(Vec::new());
        }
        let body = self.get_body(self.repositories_url(owner, page, per_page)).await?;
        types::decode_repositories(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    // Nothing listens here; any request that slips through fails fast.
    const DEAD_BASE: &str = "http://127.0.0.1:9";

    #[test]
    fn builds_search_url_with_encoded_query() {
        let client = GithubClient::new(DEFAULT_API_BASE, None).unwrap();
        let url = client.search_users_url("octo cat", 1, 5);
        assert_eq!(
            url.as_str(),
            "https://api.github.com/search/users?q=octo+cat&page=1&per_page=5"
        );
    }

    #[test]
    fn builds_repositories_url_under_base_path() {
        let client = GithubClient::new("https://ghe.example.com/api/v3/", Some("t0ken")).unwrap();
        let url = client.repositories_url("octocat", 2, 10);
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/users/octocat/repos?page=2&per_page=10"
        );
    }

    #[test]
    fn rejects_unusable_base() {
        assert!(matches!(GithubClient::new("not a url", None), Err(Error::Config(_))));
        assert!(matches!(GithubClient::new("ftp://ghe.local/api", None), Err(Error::Config(_))));
        assert!(matches!(
            GithubClient::new(DEFAULT_API_BASE, Some("bad\ntoken")),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn blank_query_never_reaches_network() {
        let client = GithubClient::new(DEAD_BASE, None).unwrap();
        let err = client.search_users("   ", 1, 5).await.unwrap_err();
        assert_eq!(err, FetchError::Validation(ValidationError::EmptyQuery));
    }

    #[tokio::test]
    async fn empty_owner_short_circuits() {
        let client = GithubClient::new(DEAD_BASE, None).unwrap();
        let repos = client.list_repositories("", 1, 10).await.unwrap();
        assert!(repos.is_empty());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let client = GithubClient::new(DEAD_BASE, None).unwrap();
        let err = client.list_repositories("octocat", 1, 10).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)), "got {err:?}");
    }
}
