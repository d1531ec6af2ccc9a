//! API client for communicating with the catalog REST API.
//!
//! This module provides the `ApiClient` struct for signing in, registering
//! accounts, and fetching the catalog lists.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::models::{
    Article, Author, Award, CatalogSummary, Institution, SignInRequest, SignInResponse,
    SignUpRequest,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5174";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// API client for the catalog backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    initial_backoff: Duration,
}

impl ApiClient {
    /// Create a new API client for `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        })
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token,
            initial_backoff: self.initial_backoff,
        }
    }

    #[cfg(test)]
    fn with_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .context("Token is not a valid header value")?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let mut retries = 0;
        let mut backoff = self.initial_backoff;

        loop {
            let response = self
                .client
                .get(&url)
                .headers(self.auth_headers()?)
                .send()
                .await
                .map_err(ApiError::from)
                .with_context(|| format!("Failed to send GET request to {}", url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    return response
                        .json()
                        .await
                        .with_context(|| format!("Failed to parse JSON response from {}", url));
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = %url, retry = retries, backoff_ms = backoff.as_millis() as u64, "Rate limited, backing off");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
            }
        }
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response> {
        let url = self.url(path);
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send POST request to {}", url))?;
        Self::check_response(response).await
    }

    // ===== Account Methods =====

    /// Exchange credentials for a bearer token.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<String> {
        let body = SignInRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self.post("/user/sign-in", &body).await?;
        let parsed: SignInResponse = response
            .json()
            .await
            .context("Failed to parse sign-in response")?;
        if parsed.token.is_empty() {
            return Err(ApiError::InvalidResponse("sign-in returned an empty token".to_string()).into());
        }
        debug!(username, "Sign-in accepted");
        Ok(parsed.token)
    }

    /// Register a new account. Registration does not sign the user in.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<()> {
        self.post("/user/sign-up", request).await?;
        debug!(username = %request.username, "Registration accepted");
        Ok(())
    }

    // ===== Data Fetching Methods =====

    pub async fn fetch_authors(&self) -> Result<Vec<Author>> {
        self.get("/Author").await.context("Failed to fetch authors")
    }

    pub async fn fetch_articles(&self) -> Result<Vec<Article>> {
        self.get("/Article").await.context("Failed to fetch articles")
    }

    pub async fn fetch_institutions(&self) -> Result<Vec<Institution>> {
        self.get("/Institution")
            .await
            .context("Failed to fetch institutions")
    }

    pub async fn fetch_awards(&self) -> Result<Vec<Award>> {
        self.get("/Award").await.context("Failed to fetch awards")
    }

    /// Fetch all four lists concurrently and summarize them.
    pub async fn fetch_summary(&self) -> Result<CatalogSummary> {
        let (authors, articles, awards, institutions) = futures::try_join!(
            self.fetch_authors(),
            self.fetch_articles(),
            self.fetch_awards(),
            self.fetch_institutions(),
        )?;
        Ok(CatalogSummary::build(
            &authors,
            &articles,
            awards.len(),
            institutions.len(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::error::{find_api_error, is_unauthorized};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri())
            .unwrap()
            .with_backoff(Duration::from_millis(1))
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:5174/").unwrap();
        assert_eq!(client.url("/Author"), "http://localhost:5174/Author");
    }

    #[test]
    fn test_auth_headers() {
        let client = ApiClient::new(DEFAULT_BASE_URL).unwrap();
        assert!(client.auth_headers().unwrap().is_empty());

        let authed = client.with_token(Some("abc".to_string()));
        let headers = authed.auth_headers().unwrap();
        assert_eq!(headers.get(reqwest::header::AUTHORIZATION).unwrap(), "Bearer abc");
    }

    #[tokio::test]
    async fn test_fetch_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Institution"))
            .and(header("authorization", "Bearer abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "name": "MIT", "country": "USA"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).with_token(Some("abc123".to_string()));
        let institutions = client.fetch_institutions().await.unwrap();
        assert_eq!(institutions.len(), 1);
        assert_eq!(institutions[0].name, "MIT");
    }

    #[tokio::test]
    async fn test_unauthorized_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Author"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client_for(&server).with_token(Some("expired".to_string()));
        let err = client.fetch_authors().await.unwrap_err();
        assert!(is_unauthorized(&err));
    }

    #[tokio::test]
    async fn test_rate_limit_retries_then_gives_up() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Award"))
            .respond_with(ResponseTemplate::new(429))
            .expect(u64::from(MAX_RATE_LIMIT_RETRIES) + 1)
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_awards().await.unwrap_err();
        assert!(matches!(find_api_error(&err), Some(ApiError::RateLimited)));
    }

    #[tokio::test]
    async fn test_sign_in_posts_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/sign-in"))
            .and(body_json(serde_json::json!({"UserName": "ada", "PassWord": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "tok"})))
            .mount(&server)
            .await;

        let token = client_for(&server).sign_in("ada", "pw").await.unwrap();
        assert_eq!(token, "tok");
    }

    #[tokio::test]
    async fn test_sign_in_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/sign-in"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client_for(&server).sign_in("ada", "bad").await.unwrap_err();
        assert!(is_unauthorized(&err));
    }

    #[tokio::test]
    async fn test_sign_in_empty_token_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/sign-in"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": ""})))
            .mount(&server)
            .await;

        let err = client_for(&server).sign_in("ada", "pw").await.unwrap_err();
        assert!(matches!(find_api_error(&err), Some(ApiError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_fetch_summary() {
        let server = MockServer::start().await;
        let lists = [
            ("/Author", serde_json::json!([{"author_id": 1, "first_name": "A", "last_name": "B", "articles": "x,y"}])),
            ("/Article", serde_json::json!([{"article_id": 1, "title": "x"}, {"article_id": 2, "title": "y"}])),
            ("/Award", serde_json::json!([])),
            ("/Institution", serde_json::json!([{"id": 1, "name": "I"}])),
        ];
        for (p, body) in lists {
            Mock::given(method("GET"))
                .and(path(p))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(&server)
                .await;
        }

        let summary = client_for(&server).fetch_summary().await.unwrap();
        assert_eq!(summary.author_count, 1);
        assert_eq!(summary.article_count, 2);
        assert_eq!(summary.award_count, 0);
        assert_eq!(summary.institution_count, 1);
        assert_eq!(summary.top_authors[0].articles, 2);
    }
}
