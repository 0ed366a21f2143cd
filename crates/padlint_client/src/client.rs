//! HTTP client for LanguageTool-compatible checking services.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use tracing::{debug, info};
use url::Url;

use padlint_text::units::truncate_utf16;

use crate::api::{CheckRequest, CheckResponse};
use crate::error::ClientError;

/// Default checking endpoint.
pub const DEFAULT_API_URL: &str = "http://localhost:8010/v2/check";

/// Default timeout for check requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum text length in UTF-16 units.
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 60_000;

/// Something that can check text for issues.
///
/// Implemented by [`LanguageToolClient`] and by in-memory fakes in tests.
pub trait Checker {
    /// Checks `request.text` and returns the normalized response.
    fn check(
        &self,
        request: CheckRequest,
    ) -> impl Future<Output = Result<CheckResponse, ClientError>> + Send;
}

/// Client for a LanguageTool `/v2/check` endpoint.
#[derive(Debug, Clone)]
pub struct LanguageToolClient {
    http: reqwest::Client,
    api_url: Url,
    timeout: Duration,
    max_text_length: usize,
}

/// Builder for [`LanguageToolClient`].
#[derive(Debug)]
pub struct LanguageToolClientBuilder {
    api_url: String,
    timeout: Duration,
    max_text_length: usize,
}

impl LanguageToolClient {
    /// Create a new builder with default settings.
    pub fn builder() -> LanguageToolClientBuilder {
        LanguageToolClientBuilder {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
        }
    }

    /// Creates a client for `api_url` with default settings.
    pub fn new(api_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().api_url(api_url).build()
    }

    /// Returns the endpoint URL.
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the maximum text length sent to the service.
    pub fn max_text_length(&self) -> usize {
        self.max_text_length
    }

    /// Sends a check request.
    ///
    /// Empty text returns an empty response without a request. Longer text
    /// than the configured limit is truncated, never splitting a surrogate
    /// pair.
    pub async fn check_text(&self, mut request: CheckRequest) -> Result<CheckResponse, ClientError> {
        if request.text.is_empty() {
            return Ok(CheckResponse::default());
        }

        let keep = truncate_utf16(&request.text, self.max_text_length).len();
        if keep < request.text.len() {
            debug!(
                "Truncating text from {} to {} bytes",
                request.text.len(),
                keep
            );
            request.text.truncate(keep);
        }

        debug!(
            "Checking {} bytes with language '{}' at {}",
            request.text.len(),
            request.language,
            self.api_url
        );

        let response = self
            .http
            .post(self.api_url.clone())
            .header(ACCEPT, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::from_transport(e, self.timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::from_transport(e, self.timeout))?;

        if status != StatusCode::OK {
            debug!("Check failed with status {}", status);
            return Err(ClientError::from_status(status.as_u16(), body));
        }

        let parsed: CheckResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        info!("Check completed: {} issue(s)", parsed.matches.len());
        Ok(parsed)
    }
}

impl Checker for LanguageToolClient {
    async fn check(&self, request: CheckRequest) -> Result<CheckResponse, ClientError> {
        self.check_text(request).await
    }
}

impl LanguageToolClientBuilder {
    /// Set the endpoint URL.
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set timeout for check requests.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum text length in UTF-16 units.
    pub fn max_text_length(mut self, max: usize) -> Self {
        self.max_text_length = max;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<LanguageToolClient, ClientError> {
        let api_url = Url::parse(&self.api_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.api_url, e)))?;

        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "{}: unsupported scheme '{}'",
                self.api_url,
                api_url.scheme()
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ClientError::ClientBuild(e.to_string()))?;

        Ok(LanguageToolClient {
            http,
            api_url,
            timeout: self.timeout,
            max_text_length: self.max_text_length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use crate::api::RuleFilters;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> LanguageToolClient {
        LanguageToolClient::new(format!("{}/v2/check", server.uri())).unwrap()
    }

    #[test]
    fn builder_default_values() {
        let client = LanguageToolClient::builder().build().unwrap();

        assert_eq!(client.api_url().as_str(), DEFAULT_API_URL);
        assert_eq!(client.timeout(), Duration::from_secs(30));
        assert_eq!(client.max_text_length(), 60_000);
    }

    #[test]
    fn builder_custom_values() {
        let client = LanguageToolClient::builder()
            .api_url("https://api.languagetool.org/v2/check")
            .timeout(Duration::from_secs(5))
            .max_text_length(100)
            .build()
            .unwrap();

        assert_eq!(client.api_url().host_str(), Some("api.languagetool.org"));
        assert_eq!(client.timeout(), Duration::from_secs(5));
        assert_eq!(client.max_text_length(), 100);
    }

    #[rstest]
    #[case::not_a_url("not a url")]
    #[case::ftp("ftp://example.com/v2/check")]
    fn builder_rejects_invalid_url(#[case] url: &str) {
        let err = LanguageToolClient::new(url).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_check_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/check"))
            .and(header("accept", "application/json"))
            .and(body_partial_json(json!({ "text": "Teh cat sat.", "language": "en" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "matches": [{
                    "offset": 0,
                    "length": 3,
                    "message": "Possible spelling mistake found.",
                    "replacements": [{ "value": "The" }]
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .check_text(CheckRequest::new("Teh cat sat.", "en"))
            .await
            .unwrap();

        assert_eq!(response.matches.len(), 1);
        assert_eq!(response.matches[0].replacements, vec!["The"]);
        assert!(response.language.is_empty());
        assert!(response.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_filters_are_forwarded() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/check"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "matches": [] })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = CheckRequest::new("text", "en-US").with_filters(RuleFilters {
            disabled_rules: vec!["UPPERCASE_SENTENCE_START".to_string()],
            ..Default::default()
        });
        client.check_text(request).await.unwrap();

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
        assert_eq!(body["disabledRules"], json!(["UPPERCASE_SENTENCE_START"]));
        assert!(body.get("enabledRules").is_none());
    }

    #[tokio::test]
    async fn test_empty_text_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.check_text(CheckRequest::new("", "en")).await.unwrap();
        assert_eq!(response, CheckResponse::default());
    }

    #[tokio::test]
    async fn test_long_text_is_truncated() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "text": "ab" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = LanguageToolClient::builder()
            .api_url(format!("{}/v2/check", server.uri()))
            .max_text_length(3)
            .build()
            .unwrap();

        // The emoji would straddle the limit and is dropped whole.
        client
            .check_text(CheckRequest::new("ab🎉cd", "en"))
            .await
            .unwrap();
    }

    #[rstest]
    #[case::bad_request(400, ErrorCode::BadRequest)]
    #[case::too_long(413, ErrorCode::TextTooLong)]
    #[case::rate_limit(429, ErrorCode::RateLimit)]
    #[case::server(500, ErrorCode::ServerError)]
    #[case::other(404, ErrorCode::UnknownError)]
    #[tokio::test]
    async fn test_error_status(#[case] status: u16, #[case] expected: ErrorCode) {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .check_text(CheckRequest::new("x", "en"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), expected);
    }

    #[tokio::test]
    async fn test_invalid_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .check_text(CheckRequest::new("x", "en"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidResponse);
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = LanguageToolClient::builder()
            .api_url(format!("{}/v2/check", server.uri()))
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        let err = client
            .check_text(CheckRequest::new("x", "en"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Timeout);
        assert_eq!(
            err.user_message(),
            "Request timed out. The text may be too long."
        );
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Bind then drop to get a port nobody listens on.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = LanguageToolClient::new(format!("http://127.0.0.1:{port}/v2/check")).unwrap();
        let err = client
            .check(CheckRequest::new("x", "en"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
