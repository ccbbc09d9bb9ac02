use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::countries::{SupportedCountry, supported_countries};
use crate::error::{Result, VerimedError};
use crate::response::{decode, default_headers, endpoint, parse_base_url};
use crate::types::{
    BatchRequest, BatchVerificationResult, LoginRequest, LoginResponse, PendingReviews,
    ReviewDecision, ReviewOutcome, VerificationRequest, VerificationResult,
};

/// Async HTTP client for the `VeriMed` verification API
///
/// Holds only static configuration; every call is independent and the
/// client can be cloned and shared across tasks.
#[derive(Clone)]
pub struct VerimedClient {
    http: reqwest::Client,
    base_url: Url,
    bearer_token: Option<SecretString>,
}

impl VerimedClient {
    /// Create a client from its configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or API key is invalid, or the
    /// HTTP client cannot be built
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let base_url = parse_base_url(&config.base_url)?;

        let http = reqwest::Client::builder()
            .default_headers(default_headers(&config.api_key)?)
            .timeout(config.timeout())
            .user_agent(concat!("verimed-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VerimedError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            bearer_token: config.bearer_token,
        })
    }

    /// Base URL with trailing slashes removed
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Use a bearer token for the reviewer endpoints, e.g. one from [`Self::login`]
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<SecretString>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    // -- Verification --

    /// Verify a single provider
    ///
    /// POST `/v1/verify`
    pub async fn verify(&self, request: &VerificationRequest) -> Result<VerificationResult> {
        self.send(Method::POST, &["v1", "verify"], Some(request), false)
            .await
    }

    /// Verify several providers in one call
    ///
    /// POST `/v1/verify/batch`
    pub async fn verify_batch(
        &self,
        providers: &[VerificationRequest],
    ) -> Result<BatchVerificationResult> {
        let body = BatchRequest { providers };

        self.send(Method::POST, &["v1", "verify", "batch"], Some(&body), false)
            .await
    }

    /// Fetch a previous verification by transaction id
    ///
    /// GET `/v1/verify/:transactionId`
    pub async fn get_verification(&self, transaction_id: &str) -> Result<VerificationResult> {
        self.send::<(), _>(Method::GET, &["v1", "verify", transaction_id], None, false)
            .await
    }

    /// Check API health
    ///
    /// GET `/health`
    pub async fn health(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
        self.send::<(), _>(Method::GET, &["health"], None, false)
            .await
    }

    /// Countries the API accepts (no network call)
    #[allow(clippy::unused_self)]
    pub fn supported_countries(&self) -> &'static [SupportedCountry] {
        supported_countries()
    }

    // -- Manual review --

    /// List verifications awaiting a reviewer
    ///
    /// GET `/v1/reviews`, requires a bearer token
    pub async fn pending_reviews(&self) -> Result<PendingReviews> {
        self.send::<(), _>(Method::GET, &["v1", "reviews"], None, true)
            .await
    }

    /// Record a reviewer decision for a verification
    ///
    /// PUT `/v1/verify/:transactionId/review`, requires a bearer token
    pub async fn review_verification(
        &self,
        transaction_id: &str,
        decision: &ReviewDecision,
    ) -> Result<ReviewOutcome> {
        self.send(
            Method::PUT,
            &["v1", "verify", transaction_id, "review"],
            Some(decision),
            true,
        )
        .await
    }

    // -- Authentication --

    /// Exchange admin credentials for a bearer token
    ///
    /// POST `/auth/login`; bad credentials surface as a 401
    pub async fn login(&self, user: &str, pass: &SecretString) -> Result<LoginResponse> {
        let credentials = LoginRequest {
            user,
            pass: pass.expose_secret(),
        };

        self.send(Method::POST, &["auth", "login"], Some(&credentials), false)
            .await
    }

    /// Perform one request and map its response
    async fn send<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
        bearer: bool,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = endpoint(&self.base_url, segments);
        tracing::debug!(%method, path = url.path(), "sending verification API request");

        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        if bearer && let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder.send().await.inspect_err(|e| {
            tracing::warn!(error = %e, "verification API request failed");
        })?;

        let status = response.status();
        let text = response.text().await?;

        decode(status, text)
    }
}

impl std::fmt::Debug for VerimedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerimedClient")
            .field("base_url", &self.base_url())
            .finish_non_exhaustive()
    }
}
