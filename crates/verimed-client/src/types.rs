use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// -- Verification request types --

/// Provider identity submitted for verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    /// Caller-assigned provider identifier
    pub provider_id: String,
    /// ISO 3166-1 alpha-2 country code of the licensing registry
    pub country_code: String,
    /// Provider first name
    pub first_name: String,
    /// Provider last name
    pub last_name: String,
    /// Registry license number
    pub license_number: String,
    /// Date of birth, omitted from the payload when absent or blank
    #[serde(default, skip_serializing_if = "is_blank")]
    pub date_of_birth: Option<String>,
}

impl VerificationRequest {
    /// Create a request without a date of birth
    pub fn new(
        provider_id: impl Into<String>,
        country_code: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        license_number: impl Into<String>,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            country_code: country_code.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            license_number: license_number.into(),
            date_of_birth: None,
        }
    }

    /// Attach a date of birth (e.g. `1980-05-17`)
    #[must_use]
    pub fn with_date_of_birth(mut self, date_of_birth: impl Into<String>) -> Self {
        self.date_of_birth = Some(date_of_birth.into());
        self
    }
}

#[allow(clippy::ref_option)]
fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

/// Body of a batch verification call
#[derive(Debug, Clone, Serialize)]
pub(crate) struct BatchRequest<'a> {
    pub providers: &'a [VerificationRequest],
}

// -- Verification result types --

/// Outcome of a verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// Provider confirmed by the registry or a reviewer
    Verified,
    /// Provider could not be confirmed
    Rejected,
    /// Verification still in progress
    Pending,
    /// Awaiting a human reviewer
    ManualReview,
    /// Verification failed to run (batch items only)
    Error,
}

/// How a verification was carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationMethod {
    /// Checked against a national registry API
    ApiRegistry,
    /// Checked by analysing uploaded documents
    AiDocument,
    /// Checked by a human reviewer
    Manual,
}

/// Result of a single verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Opaque transaction identifier
    pub transaction_id: String,
    /// Verification outcome
    pub status: VerificationStatus,
    /// Verification method
    pub method: VerificationMethod,
    /// Confidence in the outcome, between 0 and 1
    pub confidence_score: f64,
    /// Server timestamp of the verification
    pub verified_at: String,
    /// Free-form registry details
    #[serde(default, deserialize_with = "null_as_empty")]
    pub details: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// Per-provider entry of a batch result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemResult {
    /// Provider identifier from the request
    pub provider_id: String,
    /// Transaction identifier, empty when the item failed
    pub transaction_id: String,
    /// Verification outcome
    pub status: VerificationStatus,
    /// Failure reason for `ERROR` items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a batch verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchVerificationResult {
    /// Batch identifier
    pub batch_id: String,
    /// Number of providers submitted
    pub total: u32,
    /// Number of providers processed
    pub processed: u32,
    /// Per-provider results, in submission order
    pub results: Vec<BatchItemResult>,
    /// When processing started
    pub started_at: String,
    /// When processing finished
    pub completed_at: String,
}

// -- Manual review types --

/// Pending manual reviews
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingReviews {
    /// Number of pending reviews
    pub count: u64,
    /// Review records as returned by the server
    #[serde(default)]
    pub reviews: Vec<Map<String, Value>>,
}

/// Reviewer decision on a pending verification
///
/// The server rejects decisions without a reason, so one is always sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDecision {
    /// New status for the verification
    pub status: VerificationStatus,
    /// Reason recorded with the decision
    pub reason: String,
}

impl ReviewDecision {
    /// Create a decision with an explicit status
    pub fn new(status: VerificationStatus, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }

    /// Approve a verification
    pub fn approve(reason: impl Into<String>) -> Self {
        Self::new(VerificationStatus::Verified, reason)
    }

    /// Reject a verification
    pub fn reject(reason: impl Into<String>) -> Self {
        Self::new(VerificationStatus::Rejected, reason)
    }
}

/// Server acknowledgement of a review decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    /// Whether the decision was stored
    pub success: bool,
    /// Status now recorded
    pub status: VerificationStatus,
}

// -- Authentication types --

/// Admin credentials for `/auth/login`
#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub user: &'a str,
    pub pass: &'a str,
}

/// Token issued by a successful admin login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// JWT for the reviewer endpoints
    pub access_token: SecretString,
}
