use std::path::Path;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use crate::error::{Result, VerimedError};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the verification API
///
/// Can be built in code or loaded from a TOML file:
///
/// ```toml
/// base_url = "https://api.verimed.app"
/// api_key = "{{ env.VERIMED_API_KEY }}"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the API; trailing slashes are ignored
    pub base_url: String,
    /// API key sent in the `x-api-key` header
    pub api_key: SecretString,
    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer token for reviewer endpoints
    #[serde(default)]
    pub bearer_token: Option<SecretString>,
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    /// Create a config with the default 30 second timeout
    pub fn new(base_url: impl Into<String>, api_key: impl Into<SecretString>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            bearer_token: None,
        }
    }

    /// Override the per-call timeout
    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the bearer token used by reviewer endpoints
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<SecretString>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Per-call timeout
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load configuration from a TOML file
    ///
    /// `{{ env.VAR }}` placeholders are expanded before parsing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a placeholder cannot be
    /// resolved, the TOML is invalid, or validation fails
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            VerimedError::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;

        raw.parse()
    }

    /// Check that the configuration can produce a working client
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the timeout is zero
    pub fn validate(&self) -> Result<()> {
        crate::response::parse_base_url(&self.base_url)?;

        if self.timeout_secs == 0 {
            return Err(VerimedError::Config("timeout_secs must be greater than zero".to_owned()));
        }

        Ok(())
    }
}

impl std::str::FromStr for ClientConfig {
    type Err = VerimedError;

    fn from_str(raw: &str) -> Result<Self> {
        let expanded = crate::env::expand_env(raw)?;

        let config: Self = toml::from_str(&expanded)
            .map_err(|e| VerimedError::Config(format!("failed to parse config: {e}")))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn defaults_apply() {
        let config: ClientConfig = r#"
            base_url = "https://api.verimed.app/"
            api_key = "k-123"
        "#
        .parse()
        .unwrap();

        assert_eq!(config.base_url, "https://api.verimed.app/");
        assert_eq!(config.api_key.expose_secret(), "k-123");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.bearer_token.is_none());
    }

    #[test]
    fn expands_env_placeholders() {
        temp_env::with_var("VERIMED_CONFIG_TEST_KEY", Some("from-env"), || {
            let config: ClientConfig = r#"
                base_url = "https://api.verimed.app"
                api_key = "{{ env.VERIMED_CONFIG_TEST_KEY }}"
                timeout_secs = 5
            "#
            .parse()
            .unwrap();

            assert_eq!(config.api_key.expose_secret(), "from-env");
            assert_eq!(config.timeout_secs, 5);
        });
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = r#"
            base_url = "https://api.verimed.app"
            api_key = "k"
            retries = 3
        "#
        .parse::<ClientConfig>()
        .unwrap_err();

        assert!(err.to_string().contains("retries"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = r#"
            base_url = "https://api.verimed.app"
            api_key = "k"
            timeout_secs = 0
        "#
        .parse::<ClientConfig>()
        .unwrap_err();

        assert!(matches!(err, VerimedError::Config(_)));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ClientConfig::new("::nope::", "k").validate().unwrap_err();

        assert!(err.to_string().contains("invalid base URL"));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = ClientConfig::new("https://api.verimed.app", "super-secret").with_bearer_token("jwt-token");

        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("jwt-token"));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"http://localhost:3000\"").unwrap();
        writeln!(file, "api_key = \"k\"").unwrap();
        writeln!(file, "bearer_token = \"jwt\"").unwrap();

        let config = ClientConfig::load(file.path()).unwrap();

        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.bearer_token.unwrap().expose_secret(), "jwt");
    }

    #[test]
    fn example_config_parses() {
        let vars = [("VERIMED_API_KEY", Some("example-key")), ("VERIMED_BASE_URL", None)];
        temp_env::with_vars(vars, || {
            let config: ClientConfig = include_str!("../../../verimed.example.toml").parse().unwrap();

            assert_eq!(config.base_url, "https://api.verimed.app");
            assert_eq!(config.api_key.expose_secret(), "example-key");
            assert!(config.bearer_token.is_none());
        });
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let err = ClientConfig::load(Path::new("/nonexistent/verimed.toml")).unwrap_err();

        assert!(err.to_string().contains("failed to read config file"));
    }
}
