use std::path::PathBuf;

use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand, ValueEnum};
use verimed_client::{ClientConfig, ReviewDecision, VerificationRequest};

/// `VeriMed` command-line client
#[derive(Debug, Parser)]
#[command(name = "verimed", about = "Verify medical provider identities and licenses")]
pub struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "VERIMED_CONFIG")]
    pub config: Option<PathBuf>,

    /// API base URL (overrides the config file)
    #[arg(long, env = "VERIMED_BASE_URL")]
    pub base_url: Option<String>,

    /// API key (overrides the config file)
    #[arg(long, env = "VERIMED_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Per-call timeout in seconds (overrides the config file)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Bearer token for reviewer commands
    #[arg(long, env = "VERIMED_BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: Option<String>,

    /// Log filter directive, e.g. `debug` or `verimed_client=trace`
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Verify a single provider
    Verify(ProviderArgs),
    /// Verify every provider in a JSON file (array of requests)
    Batch {
        /// Path to the JSON file
        file: PathBuf,
    },
    /// Look up a previous verification
    Get {
        /// Transaction id returned by `verify`
        transaction_id: String,
    },
    /// Check API health
    Health,
    /// List supported countries (offline)
    Countries,
    /// List verifications awaiting manual review
    Reviews,
    /// Approve or reject a pending verification
    Review {
        /// Transaction id under review
        transaction_id: String,
        /// Decision to record
        #[arg(long, value_enum)]
        decision: Decision,
        /// Reason stored with the decision
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        reason: String,
    },
    /// Exchange admin credentials for a bearer token
    Login {
        /// Admin user name
        #[arg(long)]
        user: String,
        /// Admin password
        #[arg(long, env = "VERIMED_ADMIN_PASS", hide_env_values = true)]
        pass: String,
    },
}

#[derive(Debug, clap::Args)]
pub struct ProviderArgs {
    /// Caller-assigned provider identifier
    #[arg(long)]
    pub provider_id: String,
    /// Two-letter country code
    #[arg(long)]
    pub country: String,
    /// Provider first name
    #[arg(long)]
    pub first_name: String,
    /// Provider last name
    #[arg(long)]
    pub last_name: String,
    /// License number as issued by the national registry
    #[arg(long)]
    pub license: String,
    /// Date of birth, e.g. 1980-05-17
    #[arg(long)]
    pub date_of_birth: Option<String>,
}

impl From<ProviderArgs> for VerificationRequest {
    fn from(args: ProviderArgs) -> Self {
        let request = Self::new(
            args.provider_id,
            args.country,
            args.first_name,
            args.last_name,
            args.license,
        );

        match args.date_of_birth {
            Some(dob) => request.with_date_of_birth(dob),
            None => request,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn into_review(self, reason: String) -> ReviewDecision {
        match self {
            Self::Approve => ReviewDecision::approve(reason),
            Self::Reject => ReviewDecision::reject(reason),
        }
    }
}

impl Args {
    /// Resolve the client configuration from the config file and flags
    ///
    /// Flags take precedence over file values.
    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load(path)?,
            None => {
                let base_url = self
                    .base_url
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("--base-url or --config is required"))?;
                let api_key = self
                    .api_key
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("--api-key or --config is required"))?;
                ClientConfig::new(base_url, api_key)
            }
        };

        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(api_key) = &self.api_key {
            config.api_key = api_key.clone().into();
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        if let Some(token) = &self.bearer_token {
            config.bearer_token = Some(token.clone().into());
        }

        config.validate()?;

        Ok(config)
    }
}
