#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod telemetry;

use args::{Args, Command};
use clap::Parser;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::json;
use verimed_client::{VerificationRequest, VerimedClient, VerimedError, supported_countries};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    telemetry::init(&args.log_level);

    // Offline command, no configuration needed
    if matches!(args.command, Command::Countries) {
        return print_json(supported_countries());
    }

    let config = args.client_config()?;
    tracing::debug!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "client configured");

    let client = VerimedClient::new(config).map_err(report)?;

    match args.command {
        Command::Verify(provider) => {
            let result = client.verify(&provider.into()).await.map_err(report)?;
            print_json(&result)
        }
        Command::Batch { file } => {
            let raw = std::fs::read_to_string(&file)
                .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", file.display()))?;
            let providers: Vec<VerificationRequest> = serde_json::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("invalid batch file {}: {e}", file.display()))?;

            tracing::info!(count = providers.len(), "submitting batch");

            let result = client.verify_batch(&providers).await.map_err(report)?;
            print_json(&result)
        }
        Command::Get { transaction_id } => {
            let result = client
                .get_verification(&transaction_id)
                .await
                .map_err(report)?;
            print_json(&result)
        }
        Command::Health => print_json(&client.health().await.map_err(report)?),
        Command::Countries => print_json(client.supported_countries()),
        Command::Reviews => print_json(&client.pending_reviews().await.map_err(report)?),
        Command::Review {
            transaction_id,
            decision,
            reason,
        } => {
            let outcome = client
                .review_verification(&transaction_id, &decision.into_review(reason))
                .await
                .map_err(report)?;
            print_json(&outcome)
        }
        Command::Login { user, pass } => {
            let login = client
                .login(&user, &SecretString::from(pass))
                .await
                .map_err(report)?;
            print_json(&json!({ "access_token": login.access_token.expose_secret() }))
        }
    }
}

/// Attach the HTTP status to a client error
fn report(err: VerimedError) -> anyhow::Error {
    let status = err.status_code();
    let err = anyhow::Error::new(err);

    if status == 0 {
        err
    } else {
        err.context(format!("verification API returned HTTP {status}"))
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
