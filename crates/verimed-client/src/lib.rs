#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Typed Rust HTTP client for the `VeriMed` medical provider verification API
//!
//! Builds requests from typed inputs, authenticates them with an API key,
//! and maps every failure to a single [`VerimedError`]. Both an async
//! [`VerimedClient`] and a synchronous [`blocking::VerimedClient`] are
//! provided.
//!
//! ```no_run
//! # async fn run() -> verimed_client::Result<()> {
//! use verimed_client::{ClientConfig, VerificationRequest, VerimedClient};
//!
//! let client = VerimedClient::new(ClientConfig::new("https://api.verimed.app", "your-api-key"))?;
//!
//! let result = client
//!     .verify(&VerificationRequest::new("dr-123", "US", "John", "Smith", "1234567890"))
//!     .await?;
//! println!("{:?}", result.status);
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "blocking")]
pub mod blocking;
mod client;
pub mod config;
pub mod countries;
mod env;
pub mod error;
mod response;
pub mod types;

pub use client::VerimedClient;
pub use config::ClientConfig;
pub use countries::{ApiStatus, SupportedCountry, supported_countries};
pub use error::{Result, VerimedError};
pub use response::API_KEY_HEADER;
pub use types::*;
