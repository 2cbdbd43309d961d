//! Xee: Rust client SDK for the Xee vehicle telemetry API.
//!
//! Handles the OAuth2 authorization-code flow (code exchange, refresh,
//! revocation, token persistence) and exposes the user, vehicle, trip, and
//! privacy resources as typed async calls. Every call carries the session's
//! bearer token, including across redirects.
//!
//! # Quick Start
//!
//! ```no_run
//! use xee::prelude::*;
//!
//! # async fn example() -> xee::Result<()> {
//! let client = XeeClient::new(XeeConfig::from_env())?;
//! client.exchange_code("code-from-callback").await?;
//! let user = client.user().await?;
//! let vehicles = client.vehicles(None).await?;
//! println!("{:?} has {} vehicles", user.display_name(), vehicles.len());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod prelude;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;

pub use client::XeeClient;
pub use config::XeeConfig;
pub use error::{Result, XeeError};
