//! Convenience re-exports for common use.

pub use crate::auth::{AuthError, Token, TokenStore};
pub use crate::client::XeeClient;
pub use crate::config::{CredentialProvider, Credentials, XeeConfig};
pub use crate::error::{Result, XeeError};
pub use crate::types::{
    Device, Location, Privacy, PrivacyQuery, Signal, Status, Trip, User, Vehicle,
};
