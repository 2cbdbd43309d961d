//! OAuth2 authorization-code sessions: token minting, refresh, revocation,
//! and storage.

pub mod authorize;
pub mod error;
pub mod manager;
pub mod slot;
pub mod store;
pub mod token;

pub use authorize::{authorization_url, code_from_redirect, new_state};
pub use error::AuthError;
pub use manager::{GrantType, TokenManager};
pub use slot::TokenSlot;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreConfig};
pub use token::Token;
