//! CLI auth command handlers.

use chrono::Utc;

use crate::auth::{new_state, AuthError};
use crate::client::XeeClient;
use crate::error::XeeError;

/// Handle `xee auth url`.
pub fn handle_url(client: &XeeClient) -> Result<(), Box<dyn std::error::Error>> {
    let state = new_state();
    let url = client.authorization_url(&state)?;
    println!("Open this URL to authorize:");
    println!("  {url}");
    println!("Then run: xee auth login <code-or-callback-url> --state {state}");
    Ok(())
}

/// Handle `xee auth login <code>`.
pub async fn handle_login(
    client: &XeeClient,
    code: &str,
    state: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let token = if code.contains("code=") || code.contains("error=") {
        client.login_with_redirect(code, state).await?
    } else {
        client.exchange_code(code.trim()).await?
    };
    println!("Logged in (profile {})", client.config().profile());
    if let Some(scope) = &token.scope {
        println!("  scope: {scope}");
    }
    Ok(())
}

/// Handle `xee auth refresh`.
pub async fn handle_refresh(client: &XeeClient) -> Result<(), Box<dyn std::error::Error>> {
    match client.refresh().await {
        Ok(token) => {
            println!("Token refreshed");
            if let Some(expires_at) = token.expires_at {
                println!("  expires: {expires_at}");
            }
            Ok(())
        }
        Err(XeeError::Auth(AuthError::NoRefreshToken)) => {
            Err("no refresh token stored; run `xee auth login` first".into())
        }
        Err(err) => Err(err.into()),
    }
}

/// Handle `xee auth status`.
pub fn handle_status(client: &XeeClient) -> Result<(), Box<dyn std::error::Error>> {
    let profile = client.config().profile();
    let Some(token) = client.token().filter(|token| token.is_usable()) else {
        println!("{profile}: not logged in");
        return Ok(());
    };

    let expiry = match token.expires_at {
        Some(at) if token.is_expired_at(Utc::now()) => format!("expired at {at}"),
        Some(at) => format!("expires {at}"),
        None => "no expiry".to_string(),
    };
    let refresh = if token.refresh_token().is_some() {
        "refreshable"
    } else {
        "not refreshable"
    };
    println!("{profile}: logged in ({expiry}, {refresh})");
    if let Some(scope) = &token.scope {
        println!("  scope: {scope}");
    }
    Ok(())
}

/// Handle `xee auth logout`.
pub async fn handle_logout(client: &XeeClient) -> Result<(), Box<dyn std::error::Error>> {
    if !client.is_authenticated() {
        println!("{}: not logged in", client.config().profile());
        return Ok(());
    }
    client.logout().await?;
    println!("Logged out");
    Ok(())
}
