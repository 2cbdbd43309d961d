//! CLI resource command handlers. Output is pretty-printed JSON.

use serde::Serialize;

use super::PrivaciesArgs;
use crate::client::XeeClient;
use crate::types::PrivacyQuery;

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Handle `xee user`.
pub async fn handle_user(client: &XeeClient) -> Result<(), Box<dyn std::error::Error>> {
    print_json(&client.user().await?)
}

/// Handle `xee vehicles [--user <id>]`.
pub async fn handle_vehicles(
    client: &XeeClient,
    user: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    print_json(&client.vehicles(user).await?)
}

/// Handle `xee trips <vehicle>`.
pub async fn handle_trips(
    client: &XeeClient,
    vehicle: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    print_json(&client.trips(vehicle).await?)
}

/// Handle `xee privacies <vehicle>`.
pub async fn handle_privacies(
    client: &XeeClient,
    args: &PrivaciesArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = PrivacyQuery::builder()
        .maybe_from(args.from)
        .maybe_to(args.to)
        .maybe_limit(args.limit)
        .build();
    print_json(&client.privacies(&args.vehicle, &query).await?)
}
