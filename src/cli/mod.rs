//! CLI entry point for Xee.

pub mod auth;
pub mod resources;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use crate::config::XeeConfig;
use crate::util::parse_iso8601;

/// Xee vehicle telemetry CLI
#[derive(Parser, Debug)]
#[command(name = "xee", version, about = "Xee vehicle telemetry CLI")]
pub struct Cli {
    /// Session profile (defaults to XEE_PROFILE or "default")
    #[arg(long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authentication management
    Auth(AuthArgs),
    /// Show the signed-in user
    User,
    /// List vehicles
    Vehicles(VehiclesArgs),
    /// List trips of a vehicle
    Trips(TripsArgs),
    /// List privacy periods of a vehicle
    Privacies(PrivaciesArgs),
}

/// Arguments for the `auth` subcommand group.
#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

/// Auth subcommands.
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Print the authorization URL to open in a browser
    Url,
    /// Exchange an authorization code (or the full callback URL)
    Login(LoginArgs),
    /// Refresh the stored token
    Refresh,
    /// Show authentication status
    Status,
    /// Revoke and forget the stored token
    Logout,
}

/// Arguments for `xee auth login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Authorization code, or the callback URL carrying it
    pub code: String,

    /// State printed by `xee auth url`, checked against the callback
    #[arg(long)]
    pub state: Option<String>,
}

/// Arguments for `xee vehicles`.
#[derive(Parser, Debug)]
pub struct VehiclesArgs {
    /// User ID (defaults to the signed-in user)
    #[arg(long)]
    pub user: Option<String>,
}

/// Arguments for `xee trips`.
#[derive(Parser, Debug)]
pub struct TripsArgs {
    /// Vehicle ID
    pub vehicle: String,
}

/// Arguments for `xee privacies`.
#[derive(Parser, Debug)]
pub struct PrivaciesArgs {
    /// Vehicle ID
    pub vehicle: String,

    /// Only periods after this ISO-8601 timestamp
    #[arg(long, value_parser = parse_timestamp)]
    pub from: Option<DateTime<Utc>>,

    /// Only periods before this ISO-8601 timestamp
    #[arg(long, value_parser = parse_timestamp)]
    pub to: Option<DateTime<Utc>>,

    /// Maximum number of periods
    #[arg(long)]
    pub limit: Option<u32>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Environment config with the `--profile` override applied.
    pub fn config(&self) -> XeeConfig {
        let config = XeeConfig::from_env();
        match &self.profile {
            Some(profile) => config.with_profile(profile.clone()),
            None => config,
        }
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_iso8601(raw).ok_or_else(|| format!("not an ISO-8601 timestamp: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::Parser;

    #[test]
    fn parse_auth_login_with_state() {
        let cli = Cli::try_parse_from(["xee", "auth", "login", "abc123", "--state", "s1"]).unwrap();
        match cli.command {
            Commands::Auth(auth) => match auth.command {
                AuthCommands::Login(args) => {
                    assert_eq!(args.code, "abc123");
                    assert_eq!(args.state.as_deref(), Some("s1"));
                }
                other => panic!("expected Login, got {other:?}"),
            },
            other => panic!("expected Auth, got {other:?}"),
        }
    }

    #[test]
    fn parse_auth_status_with_profile() {
        let cli = Cli::try_parse_from(["xee", "--profile", "work", "auth", "status"]).unwrap();
        assert_eq!(cli.profile.as_deref(), Some("work"));
        match cli.command {
            Commands::Auth(auth) => assert!(matches!(auth.command, AuthCommands::Status)),
            other => panic!("expected Auth, got {other:?}"),
        }
    }

    #[test]
    fn parse_vehicles_for_user() {
        let cli = Cli::try_parse_from(["xee", "vehicles", "--user", "42"]).unwrap();
        match cli.command {
            Commands::Vehicles(args) => assert_eq!(args.user.as_deref(), Some("42")),
            other => panic!("expected Vehicles, got {other:?}"),
        }
    }

    #[test]
    fn parse_privacies_with_filters() {
        let cli = Cli::try_parse_from([
            "xee",
            "privacies",
            "42",
            "--from",
            "2021-01-01T00:00:00Z",
            "--limit",
            "10",
        ])
        .unwrap();
        match cli.command {
            Commands::Privacies(args) => {
                assert_eq!(args.vehicle, "42");
                assert_eq!(
                    args.from,
                    Some(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap())
                );
                assert!(args.to.is_none());
                assert_eq!(args.limit, Some(10));
            }
            other => panic!("expected Privacies, got {other:?}"),
        }
    }

    #[test]
    fn parse_bad_timestamp_is_error() {
        assert!(Cli::try_parse_from(["xee", "privacies", "42", "--from", "yesterday"]).is_err());
    }

    #[test]
    fn parse_trips_missing_vehicle_is_error() {
        assert!(Cli::try_parse_from(["xee", "trips"]).is_err());
    }

    #[test]
    fn parse_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["xee"]).is_err());
    }
}
