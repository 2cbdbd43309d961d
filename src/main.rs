//! Xee CLI binary entry point.

use tracing_subscriber::EnvFilter;
use xee::cli::{auth, resources, AuthCommands, Cli, Commands};
use xee::XeeClient;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = XeeClient::new(cli.config())?;

    match cli.command {
        Commands::Auth(auth_args) => match auth_args.command {
            AuthCommands::Url => auth::handle_url(&client),
            AuthCommands::Login(args) => {
                auth::handle_login(&client, &args.code, args.state.as_deref()).await
            }
            AuthCommands::Refresh => auth::handle_refresh(&client).await,
            AuthCommands::Status => auth::handle_status(&client),
            AuthCommands::Logout => auth::handle_logout(&client).await,
        },
        Commands::User => resources::handle_user(&client).await,
        Commands::Vehicles(args) => resources::handle_vehicles(&client, args.user.as_deref()).await,
        Commands::Trips(args) => resources::handle_trips(&client, &args.vehicle).await,
        Commands::Privacies(args) => resources::handle_privacies(&client, &args).await,
    }
}
