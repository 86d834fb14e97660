use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taxi_admin::api;
use taxi_admin::config::{CreateDriverArgs, DatabaseArgs, ServeArgs};
use taxi_admin::models::CreateDriverInput;

#[derive(Parser)]
#[command(name = "taxi")]
#[command(about = "Administration service for a taxi fleet: manufacturers, cars and drivers")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Apply the database schema and exit
    Migrate(DatabaseArgs),
    /// Create a driver account, e.g. the first one to log in with
    CreateDriver(CreateDriverArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "taxi_admin=debug,taxi_core=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve(args)) => serve(args).await?,
        Some(Commands::Migrate(args)) => {
            args.open()?;
            println!("Database schema is up to date");
        }
        Some(Commands::CreateDriver(args)) => {
            let db = args.database.open()?;
            let input = CreateDriverInput::new(args.username, args.password, args.license_number)
                .with_name(args.first_name, args.last_name);
            let driver = db.create_driver(input)?;
            println!("Created driver {} (id {})", driver, driver.id);
        }
        None => serve(ServeArgs::default()).await?,
    }

    Ok(())
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let addr = args.addr();
    tracing::info!("Starting taxi server on {}", addr);

    let db = args.open_database()?;
    let app = api::create_router(db);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Taxi server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Taxi server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
