use std::process::ExitCode;

use database::{DatabaseConnectionInfo, PgDatabase};
use locator::{client::Client, memory::MemoryDatabase};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use web::{serve, WebConfig, WebState};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = WebConfig::from_env();
    let listener = match TcpListener::bind(&config.bind_address).await {
        Ok(listener) => listener,
        Err(why) => {
            tracing::error!("could not bind to {}: {}", config.bind_address, why);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("listening on {}", config.bind_address);

    // database
    let result = match DatabaseConnectionInfo::from_env() {
        Some(database_connection_info) => {
            match PgDatabase::connect(database_connection_info).await {
                Ok(database) => {
                    serve(listener, WebState::new(Client::new("REST API", database))).await
                }
                Err(why) => {
                    tracing::error!("could not connect to database: {}", why);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => {
            tracing::warn!(
                "no database connection info in env, locations are kept in memory only"
            );
            let database = MemoryDatabase::new();
            serve(listener, WebState::new(Client::new("REST API", database))).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(why) => {
            tracing::error!("web server stopped: {}", why);
            ExitCode::FAILURE
        }
    }
}
