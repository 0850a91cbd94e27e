//! goloc: command line client for GoLocator.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use model::{
    coordinate::{self, Coordinate},
    timestamp,
    user::Username,
    ValidationError,
};
use thiserror::Error;

use crate::api::{ApiClient, ApiError};

mod api;

#[derive(Debug, Parser)]
#[command(name = "goloc")]
#[command(about = "Command line client for the GoLocator services")]
#[command(version)]
struct Cli {
    /// Base url of the GoLocator server. Without it, commands only print
    /// what they would do.
    #[arg(long, env = "GOLOC_SERVER", global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Update the location of a user
    Update {
        /// Username, 4 to 16 letters and digits, e.g. user1212
        #[arg(short, long)]
        username: String,
        /// New coordinates (latitude,longitude)
        #[arg(short, long, allow_hyphen_values = true)]
        coordinates: String,
    },
    /// Search for users around a location
    Search {
        /// Coordinates to search around (latitude,longitude)
        #[arg(short, long, allow_hyphen_values = true)]
        coordinates: String,
        /// Search radius in degrees
        #[arg(short, long)]
        radius: String,
    },
    /// Distance traveled since a point in time
    Travel {
        /// Date and time in YYYY-MM-DDTHH:MM:SS+HH:MM format
        #[arg(short = 't', long)]
        time: String,
        /// Only count the locations of this user
        #[arg(short, long)]
        username: Option<String>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{context}: {source}")]
    Invalid {
        context: &'static str,
        source: ValidationError,
    },
    #[error(transparent)]
    Api(#[from] ApiError),
}

fn invalid(context: &'static str) -> impl FnOnce(ValidationError) -> CliError {
    move |source| CliError::Invalid { context, source }
}

/// A command whose arguments passed validation.
#[derive(Debug, PartialEq)]
enum Action {
    Update {
        username: Username,
        coordinate: Coordinate,
    },
    Search {
        center: Coordinate,
        radius: f64,
    },
    Travel {
        since: String,
        username: Option<Username>,
    },
}

impl Command {
    fn validate(self) -> Result<Action, CliError> {
        match self {
            Command::Update {
                username,
                coordinates,
            } => Ok(Action::Update {
                username: username.parse().map_err(invalid("Invalid username"))?,
                coordinate: coordinates.parse().map_err(invalid("Invalid coordinates"))?,
            }),
            Command::Search {
                coordinates,
                radius,
            } => Ok(Action::Search {
                center: coordinates.parse().map_err(invalid("Invalid coordinates"))?,
                radius: coordinate::parse_degree_radius(&radius)
                    .map_err(invalid("Invalid radius"))?,
            }),
            Command::Travel { time, username } => {
                timestamp::parse_timestamp(&time).map_err(invalid("Invalid time"))?;
                let username = username
                    .map(|username| username.parse::<Username>())
                    .transpose()
                    .map_err(invalid("Invalid username"))?;
                Ok(Action::Travel {
                    since: time,
                    username,
                })
            }
        }
    }
}

impl Action {
    fn describe(&self) -> String {
        match self {
            Action::Update {
                username,
                coordinate,
            } => format!(
                "Updating location for user {} to coordinates ({:.6},{:.6})",
                username,
                coordinate.latitude(),
                coordinate.longitude()
            ),
            Action::Search { center, radius } => format!(
                "Searching for users in {:.6}, {:.6} within {:.6} radius",
                center.latitude(),
                center.longitude(),
                radius
            ),
            Action::Travel { since, username } => match username {
                Some(username) => format!(
                    "Checking traveled distance of user {} since: {}",
                    username, since
                ),
                None => format!("Checking user traveled distance since: {}", since),
            },
        }
    }

    async fn perform(self, api: &ApiClient) -> Result<(), CliError> {
        match self {
            Action::Update {
                username,
                coordinate,
            } => {
                let user = api.user_by_username(&username).await?;
                let message = api
                    .update_location(user.id, coordinate.latitude(), coordinate.longitude())
                    .await?;
                println!("{}", message);
            }
            Action::Search { center, radius } => {
                let users = api
                    .users_in_location(center.latitude(), center.longitude(), radius)
                    .await?;
                if users.is_empty() {
                    println!("No users found");
                }
                for user in users {
                    println!("{}\t{}", user.id, user.username);
                }
            }
            Action::Travel { since, username } => {
                let user_id = match username {
                    Some(username) => Some(api.user_by_username(&username).await?.id),
                    None => None,
                };
                println!("{}", api.distance_traveled(&since, user_id).await?);
            }
        }
        Ok(())
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let action = cli.command.validate()?;
    println!("{}", action.describe());

    match cli.server {
        Some(server) => {
            log::debug!("using server {}", server);
            action.perform(&ApiClient::new(&server)).await
        }
        None => Ok(()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(why) => {
            let _ = why.print();
            return if why.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(why) => {
            eprintln!("{}", why);
            ExitCode::FAILURE
        }
    }
}
