mod cli;
mod server;

pub mod admin;
pub mod config;
pub mod error;
pub mod infra;
pub mod intake;
pub mod routes;
pub mod telemetry;

use error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
