//! HTTP and CLI front-end for the talent review engine.

mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use talent_review::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
