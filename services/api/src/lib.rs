mod cli;
mod infra;
mod routes;
mod scoring;
mod server;

use receipt_points::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
