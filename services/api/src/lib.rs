mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use nouvelle_maison::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
