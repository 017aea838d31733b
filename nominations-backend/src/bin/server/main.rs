mod telemetry;

use nominations_backend::error::AppError;
use nominations_backend::run_server;
use nominations_config::get_config;
use telemetry::setup_logging;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    setup_logging();

    let config = get_config()?;
    run_server(config).await?.await
}
