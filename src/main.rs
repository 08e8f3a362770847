use barbuddy_extract::config::AppConfig;
use barbuddy_extract::server::start_server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = AppConfig::load()?;
    start_server(config).await
}
