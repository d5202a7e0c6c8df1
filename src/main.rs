use anyhow::Context;
use dotenvy::dotenv;
use newsletter_signup::{telemetry, Config, Server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    telemetry::init("newsletter-signup", "info", std::io::stdout).map_err(anyhow::Error::msg)?;
    let config = Config::init().context("Failed to initialize config")?;
    Server::build(config)?.run().await.map_err(Into::into)
}
