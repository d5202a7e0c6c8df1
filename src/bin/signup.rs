//! Terminal front end for the signup widget. Talks to a running gateway:
//!
//! ```sh
//! cargo run --bin signup -- http://127.0.0.1:8000
//! ```

use std::io::{self, BufRead, Write};

use anyhow::Context;
use dotenvy::dotenv;
use newsletter_signup::{
    capture::{CaptureFlow, GatewayClient, Stage},
    configuration::ApplicationConfig,
    Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let base_url = gateway_address(std::env::args().nth(1), || {
        Config::init()
            .map(|config| config.application)
            .context("Failed to initialize config")
    })?;
    let client = GatewayClient::new(&base_url).map_err(anyhow::Error::msg)?;

    println!("Subscribe to our newsletter (type :q to close)");
    let mut flow = CaptureFlow::new();
    let mut lines = io::stdin().lock().lines();
    loop {
        let prompt = match flow.stage() {
            Stage::CollectingEmail => "Email",
            Stage::CollectingName | Stage::Failed => "Name",
            Stage::Submitting | Stage::Succeeded => break,
        };
        print!("{prompt}: ");
        io::stdout().flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        if line.trim() == ":q" {
            break;
        }
        if flow.stage() == Stage::CollectingEmail {
            flow.set_email_input(line);
            flow.submit_email();
        } else {
            flow.set_name_input(line);
            flow.submit(&client).await;
        }
        if let Some(error) = flow.error() {
            eprintln!("{error}");
        }
        if let Some(message) = flow.message() {
            println!("{message}");
        }
    }
    flow.close();
    Ok(())
}

/// The gateway given on the command line, else the configured public base URL.
fn gateway_address<F>(argument: Option<String>, load: F) -> anyhow::Result<String>
where
    F: FnOnce() -> anyhow::Result<ApplicationConfig>,
{
    match argument {
        Some(base_url) => Ok(base_url),
        None => Ok(load()?.base_url),
    }
}
