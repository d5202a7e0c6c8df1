mod application;
mod environment;
mod provider;

pub use application::ApplicationConfig;
use environment::Environment;
pub use provider::{ProviderConfig, UrlWrapper};

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub application: ApplicationConfig,
    pub provider: ProviderConfig,
}

impl Config {
    /// Layers `config/base.yaml`, `config/{APP_ENVIRONMENT}.yaml` and `APP_`
    /// prefixed environment variables, e.g. `APP_PROVIDER__API_KEY`.
    pub fn init() -> Result<Self, config::ConfigError> {
        let base_path = std::env::current_dir().map_err(|e| {
            config::ConfigError::Message(format!("Failed to determine the current directory: {e}"))
        })?;
        let config_directory = base_path.join("config");
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .map_err(config::ConfigError::Message)?;
        let config_file = format!("{}.yaml", environment.as_str());
        config::Config::builder()
            .add_source(config::File::from(config_directory.join("base.yaml")))
            .add_source(config::File::from(config_directory.join(config_file)))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<Self>()
    }
}
