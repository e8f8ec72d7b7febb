//! Layered client configuration for the CLI
//!
//! Defaults, then a TOML file (`bhashini.toml` in the working directory unless
//! a path is given), then `BHASHINI_*` environment variables. Command line
//! flags are applied last by [`Overrides::apply`].

use std::path::Path;

use anyhow::{Context, Result};
use integration_bhashini::{
    DEFAULT_CONFIG_ENDPOINT, DEFAULT_INFERENCE_ENDPOINT, DEFAULT_PIPELINE_ID, PipelineClientConfig,
};
use secrecy::SecretString;
use tracing::debug;

/// Environment variable prefix (e.g. `BHASHINI_USER_ID`, `BHASHINI_API_KEY`)
pub const ENV_PREFIX: &str = "BHASHINI";

/// Load configuration from defaults, file and environment
pub fn load(path: Option<&Path>) -> Result<PipelineClientConfig> {
    let file = match path {
        Some(path) => config::File::from(path)
            .format(config::FileFormat::Toml)
            .required(true),
        None => config::File::with_name("bhashini").required(false),
    };

    let settings = config::Config::builder()
        .set_default("pipeline_id", DEFAULT_PIPELINE_ID)?
        .set_default("config_endpoint", DEFAULT_CONFIG_ENDPOINT)?
        .set_default("inference_endpoint", DEFAULT_INFERENCE_ENDPOINT)?
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()
        .context("Failed to load configuration")?;

    let config: PipelineClientConfig = settings
        .try_deserialize()
        .context("Invalid configuration")?;

    debug!(?config, "Configuration loaded");
    Ok(config)
}

/// Values given on the command line
#[derive(Debug, Default)]
pub struct Overrides {
    pub user_id: Option<String>,
    pub api_key: Option<String>,
    pub pipeline_id: Option<String>,
}

impl Overrides {
    /// Replace configured values with the ones given on the command line
    pub fn apply(self, mut config: PipelineClientConfig) -> PipelineClientConfig {
        if let Some(user_id) = self.user_id {
            config.user_id = user_id;
        }
        if let Some(api_key) = self.api_key {
            config.api_key = SecretString::from(api_key);
        }
        if let Some(pipeline_id) = self.pipeline_id {
            config.pipeline_id = pipeline_id;
        }
        config
    }
}
