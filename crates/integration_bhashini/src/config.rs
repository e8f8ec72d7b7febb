//! Configuration for the pipeline client

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Pipeline requested when the caller does not name one
pub const DEFAULT_PIPELINE_ID: &str = "64392f96daac500b55c543cd";

/// ULCA endpoint serving pipeline configurations
pub const DEFAULT_CONFIG_ENDPOINT: &str =
    "https://meity-auth.ulcacontrib.org/ulca/apis/v0/model/getModelsPipeline";

/// Dhruva endpoint executing pipeline tasks
pub const DEFAULT_INFERENCE_ENDPOINT: &str =
    "https://dhruva-api.bhashini.gov.in/services/inference/pipeline";

/// Credentials and endpoints used by [`PipelineClient`](crate::PipelineClient)
#[derive(Clone, Serialize, Deserialize)]
pub struct PipelineClientConfig {
    /// ULCA user identifier
    #[serde(default)]
    pub user_id: String,

    /// ULCA API key (sensitive - uses SecretString)
    #[serde(default = "empty_secret", skip_serializing)]
    pub api_key: SecretString,

    /// Pipeline to request task configurations for
    #[serde(default = "default_pipeline_id")]
    pub pipeline_id: String,

    /// Configuration endpoint URL
    #[serde(default = "default_config_endpoint")]
    pub config_endpoint: String,

    /// Inference endpoint URL
    #[serde(default = "default_inference_endpoint")]
    pub inference_endpoint: String,

    /// Request timeout in milliseconds (unset = HTTP client default)
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

fn default_pipeline_id() -> String {
    DEFAULT_PIPELINE_ID.to_string()
}

fn default_config_endpoint() -> String {
    DEFAULT_CONFIG_ENDPOINT.to_string()
}

fn default_inference_endpoint() -> String {
    DEFAULT_INFERENCE_ENDPOINT.to_string()
}

impl Default for PipelineClientConfig {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            api_key: empty_secret(),
            pipeline_id: default_pipeline_id(),
            config_endpoint: default_config_endpoint(),
            inference_endpoint: default_inference_endpoint(),
            timeout_ms: None,
        }
    }
}

impl fmt::Debug for PipelineClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineClientConfig")
            .field("user_id", &self.user_id)
            .field("api_key", &"[REDACTED]")
            .field("pipeline_id", &self.pipeline_id)
            .field("config_endpoint", &self.config_endpoint)
            .field("inference_endpoint", &self.inference_endpoint)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl PipelineClientConfig {
    /// Create a config for the default pipeline and endpoints
    #[must_use]
    pub fn new(user_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            api_key: SecretString::from(api_key.into()),
            ..Default::default()
        }
    }

    /// Use a different pipeline
    #[must_use]
    pub fn with_pipeline_id(mut self, pipeline_id: impl Into<String>) -> Self {
        self.pipeline_id = pipeline_id.into();
        self
    }

    /// Point both endpoints somewhere else
    #[must_use]
    pub fn with_endpoints(
        mut self,
        config_endpoint: impl Into<String>,
        inference_endpoint: impl Into<String>,
    ) -> Self {
        self.config_endpoint = config_endpoint.into();
        self.inference_endpoint = inference_endpoint.into();
        self
    }

    /// Get the API key as a string reference (for request headers)
    #[must_use]
    pub fn api_key_str(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.user_id.trim().is_empty() {
            return Err("User ID is required".to_string());
        }

        if self.api_key_str().trim().is_empty() {
            return Err("API key is required".to_string());
        }

        if self.pipeline_id.trim().is_empty() {
            return Err("Pipeline ID must not be empty".to_string());
        }

        for (name, url) in [
            ("Configuration endpoint", &self.config_endpoint),
            ("Inference endpoint", &self.inference_endpoint),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("{name} must be an http(s) URL, got '{url}'"));
            }
        }

        if self.timeout_ms == Some(0) {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
