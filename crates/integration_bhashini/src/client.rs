//! Bhashini pipeline client
//!
//! Fetches the pipeline configuration once, then validates ASR, translation
//! and TTS calls against it before sending them to the inference endpoint.

use std::time::Duration;

use indexmap::IndexSet;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::PipelineClientConfig;
use crate::error::PipelineError;
use crate::request::{InferenceRequest, PipelineConfigRequest};
use crate::schema::PipelineConfigResponse;
use crate::types::{
    AudioFormat, AvailableLanguages, Gender, LanguageTable, PipelineData, ServiceEntry, TaskType,
};

/// Error body returned by the inference endpoint
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
}

/// Client for a single Bhashini pipeline
///
/// The lookup tables are fetched by [`PipelineClient::connect`] and stay fixed
/// for the lifetime of the client. Only the first service listed for a
/// language (or language pair) is ever used.
#[derive(Debug, Clone)]
pub struct PipelineClient {
    client: Client,
    config: PipelineClientConfig,
    data: PipelineData,
}

impl PipelineClient {
    /// Connect with default pipeline and endpoints
    ///
    /// # Errors
    ///
    /// See [`PipelineClient::connect`].
    pub async fn new(
        user_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, PipelineError> {
        Self::connect(PipelineClientConfig::new(user_id, api_key)).await
    }

    /// Fetch the pipeline configuration and build a client from it
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Configuration` if the config is invalid or the
    /// configuration endpoint cannot be reached or answers with an error
    /// status, and `PipelineError::Parse` if the payload lacks expected keys.
    #[instrument(skip(config), fields(pipeline_id = %config.pipeline_id))]
    pub async fn connect(config: PipelineClientConfig) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Configuration)?;
        let client = Self::build_http_client(&config)?;

        let data = Self::fetch_pipeline_data(&client, &config).await?;

        info!(
            asr_languages = data.asr.len(),
            translation_sources = data.translation.len(),
            tts_languages = data.tts.len(),
            "Pipeline configuration loaded"
        );

        Ok(Self {
            client,
            config,
            data,
        })
    }

    /// Build a client from pipeline data that was already fetched
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Configuration` if the config is invalid.
    pub fn from_pipeline_data(
        config: PipelineClientConfig,
        data: PipelineData,
    ) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Configuration)?;
        let client = Self::build_http_client(&config)?;

        Ok(Self {
            client,
            config,
            data,
        })
    }

    fn build_http_client(config: &PipelineClientConfig) -> Result<Client, PipelineError> {
        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        builder.build().map_err(|e| {
            PipelineError::Configuration(format!("Failed to create HTTP client: {e}"))
        })
    }

    async fn fetch_pipeline_data(
        client: &Client,
        config: &PipelineClientConfig,
    ) -> Result<PipelineData, PipelineError> {
        debug!(url = %config.config_endpoint, "Fetching pipeline configuration");

        let response = client
            .post(&config.config_endpoint)
            .header("userID", &config.user_id)
            .header("ulcaApiKey", config.api_key_str())
            .json(&PipelineConfigRequest::new(&config.pipeline_id))
            .send()
            .await
            .map_err(|e| {
                PipelineError::Configuration(format!(
                    "Failed to fetch pipeline configuration: {e}"
                ))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            PipelineError::Configuration(format!("Failed to read pipeline configuration: {e}"))
        })?;

        if !status.is_success() {
            return Err(PipelineError::Configuration(format!(
                "HTTP {status}: {body}"
            )));
        }

        let payload: PipelineConfigResponse = serde_json::from_str(&body).map_err(|e| {
            PipelineError::Parse(format!("pipeline configuration is not valid JSON: {e}"))
        })?;

        payload.into_pipeline_data()
    }

    /// Lookup tables this client was built with
    #[must_use]
    pub const fn pipeline_data(&self) -> &PipelineData {
        &self.data
    }

    /// Callback URL advertised by the pipeline
    #[must_use]
    pub fn callback_url(&self) -> &str {
        self.data.callback_url()
    }

    /// Configuration this client was built with
    #[must_use]
    pub const fn config(&self) -> &PipelineClientConfig {
        &self.config
    }

    /// Languages available for a task, in configuration order
    #[must_use]
    pub fn languages(&self, task: TaskType) -> AvailableLanguages {
        match task {
            TaskType::Asr => AvailableLanguages::Languages(self.data.asr.keys().cloned().collect()),
            TaskType::Tts => AvailableLanguages::Languages(self.data.tts.keys().cloned().collect()),
            TaskType::Translation => AvailableLanguages::Pairs(
                self.data
                    .translation
                    .iter()
                    .map(|(source, targets)| {
                        (source.clone(), targets.keys().cloned().collect::<IndexSet<_>>())
                    })
                    .collect(),
            ),
        }
    }

    /// Languages available for a task given by name
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::InvalidArgument` unless `task_type` is `asr`,
    /// `translation` or `tts`.
    pub fn list_available_languages(
        &self,
        task_type: &str,
    ) -> Result<AvailableLanguages, PipelineError> {
        Ok(self.languages(task_type.parse()?))
    }

    /// Voices offered by the TTS service for a language
    ///
    /// An empty slice means the service does not restrict voices.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::UnsupportedLanguage` if TTS is not offered for
    /// the language.
    pub fn get_supported_voices(&self, source_language: &str) -> Result<&[String], PipelineError> {
        let service = Self::first_service(&self.data.tts, TaskType::Tts, source_language)?;
        Ok(&service.supported_voices)
    }

    /// Transcribe audio
    ///
    /// Returns the decoded response as-is; see [`crate::response::transcript`].
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::UnsupportedLanguage` before any request if ASR
    /// is not offered for the language, `PipelineError::Inference` if the
    /// endpoint rejects the request, or a transport error.
    #[instrument(skip(self, audio_content), fields(audio_size = audio_content.len()))]
    pub async fn asr(
        &self,
        audio_content: &[u8],
        source_language: &str,
        audio_format: AudioFormat,
        sampling_rate: u32,
    ) -> Result<Value, PipelineError> {
        let service = Self::first_service(&self.data.asr, TaskType::Asr, source_language)?;

        let request = InferenceRequest::asr(
            audio_content,
            source_language,
            &service.service_id,
            audio_format,
            sampling_rate,
        );

        self.infer(&service.service_id, &request).await
    }

    /// Translate text
    ///
    /// Returns the decoded response as-is; see [`crate::response::translated_text`].
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::UnsupportedLanguage` if the source language has
    /// no translation services, `PipelineError::UnsupportedLanguagePair` if
    /// the target is not offered for it, `PipelineError::Inference` if the
    /// endpoint rejects the request, or a transport error.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<Value, PipelineError> {
        let targets = self.data.translation.get(source_language).ok_or_else(|| {
            PipelineError::UnsupportedLanguage {
                task: TaskType::Translation,
                language: source_language.to_string(),
                available: self.data.translation.keys().cloned().collect(),
            }
        })?;

        let service = targets
            .get(target_language)
            .and_then(|entries| entries.first())
            .ok_or_else(|| PipelineError::UnsupportedLanguagePair {
                source_language: source_language.to_string(),
                target_language: target_language.to_string(),
                available: targets.keys().cloned().collect(),
            })?;

        let request = InferenceRequest::translation(
            text,
            source_language,
            target_language,
            &service.service_id,
        );

        self.infer(&service.service_id, &request).await
    }

    /// Synthesize speech
    ///
    /// Returns the decoded response as-is; see [`crate::response::decode_audio`].
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::UnsupportedLanguage` if TTS is not offered for
    /// the language, `PipelineError::UnsupportedVoice` if the service lists
    /// its voices and `gender` is not among them, `PipelineError::Inference`
    /// if the endpoint rejects the request, or a transport error.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn tts(
        &self,
        text: &str,
        source_language: &str,
        gender: Gender,
        sampling_rate: u32,
    ) -> Result<Value, PipelineError> {
        let service = Self::first_service(&self.data.tts, TaskType::Tts, source_language)?;

        let voices = &service.supported_voices;
        if !voices.is_empty() && !voices.iter().any(|v| v == gender.as_str()) {
            return Err(PipelineError::UnsupportedVoice {
                language: source_language.to_string(),
                gender: gender.to_string(),
                available: voices.clone(),
            });
        }

        let request = InferenceRequest::tts(
            text,
            source_language,
            &service.service_id,
            gender,
            sampling_rate,
        );

        self.infer(&service.service_id, &request).await
    }

    /// First service for a language, or the list of languages that do have one
    fn first_service<'a>(
        table: &'a LanguageTable,
        task: TaskType,
        language: &str,
    ) -> Result<&'a ServiceEntry, PipelineError> {
        table
            .get(language)
            .and_then(|entries| entries.first())
            .ok_or_else(|| PipelineError::UnsupportedLanguage {
                task,
                language: language.to_string(),
                available: table.keys().cloned().collect(),
            })
    }

    async fn infer(
        &self,
        service_id: &str,
        request: &InferenceRequest<'_>,
    ) -> Result<Value, PipelineError> {
        debug!(service_id, "Sending inference request");

        let response = self
            .client
            .post(&self.config.inference_endpoint)
            .header(ACCEPT, "*/*")
            .header(AUTHORIZATION, self.data.inference_api_key.expose_secret())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();

            let message = serde_json::from_str::<ApiError>(&error_body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or(error_body);

            warn!(status = status.as_u16(), service_id, "Inference request rejected");

            return Err(PipelineError::Inference {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| PipelineError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        debug!(service_id, "Inference complete");
        Ok(body)
    }
}
