//! Pipeline configuration payload
//!
//! Mirrors the JSON returned by the configuration endpoint. Every field is
//! optional at the serde level; [`PipelineConfigResponse::into_pipeline_data`]
//! checks the whole payload and reports all missing keys in one error.

use secrecy::SecretString;
use serde::Deserialize;

use crate::error::PipelineError;
use crate::types::{LanguageTable, PipelineData, ServiceEntry, TaskType, TranslationTable};

/// Top-level configuration response
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfigResponse {
    #[serde(default)]
    pub pipeline_response_config: Option<Vec<TaskConfig>>,
    #[serde(default, rename = "pipelineInferenceAPIEndPoint")]
    pub pipeline_inference_api_end_point: Option<InferenceEndpoint>,
}

/// Services configured for one task type
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    #[serde(default)]
    pub task_type: Option<String>,
    #[serde(default)]
    pub config: Option<Vec<ServiceConfig>>,
}

/// One service offering inside a task config
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub language: Option<LanguageConfig>,
    #[serde(default)]
    pub supported_voices: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageConfig {
    #[serde(default)]
    pub source_language: Option<String>,
    #[serde(default)]
    pub source_script_code: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
    #[serde(default)]
    pub target_script_code: Option<String>,
}

/// Where and how to call inference
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceEndpoint {
    #[serde(default)]
    pub callback_url: Option<String>,
    #[serde(default)]
    pub inference_api_key: Option<InferenceApiKey>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InferenceApiKey {
    #[serde(default)]
    pub value: Option<String>,
}

impl PipelineConfigResponse {
    /// Build lookup tables from the payload
    ///
    /// Task types other than asr, translation and tts are ignored. Service
    /// entries keep the order in which they appear in the payload.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Parse` naming every missing key.
    pub fn into_pipeline_data(self) -> Result<PipelineData, PipelineError> {
        let mut missing = Vec::new();

        let endpoint = self.pipeline_inference_api_end_point.unwrap_or_else(|| {
            missing.push("pipelineInferenceAPIEndPoint".to_string());
            InferenceEndpoint::default()
        });
        let callback_url = endpoint.callback_url.unwrap_or_else(|| {
            missing.push("pipelineInferenceAPIEndPoint.callbackUrl".to_string());
            String::new()
        });
        let inference_api_key = endpoint
            .inference_api_key
            .and_then(|key| key.value)
            .unwrap_or_else(|| {
                missing.push("pipelineInferenceAPIEndPoint.inferenceApiKey.value".to_string());
                String::new()
            });

        let mut asr = LanguageTable::new();
        let mut tts = LanguageTable::new();
        let mut translation = TranslationTable::new();

        let tasks = self.pipeline_response_config.unwrap_or_else(|| {
            missing.push("pipelineResponseConfig".to_string());
            Vec::new()
        });

        for (task_idx, task) in tasks.into_iter().enumerate() {
            let task_path = format!("pipelineResponseConfig[{task_idx}]");

            let Some(task_name) = task.task_type else {
                missing.push(format!("{task_path}.taskType"));
                continue;
            };
            let Ok(task_type) = task_name.parse::<TaskType>() else {
                continue;
            };
            let Some(services) = task.config else {
                missing.push(format!("{task_path}.config"));
                continue;
            };

            for (svc_idx, service) in services.into_iter().enumerate() {
                let svc_path = format!("{task_path}.config[{svc_idx}]");

                let service_id = service.service_id.unwrap_or_else(|| {
                    missing.push(format!("{svc_path}.serviceId"));
                    String::new()
                });
                let Some(language) = service.language else {
                    missing.push(format!("{svc_path}.language"));
                    continue;
                };
                let Some(source_language) = language.source_language else {
                    missing.push(format!("{svc_path}.language.sourceLanguage"));
                    continue;
                };

                let mut entry = ServiceEntry::new(service_id);
                entry.source_script_code = language.source_script_code;

                match task_type {
                    TaskType::Asr => asr.entry(source_language).or_default().push(entry),
                    TaskType::Tts => {
                        entry.supported_voices = service.supported_voices.unwrap_or_default();
                        tts.entry(source_language).or_default().push(entry);
                    },
                    TaskType::Translation => {
                        let Some(target_language) = language.target_language else {
                            missing.push(format!("{svc_path}.language.targetLanguage"));
                            continue;
                        };
                        entry.target_script_code = language.target_script_code;
                        translation
                            .entry(source_language)
                            .or_default()
                            .entry(target_language)
                            .or_default()
                            .push(entry);
                    },
                }
            }
        }

        if !missing.is_empty() {
            return Err(PipelineError::Parse(format!(
                "pipeline configuration is missing: {}",
                missing.join(", ")
            )));
        }

        Ok(PipelineData::new(
            asr,
            tts,
            translation,
            SecretString::from(inference_api_key),
            callback_url,
        ))
    }
}
