//! Request bodies for the configuration and inference endpoints

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use crate::types::{AudioFormat, Gender, TaskType};

/// Body sent to the configuration endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PipelineConfigRequest<'a> {
    pipeline_tasks: Vec<TaskRef>,
    pipeline_request_config: PipelineRequestConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskRef {
    task_type: TaskType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PipelineRequestConfig<'a> {
    pipeline_id: &'a str,
}

impl<'a> PipelineConfigRequest<'a> {
    /// Ask for asr, translation and tts configs of a pipeline
    pub(crate) fn new(pipeline_id: &'a str) -> Self {
        Self {
            pipeline_tasks: TaskType::ALL
                .into_iter()
                .map(|task_type| TaskRef { task_type })
                .collect(),
            pipeline_request_config: PipelineRequestConfig { pipeline_id },
        }
    }
}

/// Body sent to the inference endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InferenceRequest<'a> {
    pipeline_tasks: [InferenceTask<'a>; 1],
    input_data: InputData<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InferenceTask<'a> {
    task_type: TaskType,
    config: TaskSettings<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskSettings<'a> {
    language: LanguagePair<'a>,
    service_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_format: Option<AudioFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sampling_rate: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LanguagePair<'a> {
    source_language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_language: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum InputData<'a> {
    Audio([AudioInput; 1]),
    Input([TextInput<'a>; 1]),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioInput {
    audio_content: String,
}

#[derive(Debug, Serialize)]
struct TextInput<'a> {
    source: &'a str,
}

impl<'a> InferenceRequest<'a> {
    /// Speech recognition of base64-encoded audio
    pub(crate) fn asr(
        audio_content: &[u8],
        source_language: &'a str,
        service_id: &'a str,
        audio_format: AudioFormat,
        sampling_rate: u32,
    ) -> Self {
        Self {
            pipeline_tasks: [InferenceTask {
                task_type: TaskType::Asr,
                config: TaskSettings {
                    language: LanguagePair {
                        source_language,
                        target_language: None,
                    },
                    service_id,
                    audio_format: Some(audio_format),
                    gender: None,
                    sampling_rate: Some(sampling_rate),
                },
            }],
            input_data: InputData::Audio([AudioInput {
                audio_content: STANDARD.encode(audio_content),
            }]),
        }
    }

    /// Translation of plain text
    pub(crate) fn translation(
        text: &'a str,
        source_language: &'a str,
        target_language: &'a str,
        service_id: &'a str,
    ) -> Self {
        Self {
            pipeline_tasks: [InferenceTask {
                task_type: TaskType::Translation,
                config: TaskSettings {
                    language: LanguagePair {
                        source_language,
                        target_language: Some(target_language),
                    },
                    service_id,
                    audio_format: None,
                    gender: None,
                    sampling_rate: None,
                },
            }],
            input_data: InputData::Input([TextInput { source: text }]),
        }
    }

    /// Speech synthesis of plain text
    pub(crate) fn tts(
        text: &'a str,
        source_language: &'a str,
        service_id: &'a str,
        gender: Gender,
        sampling_rate: u32,
    ) -> Self {
        Self {
            pipeline_tasks: [InferenceTask {
                task_type: TaskType::Tts,
                config: TaskSettings {
                    language: LanguagePair {
                        source_language,
                        target_language: None,
                    },
                    service_id,
                    audio_format: None,
                    gender: Some(gender),
                    sampling_rate: Some(sampling_rate),
                },
            }],
            input_data: InputData::Input([TextInput { source: text }]),
        }
    }
}
