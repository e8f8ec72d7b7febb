//! Bhashini pipeline integration
//!
//! Client for the Bhashini language AI pipeline (<https://bhashini.gov.in>):
//! speech recognition, translation and speech synthesis for Indian languages.
//!
//! # Flow
//!
//! 1. [`PipelineClient::connect`] asks the ULCA configuration endpoint which
//!    services back each task of a pipeline, and keeps the answer as lookup
//!    tables plus an inference key.
//! 2. [`PipelineClient::asr`], [`PipelineClient::translate`] and
//!    [`PipelineClient::tts`] check the request against those tables, pick the
//!    first matching service and call the Dhruva inference endpoint.
//!
//! # Example
//!
//! ```ignore
//! use integration_bhashini::{Gender, PipelineClient, response};
//!
//! let client = PipelineClient::new(user_id, api_key).await?;
//!
//! let result = client.translate("मेरा नाम विहिर है।", "hi", "gu").await?;
//! println!("{:?}", response::translated_text(&result));
//!
//! let result = client.tts("હેલો વર્લ્ડ", "gu", Gender::Female, 8000).await?;
//! let wav = response::decode_audio(&result)?;
//! ```

pub mod client;
pub mod config;
pub mod error;
mod request;
pub mod response;
pub mod schema;
pub mod types;

pub use client::PipelineClient;
pub use config::{
    DEFAULT_CONFIG_ENDPOINT, DEFAULT_INFERENCE_ENDPOINT, DEFAULT_PIPELINE_ID, PipelineClientConfig,
};
pub use error::PipelineError;
pub use types::{
    AudioFormat, AvailableLanguages, DEFAULT_ASR_SAMPLING_RATE, DEFAULT_TTS_SAMPLING_RATE, Gender,
    LanguageTable, PipelineData, ServiceEntry, TaskType, TranslationTable,
};
