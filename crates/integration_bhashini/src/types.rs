//! Types for pipeline requests
//!
//! Task types, voice genders, audio formats and the lookup tables derived from
//! the pipeline configuration.

use std::fmt;
use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Sampling rate used for ASR requests when the caller has no preference
pub const DEFAULT_ASR_SAMPLING_RATE: u32 = 16_000;

/// Sampling rate used for TTS requests when the caller has no preference
pub const DEFAULT_TTS_SAMPLING_RATE: u32 = 8_000;

/// Task types offered by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    /// Automatic speech recognition
    Asr,
    /// Neural machine translation
    Translation,
    /// Text-to-speech synthesis
    Tts,
}

impl TaskType {
    /// All task types, in the order they are requested from the configuration endpoint
    pub const ALL: [Self; 3] = [Self::Asr, Self::Translation, Self::Tts];

    /// Wire name of the task type
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asr => "asr",
            Self::Translation => "translation",
            Self::Tts => "tts",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asr" => Ok(Self::Asr),
            "translation" => Ok(Self::Translation),
            "tts" => Ok(Self::Tts),
            other => Err(PipelineError::InvalidArgument(format!(
                "Invalid task type '{other}'. Choose from 'asr', 'translation', or 'tts'."
            ))),
        }
    }
}

/// Voice gender for speech synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male voice
    Male,
    /// Female voice
    #[default]
    Female,
}

impl Gender {
    /// Wire name of the gender
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(PipelineError::InvalidArgument(
                "Voice must be 'male' or 'female'.".to_string(),
            )),
        }
    }
}

/// Audio formats accepted by the ASR service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// WAV format (uncompressed)
    #[default]
    Wav,
    /// MP3 format
    Mp3,
    /// FLAC format (lossless)
    Flac,
    /// OGG container
    Ogg,
}

impl AudioFormat {
    /// Wire name of the format
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
        }
    }

    /// Guess the format from a file extension (case-insensitive)
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        ext.to_ascii_lowercase().parse().ok()
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wav" => Ok(Self::Wav),
            "mp3" => Ok(Self::Mp3),
            "flac" => Ok(Self::Flac),
            "ogg" => Ok(Self::Ogg),
            other => Err(PipelineError::InvalidArgument(format!(
                "Unsupported audio format '{other}'. Choose from 'wav', 'mp3', 'flac', or 'ogg'."
            ))),
        }
    }
}

/// One backend service able to handle a language or language pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    /// Identifier sent back to the inference endpoint
    pub service_id: String,
    /// Script of the source language (e.g. "Deva")
    pub source_script_code: Option<String>,
    /// Script of the target language, translation only
    pub target_script_code: Option<String>,
    /// Voices offered by a TTS service; empty when the service does not say
    pub supported_voices: Vec<String>,
}

impl ServiceEntry {
    /// Create an entry with only a service id
    #[must_use]
    pub fn new(service_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            source_script_code: None,
            target_script_code: None,
            supported_voices: Vec::new(),
        }
    }
}

/// Services per language
///
/// Languages and their services both keep the order of the configuration.
pub type LanguageTable = IndexMap<String, Vec<ServiceEntry>>;

/// Services per source language and target language, in configuration order
pub type TranslationTable = IndexMap<String, IndexMap<String, Vec<ServiceEntry>>>;

/// Lookup tables derived from the pipeline configuration
///
/// Built once when the client connects and never changed afterwards. Only the
/// first entry of each list is used when building requests.
#[derive(Clone)]
pub struct PipelineData {
    pub(crate) asr: LanguageTable,
    pub(crate) tts: LanguageTable,
    pub(crate) translation: TranslationTable,
    pub(crate) inference_api_key: SecretString,
    pub(crate) callback_url: String,
}

impl fmt::Debug for PipelineData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineData")
            .field("asr", &self.asr)
            .field("tts", &self.tts)
            .field("translation", &self.translation)
            .field("inference_api_key", &"[REDACTED]")
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

impl PipelineData {
    /// Assemble pipeline data from prebuilt tables
    #[must_use]
    pub fn new(
        asr: LanguageTable,
        tts: LanguageTable,
        translation: TranslationTable,
        inference_api_key: SecretString,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            asr,
            tts,
            translation,
            inference_api_key,
            callback_url: callback_url.into(),
        }
    }

    /// ASR services by language
    #[must_use]
    pub const fn asr(&self) -> &LanguageTable {
        &self.asr
    }

    /// TTS services by language
    #[must_use]
    pub const fn tts(&self) -> &LanguageTable {
        &self.tts
    }

    /// Translation services by source and target language
    #[must_use]
    pub const fn translation(&self) -> &TranslationTable {
        &self.translation
    }

    /// Callback URL advertised by the pipeline
    #[must_use]
    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }
}

/// Languages available for a task, in configuration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AvailableLanguages {
    /// Source languages for ASR or TTS
    Languages(IndexSet<String>),
    /// Target languages per source language for translation
    Pairs(IndexMap<String, IndexSet<String>>),
}
