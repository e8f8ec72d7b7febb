//! Helpers for reading inference responses
//!
//! Operations return the decoded JSON untouched. These functions pull out the
//! fields most callers want from the first task result.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::error::PipelineError;

const TRANSCRIPT_POINTER: &str = "/pipelineResponse/0/output/0/source";
const TRANSLATION_POINTER: &str = "/pipelineResponse/0/output/0/target";
const AUDIO_POINTER: &str = "/pipelineResponse/0/audio/0/audioContent";

/// Transcript of an ASR response
#[must_use]
pub fn transcript(response: &Value) -> Option<&str> {
    response.pointer(TRANSCRIPT_POINTER).and_then(Value::as_str)
}

/// Translated text of a translation response
#[must_use]
pub fn translated_text(response: &Value) -> Option<&str> {
    response.pointer(TRANSLATION_POINTER).and_then(Value::as_str)
}

/// Decode the base64 audio of a TTS response
///
/// # Errors
///
/// Returns `PipelineError::InvalidResponse` if the audio field is missing or
/// is not valid base64.
pub fn decode_audio(response: &Value) -> Result<Vec<u8>, PipelineError> {
    let encoded = response
        .pointer(AUDIO_POINTER)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            PipelineError::InvalidResponse("No audio content in TTS response".to_string())
        })?;

    STANDARD
        .decode(encoded)
        .map_err(|e| PipelineError::InvalidResponse(format!("Audio is not valid base64: {e}")))
}
