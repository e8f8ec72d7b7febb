//! Subcommand execution and output formatting

use std::path::Path;

use anyhow::{Context, Result};
use integration_bhashini::{AudioFormat, AvailableLanguages, Gender, PipelineClient, response};
use serde_json::Value;
use tracing::info;

/// Render a language listing for the terminal
pub fn format_languages(languages: &AvailableLanguages) -> String {
    match languages {
        AvailableLanguages::Languages(codes) => codes
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        AvailableLanguages::Pairs(pairs) => pairs
            .iter()
            .map(|(source, targets)| {
                let targets: Vec<&str> = targets.iter().map(String::as_str).collect();
                format!("{source} -> {}", targets.join(", "))
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Render the voices of a TTS service
pub fn format_voices(voices: &[String]) -> String {
    if voices.is_empty() {
        "any (service does not restrict voices)".to_string()
    } else {
        voices.join(", ")
    }
}

/// Pick the audio format: explicit flag, then file extension, then WAV
pub fn resolve_audio_format(explicit: Option<&str>, file: &Path) -> Result<AudioFormat> {
    if let Some(format) = explicit {
        return Ok(format.parse()?);
    }

    Ok(file
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(AudioFormat::from_extension)
        .unwrap_or_default())
}

/// Text to print for an inference result
///
/// Falls back to the pretty-printed JSON when `raw` is set or the expected
/// field is missing.
pub fn render_text(body: &Value, extracted: Option<&str>, raw: bool) -> Result<String> {
    match extracted {
        Some(text) if !raw => Ok(text.to_string()),
        _ => Ok(serde_json::to_string_pretty(body)?),
    }
}

/// Run ASR on an audio file
pub async fn asr(
    client: &PipelineClient,
    file: &Path,
    language: &str,
    format: AudioFormat,
    sampling_rate: u32,
    raw: bool,
) -> Result<String> {
    let audio = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read audio file {}", file.display()))?;

    let body = client.asr(&audio, language, format, sampling_rate).await?;
    render_text(&body, response::transcript(&body), raw)
}

/// Synthesize speech and write the decoded audio to `output`
///
/// The language is checked before the gender, so an unknown language is
/// reported even when the gender is invalid too.
pub async fn tts_to_file(
    client: &PipelineClient,
    text: &str,
    language: &str,
    gender: &str,
    sampling_rate: u32,
    output: &Path,
) -> Result<usize> {
    client.get_supported_voices(language)?;
    let gender = gender.parse::<Gender>()?;

    let body = client.tts(text, language, gender, sampling_rate).await?;
    let audio = response::decode_audio(&body)?;

    tokio::fs::write(output, &audio)
        .await
        .with_context(|| format!("Failed to write audio to {}", output.display()))?;

    info!(bytes = audio.len(), path = %output.display(), "Audio written");
    Ok(audio.len())
}
