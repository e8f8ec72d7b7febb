//! Bhashini CLI
//!
//! Command-line access to the Bhashini pipeline: list languages and voices,
//! transcribe audio, translate text and synthesize speech.

#![allow(clippy::print_stdout)]

mod commands;
mod settings;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use integration_bhashini::{
    DEFAULT_ASR_SAMPLING_RATE, DEFAULT_TTS_SAMPLING_RATE, PipelineClient, response,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::Overrides;

/// Bhashini CLI
#[derive(Parser)]
#[command(name = "bhashini-cli")]
#[command(author, version, about = "Bhashini ASR, translation and TTS client", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to a TOML config file (default: ./bhashini.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// ULCA user ID (overrides config file and BHASHINI_USER_ID)
    #[arg(long, global = true)]
    user_id: Option<String>,

    /// ULCA API key (overrides config file and BHASHINI_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Pipeline ID to load
    #[arg(long, global = true)]
    pipeline_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List languages available for a task (asr, translation or tts)
    Languages {
        /// Task type
        task: String,
    },

    /// List TTS voices for a language
    Voices {
        /// Language code (e.g. "hi")
        language: String,
    },

    /// Transcribe an audio file
    ///
    /// Example: bhashini-cli asr recording.wav --language hi
    Asr {
        /// Audio file to transcribe
        file: PathBuf,

        /// Language spoken in the audio
        #[arg(short, long)]
        language: String,

        /// Audio format: wav, mp3, flac or ogg (guessed from the extension if omitted)
        #[arg(short, long)]
        format: Option<String>,

        /// Sampling rate in Hz
        #[arg(long, default_value_t = DEFAULT_ASR_SAMPLING_RATE)]
        sampling_rate: u32,

        /// Print the full JSON response
        #[arg(long)]
        raw: bool,
    },

    /// Translate text
    ///
    /// Example: bhashini-cli translate "मेरा नाम विहिर है।" --source hi --target gu
    Translate {
        /// Text to translate
        text: String,

        /// Source language code
        #[arg(short, long)]
        source: String,

        /// Target language code
        #[arg(short, long)]
        target: String,

        /// Print the full JSON response
        #[arg(long)]
        raw: bool,
    },

    /// Synthesize speech and save it to a file
    ///
    /// Example: bhashini-cli tts "હેલો વર્લ્ડ" --language gu --output hello.wav
    Tts {
        /// Text to speak
        text: String,

        /// Language of the text
        #[arg(short, long)]
        language: String,

        /// Voice gender: male or female
        #[arg(short, long, default_value = "female")]
        gender: String,

        /// Sampling rate in Hz
        #[arg(long, default_value_t = DEFAULT_TTS_SAMPLING_RATE)]
        sampling_rate: u32,

        /// Where to write the audio
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let overrides = Overrides {
        user_id: cli.user_id,
        api_key: cli.api_key,
        pipeline_id: cli.pipeline_id,
    };
    let config = overrides.apply(settings::load(cli.config.as_deref())?);

    let client = PipelineClient::connect(config).await?;

    match cli.command {
        Commands::Languages { task } => {
            let languages = client.list_available_languages(&task)?;
            println!("{}", commands::format_languages(&languages));
        },

        Commands::Voices { language } => {
            let voices = client.get_supported_voices(&language)?;
            println!("{}", commands::format_voices(voices));
        },

        Commands::Asr {
            file,
            language,
            format,
            sampling_rate,
            raw,
        } => {
            let format = commands::resolve_audio_format(format.as_deref(), &file)?;
            let output =
                commands::asr(&client, &file, &language, format, sampling_rate, raw).await?;
            println!("{output}");
        },

        Commands::Translate {
            text,
            source,
            target,
            raw,
        } => {
            let body = client.translate(&text, &source, &target).await?;
            let output = commands::render_text(&body, response::translated_text(&body), raw)?;
            println!("{output}");
        },

        Commands::Tts {
            text,
            language,
            gender,
            sampling_rate,
            output,
        } => {
            let size = commands::tts_to_file(
                &client,
                &text,
                &language,
                &gender,
                sampling_rate,
                &output,
            )
            .await?;
            println!("Wrote {size} bytes to {}", output.display());
        },
    }

    Ok(())
}
