//! CLI module for Tolk.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Tolk - Audio Transcription with Speaker Diarization
///
/// A CLI tool that turns an audio recording into a transcript, optionally
/// annotated with speaker labels and summarized into key takeaways.
/// The name "Tolk" comes from the Norwegian/Scandinavian word for "interpreter."
#[derive(Parser, Debug)]
#[command(name = "tolk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Tolk and verify system requirements
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Transcribe an audio or video file
    Transcribe {
        /// Path to the audio/video file to transcribe
        file: String,

        /// Attribute speech to speakers (uses Google Speech-to-Text)
        #[arg(short, long)]
        diarize: bool,

        /// Generate key takeaways and action items with the OpenAI API
        #[arg(short, long)]
        summary: bool,

        /// Output format for the transcript (txt, md, srt, json)
        #[arg(short, long, default_value = "txt")]
        format: String,

        /// Directory for output files (overrides config)
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Language code for recognition, e.g. "en-US"
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "summary.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
