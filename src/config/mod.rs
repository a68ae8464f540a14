//! Configuration module for Tolk.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    AudioSettings, DiarizationSettings, GeneralSettings, Settings, SummarySettings,
    TranscriptionEngine, TranscriptionSettings,
};
