//! Configuration module for shortsmith.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{IdeaPrompts, Prompts, ScriptPrompts};
pub use settings::{
    GeneralSettings, ImageSettings, PromptSettings, ScriptSettings, SearchSettings,
    ServerSettings, Settings, StoreSettings, VideoSettings, VoiceSettings,
};
