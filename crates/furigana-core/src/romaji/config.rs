use std::collections::BTreeMap;

use serde::Deserialize;

pub const DEFAULT_TOML: &str = include_str!("default_syllables.toml");

/// Parsed syllable inventory.
#[derive(Debug, Clone, Deserialize)]
pub struct SyllableConfig {
    /// romaji → hiragana
    pub hiragana: BTreeMap<String, String>,
    /// katakana → romaji
    #[serde(default)]
    pub katakana: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SyllableConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("[hiragana] table is empty")]
    Empty,
    #[error("non-ASCII romaji: {0}")]
    NonAsciiRomaji(String),
    #[error("empty value for key: {0}")]
    EmptyValue(String),
    #[error("syllable table already initialized")]
    AlreadyInitialized,
}

/// Returns the embedded default syllable inventory.
pub fn default_toml() -> &'static str {
    DEFAULT_TOML
}

/// Parse and validate a syllable inventory.
pub fn parse_syllable_toml(toml_str: &str) -> Result<SyllableConfig, SyllableConfigError> {
    let config: SyllableConfig =
        toml::from_str(toml_str).map_err(|e| SyllableConfigError::Parse(e.to_string()))?;

    if config.hiragana.is_empty() {
        return Err(SyllableConfigError::Empty);
    }

    for (romaji, kana) in &config.hiragana {
        if !romaji.is_ascii() {
            return Err(SyllableConfigError::NonAsciiRomaji(romaji.clone()));
        }
        if kana.is_empty() {
            return Err(SyllableConfigError::EmptyValue(romaji.clone()));
        }
    }
    for (kana, romaji) in &config.katakana {
        if !romaji.is_ascii() {
            return Err(SyllableConfigError::NonAsciiRomaji(romaji.clone()));
        }
        if romaji.is_empty() {
            return Err(SyllableConfigError::EmptyValue(kana.clone()));
        }
    }

    Ok(config)
}
