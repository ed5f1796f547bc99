//! Engine settings loaded from TOML.
//!
//! - `Settings::default()` parses the embedded `default_settings.toml`
//! - `parse_settings_toml(toml_content)` parses and validates a custom file
//!
//! Settings are passed to the engine entry points as values; there is no
//! process-wide mutable configuration.

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub alignment: AlignmentSettings,
    pub substitution: SubstitutionSettings,
    pub lyrics: LyricsSettings,
}

impl Default for Settings {
    fn default() -> Self {
        // Validated at compile time by build.rs and by the tests below.
        parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("settings TOML must be valid")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlignmentSettings {
    pub line_strict: bool,
    pub dictionary_match_penalty: i64,
    pub dictionary_mismatch_penalty: i64,
    pub invalid_penalty: i64,
    pub max_candidates: usize,
    pub max_anchor_sets: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubstitutionSettings {
    pub redo_limit: usize,
    pub annotation_template: String,
    pub toggle_marker: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LyricsSettings {
    pub min_untranslated_ratio: f64,
    pub max_kanji_mismatch_ratio: f64,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn invalid(field: &str, reason: &str) -> SettingsError {
    SettingsError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_non_negative {
        ($section:ident . $field:ident) => {
            if s.$section.$field < 0 {
                return Err(invalid(
                    concat!(stringify!($section), ".", stringify!($field)),
                    "must be non-negative",
                ));
            }
        };
    }
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(invalid(
                    concat!(stringify!($section), ".", stringify!($field)),
                    "must be positive",
                ));
            }
        };
    }
    macro_rules! check_ratio {
        ($section:ident . $field:ident) => {
            if !(0.0..=1.0).contains(&s.$section.$field) {
                return Err(invalid(
                    concat!(stringify!($section), ".", stringify!($field)),
                    "must be within [0, 1]",
                ));
            }
        };
    }

    check_non_negative!(alignment.dictionary_match_penalty);
    check_non_negative!(alignment.dictionary_mismatch_penalty);
    check_non_negative!(alignment.invalid_penalty);
    check_positive_usize!(alignment.max_candidates);
    check_positive_usize!(alignment.max_anchor_sets);

    let a = &s.alignment;
    if a.dictionary_match_penalty >= a.dictionary_mismatch_penalty {
        return Err(invalid(
            "alignment.dictionary_match_penalty",
            "must be below alignment.dictionary_mismatch_penalty",
        ));
    }
    if a.dictionary_mismatch_penalty >= a.invalid_penalty {
        return Err(invalid(
            "alignment.dictionary_mismatch_penalty",
            "must be below alignment.invalid_penalty",
        ));
    }

    if s.substitution.annotation_template.trim().is_empty() {
        return Err(invalid(
            "substitution.annotation_template",
            "must not be empty",
        ));
    }

    check_ratio!(lyrics.min_untranslated_ratio);
    check_ratio!(lyrics.max_kanji_mismatch_ratio);

    Ok(())
}
