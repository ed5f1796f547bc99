//! Romaji ↔ kana conversion.
//!
//! A bidirectional syllable table loaded from an embedded TOML inventory
//! backs two directions: expanding a kana run into every romaji string
//! consistent with it, and greedily converting a romaji string to hiragana.

mod config;
mod convert;
mod expand;
mod table;

pub use config::{default_toml, parse_syllable_toml, SyllableConfig, SyllableConfigError};
pub use convert::{normalize_romaji, romaji_to_hiragana, try_romaji_to_hiragana, RomajiError};
pub use expand::kana_to_romaji;
pub use table::{SyllableTable, Syllables};
