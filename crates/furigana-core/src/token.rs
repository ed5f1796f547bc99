//! The run/token flowing through tokenizer, alignment and substitution.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Kana,
    Kanji,
    /// Latin letters, digits and anything else treated as opaque.
    Other,
}

/// A run of source text.
///
/// Identity is `(surface, kind, reading)`: the romaji candidates are working
/// state of the alignment search and do not participate in equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub surface: String,
    pub kind: TokenKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub romaji: Vec<String>,
    #[serde(default)]
    pub reading: String,
}

impl Token {
    /// A kana run reads as itself.
    pub fn kana(surface: impl Into<String>) -> Self {
        let surface = surface.into();
        Self {
            reading: surface.clone(),
            surface,
            kind: TokenKind::Kana,
            romaji: Vec::new(),
        }
    }

    pub fn kanji(surface: impl Into<String>, reading: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            kind: TokenKind::Kanji,
            romaji: Vec::new(),
            reading: reading.into(),
        }
    }

    pub fn other(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            kind: TokenKind::Other,
            romaji: Vec::new(),
            reading: String::new(),
        }
    }

    pub fn with_romaji(mut self, romaji: Vec<String>) -> Self {
        self.romaji = romaji;
        self
    }

    pub fn is_kana(&self) -> bool {
        self.kind == TokenKind::Kana
    }

    pub fn is_kanji(&self) -> bool {
        self.kind == TokenKind::Kanji
    }

    /// Same run with a different resolved reading.
    pub(crate) fn resolved(&self, romaji: String, reading: String) -> Self {
        Self {
            surface: self.surface.clone(),
            kind: self.kind,
            romaji: vec![romaji],
            reading,
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.surface == other.surface && self.kind == other.kind && self.reading == other.reading
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.surface.hash(state);
        self.kind.hash(state);
        self.reading.hash(state);
    }
}
