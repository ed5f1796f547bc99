//! Pronunciation dictionary: known readings of a kanji string.
//!
//! `MapDictionary` loads a TSV of `surface<TAB>reading,reading…` lines.
//! Readings of a multi-character surface without its own entry are composed
//! from the readings of each character.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::unicode::{is_hiragana_reading, katakana_to_hiragana};

/// Upper bound on readings composed from per-character entries.
const MAX_COMPOSED_READINGS: usize = 512;

#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

pub trait PronunciationDictionary: Send + Sync {
    /// All known readings (hiragana) of `surface`; empty when unverifiable.
    fn readings(&self, surface: &str) -> Vec<String>;

    fn is_known_reading(&self, surface: &str, reading: &str) -> bool {
        self.readings(surface).iter().any(|r| r == reading)
    }
}

/// A dictionary that knows nothing: every reading is unverifiable.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyDictionary;

impl PronunciationDictionary for EmptyDictionary {
    fn readings(&self, _surface: &str) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Debug, Default, Clone)]
pub struct MapDictionary {
    entries: HashMap<String, Vec<String>>,
}

/// Trim okurigana markers (`-`, and anything after `.`) and fold katakana
/// on'yomi into hiragana.
fn normalize_reading(raw: &str) -> String {
    let s = raw.trim().trim_matches('-');
    let s = s.split('.').next().unwrap_or(s);
    katakana_to_hiragana(s)
}

fn push_unique(readings: &mut Vec<String>, reading: String) {
    if !readings.contains(&reading) {
        readings.push(reading);
    }
}

impl MapDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reading. Returns `false` if it was already known.
    pub fn insert(&mut self, surface: &str, reading: &str) -> bool {
        let readings = self.entries.entry(surface.to_string()).or_default();
        if readings.iter().any(|r| r == reading) {
            return false;
        }
        readings.push(reading.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_tsv(content: &str) -> Result<Self, DictError> {
        let mut dict = Self::new();
        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parse_err = |reason: &str| DictError::Parse {
                line: idx + 1,
                reason: reason.to_string(),
            };
            let (surface, readings) = line
                .split_once('\t')
                .ok_or_else(|| parse_err("expected surface<TAB>readings"))?;
            let surface = surface.trim();
            if surface.is_empty() {
                return Err(parse_err("empty surface"));
            }
            for raw_reading in readings.split(',').filter(|r| !r.trim().is_empty()) {
                let reading = normalize_reading(raw_reading);
                if !is_hiragana_reading(&reading) {
                    return Err(parse_err(&format!("invalid reading {raw_reading:?}")));
                }
                dict.insert(surface, &reading);
            }
        }
        debug!(entries = dict.len(), "pronunciation dictionary loaded");
        Ok(dict)
    }

    pub fn open(path: &Path) -> Result<Self, DictError> {
        let content = fs::read_to_string(path)?;
        Self::from_tsv(&content)
    }

    /// Cartesian product of per-character readings, or empty if any
    /// character is unknown.
    fn composed(&self, surface: &str) -> Vec<String> {
        let mut result = vec![String::new()];
        let mut buf = [0u8; 4];
        for c in surface.chars() {
            let Some(options) = self.entries.get(&*c.encode_utf8(&mut buf)) else {
                return Vec::new();
            };
            let mut next = Vec::with_capacity(result.len() * options.len());
            'outer: for prefix in &result {
                for option in options {
                    if next.len() >= MAX_COMPOSED_READINGS {
                        break 'outer;
                    }
                    next.push(format!("{prefix}{option}"));
                }
            }
            result = next;
        }
        result
    }
}

impl PronunciationDictionary for MapDictionary {
    fn readings(&self, surface: &str) -> Vec<String> {
        let mut readings = self.entries.get(surface).cloned().unwrap_or_default();
        if surface.chars().nth(1).is_some() {
            for reading in self.composed(surface) {
                push_unique(&mut readings, reading);
            }
        }
        readings
    }
}
