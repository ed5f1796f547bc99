use std::collections::HashMap;
use std::sync::OnceLock;

use super::config::{parse_syllable_toml, SyllableConfig, SyllableConfigError, DEFAULT_TOML};

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// A bijection between romaji syllables and kana sequences.
///
/// Both directions live in one map, so `get` accepts either side. Setting a
/// pair first evicts every pair that shares either side with it; at any time
/// each key is bound to at most one value.
#[derive(Debug, Default, Clone)]
pub struct SyllableTable {
    entries: HashMap<String, String>,
    pairs: usize,
}

impl SyllableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `a` and `b` to each other, dropping stale pairs on either side.
    pub fn set(&mut self, a: &str, b: &str) {
        self.remove(a);
        self.remove(b);
        self.entries.insert(a.to_string(), b.to_string());
        self.entries.insert(b.to_string(), a.to_string());
        self.pairs += 1;
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove the pair containing `key`. Returns the partner, if any.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let partner = self.entries.remove(key)?;
        if partner != key {
            self.entries.remove(&partner);
        }
        self.pairs -= 1;
        Some(partner)
    }

    /// Number of pairs, not raw entries.
    pub fn len(&self) -> usize {
        self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }

    /// Iterate over raw entries; every pair appears once per direction.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Process-wide syllable inventory: the hiragana bijection plus a one-way
/// katakana lookup.
pub struct Syllables {
    hiragana: SyllableTable,
    katakana: HashMap<String, String>,
}

impl Syllables {
    /// Set a custom inventory before the first `global()` call.
    pub fn init_custom(toml_content: String) -> Result<(), SyllableConfigError> {
        parse_syllable_toml(&toml_content)?;
        CUSTOM_TOML
            .set(toml_content)
            .map_err(|_| SyllableConfigError::AlreadyInitialized)
    }

    /// Get or initialize the global singleton.
    pub fn global() -> &'static Syllables {
        static INSTANCE: OnceLock<Syllables> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let toml_str = CUSTOM_TOML
                .get()
                .map(|s| s.as_str())
                .unwrap_or(DEFAULT_TOML);
            let config = parse_syllable_toml(toml_str).expect("syllable TOML must be valid");
            Syllables::from_config(&config)
        })
    }

    pub fn from_config(config: &SyllableConfig) -> Self {
        let mut hiragana = SyllableTable::new();
        for (romaji, kana) in &config.hiragana {
            hiragana.set(romaji, kana);
        }
        Self {
            hiragana,
            katakana: config
                .katakana
                .iter()
                .map(|(kana, romaji)| (kana.clone(), romaji.clone()))
                .collect(),
        }
    }

    pub fn hiragana(&self) -> &SyllableTable {
        &self.hiragana
    }

    /// Hiragana for a romaji syllable.
    pub fn to_kana(&self, romaji: &str) -> Option<&str> {
        if !romaji.is_ascii() {
            return None;
        }
        self.hiragana.get(romaji)
    }

    /// Romaji for a hiragana or katakana sequence.
    pub fn to_romaji(&self, kana: &str) -> Option<&str> {
        if kana.is_ascii() {
            return None;
        }
        self.hiragana
            .get(kana)
            .or_else(|| self.katakana.get(kana).map(String::as_str))
    }

    /// Whether `kana` is a known syllable in either script.
    pub fn is_syllable(&self, kana: &str) -> bool {
        self.to_romaji(kana).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn set_and_get_both_directions() {
        let mut table = SyllableTable::new();
        table.set("ka", "か");
        assert_eq!(table.get("ka"), Some("か"));
        assert_eq!(table.get("か"), Some("ka"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn set_evicts_stale_pairs_on_both_sides() {
        let mut table = SyllableTable::new();
        table.set("ka", "か");
        table.set("ki", "き");
        // "ka" now points at き: both (ka, か) and (ki, き) are gone.
        table.set("ka", "き");
        assert_eq!(table.get("ka"), Some("き"));
        assert_eq!(table.get("き"), Some("ka"));
        assert_eq!(table.get("か"), None);
        assert_eq!(table.get("ki"), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn remove_drops_partner() {
        let mut table = SyllableTable::new();
        table.set("shi", "し");
        assert_eq!(table.remove("し"), Some("shi".to_string()));
        assert!(table.is_empty());
        assert!(!table.contains("shi"));
        assert_eq!(table.remove("shi"), None);
    }

    #[test]
    fn self_pair_counts_once() {
        let mut table = SyllableTable::new();
        table.set("x", "x");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("x"), Some("x"));
        table.set("x", "y");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("y"), Some("x"));
    }

    #[test]
    fn global_inventory() {
        let syllables = Syllables::global();
        assert_eq!(syllables.to_kana("tsu"), Some("つ"));
        assert_eq!(syllables.to_kana("kya"), Some("きゃ"));
        assert_eq!(syllables.to_romaji("しゃ"), Some("sha"));
        assert_eq!(syllables.to_romaji("ヴァ"), Some("va"));
        assert_eq!(syllables.to_romaji("ka"), None);
        assert_eq!(syllables.to_kana("か"), None);
        assert!(syllables.hiragana().len() > 100);
    }

    #[test]
    fn custom_inventory_keeps_katakana_lookups() {
        let config = parse_syllable_toml(
            "[hiragana]\nka = \"か\"\n[katakana]\n\"カ\" = \"ka\"\n\"ヴァ\" = \"va\"\n",
        )
        .unwrap();
        let syllables = Syllables::from_config(&config);
        assert_eq!(syllables.to_romaji("か"), Some("ka"));
        assert_eq!(syllables.to_romaji("カ"), Some("ka"));
        assert_eq!(syllables.to_romaji("ヴァ"), Some("va"));
        assert!(!syllables.is_syllable("ヴィ"));
    }

    proptest! {
        #[test]
        fn bijection_holds_after_any_sets(
            ops in prop::collection::vec((0u8..6, 0u8..6), 0..40)
        ) {
            let mut table = SyllableTable::new();
            for (a, b) in ops {
                table.set(&format!("r{a}"), &format!("k{b}"));
            }
            let mut raw = 0;
            for (key, value) in table.entries() {
                prop_assert_eq!(table.get(value), Some(key));
                raw += 1;
            }
            prop_assert_eq!(raw, table.len() * 2);
        }
    }
}
