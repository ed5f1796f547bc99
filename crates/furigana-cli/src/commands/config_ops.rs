use std::fs;

use furigana_core::{romaji, settings};

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(settings::parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: alignment.max_candidates={}, substitution.redo_limit={}, lyrics.min_untranslated_ratio={}",
        s.alignment.max_candidates, s.substitution.redo_limit, s.lyrics.min_untranslated_ratio
    );
}

pub fn syllables_export() {
    print!("{}", romaji::default_toml());
}

pub fn syllables_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let config = die!(romaji::parse_syllable_toml(&content), "Error: {}");
    println!(
        "OK: {} hiragana syllables, {} katakana lookups",
        config.hiragana.len(),
        config.katakana.len()
    );
}
