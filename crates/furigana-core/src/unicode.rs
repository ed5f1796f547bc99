//! Character-level Unicode classification for Japanese lyric text.

/// The kanji iteration mark. Lives in the CJK symbols block but repeats the
/// preceding kanji, so it is classified as kanji.
pub const ITERATION_MARK: char = '々';

/// Katakana middle dot. Inside the katakana block but used as punctuation.
const MIDDLE_DOT: char = '・';

/// Hiragana letters (U+3041..U+3096). Iteration and voicing marks
/// (ゝゞ゛゜) are not letters and have no romanization.
pub fn is_hiragana(c: char) -> bool {
    ('\u{3041}'..='\u{3096}').contains(&c)
}

/// Check the full Katakana block (U+30A0..U+30FF).
pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

/// Hiragana or katakana, excluding the middle dot. The prolonged sound mark
/// ー counts as kana.
pub fn is_kana(c: char) -> bool {
    is_hiragana(c) || (is_katakana(c) && c != MIDDLE_DOT)
}

pub fn is_kanji(c: char) -> bool {
    c == ITERATION_MARK
        || ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || ('\u{F900}'..='\u{FAFF}').contains(&c)
        || ('\u{20000}'..='\u{2A6DF}').contains(&c)
}

/// Halfwidth CJK punctuation and halfwidth katakana (U+FF5F..U+FF9F).
pub fn is_other_japanese(c: char) -> bool {
    ('\u{FF5F}'..='\u{FF9F}').contains(&c)
}

pub fn is_japanese(c: char) -> bool {
    is_kana(c) || is_kanji(c) || is_other_japanese(c)
}

/// Small tsu in either script, marking a geminate consonant.
pub fn is_sokuon(c: char) -> bool {
    matches!(c, 'っ' | 'ッ')
}

pub fn is_long_vowel_mark(c: char) -> bool {
    c == 'ー'
}

/// Convert katakana to hiragana, passing through anything without a
/// hiragana counterpart (ー, ヴ-range extensions, ASCII).
pub fn katakana_to_hiragana(s: &str) -> String {
    s.chars()
        .map(|c| {
            if ('\u{30A1}'..='\u{30F6}').contains(&c) {
                char::from_u32(c as u32 - 0x60).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Check if a string is a valid hiragana reading.
///
/// Accepts hiragana characters and the prolonged sound mark ー, which
/// appears in readings like "らーめん".
pub fn is_hiragana_reading(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| is_hiragana(c) || c == 'ー')
}
