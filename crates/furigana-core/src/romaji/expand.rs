use tracing::warn;

use super::table::Syllables;
use crate::unicode::{is_long_vowel_mark, is_sokuon};

/// One position in a kana string before romanization.
enum Slot {
    Syllable(Vec<String>),
    /// Small tsu: resolved from its neighbours.
    Sokuon,
    /// ー: repeats the preceding vowel.
    LongVowel,
}

/// Kana whose romanization is ambiguous in transcribed lyrics.
fn special_romaji(kana: &str) -> Option<&'static [&'static str]> {
    let options: &'static [&'static str] = match kana {
        "へ" => &["he", "e"],
        "を" | "ヲ" => &["wo", "o"],
        "は" => &["ha", "wa"],
        "ふ" | "フ" => &["fu", "hu"],
        "づ" => &["zu"],
        "ぢ" => &["ji"],
        "ぁ" => &["a"],
        "ぃ" => &["i"],
        "ぅ" => &["u"],
        "ぇ" => &["e"],
        "ぉ" => &["o"],
        _ => return None,
    };
    Some(options)
}

fn syllable_to_romaji(kana: &str, syllables: &Syllables) -> Vec<String> {
    if let Some(options) = special_romaji(kana) {
        return options.iter().map(|s| s.to_string()).collect();
    }
    if let Some(romaji) = syllables.to_romaji(kana) {
        return vec![romaji.to_string()];
    }
    warn!(kana, "no romaji for kana, passing through");
    vec![kana.to_lowercase()]
}

fn split_slots(kana: &str, syllables: &Syllables) -> Vec<Slot> {
    let chars: Vec<char> = kana.chars().collect();
    let mut slots = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if is_sokuon(c) {
            slots.push(Slot::Sokuon);
            i += 1;
            continue;
        }
        if is_long_vowel_mark(c) {
            slots.push(Slot::LongVowel);
            i += 1;
            continue;
        }
        if i + 1 < chars.len() {
            let digraph: String = chars[i..i + 2].iter().collect();
            if syllables.is_syllable(&digraph) {
                slots.push(Slot::Syllable(syllable_to_romaji(&digraph, syllables)));
                i += 2;
                continue;
            }
        }
        slots.push(Slot::Syllable(syllable_to_romaji(
            c.encode_utf8(&mut [0; 4]),
            syllables,
        )));
        i += 1;
    }
    slots
}

fn push_unique(options: &mut Vec<String>, s: String) {
    if !options.contains(&s) {
        options.push(s);
    }
}

/// Turn slots into per-position option lists. Sokuon and long-vowel slots
/// read the first option of their neighbours.
fn resolve_slots(slots: &[Slot]) -> Vec<Vec<String>> {
    let mut resolved: Vec<Vec<String>> = Vec::with_capacity(slots.len());
    for (i, slot) in slots.iter().enumerate() {
        let prev_last = resolved
            .last()
            .and_then(|opts| opts.first())
            .and_then(|s| s.chars().last());
        let options = match slot {
            Slot::Syllable(options) => options.clone(),
            Slot::LongVowel => vec![prev_last.map(String::from).unwrap_or_default()],
            // Doubled consonant first.
            Slot::Sokuon => {
                let mut options = Vec::with_capacity(4);
                let next_first = match slots.get(i + 1) {
                    Some(Slot::Syllable(next)) => next.first().and_then(|s| s.chars().next()),
                    _ => None,
                };
                if let Some(c) = next_first {
                    push_unique(&mut options, c.to_string());
                }
                if let Some(c) = prev_last {
                    push_unique(&mut options, c.to_string());
                }
                push_unique(&mut options, "h".to_string());
                push_unique(&mut options, String::new());
                options
            }
        };
        resolved.push(options);
    }
    resolved
}

/// All romaji strings consistent with a kana run, in generation order and
/// without duplicates.
///
/// Gemination is ambiguous without context, so a small tsu branches over
/// the following consonant, the preceding letter, an "h" and an elided
/// form, in that order. The empty string romanizes to `[""]`.
pub fn kana_to_romaji(kana: &str) -> Vec<String> {
    let syllables = Syllables::global();
    let resolved = resolve_slots(&split_slots(kana, syllables));

    let mut result = vec![String::new()];
    for options in &resolved {
        let mut next = Vec::with_capacity(result.len() * options.len());
        for prefix in &result {
            for option in options {
                push_unique(&mut next, format!("{prefix}{option}"));
            }
        }
        result = next;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_hiragana() {
        assert_eq!(kana_to_romaji("じぶん"), vec!["jibun"]);
        assert_eq!(kana_to_romaji("しゃしん"), vec!["shashin"]);
    }

    #[test]
    fn test_katakana_digraph() {
        assert_eq!(kana_to_romaji("ヴァイオリン"), vec!["vaiorin"]);
        assert_eq!(kana_to_romaji("ジェット").len(), 4);
    }

    #[test]
    fn test_particle_ambiguity() {
        assert_eq!(kana_to_romaji("を"), vec!["wo", "o"]);
        assert_eq!(kana_to_romaji("は"), vec!["ha", "wa"]);
        assert_eq!(kana_to_romaji("へは"), vec!["heha", "hewa", "eha", "ewa"]);
    }

    #[test]
    fn test_gemination_branches() {
        let romaji = kana_to_romaji("だって");
        assert_eq!(romaji, vec!["datte", "daate", "dahte", "date"]);
    }

    #[test]
    fn test_trailing_sokuon() {
        // Nothing follows, so only the preceding, "h" and elided forms remain.
        assert_eq!(kana_to_romaji("あっ"), vec!["aa", "ah", "a"]);
    }

    #[test]
    fn test_long_vowel_mark() {
        assert_eq!(kana_to_romaji("ラーメン"), vec!["raamen"]);
        assert_eq!(kana_to_romaji("ー"), vec![""]);
    }

    #[test]
    fn test_unknown_kana_passes_through() {
        assert_eq!(kana_to_romaji("ゝ"), vec!["ゝ"]);
    }

    #[test]
    fn test_empty() {
        assert_eq!(kana_to_romaji(""), vec![""]);
    }
}
