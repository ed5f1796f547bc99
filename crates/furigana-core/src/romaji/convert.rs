use tracing::error;

use super::table::Syllables;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RomajiError {
    #[error("cannot convert {romaji:?} to hiragana: no syllable for {cluster:?}")]
    Unresolved { romaji: String, cluster: String },
}

fn is_vowel(ch: char) -> bool {
    matches!(ch, 'a' | 'i' | 'u' | 'e' | 'o')
}

/// Greedy left-to-right romaji → hiragana conversion.
///
/// Consonants accumulate until a vowel closes the syllable. At that point:
/// a leading "n" that does not start a valid syllable becomes ん, a doubled
/// leading consonant becomes っ, and an "o" directly after an "o" is read as
/// the long vowel う. A trailing cluster must itself be a syllable ("n").
pub fn try_romaji_to_hiragana(romaji: &str) -> Result<String, RomajiError> {
    let syllables = Syllables::global();
    let unresolved = |cluster: &str| RomajiError::Unresolved {
        romaji: romaji.to_string(),
        cluster: cluster.to_string(),
    };

    let mut result = String::new();
    let mut pending = String::new();
    let mut prev: Option<char> = None;

    for ch in romaji.chars() {
        pending.push(ch);
        if !is_vowel(ch) {
            prev = Some(ch);
            continue;
        }

        if pending.starts_with('n') && syllables.to_kana(&pending).is_none() {
            result.push('ん');
            pending.remove(0);
        }
        let doubled = {
            let mut it = pending.chars();
            pending.chars().count() == 3 && it.next() == it.next()
        };
        if doubled {
            result.push('っ');
            pending.remove(0);
        }

        if ch == 'o' && prev == Some('o') {
            result.push('う');
        } else {
            let kana = syllables
                .to_kana(&pending)
                .ok_or_else(|| unresolved(&pending))?;
            result.push_str(kana);
        }
        pending.clear();
        prev = Some(ch);
    }

    if !pending.is_empty() {
        let kana = syllables
            .to_kana(&pending)
            .ok_or_else(|| unresolved(&pending))?;
        result.push_str(kana);
    }
    Ok(result)
}

/// Like [`try_romaji_to_hiragana`], but a failure is an expected outcome and
/// only logged when `report_error` is set.
pub fn romaji_to_hiragana(romaji: &str, report_error: bool) -> Option<String> {
    match try_romaji_to_hiragana(romaji) {
        Ok(kana) => Some(kana),
        Err(e) => {
            if report_error {
                error!("{e}");
            }
            None
        }
    }
}

/// Normalize a transcribed romaji line: lowercase, expand macrons, and keep
/// only alphanumeric characters.
pub fn normalize_romaji(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for ch in line.chars().flat_map(char::to_lowercase) {
        match ch {
            'ā' => out.push_str("aa"),
            'ō' => out.push_str("ou"),
            'ū' => out.push_str("uu"),
            'ī' => out.push('i'),
            'ē' => out.push_str("ei"),
            c if c.is_alphanumeric() => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::romaji::kana_to_romaji;

    use proptest::prelude::*;

    fn to_hira(s: &str) -> Option<String> {
        romaji_to_hiragana(s, false)
    }

    #[test]
    fn test_basic_words() {
        assert_eq!(to_hira("jibun").as_deref(), Some("じぶん"));
        assert_eq!(to_hira("nani").as_deref(), Some("なに"));
        assert_eq!(to_hira("nandesuka").as_deref(), Some("なんですか"));
        assert_eq!(to_hira("kyouwa").as_deref(), Some("きょうわ"));
    }

    #[test]
    fn test_hatsuon_before_consonant_syllable() {
        assert_eq!(to_hira("konnichiwa").as_deref(), Some("こんにちわ"));
        assert_eq!(to_hira("shinpai").as_deref(), Some("しんぱい"));
    }

    #[test]
    fn test_sokuon_doubled_consonant() {
        assert_eq!(to_hira("kitte").as_deref(), Some("きって"));
        assert_eq!(to_hira("datte").as_deref(), Some("だって"));
    }

    #[test]
    fn test_long_o() {
        assert_eq!(to_hira("doo").as_deref(), Some("どう"));
        assert_eq!(to_hira("too").as_deref(), Some("とう"));
    }

    #[test]
    fn test_unresolved_cluster() {
        assert_eq!(to_hira("cry"), None);
        assert_eq!(to_hira("matcha"), None);
        let err = try_romaji_to_hiragana("xyz").unwrap_err();
        assert_eq!(
            err,
            RomajiError::Unresolved {
                romaji: "xyz".into(),
                cluster: "xyz".into()
            }
        );
    }

    #[test]
    fn test_empty_is_empty() {
        assert_eq!(to_hira("").as_deref(), Some(""));
    }

    #[test]
    fn test_normalize_romaji() {
        assert_eq!(normalize_romaji("Kyō wa, ii tenki!"), "kyouwaiitenki");
        assert_eq!(normalize_romaji("Tōkyō Ā"), "toukyouaa");
        assert_eq!(normalize_romaji("  "), "");
    }

    // Syllables with a single romanization, none ending in "o" before a
    // vowel-only syllable and no ん (which is ambiguous before a vowel).
    const PLAIN: &[&str] = &[
        "か", "き", "く", "け", "さ", "し", "す", "せ", "た", "ち", "つ", "て", "な", "に",
        "ぬ", "ね", "ま", "み", "む", "め", "ら", "り", "る", "れ", "きゃ", "しゅ", "ちょ",
        "じ", "ぎゅ",
    ];

    const GEMINATE_TARGETS: &[&str] = &["か", "さ", "た", "ぱ", "ま"];

    proptest! {
        #[test]
        fn round_trip_plain_kana(parts in prop::collection::vec(prop::sample::select(PLAIN), 1..8)) {
            let kana: String = parts.concat();
            for romaji in kana_to_romaji(&kana) {
                prop_assert_eq!(to_hira(&romaji), Some(kana.clone()));
            }
        }

        #[test]
        fn round_trip_gemination_has_a_faithful_branch(
            before in prop::sample::select(PLAIN),
            after in prop::sample::select(GEMINATE_TARGETS),
        ) {
            let kana = format!("{before}っ{after}");
            let romaji = kana_to_romaji(&kana);
            prop_assert!(romaji.iter().any(|r| to_hira(r).as_deref() == Some(kana.as_str())));
        }
    }
}
