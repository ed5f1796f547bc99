//! Page-level checks on lyric text.

use tracing::warn;

use crate::scanner::count_unnested;
use crate::substitute::ConversionLog;
use crate::unicode::{is_kana, is_kanji};

/// Japanese lyrics carry at least one kana and at least one kanji.
pub fn is_japanese_lyrics(text: &str) -> bool {
    text.chars().any(is_kana) && text.chars().any(is_kanji)
}

/// `true` when there is nothing left to annotate: no kanji at all, or the
/// share of kanji outside `{{…}}` spans is below `min_untranslated_ratio`.
pub fn is_fully_annotated(text: &str, min_untranslated_ratio: f64) -> bool {
    let total = text.chars().filter(|&c| is_kanji(c)).count();
    if total == 0 {
        return true;
    }
    let bare = count_unnested(text, is_kanji);
    (bare as f64) / (total as f64) < min_untranslated_ratio
}

/// Whether `candidate` is a transcription of `expected`: every kanji of
/// `expected` must appear in `candidate`.
///
/// When only a few are missing (below `max_mismatch_ratio` of all kanji),
/// they are added to `log.ignored_kanji` and the match is accepted.
pub fn lyrics_match(
    expected: &str,
    candidate: &str,
    log: &mut ConversionLog,
    max_mismatch_ratio: f64,
) -> bool {
    let mut total = 0usize;
    let mut missing: Vec<char> = Vec::new();
    for c in expected.chars().filter(|&c| is_kanji(c)) {
        total += 1;
        if !candidate.contains(c) {
            missing.push(c);
        }
    }
    if missing.is_empty() {
        return true;
    }
    if (missing.len() as f64) / (total as f64) < max_mismatch_ratio {
        warn!(?missing, "kanji missing from the reference lyrics, leaving them unannotated");
        log.ignored_kanji.extend(missing);
        return true;
    }
    false
}
