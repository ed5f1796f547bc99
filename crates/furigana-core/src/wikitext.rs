//! Minimal wikitext lookups around the lyrics template.
//!
//! Nothing here parses markup: templates are located by name and their
//! extent by brace counting. All ranges are byte ranges into the page.

use std::ops::Range;

use crate::scanner::{find_close_brace, find_in_string, next_unnested};

/// Name prefix of the bilingual lyrics template.
pub const LYRICS_TEMPLATE: &str = "LyricsKai";

/// Whether `text` invokes a template whose name starts with `name`,
/// ignoring ASCII case.
pub fn contains_template(text: &str, name: &str) -> bool {
    find_template(text, name, 0).is_some()
}

fn find_template(text: &str, name: &str, from: usize) -> Option<usize> {
    let needle = format!("{{{{{}", name.to_ascii_lowercase());
    let haystack = text.get(from..)?.to_ascii_lowercase();
    haystack.find(&needle).map(|i| from + i)
}

/// The full extent, braces included, of the first lyrics template that
/// carries an `original` argument. Sibling templates sharing the name
/// prefix (`LyricsKai/…`) are passed over.
pub fn extract_lyrics_template(text: &str) -> Option<Range<usize>> {
    let mut from = 0;
    while let Some(start) = find_template(text, LYRICS_TEMPLATE, from) {
        let end = find_close_brace(text, start + 2)?;
        if extract_original_lyrics(text, start..end).is_some() {
            return Some(start..end);
        }
        from = start + 2;
    }
    None
}

/// The value of the `original` argument of the template spanning
/// `template`: from after `|original=` up to the next `|` outside nested
/// templates, or the template's closing braces.
pub fn extract_original_lyrics(text: &str, template: Range<usize>) -> Option<Range<usize>> {
    let inner_start = template.start + 2;
    let inner_end = template.end.checked_sub(2)?;
    let inner = text.get(inner_start..inner_end)?;

    let found = find_in_string(inner, &["|", "original", "="]);
    let &[_, _, eq] = found.as_slice() else {
        return None;
    };
    let value_start = eq + 1;
    let value_end = next_unnested(inner, |c| c == '|', value_start).unwrap_or(inner.len());
    Some(inner_start + value_start..inner_start + value_end)
}

/// Split leading title (`'''…'''`) and blank lines off the lyrics.
pub fn split_heading(lyrics: &str) -> (&str, &str) {
    let mut offset = 0;
    for line in lyrics.split_inclusive('\n') {
        if !(line.contains("'''") || line.trim().is_empty()) {
            break;
        }
        offset += line.len();
    }
    lyrics.split_at(offset)
}
