//! Bracket-aware scanning over wikitext without a markup parser.
//!
//! Only `{{` / `}}` pairs are tracked. All offsets are byte offsets into the
//! scanned `&str`.

/// One lexical step of the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Open,
    Close,
    Char(char),
}

impl Step {
    pub(crate) fn len(self) -> usize {
        match self {
            Step::Open | Step::Close => 2,
            Step::Char(c) => c.len_utf8(),
        }
    }
}

/// The step starting at byte `i`, or `None` at end of text.
pub(crate) fn step_at(text: &str, i: usize) -> Option<Step> {
    let rest = text.get(i..)?;
    if rest.starts_with("{{") {
        Some(Step::Open)
    } else if rest.starts_with("}}") {
        Some(Step::Close)
    } else {
        rest.chars().next().map(Step::Char)
    }
}

/// Index just past the `}}` closing the region that `pos` is inside, or
/// `None` if the region is never closed.
///
/// `pos` is the offset right after an opening `{{`. Nested pairs are skipped.
pub fn find_close_brace(text: &str, pos: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = pos;
    while let Some(step) = step_at(text, i) {
        match step {
            Step::Open => depth += 1,
            Step::Close if depth == 0 => return Some(i + 2),
            Step::Close => depth -= 1,
            Step::Char(_) => {}
        }
        i += step.len();
    }
    None
}

/// Like [`find_close_brace`], but an unterminated region runs to the end of
/// the text.
pub fn matching_close_brace(text: &str, pos: usize) -> usize {
    find_close_brace(text, pos).unwrap_or(text.len())
}

/// First character at or after `from` that satisfies `pred` and is not inside
/// a `{{…}}` span.
///
/// A `}}` with no matching opener ends the search: the scan has walked out of
/// the region it started in.
pub fn next_unnested(text: &str, pred: impl Fn(char) -> bool, from: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = from;
    while let Some(step) = step_at(text, i) {
        match step {
            Step::Open => depth += 1,
            Step::Close if depth == 0 => return None,
            Step::Close => depth -= 1,
            Step::Char(c) if depth == 0 && pred(c) => return Some(i),
            Step::Char(_) => {}
        }
        i += step.len();
    }
    None
}

/// Number of characters satisfying `pred` outside any `{{…}}` span.
pub fn count_unnested(text: &str, pred: impl Fn(char) -> bool) -> usize {
    let mut count = 0;
    let mut from = 0;
    while let Some(i) = next_unnested(text, &pred, from) {
        count += 1;
        from = i + text[i..].chars().next().map_or(1, char::len_utf8);
    }
    count
}

/// Search for each part in turn, each one after the end of the previous.
/// Stops at the first part that is not found.
pub fn find_in_string(s: &str, parts: &[&str]) -> Vec<usize> {
    let mut result = Vec::with_capacity(parts.len());
    let mut from = 0;
    for part in parts {
        let Some(i) = s.get(from..).and_then(|rest| rest.find(part)) else {
            break;
        };
        result.push(from + i);
        from += i + part.len();
    }
    result
}
