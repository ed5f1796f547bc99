//! Explains a romaji segment with the kanji/other runs of one gap.

use tracing::debug;

use crate::dict::PronunciationDictionary;
use crate::romaji::romaji_to_hiragana;
use crate::settings::AlignmentSettings;
use crate::token::{Token, TokenKind};

/// A partial assignment of the gap's runs to a prefix of its segment.
struct Partial {
    run: usize,
    offset: usize,
    score: i64,
    tokens: Vec<Token>,
}

pub(crate) struct GapMatcher<'a> {
    dict: &'a dyn PronunciationDictionary,
    settings: &'a AlignmentSettings,
}

impl<'a> GapMatcher<'a> {
    pub(crate) fn new(
        dict: &'a dyn PronunciationDictionary,
        settings: &'a AlignmentSettings,
    ) -> Self {
        Self { dict, settings }
    }

    /// Best-scoring assignment of `romaji` to `runs`, or `None` if no
    /// assignment consumes the whole segment.
    pub(crate) fn match_gap(&self, runs: &[Token], romaji: &str) -> Option<(i64, Vec<Token>)> {
        match runs {
            [] => romaji.is_empty().then(|| (0, Vec::new())),
            [run] => self.match_single(run, romaji).map(|(score, t)| (score, vec![t])),
            _ => self.match_multi(runs, romaji),
        }
    }

    fn match_single(&self, run: &Token, romaji: &str) -> Option<(i64, Token)> {
        if run.romaji.iter().any(|r| r == romaji) {
            return Some((0, run.resolved(romaji.to_string(), run.reading.clone())));
        }
        self.rate_conversion(run, romaji)
    }

    /// Read `segment` as hiragana and rate it against the dictionary.
    fn rate_conversion(&self, run: &Token, segment: &str) -> Option<(i64, Token)> {
        let s = self.settings;
        match romaji_to_hiragana(segment, false) {
            Some(hiragana) => {
                let penalty = if self.dict.is_known_reading(&run.surface, &hiragana) {
                    s.dictionary_match_penalty
                } else {
                    s.dictionary_mismatch_penalty
                };
                Some((-penalty, run.resolved(segment.to_string(), hiragana)))
            }
            // Latin words rarely read as kana; keep them at the lowest rating.
            None if run.kind == TokenKind::Other => Some((
                -s.invalid_penalty,
                run.resolved(segment.to_string(), String::new()),
            )),
            None => None,
        }
    }

    /// Work-list search over every split of `romaji` among `runs`. Each run
    /// either takes one of its own candidates as a prefix, or a prefix of at
    /// least one letter per character read through the syllable table.
    fn match_multi(&self, runs: &[Token], romaji: &str) -> Option<(i64, Vec<Token>)> {
        let mut best: Option<(i64, Vec<Token>)> = None;
        let mut stack = vec![Partial {
            run: 0,
            offset: 0,
            score: 0,
            tokens: Vec::with_capacity(runs.len()),
        }];
        let mut expanded = 0usize;

        while let Some(partial) = stack.pop() {
            expanded += 1;
            if expanded > self.settings.max_candidates {
                debug!(romaji, expanded, "gap search truncated");
                break;
            }
            if partial.run == runs.len() {
                if partial.offset == romaji.len()
                    && best.as_ref().map_or(true, |(score, _)| partial.score > *score)
                {
                    best = Some((partial.score, partial.tokens));
                }
                continue;
            }
            let rest = &romaji[partial.offset..];
            if rest.is_empty() {
                continue;
            }

            let run = &runs[partial.run];
            let mut steps: Vec<(usize, i64, Token)> = Vec::new();
            for candidate in run.romaji.iter().filter(|c| !c.is_empty()) {
                if rest.starts_with(candidate.as_str()) {
                    let token = run.resolved(candidate.clone(), run.reading.clone());
                    steps.push((candidate.len(), 0, token));
                }
            }
            let min_len = run.surface.chars().count().max(1);
            for end in min_len..=rest.len() {
                if !rest.is_char_boundary(end) {
                    continue;
                }
                if let Some((score, token)) = self.rate_conversion(run, &rest[..end]) {
                    steps.push((end, score, token));
                }
            }

            // Reversed so the stack pops steps in generation order.
            for (len, score, token) in steps.into_iter().rev() {
                let mut tokens = partial.tokens.clone();
                tokens.push(token);
                stack.push(Partial {
                    run: partial.run + 1,
                    offset: partial.offset + len,
                    score: partial.score + score,
                    tokens,
                });
            }
        }
        best
    }
}
