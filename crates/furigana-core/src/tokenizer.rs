//! Threads oracle-proposed tokens through the literal text of a line.
//!
//! The oracle is queried once for a whole page, so a single
//! [`OracleCursor`] is shared across lines and consumed in order.

use tracing::{debug, debug_span, warn};

use crate::token::{Token, TokenKind};
use crate::unicode::{is_japanese, is_kana, is_kanji};

/// Characters the oracle drops before segmenting.
fn is_dropped(c: char) -> bool {
    matches!(c, ' ' | '\u{3000}' | '\u{FEFF}')
}

#[derive(Debug, thiserror::Error)]
pub enum TokenizeError {
    /// `partial` still covers the whole line: the oracle's tokens where they
    /// thread, and the unthreaded Japanese text as runs without a reading.
    #[error("oracle output does not match line {line:?}: unthreaded text {rest:?}")]
    OracleMismatch {
        line: String,
        rest: String,
        partial: Vec<Token>,
    },
}

/// Read position over an immutable oracle token list.
#[derive(Debug, Clone)]
pub struct OracleCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> OracleCursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Tokens consumed between `start` and the current position.
    pub fn consumed_since(&self, start: usize) -> &'a [Token] {
        &self.tokens[start.min(self.pos)..self.pos]
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }
}

/// Replace every character that is not Japanese, alphanumeric or a space
/// with a space.
pub fn strip_special_characters(line: &str) -> String {
    line.chars()
        .map(|c| {
            if is_japanese(c) || c.is_alphanumeric() || c == ' ' {
                c
            } else {
                ' '
            }
        })
        .collect()
}

/// A run for text the oracle did not account for. Japanese text gets a
/// run with an empty reading so that substitution leaves it bare.
fn unthreaded_run(text: &str) -> Token {
    if text.chars().any(is_kanji) {
        Token::kanji(text, "")
    } else if text.chars().any(is_kana) {
        Token::kana(text)
    } else {
        Token::other(text)
    }
}

/// Split a line into typed runs covering the whole line, consuming oracle
/// tokens in order.
///
/// Where the oracle skips text (typically Latin words), the skipped text
/// becomes its own run and threading resumes at the next occurrence of the
/// oracle's head token. Adjacent kana runs are merged. Skipped Japanese text
/// fails the line, after the line's tokens have been consumed so the cursor
/// stays in step with the next line.
pub fn tokenize_line(
    line: &str,
    oracle: &mut OracleCursor<'_>,
) -> Result<Vec<Token>, TokenizeError> {
    let _span = debug_span!("tokenize_line", line).entered();
    let text: String = line.chars().filter(|&c| !is_dropped(c)).collect();
    let mut runs = Vec::new();
    let mut unthreaded: Vec<&str> = Vec::new();
    let mut index = 0;

    while index < text.len() {
        let rest = &text[index..];
        let location = oracle
            .peek()
            .and_then(|head| rest.find(head.surface.as_str()));
        if location == Some(0) {
            if let Some(token) = oracle.advance() {
                index += token.surface.len();
                runs.push(token.clone());
            }
            continue;
        }
        let skipped = &rest[..location.unwrap_or(rest.len())];
        if skipped.chars().any(is_japanese) {
            warn!(line, skipped, "oracle skipped Japanese text");
            unthreaded.push(skipped);
        } else {
            debug!(skipped, "oracle skipped text");
        }
        runs.push(unthreaded_run(skipped));
        index += skipped.len();
    }

    let runs = merge_kana(runs);
    if !unthreaded.is_empty() {
        return Err(TokenizeError::OracleMismatch {
            line: line.to_string(),
            rest: unthreaded.join(" "),
            partial: runs,
        });
    }
    Ok(runs)
}

/// Merge consecutive kana runs so that e.g. "っ" + "て" form one anchor.
fn merge_kana(runs: Vec<Token>) -> Vec<Token> {
    let mut merged: Vec<Token> = Vec::with_capacity(runs.len());
    for run in runs {
        if run.kind != TokenKind::Kana {
            merged.push(run);
            continue;
        }
        if let Some(prev) = merged.last_mut().filter(|p| p.kind == TokenKind::Kana) {
            prev.surface.push_str(&run.surface);
            prev.reading = prev.surface.clone();
            continue;
        }
        merged.push(Token::kana(run.surface));
    }
    merged
}
