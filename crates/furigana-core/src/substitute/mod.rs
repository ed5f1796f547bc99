//! Re-injection of resolved readings into the source text.
//!
//! Every kanji outside a `{{…}}` span is replaced by the next token of the
//! resolved stream whose surface matches at that position. Running out of
//! tokens rewinds the stream; too many rewinds means the stream and the text
//! disagree, and the whole substitution fails.

mod adjudicate;
mod log;

pub use adjudicate::{filter_invalid_conversions, AcceptAll, Adjudicator};
pub use log::{ConversionLog, ConversionRecord, DiffError};

use tracing::{debug_span, error};

use crate::dict::PronunciationDictionary;
use crate::scanner::{step_at, Step};
use crate::settings::SubstitutionSettings;
use crate::token::Token;
use crate::unicode::is_kanji;

#[derive(Debug, thiserror::Error)]
pub enum SubstituteError {
    #[error("token stream out of sync with text at byte {position} after {redo_limit} rewinds")]
    Desync { position: usize, redo_limit: usize },
}

/// `{{template|surface|reading}}`.
pub fn annotation(template: &str, surface: &str, reading: &str) -> String {
    format!("{{{{{template}|{surface}|{reading}}}}}")
}

/// Replace each unannotated kanji run in `text` with its annotated form.
///
/// Only kanji tokens of `tokens` take part. A token with an empty reading is
/// written back bare. Kanji in `log.ignored_kanji` are left alone.
pub fn substitute(
    text: &str,
    tokens: &[Token],
    settings: &SubstitutionSettings,
    log: &mut ConversionLog,
) -> Result<String, SubstituteError> {
    let _span = debug_span!("substitute", tokens = tokens.len()).entered();
    let stream: Vec<&Token> = tokens.iter().filter(|t| t.is_kanji()).collect();
    let mut cursor = 0usize;
    let mut redo = 0usize;

    let mut out = String::with_capacity(text.len() * 2);
    let mut depth = 0usize;
    let mut i = 0usize;

    while let Some(step) = step_at(text, i) {
        let c = match step {
            Step::Open => {
                depth += 1;
                out.push_str("{{");
                i += 2;
                continue;
            }
            Step::Close => {
                depth = depth.saturating_sub(1);
                out.push_str("}}");
                i += 2;
                continue;
            }
            Step::Char(c) => c,
        };
        if depth > 0 || !is_kanji(c) || log.ignored_kanji.contains(&c) {
            out.push(c);
            i += c.len_utf8();
            continue;
        }

        let rest = &text[i..];
        let token = loop {
            let Some(&token) = stream.get(cursor) else {
                redo += 1;
                if redo > settings.redo_limit {
                    error!(position = i, "substitution lost sync with the token stream");
                    return Err(SubstituteError::Desync {
                        position: i,
                        redo_limit: settings.redo_limit,
                    });
                }
                cursor = 0;
                continue;
            };
            cursor += 1;
            if !token.surface.is_empty() && rest.starts_with(token.surface.as_str()) {
                break token;
            }
        };

        log.word_used(token);
        if token.reading.is_empty() {
            out.push_str(&token.surface);
        } else {
            out.push_str(&annotation(
                &settings.annotation_template,
                &token.surface,
                &token.reading,
            ));
        }
        i += token.surface.len();
    }
    Ok(out)
}

/// Two-pass substitution with adjudication in between: the first pass
/// records which tokens are used, the adjudicator may revert corrections the
/// dictionary does not confirm, and the second pass produces the text.
pub fn annotate_lyrics(
    text: &str,
    tokens: &[Token],
    settings: &SubstitutionSettings,
    dict: &dyn PronunciationDictionary,
    adjudicator: &mut dyn Adjudicator,
    log: &mut ConversionLog,
) -> Result<String, SubstituteError> {
    substitute(text, tokens, settings, log)?;
    let words = std::mem::take(&mut log.all_words);
    let words = filter_invalid_conversions(&words, dict, adjudicator, log);
    log.used.clear();
    substitute(text, &words, settings, log)
}
