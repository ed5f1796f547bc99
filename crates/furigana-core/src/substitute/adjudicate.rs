use tracing::info;

use super::log::{ConversionLog, ConversionRecord};
use crate::dict::PronunciationDictionary;
use crate::token::Token;

/// Decides which dictionary-unconfirmed corrections to revert.
pub trait Adjudicator {
    /// Pick one of `options` to revert, or `None` to keep the rest.
    fn propose(&mut self, options: &[ConversionRecord]) -> Option<usize>;
}

/// Keeps every correction.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl Adjudicator for AcceptAll {
    fn propose(&mut self, _options: &[ConversionRecord]) -> Option<usize> {
        None
    }
}

/// Offer the used corrections the dictionary does not confirm for removal,
/// and return `words` with every removed correction reverted to the oracle's
/// reading. Removals are appended to `log.removed`.
pub fn filter_invalid_conversions(
    words: &[Token],
    dict: &dyn PronunciationDictionary,
    adjudicator: &mut dyn Adjudicator,
    log: &mut ConversionLog,
) -> Vec<Token> {
    let mut invalid: Vec<ConversionRecord> = Vec::new();
    for record in &log.used {
        if !dict.is_known_reading(&record.after.surface, &record.after.reading)
            && !invalid.contains(record)
        {
            invalid.push(record.clone());
        }
    }

    let mut removed = Vec::new();
    while !invalid.is_empty() {
        match adjudicator.propose(&invalid) {
            Some(i) if i < invalid.len() => removed.push(invalid.remove(i)),
            _ => break,
        }
    }

    let mut words = words.to_vec();
    for record in &removed {
        info!(%record, "reverting correction");
        for word in words.iter_mut().filter(|w| **w == record.after) {
            *word = record.before.clone();
        }
    }
    log.removed.extend(removed);
    words
}
