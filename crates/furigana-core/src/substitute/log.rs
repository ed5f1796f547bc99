use std::collections::BTreeSet;
use std::fmt;

use crate::dict::PronunciationDictionary;
use crate::token::Token;

#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("kanji count differs within a line: {before} proposed, {after} aligned")]
    KanjiCountMismatch { before: usize, after: usize },
}

/// An oracle-proposed token paired with the token alignment chose instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversionRecord {
    pub before: Token,
    pub after: Token,
}

impl fmt::Display for ConversionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} => {}",
            self.before.surface, self.before.reading, self.after.reading
        )
    }
}

/// Audit trail of one page's conversion.
#[derive(Debug, Default, Clone)]
pub struct ConversionLog {
    /// Every reading alignment changed.
    pub corrections: Vec<ConversionRecord>,
    /// Corrections that ended up in the substituted text.
    pub used: Vec<ConversionRecord>,
    /// Corrections reverted by adjudication.
    pub removed: Vec<ConversionRecord>,
    /// Tokens consumed by substitution, in text order.
    pub all_words: Vec<Token>,
    /// Kanji left unannotated because the reference lyrics lack them.
    pub ignored_kanji: BTreeSet<char>,
}

impl ConversionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the kanji whose reading changed between the oracle's runs and
    /// the aligned runs of the same line.
    pub fn record_diff(&mut self, before: &[Token], after: &[Token]) -> Result<(), DiffError> {
        let before: Vec<&Token> = before.iter().filter(|t| t.is_kanji()).collect();
        let after: Vec<&Token> = after.iter().filter(|t| t.is_kanji()).collect();
        if before.len() != after.len() {
            return Err(DiffError::KanjiCountMismatch {
                before: before.len(),
                after: after.len(),
            });
        }
        for (b, a) in before.into_iter().zip(after) {
            if b.surface == a.surface && b.reading != a.reading {
                self.corrections.push(ConversionRecord {
                    before: b.clone(),
                    after: a.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn word_used(&mut self, token: &Token) {
        self.all_words.push(token.clone());
        let correction = self
            .corrections
            .iter()
            .find(|r| r.after.surface == token.surface && r.after.reading == token.reading);
        if let Some(record) = correction {
            self.used.push(record.clone());
        }
    }

    /// Audit entries: `surface:old=>new` per distinct used correction the
    /// dictionary does not confirm, `surface:old≠>new` per removal, and
    /// `surface:?` per kanji that went out without a reading.
    pub fn summary_entries(&self, dict: &dyn PronunciationDictionary) -> Vec<String> {
        let mut entries: Vec<String> = Vec::new();
        let mut push = |entry: String| {
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        };

        for r in &self.used {
            if !dict.is_known_reading(&r.after.surface, &r.after.reading) {
                push(format!("{}:{}=>{}", r.before.surface, r.before.reading, r.after.reading));
            }
        }
        for r in &self.removed {
            push(format!("{}:{}≠>{}", r.before.surface, r.before.reading, r.after.reading));
        }
        for t in self.all_words.iter().filter(|t| t.is_kanji() && t.reading.is_empty()) {
            push(format!("{}:?", t.surface));
        }
        for c in &self.ignored_kanji {
            push(format!("{c}:?"));
        }
        entries
    }

    pub fn summary(&self, dict: &dyn PronunciationDictionary) -> String {
        self.summary_entries(dict).join(";")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::{EmptyDictionary, MapDictionary};

    fn line(readings: &[(&str, &str)]) -> Vec<Token> {
        let mut tokens = Vec::new();
        for (surface, reading) in readings {
            tokens.push(Token::kanji(*surface, *reading));
            tokens.push(Token::kana("の"));
        }
        tokens
    }

    #[test]
    fn record_diff_keeps_changed_readings() {
        let mut log = ConversionLog::new();
        let before = line(&[("人", "じん"), ("夏", "なつ")]);
        let after = line(&[("人", "ひと"), ("夏", "なつ")]);
        log.record_diff(&before, &after).unwrap();
        assert_eq!(log.corrections.len(), 1);
        assert_eq!(log.corrections[0].to_string(), "人: じん => ひと");
    }

    #[test]
    fn record_diff_rejects_count_mismatch() {
        let mut log = ConversionLog::new();
        let err = log
            .record_diff(&line(&[("人", "じん")]), &line(&[]))
            .unwrap_err();
        assert!(matches!(err, DiffError::KanjiCountMismatch { before: 1, after: 0 }));
    }

    #[test]
    fn word_used_links_corrections() {
        let mut log = ConversionLog::new();
        log.record_diff(&line(&[("人", "じん")]), &line(&[("人", "ひと")]))
            .unwrap();
        log.word_used(&Token::kanji("人", "ひと"));
        log.word_used(&Token::kanji("夏", "なつ"));
        assert_eq!(log.all_words.len(), 2);
        assert_eq!(log.used.len(), 1);
    }

    #[test]
    fn summary_is_deduplicated() {
        let mut log = ConversionLog::new();
        log.record_diff(&line(&[("人", "じん")]), &line(&[("人", "ひと")]))
            .unwrap();
        log.word_used(&Token::kanji("人", "ひと"));
        log.word_used(&Token::kanji("人", "ひと"));
        log.word_used(&Token::kanji("千", ""));
        log.removed.push(ConversionRecord {
            before: Token::kanji("空", "そら"),
            after: Token::kanji("空", "から"),
        });
        log.ignored_kanji.insert('華');
        assert_eq!(log.summary(&EmptyDictionary), "人:じん=>ひと;空:そら≠>から;千:?;華:?");
    }

    #[test]
    fn summary_skips_dictionary_confirmed_corrections() {
        let mut log = ConversionLog::new();
        log.record_diff(&line(&[("人", "じん")]), &line(&[("人", "ひと")]))
            .unwrap();
        log.word_used(&Token::kanji("人", "ひと"));
        let mut dict = MapDictionary::new();
        dict.insert("人", "ひと");
        assert!(log.summary_entries(&dict).is_empty());
    }
}
