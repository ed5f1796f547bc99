//! Alignment of a line's runs against its transcribed romaji.
//!
//! Kana runs are trusted: their romanizations are computed and located in
//! the romaji string as anchors. The text between two anchors is explained
//! by the kanji/other runs between them, and every such explanation is
//! scored. The highest-scoring explanation over all anchor placements gives
//! the line's readings.

mod anchors;
mod matcher;

pub use anchors::{find_all_matches_in_string, AnchorMatches};

use tracing::{debug, debug_span};

use crate::dict::PronunciationDictionary;
use crate::romaji::kana_to_romaji;
use crate::settings::AlignmentSettings;
use crate::token::{Token, TokenKind};
use matcher::GapMatcher;

#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    #[error("line {line:?} cannot be matched with {romaji:?}")]
    NoAlignment { line: String, romaji: String },
}

/// One complete explanation of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentCandidate {
    pub score: i64,
    pub tokens: Vec<Token>,
}

/// Odometer over one choice per position, first position slowest.
#[derive(Debug, Clone)]
pub struct Combinations {
    sizes: Vec<usize>,
    current: Option<Vec<usize>>,
}

impl Combinations {
    pub fn new(sizes: Vec<usize>) -> Self {
        let current = (!sizes.contains(&0)).then(|| vec![0; sizes.len()]);
        Self { sizes, current }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.current.take()?;
        let mut next = current.clone();
        for i in (0..next.len()).rev() {
            next[i] += 1;
            if next[i] < self.sizes[i] {
                self.current = Some(next);
                break;
            }
            next[i] = 0;
        }
        Some(current)
    }
}

/// Romaji candidates for each run: computed for kana, derived from the
/// proposed reading for kanji, and the lowercased surface for other runs.
fn with_candidates(runs: &[Token]) -> Vec<Token> {
    runs.iter()
        .map(|run| {
            let romaji = match run.kind {
                TokenKind::Kana => kana_to_romaji(&run.surface),
                TokenKind::Kanji => kana_to_romaji(&run.reading)
                    .into_iter()
                    .filter(|r| !r.is_empty())
                    .collect(),
                TokenKind::Other => vec![run.surface.to_lowercase()],
            };
            run.clone().with_romaji(romaji)
        })
        .collect()
}

/// The search state for one line.
pub struct LineSearch<'a> {
    runs: Vec<Token>,
    kana: Vec<usize>,
    romaji: &'a str,
    matcher: GapMatcher<'a>,
    settings: &'a AlignmentSettings,
}

impl<'a> LineSearch<'a> {
    pub fn new(
        runs: &[Token],
        romaji: &'a str,
        dict: &'a dyn PronunciationDictionary,
        settings: &'a AlignmentSettings,
    ) -> Self {
        let mut runs = with_candidates(runs);
        // A kana romanization absent from the romaji can never be placed.
        for run in runs.iter_mut().filter(|r| r.is_kana()) {
            run.romaji.retain(|r| romaji.contains(r.as_str()));
        }
        let kana = runs
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_kana())
            .map(|(i, _)| i)
            .collect();
        Self {
            runs,
            kana,
            romaji,
            matcher: GapMatcher::new(dict, settings),
            settings,
        }
    }

    /// Every fully resolved candidate, lazily, in generation order.
    pub fn candidates(&self) -> impl Iterator<Item = AlignmentCandidate> + '_ {
        let sizes: Vec<usize> = self.kana.iter().map(|&i| self.runs[i].romaji.len()).collect();
        let total = sizes
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
            .unwrap_or(usize::MAX);
        let max_sets = self.settings.max_anchor_sets;
        if total > max_sets {
            debug!(total, max_sets, "romanization combinations truncated");
        }
        let per_anchor_set = self.settings.max_candidates;
        Combinations::new(sizes)
            .take(max_sets)
            .flat_map(move |choice| {
                let needles: Vec<&str> = self
                    .kana
                    .iter()
                    .zip(&choice)
                    .map(|(&i, &c)| self.runs[i].romaji[c].as_str())
                    .collect();
                AnchorMatches::new(self.romaji, needles)
                    .take(per_anchor_set)
                    .filter_map(move |positions| self.evaluate(&choice, &positions))
            })
    }

    /// Score one anchor placement; `None` if some gap cannot be explained.
    fn evaluate(&self, choice: &[usize], positions: &[usize]) -> Option<AlignmentCandidate> {
        let mut score = 0;
        let mut tokens = Vec::with_capacity(self.runs.len());
        let mut next_run = 0;
        let mut offset = 0;

        for ((&k, &c), &position) in self.kana.iter().zip(choice).zip(positions) {
            if next_run < k {
                let (s, t) = self
                    .matcher
                    .match_gap(&self.runs[next_run..k], &self.romaji[offset..position])?;
                score += s;
                tokens.extend(t);
            }
            let anchor = &self.runs[k];
            let needle = &anchor.romaji[c];
            tokens.push(anchor.resolved(needle.clone(), anchor.reading.clone()));
            offset = position + needle.len();
            next_run = k + 1;
        }
        if next_run < self.runs.len() {
            let (s, t) = self
                .matcher
                .match_gap(&self.runs[next_run..], &self.romaji[offset..])?;
            score += s;
            tokens.extend(t);
        }
        debug!(score, ?positions, "alignment candidate");
        Some(AlignmentCandidate { score, tokens })
    }

    /// The first candidate with the maximum score.
    pub fn best(&self) -> Option<AlignmentCandidate> {
        self.candidates().fold(None, |best, candidate| match best {
            Some(b) if b.score >= candidate.score => Some(b),
            _ => Some(candidate),
        })
    }
}

/// Resolve a reading for every non-kana run of `runs` from `romaji`.
///
/// A line with no romaji or with nothing but kana is returned unchanged.
pub fn align_line(
    runs: &[Token],
    romaji: &str,
    dict: &dyn PronunciationDictionary,
    settings: &AlignmentSettings,
) -> Result<Vec<Token>, AlignError> {
    let line: String = runs.iter().map(|r| r.surface.as_str()).collect();
    let _span = debug_span!("align_line", line = %line, romaji).entered();

    if romaji.is_empty() || runs.iter().all(Token::is_kana) {
        return Ok(runs.to_vec());
    }
    let search = LineSearch::new(runs, romaji, dict, settings);
    match search.best() {
        Some(best) => {
            debug!(score = best.score, "alignment resolved");
            Ok(best.tokens)
        }
        None => Err(AlignError::NoAlignment {
            line,
            romaji: romaji.to_string(),
        }),
    }
}
