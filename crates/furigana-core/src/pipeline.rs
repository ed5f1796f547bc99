//! Page-level conversion: oracle → tokenizer → alignment → substitution.

use tracing::{debug, debug_span, info, warn};

use crate::align::{align_line, AlignError};
use crate::dict::PronunciationDictionary;
use crate::lyrics::{is_fully_annotated, is_japanese_lyrics, lyrics_match};
use crate::oracle::{query_text, FuriganaOracle, OracleError};
use crate::romaji::normalize_romaji;
use crate::settings::Settings;
use crate::substitute::{annotate_lyrics, Adjudicator, ConversionLog, DiffError, SubstituteError};
use crate::token::Token;
use crate::tokenizer::{strip_special_characters, tokenize_line, OracleCursor, TokenizeError};
use crate::wikitext::{
    contains_template, extract_lyrics_template, extract_original_lyrics, split_heading,
};

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error(transparent)]
    Align(#[from] AlignError),

    #[error(transparent)]
    Substitute(#[from] SubstituteError),

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("oracle returned no tokens")]
    NoOracleOutput,

    #[error("{lyrics} lyric lines but {romaji} romaji lines")]
    LineCountMismatch { lyrics: usize, romaji: usize },

    #[error("lyrics are not Japanese")]
    NotJapanese,

    #[error("lyrics are already annotated")]
    AlreadyAnnotated,

    #[error("page has no lyrics template with an original argument")]
    MissingLyrics,

    #[error("reference lyrics do not match the page lyrics")]
    LyricsMismatch,
}

/// Name of the template invoked by a marker such as `{{Name|arg}}`.
fn template_name(marker: &str) -> &str {
    let inner = marker.trim().trim_start_matches("{{");
    let end = inner.find(['|', '}']).unwrap_or(inner.len());
    inner[..end].trim()
}

/// The engine's external collaborators and settings for one run.
pub struct FuriganaEngine<'a> {
    oracle: &'a dyn FuriganaOracle,
    dict: &'a dyn PronunciationDictionary,
    settings: &'a Settings,
}

impl<'a> FuriganaEngine<'a> {
    pub fn new(
        oracle: &'a dyn FuriganaOracle,
        dict: &'a dyn PronunciationDictionary,
        settings: &'a Settings,
    ) -> Self {
        Self {
            oracle,
            dict,
            settings,
        }
    }

    /// Resolve the reading of every run of `lyrics`, line by line, against
    /// the parallel `romaji` lines.
    ///
    /// A line that cannot be tokenized or aligned fails the whole call when
    /// `line_strict` is set; otherwise the oracle's tokens for it are kept.
    pub fn resolve_lines(
        &self,
        lyrics: &[&str],
        romaji: &[&str],
        log: &mut ConversionLog,
    ) -> Result<Vec<Token>, ConvertError> {
        let _span = debug_span!("convert_lines", lines = lyrics.len()).entered();
        if lyrics.len() != romaji.len() {
            return Err(ConvertError::LineCountMismatch {
                lyrics: lyrics.len(),
                romaji: romaji.len(),
            });
        }
        let strict = self.settings.alignment.line_strict;
        let lines: Vec<String> = lyrics.iter().map(|l| strip_special_characters(l)).collect();

        // One query for the whole page.
        let proposed = self.oracle.furigana(&query_text(&lines.join("\n")))?;
        if proposed.is_empty() {
            return Err(ConvertError::NoOracleOutput);
        }
        let mut cursor = OracleCursor::new(&proposed);
        let mut result = Vec::new();

        for (line, romaji_line) in lines.iter().zip(romaji) {
            let romaji_line = normalize_romaji(romaji_line);
            let runs = match tokenize_line(line, &mut cursor) {
                Ok(runs) => runs,
                Err(e) => {
                    warn!(line = %line, error = %e, "line does not match the oracle output");
                    if strict {
                        return Err(e.into());
                    }
                    let TokenizeError::OracleMismatch { partial, .. } = e;
                    result.extend(partial);
                    continue;
                }
            };
            let aligned = match align_line(&runs, &romaji_line, self.dict, &self.settings.alignment)
            {
                Ok(aligned) => aligned,
                Err(e) => {
                    warn!(line = %line, romaji = %romaji_line, "line cannot be matched");
                    if strict {
                        return Err(e.into());
                    }
                    runs.clone()
                }
            };
            log.record_diff(&runs, &aligned)?;
            result.extend(aligned);
        }
        debug!(tokens = result.len(), corrections = log.corrections.len(), "lines resolved");
        Ok(result)
    }

    /// Annotate the kanji of `target` with readings resolved from the
    /// `reference` lyrics and their `romaji` transcription.
    pub fn annotate_text(
        &self,
        target: &str,
        reference: &str,
        romaji: &str,
        adjudicator: &mut dyn Adjudicator,
        log: &mut ConversionLog,
    ) -> Result<String, ConvertError> {
        let reference_lines: Vec<&str> = reference.lines().collect();
        let romaji_lines: Vec<&str> = romaji.lines().collect();
        let tokens = self.resolve_lines(&reference_lines, &romaji_lines, log)?;
        let kanji: Vec<Token> = tokens.into_iter().filter(Token::is_kanji).collect();
        let annotated = annotate_lyrics(
            target,
            &kanji,
            &self.settings.substitution,
            self.dict,
            adjudicator,
            log,
        )?;
        Ok(annotated)
    }

    /// Annotate the original lyrics of a wiki page in place and add the
    /// furigana toggle marker if the page has none.
    pub fn annotate_page(
        &self,
        page: &str,
        reference: &str,
        romaji: &str,
        adjudicator: &mut dyn Adjudicator,
        log: &mut ConversionLog,
    ) -> Result<String, ConvertError> {
        let template = extract_lyrics_template(page).ok_or(ConvertError::MissingLyrics)?;
        let original =
            extract_original_lyrics(page, template.clone()).ok_or(ConvertError::MissingLyrics)?;
        let (heading, lyrics) = split_heading(&page[original.clone()]);

        if !is_japanese_lyrics(lyrics) {
            return Err(ConvertError::NotJapanese);
        }
        let lyric_settings = &self.settings.lyrics;
        if is_fully_annotated(lyrics, lyric_settings.min_untranslated_ratio) {
            return Err(ConvertError::AlreadyAnnotated);
        }
        if !lyrics_match(lyrics, reference, log, lyric_settings.max_kanji_mismatch_ratio) {
            return Err(ConvertError::LyricsMismatch);
        }

        let annotated = self.annotate_text(lyrics, reference, romaji, adjudicator, log)?;
        let trailing = &lyrics[lyrics.trim_end().len()..];

        let marker = self.settings.substitution.toggle_marker.trim();
        let needs_marker = !marker.is_empty() && !contains_template(page, template_name(marker));

        let mut out = String::with_capacity(page.len() + annotated.len());
        out.push_str(&page[..template.start]);
        if needs_marker {
            info!(marker, "adding furigana toggle");
            out.push_str(marker);
            out.push('\n');
        }
        out.push_str(&page[template.start..original.start]);
        out.push_str(heading.trim_start());
        out.push_str(annotated.trim_end());
        out.push_str(trailing);
        out.push_str(&page[original.end..]);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::{EmptyDictionary, MapDictionary};
    use crate::oracle::StaticOracle;
    use crate::substitute::AcceptAll;

    fn oracle() -> StaticOracle {
        StaticOracle::new(vec![
            Token::kanji("自分", "じぶん"),
            Token::kana("より"),
            Token::kanji("下手", "へた"),
            Token::kana("くそな"),
            Token::kanji("人", "じん"),
            Token::kanji("夏", "なつ"),
            Token::kana("の"),
            Token::kanji("空", "そら"),
        ])
    }

    const LYRICS: &str = "自分より下手くそな人\n夏の空";
    const ROMAJI: &str = "Jibun yori hetakuso na hito\nNatsu no sora";

    #[test]
    fn resolve_lines_corrects_and_logs() {
        let settings = Settings::default();
        let oracle = oracle();
        let engine = FuriganaEngine::new(&oracle, &EmptyDictionary, &settings);
        let mut log = ConversionLog::new();
        let lines: Vec<&str> = LYRICS.lines().collect();
        let romaji: Vec<&str> = ROMAJI.lines().collect();
        let tokens = engine.resolve_lines(&lines, &romaji, &mut log).unwrap();

        let person = tokens.iter().find(|t| t.surface == "人").unwrap();
        assert_eq!(person.reading, "ひと");
        assert_eq!(log.corrections.len(), 1);
        assert_eq!(log.corrections[0].before.reading, "じん");
    }

    #[test]
    fn line_count_must_match() {
        let settings = Settings::default();
        let oracle = oracle();
        let engine = FuriganaEngine::new(&oracle, &EmptyDictionary, &settings);
        let err = engine
            .resolve_lines(&["夏の空"], &[], &mut ConversionLog::new())
            .unwrap_err();
        assert!(matches!(err, ConvertError::LineCountMismatch { lyrics: 1, romaji: 0 }));
    }

    #[test]
    fn empty_oracle_output_fails() {
        let settings = Settings::default();
        let oracle = StaticOracle::default();
        let engine = FuriganaEngine::new(&oracle, &EmptyDictionary, &settings);
        let err = engine
            .resolve_lines(&["夏"], &["natsu"], &mut ConversionLog::new())
            .unwrap_err();
        assert!(matches!(err, ConvertError::NoOracleOutput));
    }

    #[test]
    fn strictness_decides_unmatched_lines() {
        let oracle = StaticOracle::new(vec![Token::kanji("人", "ひと"), Token::kana("が")]);
        let mut settings = Settings::default();
        let engine = FuriganaEngine::new(&oracle, &EmptyDictionary, &settings);
        let tokens = engine
            .resolve_lines(&["人が"], &["xyzga"], &mut ConversionLog::new())
            .unwrap();
        assert_eq!(tokens[0], Token::kanji("人", "ひと"));

        settings.alignment.line_strict = true;
        let engine = FuriganaEngine::new(&oracle, &EmptyDictionary, &settings);
        let err = engine
            .resolve_lines(&["人が"], &["xyzga"], &mut ConversionLog::new())
            .unwrap_err();
        assert!(matches!(err, ConvertError::Align(_)));
    }

    #[test]
    fn non_strict_keeps_oracle_tokens_of_mismatched_lines() {
        let oracle = StaticOracle::new(vec![Token::kana("ねえ"), Token::kanji("夏", "なつ")]);
        let settings = Settings::default();
        let engine = FuriganaEngine::new(&oracle, &EmptyDictionary, &settings);
        let tokens = engine
            .resolve_lines(&["ねえ君"], &["neekimi"], &mut ConversionLog::new())
            .unwrap();
        assert_eq!(tokens, vec![Token::kana("ねえ"), Token::kanji("君", "")]);
    }

    #[test]
    fn unthreaded_japanese_follows_line_policy() {
        let oracle = StaticOracle::new(vec![
            Token::kanji("好", "す"),
            Token::kana("き"),
            Token::kanji("夏", "なつ"),
        ]);
        let lyrics = "君が好き\n夏";
        let romaji = "kimi ga suki\nnatsu";
        let mut settings = Settings::default();
        let engine = FuriganaEngine::new(&oracle, &EmptyDictionary, &settings);
        let mut log = ConversionLog::new();
        let out = engine
            .annotate_text(lyrics, lyrics, romaji, &mut AcceptAll, &mut log)
            .unwrap();
        assert_eq!(out, "君が{{photrans|好|す}}き\n{{photrans|夏|なつ}}");
        assert_eq!(log.summary(&EmptyDictionary), "君が:?");

        settings.alignment.line_strict = true;
        let engine = FuriganaEngine::new(&oracle, &EmptyDictionary, &settings);
        let err = engine
            .annotate_text(lyrics, lyrics, romaji, &mut AcceptAll, &mut ConversionLog::new())
            .unwrap_err();
        assert!(matches!(err, ConvertError::Tokenize(_)));
    }

    #[test]
    fn annotate_text_end_to_end() {
        let settings = Settings::default();
        let oracle = oracle();
        let mut dict = MapDictionary::new();
        dict.insert("人", "ひと");
        let engine = FuriganaEngine::new(&oracle, &dict, &settings);
        let mut log = ConversionLog::new();
        let out = engine
            .annotate_text(LYRICS, LYRICS, ROMAJI, &mut AcceptAll, &mut log)
            .unwrap();
        assert_eq!(
            out,
            "{{photrans|自分|じぶん}}より{{photrans|下手|へた}}くそな{{photrans|人|ひと}}\n\
             {{photrans|夏|なつ}}の{{photrans|空|そら}}"
        );
        // Confirmed by the dictionary, so not worth an audit entry.
        assert_eq!(log.summary(&dict), "");
    }

    const PAGE: &str = "\
{{VOCALOID_Songbox}}
{{LyricsKai
|original='''雨き声残響'''
自分より下手くそな人
夏の空
|translation=找寻比自己更加拙劣的人
}}";

    #[test]
    fn annotate_page_splices_lyrics_and_adds_marker() {
        let settings = Settings::default();
        let oracle = oracle();
        let engine = FuriganaEngine::new(&oracle, &EmptyDictionary, &settings);
        let mut log = ConversionLog::new();
        let out = engine
            .annotate_page(PAGE, LYRICS, ROMAJI, &mut AcceptAll, &mut log)
            .unwrap();
        let expected = "\
{{VOCALOID_Songbox}}
{{Photrans/button|float=1}}
{{LyricsKai
|original='''雨き声残響'''
{{photrans|自分|じぶん}}より{{photrans|下手|へた}}くそな{{photrans|人|ひと}}
{{photrans|夏|なつ}}の{{photrans|空|そら}}
|translation=找寻比自己更加拙劣的人
}}";
        assert_eq!(out, expected);
        assert_eq!(log.summary(&EmptyDictionary), "人:じん=>ひと");
    }

    #[test]
    fn annotate_page_keeps_an_existing_marker() {
        let settings = Settings::default();
        let oracle = oracle();
        let engine = FuriganaEngine::new(&oracle, &EmptyDictionary, &settings);
        let page = format!("{{{{photrans/button}}}}\n{PAGE}");
        let out = engine
            .annotate_page(&page, LYRICS, ROMAJI, &mut AcceptAll, &mut ConversionLog::new())
            .unwrap();
        assert_eq!(out.matches("utton").count(), 1);
    }

    #[test]
    fn annotate_page_rejections() {
        let settings = Settings::default();
        let oracle = oracle();
        let engine = FuriganaEngine::new(&oracle, &EmptyDictionary, &settings);
        let mut log = ConversionLog::new();

        let err = engine
            .annotate_page("no template", LYRICS, ROMAJI, &mut AcceptAll, &mut log)
            .unwrap_err();
        assert!(matches!(err, ConvertError::MissingLyrics));

        let err = engine
            .annotate_page("{{LyricsKai|original=わたし}}", LYRICS, ROMAJI, &mut AcceptAll, &mut log)
            .unwrap_err();
        assert!(matches!(err, ConvertError::NotJapanese));

        let done = "{{LyricsKai|original={{photrans|夏|なつ}}の{{photrans|空|そら}}}}";
        let err = engine
            .annotate_page(done, LYRICS, ROMAJI, &mut AcceptAll, &mut log)
            .unwrap_err();
        assert!(matches!(err, ConvertError::AlreadyAnnotated));

        let other = "{{LyricsKai|original=冬の海}}";
        let err = engine
            .annotate_page(other, LYRICS, ROMAJI, &mut AcceptAll, &mut log)
            .unwrap_err();
        assert!(matches!(err, ConvertError::LyricsMismatch));
    }

    #[test]
    fn marker_template_name() {
        assert_eq!(template_name("{{Photrans/button|float=1}}"), "Photrans/button");
        assert_eq!(template_name("{{Toggle}}"), "Toggle");
    }
}
