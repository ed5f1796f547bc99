use std::fs;
use std::io;
use std::path::Path;

use furigana_core::oracle::StaticOracle;
use furigana_core::pipeline::FuriganaEngine;
use furigana_core::substitute::{AcceptAll, Adjudicator, ConversionLog};
use furigana_core::wikitext::{extract_lyrics_template, extract_original_lyrics, split_heading};

use super::EngineOptions;
use crate::prompt::PromptAdjudicator;

pub struct AnnotateInput<'a> {
    pub oracle_file: &'a str,
    pub romaji_file: &'a str,
    pub text_file: &'a str,
    /// Plain lyrics the romaji transcribes; defaults to the text itself
    /// (or, for a page, its original lyrics).
    pub reference_file: Option<&'a str>,
    pub page: bool,
    pub interactive: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("error reading {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{0} has no lyrics template with an original argument")]
    NoLyrics(String),
}

fn read(path: &str) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_string(),
        source,
    })
}

/// The original lyrics of a page, without heading lines.
fn page_lyrics(page: &str) -> Option<&str> {
    let template = extract_lyrics_template(page)?;
    let original = extract_original_lyrics(page, template)?;
    Some(split_heading(&page[original]).1)
}

/// The text to annotate, and the reference lyrics the romaji transcribes.
pub fn load_texts(input: &AnnotateInput<'_>) -> Result<(String, String, String), InputError> {
    let text = read(input.text_file)?;
    let romaji = read(input.romaji_file)?;
    let reference = match input.reference_file {
        Some(file) => read(file)?,
        None if input.page => page_lyrics(&text)
            .map(str::to_string)
            .ok_or_else(|| InputError::NoLyrics(input.text_file.to_string()))?,
        None => text.clone(),
    };
    Ok((text, romaji, reference))
}

pub fn annotate(input: &AnnotateInput<'_>, opts: &EngineOptions) {
    opts.install_syllables();
    let settings = opts.load_settings();
    let dict = opts.load_dictionary();
    let oracle = die!(
        StaticOracle::open(Path::new(input.oracle_file)),
        "Error opening oracle output: {}"
    );
    let (text, romaji, reference) = die!(load_texts(input), "Error: {}");

    let mut accept = AcceptAll;
    let mut prompt;
    let adjudicator: &mut dyn Adjudicator = if input.interactive {
        prompt = PromptAdjudicator::stdin();
        &mut prompt
    } else {
        &mut accept
    };

    let engine = FuriganaEngine::new(&oracle, dict.as_ref(), &settings);
    let mut log = ConversionLog::new();
    let result = if input.page {
        engine.annotate_page(&text, &reference, &romaji, adjudicator, &mut log)
    } else {
        engine.annotate_text(&text, &reference, &romaji, adjudicator, &mut log)
    };
    let annotated = die!(result, "Error: {}");

    print!("{annotated}");
    if !annotated.ends_with('\n') {
        println!();
    }
    let summary = log.summary(dict.as_ref());
    if !summary.is_empty() {
        eprintln!("Summary: {summary}");
    }
}
