use std::path::Path;

use furigana_core::align::align_line;
use furigana_core::oracle::{query_text, FuriganaOracle, StaticOracle};
use furigana_core::romaji::normalize_romaji;
use furigana_core::token::{Token, TokenKind};
use furigana_core::tokenizer::{strip_special_characters, tokenize_line, OracleCursor};
use unicode_width::UnicodeWidthStr;

use super::EngineOptions;

fn kind_label(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Kana => "kana",
        TokenKind::Kanji => "kanji",
        TokenKind::Other => "other",
    }
}

fn pad(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    format!("{s}{}", " ".repeat(width.saturating_sub(w)))
}

/// Render runs as aligned columns: surface, kind, reading, romaji.
pub fn format_runs(runs: &[Token]) -> String {
    let surface_w = runs
        .iter()
        .map(|t| UnicodeWidthStr::width(t.surface.as_str()))
        .max()
        .unwrap_or(0);
    let reading_w = runs
        .iter()
        .map(|t| UnicodeWidthStr::width(t.reading.as_str()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for t in runs {
        let line = format!(
            "{}  {:<5}  {}  {}",
            pad(&t.surface, surface_w),
            kind_label(t.kind),
            pad(&t.reading, reading_w),
            t.romaji.join(",")
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Tokenize one lyric line against oracle output and align it with its
/// romaji transcription.
pub fn align(oracle_file: &str, romaji: &str, line: &str, opts: &EngineOptions, json: bool) {
    opts.install_syllables();
    let settings = opts.load_settings();
    let dict = opts.load_dictionary();
    let oracle = die!(
        StaticOracle::open(Path::new(oracle_file)),
        "Error opening oracle output: {}"
    );

    let line = strip_special_characters(line);
    let tokens = die!(oracle.furigana(&query_text(&line)), "Error: {}");
    let mut cursor = OracleCursor::new(&tokens);
    let runs = die!(tokenize_line(&line, &mut cursor), "Error: {}");
    let aligned = die!(
        align_line(&runs, &normalize_romaji(romaji), dict.as_ref(), &settings.alignment),
        "Error: {}"
    );

    if json {
        let out = die!(serde_json::to_string_pretty(&aligned), "Error: {}");
        println!("{out}");
        return;
    }
    print!("{}", format_runs(&aligned));
}
