//! The furigana oracle: an external service that segments Japanese text and
//! proposes readings for its kanji runs.
//!
//! The engine only consumes the [`FuriganaOracle`] trait. Responses in the
//! furigana JSON-RPC shape (`result.word[].subword[]`) are parsed by
//! [`OracleResponse::from_json`]; fetching them is left to the caller.

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::token::Token;
use crate::unicode::{is_japanese, is_kanji};

#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed oracle response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("oracle returned no result: {0}")]
    NoResult(String),
}

pub trait FuriganaOracle {
    /// Segment `text` into kana and kanji runs, in text order.
    fn furigana(&self, text: &str) -> Result<Vec<Token>, OracleError>;
}

/// Reduce text to what the oracle is sent: Japanese characters, spaces and
/// line breaks.
pub fn query_text(text: &str) -> String {
    text.chars()
        .filter(|&c| is_japanese(c) || matches!(c, '\n' | ' ' | '\u{3000}'))
        .collect()
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<RpcResult>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RpcResult {
    #[serde(default)]
    word: Vec<RpcWord>,
}

#[derive(Debug, Deserialize)]
struct RpcWord {
    surface: String,
    furigana: Option<String>,
    #[serde(default)]
    subword: Vec<RpcWord>,
}

/// Typed tokens parsed from one oracle response.
#[derive(Debug, Clone, Default)]
pub struct OracleResponse {
    pub tokens: Vec<Token>,
}

impl OracleResponse {
    pub fn from_json(json: &str) -> Result<Self, OracleError> {
        let response: RpcResponse = serde_json::from_str(json)?;
        let Some(result) = response.result else {
            let detail = response
                .error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "missing \"result\"".to_string());
            return Err(OracleError::NoResult(detail));
        };

        let mut tokens = Vec::new();
        for word in result.word {
            if word.subword.is_empty() {
                push_word(&mut tokens, word);
            } else {
                for sub in word.subword {
                    push_word(&mut tokens, sub);
                }
            }
        }
        Ok(Self { tokens })
    }
}

fn push_word(tokens: &mut Vec<Token>, word: RpcWord) {
    let surface = word.surface.trim();
    if surface.is_empty() {
        return;
    }
    if !surface.starts_with(is_kanji) {
        tokens.push(Token::kana(surface));
        return;
    }
    let reading = word.furigana.unwrap_or_else(|| {
        warn!(surface, "oracle gave no reading for kanji run");
        String::new()
    });
    tokens.push(Token::kanji(surface, reading));
}

/// Serves a fixed, pre-fetched token list regardless of the query.
#[derive(Debug, Clone, Default)]
pub struct StaticOracle {
    tokens: Vec<Token>,
}

impl StaticOracle {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn from_json(json: &str) -> Result<Self, OracleError> {
        Ok(Self::new(OracleResponse::from_json(json)?.tokens))
    }

    pub fn open(path: &Path) -> Result<Self, OracleError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

impl FuriganaOracle for StaticOracle {
    fn furigana(&self, _text: &str) -> Result<Vec<Token>, OracleError> {
        Ok(self.tokens.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    const RESPONSE: &str = r#"{
        "id": "1234-1",
        "jsonrpc": "2.0",
        "result": {
            "word": [
                {"surface": "自分", "furigana": "じぶん", "roman": "jibun"},
                {"surface": "より"},
                {"surface": "下手くそ", "furigana": "へたくそ", "subword": [
                    {"surface": "下手", "furigana": "へた"},
                    {"surface": "くそ", "furigana": "くそ"}
                ]},
                {"surface": "な"},
                {"surface": "\n"},
                {"surface": "千"}
            ]
        }
    }"#;

    #[test]
    fn parses_words_and_subwords() {
        let response = OracleResponse::from_json(RESPONSE).unwrap();
        let surfaces: Vec<&str> = response.tokens.iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["自分", "より", "下手", "くそ", "な", "千"]);
        assert_eq!(response.tokens[0], Token::kanji("自分", "じぶん"));
        assert_eq!(response.tokens[2], Token::kanji("下手", "へた"));
        assert_eq!(response.tokens[3].kind, TokenKind::Kana);
    }

    #[test]
    fn kanji_without_furigana_has_empty_reading() {
        let response = OracleResponse::from_json(RESPONSE).unwrap();
        let last = response.tokens.last().unwrap();
        assert!(last.is_kanji());
        assert_eq!(last.reading, "");
    }

    #[test]
    fn missing_result_is_an_error() {
        let err = OracleResponse::from_json(r#"{"error": {"code": -32600}}"#).unwrap_err();
        assert!(matches!(err, OracleError::NoResult(ref d) if d.contains("-32600")));
        let err = OracleResponse::from_json("{}").unwrap_err();
        assert!(matches!(err, OracleError::NoResult(_)));
        assert!(matches!(OracleResponse::from_json("nope"), Err(OracleError::Json(_))));
    }

    #[test]
    fn static_oracle_ignores_query() {
        let oracle = StaticOracle::from_json(RESPONSE).unwrap();
        assert_eq!(oracle.furigana("anything").unwrap().len(), 6);
    }

    #[test]
    fn query_text_keeps_japanese_and_breaks() {
        assert_eq!(query_text("君が、好き! Cry\n夜"), "君が好き \n夜");
    }
}
