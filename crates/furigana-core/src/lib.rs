//! Furigana alignment engine.
//!
//! Threads the output of a furigana oracle through a lyric line, aligns the
//! resulting runs against an independently transcribed romaji line, and
//! re-injects the resolved readings into wikitext as inline annotations.

pub mod align;
pub mod dict;
pub mod lyrics;
pub mod oracle;
pub mod pipeline;
pub mod romaji;
pub mod scanner;
pub mod settings;
pub mod substitute;
pub mod token;
pub mod tokenizer;
pub mod unicode;
pub mod wikitext;
