macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            std::process::exit(1);
        })
    };
}

pub mod align_ops;
pub mod annotate_ops;
pub mod config_ops;
pub mod romaji_ops;

use std::fs;
use std::path::Path;

use furigana_core::dict::{EmptyDictionary, MapDictionary, PronunciationDictionary};
use furigana_core::romaji::Syllables;
use furigana_core::settings::{parse_settings_toml, Settings};

/// Options shared by the commands that run the engine.
#[derive(Debug, Default, Clone)]
pub struct EngineOptions {
    pub settings: Option<String>,
    pub syllables: Option<String>,
    pub dict: Option<String>,
}

impl EngineOptions {
    /// Settings from the given file, or the embedded defaults.
    pub fn load_settings(&self) -> Settings {
        let Some(file) = &self.settings else {
            return Settings::default();
        };
        let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
        die!(parse_settings_toml(&content), "Error in {file}: {}")
    }

    /// Install a custom syllable inventory. Must run before any romaji
    /// lookup.
    pub fn install_syllables(&self) {
        if let Some(file) = &self.syllables {
            let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
            die!(Syllables::init_custom(content), "Error in {file}: {}");
        }
    }

    pub fn load_dictionary(&self) -> Box<dyn PronunciationDictionary> {
        match &self.dict {
            Some(file) => Box::new(die!(
                MapDictionary::open(Path::new(file)),
                "Error opening dictionary: {}"
            )),
            None => Box::new(EmptyDictionary),
        }
    }
}
