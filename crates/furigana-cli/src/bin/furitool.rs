use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use furigana_cli::commands::annotate_ops::AnnotateInput;
use furigana_cli::commands::{align_ops, annotate_ops, config_ops, romaji_ops, EngineOptions};
use furigana_cli::trace_init::init_tracing;

#[derive(Parser)]
#[command(name = "furitool", about = "Furigana alignment and annotation tools")]
struct Cli {
    /// Write JSON trace lines to this directory
    #[arg(long, global = true)]
    trace_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct EngineArgs {
    /// Pronunciation dictionary (TSV: surface, comma-separated readings)
    #[arg(long)]
    dict: Option<String>,
    /// Settings TOML replacing the embedded defaults
    #[arg(long)]
    settings: Option<String>,
    /// Syllable inventory TOML replacing the embedded one
    #[arg(long)]
    syllables: Option<String>,
}

impl From<EngineArgs> for EngineOptions {
    fn from(args: EngineArgs) -> Self {
        Self {
            settings: args.settings,
            syllables: args.syllables,
            dict: args.dict,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print every romanization of a kana string
    Romaji {
        /// Hiragana or katakana
        kana: String,
    },

    /// Convert a romaji transcription to hiragana
    Hiragana {
        /// Romaji text
        romaji: String,
    },

    /// Resolve the readings of one lyric line from its romaji
    Align {
        /// Oracle output (furigana JSON-RPC response) for the line
        #[arg(long)]
        oracle: String,
        /// Romaji transcription of the line
        #[arg(long)]
        romaji: String,
        /// Output as JSON instead of columns
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        engine: EngineArgs,
        /// Lyric line
        line: String,
    },

    /// Annotate the kanji of a lyrics file or wiki page
    Annotate {
        /// Oracle output (furigana JSON-RPC response) for the reference lyrics
        #[arg(long)]
        oracle: String,
        /// Romaji transcription, one line per reference lyric line
        #[arg(long)]
        romaji: String,
        /// Plain lyrics the romaji transcribes (defaults to the input text)
        #[arg(long)]
        reference: Option<String>,
        /// Treat the input as a wiki page with a lyrics template
        #[arg(long)]
        page: bool,
        /// Ask before keeping corrections the dictionary does not confirm
        #[arg(long)]
        interactive: bool,
        #[command(flatten)]
        engine: EngineArgs,
        /// Lyrics text or wiki page source
        text_file: String,
    },

    /// Print the default settings TOML
    SettingsExport,

    /// Validate a settings TOML file
    SettingsValidate {
        /// Path to settings TOML
        file: String,
    },

    /// Print the default syllable inventory TOML
    SyllablesExport,

    /// Validate a syllable inventory TOML file
    SyllablesValidate {
        /// Path to syllable TOML
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.trace_dir.as_deref());

    match cli.command {
        Command::Romaji { kana } => romaji_ops::romaji(&kana),
        Command::Hiragana { romaji } => romaji_ops::hiragana(&romaji),
        Command::Align {
            oracle,
            romaji,
            json,
            engine,
            line,
        } => align_ops::align(&oracle, &romaji, &line, &engine.into(), json),
        Command::Annotate {
            oracle,
            romaji,
            reference,
            page,
            interactive,
            engine,
            text_file,
        } => {
            let input = AnnotateInput {
                oracle_file: &oracle,
                romaji_file: &romaji,
                text_file: &text_file,
                reference_file: reference.as_deref(),
                page,
                interactive,
            };
            annotate_ops::annotate(&input, &engine.into());
        }
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
        Command::SyllablesExport => config_ops::syllables_export(),
        Command::SyllablesValidate { file } => config_ops::syllables_validate(&file),
    }
}
