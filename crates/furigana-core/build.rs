use toml::Table;

const SETTINGS: &str = "src/default_settings.toml";
const SYLLABLES: &str = "src/romaji/default_syllables.toml";

fn main() {
    println!("cargo:rerun-if-changed={SETTINGS}");
    println!("cargo:rerun-if-changed={SYLLABLES}");

    let settings = parse(SETTINGS, include_str!("src/default_settings.toml"));
    for section in ["alignment", "substitution", "lyrics"] {
        table(SETTINGS, &settings, section);
    }

    let syllables = parse(SYLLABLES, include_str!("src/romaji/default_syllables.toml"));
    let hiragana = table(SYLLABLES, &syllables, "hiragana");
    if hiragana.is_empty() {
        panic!("{SYLLABLES}: [hiragana] is empty");
    }
    let katakana = table(SYLLABLES, &syllables, "katakana");
    for (section, entries) in [("hiragana", hiragana), ("katakana", katakana)] {
        for (key, value) in entries {
            if !value.as_str().is_some_and(|v| !v.is_empty()) {
                panic!("{SYLLABLES}: [{section}] {key:?} must map to a non-empty string");
            }
        }
    }
}

fn parse(path: &str, content: &str) -> Table {
    content
        .parse::<Table>()
        .unwrap_or_else(|e| panic!("{path} contains invalid TOML: {e}"))
}

fn table<'a>(path: &str, root: &'a Table, section: &str) -> &'a Table {
    root.get(section)
        .and_then(|v| v.as_table())
        .unwrap_or_else(|| panic!("{path}: missing [{section}] table"))
}
