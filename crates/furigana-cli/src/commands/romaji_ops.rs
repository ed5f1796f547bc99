use furigana_core::romaji::{kana_to_romaji, normalize_romaji, try_romaji_to_hiragana};

/// All romanizations of a kana string, one per line.
pub fn romaji(kana: &str) {
    let all = kana_to_romaji(kana);
    if all.is_empty() {
        eprintln!("No romanization for {kana}");
        std::process::exit(1);
    }
    for r in all {
        println!("{r}");
    }
}

pub fn hiragana(romaji: &str) {
    let normalized = normalize_romaji(romaji);
    let kana = die!(try_romaji_to_hiragana(&normalized), "Error: {}");
    println!("{kana}");
}
