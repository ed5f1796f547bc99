use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use furigana_core::align::align_line;
use furigana_core::dict::MapDictionary;
use furigana_core::romaji::kana_to_romaji;
use furigana_core::settings::Settings;
use furigana_core::token::Token;

fn bench_dict() -> MapDictionary {
    let mut dict = MapDictionary::new();
    for (surface, reading) in [
        ("人", "ひと"),
        ("人", "じん"),
        ("自分", "じぶん"),
        ("下手", "へた"),
        ("夏", "なつ"),
        ("空", "そら"),
        ("夢", "ゆめ"),
        ("見", "み"),
        ("掻", "か"),
        ("消", "け"),
        ("様", "よう"),
    ] {
        dict.insert(surface, reading);
    }
    dict
}

/// (label, runs as (surface, reading or None for kana), romaji)
type Line = (&'static str, &'static [(&'static str, Option<&'static str>)], &'static str);

static INPUTS: &[Line] = &[
    ("short", &[("夏", Some("なつ")), ("の", None), ("空", Some("そら"))], "natsunosora"),
    (
        "medium",
        &[
            ("自分", Some("じぶん")),
            ("より", None),
            ("下手", Some("へた")),
            ("くそな", None),
            ("人", Some("じん")),
        ],
        "jibunyorihetakusonahito",
    ),
    (
        "long",
        &[
            ("くらいに", None),
            ("を", None),
            ("掻", Some("か")),
            ("き", None),
            ("消", Some("け")),
            ("す", None),
            ("様", Some("さま")),
            ("な", None),
            ("夢", Some("ゆめ")),
            ("を", None),
            ("見", Some("み")),
            ("ていた", None),
        ],
        "kurainiokakikesuyounayumewomiteita",
    ),
];

fn runs(line: &[(&str, Option<&str>)]) -> Vec<Token> {
    line.iter()
        .map(|&(surface, reading)| match reading {
            Some(r) => Token::kanji(surface, r),
            None => Token::kana(surface),
        })
        .collect()
}

fn bench_align(c: &mut Criterion) {
    let dict = bench_dict();
    let settings = Settings::default().alignment;
    let mut group = c.benchmark_group("align/line");
    for &(label, line, romaji) in INPUTS {
        let runs = runs(line);
        group.bench_with_input(BenchmarkId::new(label, romaji.len()), &runs, |b, runs| {
            b.iter(|| align_line(runs, romaji, &dict, &settings));
        });
    }
    group.finish();
}

fn bench_expand(c: &mut Criterion) {
    let mut group = c.benchmark_group("romaji/expand");
    for kana in ["なつのそら", "だって", "ちょっとまって", "ヴァイオリンをひいてる"] {
        group.bench_with_input(BenchmarkId::new("kana", kana), &kana, |b, &kana| {
            b.iter(|| kana_to_romaji(kana));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_align, bench_expand);
criterion_main!(benches);
