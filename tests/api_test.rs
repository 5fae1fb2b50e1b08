//! End-to-end tests of the public parsing API.

use ipaparse::features::{
    Backness, Height, Manner, Place, SoundSubtype, SoundType, SymbolType, Voicing,
};
use ipaparse::{
    parse_symbol, parse_transcription, BracketStrategy, Error, IpaConfig, Symbol, Transcription,
    TranscriptionType,
};
use rstest::rstest;

fn parse(input: &str) -> Transcription {
    parse_transcription(input, &IpaConfig::new()).unwrap()
}

#[rstest]
#[case("[a]", TranscriptionType::Phonetic)]
#[case("/a/", TranscriptionType::Phonemic)]
#[case("⟨a⟩", TranscriptionType::Literal)]
fn transcription_types(#[case] input: &str, #[case] expected: TranscriptionType) {
    assert_eq!(parse(input).transcription_type(), expected);
}

#[test]
fn simple_vowel() {
    let transcription = parse("[a]");
    assert_eq!(transcription.len(), 1);
    let a = &transcription[0];
    assert!(a.has_feature(SoundType::Vowel.into()));
    assert!(a.has_feature(Height::Open.into()));
    assert!(a.has_feature(Backness::Front.into()));
    assert!(a.has_feature(SymbolType::Sound.into()));
}

#[test]
fn tied_affricate() {
    let transcription = parse("/t\u{361}s/");
    assert_eq!(transcription.len(), 1);
    let affricate = &transcription[0];
    assert_eq!(*affricate, "t\u{361}s");
    assert!(affricate.has_feature(Manner::Affricate.into()));
    assert!(affricate.has_feature(Place::Alveolar.into()));
    assert!(affricate.has_feature(SoundType::Consonant.into()));
    let components = affricate.components().unwrap();
    assert_eq!(components[0], "t");
    assert_eq!(components[1], "s");

    // Without the tie the same letters are two separate symbols.
    let untied = parse("/ts/");
    assert_eq!(untied.len(), 2);
    assert_eq!(untied[0], "t");
    assert_eq!(untied[1], "s");
}

#[test]
fn bracket_strategies() {
    let input = "[bə(j)ɪz⁽ʲ⁾ˈlʲivɨj]";
    let expand = parse_transcription(
        input,
        &IpaConfig::new().with_brackets(BracketStrategy::Expand),
    )
    .unwrap();
    assert_eq!(expand, "[bəjɪzʲˈlʲivɨj]");

    let strip = parse_transcription(
        input,
        &IpaConfig::new().with_brackets(BracketStrategy::Strip),
    )
    .unwrap();
    assert_eq!(strip, "[bəɪzˈlʲivɨj]");

    let keep = parse_transcription(input, &IpaConfig::new()).unwrap();
    assert_eq!(keep, input);
    assert!(keep.iter().any(|symbol| !symbol.is_known()));
}

#[test]
fn bracket_strategy_keep_surfaces_unknowns() {
    let kept = parse_transcription("[(a)]", &IpaConfig::new()).unwrap();
    assert_eq!(kept.len(), 3);
    assert!(!kept[0].is_known());
    assert!(kept[1].is_known());
    assert!(!kept[2].is_known());
}

#[test]
fn combined_symbol() {
    let config = IpaConfig::new().with_combined(&[&["t", "s"]]).unwrap();
    let symbol = parse_symbol("ts", &config);
    assert_eq!(symbol, "t\u{361}s");
    assert!(symbol.has_feature(Manner::Affricate.into()));
    let components = symbol.components().unwrap();
    assert_eq!(components.len(), 2);
}

#[test]
fn substitutions() {
    let config = IpaConfig::new().with_substitutions(true);
    let transcription = parse_transcription("/g/", &config).unwrap();
    assert_eq!(transcription, "/ɡ/");
    let g = &transcription[0];
    assert!(g.has_feature(Voicing::Voiced.into()));
    assert!(g.has_feature(Place::Velar.into()));
    assert!(g.has_feature(Manner::Stop.into()));

    // Without substitutions the Latin letter stays unknown.
    let plain = parse_transcription("/g/", &IpaConfig::new()).unwrap();
    assert!(!plain[0].is_known());
}

#[test]
fn combined_diphthong() {
    let config = IpaConfig::new().with_combined(&[&["a", "ɪ"]]).unwrap();
    let combined = parse_transcription("[aɪ]", &config).unwrap();
    assert_eq!(combined.len(), 1);
    assert_eq!(combined[0], "a\u{361}ɪ");
    assert!(combined[0].has_feature(SoundSubtype::Diphthong.into()));

    let plain = parse_transcription("[aɪ]", &IpaConfig::new()).unwrap();
    assert_eq!(plain.len(), 2);
    assert!(plain
        .iter()
        .all(|symbol| symbol.has_feature(SoundSubtype::SimpleVowel.into())));
}

#[test]
fn unknown_symbol() {
    let transcription = parse("[%]");
    assert_eq!(transcription.len(), 1);
    let unknown = &transcription[0];
    assert_eq!(*unknown, "%");
    assert!(!unknown.is_known());
    assert_eq!(transcription.iter().count(), 1);
}

#[test]
fn concatenation() {
    let combined = parse("[abc]").concat(&parse("[def]")).unwrap();
    assert_eq!(combined, "[abcdef]");

    assert_eq!(
        parse("/a/").concat(&parse("[b]")),
        Err(Error::IncompatibleTypes {
            left: "/a/".to_string(),
            right: "[b]".to_string(),
        })
    );
}

#[test]
fn role_reinterpretation() {
    let t = Symbol::parse("t", &IpaConfig::new());
    let dental = t.features_with_role_named("dental").unwrap().unwrap();
    assert!(dental.contains(Place::Dental.into()));

    let s = Symbol::parse("s", &IpaConfig::new());
    assert_eq!(s.features_with_role_named("dental").unwrap(), None);
}

#[test]
fn enclosing_error() {
    match parse_transcription("abc", &IpaConfig::new()) {
        Err(Error::Enclosing { transcription }) => assert_eq!(transcription, "abc"),
        other => panic!("expected an enclosing error, got {:?}", other),
    }
}

#[rstest]
#[case("[pʰat]")]
#[case("/ŋ̊a/")]
#[case("[t\u{361}sʰaː]")]
#[case("⟨abc⟩")]
#[case("[ˈpa ˌta]")]
fn display_round_trip(#[case] input: &str) {
    assert_eq!(parse(input).to_string(), input);
}

#[test]
fn slicing_preserves_type() {
    let transcription = parse("/abc/");
    let sliced = transcription.slice(0..2);
    assert_eq!(sliced, "/ab/");
    assert_eq!(sliced.transcription_type(), TranscriptionType::Phonemic);
}

#[test]
fn hashing_follows_string_form() {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let first = parse("[pa]");
    let second = parse("[pa]");
    let mut left = DefaultHasher::new();
    let mut right = DefaultHasher::new();
    first.hash(&mut left);
    second.hash(&mut right);
    assert_eq!(left.finish(), right.finish());
    assert_eq!(first, second);
}

#[test]
fn eager_loading() {
    ipaparse::load();
    assert_eq!(parse("[a]").len(), 1);
}
