//! Randomized (seeded, reproducible) exercises of the parser: arbitrary
//! interleavings of letters and combining marks, nested brackets, and tied
//! vowel compositions. Nothing here may panic, and the universal
//! invariants must hold on whatever comes out.

use ipaparse::features::{SoundSubtype, SoundType};
use ipaparse::{parse_symbol, parse_transcription, BracketStrategy, IpaConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use unicode_normalization::UnicodeNormalization;

const LETTERS: &[&str] = &[
    "a", "e", "i", "o", "u", "ə", "ɪ", "ʊ", "p", "t", "k", "b", "d", "s", "z", "m", "n", "ŋ", "l",
    "r", "j", "w", "%", "ʰ", "ː",
];

// A mix of marks the tables know (nasalization, voicing, syllabicity,
// ties) and marks they do not (double macron, x below).
const MARKS: &[char] = &[
    '\u{303}', '\u{325}', '\u{32c}', '\u{329}', '\u{32f}', '\u{361}', '\u{35c}', '\u{35e}',
    '\u{353}',
];

fn random_transcription(rng: &mut ChaCha8Rng) -> String {
    let mut body = String::new();
    for _ in 0..rng.gen_range(1..8) {
        body.push_str(LETTERS[rng.gen_range(0..LETTERS.len())]);
        for _ in 0..rng.gen_range(0..3) {
            body.push(MARKS[rng.gen_range(0..MARKS.len())]);
        }
    }
    format!("[{}]", body)
}

#[test]
fn random_interleavings_round_trip() {
    let mut rng = ChaCha8Rng::seed_from_u64(20240);
    for _ in 0..500 {
        let input = random_transcription(&mut rng);
        let transcription = parse_transcription(&input, &IpaConfig::new()).unwrap();
        let normalized: String = input.nfd().collect();
        assert_eq!(transcription.to_string(), normalized, "input {:?}", input);
        for symbol in &transcription {
            let reparsed = parse_symbol(symbol.spelling(), &IpaConfig::new());
            assert_eq!(
                reparsed.features(),
                symbol.features(),
                "symbol {:?} of {:?}",
                symbol.spelling(),
                input
            );
            if let Some(features) = symbol.features() {
                assert_eq!(features.extended(), features);
            }
        }
    }
}

#[test]
fn random_bracket_nestings_are_idempotent() {
    let alphabet = ['a', 'b', '(', ')', '⁽', '⁾'];
    let mut rng = ChaCha8Rng::seed_from_u64(7341);
    for _ in 0..500 {
        let body: String = (0..rng.gen_range(0..10))
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();
        let input = format!("[{}]", body);
        for strategy in [
            BracketStrategy::Keep,
            BracketStrategy::Expand,
            BracketStrategy::Strip,
        ]
        .iter()
        {
            let config = IpaConfig::new().with_brackets(*strategy);
            let once = parse_transcription(&input, &config).unwrap().to_string();
            let twice = parse_transcription(&once, &config).unwrap().to_string();
            assert_eq!(once, twice, "strategy {:?} on {:?}", strategy, input);
        }
    }
}

#[test]
fn random_tied_vowel_compositions() {
    let vowels = ["a", "e", "i", "o", "u", "ə", "ɪ", "ʊ", "ɛ", "ɔ"];
    let mut rng = ChaCha8Rng::seed_from_u64(990);
    for _ in 0..500 {
        let count = rng.gen_range(2..4);
        let mut spelling = String::new();
        for index in 0..count {
            if index > 0 {
                spelling.push('\u{361}');
            }
            spelling.push_str(vowels[rng.gen_range(0..vowels.len())]);
            // Occasionally mark a member nonsyllabic.
            if rng.gen_bool(0.3) {
                spelling.push('\u{32f}');
            }
        }
        let symbol = parse_symbol(&spelling, &IpaConfig::new());
        let components = symbol.components().unwrap_or(&[]);
        assert_eq!(components.len(), count, "composition {:?}", spelling);
        if let Some(features) = symbol.features() {
            // When a combiner accepted the group, the result is a
            // polyphthong of matching arity.
            let expected = if count == 2 {
                SoundSubtype::Diphthong
            } else {
                SoundSubtype::Triphthong
            };
            assert!(features.contains(expected.into()), "{:?}", spelling);
            assert!(features.contains(SoundType::Vowel.into()));
            assert_eq!(features.extended(), features);
            for component in components {
                assert!(component
                    .features()
                    .map_or(false, |f| f.contains(SoundSubtype::SimpleVowel.into())));
            }
        }
    }
}
