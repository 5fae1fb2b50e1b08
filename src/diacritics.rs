//! Application of combining characters to feature sets.
//!
//! A combining character carries an ordered list of gated transformations;
//! the first applicable one rewrites the feature set. Diacritics riding on a
//! preceding/following combining character act as *meta* marks: each must be
//! matched by a meta-table transformation keyed to the positive changes of
//! the main transformation, or the whole application is rejected.

use std::collections::HashSet;

use crate::data::{get_data, Change, Combining, CombiningData, CombiningKind};
use crate::feature_set::FeatureSet;

/// Apply a single combining character to a feature set.
///
/// On success the applied change groups are recorded in `seen`; on failure
/// neither `seen` nor the features are altered.
pub(crate) fn apply_combining(
    table: &CombiningData,
    combining: Combining,
    features: FeatureSet,
    meta: &[Combining],
    seen: &mut HashSet<Change>,
) -> Option<FeatureSet> {
    let transformations = table.get(&combining)?;
    let chosen = transformations
        .iter()
        .find(|transformation| transformation.is_applicable(features, seen))?;
    let positives = chosen.positive_changes();
    let mut staged = seen.clone();
    let mut result = chosen.apply(features, &mut staged);
    let meta_table = &get_data().combining_meta;
    for &meta_combining in meta {
        let candidates = meta_table.get(&meta_combining)?;
        // A meta rule deliberately rewrites the change its carrier just
        // made, so its applicability is judged against the change groups
        // seen before this application.
        let meta_chosen = candidates.iter().find(|transformation| {
            transformation.required == positives && transformation.is_applicable(result, seen)
        })?;
        result = meta_chosen.apply(result, &mut staged);
    }
    *seen = staged;
    Some(result)
}

/// Apply an unordered collection of diacritics, retrying greedily until all
/// apply or no further progress is made.
pub(crate) fn apply_diacritics(
    table: &CombiningData,
    diacritics: &[char],
    features: FeatureSet,
    seen: &mut HashSet<Change>,
) -> Option<FeatureSet> {
    let mut remaining: Vec<char> = diacritics.to_vec();
    let mut current = features;
    while !remaining.is_empty() {
        let before = remaining.len();
        let mut index = 0;
        while index < remaining.len() {
            let combining = Combining::diacritic(remaining[index]);
            match apply_combining(table, combining, current, &[], seen) {
                Some(updated) => {
                    current = updated;
                    remaining.remove(index);
                }
                None => index += 1,
            }
        }
        if remaining.len() == before {
            return None;
        }
    }
    Some(current)
}

/// Apply a whole neighboring position (main character plus riding
/// diacritics) to a segment's feature set during outward expansion.
pub(crate) fn apply_position(
    position: &str,
    features: FeatureSet,
    is_preceding: bool,
    seen: &mut HashSet<Change>,
) -> Option<FeatureSet> {
    let mut characters = position.chars();
    let main = characters.next()?;
    let meta: Vec<Combining> = characters.map(Combining::diacritic).collect();
    let combining = Combining {
        character: main,
        kind: if is_preceding {
            CombiningKind::Preceding
        } else {
            CombiningKind::Following
        },
    };
    apply_combining(&get_data().combining_main, combining, features, &meta, seen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{
        Aspiration, Manner, Place, SecondaryModifier, SecondaryPlace, SoundSubtype, SoundType,
        SymbolType, Voicing,
    };

    fn voiced_nasal() -> FeatureSet {
        FeatureSet::of(&[
            SoundSubtype::SimpleConsonant.into(),
            SoundType::Consonant.into(),
            SymbolType::Sound.into(),
            Place::Bilabial.into(),
            crate::features::PlaceCategory::Labial.into(),
            Manner::Nasal.into(),
            Voicing::Voiced.into(),
        ])
    }

    fn voiceless_stop() -> FeatureSet {
        FeatureSet::of(&[
            SoundSubtype::SimpleConsonant.into(),
            SoundType::Consonant.into(),
            SymbolType::Sound.into(),
            Place::Alveolar.into(),
            crate::features::PlaceCategory::Coronal.into(),
            Manner::Stop.into(),
        ])
    }

    #[test]
    fn test_devoicing_ring() {
        let mut seen = HashSet::new();
        let result = apply_diacritics(
            &get_data().combining_main,
            &['\u{325}'],
            voiced_nasal(),
            &mut seen,
        )
        .unwrap();
        assert!(result.contains(Voicing::Devoiced.into()));
        assert!(!result.contains(Voicing::Voiced.into()));
    }

    #[test]
    fn test_inapplicable_diacritic_leaves_state_untouched() {
        let mut seen = HashSet::new();
        // A voiceless stop cannot be devoiced.
        let result = apply_diacritics(
            &get_data().combining_main,
            &['\u{325}'],
            voiceless_stop(),
            &mut seen,
        );
        assert_eq!(result, None);
        assert!(seen.is_empty());
    }

    #[test]
    fn test_unordered_diacritics_reach_fixpoint() {
        // Voicing then devoicing ring would contradict; voicing plus a
        // syllabicity mark is order-independent and must succeed whichever
        // order the marks arrive in.
        let mut seen = HashSet::new();
        let result = apply_diacritics(
            &get_data().combining_main,
            &['\u{329}', '\u{32c}'],
            voiceless_stop(),
            &mut seen,
        )
        .unwrap();
        assert!(result.contains(Voicing::Voiced.into()));
        assert!(result.contains(crate::features::Syllabicity::Syllabic.into()));
    }

    #[test]
    fn test_following_aspiration() {
        let mut seen = HashSet::new();
        let result = apply_position("ʰ", voiceless_stop(), false, &mut seen).unwrap();
        assert!(result.contains(Aspiration::Aspirated.into()));
        // A second aspiration mark is incompatible.
        assert_eq!(apply_position("ʰ", result, false, &mut seen), None);
    }

    #[test]
    fn test_preceding_prenasalization_with_meta() {
        let mut seen = HashSet::new();
        let plain = apply_position("ⁿ", voiceless_stop(), true, &mut seen).unwrap();
        assert!(plain.contains(SecondaryModifier::Prenasalized.into()));

        // The devoicing ring rides the prenasalization mark as a meta
        // diacritic and rewrites its positive change.
        let mut seen = HashSet::new();
        let voiceless = apply_position("ⁿ\u{325}", voiceless_stop(), true, &mut seen).unwrap();
        assert!(voiceless.contains(SecondaryModifier::VoicelesslyPrenasalized.into()));
        assert!(!voiceless.contains(SecondaryModifier::Prenasalized.into()));
    }

    #[test]
    fn test_meta_without_matching_rule_fails() {
        let mut seen = HashSet::new();
        // A ring riding an aspiration mark has no meta rule keyed to
        // {aspirated}, so the whole position must be refused.
        assert_eq!(
            apply_position("ʰ\u{325}", voiceless_stop(), false, &mut seen),
            None
        );
        assert!(seen.is_empty());
    }

    #[test]
    fn test_labialization() {
        let mut seen = HashSet::new();
        let result = apply_position("ʷ", voiceless_stop(), false, &mut seen).unwrap();
        assert!(result.contains(SecondaryPlace::Labialized.into()));
    }
}
