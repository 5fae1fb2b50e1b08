//! Errors reported at the public API boundary.
//!
//! Unknown IPA symbols are not errors: they come back as symbols with no
//! features. Errors are reserved for malformed requests (bad enclosing
//! brackets, invalid configuration values, unknown feature names, and
//! concatenation of incompatible transcriptions).

use thiserror::Error;

/// The error type for transcription parsing and related operations.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum Error {
    /// The input to transcription parsing is not framed by a recognized
    /// pair of outer brackets.
    #[error("\"{transcription}\" is not properly enclosed in brackets (like [so] or /so/)")]
    Enclosing {
        /// The offending input string.
        transcription: String,
    },

    /// A bracket-strategy name did not match any known strategy.
    #[error("\"{value}\" is not a valid strategy; use one of the following: keep/expand/strip")]
    BracketStrategy {
        /// The offending strategy name.
        value: String,
    },

    /// A sound sequence requested for combining had fewer than two members.
    #[error("a sound sequence to be combined must contain at least 2 elements (got {})", .sequence.len())]
    CombinedLength {
        /// The offending sequence.
        sequence: Vec<String>,
    },

    /// A sound requested for combining was empty or began with a combining
    /// character.
    #[error("{}", combined_sound_message(.sound))]
    CombinedSound {
        /// The offending sound.
        sound: String,
    },

    /// A feature name did not match any known feature.
    #[error("invalid feature: \"{value}\"")]
    Feature {
        /// The offending feature name.
        value: String,
    },

    /// A feature-kind name did not match any known kind.
    #[error("invalid feature kind: \"{value}\"")]
    FeatureKind {
        /// The offending kind name.
        value: String,
    },

    /// Two transcriptions with different bracket types cannot be
    /// concatenated.
    #[error("\"{left}\" and \"{right}\" have incompatible types and cannot be concatenated")]
    IncompatibleTypes {
        /// String form of the left operand.
        left: String,
        /// String form of the right operand.
        right: String,
    },
}

fn combined_sound_message(sound: &str) -> String {
    if sound.is_empty() {
        "a sound to be combined cannot be empty".to_string()
    } else {
        format!(
            "a sound to be combined must start with a non-combining character (got \"{}\")",
            sound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::Enclosing {
                transcription: "abc".to_string(),
            }
            .to_string(),
            "\"abc\" is not properly enclosed in brackets (like [so] or /so/)"
        );
        assert_eq!(
            Error::CombinedSound {
                sound: String::new(),
            }
            .to_string(),
            "a sound to be combined cannot be empty"
        );
        assert_eq!(
            Error::CombinedLength {
                sequence: vec!["a".to_string()],
            }
            .to_string(),
            "a sound sequence to be combined must contain at least 2 elements (got 1)"
        );
    }
}
