// =============================================================================
// Scoring errors and absorbed degradations
// =============================================================================
//
// `ScoreError` is the only condition that stops a scoring run. Everything
// else the engine tolerates is a `Degradation`: reported alongside the
// outlook, never propagated.

use serde::Serialize;
use thiserror::Error;

use crate::signals::weighted_score::Term;
use crate::types::Instrument;

/// Fatal scoring failure. No partial outlook is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("insufficient data for {symbol}: need {required} samples, have {available}")]
    InsufficientData {
        symbol: String,
        required: usize,
        available: usize,
    },
}

/// A condition the engine absorbed by substituting a neutral term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Degradation {
    /// Optional series absent or shorter than its minimum.
    MissingOptionalSeries {
        instrument: Instrument,
        available: usize,
        required: usize,
    },
    /// A computed term was NaN or infinite and was replaced by 0.0.
    NonFiniteValue { term: Term },
}

impl std::fmt::Display for Degradation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingOptionalSeries {
                instrument,
                available,
                required,
            } => write!(
                f,
                "{instrument} series missing ({available}/{required} samples), term neutral"
            ),
            Self::NonFiniteValue { term } => {
                write!(f, "{term} term was non-finite, substituted 0.0")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message() {
        let err = ScoreError::InsufficientData {
            symbol: "HG=F".into(),
            required: 15,
            available: 10,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data for HG=F: need 15 samples, have 10"
        );
    }

    #[test]
    fn degradation_serialises_with_kind_tag() {
        let d = Degradation::NonFiniteValue { term: Term::Volume };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "NonFiniteValue");
        assert_eq!(json["term"], "volume");
    }
}
