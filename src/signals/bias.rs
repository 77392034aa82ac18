// =============================================================================
// Bias Classification — score → label + confidence
// =============================================================================
//
//   score >  strong  => Strong Bullish
//   score >  mild    => Mild Bullish
//   score > -mild    => Sideways
//   score > -strong  => Mild Bearish
//   otherwise        => Strong Bearish
//
// The cut points are strict, so every score lands in exactly one bucket.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiasLabel {
    StrongBullish,
    MildBullish,
    Sideways,
    MildBearish,
    StrongBearish,
}

impl BiasLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StrongBullish => "Strong Bullish",
            Self::MildBullish => "Mild Bullish",
            Self::Sideways => "Sideways",
            Self::MildBearish => "Mild Bearish",
            Self::StrongBearish => "Strong Bearish",
        }
    }
}

impl std::fmt::Display for BiasLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_strong() -> f64 {
    0.35
}

fn default_mild() -> f64 {
    0.15
}

/// Symmetric classification cut points. Requires `0 <= mild < strong <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiasThresholds {
    #[serde(default = "default_strong")]
    pub strong: f64,
    #[serde(default = "default_mild")]
    pub mild: f64,
}

impl Default for BiasThresholds {
    fn default() -> Self {
        Self {
            strong: default_strong(),
            mild: default_mild(),
        }
    }
}

impl BiasThresholds {
    pub fn classify(&self, score: f64) -> BiasLabel {
        if score > self.strong {
            BiasLabel::StrongBullish
        } else if score > self.mild {
            BiasLabel::MildBullish
        } else if score > -self.mild {
            BiasLabel::Sideways
        } else if score > -self.strong {
            BiasLabel::MildBearish
        } else {
            BiasLabel::StrongBearish
        }
    }
}

/// `round(|score| * 100)`, bounded to [0, 100]. Non-finite scores give 0.
pub fn confidence(score: f64) -> u8 {
    if !score.is_finite() {
        return 0;
    }
    (score.abs() * 100.0).round().clamp(0.0, 100.0) as u8
}
