// =============================================================================
// Horizon Decay — projects the base score over four trading days
// =============================================================================

use serde::{Deserialize, Serialize};

/// Number of horizon slots (Today .. Day +3).
pub const HORIZON_DAYS: usize = 4;

/// Multiplier sequence applied to the base score per horizon day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecayConvention {
    /// `[1.0, 0.70, 0.50, 0.35]`
    #[default]
    Fixed,
    /// `[1.0, 0.70, 0.70 * 0.75, 0.70 * 0.75 * 0.75]`
    Compounding,
}

impl DecayConvention {
    pub fn factors(self) -> [f64; HORIZON_DAYS] {
        match self {
            Self::Fixed => [1.0, 0.70, 0.50, 0.35],
            Self::Compounding => [1.0, 0.70, 0.70 * 0.75, 0.70 * 0.75 * 0.75],
        }
    }
}

/// Decayed directional scores, one per horizon day, each in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector(pub [f64; HORIZON_DAYS]);

/// Project `base` across the horizon. `base` is expected in [-1, 1]; the
/// result is clamped again so factors above 1.0 cannot escape the range.
pub fn project(base: f64, convention: DecayConvention) -> ScoreVector {
    let factors = convention.factors();
    let mut out = [0.0; HORIZON_DAYS];
    for (slot, factor) in out.iter_mut().zip(factors) {
        *slot = (base * factor).clamp(-1.0, 1.0);
    }
    ScoreVector(out)
}
