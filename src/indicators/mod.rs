// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free rolling-window indicators over daily closes and
// volumes. Functions return `Option<f64>` when the window does not fit the
// input; a window that touches a missing sample (NaN) yields NaN, and the
// scoring layer neutralises it in one place.

pub mod roc;
pub mod sma;
pub mod volume;
