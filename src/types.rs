// =============================================================================
// Shared types used across the copper outlook service
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Instruments the model reads. Copper is the primary series; the rest are
/// optional macro inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    Copper,
    DollarIndex,
    Us10y,
    UsdInr,
    Nifty,
}

impl Instrument {
    /// Yahoo Finance ticker used when the config does not override it.
    pub fn default_symbol(self) -> &'static str {
        match self {
            Self::Copper => "HG=F",
            Self::DollarIndex => "DX-Y.NYB",
            Self::Us10y => "^TNX",
            Self::UsdInr => "USDINR=X",
            Self::Nifty => "^NSEI",
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copper => write!(f, "Copper"),
            Self::DollarIndex => write!(f, "DollarIndex"),
            Self::Us10y => write!(f, "US10Y"),
            Self::UsdInr => write!(f, "USDINR"),
            Self::Nifty => write!(f, "Nifty"),
        }
    }
}

/// One daily observation. Provider gaps (null close / volume) stay `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub date: NaiveDate,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

/// Ascending-by-date daily series for a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub samples: Vec<PriceSample>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, samples: Vec<PriceSample>) -> Self {
        Self {
            symbol: symbol.into(),
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Close prices with missing values mapped to NaN, so that any window
    /// touching a gap yields a non-finite indicator.
    pub fn closes(&self) -> Vec<f64> {
        self.samples
            .iter()
            .map(|s| s.close.unwrap_or(f64::NAN))
            .collect()
    }

    /// Volumes with missing values mapped to NaN.
    pub fn volumes(&self) -> Vec<f64> {
        self.samples
            .iter()
            .map(|s| s.volume.unwrap_or(f64::NAN))
            .collect()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.samples.last().map(|s| s.date)
    }
}

/// Forecast horizon slots, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Horizon {
    Today,
    Tomorrow,
    DayPlus2,
    DayPlus3,
}

impl Horizon {
    pub const ALL: [Horizon; 4] = [
        Self::Today,
        Self::Tomorrow,
        Self::DayPlus2,
        Self::DayPlus3,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Tomorrow => "Tomorrow",
            Self::DayPlus2 => "Day +2",
            Self::DayPlus3 => "Day +3",
        }
    }
}

impl std::fmt::Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build a daily series starting 2024-01-01 from close/volume pairs.
    pub fn series_from(symbol: &str, closes: &[f64], volumes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let samples = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceSample {
                date: start + chrono::Days::new(i as u64),
                close: Some(c),
                volume: volumes.get(i).copied(),
            })
            .collect();
        PriceSeries::new(symbol, samples)
    }

    pub fn flat(symbol: &str, n: usize, price: f64) -> PriceSeries {
        series_from(symbol, &vec![price; n], &vec![1_000.0; n])
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn closes_map_gaps_to_nan() {
        let mut s = flat("HG=F", 3, 4.0);
        s.samples[1].close = None;
        let closes = s.closes();
        assert_eq!(closes[0], 4.0);
        assert!(closes[1].is_nan());
    }

    #[test]
    fn horizon_labels_in_order() {
        let labels: Vec<&str> = Horizon::ALL.iter().map(|h| h.label()).collect();
        assert_eq!(labels, vec!["Today", "Tomorrow", "Day +2", "Day +3"]);
    }

    #[test]
    fn default_symbols() {
        assert_eq!(Instrument::Copper.default_symbol(), "HG=F");
        assert_eq!(Instrument::UsdInr.default_symbol(), "USDINR=X");
    }
}
