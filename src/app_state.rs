// =============================================================================
// Central Application State — Copper Outlook Service
// =============================================================================
//
// Ties the fetch boundary (cached market data) to the pure scoring engine and
// keeps a short in-memory log of feed errors for the dashboard. Nothing here
// is persisted.
//
// Thread safety:
//   - The series cache owns its own `parking_lot::RwLock`.
//   - The error log is a `parking_lot::RwLock<VecDeque<_>>`.
// =============================================================================

use std::collections::VecDeque;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::engine::{MarketInputs, Outlook, ScoringEngine};
use crate::error::ScoreError;
use crate::market_data::{FetchOutcome, LookbackWindow, MarketDataSource};
use crate::runtime_config::RuntimeConfig;
use crate::types::{Instrument, PriceSeries};

// =============================================================================
// Error Record
// =============================================================================

/// A recorded error event for the dashboard error log.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub message: String,
    /// Symbol the error relates to, when there is one.
    pub symbol: Option<String>,
    /// ISO 8601 timestamp.
    pub at: String,
}

/// Maximum number of recent errors to retain.
const MAX_RECENT_ERRORS: usize = 50;

// =============================================================================
// Report types
// =============================================================================

/// Rupee translation of today's directional score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocalProjection {
    /// User-entered MCX copper price (₹/kg).
    pub reference_price: f64,
    pub expected_move_pct: f64,
    pub expected_move_abs: f64,
}

/// A feed that could not be fetched in this run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnavailableFeed {
    pub instrument: Instrument,
    pub symbol: String,
    pub reason: String,
}

/// Everything the presentation layer needs for one page render.
#[derive(Debug, Clone, Serialize)]
pub struct OutlookReport {
    pub generated_at: DateTime<Utc>,
    pub copper_symbol: String,
    pub last_data_date: Option<NaiveDate>,
    pub outlook: Outlook,
    pub projection: Option<LocalProjection>,
    pub unavailable: Vec<UnavailableFeed>,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("primary series {symbol} unavailable: {reason}")]
    PrimaryUnavailable { symbol: String, reason: String },

    #[error("reference price {value} outside {min}..={max}")]
    InvalidReferencePrice { value: f64, min: f64, max: f64 },

    #[error(transparent)]
    Scoring(#[from] ScoreError),
}

// =============================================================================
// AppState
// =============================================================================

/// Shared across request handlers via `Arc<AppState>`.
pub struct AppState {
    pub config: RuntimeConfig,
    source: Box<dyn MarketDataSource>,
    engine: ScoringEngine,
    recent_errors: RwLock<VecDeque<ErrorRecord>>,
    /// Instant when the service was started. Used for uptime.
    pub start_time: std::time::Instant,
}

impl AppState {
    /// `source` is normally a `SeriesCache` around the live provider.
    pub fn new(config: RuntimeConfig, source: Box<dyn MarketDataSource>) -> Self {
        let engine = ScoringEngine::new(config.model.clone());
        Self {
            config,
            source,
            engine,
            recent_errors: RwLock::new(VecDeque::with_capacity(MAX_RECENT_ERRORS)),
            start_time: std::time::Instant::now(),
        }
    }

    // ── Error Logging ───────────────────────────────────────────────────

    /// Record an error. Oldest entries are evicted past
    /// [`MAX_RECENT_ERRORS`].
    pub fn push_error(&self, message: String, symbol: Option<String>) {
        let record = ErrorRecord {
            message,
            symbol,
            at: Utc::now().to_rfc3339(),
        };
        let mut errors = self.recent_errors.write();
        if errors.len() >= MAX_RECENT_ERRORS {
            errors.pop_front();
        }
        errors.push_back(record);
    }

    /// Newest-last copy of the error log.
    pub fn recent_errors(&self) -> Vec<ErrorRecord> {
        self.recent_errors.read().iter().cloned().collect()
    }

    // ── Cache ───────────────────────────────────────────────────────────

    /// Drop cached series so the next report refetches every feed.
    pub fn refresh(&self) -> usize {
        let cleared = self.source.invalidate_all();
        info!(cleared, "market data refresh requested");
        cleared
    }

    // ── Reference price ─────────────────────────────────────────────────

    fn validate_reference_price(&self, value: f64) -> Result<f64, ReportError> {
        let (min, max) = (
            self.config.reference_price_min,
            self.config.reference_price_max,
        );
        if !value.is_finite() || value < min || value > max {
            return Err(ReportError::InvalidReferencePrice { value, min, max });
        }
        Ok(value)
    }

    fn project(&self, reference_price: f64, today_score: f64) -> LocalProjection {
        let expected_move_pct = today_score * self.config.full_conviction_move_pct;
        LocalProjection {
            reference_price,
            expected_move_pct,
            expected_move_abs: reference_price * expected_move_pct / 100.0,
        }
    }

    // ── Scoring run ─────────────────────────────────────────────────────

    async fn fetch(&self, instrument: Instrument, window: LookbackWindow) -> FetchOutcome {
        let symbol = self.config.symbols.symbol(instrument);
        self.source.fetch(symbol, window).await
    }

    /// Record an unavailable optional feed and return whatever series exists.
    fn optional(
        &self,
        instrument: Instrument,
        outcome: FetchOutcome,
        unavailable: &mut Vec<UnavailableFeed>,
    ) -> Option<PriceSeries> {
        match outcome {
            FetchOutcome::Available(series) => Some(series),
            FetchOutcome::Unavailable { symbol, reason } => {
                warn!(%instrument, symbol = %symbol, reason = %reason, "optional feed unavailable");
                self.push_error(reason.clone(), Some(symbol.clone()));
                unavailable.push(UnavailableFeed {
                    instrument,
                    symbol,
                    reason,
                });
                None
            }
        }
    }

    /// Fetch every instrument, score, and attach the optional projection.
    pub async fn build_report(
        &self,
        reference_price: Option<f64>,
    ) -> Result<OutlookReport, ReportError> {
        let reference_price = reference_price
            .map(|p| self.validate_reference_price(p))
            .transpose()?;

        let window = LookbackWindow::days(self.config.lookback_days);
        let (copper, dxy, us10y, usd_inr, nifty) = tokio::join!(
            self.fetch(Instrument::Copper, window),
            self.fetch(Instrument::DollarIndex, window),
            self.fetch(Instrument::Us10y, window),
            self.fetch(Instrument::UsdInr, window),
            self.fetch(Instrument::Nifty, window),
        );

        let copper = match copper {
            FetchOutcome::Available(series) => series,
            FetchOutcome::Unavailable { symbol, reason } => {
                warn!(symbol = %symbol, reason = %reason, "primary feed unavailable");
                self.push_error(reason.clone(), Some(symbol.clone()));
                return Err(ReportError::PrimaryUnavailable { symbol, reason });
            }
        };

        let mut unavailable = Vec::new();
        let inputs = MarketInputs {
            dollar_index: self.optional(Instrument::DollarIndex, dxy, &mut unavailable),
            us10y: self.optional(Instrument::Us10y, us10y, &mut unavailable),
            usd_inr: self.optional(Instrument::UsdInr, usd_inr, &mut unavailable),
            nifty: self.optional(Instrument::Nifty, nifty, &mut unavailable),
            copper,
        };

        let outlook = match self.engine.score(&inputs) {
            Ok(outlook) => outlook,
            Err(e) => {
                warn!(error = %e, "scoring aborted");
                self.push_error(e.to_string(), Some(inputs.copper.symbol.clone()));
                return Err(e.into());
            }
        };

        let projection = reference_price.map(|p| self.project(p, outlook.base_score));

        info!(
            base_score = format!("{:.3}", outlook.base_score),
            today = %outlook.calls[0].bias,
            confidence = outlook.calls[0].confidence,
            degradations = outlook.degradations.len(),
            "outlook report built"
        );

        Ok(OutlookReport {
            generated_at: Utc::now(),
            copper_symbol: inputs.copper.symbol.clone(),
            last_data_date: inputs.copper.last_date(),
            outlook,
            projection,
            unavailable,
        })
    }
}
