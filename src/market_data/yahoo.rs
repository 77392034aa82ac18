// =============================================================================
// Yahoo Finance Chart Client — daily close/volume series
// =============================================================================
//
// GET {base}/v8/finance/chart/{symbol}?range={N}d&interval=1d
//
// The chart endpoint returns parallel arrays (timestamp, close, volume) with
// `null` for missing values. Nulls are kept as `None`; rows without a
// timestamp cannot be placed and are dropped.
// =============================================================================

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{FetchOutcome, LookbackWindow, MarketDataSource};
use crate::types::{PriceSample, PriceSeries};

#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<Option<i64>>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

/// Yahoo Finance chart API client.
#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0")
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "YahooClient initialised");

        Ok(Self { base_url, client })
    }

    fn chart_url(&self, symbol: &str, window: LookbackWindow) -> String {
        format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d",
            self.base_url, symbol, window
        )
    }

    /// Fetch and parse one daily series.
    #[instrument(skip(self), name = "yahoo::fetch_series")]
    pub async fn fetch_series(&self, symbol: &str, window: LookbackWindow) -> Result<PriceSeries> {
        let url = self.chart_url(symbol, window);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET chart for {symbol} failed"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("failed to read chart body for {symbol}"))?;

        if !status.is_success() {
            bail!("Yahoo chart for {symbol} returned {status}");
        }

        let series = parse_chart(symbol, &body)?;
        debug!(symbol, samples = series.len(), "chart parsed");
        Ok(series)
    }
}

#[async_trait]
impl MarketDataSource for YahooClient {
    async fn fetch(&self, symbol: &str, window: LookbackWindow) -> FetchOutcome {
        match self.fetch_series(symbol, window).await {
            Ok(series) => FetchOutcome::Available(series),
            Err(e) => {
                warn!(symbol, error = %format!("{e:#}"), "series unavailable");
                FetchOutcome::Unavailable {
                    symbol: symbol.to_string(),
                    reason: format!("{e:#}"),
                }
            }
        }
    }
}

fn to_date(ts: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}

/// Parse a chart response body into an ascending, one-row-per-date series.
///
/// When the provider repeats a date (the live bar next to the settled one),
/// the later row wins.
pub fn parse_chart(symbol: &str, body: &str) -> Result<PriceSeries> {
    let response: YahooResponse =
        serde_json::from_str(body).with_context(|| format!("failed to parse chart JSON for {symbol}"))?;

    if let Some(error) = response.chart.error {
        bail!("Yahoo Finance error: {} - {}", error.code, error.description);
    }

    let data = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .with_context(|| format!("no chart result for {symbol}"))?;

    let timestamps = data.timestamp.unwrap_or_default();
    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .with_context(|| format!("no quote data for {symbol}"))?;

    let mut samples: Vec<PriceSample> = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            let date = to_date((*ts)?)?;
            Some(PriceSample {
                date,
                close: quote.close.get(i).copied().flatten(),
                volume: quote.volume.get(i).copied().flatten(),
            })
        })
        .collect();

    samples.sort_by_key(|s| s.date);
    let mut deduped: Vec<PriceSample> = Vec::with_capacity(samples.len());
    for sample in samples {
        match deduped.last_mut() {
            Some(last) if last.date == sample.date => *last = sample,
            _ => deduped.push(sample),
        }
    }

    Ok(PriceSeries::new(symbol, deduped))
}
