//! Date-indexed price series and cross-symbol alignment.
//!
//! A [`PriceSeries`] is built once per symbol from the provider rows and is
//! immutable afterwards; every downstream statistic works on windows of it.
//! Before two series are combined arithmetically they must be restricted to
//! the same date set; extracting a column on a date a series lacks panics,
//! since misalignment is a defect rather than a supported state.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};

use crate::yahoo_finance::Quote;

/// A symbol's daily history keyed by trading date.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    ticker: String,
    bars: BTreeMap<NaiveDate, Quote>,
}

impl PriceSeries {
    /// Builds a series from provider rows; timestamps collapse to their
    /// calendar date.
    pub fn from_quotes(ticker: impl Into<String>, quotes: Vec<Quote>) -> Self {
        let bars = quotes
            .into_iter()
            .map(|q| {
                (
                    DateTime::from_timestamp(q.timestamp as i64, 0)
                        .unwrap_or_default()
                        .date_naive(),
                    q,
                )
            })
            .collect();
        Self {
            ticker: ticker.into(),
            bars,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Restricts the series to `[start, end]`, both inclusive.
    pub fn window(&self, start: NaiveDate, end: NaiveDate) -> PriceSeries {
        PriceSeries {
            ticker: self.ticker.clone(),
            bars: self
                .bars
                .range(start..=end)
                .map(|(date, q)| (*date, q.clone()))
                .collect(),
        }
    }

    /// Chronological dates present in both series.
    pub fn common_dates(&self, other: &PriceSeries) -> Vec<NaiveDate> {
        self.bars
            .keys()
            .filter(|date| other.bars.contains_key(date))
            .copied()
            .collect()
    }

    /// Closing prices on exactly `dates`, in the order given.
    pub fn closes_on(&self, dates: &[NaiveDate]) -> Vec<f64> {
        dates.iter().map(|date| self.bars[date].close).collect()
    }

    /// Opening prices on exactly `dates`, in the order given.
    pub fn opens_on(&self, dates: &[NaiveDate]) -> Vec<f64> {
        dates.iter().map(|date| self.bars[date].open).collect()
    }

    /// Open price of the earliest row, the entry price of this window.
    pub fn first_open(&self) -> Option<f64> {
        self.bars.values().next().map(|q| q.open)
    }
}
