//! Comparison statistics over aligned price arrays.
//!
//! Two empty-input conventions coexist here on purpose: volatility and total
//! return fall back to a defined `0.0`, while the deviation and correlation
//! statistics report `None` when the input leaves them undefined (an empty
//! sign partition, zero variance). Callers must treat `None` as "undefined",
//! not as zero.
//!
//! # Usage:
//! ```
//! use versus::stats::{downside_deviation, upside_deviation};
//!
//! let changes = [2.0, -3.0, 4.0, -1.0];
//! assert!((downside_deviation(&changes).unwrap() - 5.0_f64.sqrt()).abs() < 1e-12);
//! assert!((upside_deviation(&changes).unwrap() - 10.0_f64.sqrt()).abs() < 1e-12);
//! ```

/// Population standard deviation (divide by N); empty input is `0.0`.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    variance.sqrt()
}

/// Per-day percentage change, close against open.
pub fn percent_changes(closes: &[f64], opens: &[f64]) -> Vec<f64> {
    assert_eq!(
        closes.len(),
        opens.len(),
        "close/open arrays must be aligned"
    );
    closes
        .iter()
        .zip(opens)
        .map(|(close, open)| (close - open) / open * 100.0)
        .collect()
}

fn root_mean_square(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some((values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt())
}

/// Root-mean-square of the strictly negative changes; `None` when there are
/// none. Days with exactly 0% change count towards neither side.
pub fn downside_deviation(percent_changes: &[f64]) -> Option<f64> {
    let negative: Vec<f64> = percent_changes.iter().copied().filter(|&c| c < 0.0).collect();
    root_mean_square(&negative)
}

/// Root-mean-square of the strictly positive changes; `None` when there are
/// none.
pub fn upside_deviation(percent_changes: &[f64]) -> Option<f64> {
    let positive: Vec<f64> = percent_changes.iter().copied().filter(|&c| c > 0.0).collect();
    root_mean_square(&positive)
}

/// Day-over-day percentage returns; length is one less than the input.
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) / pair[0] * 100.0)
        .collect()
}

/// Total percentage return from the entry-day open to the final close. An
/// empty close array is a defined 0.0, distinguishing "no data" from "no
/// movement".
pub fn total_return_pct(entry_open: f64, closes: &[f64]) -> f64 {
    match closes.last() {
        Some(final_close) => (final_close - entry_open) / entry_open * 100.0,
        None => 0.0,
    }
}

pub fn profit(investment_amount: f64, total_return_pct: f64) -> f64 {
    investment_amount * total_return_pct / 100.0
}

/// Pearson correlation coefficient of two aligned sequences; `None` when
/// either side has zero variance or the result is not finite.
pub fn pearson(first: &[f64], second: &[f64]) -> Option<f64> {
    assert_eq!(
        first.len(),
        second.len(),
        "correlation inputs must be aligned"
    );
    if first.is_empty() {
        return None;
    }
    let n = first.len() as f64;
    let mean_first = first.iter().sum::<f64>() / n;
    let mean_second = second.iter().sum::<f64>() / n;
    let mut covariance = 0.0;
    let mut variance_first = 0.0;
    let mut variance_second = 0.0;
    for (a, b) in first.iter().zip(second) {
        let da = a - mean_first;
        let db = b - mean_second;
        covariance += da * db;
        variance_first += da * da;
        variance_second += db * db;
    }
    let denominator = (variance_first * variance_second).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }
    let correlation = covariance / denominator;
    correlation
        .is_finite()
        .then(|| correlation.clamp(-1.0, 1.0))
}

/// Correlation of two daily-return sequences together with its qualitative
/// reading. Yields nothing when either sequence has length <= 1: with that
/// little data the whole step is skipped, interpretation included.
pub fn correlation_report(first: &[f64], second: &[f64]) -> Option<(Option<f64>, &'static str)> {
    if first.len() <= 1 || second.len() <= 1 {
        return None;
    }
    let coefficient = pearson(first, second);
    Some((coefficient, interpret_correlation(coefficient)))
}

/// Maps a coefficient to its qualitative band; `None` is "undefined".
pub fn interpret_correlation(correlation: Option<f64>) -> &'static str {
    let Some(corr) = correlation else {
        return "Correlation is undefined (possibly due to missing or constant data).";
    };
    if corr > 0.8 {
        "Strong positive correlation: they tend to move together."
    } else if corr > 0.5 {
        "Moderate positive correlation: generally move in the same direction."
    } else if corr > 0.2 {
        "Weak positive correlation: some tendency to move together."
    } else if corr > -0.2 {
        "No meaningful correlation: their movements are largely independent."
    } else if corr > -0.5 {
        "Weak negative correlation: slight tendency to move in opposite directions."
    } else if corr > -0.8 {
        "Moderate negative correlation: generally move in opposite directions."
    } else {
        "Strong negative correlation: they tend to move in opposite directions."
    }
}

/// The name with the strictly greater value; an exact tie goes to the second.
pub fn winner<'a>(first: (&'a str, f64), second: (&'a str, f64)) -> &'a str {
    if first.1 > second.1 {
        first.0
    } else {
        second.0
    }
}
