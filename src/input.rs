//! Console input validation.
//!
//! The prompt loop retries indefinitely; the parsers are pure functions so
//! they can be tested without a terminal attached.

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("Incorrect date format for '{0}', should be YYYY-MM-DD.")]
    InvalidFormat(String),
    #[error("Entry date must be a valid date within the timeframe.")]
    OutOfRange,
    #[error("Please enter exactly two ticker symbols separated by a comma.")]
    NotATickerPair,
    #[error("Please enter a valid positive number.")]
    NotAPositiveAmount,
}

/// Strict `YYYY-MM-DD`. Formatting the parsed date must reproduce the input,
/// which rejects unpadded variants such as "2024-1-2".
pub fn parse_date(text: &str) -> Result<NaiveDate, InputError> {
    let text = text.trim();
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| InputError::InvalidFormat(text.to_string()))?;
    if date.format("%Y-%m-%d").to_string() != text {
        return Err(InputError::InvalidFormat(text.to_string()));
    }
    Ok(date)
}

/// A valid date that also falls within `[start, end]`. The bounds are
/// canonical `YYYY-MM-DD` strings, so the lexicographic comparison is also
/// chronological.
pub fn parse_date_in_range(text: &str, start: &str, end: &str) -> Result<NaiveDate, InputError> {
    let date = parse_date(text)?;
    let text = text.trim();
    if start <= text && text <= end {
        Ok(date)
    } else {
        Err(InputError::OutOfRange)
    }
}

/// Exactly two comma-separated symbols, trimmed and upper-cased.
pub fn parse_ticker_pair(text: &str) -> Result<(String, String), InputError> {
    let tickers: Vec<String> = text.split(',').map(|s| s.trim().to_uppercase()).collect();
    match tickers.as_slice() {
        [first, second] if !first.is_empty() && !second.is_empty() => {
            Ok((first.clone(), second.clone()))
        }
        _ => Err(InputError::NotATickerPair),
    }
}

pub fn parse_amount(text: &str) -> Result<f64, InputError> {
    match text.trim().parse::<f64>() {
        Ok(amount) if amount > 0.0 => Ok(amount),
        _ => Err(InputError::NotAPositiveAmount),
    }
}

/// Prompts on stdout and re-prompts until `parse` accepts the line.
pub fn prompt_until<T>(
    prompt: &str,
    parse: impl Fn(&str) -> Result<T, InputError>,
) -> io::Result<T> {
    let stdin = io::stdin();
    loop {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        }
        match parse(&line) {
            Ok(value) => return Ok(value),
            Err(reason) => println!("Error: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_date_round_trips() {
        let date = parse_date("2024-03-08").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());
        assert_eq!(parse_date(" 2024-03-08\n").unwrap(), date);
    }

    #[test]
    fn malformed_dates_are_rejected() {
        assert!(parse_date("not a date").is_err());
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("08-03-2024").is_err());
        // parseable by chrono but not canonical YYYY-MM-DD
        assert!(parse_date("2024-1-2").is_err());
    }

    #[test]
    fn entry_date_must_sit_within_the_bounds() {
        assert!(parse_date_in_range("2024-02-01", "2024-01-01", "2024-03-01").is_ok());
        assert!(parse_date_in_range("2024-01-01", "2024-01-01", "2024-03-01").is_ok());
        assert!(parse_date_in_range("2024-03-01", "2024-01-01", "2024-03-01").is_ok());
        assert_eq!(
            parse_date_in_range("2023-12-31", "2024-01-01", "2024-03-01"),
            Err(InputError::OutOfRange)
        );
        assert_eq!(
            parse_date_in_range("2024-03-02", "2024-01-01", "2024-03-01"),
            Err(InputError::OutOfRange)
        );
    }

    #[test]
    fn ticker_pair_is_trimmed_and_upper_cased() {
        assert_eq!(
            parse_ticker_pair("aapl, msft").unwrap(),
            ("AAPL".to_string(), "MSFT".to_string())
        );
    }

    #[test]
    fn ticker_counts_other_than_two_are_rejected() {
        assert!(parse_ticker_pair("AAPL").is_err());
        assert!(parse_ticker_pair("AAPL, MSFT, GOOG").is_err());
        assert!(parse_ticker_pair("AAPL, ").is_err());
        assert!(parse_ticker_pair("").is_err());
    }

    #[test]
    fn amount_must_be_a_positive_number() {
        assert_eq!(parse_amount("1000").unwrap(), 1000.0);
        assert_eq!(parse_amount(" 12.5 ").unwrap(), 12.5);
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("abc").is_err());
    }
}
