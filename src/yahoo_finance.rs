use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Error, Debug)]
pub enum YahooError {
    #[error("fetching the data from yahoo! finance failed: {0}")]
    FetchFailed(String),
    #[error("deserializing response from yahoo! finance failed")]
    DeserializeFailed(#[from] serde_json::Error),
    #[error("connection to yahoo! finance server failed")]
    ConnectionFailed(#[from] reqwest::Error),
    #[error("yahoo! finance returned an empty data set")]
    EmptyDataSet,
    #[error("yahoo! finance returned inconsistent data")]
    DataInconsistency,
}

/// One daily row as returned by the chart endpoint. Only `open` and `close`
/// take part in any statistic; the rest ride along untouched.
#[derive(Debug, Clone)]
pub struct Quote {
    pub timestamp: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub volume: u64,
    pub close: f64,
}

#[derive(Deserialize, Debug)]
pub struct YResponse {
    pub chart: YChart,
}

impl YResponse {
    fn check_consistency(&self) -> Result<(), YahooError> {
        for stock in &self.chart.result {
            let n = stock.timestamp.len();
            if n == 0 {
                return Err(YahooError::EmptyDataSet);
            }
            let quote = &stock.indicators.quote[0];
            if quote.open.len() != n
                || quote.high.len() != n
                || quote.low.len() != n
                || quote.volume.len() != n
                || quote.close.len() != n
            {
                return Err(YahooError::DataInconsistency);
            }
        }
        Ok(())
    }

    pub fn from_json(json: serde_json::Value) -> Result<YResponse, YahooError> {
        Ok(serde_json::from_value(json)?)
    }

    pub fn quotes(&self) -> Result<Vec<Quote>, YahooError> {
        self.check_consistency()?;
        let stock: &YQuoteBlock = &self.chart.result[0];
        let mut quotes = Vec::new();
        for (i, &timestamp) in stock.timestamp.iter().enumerate() {
            if let Some(q) = stock.indicators.get_ith_quote(timestamp, i) {
                quotes.push(q);
            }
        }
        Ok(quotes)
    }
}

#[derive(Deserialize, Debug)]
pub struct YChart {
    pub result: Vec<YQuoteBlock>,
    pub error: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct YQuoteBlock {
    pub timestamp: Vec<u64>,
    pub indicators: QuoteBlock,
}

#[derive(Deserialize, Debug)]
pub struct QuoteBlock {
    quote: Vec<QuoteList>,
}

impl QuoteBlock {
    fn get_ith_quote(&self, timestamp: u64, i: usize) -> Option<Quote> {
        let quote = &self.quote[0];
        // a row missing any of its fields is dropped, never patched
        Some(Quote {
            timestamp,
            open: quote.open[i]?,
            high: quote.high[i]?,
            low: quote.low[i]?,
            volume: quote.volume[i]?,
            close: quote.close[i]?,
        })
    }
}

#[derive(Deserialize, Debug)]
pub struct QuoteList {
    pub volume: Vec<Option<u64>>,
    pub high: Vec<Option<f64>>,
    pub close: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
    pub open: Vec<Option<f64>>,
}

async fn chart_request(
    ticker: &str,
    start: &OffsetDateTime,
    end: &OffsetDateTime,
) -> Result<YResponse, YahooError> {
    let start = start.unix_timestamp();
    let end = end.unix_timestamp();
    // sends the petition to yahoo, a fairly common user agent is necessary because otherwise we get rate limited
    let response = Client::new()
        .get(format!("https://query1.finance.yahoo.com/v8/finance/chart/{ticker}?symbol={ticker}&period1={start}&period2={end}&interval=1d"))
        .header("USER-AGENT", "curl/7.68.0")
        .send()
        .await?;
    let parsed: YResponse = serde_json::from_str(&response.text().await?)?;
    if let Some(reason) = &parsed.chart.error {
        return Err(YahooError::FetchFailed(reason.clone()));
    }
    Ok(parsed)
}

/// Returns historic quotes for `ticker` with daily interval.
pub async fn get_quotes(
    ticker: &str,
    start: &OffsetDateTime,
    end: &OffsetDateTime,
) -> Result<Vec<Quote>, YahooError> {
    chart_request(ticker, start, end).await?.quotes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(
        timestamp: Vec<u64>,
        open: Vec<Option<f64>>,
        close: Vec<Option<f64>>,
        volume: Vec<Option<u64>>,
    ) -> YResponse {
        let n = timestamp.len();
        YResponse::from_json(json!({
            "chart": {
                "result": [{
                    "timestamp": timestamp,
                    "indicators": {
                        "quote": [{
                            "open": open,
                            "high": vec![Some(0.0); n],
                            "low": vec![Some(0.0); n],
                            "close": close,
                            "volume": volume,
                        }]
                    }
                }],
                "error": null
            }
        }))
        .unwrap()
    }

    #[test]
    fn rows_missing_open_or_close_are_dropped() {
        let response = response(
            vec![1, 2, 3],
            vec![Some(10.0), None, Some(12.0)],
            vec![Some(11.0), Some(11.5), None],
            vec![Some(0), Some(0), Some(0)],
        );
        let quotes = response.quotes().unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].timestamp, 1);
        assert_eq!(quotes[0].open, 10.0);
        assert_eq!(quotes[0].close, 11.0);
    }

    #[test]
    fn rows_missing_any_other_field_are_dropped_too() {
        // a null volume alone must discard the row, even with valid prices
        let response = response(
            vec![1, 2],
            vec![Some(10.0), Some(12.0)],
            vec![Some(11.0), Some(13.0)],
            vec![Some(500), None],
        );
        let quotes = response.quotes().unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].timestamp, 1);
    }

    #[test]
    fn empty_timestamps_are_an_empty_data_set() {
        let response = response(vec![], vec![], vec![], vec![]);
        assert!(matches!(response.quotes(), Err(YahooError::EmptyDataSet)));
    }

    #[test]
    fn mismatched_array_lengths_are_inconsistent() {
        let response = response(
            vec![1, 2],
            vec![Some(10.0)],
            vec![Some(11.0), Some(12.0)],
            vec![Some(0), Some(0)],
        );
        assert!(matches!(
            response.quotes(),
            Err(YahooError::DataInconsistency)
        ));
    }
}
