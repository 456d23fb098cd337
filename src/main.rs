use std::error::Error;

use chrono::{Datelike, NaiveDate};
use time::macros::time;
use time::{Date, Month, OffsetDateTime};
use tracing::{info, warn};

use versus::input::{self, parse_amount, parse_date, parse_date_in_range, parse_ticker_pair};
use versus::series::PriceSeries;
use versus::yahoo_finance::get_quotes;
use versus::{charts, stats};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (first_ticker, second_ticker) = input::prompt_until(
        "Enter two ticker symbols separated by a comma (e.g., AAPL, MSFT): ",
        parse_ticker_pair,
    )?;
    let date_start = input::prompt_until("Enter the start timeframe in YYYY-MM-DD: ", parse_date)?;
    let date_end = input::prompt_until("Enter the end timeframe in YYYY-MM-DD: ", parse_date)?;
    if date_end < date_start {
        return Err("End date must be after start date.".into());
    }
    let start_str = date_start.format("%Y-%m-%d").to_string();
    let end_str = date_end.format("%Y-%m-%d").to_string();

    // yahoo is always queried from this fixed epoch; the user's start date
    // only applies at the slicing step below
    let epoch = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
    let query_start = query_bound(epoch, false)?;
    let query_end = query_bound(date_end, true)?;

    info!("fetching daily history for {first_ticker}");
    let history_first = PriceSeries::from_quotes(
        &first_ticker,
        get_quotes(&first_ticker, &query_start, &query_end).await?,
    );
    info!("fetching daily history for {second_ticker}");
    let history_second = PriceSeries::from_quotes(
        &second_ticker,
        get_quotes(&second_ticker, &query_start, &query_end).await?,
    );

    let filtered_first = history_first.window(date_start, date_end);
    let filtered_second = history_second.window(date_start, date_end);
    if filtered_first.is_empty() || filtered_second.is_empty() {
        return Err("No data available for the given date range.".into());
    }
    let common_dates = filtered_first.common_dates(&filtered_second);
    if common_dates.is_empty() {
        return Err("No overlapping dates between data sets.".into());
    }

    let close_first = filtered_first.closes_on(&common_dates);
    let close_second = filtered_second.closes_on(&common_dates);
    let std_first = stats::population_std_dev(&close_first);
    let std_second = stats::population_std_dev(&close_second);
    println!("{first_ticker} Close Standard Deviation: {std_first}");
    println!("{second_ticker} Close Standard Deviation: {std_second}");
    println!(
        "{} is more volatile.",
        stats::winner((&first_ticker, std_first), (&second_ticker, std_second))
    );

    let entry_prompt = format!(
        "At what date would you like to assume entry (YYYY-MM-DD) between {start_str} and {end_str}: "
    );
    let entry_date = input::prompt_until(&entry_prompt, |text| {
        parse_date_in_range(text, &start_str, &end_str)
    })?;

    // post-entry slices come from the unfiltered full history
    let post_first = history_first.window(entry_date, date_end);
    let post_second = history_second.window(entry_date, date_end);
    let common_post_dates = post_first.common_dates(&post_second);
    if common_post_dates.is_empty() {
        return Err("No overlapping data after entry date.".into());
    }
    let entry_open_first = post_first
        .first_open()
        .ok_or("No overlapping data after entry date.")?;
    let entry_open_second = post_second
        .first_open()
        .ok_or("No overlapping data after entry date.")?;
    println!("{first_ticker} Open at Entry: {entry_open_first}");
    println!("{second_ticker} Open at Entry: {entry_open_second}");

    let post_close_first = post_first.closes_on(&common_post_dates);
    let post_close_second = post_second.closes_on(&common_post_dates);
    let post_open_first = post_first.opens_on(&common_post_dates);
    let post_open_second = post_second.opens_on(&common_post_dates);

    let changes_first = stats::percent_changes(&post_close_first, &post_open_first);
    let changes_second = stats::percent_changes(&post_close_second, &post_open_second);
    println!(
        "{first_ticker}'s Downward Deviation: {}",
        fmt_deviation(stats::downside_deviation(&changes_first))
    );
    println!(
        "{second_ticker}'s Downward Deviation: {}",
        fmt_deviation(stats::downside_deviation(&changes_second))
    );
    println!(
        "{first_ticker}'s Upward Deviation: {}",
        fmt_deviation(stats::upside_deviation(&changes_first))
    );
    println!(
        "{second_ticker}'s Upward Deviation: {}",
        fmt_deviation(stats::upside_deviation(&changes_second))
    );

    let total_return_first = stats::total_return_pct(entry_open_first, &post_close_first);
    let total_return_second = stats::total_return_pct(entry_open_second, &post_close_second);
    println!(
        "Best profit from entry to {end_str}: {} with {}%",
        stats::winner(
            (&first_ticker, total_return_first),
            (&second_ticker, total_return_second)
        ),
        total_return_first.max(total_return_second)
    );

    let daily_returns_first = stats::daily_returns(&post_close_first);
    let daily_returns_second = stats::daily_returns(&post_close_second);

    let investment_amount = input::prompt_until(
        "Enter an investment amount to simulate profit calculation: ",
        parse_amount,
    )?;
    let profit_first = stats::profit(investment_amount, total_return_first);
    let profit_second = stats::profit(investment_amount, total_return_second);
    println!(
        "If you invested {investment_amount} in {first_ticker}, profit would be {profit_first}"
    );
    println!(
        "If you invested {investment_amount} in {second_ticker}, profit would be {profit_second}"
    );

    match stats::correlation_report(&daily_returns_first, &daily_returns_second) {
        Some((correlation, interpretation)) => {
            match correlation {
                Some(corr) => {
                    println!("Correlation between {first_ticker} and {second_ticker}: {corr:.4}")
                }
                None => {
                    println!("Correlation between {first_ticker} and {second_ticker}: undefined")
                }
            }
            println!("Interpretation: {interpretation}");
        }
        None => println!(
            "Insufficient data to calculate correlation between {first_ticker} and {second_ticker}"
        ),
    }

    render(charts::PRICE_HISTORY_PATH, || {
        charts::price_history(
            (&first_ticker, &close_first),
            (&second_ticker, &close_second),
        )
    });
    render(charts::DAILY_RETURNS_PATH, || {
        charts::daily_returns_since_entry(
            (&first_ticker, &daily_returns_first),
            (&second_ticker, &daily_returns_second),
        )
    });
    render(charts::TOTAL_RETURN_PATH, || {
        charts::total_return(
            (&first_ticker, total_return_first),
            (&second_ticker, total_return_second),
        )
    });
    render(charts::PROFIT_PATH, || {
        charts::profit(
            investment_amount,
            (&first_ticker, profit_first),
            (&second_ticker, profit_second),
        )
    });

    Ok(())
}

/// A chart failure is logged and never aborts the remaining charts.
fn render(path: &str, draw: impl FnOnce() -> Result<(), Box<dyn Error>>) {
    match draw() {
        Ok(()) => info!("chart written to {path}"),
        Err(reason) => warn!("failed to render {path}: {reason}"),
    }
}

fn fmt_deviation(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.4}%"))
        .unwrap_or_else(|| "undefined".to_string())
}

fn match_month(month: u32) -> Month {
    match month {
        1 => Month::January,
        2 => Month::February,
        3 => Month::March,
        4 => Month::April,
        5 => Month::May,
        6 => Month::June,
        7 => Month::July,
        8 => Month::August,
        9 => Month::September,
        10 => Month::October,
        11 => Month::November,
        12 => Month::December,
        _ => Month::January,
    }
}

fn query_bound(
    date: NaiveDate,
    end_of_day: bool,
) -> Result<OffsetDateTime, time::error::ComponentRange> {
    let date = Date::from_calendar_date(date.year(), match_month(date.month()), date.day() as u8)?;
    let clock = if end_of_day {
        time!(23:59:59)
    } else {
        time!(0:00:00)
    };
    Ok(OffsetDateTime::new_utc(date, clock))
}
