//! Chart rendering.
//!
//! Each renderer writes one PNG and is a pure side effect at the end of the
//! pipeline: the driver logs a failure and moves on to the next chart, and
//! nothing here feeds back into the statistics.

use std::error::Error;

use plotters::prelude::*;

type ChartResult = Result<(), Box<dyn Error>>;

pub const PRICE_HISTORY_PATH: &str = "price_history.png";
pub const DAILY_RETURNS_PATH: &str = "daily_returns.png";
pub const TOTAL_RETURN_PATH: &str = "total_return.png";
pub const PROFIT_PATH: &str = "profit.png";

/// Price history over the common window, one line per symbol.
pub fn price_history(first: (&str, &[f64]), second: (&str, &[f64])) -> ChartResult {
    line_chart(
        PRICE_HISTORY_PATH,
        "Stock Prices Over Time",
        "Days",
        "Price ($)",
        first,
        second,
    )
}

/// Post-entry daily returns, one line per symbol.
pub fn daily_returns_since_entry(first: (&str, &[f64]), second: (&str, &[f64])) -> ChartResult {
    line_chart(
        DAILY_RETURNS_PATH,
        "Daily Returns from Entry Date",
        "Days Since Entry",
        "Daily Return (%)",
        first,
        second,
    )
}

/// Two-bar chart of total return percentages.
pub fn total_return(first: (&str, f64), second: (&str, f64)) -> ChartResult {
    bar_chart(
        TOTAL_RETURN_PATH,
        "Total Return Percentage from Entry to End",
        "Return (%)",
        first,
        second,
    )
}

/// Two-bar chart of simulated profit amounts.
pub fn profit(investment_amount: f64, first: (&str, f64), second: (&str, f64)) -> ChartResult {
    bar_chart(
        PROFIT_PATH,
        &format!("Profit Amount on Investment of {investment_amount}"),
        "Profit Amount ($)",
        first,
        second,
    )
}

fn line_chart(
    path: &str,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    first: (&str, &[f64]),
    second: (&str, &[f64]),
) -> ChartResult {
    let root = BitMapBackend::new(path, (1000, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let n = first.1.len().max(second.1.len()).max(1) as i32;
    let (y_min, y_max) = padded_range(first.1.iter().chain(second.1).copied());
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(1..n + 1, y_min..y_max)?;
    chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;
    for ((ticker, values), color) in [first, second].into_iter().zip([BLUE, RED]) {
        chart
            .draw_series(LineSeries::new(
                values.iter().enumerate().map(|(i, v)| (i as i32 + 1, *v)),
                color,
            ))?
            .label(ticker)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }
    chart.configure_series_labels().border_style(BLACK).draw()?;
    root.present()?;
    Ok(())
}

fn bar_chart(
    path: &str,
    title: &str,
    y_desc: &str,
    first: (&str, f64),
    second: (&str, f64),
) -> ChartResult {
    let root = BitMapBackend::new(path, (600, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    // the range always spans zero so both bars grow out of the axis
    let (y_min, y_max) = padded_range([first.1, second.1, 0.0].into_iter());
    let labels = [first.0.to_string(), second.0.to_string()];
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..1.5f64, y_min..y_max)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(2)
        .x_label_formatter(&|x| {
            labels
                .get(x.round().max(0.0) as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_desc(y_desc)
        .draw()?;
    chart.draw_series(
        [(0.0, first.1, BLUE), (1.0, second.1, RED)]
            .into_iter()
            .map(|(x, value, color)| {
                Rectangle::new([(x - 0.3, 0.0), (x + 0.3, value)], color.filled())
            }),
    )?;
    root.present()?;
    Ok(())
}

fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let span = max - min;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        max.abs().max(1.0) * 0.05
    };
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_range_widens_the_extremes() {
        let (min, max) = padded_range([1.0, 3.0].into_iter());
        assert!(min < 1.0 && max > 3.0);
    }

    #[test]
    fn padded_range_survives_degenerate_input() {
        let (min, max) = padded_range(std::iter::empty());
        assert!(min < max);
        let (min, max) = padded_range([5.0].into_iter());
        assert!(min < 5.0 && max > 5.0);
    }
}
