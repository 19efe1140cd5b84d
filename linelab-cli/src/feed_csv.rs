//! CSV bar feed.
//!
//! Header: `datetime,open,high,low,close,volume[,openinterest]`. Dates are
//! `%Y-%m-%d` or `%Y-%m-%d %H:%M:%S`. Rows must be in chronological order.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use linelab_core::Bar;

#[derive(Debug, Deserialize)]
struct CsvRow {
    datetime: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    #[serde(default)]
    openinterest: Option<f64>,
}

pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid datetime '{s}'"))?;
    date.and_hms_opt(0, 0, 0)
        .with_context(|| format!("invalid datetime '{s}'"))
}

/// Parse bars from any CSV reader.
pub fn parse_bars<R: Read>(reader: R) -> Result<Vec<Bar>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars: Vec<Bar> = Vec::new();

    for (line, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = row.with_context(|| format!("malformed CSV row {}", line + 1))?;
        let datetime = parse_datetime(&row.datetime)?;
        if let Some(prev) = bars.last() {
            if datetime <= prev.datetime {
                bail!(
                    "row {}: datetime {datetime} is not after {}",
                    line + 1,
                    prev.datetime
                );
            }
        }
        let bar = Bar::new(datetime, row.open, row.high, row.low, row.close, row.volume)
            .with_open_interest(row.openinterest.unwrap_or(0.0));
        bars.push(bar);
    }

    Ok(bars)
}

pub fn read_bars(path: &Path) -> Result<Vec<Bar>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open data file {}", path.display()))?;
    let bars = parse_bars(file).with_context(|| format!("failed to read {}", path.display()))?;
    tracing::debug!(path = %path.display(), bars = bars.len(), "read CSV feed");
    Ok(bars)
}

/// Write bars in the same layout `parse_bars` reads.
/// Date only for daily bars; intraday bars keep their time of day.
fn format_datetime(dt: &NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

pub fn write_bars<W: Write>(writer: W, bars: &[Bar]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "datetime",
        "open",
        "high",
        "low",
        "close",
        "volume",
        "openinterest",
    ])?;
    for b in bars {
        wtr.write_record([
            &format_datetime(&b.datetime),
            &format!("{:.2}", b.open),
            &format!("{:.2}", b.high),
            &format!("{:.2}", b.low),
            &format!("{:.2}", b.close),
            &format!("{:.0}", b.volume),
            &format!("{:.0}", b.open_interest),
        ])?;
    }
    wtr.flush().context("failed to flush CSV writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use linelab_core::data::synthetic_bars;

    #[test]
    fn parses_dates_and_optional_open_interest() {
        let data = "\
datetime,open,high,low,close,volume
2006-01-02,3578.73,3605.95,3578.73,3604.33,0
2006-01-03 15:30:00,3604.08,3638.42,3601.84,3614.34,0
";
        let bars = parse_bars(data.as_bytes()).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 3604.33);
        assert_eq!(bars[0].open_interest, 0.0);
        assert_eq!(
            bars[1].datetime,
            NaiveDate::from_ymd_opt(2006, 1, 3)
                .unwrap()
                .and_hms_opt(15, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn rejects_out_of_order_rows() {
        let data = "\
datetime,open,high,low,close,volume,openinterest
2006-01-03,1,1,1,1,0,0
2006-01-02,1,1,1,1,0,0
";
        let err = parse_bars(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("not after"));
    }

    #[test]
    fn rejects_bad_date() {
        let data = "datetime,open,high,low,close,volume\n01/02/2006,1,1,1,1,0\n";
        assert!(parse_bars(data.as_bytes()).is_err());
    }

    #[test]
    fn intraday_bars_keep_time_of_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let bars: Vec<Bar> = [(0, 0), (9, 30), (9, 35)]
            .iter()
            .map(|&(h, m)| {
                let dt = day.and_hms_opt(h, m, 0).unwrap();
                Bar::new(dt, 10.0, 11.0, 9.5, 10.5, 300.0)
            })
            .collect();

        let mut out = Vec::new();
        write_bars(&mut out, &bars).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\n2024-03-01,"));
        assert!(text.contains("\n2024-03-01 09:35:00,"));

        let back = parse_bars(text.as_bytes()).unwrap();
        let times: Vec<_> = back.iter().map(|b| b.datetime).collect();
        let expected: Vec<_> = bars.iter().map(|b| b.datetime).collect();
        assert_eq!(times, expected);
    }

    #[test]
    fn write_then_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.csv");
        let bars = synthetic_bars(30, 9);
        write_bars(std::fs::File::create(&path).unwrap(), &bars).unwrap();
        let read = read_bars(&path).unwrap();
        assert_eq!(read.len(), 30);
        for (a, b) in read.iter().zip(&bars) {
            assert_eq!(a.datetime, b.datetime);
            assert_eq!(a.close, b.close);
        }
    }
}
