//! Display rendering for DuckDB values
//!
//! Query rows are logged as plain text, so every value is turned into the
//! string DuckDB itself would produce when casting to VARCHAR: `NULL` for
//! nulls, ISO dates, doubles with at least one fractional digit, intervals as
//! `98 days 01:30:00`, structs as `{'a': 1}`, and so on.

use std::fmt;

use chrono::{DateTime, NaiveTime};
use duckdb::types::{TimeUnit, Value};

const SECONDS_PER_DAY: i64 = 86_400;
const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_MINUTE: i64 = 60 * MICROS_PER_SECOND;
const MICROS_PER_HOUR: i64 = 60 * MICROS_PER_MINUTE;

/// DuckDB stores `'infinity'` dates and timestamps as the extreme values
const DATE_INFINITY: i32 = i32::MAX;
const TIMESTAMP_INFINITY: i64 = i64::MAX;

/// Render a single value as display text
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::TinyInt(i) => i.to_string(),
        Value::SmallInt(i) => i.to_string(),
        Value::Int(i) => i.to_string(),
        Value::BigInt(i) => i.to_string(),
        Value::HugeInt(i) => i.to_string(),
        Value::UTinyInt(i) => i.to_string(),
        Value::USmallInt(i) => i.to_string(),
        Value::UInt(i) => i.to_string(),
        Value::UBigInt(i) => i.to_string(),
        Value::Float(f) => render_float(*f),
        Value::Double(f) => render_float(*f),
        Value::Decimal(d) => d.to_string(),
        Value::Text(s) => s.clone(),
        Value::Enum(s) => s.clone(),
        Value::Blob(bytes) => render_blob(bytes),
        Value::Date32(days) => render_date(*days),
        Value::Timestamp(unit, raw) => render_timestamp(unit, *raw),
        Value::Time64(unit, raw) => render_time(unit, *raw),
        Value::Interval {
            months,
            days,
            nanos,
        } => render_interval(*months, *days, *nanos),
        Value::List(items) => render_list(items),
        Value::Array(items) => render_list(items),
        Value::Struct(fields) => {
            let fields: Vec<String> = fields
                .iter()
                .map(|(name, v)| format!("'{}': {}", name, render_value(v)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
        Value::Map(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{}={}", render_value(k), render_value(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        Value::Union(inner) => render_value(inner),
        other => format!("{:?}", other),
    }
}

/// Render a full row, one string per column
pub fn render_row(values: &[Value]) -> Vec<String> {
    values.iter().map(render_value).collect()
}

/// Shortest round-trip digits, switching to `1e+20` style outside [1e-4, 1e16)
fn render_float<F>(value: F) -> String
where
    F: Copy + Into<f64> + fmt::Debug + fmt::LowerExp,
{
    let wide: f64 = value.into();
    if wide.is_nan() {
        return "nan".to_string();
    }
    if wide.is_infinite() {
        return if wide > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if wide == 0.0 {
        return format!("{:?}", value);
    }

    let scientific = format!("{:e}", value);
    match scientific
        .split_once('e')
        .and_then(|(mantissa, exp)| exp.parse::<i32>().ok().map(|exp| (mantissa, exp)))
    {
        Some((mantissa, exp)) if !(-4..16).contains(&exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        _ => format!("{:?}", value),
    }
}

fn to_micros(unit: &TimeUnit, raw: i64) -> Option<i64> {
    match unit {
        TimeUnit::Second => raw.checked_mul(MICROS_PER_SECOND),
        TimeUnit::Millisecond => raw.checked_mul(1_000),
        TimeUnit::Microsecond => Some(raw),
        TimeUnit::Nanosecond => Some(raw.div_euclid(1_000)),
    }
}

/// `.5`, `.123456`, or nothing for whole seconds
fn fraction(micros: i64) -> String {
    let sub = micros.rem_euclid(MICROS_PER_SECOND);
    if sub == 0 {
        return String::new();
    }
    let digits = format!("{:06}", sub);
    format!(".{}", digits.trim_end_matches('0'))
}

fn render_date(days: i32) -> String {
    match days {
        DATE_INFINITY => return "infinity".to_string(),
        d if d == -DATE_INFINITY => return "-infinity".to_string(),
        _ => {}
    }
    DateTime::from_timestamp(i64::from(days) * SECONDS_PER_DAY, 0)
        .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| format!("{} days", days))
}

fn render_timestamp(unit: &TimeUnit, raw: i64) -> String {
    match raw {
        TIMESTAMP_INFINITY => return "infinity".to_string(),
        r if r == -TIMESTAMP_INFINITY => return "-infinity".to_string(),
        _ => {}
    }
    to_micros(unit, raw)
        .and_then(|micros| {
            DateTime::from_timestamp_micros(micros).map(|dt| {
                format!(
                    "{}{}",
                    dt.naive_utc().format("%Y-%m-%d %H:%M:%S"),
                    fraction(micros)
                )
            })
        })
        .unwrap_or_else(|| raw.to_string())
}

fn render_time(unit: &TimeUnit, raw: i64) -> String {
    to_micros(unit, raw)
        .and_then(|micros| {
            let secs = u32::try_from(micros.div_euclid(MICROS_PER_SECOND)).ok()?;
            let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)?;
            Some(format!("{}{}", time.format("%H:%M:%S"), fraction(micros)))
        })
        .unwrap_or_else(|| raw.to_string())
}

fn plural(count: i64, unit: &str) -> String {
    if count.abs() == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

/// `1 year 2 months 3 days 04:05:06.5`, or `00:00:00` for an empty interval
fn render_interval(months: i32, days: i32, nanos: i64) -> String {
    let mut parts = Vec::new();

    let years = i64::from(months / 12);
    let months = i64::from(months % 12);
    if years != 0 {
        parts.push(plural(years, "year"));
    }
    if months != 0 {
        parts.push(plural(months, "month"));
    }
    if days != 0 {
        parts.push(plural(i64::from(days), "day"));
    }

    let micros = nanos / 1_000;
    if micros != 0 || parts.is_empty() {
        let sign = if micros < 0 { "-" } else { "" };
        let micros = micros.unsigned_abs() as i64;
        parts.push(format!(
            "{}{:02}:{:02}:{:02}{}",
            sign,
            micros / MICROS_PER_HOUR,
            (micros % MICROS_PER_HOUR) / MICROS_PER_MINUTE,
            (micros % MICROS_PER_MINUTE) / MICROS_PER_SECOND,
            fraction(micros)
        ));
    }

    parts.join(" ")
}

fn render_list(items: &[Value]) -> String {
    format!("[{}]", render_row(items).join(", "))
}

fn render_blob(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| {
            if b.is_ascii_graphic() || *b == b' ' {
                (*b as char).to_string()
            } else {
                format!("\\x{:02X}", b)
            }
        })
        .collect()
}
