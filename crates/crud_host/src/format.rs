//! Display formatting for dates, times, and amounts.
//!
//! Components never format values themselves; they call the [`ValueFormatter`] injected through
//! the host services so tests and locales can swap implementations.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Formats raw API values for display. Unparseable input is returned unchanged.
pub trait ValueFormatter {
    /// `YYYY-MM-DD` (or a datetime) to a display date.
    fn format_date(&self, raw: &str) -> String;
    /// `HH:MM[:SS]` to a display time.
    fn format_time(&self, raw: &str) -> String;
    /// ISO datetime to a display date and time.
    fn format_datetime(&self, raw: &str) -> String;
    /// Amount with currency code; `None` uses the formatter default.
    fn format_currency(&self, amount: f64, currency: Option<&str>) -> String;
    /// Plain number with digit grouping.
    fn format_number(&self, value: f64) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// [`ValueFormatter`] backed by `chrono`.
pub struct ChronoFormatter {
    /// Currency code used when a field does not name one.
    pub default_currency: String,
    /// `strftime` pattern for dates.
    pub date_pattern: String,
    /// `strftime` pattern for times.
    pub time_pattern: String,
}

impl Default for ChronoFormatter {
    fn default() -> Self {
        Self {
            default_currency: "USD".to_string(),
            date_pattern: "%b %-d, %Y".to_string(),
            time_pattern: "%H:%M".to_string(),
        }
    }
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .into_iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(raw, pattern).ok())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(raw).map(|parsed| parsed.date()))
}

fn group_digits(integer: &str) -> String {
    let digits: Vec<char> = integer.chars().collect();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.iter().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(*digit);
    }
    out
}

fn format_grouped(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = rendered
        .split_once('.')
        .map(|(integer, fraction)| (integer, Some(fraction)))
        .unwrap_or((rendered.as_str(), None));
    let sign = if value < 0.0 && rendered.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(fraction) => format!("{sign}{}.{fraction}", group_digits(integer)),
        None => format!("{sign}{}", group_digits(integer)),
    }
}

impl ValueFormatter for ChronoFormatter {
    fn format_date(&self, raw: &str) -> String {
        parse_date(raw)
            .map(|date| date.format(&self.date_pattern).to_string())
            .unwrap_or_else(|| raw.to_string())
    }

    fn format_time(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
            .ok()
            .or_else(|| parse_datetime(trimmed).map(|parsed| parsed.time()))
            .map(|time| time.format(&self.time_pattern).to_string())
            .unwrap_or_else(|| raw.to_string())
    }

    fn format_datetime(&self, raw: &str) -> String {
        parse_datetime(raw)
            .map(|parsed| {
                format!(
                    "{} {}",
                    parsed.date().format(&self.date_pattern),
                    parsed.time().format(&self.time_pattern)
                )
            })
            .unwrap_or_else(|| raw.to_string())
    }

    fn format_currency(&self, amount: f64, currency: Option<&str>) -> String {
        let code = currency
            .filter(|code| !code.trim().is_empty())
            .unwrap_or(self.default_currency.as_str());
        format!("{code} {}", format_grouped(amount, 2))
    }

    fn format_number(&self, value: f64) -> String {
        if value.fract() == 0.0 {
            format_grouped(value, 0)
        } else {
            let grouped = format_grouped(value, 6);
            grouped.trim_end_matches('0').to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn dates_and_times_use_patterns_and_pass_through_garbage() {
        let formatter = ChronoFormatter::default();
        assert_eq!(formatter.format_date("2024-03-05"), "Mar 5, 2024");
        assert_eq!(formatter.format_date("2024-03-05T10:30:00.000000Z"), "Mar 5, 2024");
        assert_eq!(formatter.format_time("09:05:00"), "09:05");
        assert_eq!(formatter.format_datetime("2024-03-05 14:00:00"), "Mar 5, 2024 14:00");
        assert_eq!(formatter.format_date("next week"), "next week");
        assert_eq!(formatter.format_time(""), "");
    }

    #[test]
    fn amounts_are_grouped_with_currency_code() {
        let formatter = ChronoFormatter::default();
        assert_eq!(formatter.format_currency(1234.5, None), "USD 1,234.50");
        assert_eq!(formatter.format_currency(-1_000_000.0, Some("SAR")), "SAR -1,000,000.00");
        assert_eq!(formatter.format_currency(0.0, Some(" ")), "USD 0.00");
        assert_eq!(formatter.format_number(1234567.0), "1,234,567");
        assert_eq!(formatter.format_number(12.25), "12.25");
    }
}
