//! Tolerant cell readers and writers shared by every row layout.

use crate::model::new_id;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Positional view over a decoded row; out-of-range cells read as empty.
pub(crate) struct Cells<'a>(pub(crate) &'a [String]);

impl<'a> Cells<'a> {
    fn raw(&self, index: usize) -> &'a str {
        self.0.get(index).map(String::as_str).unwrap_or("")
    }

    fn trimmed(&self, index: usize) -> &'a str {
        self.raw(index).trim()
    }

    /// Free text, kept exactly as stored.
    pub(crate) fn text(&self, index: usize) -> String {
        self.raw(index).to_string()
    }

    /// Free text; a blank cell reads as absent.
    pub(crate) fn optional(&self, index: usize) -> Option<String> {
        Some(self.raw(index))
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    }

    /// An identifier or reference; surrounding whitespace is not part of it.
    pub(crate) fn key(&self, index: usize) -> String {
        self.trimmed(index).to_string()
    }

    /// A missing id is replaced by a fresh one rather than rejected.
    pub(crate) fn id(&self, index: usize) -> String {
        Some(self.key(index))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(new_id)
    }

    /// Whole non-negative quantity; negative values clamp to 0, malformed to 0.
    pub(crate) fn quantity(&self, index: usize) -> u32 {
        let raw = self.trimmed(index);
        let value = raw
            .parse::<i64>()
            .ok()
            .or_else(|| raw.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v.trunc() as i64))
            .unwrap_or(0);
        value.clamp(0, u32::MAX as i64) as u32
    }

    pub(crate) fn number(&self, index: usize) -> f64 {
        self.trimmed(index)
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    /// RFC 3339 instant; missing or malformed reads as now.
    pub(crate) fn timestamp(&self, index: usize) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(self.trimmed(index))
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    /// `YYYY-MM-DD`, also accepting a full ISO timestamp.
    pub(crate) fn date(&self, index: usize) -> Option<NaiveDate> {
        let raw = self.trimmed(index);
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, DATE_FORMAT).ok()
    }

    pub(crate) fn json(&self, index: usize) -> Option<Value> {
        Some(self.trimmed(index))
            .filter(|s| !s.is_empty())
            .and_then(|s| serde_json::from_str(s).ok())
    }
}

pub(crate) fn optional_cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

pub(crate) fn timestamp_cell(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub(crate) fn date_cell(value: &Option<NaiveDate>) -> String {
    value
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

pub(crate) fn json_cell(value: &Option<Value>) -> String {
    value.as_ref().map(Value::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_quantity_tolerance() {
        let row = cells(&["12", "-4", "abc", "7.9", "", " 3 "]);
        let c = Cells(&row);
        assert_eq!(c.quantity(0), 12);
        assert_eq!(c.quantity(1), 0);
        assert_eq!(c.quantity(2), 0);
        assert_eq!(c.quantity(3), 7);
        assert_eq!(c.quantity(4), 0);
        assert_eq!(c.quantity(5), 3);
        assert_eq!(c.quantity(99), 0);
    }

    #[test]
    fn test_text_keeps_padding_but_keys_do_not() {
        let row = cells(&["  m1 ", " Vitamin C ", "   ", ""]);
        let c = Cells(&row);
        assert_eq!(c.key(0), "m1");
        assert_eq!(c.id(0), "m1");
        assert_eq!(c.text(1), " Vitamin C ");
        assert_eq!(c.optional(1).as_deref(), Some(" Vitamin C "));
        assert_eq!(c.optional(2), None);
        assert!(!c.id(2).trim().is_empty());
        assert_eq!(c.key(3), "");
    }

    #[test]
    fn test_dates_and_json() {
        let row = cells(&["2027-03-01", "2027-03-01T00:00:00.000Z", "03/01/2027", "{\"a\":1}", "{oops"]);
        let c = Cells(&row);
        let expected = NaiveDate::from_ymd_opt(2027, 3, 1);
        assert_eq!(c.date(0), expected);
        assert_eq!(c.date(1), expected);
        assert_eq!(c.date(2), None);
        assert_eq!(c.json(3), Some(serde_json::json!({"a": 1})));
        assert_eq!(c.json(4), None);
        assert_eq!(c.json(5), None);
    }

    #[test]
    fn test_missing_id_and_timestamp_are_generated() {
        let row = cells(&[]);
        let c = Cells(&row);
        assert!(!c.id(0).is_empty());
        assert_ne!(c.id(0), c.id(0));
        let before = Utc::now();
        assert!(c.timestamp(3) >= before);
    }
}
