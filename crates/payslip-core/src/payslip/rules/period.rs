//! Reporting period (month/year) detection.

use chrono::NaiveDate;
use regex::Captures;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::patterns::MONTH_YEAR;
use super::FieldExtractor;

/// Day of month used when building the period date, clear of month-end rollover.
pub const DEFAULT_ANCHOR_DAY: u32 = 4;

/// A detected reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    /// Date on the anchor day of the period's month.
    pub date: NaiveDate,
    /// Display label, e.g. `Aug-2025`.
    pub label: String,
    /// Matched source text, e.g. `AUG 2025`.
    pub source: String,
}

/// Month/year token extractor.
#[derive(Debug, Clone)]
pub struct PeriodExtractor {
    anchor_day: u32,
}

impl PeriodExtractor {
    pub fn new() -> Self {
        Self {
            anchor_day: DEFAULT_ANCHOR_DAY,
        }
    }

    /// Set the day of month used to build the period date.
    pub fn with_anchor_day(mut self, day: u32) -> Self {
        self.anchor_day = day;
        self
    }

    /// Scan lines in order; the first line carrying a month/year token decides.
    ///
    /// A token that matches the pattern but does not form a valid date is
    /// reported as no period.
    pub fn extract_from_lines(&self, lines: &[String]) -> Option<ReportingPeriod> {
        let (index, line) = lines
            .iter()
            .enumerate()
            .find(|(_, line)| MONTH_YEAR.is_match(line))?;

        let period = self.extract(line);
        match &period {
            Some(p) => debug!("Found period {} on line {}", p.label, index),
            None => warn!("Unparseable period token on line {}: {:?}", index, line),
        }
        period
    }

    fn normalize(&self, caps: &Captures<'_>) -> Option<ReportingPeriod> {
        let month = capitalize(&caps[1]);
        let year = &caps[2];

        let date = NaiveDate::parse_from_str(
            &format!("{:02}-{}-{}", self.anchor_day, month, year),
            "%d-%b-%Y",
        )
        .ok()?;

        Some(ReportingPeriod {
            date,
            label: date.format("%b-%Y").to_string(),
            source: caps[0].to_string(),
        })
    }
}

impl Default for PeriodExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PeriodExtractor {
    type Output = ReportingPeriod;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        MONTH_YEAR.captures(text).and_then(|caps| self.normalize(&caps))
    }
}

/// Period label (`Mon-YYYY`) of a line sequence with the default anchor day.
pub fn extract_period(lines: &[String]) -> Option<String> {
    PeriodExtractor::new()
        .extract_from_lines(lines)
        .map(|p| p.label)
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_period_label() {
        let lines = lines(&["ACME PAYROLL", "PAY PERIOD AUG 2025 SLIP"]);
        assert_eq!(extract_period(&lines), Some("Aug-2025".to_string()));
    }

    #[test]
    fn test_period_mixed_case_and_spacing() {
        let lines = lines(&["Payslip for the month of dEc   2024"]);
        let period = PeriodExtractor::new().extract_from_lines(&lines).unwrap();
        assert_eq!(period.label, "Dec-2024");
        assert_eq!(period.date, NaiveDate::from_ymd_opt(2024, 12, 4).unwrap());
        assert_eq!(period.source, "dEc   2024");
    }

    #[test]
    fn test_no_period() {
        let lines = lines(&["Basic", "5000", "AUGUST 2025", "AUG2025", "Aug 25"]);
        assert_eq!(extract_period(&lines), None);
    }

    #[test]
    fn test_first_line_wins() {
        let lines = lines(&["Jul 2025", "Aug 2025"]);
        assert_eq!(extract_period(&lines), Some("Jul-2025".to_string()));
    }

    #[test]
    fn test_unparseable_token_is_absent() {
        let lines = lines(&["Feb 2025", "Mar 2025"]);
        let extractor = PeriodExtractor::new().with_anchor_day(30);
        assert_eq!(extractor.extract_from_lines(&lines), None);
    }

    #[test]
    fn test_extract_first_token_of_line() {
        let extractor = PeriodExtractor::new();
        let period = extractor.extract("from JAN 2025 to MAR 2025").unwrap();
        assert_eq!(period.label, "Jan-2025");
        assert_eq!(extractor.extract("no period here"), None);
    }
}
