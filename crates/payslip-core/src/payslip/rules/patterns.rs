//! Common regex patterns for payslip extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Reporting period: "AUG 2025", "Aug  2025"
    pub static ref MONTH_YEAR: Regex = Regex::new(
        r"(?i)\b(JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)\s+(\d{4})\b"
    ).unwrap();
}
