//! Single-pass payslip field extraction over a line sequence.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::error::Result;
use crate::models::catalog::FieldCatalog;
use crate::models::config::PayslipConfig;
use crate::models::record::ExtractionRecord;

use super::rules::{
    normalize_line, KeywordMatcher, PeriodExtractor, ReportingPeriod, ResolutionTier,
    ValueResolver,
};
use super::PayslipExtractor;

/// How one field got its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldResolution {
    /// Field identifier.
    pub field: String,
    /// Index of the line holding the keyword.
    pub line: usize,
    /// Normalized alias that matched.
    pub alias: String,
    /// Tier that produced the value.
    pub tier: ResolutionTier,
    /// Accepted value.
    pub value: String,
}

/// Result of extracting one document.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutcome {
    /// Extracted record.
    pub record: ExtractionRecord,
    /// Resolutions in line order.
    pub resolutions: Vec<FieldResolution>,
    /// Detected reporting period, if any.
    pub period: Option<ReportingPeriod>,
    /// Number of lines scanned.
    pub line_count: usize,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionOutcome {
    /// Identifiers of fields left unresolved.
    pub fn missing(&self) -> Vec<String> {
        self.record.missing()
    }
}

/// Keyword-driven payslip extractor.
///
/// Holds the catalog behind an [`Arc`] so one parser can be cloned into
/// concurrent workers; every call owns its own record and flags.
#[derive(Debug, Clone)]
pub struct PayslipParser {
    catalog: Arc<FieldCatalog>,
    resolver: ValueResolver,
    period: PeriodExtractor,
}

impl PayslipParser {
    /// Create a parser over the built-in payslip catalog.
    pub fn new() -> Self {
        Self::with_catalog(FieldCatalog::payslip())
    }

    /// Create a parser over a custom catalog.
    pub fn with_catalog(catalog: impl Into<Arc<FieldCatalog>>) -> Self {
        Self {
            catalog: catalog.into(),
            resolver: ValueResolver::new(),
            period: PeriodExtractor::new(),
        }
    }

    /// Create a parser from configuration (catalog override, lookahead, period day).
    pub fn from_config(config: &PayslipConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_catalog(config.load_catalog()?)
            .with_lookahead_limit(config.extraction.lookahead_limit)
            .with_period_anchor_day(config.extraction.period_anchor_day))
    }

    /// Set the lookahead bound for fields without a fixed offset.
    pub fn with_lookahead_limit(mut self, limit: usize) -> Self {
        self.resolver = self.resolver.with_lookahead_limit(limit);
        self
    }

    /// Set the day used to normalize the reporting period.
    pub fn with_period_anchor_day(mut self, day: u32) -> Self {
        self.period = self.period.with_anchor_day(day);
        self
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Run the forward pass, then the period scan.
    pub fn parse(&self, lines: &[String]) -> ExtractionOutcome {
        let start = Instant::now();
        let catalog = self.catalog.as_ref();
        let matcher = KeywordMatcher::new(catalog);

        let mut record = ExtractionRecord::empty(catalog);
        let mut resolved = vec![false; catalog.len()];
        let mut resolutions = Vec::new();

        for (index, raw) in lines.iter().enumerate() {
            trace!("{}: {}", index, raw);

            let line = normalize_line(raw);
            if line.is_empty() {
                continue;
            }

            // Candidates are tried in catalog order until one yields a value;
            // at most one field is settled per line.
            let hit = matcher.matches(&line, &resolved).find_map(|m| {
                let alias = matcher.alias_text(m);
                self.resolver
                    .resolve(catalog, lines, index, m.field, alias)
                    .map(|r| (m, alias, r))
            });

            let Some((m, alias, r)) = hit else {
                continue;
            };

            let field = &catalog.field(m.field).id;
            debug!(
                "Resolved {:?} = {:?} via {:?} (line {}, alias {:?})",
                field, r.value, r.tier, index, alias
            );

            record.set_once(m.field, r.value.clone());
            resolved[m.field] = true;
            resolutions.push(FieldResolution {
                field: field.clone(),
                line: index,
                alias: alias.to_string(),
                tier: r.tier,
                value: r.value,
            });
        }

        let period = self.period.extract_from_lines(lines);
        record.set_period(period.as_ref().map(|p| p.label.clone()));

        info!(
            "Extracted {}/{} fields from {} lines (period: {})",
            record.resolved_count(),
            catalog.len(),
            lines.len(),
            record.period().unwrap_or("not found")
        );

        ExtractionOutcome {
            record,
            resolutions,
            period,
            line_count: lines.len(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl Default for PayslipParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PayslipExtractor for PayslipParser {
    fn extract(&self, lines: &[String]) -> ExtractionOutcome {
        self.parse(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::FieldSpec;
    use pretty_assertions::assert_eq;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_empty_input() {
        let parser = PayslipParser::new();
        let outcome = parser.parse(&[]);

        assert_eq!(outcome.record.resolved_count(), 0);
        assert_eq!(outcome.record.period(), None);
        assert_eq!(outcome.missing().len(), 23);
        assert!(outcome.resolutions.is_empty());
    }

    #[test]
    fn test_colon_value() {
        let parser = PayslipParser::new();
        let outcome = parser.parse(&lines(&["Basic : 1234", "HRA"]));
        assert_eq!(outcome.record.get("Basic"), Some("1234"));
        assert_eq!(outcome.resolutions[0].tier, ResolutionTier::InlineColon);
    }

    #[test]
    fn test_first_match_wins() {
        let parser = PayslipParser::new();
        let outcome = parser.parse(&lines(&["HRA : 800", "HRA : 900"]));
        assert_eq!(outcome.record.get("HRA"), Some("800"));
        assert_eq!(outcome.resolutions.len(), 1);
    }

    #[test]
    fn test_unresolved_keyword_retried_on_later_line() {
        let parser = PayslipParser::new();
        let outcome = parser.parse(&lines(&["Basic", "HRA", "Basic : 5000"]));

        assert_eq!(outcome.record.get("Basic"), Some("5000"));
        assert_eq!(outcome.resolutions[0].line, 2);
    }

    #[test]
    fn test_falls_through_to_next_candidate_on_same_line() {
        let catalog = FieldCatalog::new(vec![
            FieldSpec::new("Department", &["department"], Some(2)),
            FieldSpec::new("Sub Department", &["sub department"], Some(1)),
        ])
        .unwrap();
        let parser = PayslipParser::with_catalog(catalog);

        // Department's offset runs off the end; Sub Department still resolves.
        let outcome = parser.parse(&lines(&["Sub Department", "Payroll"]));
        assert_eq!(outcome.record.get("Department"), None);
        assert_eq!(outcome.record.get("Sub Department"), Some("Payroll"));
    }

    #[test]
    fn test_one_field_per_line() {
        let catalog = FieldCatalog::new(vec![
            FieldSpec::new("Basic", &["basic"], None),
            FieldSpec::new("HRA", &["hra"], None),
        ])
        .unwrap();
        let parser = PayslipParser::with_catalog(catalog);

        let outcome = parser.parse(&lines(&["Basic HRA : 100"]));
        assert_eq!(outcome.record.get("Basic"), Some("100"));
        assert_eq!(outcome.record.get("HRA"), None);
    }

    #[test]
    fn test_deterministic() {
        let parser = PayslipParser::new();
        let input = lines(&[
            "PAY PERIOD AUG 2025 SLIP",
            "Basic",
            "25,000.00",
            "HRA - 10,000.00",
        ]);

        let first = serde_json::to_string(&parser.parse(&input).record).unwrap();
        let second = serde_json::to_string(&parser.parse(&input).record).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_config() {
        let mut config = PayslipConfig::default();
        config.extraction.period_field = "Period".to_string();

        let parser = PayslipParser::from_config(&config).unwrap();
        let outcome = parser.parse(&lines(&["Salary slip for Mar 2024"]));
        assert_eq!(outcome.record.get("Period"), Some("Mar-2024"));
    }
}
