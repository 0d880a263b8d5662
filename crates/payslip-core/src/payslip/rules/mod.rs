//! Rule-based building blocks of payslip field extraction.

pub mod normalize;
pub mod matcher;
pub mod resolver;
pub mod period;
pub mod patterns;

pub use normalize::normalize_line;
pub use matcher::{KeywordMatch, KeywordMatcher};
pub use resolver::{
    ResolutionTier, ResolveContext, Resolved, ValueResolver, DEFAULT_LOOKAHEAD_LIMIT, TIER_ORDER,
};
pub use period::{extract_period, PeriodExtractor, ReportingPeriod, DEFAULT_ANCHOR_DAY};
pub use patterns::*;

/// Trait for single-line field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}
