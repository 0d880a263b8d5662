//! Tiered value resolution for a matched keyword line.
//!
//! Tiers run in a fixed priority order and the first one that yields a
//! non-empty value wins:
//!
//! 1. [`ResolutionTier::InlineColon`] - text after the first `:` on the line.
//! 2. [`ResolutionTier::InlineDash`] - last `-` segment, if it holds a digit.
//! 3. [`ResolutionTier::FixedOffset`] - the line `offset` rows below.
//! 4. [`ResolutionTier::Lookahead`] - first non-blank line within the bound.
//!
//! Every tier is soft: a miss hands over to the next tier.

use serde::{Deserialize, Serialize};

use super::normalize::normalize_line;
use crate::models::catalog::{FieldCatalog, FieldSpec};

/// Default number of lines scanned by the lookahead tier.
pub const DEFAULT_LOOKAHEAD_LIMIT: usize = 6;

/// One value resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTier {
    InlineColon,
    InlineDash,
    FixedOffset,
    Lookahead,
}

/// Priority order in which tiers are tried.
pub const TIER_ORDER: [ResolutionTier; 4] = [
    ResolutionTier::InlineColon,
    ResolutionTier::InlineDash,
    ResolutionTier::FixedOffset,
    ResolutionTier::Lookahead,
];

/// Everything a tier may look at for one keyword hit.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Full line sequence of the document.
    pub lines: &'a [String],
    /// Index of the line holding the keyword.
    pub index: usize,
    /// Field whose keyword matched.
    pub field: &'a FieldSpec,
    /// Normalized alias that matched.
    pub alias: &'a str,
    /// Catalog, for alias collision checks.
    pub catalog: &'a FieldCatalog,
    /// Lookahead bound in lines.
    pub lookahead_limit: usize,
}

impl ResolveContext<'_> {
    fn raw_line(&self) -> &str {
        self.lines[self.index].trim()
    }

    /// Whether `candidate` (normalized) carries any alias other than the matched one.
    fn has_foreign_alias(&self, candidate: &str) -> bool {
        self.catalog
            .all_aliases()
            .any(|alias| alias != self.alias && candidate.contains(alias))
    }
}

/// A value accepted by one of the tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub tier: ResolutionTier,
}

impl ResolutionTier {
    /// Run this tier alone.
    pub fn resolve(self, ctx: &ResolveContext<'_>) -> Option<String> {
        let value = match self {
            Self::InlineColon => inline_colon(ctx),
            Self::InlineDash => inline_dash(ctx),
            Self::FixedOffset => fixed_offset(ctx),
            Self::Lookahead => lookahead(ctx),
        };
        value.filter(|v| !v.is_empty())
    }
}

fn inline_colon(ctx: &ResolveContext<'_>) -> Option<String> {
    ctx.raw_line()
        .split_once(':')
        .map(|(_, value)| value.trim().to_string())
}

fn inline_dash(ctx: &ResolveContext<'_>) -> Option<String> {
    let line = ctx.raw_line();

    // A line with a colon is owned by the colon tier even when its value was empty.
    if line.contains(':') || !line.contains('-') {
        return None;
    }

    // Labels such as "Net Salary Payable (A - B - C)" carry dashes too; only
    // a trailing segment with a digit counts as a value.
    line.rsplit('-')
        .next()
        .map(str::trim)
        .filter(|segment| segment.chars().any(|c| c.is_ascii_digit()))
        .map(str::to_string)
}

fn fixed_offset(ctx: &ResolveContext<'_>) -> Option<String> {
    let offset = ctx.field.offset?;
    let candidate = ctx
        .index
        .checked_add(offset)
        .and_then(|i| ctx.lines.get(i))?
        .trim();

    if ctx.has_foreign_alias(&normalize_line(candidate)) {
        return None;
    }
    Some(candidate.to_string())
}

fn lookahead(ctx: &ResolveContext<'_>) -> Option<String> {
    if ctx.field.offset.is_some() {
        return None;
    }

    for step in 1..=ctx.lookahead_limit {
        let Some(line) = ctx.index.checked_add(step).and_then(|i| ctx.lines.get(i)) else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if ctx.has_foreign_alias(&normalize_line(line)) {
            return None;
        }
        return Some(line.to_string());
    }
    None
}

/// Runs the tier chain for keyword hits.
#[derive(Debug, Clone)]
pub struct ValueResolver {
    lookahead_limit: usize,
}

impl ValueResolver {
    pub fn new() -> Self {
        Self {
            lookahead_limit: DEFAULT_LOOKAHEAD_LIMIT,
        }
    }

    /// Set the lookahead bound.
    pub fn with_lookahead_limit(mut self, limit: usize) -> Self {
        self.lookahead_limit = limit;
        self
    }

    pub fn lookahead_limit(&self) -> usize {
        self.lookahead_limit
    }

    /// Resolve the value for the keyword hit of `field`/`alias` on line `index`.
    pub fn resolve(
        &self,
        catalog: &FieldCatalog,
        lines: &[String],
        index: usize,
        field: usize,
        alias: &str,
    ) -> Option<Resolved> {
        let ctx = ResolveContext {
            lines,
            index,
            field: catalog.field(field),
            alias,
            catalog,
            lookahead_limit: self.lookahead_limit,
        };

        TIER_ORDER.iter().find_map(|&tier| {
            tier.resolve(&ctx)
                .map(|value| Resolved { value, tier })
        })
    }
}

impl Default for ValueResolver {
    fn default() -> Self {
        Self::new()
    }
}
