//! Keyword matching of normalized lines against unresolved catalog fields.

use crate::models::catalog::FieldCatalog;

/// A catalog alias found inside a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMatch {
    /// Index of the matched field in the catalog.
    pub field: usize,
    /// Index of the matched alias within the field's aliases.
    pub alias: usize,
}

/// Substring matcher over a field catalog.
pub struct KeywordMatcher<'a> {
    catalog: &'a FieldCatalog,
}

impl<'a> KeywordMatcher<'a> {
    pub fn new(catalog: &'a FieldCatalog) -> Self {
        Self { catalog }
    }

    /// First unresolved field (catalog order) with an alias inside `line`.
    ///
    /// `line` must already be normalized. `resolved[i]` marks field `i` as
    /// settled; settled fields are never matched again.
    pub fn find(&self, line: &str, resolved: &[bool]) -> Option<KeywordMatch> {
        self.matches(line, resolved).next()
    }

    /// Every `(field, alias)` pair present in `line`, in catalog then alias order.
    pub fn matches<'b>(
        &'b self,
        line: &'b str,
        resolved: &'b [bool],
    ) -> impl Iterator<Item = KeywordMatch> + 'b {
        (0..self.catalog.len())
            .filter(move |&field| !resolved.get(field).copied().unwrap_or(false))
            .flat_map(move |field| {
                self.catalog
                    .aliases(field)
                    .iter()
                    .enumerate()
                    .filter(move |(_, alias)| line.contains(alias.as_str()))
                    .map(move |(alias, _)| KeywordMatch { field, alias })
            })
    }

    /// Normalized text of a matched alias.
    pub fn alias_text(&self, m: KeywordMatch) -> &'a str {
        &self.catalog.aliases(m.field)[m.alias]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::FieldSpec;
    use crate::payslip::rules::normalize::normalize_line;
    use pretty_assertions::assert_eq;

    fn catalog() -> FieldCatalog {
        FieldCatalog::new(vec![
            FieldSpec::new("Department", &["department", "emp id"], Some(4)),
            FieldSpec::new("Sub Department", &["sub department"], Some(4)),
            FieldSpec::new("HRA", &["hra"], Some(1)),
        ])
        .unwrap()
    }

    #[test]
    fn test_first_field_in_catalog_order_wins() {
        let catalog = catalog();
        let matcher = KeywordMatcher::new(&catalog);
        let resolved = vec![false; catalog.len()];

        let m = matcher.find("sub department", &resolved).unwrap();
        assert_eq!(m, KeywordMatch { field: 0, alias: 0 });
        assert_eq!(matcher.alias_text(m), "department");
    }

    #[test]
    fn test_resolved_fields_are_skipped() {
        let catalog = catalog();
        let matcher = KeywordMatcher::new(&catalog);
        let resolved = vec![true, false, false];

        let m = matcher.find("sub department", &resolved).unwrap();
        assert_eq!(m, KeywordMatch { field: 1, alias: 0 });
    }

    #[test]
    fn test_second_alias_matches() {
        let catalog = catalog();
        let matcher = KeywordMatcher::new(&catalog);
        let resolved = vec![false; catalog.len()];

        let m = matcher.find("emp id : 42", &resolved).unwrap();
        assert_eq!(m, KeywordMatch { field: 0, alias: 1 });
    }

    #[test]
    fn test_case_and_space_insensitive() {
        let catalog = catalog();
        let matcher = KeywordMatcher::new(&catalog);
        let resolved = vec![false; catalog.len()];

        let upper = matcher.find(&normalize_line("HRA"), &resolved);
        let spaced = matcher.find(&normalize_line(" hra "), &resolved);
        assert_eq!(upper, spaced);
        assert_eq!(upper.map(|m| m.field), Some(2));
    }

    #[test]
    fn test_all_candidates_in_order() {
        let catalog = catalog();
        let matcher = KeywordMatcher::new(&catalog);
        let resolved = vec![false; catalog.len()];

        let all: Vec<_> = matcher.matches("sub department hra", &resolved).collect();
        assert_eq!(
            all,
            vec![
                KeywordMatch { field: 0, alias: 0 },
                KeywordMatch { field: 1, alias: 0 },
                KeywordMatch { field: 2, alias: 0 },
            ]
        );
    }

    #[test]
    fn test_no_match() {
        let catalog = catalog();
        let matcher = KeywordMatcher::new(&catalog);
        assert!(matcher.find("gross pay", &[false; 3]).is_none());
    }
}
