//! Field catalog: the ordered table of payslip fields and their keyword aliases.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, PayslipError};
use crate::payslip::rules::normalize::normalize_line;

/// Identifier of the derived reporting-period field.
pub const PERIOD_FIELD: &str = "Month-Year";

/// Default payslip layout: identifier, aliases, fixed line offset.
///
/// Header fields sit in a label column whose values appear four OCR lines
/// below the label; earnings and deductions sit one line below.
const PAYSLIP_FIELDS: &[(&str, &[&str], Option<usize>)] = &[
    ("Employee Number", &["employee number"], Some(4)),
    ("Department", &["department", "emp id"], Some(4)),
    ("Sub Department", &[" Sub Department"], Some(4)),
    ("Designation", &["designation", "position", "job title"], Some(4)),
    ("Payment mode", &["Payment Mode"], Some(4)),
    ("Actual Payable Days", &["actual payable days"], Some(4)),
    ("Total Working Days", &["total working days"], Some(4)),
    ("Loss Of Pay Days", &["loss of pay days"], Some(4)),
    ("Days Payable", &["days payable"], Some(4)),
    ("Basic", &["basic"], Some(1)),
    ("HRA", &["hra"], Some(1)),
    ("Conveyance Allowance", &["conveyance allowance"], Some(1)),
    ("Other Allowance", &["other allowance"], Some(1)),
    ("City Compensatory Allowance", &["city compensatory allowance"], Some(1)),
    ("Total Earnings (A)", &["total earnings (a)"], Some(1)),
    ("PF Employee", &["pf employee"], Some(1)),
    ("ESI Employee", &["esi employee"], Some(1)),
    ("ESI Employer", &["esi employer"], Some(1)),
    ("Employee Gratuity contributio", &["employee gratuity contributio"], Some(1)),
    ("Total Contributions (B)", &["total contributions (b)"], Some(1)),
    ("Professional Tax", &["professional tax"], Some(1)),
    ("Total Taxes & Deductions (C)", &["total taxes & deductions (c)"], Some(1)),
    (
        "Net Salary Payable (A - B - C)",
        &[
            "net salary payable",
            "net salary payable (a - b - c)",
            "net salary payable ( a - b - c )",
            "net salary payable a-b-c",
        ],
        Some(1),
    ),
];

/// One extractable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Stable identifier, also the output column name.
    pub id: String,

    /// Keyword aliases in match priority order (case/space-insensitive).
    pub aliases: Vec<String>,

    /// Lines below the keyword where the value sits; `None` means bounded lookahead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl FieldSpec {
    pub fn new(id: impl Into<String>, aliases: &[&str], offset: Option<usize>) -> Self {
        Self {
            id: id.into(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            offset,
        }
    }
}

/// Serialized form of a catalog override file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub fields: Vec<FieldSpec>,
}

/// Immutable, ordered field registry.
///
/// Declaration order is both the output column order and the tie-break
/// order when several unresolved fields match the same line. Aliases are
/// normalized once at construction.
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    fields: Vec<FieldSpec>,
    normalized: Vec<Vec<String>>,
    period_field: String,
}

impl FieldCatalog {
    /// Build a catalog from field specs, validating identifiers and aliases.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, CatalogError> {
        Self::with_period_field(fields, PERIOD_FIELD)
    }

    /// Build a catalog whose period column uses a custom identifier.
    pub fn with_period_field(
        fields: Vec<FieldSpec>,
        period_field: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let period_field = period_field.into();

        if fields.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(fields.len());

        for field in &fields {
            if field.id == period_field {
                return Err(CatalogError::ReservedIdentifier(field.id.clone()));
            }
            if !seen.insert(field.id.as_str()) {
                return Err(CatalogError::DuplicateField(field.id.clone()));
            }
            if field.aliases.is_empty() {
                return Err(CatalogError::NoAliases(field.id.clone()));
            }

            let aliases: Vec<String> = field.aliases.iter().map(|a| normalize_line(a)).collect();
            if aliases.iter().any(|a| a.is_empty()) {
                return Err(CatalogError::BlankAlias(field.id.clone()));
            }
            normalized.push(aliases);
        }

        Ok(Self {
            fields,
            normalized,
            period_field,
        })
    }

    /// The built-in payslip catalog.
    pub fn payslip() -> Self {
        let fields: Vec<FieldSpec> = PAYSLIP_FIELDS
            .iter()
            .map(|(id, aliases, offset)| FieldSpec::new(*id, aliases, *offset))
            .collect();
        let normalized = fields
            .iter()
            .map(|f| f.aliases.iter().map(|a| normalize_line(a)).collect())
            .collect();

        Self {
            fields,
            normalized,
            period_field: PERIOD_FIELD.to_string(),
        }
    }

    /// Parse a catalog override from JSON (`{"fields": [...]}`).
    pub fn from_json(json: &str, period_field: &str) -> Result<Self, PayslipError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::with_period_field(file.fields, period_field)?)
    }

    /// Load a catalog override from a JSON file.
    pub fn from_file(path: &Path, period_field: &str) -> Result<Self, PayslipError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content, period_field)
    }

    /// Serialize the catalog in override-file form.
    pub fn to_json(&self) -> Result<String, PayslipError> {
        let file = CatalogFile {
            fields: self.fields.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, index: usize) -> &FieldSpec {
        &self.fields[index]
    }

    /// Normalized aliases of one field, in declared order.
    pub fn aliases(&self, index: usize) -> &[String] {
        &self.normalized[index]
    }

    /// Every normalized alias across all fields, in catalog order.
    pub fn all_aliases(&self) -> impl Iterator<Item = &str> {
        self.normalized.iter().flatten().map(String::as_str)
    }

    /// Position of a field by identifier.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    /// Identifier of the derived period column.
    pub fn period_field(&self) -> &str {
        &self.period_field
    }

    /// Output column order: catalog fields, then the period field.
    pub fn headers(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| f.id.clone())
            .chain(std::iter::once(self.period_field.clone()))
            .collect()
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::payslip()
    }
}
