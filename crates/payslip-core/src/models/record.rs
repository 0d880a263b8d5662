//! Extraction record: one optional value per catalog field plus the period.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::catalog::FieldCatalog;

/// Structured result for one payslip.
///
/// Slots follow catalog order and the period comes last. An absent value
/// means the field was not found; once a slot holds a value it is never
/// replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRecord {
    fields: Vec<(String, Option<String>)>,
    period_field: String,
    period: Option<String>,
}

impl ExtractionRecord {
    /// A record with every field absent.
    pub fn empty(catalog: &FieldCatalog) -> Self {
        Self {
            fields: catalog.fields().iter().map(|f| (f.id.clone(), None)).collect(),
            period_field: catalog.period_field().to_string(),
            period: None,
        }
    }

    /// Value of a field or of the period, by identifier.
    pub fn get(&self, id: &str) -> Option<&str> {
        if id == self.period_field {
            return self.period();
        }
        self.fields
            .iter()
            .find(|(field, _)| field == id)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Store a value unless the slot already holds one. Returns whether it was stored.
    pub(crate) fn set_once(&mut self, index: usize, value: String) -> bool {
        match self.fields.get_mut(index) {
            Some((_, slot)) if slot.is_none() => {
                *slot = Some(value);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_period(&mut self, period: Option<String>) {
        self.period = period;
    }

    pub fn period(&self) -> Option<&str> {
        self.period.as_deref()
    }

    pub fn period_field(&self) -> &str {
        &self.period_field
    }

    /// All `(identifier, value)` pairs in output order, period last.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(id, value)| (id.as_str(), value.as_deref()))
            .chain(std::iter::once((self.period_field.as_str(), self.period())))
    }

    /// Column names in output order.
    pub fn headers(&self) -> Vec<String> {
        self.iter().map(|(id, _)| id.to_string()).collect()
    }

    /// Tabular row in output order; absent values become empty cells.
    pub fn to_row(&self) -> Vec<String> {
        self.iter()
            .map(|(_, value)| value.unwrap_or_default().to_string())
            .collect()
    }

    /// Number of catalog fields holding a value.
    pub fn resolved_count(&self) -> usize {
        self.fields.iter().filter(|(_, v)| v.is_some()).count()
    }

    /// Identifiers of catalog fields left absent.
    pub fn missing(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(id, _)| id.clone())
            .collect()
    }
}

impl Serialize for ExtractionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        for (id, value) in self.iter() {
            map.serialize_entry(id, &value)?;
        }
        map.end()
    }
}
