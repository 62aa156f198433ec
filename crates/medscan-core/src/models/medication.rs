//! Medication catalog records.

use serde::{Deserialize, Serialize};

/// A single medication entry in the catalog.
///
/// Only the four name-like fields take part in matching. Everything else is
/// payload handed back to the caller untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationRecord {
    /// Opaque unique identifier
    pub id: String,
    /// Primary display name
    pub name: String,
    /// Display name in the secondary language
    #[serde(default)]
    pub name_localized: Option<String>,
    /// Pharmacological (generic) name
    #[serde(default)]
    pub generic_name: Option<String>,
    /// Generic name in the secondary language
    #[serde(default)]
    pub generic_name_localized: Option<String>,
    /// Therapeutic class
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub category_localized: Option<String>,
    #[serde(default)]
    pub primary_use: Option<String>,
    #[serde(default)]
    pub primary_use_localized: Option<String>,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub dosage_localized: Option<String>,
    #[serde(default)]
    pub warnings: Option<String>,
    #[serde(default)]
    pub warnings_localized: Option<String>,
}

/// The name-like fields consulted by the match strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameField {
    Name,
    NameLocalized,
    GenericName,
    GenericNameLocalized,
}

impl NameField {
    /// All name fields, in the order exact matching checks them.
    pub const ALL: [NameField; 4] = [
        NameField::Name,
        NameField::NameLocalized,
        NameField::GenericName,
        NameField::GenericNameLocalized,
    ];
}

impl MedicationRecord {
    /// Create a new record with required fields.
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            name_localized: None,
            generic_name: None,
            generic_name_localized: None,
            category: None,
            category_localized: None,
            primary_use: None,
            primary_use_localized: None,
            dosage: None,
            dosage_localized: None,
            warnings: None,
            warnings_localized: None,
        }
    }

    /// Value of a name-like field. Blank values count as absent.
    pub fn field(&self, field: NameField) -> Option<&str> {
        let value = match field {
            NameField::Name => Some(self.name.as_str()),
            NameField::NameLocalized => self.name_localized.as_deref(),
            NameField::GenericName => self.generic_name.as_deref(),
            NameField::GenericNameLocalized => self.generic_name_localized.as_deref(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Iterate over the present name-like fields.
    pub fn name_fields(&self) -> impl Iterator<Item = (NameField, &str)> {
        NameField::ALL
            .into_iter()
            .filter_map(move |f| self.field(f).map(|v| (f, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_skipped() {
        let mut record = MedicationRecord::new("1".into(), "Ibuprofen".into());
        record.generic_name = Some("ibuprofen".into());
        record.name_localized = Some("   ".into());

        let fields: Vec<_> = record.name_fields().collect();
        assert_eq!(
            fields,
            vec![
                (NameField::Name, "Ibuprofen"),
                (NameField::GenericName, "ibuprofen"),
            ]
        );
    }

    #[test]
    fn test_deserialize_with_missing_optionals() {
        let json = r#"{"id":"7","name":"Panadol","generic_name":"paracetamol"}"#;
        let record: MedicationRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.name, "Panadol");
        assert_eq!(record.generic_name.as_deref(), Some("paracetamol"));
        assert!(record.name_localized.is_none());
        assert!(record.warnings.is_none());
    }
}
