//! Materials catalog: material key to unit price.

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// Unit a material is bought and priced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Each,
    SquareFoot,
    /// Roofing/siding square, 100 sqft.
    Square,
    LinearFoot,
    CubicYard,
    Sheet,
    Bag,
    Roll,
    Pound,
    Hour,
    Ton,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Unit::Each => "ea",
            Unit::SquareFoot => "sqft",
            Unit::Square => "square",
            Unit::LinearFoot => "lf",
            Unit::CubicYard => "cu yd",
            Unit::Sheet => "sheet",
            Unit::Bag => "bag",
            Unit::Roll => "roll",
            Unit::Pound => "lb",
            Unit::Hour => "hr",
            Unit::Ton => "ton",
        };
        f.write_str(label)
    }
}

/// One priced catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    /// Human-readable description.
    pub name: String,
    pub unit: Unit,
    pub unit_price: Decimal,
}

/// Catalog of material prices keyed by stable material key.
#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    entries: HashMap<String, MaterialEntry>,
}

impl MaterialCatalog {
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let entries: HashMap<String, MaterialEntry> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// Price lookup. Unknown keys are a recoverable per-line condition.
    pub fn price(&self, key: &str) -> Result<&MaterialEntry, TableError> {
        self.entries.get(key).ok_or_else(|| TableError::UnknownMaterial {
            key: key.to_string(),
        })
    }

    pub fn get(&self, key: &str) -> Option<&MaterialEntry> {
        self.entries.get(key)
    }

    /// Merge an override layer on top of this catalog.
    pub fn merge(&mut self, layer: &HashMap<String, MaterialEntry>) {
        for (key, entry) in layer {
            self.entries.insert(key.clone(), entry.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by key, for display.
    pub fn sorted(&self) -> Vec<(&String, &MaterialEntry)> {
        let mut all: Vec<_> = self.entries.iter().collect();
        all.sort_by(|(a, _), (b, _)| a.cmp(b));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_and_lookup() {
        let json = r#"{
            "stud_2x4": {"name": "2x4x8 stud", "unit": "each", "unit_price": "4.25"}
        }"#;
        let catalog = MaterialCatalog::from_json(json).unwrap();
        let entry = catalog.price("stud_2x4").unwrap();
        assert_eq!(entry.unit, Unit::Each);
        assert_eq!(entry.unit_price, dec!(4.25));
    }

    #[test]
    fn test_unknown_material_is_typed() {
        let catalog = MaterialCatalog::default();
        let err = catalog.price("unobtainium").unwrap_err();
        assert!(matches!(err, TableError::UnknownMaterial { key } if key == "unobtainium"));
    }

    #[test]
    fn test_merge_replaces_entries() {
        let json = r#"{"nail_lb": {"name": "nails", "unit": "pound", "unit_price": "2.00"}}"#;
        let mut catalog = MaterialCatalog::from_json(json).unwrap();

        let layer = HashMap::from([(
            "nail_lb".to_string(),
            MaterialEntry {
                name: "nails".to_string(),
                unit: Unit::Pound,
                unit_price: dec!(2.50),
            },
        )]);
        catalog.merge(&layer);
        assert_eq!(catalog.price("nail_lb").unwrap().unit_price, dec!(2.50));
    }
}
