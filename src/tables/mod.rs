//! Reference tables: materials catalog, building codes, labor rates, and
//! permit schedules.
//!
//! Built-in tables are embedded JSON, loaded once at startup and read-only
//! afterwards. Override layers merge on top with precedence
//! user override > regional default > built-in default; whichever layer last
//! touched pricing is recorded so the accuracy scorer can tell local pricing
//! from shipped defaults.

mod codes;
mod labor;
mod materials;
mod overrides;
mod permits;

pub use codes::{CodeTable, ZoneRequirements};
pub use labor::{LaborRate, LaborSchedule};
pub use materials::{MaterialCatalog, MaterialEntry, Unit};
pub use overrides::TableOverrides;
pub use permits::{PermitFee, PermitSchedule};

use crate::error::TableError;

const MATERIALS_JSON: &str = include_str!("data/materials.json");
const CODES_JSON: &str = include_str!("data/codes.json");
const LABOR_JSON: &str = include_str!("data/labor.json");
const PERMITS_JSON: &str = include_str!("data/permits.json");

/// Which pricing layer is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingLocality {
    /// Shipped defaults only.
    Builtin,
    /// A regional table was merged in.
    Regional,
    /// The user's own overrides are in effect.
    UserOverride,
}

/// The full set of reference tables an estimate runs against.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    pub materials: MaterialCatalog,
    pub codes: CodeTable,
    pub labor: LaborSchedule,
    pub permits: PermitSchedule,
    locality: PricingLocality,
}

impl ReferenceTables {
    /// Load the built-in tables. Fails only if the embedded data is
    /// malformed, which is a build defect rather than a runtime condition.
    pub fn builtin() -> Result<Self, TableError> {
        Ok(Self {
            materials: MaterialCatalog::from_json(MATERIALS_JSON)?,
            codes: CodeTable::from_json(CODES_JSON)?,
            labor: LaborSchedule::from_json(LABOR_JSON)?,
            permits: PermitSchedule::from_json(PERMITS_JSON)?,
            locality: PricingLocality::Builtin,
        })
    }

    /// Merge a regional pricing layer. User overrides applied later still win.
    pub fn apply_regional(&mut self, layer: &TableOverrides) {
        if layer.is_empty() {
            return;
        }
        self.merge(layer);
        if self.locality == PricingLocality::Builtin {
            self.locality = PricingLocality::Regional;
        }
    }

    /// Merge the user's own overrides on top of everything else.
    pub fn apply_user(&mut self, layer: &TableOverrides) {
        if layer.is_empty() {
            return;
        }
        self.merge(layer);
        self.locality = PricingLocality::UserOverride;
    }

    fn merge(&mut self, layer: &TableOverrides) {
        self.materials.merge(&layer.materials);
        self.labor.merge(&layer.labor);
        self.permits.merge(&layer.permits);
    }

    pub fn locality(&self) -> PricingLocality {
        self.locality
    }

    /// True when any layer beyond the shipped defaults is in effect.
    pub fn uses_local_pricing(&self) -> bool {
        self.locality != PricingLocality::Builtin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    #[test]
    fn test_builtin_tables_load() {
        let tables = ReferenceTables::builtin().unwrap();
        assert!(!tables.uses_local_pricing());
        assert!(tables.materials.len() > 20);
        // All eight IRC zones present
        for zone in 1..=8 {
            assert!(tables.codes.requirements(zone).is_ok(), "zone {zone}");
        }
        assert!(tables.labor.rate("framing").is_ok());
    }

    #[test]
    fn test_override_precedence_user_beats_regional() {
        let mut tables = ReferenceTables::builtin().unwrap();

        let regional = TableOverrides {
            materials: HashMap::from([(
                "stud_2x4".to_string(),
                MaterialEntry {
                    name: "2x4x8 stud".to_string(),
                    unit: Unit::Each,
                    unit_price: dec!(5.00),
                },
            )]),
            ..TableOverrides::default()
        };
        tables.apply_regional(&regional);
        assert_eq!(tables.locality(), PricingLocality::Regional);
        assert_eq!(
            tables.materials.price("stud_2x4").unwrap().unit_price,
            dec!(5.00)
        );

        let user = TableOverrides {
            materials: HashMap::from([(
                "stud_2x4".to_string(),
                MaterialEntry {
                    name: "2x4x8 stud".to_string(),
                    unit: Unit::Each,
                    unit_price: dec!(3.75),
                },
            )]),
            ..TableOverrides::default()
        };
        tables.apply_user(&user);
        assert_eq!(tables.locality(), PricingLocality::UserOverride);
        assert_eq!(
            tables.materials.price("stud_2x4").unwrap().unit_price,
            dec!(3.75)
        );
        assert!(tables.uses_local_pricing());
    }

    #[test]
    fn test_empty_layer_does_not_change_locality() {
        let mut tables = ReferenceTables::builtin().unwrap();
        tables.apply_user(&TableOverrides::default());
        assert_eq!(tables.locality(), PricingLocality::Builtin);
    }
}
