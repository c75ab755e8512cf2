//! Building-code requirements by IRC climate zone.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// Minimum specs a climate zone imposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRequirements {
    /// Zone description, e.g. "Cold - Humid".
    pub name: String,
    /// Minimum ceiling insulation R-value.
    pub ceiling_r: u32,
    /// Minimum wall insulation R-value.
    pub wall_r: u32,
    /// Heating/cooling load factor for HVAC sizing.
    pub hvac_btu_per_sqft: f64,
}

/// Code minimums for IRC climate zones 1-8.
#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    zones: HashMap<u8, ZoneRequirements>,
}

impl CodeTable {
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let zones: HashMap<u8, ZoneRequirements> = serde_json::from_str(json)?;
        Ok(Self { zones })
    }

    /// Requirements for a zone. An unknown zone aborts the run; there is no
    /// sensible default code to estimate against.
    pub fn requirements(&self, zone: u8) -> Result<&ZoneRequirements, TableError> {
        self.zones
            .get(&zone)
            .ok_or(TableError::UnknownZone { zone })
    }

    /// Zones sorted by number, for display.
    pub fn sorted(&self) -> Vec<(u8, &ZoneRequirements)> {
        let mut all: Vec<_> = self.zones.iter().map(|(z, r)| (*z, r)).collect();
        all.sort_by_key(|(z, _)| *z);
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_lookup() {
        let json = r#"{
            "5": {"name": "Cool - Humid", "ceiling_r": 49, "wall_r": 20, "hvac_btu_per_sqft": 35.0}
        }"#;
        let table = CodeTable::from_json(json).unwrap();
        let req = table.requirements(5).unwrap();
        assert_eq!(req.ceiling_r, 49);
        assert!(matches!(
            table.requirements(9),
            Err(TableError::UnknownZone { zone: 9 })
        ));
    }
}
