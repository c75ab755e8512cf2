//! Permit fee schedule by building type.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::building::BuildingType;
use crate::error::TableError;

/// Permit pricing for one building type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermitFee {
    pub base_fee: Decimal,
    /// Added per square foot of living area.
    pub per_sqft: Decimal,
}

impl PermitFee {
    pub fn cost(&self, living_sqft: f64) -> Decimal {
        let sqft = Decimal::try_from(living_sqft).unwrap_or(Decimal::ZERO);
        self.base_fee + self.per_sqft * sqft
    }
}

/// Permit schedule keyed by building-type key.
#[derive(Debug, Clone, Default)]
pub struct PermitSchedule {
    types: HashMap<String, PermitFee>,
}

impl PermitSchedule {
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let types: HashMap<String, PermitFee> = serde_json::from_str(json)?;
        Ok(Self { types })
    }

    /// Fee schedule for a building type, if one exists.
    pub fn fee(&self, building_type: BuildingType) -> Option<&PermitFee> {
        self.types.get(building_type.key())
    }

    pub fn merge(&mut self, layer: &HashMap<String, PermitFee>) {
        for (key, fee) in layer {
            self.types.insert(key.clone(), fee.clone());
        }
    }

    /// Types sorted by key, for display.
    pub fn sorted(&self) -> Vec<(&String, &PermitFee)> {
        let mut all: Vec<_> = self.types.iter().collect();
        all.sort_by(|(a, _), (b, _)| a.cmp(b));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fee_scales_with_area() {
        let json = r#"{
            "single_family": {"base_fee": "500.00", "per_sqft": "0.35"}
        }"#;
        let schedule = PermitSchedule::from_json(json).unwrap();
        let fee = schedule.fee(BuildingType::SingleFamily).unwrap();
        assert_eq!(fee.cost(1000.0), dec!(850.00));
        assert!(schedule.fee(BuildingType::Industrial).is_none());
    }
}
