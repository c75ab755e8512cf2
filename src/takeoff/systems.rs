//! Mechanical, electrical, and plumbing takeoffs.

use serde::{Deserialize, Serialize};

use crate::error::EstimateError;

use super::{positive, whole_units};

/// Electrical rough-in quantities, scaled from conditioned area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricalTakeoff {
    pub outlets: u32,
    pub switches: u32,
    pub light_fixtures: u32,
    pub wire_14_2_lf: u32,
    pub wire_12_2_lf: u32,
    pub breakers_15a: u32,
    pub breakers_20a: u32,
    pub panel_amps: u32,
}

/// Electrical takeoff from per-story floor area.
pub fn electrical(floor_area_sqft: f64, stories: u32) -> Result<ElectricalTakeoff, EstimateError> {
    let floor = positive("floor_area_sqft", floor_area_sqft)?;
    if stories == 0 {
        return Err(EstimateError::InvalidStories(stories));
    }
    let total = floor * stories as f64;

    Ok(ElectricalTakeoff {
        // ~1 outlet per 60 sqft, 1 switch per 150, 1 fixture per 100
        outlets: whole_units(total / 60.0).max(10),
        switches: whole_units(total / 150.0).max(5),
        light_fixtures: whole_units(total / 100.0).max(8),
        wire_14_2_lf: whole_units(total * 2.0),
        wire_12_2_lf: whole_units(total * 0.5),
        breakers_15a: whole_units(total / 500.0).max(6),
        breakers_20a: whole_units(total / 600.0).max(4),
        panel_amps: if total > 2000.0 { 200 } else { 100 },
    })
}

/// Plumbing rough-in quantities from fixture counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlumbingTakeoff {
    pub toilets: u32,
    pub sinks: u32,
    pub showers_tubs: u32,
    pub drain_rough_ins: u32,
    pub water_rough_ins: u32,
    pub drain_pipe_lf: u32,
    pub supply_pipe_lf: u32,
    pub water_heaters: u32,
}

/// Plumbing takeoff from bathroom and kitchen counts.
pub fn plumbing(bathrooms: u32, kitchens: u32) -> Result<PlumbingTakeoff, EstimateError> {
    if bathrooms == 0 {
        return Err(EstimateError::InvalidDimension {
            field: "bathrooms",
            value: bathrooms as f64,
        });
    }

    let toilets = bathrooms;
    let sinks = bathrooms + kitchens;
    let showers_tubs = bathrooms;

    let drain_rough_ins = toilets + sinks + showers_tubs + kitchens;
    // Hot and cold for most fixtures
    let water_rough_ins = drain_rough_ins * 2;

    Ok(PlumbingTakeoff {
        toilets,
        sinks,
        showers_tubs,
        drain_rough_ins,
        water_rough_ins,
        drain_pipe_lf: drain_rough_ins * 15,
        supply_pipe_lf: water_rough_ins * 20,
        water_heaters: 1,
    })
}

/// HVAC sizing and distribution quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HvacTakeoff {
    pub btu_required: u32,
    /// System size snapped to standard equipment tonnage.
    pub tonnage: f64,
    pub duct_lf: u32,
    pub supply_registers: u32,
    pub return_registers: u32,
}

/// HVAC takeoff from conditioned area and the zone's BTU/sqft requirement.
pub fn hvac(total_sqft: f64, btu_per_sqft: f64) -> Result<HvacTakeoff, EstimateError> {
    let total = positive("total_sqft", total_sqft)?;
    let rate = positive("btu_per_sqft", btu_per_sqft)?;

    let btu_needed = total * rate;
    let tons = btu_needed / 12_000.0;

    let tonnage = [1.5, 2.0, 2.5, 3.0, 3.5, 4.0]
        .iter()
        .copied()
        .find(|size| tons <= *size)
        .unwrap_or(5.0);

    let supply_registers = whole_units(total / 200.0).max(6);

    Ok(HvacTakeoff {
        btu_required: btu_needed.ceil() as u32,
        tonnage,
        duct_lf: whole_units(total * 0.5),
        supply_registers,
        return_registers: (supply_registers / 3).max(2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_electrical_minimums_hold_for_small_area() {
        let t = electrical(200.0, 1).unwrap();
        assert_eq!(t.outlets, 10);
        assert_eq!(t.switches, 5);
        assert_eq!(t.light_fixtures, 8);
        assert_eq!(t.panel_amps, 100);
    }

    #[test]
    fn test_electrical_scales_with_area() {
        let t = electrical(1500.0, 2).unwrap();
        assert_eq!(t.outlets, 50); // 3000/60
        assert_eq!(t.panel_amps, 200);
        assert_eq!(t.wire_14_2_lf, 6000);
    }

    #[test]
    fn test_plumbing_fixture_math() {
        let t = plumbing(2, 1).unwrap();
        assert_eq!(t.toilets, 2);
        assert_eq!(t.sinks, 3);
        assert_eq!(t.drain_rough_ins, 8);
        assert_eq!(t.water_rough_ins, 16);
        assert_eq!(t.water_heaters, 1);
    }

    #[test]
    fn test_plumbing_requires_a_bathroom() {
        assert!(plumbing(0, 1).is_err());
    }

    #[test]
    fn test_hvac_tonnage_snaps_to_standard_sizes() {
        // 1500 sqft at 20 BTU = 30000 BTU = 2.5 tons
        let t = hvac(1500.0, 20.0).unwrap();
        assert_eq!(t.tonnage, 2.5);
        assert_eq!(t.btu_required, 30_000);

        // Oversized load lands on the largest standard unit
        let big = hvac(4000.0, 50.0).unwrap();
        assert_eq!(big.tonnage, 5.0);
    }

    #[test]
    fn test_hvac_registers_have_minimums() {
        let t = hvac(400.0, 20.0).unwrap();
        assert_eq!(t.supply_registers, 6);
        assert_eq!(t.return_registers, 2);
    }
}
