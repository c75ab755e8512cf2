//! Envelope takeoffs: insulation, roofing materials, exterior finish.

use serde::{Deserialize, Serialize};

use crate::building::{ExteriorMaterial, RoofStyle};
use crate::error::EstimateError;

use super::geometry::{exterior_wall_area, floor_area, perimeter, roof_area};
use super::whole_units;

/// Share of gross wall area left after windows and doors, for insulation.
const NET_WALL_FACTOR: f64 = 0.85;
/// Coverage of one ceiling batt bag, square feet.
const CEILING_BATT_COVERAGE: f64 = 40.0;
/// Coverage of one wall batt bag (R-15 class), square feet.
const WALL_BATT_COVERAGE: f64 = 88.0;

/// Average opening areas used to deduct from exterior finish.
const WINDOW_AREA_SQFT: f64 = 15.0;
const DOOR_AREA_SQFT: f64 = 20.0;

/// Insulation quantities at the given R-values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsulationTakeoff {
    pub ceiling_sqft: f64,
    pub ceiling_r: u32,
    pub wall_sqft: f64,
    pub wall_r: u32,
    pub ceiling_batts: u32,
    pub wall_batts: u32,
}

/// Insulation takeoff. R-values arrive already resolved against code
/// minimums; this function only turns areas into bag counts.
pub fn insulation(
    length_ft: f64,
    width_ft: f64,
    wall_height_ft: f64,
    stories: u32,
    ceiling_r: u32,
    wall_r: u32,
) -> Result<InsulationTakeoff, EstimateError> {
    let ceiling_sqft = floor_area(length_ft, width_ft)?;
    let gross_wall = exterior_wall_area(length_ft, width_ft, wall_height_ft, stories)?;
    let wall_sqft = gross_wall * NET_WALL_FACTOR;

    Ok(InsulationTakeoff {
        ceiling_sqft,
        ceiling_r,
        wall_sqft,
        wall_r,
        ceiling_batts: whole_units(ceiling_sqft / CEILING_BATT_COVERAGE),
        wall_batts: whole_units(wall_sqft / WALL_BATT_COVERAGE),
    })
}

/// Roofing material quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofingTakeoff {
    pub roof_sqft: f64,
    /// Shingles sold by the square (100 sqft), 10% waste included.
    pub shingle_squares: u32,
    pub underlayment_rolls: u32,
    pub ridge_cap_lf: u32,
    pub hip_cap_lf: u32,
    pub drip_edge_lf: u32,
    pub starter_strip_lf: u32,
    pub nails_lbs: u32,
}

/// Roofing takeoff for the detected roof style.
pub fn roofing(
    length_ft: f64,
    width_ft: f64,
    style: RoofStyle,
    pitch: f64,
) -> Result<RoofingTakeoff, EstimateError> {
    let roof_sqft = roof_area(length_ft, width_ft, style, pitch)?;

    let shingle_squares = whole_units(roof_sqft / 100.0 * 1.10);
    // ~4 squares per underlayment roll
    let underlayment_rolls = whole_units(roof_sqft / 400.0);

    let (ridge_lf, hip_lf) = match style {
        RoofStyle::Gable => (length_ft, 0.0),
        RoofStyle::Hip => (length_ft * 0.5, std::f64::consts::SQRT_2 * width_ft * 2.0),
        _ => (length_ft, 0.0),
    };

    let perim = perimeter(length_ft, width_ft)?;

    Ok(RoofingTakeoff {
        roof_sqft,
        shingle_squares,
        underlayment_rolls,
        ridge_cap_lf: whole_units(ridge_lf),
        hip_cap_lf: whole_units(hip_lf),
        drip_edge_lf: whole_units(perim),
        starter_strip_lf: whole_units(perim),
        nails_lbs: shingle_squares * 2,
    })
}

/// Exterior finish quantities, by material family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ExteriorTakeoff {
    /// Siding families sold by the square.
    Siding {
        squares: u32,
        net_wall_sqft: f64,
        trim_lf: u32,
        corners: u32,
    },
    /// Brick veneer.
    Masonry {
        bricks: u32,
        mortar_bags: u32,
        wall_ties: u32,
        net_wall_sqft: f64,
    },
    /// Applied coatings and veneers priced per square foot.
    Coverage { sqft: f64 },
}

impl ExteriorTakeoff {
    pub fn net_wall_sqft(&self) -> f64 {
        match self {
            ExteriorTakeoff::Siding { net_wall_sqft, .. } => *net_wall_sqft,
            ExteriorTakeoff::Masonry { net_wall_sqft, .. } => *net_wall_sqft,
            ExteriorTakeoff::Coverage { sqft } => *sqft,
        }
    }
}

/// Exterior finish takeoff. Window and door counts deduct their average
/// opening area from the gross wall before material is figured.
pub fn exterior(
    length_ft: f64,
    width_ft: f64,
    wall_height_ft: f64,
    stories: u32,
    material: ExteriorMaterial,
    window_count: u32,
    door_count: u32,
) -> Result<ExteriorTakeoff, EstimateError> {
    let gross_wall = exterior_wall_area(length_ft, width_ft, wall_height_ft, stories)?;

    let openings = window_count as f64 * WINDOW_AREA_SQFT + door_count as f64 * DOOR_AREA_SQFT;
    let net_wall_sqft = (gross_wall - openings).max(0.0);

    let takeoff = if material.is_siding() {
        ExteriorTakeoff::Siding {
            squares: whole_units(net_wall_sqft / 100.0 * 1.10),
            net_wall_sqft,
            trim_lf: whole_units(perimeter(length_ft, width_ft)? * stories as f64 * 4.0),
            corners: 4 * stories,
        }
    } else if material == ExteriorMaterial::Brick {
        // ~7 bricks per square foot, 5% waste
        let bricks = whole_units(net_wall_sqft * 7.0 * 1.05);
        ExteriorTakeoff::Masonry {
            bricks,
            mortar_bags: whole_units(bricks as f64 / 500.0),
            wall_ties: whole_units(net_wall_sqft * 1.5),
            net_wall_sqft,
        }
    } else {
        ExteriorTakeoff::Coverage { sqft: net_wall_sqft }
    };

    Ok(takeoff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insulation_bag_counts_round_up() {
        let t = insulation(50.0, 30.0, 9.0, 2, 38, 20).unwrap();
        assert_eq!(t.ceiling_sqft, 1500.0);
        // 2880 gross wall * 0.85
        assert!((t.wall_sqft - 2448.0).abs() < 1e-9);
        assert_eq!(t.ceiling_batts, 38); // ceil(1500/40) = 38
        assert_eq!(t.wall_batts, 28); // ceil(2448/88) = 28
        assert_eq!(t.ceiling_r, 38);
        assert_eq!(t.wall_r, 20);
    }

    #[test]
    fn test_roofing_gable_vs_hip_caps() {
        let gable = roofing(50.0, 30.0, RoofStyle::Gable, 6.0).unwrap();
        assert_eq!(gable.ridge_cap_lf, 50);
        assert_eq!(gable.hip_cap_lf, 0);

        let hip = roofing(50.0, 30.0, RoofStyle::Hip, 6.0).unwrap();
        assert_eq!(hip.ridge_cap_lf, 25);
        assert!(hip.hip_cap_lf > 0);
        assert!(hip.shingle_squares > gable.shingle_squares);
    }

    #[test]
    fn test_exterior_siding_family() {
        let t = exterior(50.0, 30.0, 9.0, 1, ExteriorMaterial::VinylSiding, 8, 2).unwrap();
        match t {
            ExteriorTakeoff::Siding {
                squares,
                net_wall_sqft,
                corners,
                ..
            } => {
                // 1440 gross - 8*15 - 2*20 = 1280 net
                assert!((net_wall_sqft - 1280.0).abs() < 1e-9);
                assert_eq!(squares, 15); // ceil(1280/100*1.10)
                assert_eq!(corners, 4);
            }
            other => panic!("expected siding takeoff, got {other:?}"),
        }
    }

    #[test]
    fn test_exterior_brick_family() {
        let t = exterior(50.0, 30.0, 9.0, 1, ExteriorMaterial::Brick, 0, 0).unwrap();
        match t {
            ExteriorTakeoff::Masonry { bricks, mortar_bags, .. } => {
                assert!(bricks > 0);
                assert!(mortar_bags > 0);
            }
            other => panic!("expected masonry takeoff, got {other:?}"),
        }
    }

    #[test]
    fn test_openings_never_drive_area_negative() {
        let t = exterior(10.0, 10.0, 8.0, 1, ExteriorMaterial::Stucco, 50, 10).unwrap();
        assert!(t.net_wall_sqft() >= 0.0);
    }
}
