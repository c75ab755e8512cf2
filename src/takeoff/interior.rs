//! Interior finish takeoff: drywall.

use serde::{Deserialize, Serialize};

use crate::error::EstimateError;

use super::geometry::{floor_area, perimeter};
use super::{positive, whole_units};

/// Drywall sheet, compound, and tape quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrywallTakeoff {
    pub ceiling_sqft: f64,
    pub wall_sqft: f64,
    pub total_sqft: f64,
    pub sheets: u32,
    pub joint_compound_buckets: u32,
    pub tape_rolls: u32,
}

/// Drywall takeoff over all stories. Interior walls are estimated from floor
/// area and counted on both faces; 10% of wall area is deducted for openings.
pub fn drywall(
    length_ft: f64,
    width_ft: f64,
    wall_height_ft: f64,
    stories: u32,
) -> Result<DrywallTakeoff, EstimateError> {
    let wall_height = positive("wall_height_ft", wall_height_ft)?;
    let floor = floor_area(length_ft, width_ft)?;
    let perim = perimeter(length_ft, width_ft)?;
    if stories == 0 {
        return Err(EstimateError::InvalidStories(stories));
    }
    let stories_f = stories as f64;

    let ceiling_sqft = floor * stories_f;
    let exterior_wall_sqft = perim * wall_height * stories_f;

    let interior_wall_lf = floor * 0.8 * stories_f;
    let interior_wall_sqft = interior_wall_lf * wall_height * 2.0;

    let wall_sqft = (exterior_wall_sqft + interior_wall_sqft) * 0.90;
    let total_sqft = ceiling_sqft + wall_sqft;

    // 4x8 sheets with 10% waste
    let sheets = whole_units(total_sqft / 32.0 * 1.10);

    Ok(DrywallTakeoff {
        ceiling_sqft,
        wall_sqft,
        total_sqft,
        sheets,
        // ~30 sheets per 5-gallon bucket, ~20 sheets per 500 ft roll
        joint_compound_buckets: whole_units(sheets as f64 / 30.0),
        tape_rolls: whole_units(sheets as f64 / 20.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drywall_totals_and_consumables() {
        let t = drywall(50.0, 30.0, 9.0, 1).unwrap();
        assert_eq!(t.ceiling_sqft, 1500.0);
        assert!(t.wall_sqft > 0.0);
        assert!((t.total_sqft - (t.ceiling_sqft + t.wall_sqft)).abs() < 1e-9);
        assert!(t.sheets > 0);
        assert!(t.joint_compound_buckets >= 1);
        assert!(t.tape_rolls >= 1);
        // Consumables scale below sheet count
        assert!(t.joint_compound_buckets < t.sheets);
    }

    #[test]
    fn test_two_stories_doubles_ceiling() {
        let one = drywall(40.0, 25.0, 9.0, 1).unwrap();
        let two = drywall(40.0, 25.0, 9.0, 2).unwrap();
        assert_eq!(two.ceiling_sqft, one.ceiling_sqft * 2.0);
        assert!(two.sheets > one.sheets);
    }

    #[test]
    fn test_invalid_input_rejected() {
        assert!(drywall(0.0, 25.0, 9.0, 1).is_err());
        assert!(drywall(40.0, 25.0, 9.0, 0).is_err());
    }
}
