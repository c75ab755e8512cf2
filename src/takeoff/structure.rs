//! Structural takeoffs: framing lumber and foundation concrete.

use serde::{Deserialize, Serialize};

use crate::building::FoundationType;
use crate::error::EstimateError;

use super::geometry::{exterior_wall_area, floor_area, perimeter, roof_area};
use super::{positive, whole_units};

/// Interior wall linear feet per square foot of floor, rough rule of thumb.
const INTERIOR_WALL_FACTOR: f64 = 0.8;
/// Waste and blocking allowance on stud counts.
const STUD_WASTE_FACTOR: f64 = 1.10;
/// Usable coverage of a 4x8 sheet after 10% waste.
const SHEET_COVERAGE_SQFT: f64 = 32.0 * 0.90;
/// Joist and rafter spacing, 16" on center, in feet.
const JOIST_SPACING_FT: f64 = 16.0 / 12.0;

const FOOTER_WIDTH_FT: f64 = 2.0;
const FOOTER_DEPTH_FT: f64 = 1.0;
/// 4" slab.
const SLAB_THICKNESS_FT: f64 = 0.33;
const CUBIC_FEET_PER_YARD: f64 = 27.0;

/// Stud dimension, selected by wall height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudSize {
    TwoByFour,
    TwoBySix,
}

impl StudSize {
    pub fn key(&self) -> &'static str {
        match self {
            StudSize::TwoByFour => "stud_2x4",
            StudSize::TwoBySix => "stud_2x6",
        }
    }
}

/// Floor joist dimension, selected by span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoistSize {
    TwoByEight,
    TwoByTen,
    TwoByTwelve,
}

impl JoistSize {
    pub fn key(&self) -> &'static str {
        match self {
            JoistSize::TwoByEight => "joist_2x8",
            JoistSize::TwoByTen => "joist_2x10",
            JoistSize::TwoByTwelve => "joist_2x12",
        }
    }
}

/// Framing lumber quantities for the whole structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramingTakeoff {
    pub studs: u32,
    pub stud_size: StudSize,
    pub plate_lf: u32,
    pub header_lf: u32,
    pub floor_joists: u32,
    pub joist_size: JoistSize,
    pub rim_joist_lf: u32,
    pub rafters: u32,
    pub wall_sheathing_sheets: u32,
    pub roof_sheathing_sheets: u32,
    pub floor_sheathing_sheets: u32,
}

/// Compute framing lumber from overall dimensions.
///
/// Stud spacing is inches on center. Interior walls are estimated from floor
/// area; roof sheathing assumes a gable plane regardless of the final roof
/// style, matching how sheathing is bought before trim decisions.
pub fn framing_lumber(
    length_ft: f64,
    width_ft: f64,
    stories: u32,
    wall_height_ft: f64,
    stud_spacing_in: f64,
) -> Result<FramingTakeoff, EstimateError> {
    let spacing_in = positive("stud_spacing_in", stud_spacing_in)?;
    let wall_height = positive("wall_height_ft", wall_height_ft)?;
    let perim = perimeter(length_ft, width_ft)?;
    let floor = floor_area(length_ft, width_ft)?;
    if stories == 0 {
        return Err(EstimateError::InvalidStories(stories));
    }

    let interior_wall_lf = floor * INTERIOR_WALL_FACTOR;
    let total_wall_lf = (perim + interior_wall_lf) * stories as f64;

    let studs_per_lf = 12.0 / spacing_in;
    let studs = whole_units(total_wall_lf * studs_per_lf * STUD_WASTE_FACTOR);
    let stud_size = if wall_height <= 9.0 {
        StudSize::TwoByFour
    } else {
        StudSize::TwoBySix
    };

    // Bottom plate plus double top plate
    let plate_lf = whole_units(total_wall_lf * 3.0);
    let header_lf = whole_units(total_wall_lf * 0.15);

    let joist_size = if width_ft <= 12.0 {
        JoistSize::TwoByEight
    } else if width_ft <= 16.0 {
        JoistSize::TwoByTen
    } else {
        JoistSize::TwoByTwelve
    };
    let joists_per_floor = whole_units(length_ft / JOIST_SPACING_FT) + 1;
    let floor_joists = joists_per_floor * stories;

    let rim_joist_lf = whole_units(perim * stories as f64);

    // Both sides of the ridge
    let rafters = (whole_units(length_ft / JOIST_SPACING_FT) + 1) * 2;

    let wall_sheathing_sqft = exterior_wall_area(length_ft, width_ft, wall_height, stories)?;
    let roof_sheathing_sqft = roof_area(length_ft, width_ft, crate::building::RoofStyle::Gable, 6.0)?;
    let floor_sheathing_sqft = floor * stories as f64;

    Ok(FramingTakeoff {
        studs,
        stud_size,
        plate_lf,
        header_lf,
        floor_joists,
        joist_size,
        rim_joist_lf,
        rafters,
        wall_sheathing_sheets: whole_units(wall_sheathing_sqft / SHEET_COVERAGE_SQFT),
        roof_sheathing_sheets: whole_units(roof_sheathing_sqft / SHEET_COVERAGE_SQFT),
        floor_sheathing_sheets: whole_units(floor_sheathing_sqft / SHEET_COVERAGE_SQFT),
    })
}

/// Foundation concrete volume and footer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundationTakeoff {
    pub concrete_cuyd: f64,
    pub footer_lf: f64,
}

/// Concrete needed for the selected foundation system.
pub fn foundation_concrete(
    length_ft: f64,
    width_ft: f64,
    foundation: FoundationType,
) -> Result<FoundationTakeoff, EstimateError> {
    let perim = perimeter(length_ft, width_ft)?;
    let footprint = floor_area(length_ft, width_ft)?;

    let footer_volume = perim * FOOTER_WIDTH_FT * FOOTER_DEPTH_FT;

    let total_cubic_feet = match foundation {
        FoundationType::Slab => {
            let slab_volume = footprint * SLAB_THICKNESS_FT;
            footer_volume + slab_volume
        }
        FoundationType::Crawl => {
            // Footers plus a 2 ft stem wall, 8" thick
            let stem_wall_volume = perim * 2.0 * 0.67;
            footer_volume + stem_wall_volume
        }
        FoundationType::Basement => {
            // 8 ft walls, 10" thick, plus the basement floor slab
            let wall_volume = perim * 8.0 * 0.83;
            let floor_volume = footprint * SLAB_THICKNESS_FT;
            footer_volume + wall_volume + floor_volume
        }
    };

    Ok(FoundationTakeoff {
        concrete_cuyd: total_cubic_feet / CUBIC_FEET_PER_YARD,
        footer_lf: perim,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framing_counts_are_positive_whole_units() {
        let t = framing_lumber(50.0, 30.0, 2, 9.0, 16.0).unwrap();
        assert!(t.studs > 0);
        assert!(t.plate_lf > t.header_lf);
        assert!(t.floor_joists > 0);
        assert!(t.wall_sheathing_sheets > 0);
        assert!(t.roof_sheathing_sheets > 0);
        assert!(t.floor_sheathing_sheets > 0);
    }

    #[test]
    fn test_stud_size_follows_wall_height() {
        let short = framing_lumber(40.0, 25.0, 1, 9.0, 16.0).unwrap();
        assert_eq!(short.stud_size, StudSize::TwoByFour);

        let tall = framing_lumber(40.0, 25.0, 1, 10.0, 16.0).unwrap();
        assert_eq!(tall.stud_size, StudSize::TwoBySix);
    }

    #[test]
    fn test_joist_size_follows_span() {
        assert_eq!(
            framing_lumber(40.0, 12.0, 1, 9.0, 16.0).unwrap().joist_size,
            JoistSize::TwoByEight
        );
        assert_eq!(
            framing_lumber(40.0, 16.0, 1, 9.0, 16.0).unwrap().joist_size,
            JoistSize::TwoByTen
        );
        assert_eq!(
            framing_lumber(40.0, 30.0, 1, 9.0, 16.0).unwrap().joist_size,
            JoistSize::TwoByTwelve
        );
    }

    #[test]
    fn test_tighter_spacing_needs_more_studs() {
        let sixteen = framing_lumber(50.0, 30.0, 1, 9.0, 16.0).unwrap();
        let twentyfour = framing_lumber(50.0, 30.0, 1, 9.0, 24.0).unwrap();
        assert!(sixteen.studs > twentyfour.studs);
    }

    #[test]
    fn test_foundation_variants_ordering() {
        let slab = foundation_concrete(50.0, 30.0, FoundationType::Slab).unwrap();
        let crawl = foundation_concrete(50.0, 30.0, FoundationType::Crawl).unwrap();
        let basement = foundation_concrete(50.0, 30.0, FoundationType::Basement).unwrap();

        assert!(slab.concrete_cuyd > 0.0);
        assert_eq!(slab.footer_lf, 160.0);
        // Full basement pours far more concrete than a slab or crawl space
        assert!(basement.concrete_cuyd > slab.concrete_cuyd);
        assert!(basement.concrete_cuyd > crawl.concrete_cuyd);
    }

    #[test]
    fn test_invalid_input_rejected() {
        assert!(framing_lumber(0.0, 30.0, 1, 9.0, 16.0).is_err());
        assert!(framing_lumber(50.0, 30.0, 0, 9.0, 16.0).is_err());
        assert!(framing_lumber(50.0, 30.0, 1, 9.0, 0.0).is_err());
        assert!(foundation_concrete(-5.0, 30.0, FoundationType::Slab).is_err());
    }
}
