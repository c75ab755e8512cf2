//! Base areas and lengths everything else is derived from.

use crate::building::RoofStyle;
use crate::error::EstimateError;

use super::positive;

/// Floor area of one story, in square feet.
pub fn floor_area(length_ft: f64, width_ft: f64) -> Result<f64, EstimateError> {
    Ok(positive("length_ft", length_ft)? * positive("width_ft", width_ft)?)
}

/// Total living area across all stories.
pub fn living_area(length_ft: f64, width_ft: f64, stories: u32) -> Result<f64, EstimateError> {
    if stories == 0 {
        return Err(EstimateError::InvalidStories(stories));
    }
    Ok(floor_area(length_ft, width_ft)? * stories as f64)
}

/// Building perimeter, in feet.
pub fn perimeter(length_ft: f64, width_ft: f64) -> Result<f64, EstimateError> {
    Ok(2.0 * (positive("length_ft", length_ft)? + positive("width_ft", width_ft)?))
}

/// Total exterior wall area across all stories.
pub fn exterior_wall_area(
    length_ft: f64,
    width_ft: f64,
    wall_height_ft: f64,
    stories: u32,
) -> Result<f64, EstimateError> {
    if stories == 0 {
        return Err(EstimateError::InvalidStories(stories));
    }
    let height = positive("wall_height_ft", wall_height_ft)?;
    Ok(perimeter(length_ft, width_ft)? * height * stories as f64)
}

/// Roof surface area by style and pitch.
///
/// Pitch is rise over a 12" run (6.0 means 6:12). Pitched styles scale the
/// footprint by `sqrt(1 + (pitch/12)^2)` plus a style factor; flat roofs get
/// 10% extra for drainage slope and edges.
pub fn roof_area(
    length_ft: f64,
    width_ft: f64,
    style: RoofStyle,
    pitch: f64,
) -> Result<f64, EstimateError> {
    let footprint = floor_area(length_ft, width_ft)?;

    let style_factor = match style {
        RoofStyle::Flat => return Ok(footprint * 1.10),
        RoofStyle::Gable => 1.0,
        // Hip roofs take 10-15% more material than gable
        RoofStyle::Hip => 1.12,
        RoofStyle::Mansard | RoofStyle::Gambrel => 1.3,
        RoofStyle::Shed => 0.95,
        // No dedicated factor; treat like gable
        RoofStyle::Butterfly => 1.0,
    };

    let pitch = positive("roof_pitch", pitch)?;
    let pitch_multiplier = (1.0 + (pitch / 12.0).powi(2)).sqrt();

    Ok(footprint * pitch_multiplier * style_factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_and_living_area() {
        assert_eq!(floor_area(50.0, 30.0).unwrap(), 1500.0);
        assert_eq!(living_area(50.0, 30.0, 2).unwrap(), 3000.0);
    }

    #[test]
    fn test_rejects_nonpositive_before_computing() {
        assert!(floor_area(0.0, 30.0).is_err());
        assert!(floor_area(50.0, -2.0).is_err());
        assert!(perimeter(f64::NAN, 30.0).is_err());
        assert!(living_area(50.0, 30.0, 0).is_err());
        assert!(exterior_wall_area(50.0, 30.0, 0.0, 1).is_err());
    }

    #[test]
    fn test_perimeter_and_wall_area() {
        assert_eq!(perimeter(50.0, 30.0).unwrap(), 160.0);
        assert_eq!(exterior_wall_area(50.0, 30.0, 9.0, 2).unwrap(), 2880.0);
    }

    #[test]
    fn test_roof_area_by_style() {
        let footprint = 1500.0;

        let flat = roof_area(50.0, 30.0, RoofStyle::Flat, 6.0).unwrap();
        assert_eq!(flat, footprint * 1.10);

        let gable = roof_area(50.0, 30.0, RoofStyle::Gable, 6.0).unwrap();
        let expected = footprint * (1.0 + (6.0f64 / 12.0).powi(2)).sqrt();
        assert!((gable - expected).abs() < 1e-9);

        let hip = roof_area(50.0, 30.0, RoofStyle::Hip, 6.0).unwrap();
        assert!(hip > gable);

        let mansard = roof_area(50.0, 30.0, RoofStyle::Mansard, 6.0).unwrap();
        assert!(mansard > hip);

        let shed = roof_area(50.0, 30.0, RoofStyle::Shed, 6.0).unwrap();
        assert!(shed < gable);
    }

    #[test]
    fn test_steeper_pitch_means_more_roof() {
        let shallow = roof_area(40.0, 25.0, RoofStyle::Gable, 4.0).unwrap();
        let steep = roof_area(40.0, 25.0, RoofStyle::Gable, 12.0).unwrap();
        assert!(steep > shallow);
    }
}
