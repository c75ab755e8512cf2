//! Material takeoff calculations.
//!
//! Pure functions from validated dimensions to derived quantities. Every
//! entry point rejects non-positive input with
//! [`EstimateError::InvalidDimension`] before computing anything.
//!
//! Rounding policy: quantities that correspond to whole physical units
//! (studs, sheets, bags) round up to the next whole unit; areas and lengths
//! stay fractional. Money never appears here.

mod envelope;
mod geometry;
mod interior;
mod structure;
mod systems;

pub use envelope::{ExteriorTakeoff, InsulationTakeoff, RoofingTakeoff, exterior, insulation, roofing};
pub use geometry::{exterior_wall_area, floor_area, living_area, perimeter, roof_area};
pub use interior::{DrywallTakeoff, drywall};
pub use structure::{
    FoundationTakeoff, FramingTakeoff, JoistSize, StudSize, foundation_concrete, framing_lumber,
};
pub use systems::{
    ElectricalTakeoff, HvacTakeoff, PlumbingTakeoff, electrical, hvac, plumbing,
};

use crate::error::EstimateError;

/// Validate a single dimension argument.
pub(crate) fn positive(field: &'static str, value: f64) -> Result<f64, EstimateError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EstimateError::InvalidDimension { field, value })
    }
}

/// Ceiling-round a fractional quantity to whole physical units.
pub(crate) fn whole_units(value: f64) -> u32 {
    value.max(0.0).ceil() as u32
}
