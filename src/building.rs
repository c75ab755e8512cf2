//! Shared building domain types.
//!
//! [`BuildingFeatures`] is what the vision collaborator produces from photos;
//! [`Dimensions`] is what the user enters. Both are inputs to the estimation
//! engine and immutable once a run starts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EstimateError;

/// Broad building classification, used for permit schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    #[default]
    SingleFamily,
    MultiFamily,
    Commercial,
    Industrial,
    MixedUse,
}

impl BuildingType {
    /// Stable key used in permit tables and persistence.
    pub fn key(&self) -> &'static str {
        match self {
            BuildingType::SingleFamily => "single_family",
            BuildingType::MultiFamily => "multi_family",
            BuildingType::Commercial => "commercial",
            BuildingType::Industrial => "industrial",
            BuildingType::MixedUse => "mixed_use",
        }
    }
}

impl fmt::Display for BuildingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BuildingType::SingleFamily => "Single Family Residential",
            BuildingType::MultiFamily => "Multi-Family Residential",
            BuildingType::Commercial => "Commercial",
            BuildingType::Industrial => "Industrial",
            BuildingType::MixedUse => "Mixed Use",
        };
        f.write_str(label)
    }
}

impl FromStr for BuildingType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "single family residential" | "single_family" | "single-family" => {
                Ok(BuildingType::SingleFamily)
            }
            "multi-family residential" | "multi_family" | "multifamily" => {
                Ok(BuildingType::MultiFamily)
            }
            "commercial" => Ok(BuildingType::Commercial),
            "industrial" => Ok(BuildingType::Industrial),
            "mixed use" | "mixed_use" => Ok(BuildingType::MixedUse),
            _ => Err(()),
        }
    }
}

/// Roof geometry family. Drives the area multiplier in the roofing takeoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoofStyle {
    Gable,
    Hip,
    Flat,
    Mansard,
    Gambrel,
    Shed,
    Butterfly,
}

impl fmt::Display for RoofStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RoofStyle::Gable => "Gable",
            RoofStyle::Hip => "Hip",
            RoofStyle::Flat => "Flat",
            RoofStyle::Mansard => "Mansard",
            RoofStyle::Gambrel => "Gambrel",
            RoofStyle::Shed => "Shed",
            RoofStyle::Butterfly => "Butterfly",
        };
        f.write_str(label)
    }
}

impl FromStr for RoofStyle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gable" => Ok(RoofStyle::Gable),
            "hip" => Ok(RoofStyle::Hip),
            "flat" => Ok(RoofStyle::Flat),
            "mansard" => Ok(RoofStyle::Mansard),
            "gambrel" => Ok(RoofStyle::Gambrel),
            "shed" => Ok(RoofStyle::Shed),
            "butterfly" => Ok(RoofStyle::Butterfly),
            _ => Err(()),
        }
    }
}

/// Exterior finish family. Selects which siding takeoff applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExteriorMaterial {
    VinylSiding,
    WoodSiding,
    FiberCement,
    Brick,
    Stone,
    Stucco,
    Metal,
    Eifs,
}

impl ExteriorMaterial {
    /// Stable key used in the materials catalog.
    pub fn key(&self) -> &'static str {
        match self {
            ExteriorMaterial::VinylSiding => "vinyl_siding_square",
            ExteriorMaterial::WoodSiding => "wood_siding_square",
            ExteriorMaterial::FiberCement => "fiber_cement_square",
            ExteriorMaterial::Brick => "brick",
            ExteriorMaterial::Stone => "stone_veneer_sqft",
            ExteriorMaterial::Stucco => "stucco_sqft",
            ExteriorMaterial::Metal => "metal_siding_square",
            ExteriorMaterial::Eifs => "eifs_sqft",
        }
    }

    /// Siding-family materials are sold by the square (100 sqft).
    pub fn is_siding(&self) -> bool {
        matches!(
            self,
            ExteriorMaterial::VinylSiding
                | ExteriorMaterial::WoodSiding
                | ExteriorMaterial::FiberCement
                | ExteriorMaterial::Metal
        )
    }
}

impl fmt::Display for ExteriorMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExteriorMaterial::VinylSiding => "Vinyl Siding",
            ExteriorMaterial::WoodSiding => "Wood Siding",
            ExteriorMaterial::FiberCement => "Fiber Cement",
            ExteriorMaterial::Brick => "Brick",
            ExteriorMaterial::Stone => "Stone",
            ExteriorMaterial::Stucco => "Stucco",
            ExteriorMaterial::Metal => "Metal",
            ExteriorMaterial::Eifs => "EIFS",
        };
        f.write_str(label)
    }
}

impl FromStr for ExteriorMaterial {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vinyl siding" | "vinyl" | "vinyl_siding" => Ok(ExteriorMaterial::VinylSiding),
            "wood siding" | "wood" | "wood_siding" => Ok(ExteriorMaterial::WoodSiding),
            "fiber cement" | "fiber_cement" => Ok(ExteriorMaterial::FiberCement),
            "brick" => Ok(ExteriorMaterial::Brick),
            "stone" => Ok(ExteriorMaterial::Stone),
            "stucco" => Ok(ExteriorMaterial::Stucco),
            "metal" => Ok(ExteriorMaterial::Metal),
            "eifs" => Ok(ExteriorMaterial::Eifs),
            _ => Err(()),
        }
    }
}

/// Foundation system, user-selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoundationType {
    #[default]
    Slab,
    Crawl,
    Basement,
}

impl FromStr for FoundationType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slab" => Ok(FoundationType::Slab),
            "crawl" | "crawlspace" => Ok(FoundationType::Crawl),
            "basement" => Ok(FoundationType::Basement),
            _ => Err(()),
        }
    }
}

impl fmt::Display for FoundationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FoundationType::Slab => "Slab",
            FoundationType::Crawl => "Crawl Space",
            FoundationType::Basement => "Basement",
        };
        f.write_str(label)
    }
}

/// Self-reported clarity of the analyzed photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoQuality {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for PhotoQuality {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(PhotoQuality::Low),
            "medium" => Ok(PhotoQuality::Medium),
            "high" => Ok(PhotoQuality::High),
            _ => Err(()),
        }
    }
}

/// Structured description of a building derived from photos.
///
/// Produced once per photo batch and never mutated afterwards. Fields the
/// analysis could not resolve are `None`; trades that need them degrade
/// individually instead of failing the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildingFeatures {
    pub building_type: Option<BuildingType>,
    pub roof_style: Option<RoofStyle>,
    pub exterior_material: Option<ExteriorMaterial>,
    /// Story count as seen in the photos; the entered dimensions win if both exist.
    pub stories: Option<u32>,
    pub window_count: Option<u32>,
    pub door_count: Option<u32>,
    pub garage_doors: Option<u32>,
    pub has_porch: bool,
    pub has_deck: bool,
    pub dormer_count: Option<u32>,
    /// Free-form tags the analysis flagged (e.g. "chimney", "skylight").
    pub special_features: Vec<String>,
    pub photo_quality: PhotoQuality,
    /// Analysis confidence in [0, 1].
    pub confidence: f64,
}

impl BuildingFeatures {
    /// The degraded value used when analysis is unavailable: nothing
    /// detected, zero confidence. Downstream estimation still runs.
    pub fn unavailable() -> Self {
        Self {
            photo_quality: PhotoQuality::Low,
            confidence: 0.0,
            ..Self::default()
        }
    }

    /// Combine per-photo results into one description of the building.
    ///
    /// Counts are summed across photos (each photo sees different faces),
    /// booleans are OR-ed, categorical fields come from the most confident
    /// photo, and confidence is the average with a small boost per extra
    /// photo, capped at 1.0.
    pub fn merge(mut results: Vec<BuildingFeatures>) -> BuildingFeatures {
        if results.is_empty() {
            return BuildingFeatures::unavailable();
        }
        if results.len() == 1 {
            return results.remove(0);
        }

        let best = results
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.confidence.total_cmp(&b.confidence))
            .map(|(i, _)| i)
            .unwrap_or(0);

        let sum_counts = |f: fn(&BuildingFeatures) -> Option<u32>| -> Option<u32> {
            let known: Vec<u32> = results.iter().filter_map(f).collect();
            if known.is_empty() {
                None
            } else {
                Some(known.iter().sum())
            }
        };

        let mut special: Vec<String> = Vec::new();
        for r in &results {
            for tag in &r.special_features {
                if !special.contains(tag) {
                    special.push(tag.clone());
                }
            }
        }

        let n = results.len() as f64;
        let avg_confidence = results.iter().map(|r| r.confidence).sum::<f64>() / n;
        let confidence = (avg_confidence * (1.0 + 0.1 * (n - 1.0))).min(1.0);

        BuildingFeatures {
            building_type: results[best].building_type,
            roof_style: results[best].roof_style,
            exterior_material: results[best].exterior_material,
            stories: results.iter().filter_map(|r| r.stories).max(),
            window_count: sum_counts(|r| r.window_count),
            door_count: sum_counts(|r| r.door_count),
            garage_doors: results.iter().filter_map(|r| r.garage_doors).max(),
            has_porch: results.iter().any(|r| r.has_porch),
            has_deck: results.iter().any(|r| r.has_deck),
            dormer_count: sum_counts(|r| r.dormer_count),
            special_features: special,
            photo_quality: results
                .iter()
                .map(|r| r.photo_quality)
                .max()
                .unwrap_or_default(),
            confidence,
        }
    }
}

/// Whether a dimension was measured on site or eyeballed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Measured,
    #[default]
    Estimated,
}

/// One user-entered dimension with its provenance flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub provenance: Provenance,
}

impl Measurement {
    pub fn measured(value: f64) -> Self {
        Self {
            value,
            provenance: Provenance::Measured,
        }
    }

    pub fn estimated(value: f64) -> Self {
        Self {
            value,
            provenance: Provenance::Estimated,
        }
    }

    pub fn is_measured(&self) -> bool {
        self.provenance == Provenance::Measured
    }
}

/// User-entered building dimensions, in feet.
///
/// Mutable until estimate generation; validated as a whole before any
/// calculation runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dimensions {
    pub length_ft: Measurement,
    pub width_ft: Measurement,
    /// Height per story.
    pub wall_height_ft: Measurement,
    pub stories: u32,
    /// Bathroom count feeds the plumbing takeoff; unknown leaves that trade
    /// unavailable.
    pub bathrooms: Option<u32>,
}

impl Dimensions {
    /// Reject non-positive values before any downstream calculation.
    pub fn validate(&self) -> Result<(), EstimateError> {
        for (field, m) in [
            ("length_ft", &self.length_ft),
            ("width_ft", &self.width_ft),
            ("wall_height_ft", &self.wall_height_ft),
        ] {
            if !m.value.is_finite() || m.value <= 0.0 {
                return Err(EstimateError::InvalidDimension {
                    field,
                    value: m.value,
                });
            }
        }
        if self.stories == 0 {
            return Err(EstimateError::InvalidStories(self.stories));
        }
        Ok(())
    }

    /// Fraction of dimension fields flagged as measured, in [0, 1].
    pub fn measured_fraction(&self) -> f64 {
        let fields = [&self.length_ft, &self.width_ft, &self.wall_height_ft];
        let measured = fields.iter().filter(|m| m.is_measured()).count();
        measured as f64 / fields.len() as f64
    }

    pub fn footprint_sqft(&self) -> f64 {
        self.length_ft.value * self.width_ft.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dims(length: f64, width: f64, height: f64, stories: u32) -> Dimensions {
        Dimensions {
            length_ft: Measurement::measured(length),
            width_ft: Measurement::measured(width),
            wall_height_ft: Measurement::estimated(height),
            stories,
            bathrooms: Some(2),
        }
    }

    #[test]
    fn test_validate_rejects_nonpositive() {
        let d = dims(0.0, 30.0, 9.0, 1);
        assert!(matches!(
            d.validate(),
            Err(EstimateError::InvalidDimension {
                field: "length_ft",
                ..
            })
        ));

        let d = dims(50.0, -1.0, 9.0, 1);
        assert!(d.validate().is_err());

        let d = dims(50.0, 30.0, 9.0, 0);
        assert!(matches!(d.validate(), Err(EstimateError::InvalidStories(0))));

        assert!(dims(50.0, 30.0, 9.0, 2).validate().is_ok());
    }

    #[test]
    fn test_measured_fraction() {
        let d = dims(50.0, 30.0, 9.0, 1);
        // length and width measured, wall height estimated
        assert!((d.measured_fraction() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_merge_sums_counts_and_keeps_best_categoricals() {
        let a = BuildingFeatures {
            roof_style: Some(RoofStyle::Gable),
            window_count: Some(6),
            door_count: Some(1),
            confidence: 0.9,
            ..BuildingFeatures::default()
        };
        let b = BuildingFeatures {
            roof_style: Some(RoofStyle::Hip),
            window_count: Some(4),
            has_deck: true,
            confidence: 0.5,
            ..BuildingFeatures::default()
        };

        let merged = BuildingFeatures::merge(vec![a, b]);
        // Best-confidence photo wins the categorical call
        assert_eq!(merged.roof_style, Some(RoofStyle::Gable));
        // Counts sum across photos
        assert_eq!(merged.window_count, Some(10));
        assert_eq!(merged.door_count, Some(1));
        assert!(merged.has_deck);
        assert!(merged.confidence <= 1.0);
        assert!(merged.confidence > 0.7);
    }

    #[test]
    fn test_merge_empty_degrades() {
        let merged = BuildingFeatures::merge(vec![]);
        assert_eq!(merged.confidence, 0.0);
        assert!(merged.roof_style.is_none());
    }

    #[test]
    fn test_enum_parsing_is_case_insensitive() {
        assert_eq!("Gable".parse::<RoofStyle>(), Ok(RoofStyle::Gable));
        assert_eq!(
            "Vinyl Siding".parse::<ExteriorMaterial>(),
            Ok(ExteriorMaterial::VinylSiding)
        );
        assert_eq!(
            "Single Family Residential".parse::<BuildingType>(),
            Ok(BuildingType::SingleFamily)
        );
        assert!("pagoda".parse::<RoofStyle>().is_err());
    }
}
