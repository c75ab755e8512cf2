//! The estimation engine.
//!
//! One synchronous pass over all trades: takeoff, pricing, code adjustment,
//! contingency and permit, accuracy. Failures scoped to a single trade or
//! material degrade that piece with a visible annotation; only whole-input
//! validation aborts the run.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::building::{BuildingFeatures, BuildingType, Dimensions, FoundationType};
use crate::error::{EstimateError, TradeFailure};
use crate::settings::Settings;
use crate::tables::{ReferenceTables, Unit, ZoneRequirements};
use crate::takeoff::{self, ExteriorTakeoff};

use super::accuracy::{AccuracyScorer, AccuracySignals};
use super::{Annotation, EstimateResult, LineItem, Trade, TradeOutcome};

/// Per-trade computation error: skip the trade, or abort the run.
enum TradeError {
    Skip(TradeFailure),
    Fatal(EstimateError),
}

impl From<TradeFailure> for TradeError {
    fn from(f: TradeFailure) -> Self {
        TradeError::Skip(f)
    }
}

impl From<EstimateError> for TradeError {
    fn from(e: EstimateError) -> Self {
        TradeError::Fatal(e)
    }
}

/// Generates itemized estimates. Configured once per run from settings plus
/// any per-run flags, then applied to validated inputs.
pub struct EstimateEngine {
    contingency_percent: Decimal,
    fallback_unit_price: Decimal,
    fallback_hourly_rate: Decimal,
    stud_spacing_in: f64,
    roof_pitch: f64,
    foundation: FoundationType,
    /// Builder-standard R-values; raised to code minimums per zone.
    default_ceiling_r: u32,
    default_wall_r: u32,
    /// Overrides the photo-detected building type when set.
    building_type: Option<BuildingType>,
    kitchens: u32,
    scorer: AccuracyScorer,
}

impl EstimateEngine {
    pub fn new() -> Self {
        Self {
            contingency_percent: dec!(10.0),
            fallback_unit_price: dec!(25.00),
            fallback_hourly_rate: dec!(45.00),
            stud_spacing_in: 16.0,
            roof_pitch: 6.0,
            foundation: FoundationType::Slab,
            default_ceiling_r: 30,
            default_wall_r: 13,
            building_type: None,
            kitchens: 1,
            scorer: AccuracyScorer::new(),
        }
    }

    /// Build an engine from persisted settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let est = &settings.estimate;
        Self {
            contingency_percent: Decimal::try_from(est.contingency_percent)
                .unwrap_or(dec!(10.0)),
            fallback_unit_price: Decimal::try_from(est.fallback_unit_price)
                .unwrap_or(dec!(25.00)),
            fallback_hourly_rate: Decimal::try_from(est.fallback_hourly_rate)
                .unwrap_or(dec!(45.00)),
            stud_spacing_in: est.stud_spacing_in,
            roof_pitch: est.roof_pitch,
            default_ceiling_r: est.default_ceiling_r,
            default_wall_r: est.default_wall_r,
            ..Self::new()
        }
    }

    pub fn with_foundation(mut self, foundation: FoundationType) -> Self {
        self.foundation = foundation;
        self
    }

    pub fn with_building_type(mut self, building_type: BuildingType) -> Self {
        self.building_type = Some(building_type);
        self
    }

    pub fn with_contingency_percent(mut self, percent: Decimal) -> Self {
        self.contingency_percent = percent;
        self
    }

    /// Run the full estimate.
    ///
    /// Synchronous and side-effect free; the inputs are not mutated and no
    /// state is shared across runs.
    pub fn generate(
        &self,
        features: &BuildingFeatures,
        dims: &Dimensions,
        tables: &ReferenceTables,
        climate_zone: u8,
    ) -> Result<EstimateResult, EstimateError> {
        dims.validate()?;
        let zone = tables
            .codes
            .requirements(climate_zone)
            .map_err(|_| EstimateError::UnknownClimateZone { zone: climate_zone })?;

        let mut line_items = Vec::new();
        let mut trades = Vec::new();
        let mut notes = Vec::new();

        for trade in Trade::ALL {
            match self.trade_items(trade, features, dims, tables, zone) {
                Ok(mut items) => {
                    line_items.append(&mut items);
                    trades.push(TradeOutcome::estimated(trade));
                }
                Err(TradeError::Skip(TradeFailure::MissingFeature { feature })) => {
                    tracing::warn!(trade = trade.key(), feature, "trade estimate unavailable");
                    trades.push(TradeOutcome::unavailable(trade, feature));
                }
                Err(TradeError::Fatal(e)) => return Err(e),
            }
        }

        let subtotal: Decimal = line_items.iter().map(|i| i.subtotal).sum();
        let contingency = subtotal * self.contingency_percent / dec!(100);

        let building_type = self
            .building_type
            .or(features.building_type)
            .unwrap_or_default();
        let living_sqft = takeoff::living_area(
            dims.length_ft.value,
            dims.width_ft.value,
            dims.stories,
        )?;
        let permit_cost = match tables.permits.fee(building_type) {
            Some(fee) => fee.cost(living_sqft),
            None => {
                tracing::warn!(
                    building_type = building_type.key(),
                    "no permit schedule entry; permit cost omitted"
                );
                notes.push(format!(
                    "no permit schedule for {building_type}; permit cost omitted"
                ));
                Decimal::ZERO
            }
        };

        let photo_confidence = (features.confidence > 0.0).then_some(features.confidence);
        if photo_confidence.is_none() {
            notes.push("no usable photo analysis; estimate driven by dimensions and defaults".to_string());
        }
        let signals = AccuracySignals {
            photo_confidence,
            measured_fraction: dims.measured_fraction(),
            local_pricing: tables.uses_local_pricing(),
        };
        let accuracy = match self.scorer.score(&signals) {
            Ok(score) => Some(score),
            Err(e) => {
                notes.push(format!("accuracy score unavailable: {e}"));
                None
            }
        };

        Ok(EstimateResult {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            building_type,
            climate_zone,
            line_items,
            trades,
            subtotal,
            contingency_percent: self.contingency_percent,
            contingency,
            permit_cost,
            total: subtotal + contingency + permit_cost,
            accuracy,
            notes,
        })
    }

    fn trade_items(
        &self,
        trade: Trade,
        features: &BuildingFeatures,
        dims: &Dimensions,
        tables: &ReferenceTables,
        zone: &ZoneRequirements,
    ) -> Result<Vec<LineItem>, TradeError> {
        match trade {
            Trade::Foundation => self.foundation_items(dims, tables),
            Trade::Framing => self.framing_items(dims, tables),
            Trade::Roofing => self.roofing_items(features, dims, tables),
            Trade::Siding => self.siding_items(features, dims, tables),
            Trade::WindowsDoors => self.opening_items(features, tables),
            Trade::Insulation => self.insulation_items(dims, tables, zone),
            Trade::Drywall => self.drywall_items(dims, tables),
            Trade::Electrical => self.electrical_items(dims, tables),
            Trade::Plumbing => self.plumbing_items(dims, tables),
            Trade::Hvac => self.hvac_items(dims, tables, zone),
        }
    }

    fn foundation_items(
        &self,
        dims: &Dimensions,
        tables: &ReferenceTables,
    ) -> Result<Vec<LineItem>, TradeError> {
        let t = takeoff::foundation_concrete(
            dims.length_ft.value,
            dims.width_ft.value,
            self.foundation,
        )?;

        Ok(vec![
            self.priced(
                Trade::Foundation,
                "concrete_cuyd",
                format!("{} foundation concrete", self.foundation),
                t.concrete_cuyd,
                tables,
            ),
            self.labor_line(Trade::Foundation, t.concrete_cuyd, tables),
        ])
    }

    fn framing_items(
        &self,
        dims: &Dimensions,
        tables: &ReferenceTables,
    ) -> Result<Vec<LineItem>, TradeError> {
        let t = takeoff::framing_lumber(
            dims.length_ft.value,
            dims.width_ft.value,
            dims.stories,
            dims.wall_height_ft.value,
            self.stud_spacing_in,
        )?;

        let mut items = vec![
            self.priced(Trade::Framing, t.stud_size.key(), "wall studs", t.studs as f64, tables),
            self.priced(
                Trade::Framing,
                "plate_lumber_lf",
                "top and bottom plates",
                t.plate_lf as f64,
                tables,
            ),
            self.priced(
                Trade::Framing,
                "header_2x12_lf",
                "headers over openings",
                t.header_lf as f64,
                tables,
            ),
            self.priced(
                Trade::Framing,
                t.joist_size.key(),
                "floor joists",
                t.floor_joists as f64,
                tables,
            ),
            self.priced(
                Trade::Framing,
                "rim_joist_lf",
                "rim and band joists",
                t.rim_joist_lf as f64,
                tables,
            ),
            self.priced(Trade::Framing, "rafter_2x8", "roof rafters", t.rafters as f64, tables),
            self.priced(
                Trade::Framing,
                "osb_sheet_4x8",
                "wall sheathing",
                t.wall_sheathing_sheets as f64,
                tables,
            ),
            self.priced(
                Trade::Framing,
                "osb_sheet_4x8",
                "roof sheathing",
                t.roof_sheathing_sheets as f64,
                tables,
            ),
            self.priced(
                Trade::Framing,
                "osb_sheet_4x8",
                "floor sheathing",
                t.floor_sheathing_sheets as f64,
                tables,
            ),
        ];

        let living = takeoff::living_area(
            dims.length_ft.value,
            dims.width_ft.value,
            dims.stories,
        )?;
        items.push(self.labor_line(Trade::Framing, living, tables));
        Ok(items)
    }

    fn roofing_items(
        &self,
        features: &BuildingFeatures,
        dims: &Dimensions,
        tables: &ReferenceTables,
    ) -> Result<Vec<LineItem>, TradeError> {
        let style = features
            .roof_style
            .ok_or(TradeFailure::MissingFeature {
                feature: "roof_style",
            })?;
        let t = takeoff::roofing(
            dims.length_ft.value,
            dims.width_ft.value,
            style,
            self.roof_pitch,
        )?;

        let mut items = vec![
            self.priced(
                Trade::Roofing,
                "shingle_square",
                format!("{style} roof shingles"),
                t.shingle_squares as f64,
                tables,
            ),
            self.priced(
                Trade::Roofing,
                "underlayment_roll",
                "underlayment",
                t.underlayment_rolls as f64,
                tables,
            ),
            self.priced(
                Trade::Roofing,
                "ridge_cap_lf",
                "ridge cap",
                t.ridge_cap_lf as f64,
                tables,
            ),
        ];
        if t.hip_cap_lf > 0 {
            items.push(self.priced(
                Trade::Roofing,
                "ridge_cap_lf",
                "hip cap",
                t.hip_cap_lf as f64,
                tables,
            ));
        }
        items.push(self.priced(
            Trade::Roofing,
            "drip_edge_lf",
            "drip edge",
            t.drip_edge_lf as f64,
            tables,
        ));
        items.push(self.priced(
            Trade::Roofing,
            "starter_strip_lf",
            "starter strip",
            t.starter_strip_lf as f64,
            tables,
        ));
        items.push(self.priced(
            Trade::Roofing,
            "roofing_nails_lb",
            "roofing nails",
            t.nails_lbs as f64,
            tables,
        ));
        items.push(self.labor_line(Trade::Roofing, t.roof_sqft, tables));
        Ok(items)
    }

    fn siding_items(
        &self,
        features: &BuildingFeatures,
        dims: &Dimensions,
        tables: &ReferenceTables,
    ) -> Result<Vec<LineItem>, TradeError> {
        let material = features
            .exterior_material
            .ok_or(TradeFailure::MissingFeature {
                feature: "exterior_material",
            })?;
        let t = takeoff::exterior(
            dims.length_ft.value,
            dims.width_ft.value,
            dims.wall_height_ft.value,
            dims.stories,
            material,
            features.window_count.unwrap_or(0),
            features.door_count.unwrap_or(0),
        )?;

        let mut items = Vec::new();
        match &t {
            ExteriorTakeoff::Siding {
                squares,
                trim_lf,
                corners,
                ..
            } => {
                items.push(self.priced(
                    Trade::Siding,
                    material.key(),
                    format!("{material} siding"),
                    *squares as f64,
                    tables,
                ));
                items.push(self.priced(Trade::Siding, "trim_lf", "exterior trim", *trim_lf as f64, tables));
                items.push(self.priced(
                    Trade::Siding,
                    "corner_post",
                    "corner posts",
                    *corners as f64,
                    tables,
                ));
            }
            ExteriorTakeoff::Masonry {
                bricks,
                mortar_bags,
                wall_ties,
                ..
            } => {
                items.push(self.priced(Trade::Siding, "brick", "face brick", *bricks as f64, tables));
                items.push(self.priced(Trade::Siding, "mortar_bag", "mortar", *mortar_bags as f64, tables));
                items.push(self.priced(Trade::Siding, "wall_tie", "wall ties", *wall_ties as f64, tables));
            }
            ExteriorTakeoff::Coverage { sqft } => {
                items.push(self.priced(
                    Trade::Siding,
                    material.key(),
                    format!("{material} finish"),
                    *sqft,
                    tables,
                ));
            }
        }
        items.push(self.labor_line(Trade::Siding, t.net_wall_sqft(), tables));
        Ok(items)
    }

    fn opening_items(
        &self,
        features: &BuildingFeatures,
        tables: &ReferenceTables,
    ) -> Result<Vec<LineItem>, TradeError> {
        let windows = features.window_count.ok_or(TradeFailure::MissingFeature {
            feature: "window_count",
        })?;
        let doors = features.door_count.ok_or(TradeFailure::MissingFeature {
            feature: "door_count",
        })?;
        let garage_doors = features.garage_doors.unwrap_or(0);

        let mut items = vec![
            self.priced(Trade::WindowsDoors, "window_unit", "windows", windows as f64, tables),
            self.priced(Trade::WindowsDoors, "entry_door", "entry doors", doors as f64, tables),
        ];
        if garage_doors > 0 {
            items.push(self.priced(
                Trade::WindowsDoors,
                "garage_door",
                "garage doors",
                garage_doors as f64,
                tables,
            ));
        }
        let openings = windows + doors + garage_doors;
        items.push(self.labor_line(Trade::WindowsDoors, openings as f64, tables));
        Ok(items)
    }

    fn insulation_items(
        &self,
        dims: &Dimensions,
        tables: &ReferenceTables,
        zone: &ZoneRequirements,
    ) -> Result<Vec<LineItem>, TradeError> {
        let ceiling_r = self.default_ceiling_r.max(zone.ceiling_r);
        let wall_r = self.default_wall_r.max(zone.wall_r);

        let t = takeoff::insulation(
            dims.length_ft.value,
            dims.width_ft.value,
            dims.wall_height_ft.value,
            dims.stories,
            ceiling_r,
            wall_r,
        )?;

        let mut ceiling = self.priced(
            Trade::Insulation,
            "ceiling_batt_bag",
            format!("R-{} ceiling batts", t.ceiling_r),
            t.ceiling_batts as f64,
            tables,
        );
        if zone.ceiling_r > self.default_ceiling_r {
            ceiling = ceiling.with_annotation(Annotation::CodeAdjusted {
                required_r: zone.ceiling_r,
                computed_r: self.default_ceiling_r,
            });
        }

        let mut wall = self.priced(
            Trade::Insulation,
            "wall_batt_bag",
            format!("R-{} wall batts", t.wall_r),
            t.wall_batts as f64,
            tables,
        );
        if zone.wall_r > self.default_wall_r {
            wall = wall.with_annotation(Annotation::CodeAdjusted {
                required_r: zone.wall_r,
                computed_r: self.default_wall_r,
            });
        }

        let labor = self.labor_line(Trade::Insulation, t.ceiling_sqft + t.wall_sqft, tables);
        Ok(vec![ceiling, wall, labor])
    }

    fn drywall_items(
        &self,
        dims: &Dimensions,
        tables: &ReferenceTables,
    ) -> Result<Vec<LineItem>, TradeError> {
        let t = takeoff::drywall(
            dims.length_ft.value,
            dims.width_ft.value,
            dims.wall_height_ft.value,
            dims.stories,
        )?;

        Ok(vec![
            self.priced(
                Trade::Drywall,
                "drywall_sheet_4x8",
                "drywall sheets",
                t.sheets as f64,
                tables,
            ),
            self.priced(
                Trade::Drywall,
                "joint_compound_bucket",
                "joint compound",
                t.joint_compound_buckets as f64,
                tables,
            ),
            self.priced(
                Trade::Drywall,
                "drywall_tape_roll",
                "joint tape",
                t.tape_rolls as f64,
                tables,
            ),
            self.labor_line(Trade::Drywall, t.total_sqft, tables),
        ])
    }

    fn electrical_items(
        &self,
        dims: &Dimensions,
        tables: &ReferenceTables,
    ) -> Result<Vec<LineItem>, TradeError> {
        let floor = takeoff::floor_area(dims.length_ft.value, dims.width_ft.value)?;
        let t = takeoff::electrical(floor, dims.stories)?;

        let panel_key = if t.panel_amps >= 200 {
            "panel_200a"
        } else {
            "panel_100a"
        };

        Ok(vec![
            self.priced(Trade::Electrical, "outlet", "receptacles", t.outlets as f64, tables),
            self.priced(Trade::Electrical, "switch", "switches", t.switches as f64, tables),
            self.priced(
                Trade::Electrical,
                "light_fixture",
                "light fixtures",
                t.light_fixtures as f64,
                tables,
            ),
            self.priced(
                Trade::Electrical,
                "wire_14_2_lf",
                "14-2 branch wiring",
                t.wire_14_2_lf as f64,
                tables,
            ),
            self.priced(
                Trade::Electrical,
                "wire_12_2_lf",
                "12-2 circuit wiring",
                t.wire_12_2_lf as f64,
                tables,
            ),
            self.priced(
                Trade::Electrical,
                "breaker_15a",
                "15A breakers",
                t.breakers_15a as f64,
                tables,
            ),
            self.priced(
                Trade::Electrical,
                "breaker_20a",
                "20A breakers",
                t.breakers_20a as f64,
                tables,
            ),
            self.priced(
                Trade::Electrical,
                panel_key,
                format!("{}A service panel", t.panel_amps),
                1.0,
                tables,
            ),
            self.labor_line(Trade::Electrical, floor * dims.stories as f64, tables),
        ])
    }

    fn plumbing_items(
        &self,
        dims: &Dimensions,
        tables: &ReferenceTables,
    ) -> Result<Vec<LineItem>, TradeError> {
        let bathrooms = dims.bathrooms.ok_or(TradeFailure::MissingFeature {
            feature: "bathroom_count",
        })?;
        let t = takeoff::plumbing(bathrooms, self.kitchens)?;

        Ok(vec![
            self.priced(Trade::Plumbing, "toilet", "toilets", t.toilets as f64, tables),
            self.priced(Trade::Plumbing, "sink", "sinks", t.sinks as f64, tables),
            self.priced(
                Trade::Plumbing,
                "shower_tub",
                "tub/shower units",
                t.showers_tubs as f64,
                tables,
            ),
            self.priced(
                Trade::Plumbing,
                "water_heater",
                "water heater",
                t.water_heaters as f64,
                tables,
            ),
            self.priced(
                Trade::Plumbing,
                "drain_pipe_lf",
                "drain piping",
                t.drain_pipe_lf as f64,
                tables,
            ),
            self.priced(
                Trade::Plumbing,
                "supply_pipe_lf",
                "supply piping",
                t.supply_pipe_lf as f64,
                tables,
            ),
            self.labor_line(Trade::Plumbing, t.drain_rough_ins as f64, tables),
        ])
    }

    fn hvac_items(
        &self,
        dims: &Dimensions,
        tables: &ReferenceTables,
        zone: &ZoneRequirements,
    ) -> Result<Vec<LineItem>, TradeError> {
        let living = takeoff::living_area(
            dims.length_ft.value,
            dims.width_ft.value,
            dims.stories,
        )?;
        let t = takeoff::hvac(living, zone.hvac_btu_per_sqft)?;

        Ok(vec![
            self.priced(
                Trade::Hvac,
                "hvac_ton",
                format!("{} ton split system", t.tonnage),
                t.tonnage,
                tables,
            ),
            self.priced(Trade::Hvac, "duct_lf", "ductwork", t.duct_lf as f64, tables),
            self.priced(
                Trade::Hvac,
                "register",
                "supply and return registers",
                (t.supply_registers + t.return_registers) as f64,
                tables,
            ),
            self.labor_line(Trade::Hvac, living, tables),
        ])
    }

    /// Price a material line, falling back to the configured default price
    /// with a visible annotation when the catalog has no entry.
    fn priced(
        &self,
        trade: Trade,
        key: &str,
        description: impl Into<String>,
        quantity: f64,
        tables: &ReferenceTables,
    ) -> LineItem {
        match tables.materials.price(key) {
            Ok(entry) => LineItem::new(
                trade,
                key,
                description,
                quantity,
                entry.unit,
                entry.unit_price,
            ),
            Err(_) => {
                tracing::warn!(material = key, "no price entry; using fallback pricing");
                LineItem::new(
                    trade,
                    key,
                    description,
                    quantity,
                    Unit::Each,
                    self.fallback_unit_price,
                )
                .with_annotation(Annotation::FallbackPricing {
                    material: key.to_string(),
                })
            }
        }
    }

    /// Labor line for a trade over its basis quantity.
    fn labor_line(&self, trade: Trade, basis_quantity: f64, tables: &ReferenceTables) -> LineItem {
        match tables.labor.rate(trade.key()) {
            Ok(rate) => {
                let hours = basis_quantity * rate.hours_per_unit;
                LineItem::new(
                    trade,
                    format!("labor_{}", trade.key()),
                    format!("{trade} labor"),
                    hours,
                    Unit::Hour,
                    rate.hourly_rate,
                )
            }
            Err(_) => {
                tracing::warn!(trade = trade.key(), "no labor rate; using fallback rate");
                LineItem::new(
                    trade,
                    format!("labor_{}", trade.key()),
                    format!("{trade} labor"),
                    basis_quantity,
                    Unit::Hour,
                    self.fallback_hourly_rate,
                )
                .with_annotation(Annotation::FallbackPricing {
                    material: format!("labor_{}", trade.key()),
                })
            }
        }
    }
}

impl Default for EstimateEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::{ExteriorMaterial, Measurement, RoofStyle};
    use crate::estimate::TradeStatus;
    use crate::tables::TableOverrides;
    use pretty_assertions::assert_eq;

    fn dims() -> Dimensions {
        Dimensions {
            length_ft: Measurement::measured(50.0),
            width_ft: Measurement::measured(30.0),
            wall_height_ft: Measurement::measured(9.0),
            stories: 2,
            bathrooms: Some(2),
        }
    }

    fn features() -> BuildingFeatures {
        BuildingFeatures {
            building_type: Some(BuildingType::SingleFamily),
            roof_style: Some(RoofStyle::Gable),
            exterior_material: Some(ExteriorMaterial::VinylSiding),
            stories: Some(2),
            window_count: Some(12),
            door_count: Some(2),
            garage_doors: Some(1),
            confidence: 0.85,
            ..BuildingFeatures::default()
        }
    }

    fn tables() -> ReferenceTables {
        ReferenceTables::builtin().unwrap()
    }

    #[test]
    fn test_total_is_subtotal_plus_contingency_plus_permit() {
        let engine = EstimateEngine::new();
        let result = engine.generate(&features(), &dims(), &tables(), 5).unwrap();

        let line_sum: Decimal = result.line_items.iter().map(|i| i.subtotal).sum();
        assert_eq!(result.subtotal, line_sum);
        assert_eq!(
            result.rounded_total(),
            (result.subtotal + result.contingency + result.permit_cost).round_dp(2)
        );
        assert_eq!(
            result.contingency,
            result.subtotal * dec!(10.0) / dec!(100)
        );
        assert!(result.total > Decimal::ZERO);
    }

    #[test]
    fn test_all_trades_estimated_with_full_inputs() {
        let engine = EstimateEngine::new();
        let result = engine.generate(&features(), &dims(), &tables(), 5).unwrap();
        assert!(result.unavailable_trades().is_empty());
        assert_eq!(result.trades.len(), Trade::ALL.len());
        // Every estimated trade contributed at least one line
        for trade in Trade::ALL {
            assert!(!result.items_for(trade).is_empty(), "{trade} has no items");
        }
    }

    #[test]
    fn test_missing_roof_style_degrades_only_roofing() {
        let engine = EstimateEngine::new();
        let mut f = features();
        f.roof_style = None;

        let result = engine.generate(&f, &dims(), &tables(), 5).unwrap();
        assert_eq!(result.unavailable_trades(), vec![Trade::Roofing]);
        assert!(result.items_for(Trade::Roofing).is_empty());
        // Framing and foundation still computed
        assert!(!result.items_for(Trade::Framing).is_empty());
        assert!(!result.items_for(Trade::Foundation).is_empty());

        let roofing = result
            .trades
            .iter()
            .find(|t| t.trade == Trade::Roofing)
            .unwrap();
        assert_eq!(
            roofing.status,
            TradeStatus::Unavailable {
                missing: "roof_style".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_material_gets_fallback_pricing_and_still_sums() {
        let engine = EstimateEngine::new();
        let mut f = features();
        // Metal siding has no catalog entry in the built-in tables
        f.exterior_material = Some(ExteriorMaterial::Metal);

        let result = engine.generate(&f, &dims(), &tables(), 5).unwrap();
        let siding_items = result.items_for(Trade::Siding);
        let flagged = siding_items
            .iter()
            .find(|i| i.material == "metal_siding_square")
            .unwrap();
        assert!(flagged.annotations.iter().any(|a| matches!(
            a,
            Annotation::FallbackPricing { material } if material == "metal_siding_square"
        )));
        assert!(flagged.subtotal > Decimal::ZERO);

        let line_sum: Decimal = result.line_items.iter().map(|i| i.subtotal).sum();
        assert_eq!(result.subtotal, line_sum);
    }

    #[test]
    fn test_code_minimum_adjustment_is_annotated() {
        // Engine default is R-30 ceiling; zone 2 requires R-38
        let engine = EstimateEngine::new();
        let result = engine.generate(&features(), &dims(), &tables(), 2).unwrap();

        let ceiling = result
            .items_for(Trade::Insulation)
            .into_iter()
            .find(|i| i.material == "ceiling_batt_bag")
            .unwrap();
        assert!(ceiling.description.contains("R-38"));
        assert!(ceiling.annotations.iter().any(|a| matches!(
            a,
            Annotation::CodeAdjusted {
                required_r: 38,
                computed_r: 30
            }
        )));
    }

    #[test]
    fn test_invalid_footprint_aborts_before_any_trade() {
        let engine = EstimateEngine::new();
        let mut d = dims();
        d.length_ft = Measurement::measured(0.0);

        let err = engine.generate(&features(), &d, &tables(), 5).unwrap_err();
        assert!(matches!(err, EstimateError::InvalidDimension { .. }));
    }

    #[test]
    fn test_unknown_zone_aborts() {
        let engine = EstimateEngine::new();
        let err = engine.generate(&features(), &dims(), &tables(), 11).unwrap_err();
        assert!(matches!(
            err,
            EstimateError::UnknownClimateZone { zone: 11 }
        ));
    }

    #[test]
    fn test_accuracy_orders_good_runs_above_bad() {
        let engine = EstimateEngine::new();

        let mut local_tables = tables();
        local_tables.apply_user(&TableOverrides {
            materials: std::collections::HashMap::from([(
                "stud_2x4".to_string(),
                crate::tables::MaterialEntry {
                    name: "2x4x8 stud".to_string(),
                    unit: Unit::Each,
                    unit_price: dec!(4.10),
                },
            )]),
            ..TableOverrides::default()
        });
        let mut best_features = features();
        best_features.confidence = 1.0;
        let best = engine
            .generate(&best_features, &dims(), &local_tables, 5)
            .unwrap();

        let mut worst_dims = dims();
        worst_dims.length_ft = Measurement::estimated(50.0);
        worst_dims.width_ft = Measurement::estimated(30.0);
        worst_dims.wall_height_ft = Measurement::estimated(9.0);
        let worst = engine
            .generate(&BuildingFeatures::unavailable(), &worst_dims, &tables(), 5)
            .unwrap();

        assert_eq!(best.accuracy, Some(1.0));
        // Nothing measured, no confidence: scorer has no data
        assert_eq!(worst.accuracy, None);
        assert!(!worst.notes.is_empty());
    }

    #[test]
    fn test_degraded_features_still_estimate_dimension_trades() {
        let engine = EstimateEngine::new();
        let result = engine
            .generate(&BuildingFeatures::unavailable(), &dims(), &tables(), 5)
            .unwrap();

        let unavailable = result.unavailable_trades();
        assert!(unavailable.contains(&Trade::Roofing));
        assert!(unavailable.contains(&Trade::Siding));
        assert!(unavailable.contains(&Trade::WindowsDoors));
        // Dimension-driven trades survive
        assert!(!result.items_for(Trade::Framing).is_empty());
        assert!(!result.items_for(Trade::Insulation).is_empty());
        assert!(!result.items_for(Trade::Hvac).is_empty());
        assert!(result.accuracy.is_some());
    }
}
