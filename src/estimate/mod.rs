//! Estimate generation: result model, accuracy scoring, and the engine that
//! turns features + dimensions + reference tables into an itemized estimate.

mod accuracy;
mod engine;

pub use accuracy::{AccuracyScorer, AccuracySignals};
pub use engine::EstimateEngine;

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tables::Unit;

/// A construction discipline with its own line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trade {
    Foundation,
    Framing,
    Roofing,
    Siding,
    WindowsDoors,
    Insulation,
    Drywall,
    Electrical,
    Plumbing,
    Hvac,
}

impl Trade {
    /// Every trade, in the order estimates are built and displayed.
    pub const ALL: [Trade; 10] = [
        Trade::Foundation,
        Trade::Framing,
        Trade::Roofing,
        Trade::Siding,
        Trade::WindowsDoors,
        Trade::Insulation,
        Trade::Drywall,
        Trade::Electrical,
        Trade::Plumbing,
        Trade::Hvac,
    ];

    /// Stable key used in labor tables and persistence.
    pub fn key(&self) -> &'static str {
        match self {
            Trade::Foundation => "foundation",
            Trade::Framing => "framing",
            Trade::Roofing => "roofing",
            Trade::Siding => "siding",
            Trade::WindowsDoors => "windows_doors",
            Trade::Insulation => "insulation",
            Trade::Drywall => "drywall",
            Trade::Electrical => "electrical",
            Trade::Plumbing => "plumbing",
            Trade::Hvac => "hvac",
        }
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trade::Foundation => "Foundation",
            Trade::Framing => "Framing",
            Trade::Roofing => "Roofing",
            Trade::Siding => "Siding",
            Trade::WindowsDoors => "Windows & Doors",
            Trade::Insulation => "Insulation",
            Trade::Drywall => "Drywall",
            Trade::Electrical => "Electrical",
            Trade::Plumbing => "Plumbing",
            Trade::Hvac => "HVAC",
        };
        f.write_str(label)
    }
}

/// Visible marker on a line item for any non-default condition.
///
/// Degradations are never folded silently into quantities or prices; they
/// surface here and feed the accuracy picture of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    /// Quantity was raised to meet the climate zone's code minimum.
    CodeAdjusted { required_r: u32, computed_r: u32 },
    /// No price entry existed; the configured fallback unit price was used.
    FallbackPricing { material: String },
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::CodeAdjusted {
                required_r,
                computed_r,
            } => write!(f, "code-adjusted R-{computed_r} -> R-{required_r}"),
            Annotation::FallbackPricing { material } => {
                write!(f, "fallback pricing for {material}")
            }
        }
    }
}

/// One priced line of the estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub trade: Trade,
    /// Material key, or `labor_<trade>` for labor lines.
    pub material: String,
    pub description: String,
    pub quantity: f64,
    pub unit: Unit,
    pub unit_price: Decimal,
    /// Always `quantity * unit_price`, kept at full precision.
    pub subtotal: Decimal,
    pub annotations: Vec<Annotation>,
}

impl LineItem {
    pub fn new(
        trade: Trade,
        material: impl Into<String>,
        description: impl Into<String>,
        quantity: f64,
        unit: Unit,
        unit_price: Decimal,
    ) -> Self {
        let qty = Decimal::try_from(quantity).unwrap_or(Decimal::ZERO);
        Self {
            trade,
            material: material.into(),
            description: description.into(),
            quantity,
            unit,
            unit_price,
            subtotal: qty * unit_price,
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations.extend(annotations);
        self
    }
}

/// Per-trade outcome: estimated, or unavailable with the missing feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOutcome {
    pub trade: Trade,
    pub status: TradeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TradeStatus {
    Estimated,
    /// The trade could not be estimated; the rest of the run still completed.
    Unavailable { missing: String },
}

impl TradeOutcome {
    pub fn estimated(trade: Trade) -> Self {
        Self {
            trade,
            status: TradeStatus::Estimated,
        }
    }

    pub fn unavailable(trade: Trade, missing: impl Into<String>) -> Self {
        Self {
            trade,
            status: TradeStatus::Unavailable {
                missing: missing.into(),
            },
        }
    }
}

/// The itemized estimate for one run.
///
/// Created once per run and never mutated; corrections produce a new result
/// with a new ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateResult {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub building_type: crate::building::BuildingType,
    pub climate_zone: u8,
    pub line_items: Vec<LineItem>,
    pub trades: Vec<TradeOutcome>,
    /// Sum of all line subtotals, full precision.
    pub subtotal: Decimal,
    pub contingency_percent: Decimal,
    pub contingency: Decimal,
    pub permit_cost: Decimal,
    /// `subtotal + contingency + permit_cost`, full precision.
    pub total: Decimal,
    /// Accuracy score in [0, 1]; `None` when there was nothing to score.
    pub accuracy: Option<f64>,
    /// Run-level degradations that are not tied to a single line.
    pub notes: Vec<String>,
}

impl EstimateResult {
    /// Total rounded to cents for display and comparison.
    pub fn rounded_total(&self) -> Decimal {
        self.total.round_dp(2)
    }

    /// Trades that could not be estimated this run.
    pub fn unavailable_trades(&self) -> Vec<Trade> {
        self.trades
            .iter()
            .filter(|t| matches!(t.status, TradeStatus::Unavailable { .. }))
            .map(|t| t.trade)
            .collect()
    }

    /// Line items for one trade, in insertion order.
    pub fn items_for(&self, trade: Trade) -> Vec<&LineItem> {
        self.line_items.iter().filter(|i| i.trade == trade).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_line_item_subtotal_is_quantity_times_price() {
        let item = LineItem::new(
            Trade::Framing,
            "stud_2x4",
            "2x4x8 SPF stud",
            120.0,
            Unit::Each,
            dec!(4.25),
        );
        assert_eq!(item.subtotal, dec!(510.00));
    }

    #[test]
    fn test_trade_keys_are_unique() {
        let mut keys: Vec<_> = Trade::ALL.iter().map(|t| t.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), Trade::ALL.len());
    }
}
