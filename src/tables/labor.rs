//! Labor rates by trade.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// Labor pricing for one trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborRate {
    pub hourly_rate: Decimal,
    /// Crew hours per unit of the trade's labor basis.
    pub hours_per_unit: f64,
    /// What the basis quantity is, e.g. "sqft living area".
    pub basis: String,
}

/// Labor schedule keyed by trade key.
#[derive(Debug, Clone, Default)]
pub struct LaborSchedule {
    trades: HashMap<String, LaborRate>,
}

impl LaborSchedule {
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let trades: HashMap<String, LaborRate> = serde_json::from_str(json)?;
        Ok(Self { trades })
    }

    /// Rate lookup. A missing trade is recoverable with fallback pricing,
    /// same as an unknown material.
    pub fn rate(&self, trade_key: &str) -> Result<&LaborRate, TableError> {
        self.trades.get(trade_key).ok_or_else(|| TableError::UnknownTrade {
            trade: trade_key.to_string(),
        })
    }

    pub fn merge(&mut self, layer: &HashMap<String, LaborRate>) {
        for (key, rate) in layer {
            self.trades.insert(key.clone(), rate.clone());
        }
    }

    /// Trades sorted by key, for display.
    pub fn sorted(&self) -> Vec<(&String, &LaborRate)> {
        let mut all: Vec<_> = self.trades.iter().collect();
        all.sort_by(|(a, _), (b, _)| a.cmp(b));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_and_lookup() {
        let json = r#"{
            "framing": {"hourly_rate": "45.00", "hours_per_unit": 0.05, "basis": "sqft living area"}
        }"#;
        let schedule = LaborSchedule::from_json(json).unwrap();
        let rate = schedule.rate("framing").unwrap();
        assert_eq!(rate.hourly_rate, dec!(45.00));
        assert!(schedule.rate("falconry").is_err());
    }
}
