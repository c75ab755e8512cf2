//! Partial override layers merged on top of the built-in tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::labor::LaborRate;
use super::materials::MaterialEntry;
use super::permits::PermitFee;

/// A partial override of any table entry.
///
/// Loaded per user profile from the persistence layer, or from a regional
/// pricing file. Absent sections leave the underlying table untouched; code
/// requirements are statutory and cannot be overridden.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableOverrides {
    #[serde(default)]
    pub materials: HashMap<String, MaterialEntry>,
    #[serde(default)]
    pub labor: HashMap<String, LaborRate>,
    #[serde(default)]
    pub permits: HashMap<String, PermitFee>,
}

impl TableOverrides {
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty() && self.labor.is_empty() && self.permits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_detection() {
        assert!(TableOverrides::default().is_empty());

        let json = r#"{"materials": {"brick": {"name": "brick", "unit": "each", "unit_price": "0.85"}}}"#;
        let layer: TableOverrides = serde_json::from_str(json).unwrap();
        assert!(!layer.is_empty());
        assert!(layer.labor.is_empty());
    }
}
