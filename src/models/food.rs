use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// One logged food item as estimated by the nutrition provider.
///
/// Macro fields and `weight` are grams for the effective portion; no
/// invariant ties `calories` to the macros (the provider owns that
/// consistency).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FoodEntry {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub weight: f64,
}

impl FoodEntry {
    /// Check the entry invariant: non-empty name, all numbers finite and
    /// non-negative.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TrackerError::Validation(
                "food entry has an empty name".to_string(),
            ));
        }

        let fields = [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
            ("weight", self.weight),
        ];

        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(TrackerError::Validation(format!(
                    "'{}': {} must be a non-negative number, got {}",
                    self.name, field, value
                )));
            }
        }

        Ok(())
    }

    /// Debug string for logging.
    pub fn debug_string(&self) -> String {
        format!(
            "{}: {} cal, P:{} C:{} F:{}, {}g",
            self.name, self.calories, self.protein, self.carbs, self.fat, self.weight
        )
    }
}

/// Portion unit accepted by the provider lookup.
///
/// The provider converts `Piece` to an equivalent gram weight internally and
/// scales every returned field by the requested quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Grams,
    Piece,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Grams => "grams",
            Unit::Piece => "piece",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "grams" | "g" => Ok(Unit::Grams),
            "piece" | "pieces" => Ok(Unit::Piece),
            other => Err(TrackerError::Validation(format!(
                "unknown unit '{}' (expected 'grams' or 'piece')",
                other
            ))),
        }
    }
}
