mod gemini;

pub use gemini::GeminiProvider;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{FoodEntry, Unit};

/// External nutrition-lookup service.
///
/// Implementations own all portion-to-weight and quantity-scaling
/// arithmetic: `lookup("Banana", 2.0, Unit::Piece)` returns the entry for
/// two whole bananas with `weight` already in grams.
#[async_trait]
pub trait NutritionProvider: Send + Sync {
    /// Up to 5 candidate food names completing `query`.
    ///
    /// Failures are non-fatal to callers; the suggestion flow drops them
    /// silently.
    async fn suggest(&self, query: &str) -> Result<Vec<String>>;

    /// Estimate a structurally valid [`FoodEntry`] for the given portion.
    async fn lookup(&self, name: &str, quantity: f64, unit: Unit) -> Result<FoodEntry>;
}
