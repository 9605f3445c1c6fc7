use crate::models::FoodEntry;

/// Calories per gram of each macronutrient (Atwater factors).
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Running totals across a sequence of logged entries.
///
/// Always recomputed from the entry list, never stored. Macro and weight
/// sums are rounded to one decimal place; calories are left unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub weight: f64,
}

/// Round to one decimal place.
#[inline]
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl Totals {
    /// Field-wise sum over `entries`. All-zero for an empty slice.
    pub fn from_entries(entries: &[FoodEntry]) -> Self {
        let mut totals = Totals::default();
        for entry in entries {
            totals.calories += entry.calories;
            totals.protein += entry.protein;
            totals.carbs += entry.carbs;
            totals.fat += entry.fat;
            totals.weight += entry.weight;
        }

        Totals {
            calories: totals.calories,
            protein: round1(totals.protein),
            carbs: round1(totals.carbs),
            fat: round1(totals.fat),
            weight: round1(totals.weight),
        }
    }

    /// Share of calories contributed by protein, in percent.
    ///
    /// Returns 0.0 when total calories is zero rather than dividing by it.
    pub fn protein_pct(&self) -> f64 {
        self.macro_pct(self.protein * KCAL_PER_G_PROTEIN)
    }

    /// Share of calories contributed by carbs, in percent.
    pub fn carbs_pct(&self) -> f64 {
        self.macro_pct(self.carbs * KCAL_PER_G_CARBS)
    }

    /// Share of calories contributed by fat, in percent.
    pub fn fat_pct(&self) -> f64 {
        self.macro_pct(self.fat * KCAL_PER_G_FAT)
    }

    fn macro_pct(&self, macro_kcal: f64) -> f64 {
        if self.calories > 0.0 {
            macro_kcal / self.calories * 100.0
        } else {
            0.0
        }
    }
}
