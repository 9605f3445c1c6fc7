mod food;
mod totals;

pub use food::{FoodEntry, Unit};
pub use totals::Totals;
