pub mod cli;
pub mod error;
pub mod interface;
pub mod models;
pub mod provider;
pub mod session;
pub mod state;

pub use error::{Result, TrackerError};
pub use models::{FoodEntry, Totals, Unit};
pub use session::TrackerSession;
