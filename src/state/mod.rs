mod ledger;
mod persistence;

pub use ledger::FoodLedger;
pub use persistence::{export_ledger, import_ledger};
