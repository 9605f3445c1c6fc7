mod add;
mod suggest;

pub use add::{AddFoodWorkflow, PendingAdd};
pub use suggest::{SuggestionSession, SuggestionState, DEFAULT_DEBOUNCE};

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::{FoodEntry, Totals, Unit};
use crate::provider::NutritionProvider;
use crate::state::{self, FoodLedger};

/// One logging session: the ledger plus the two request state machines,
/// behind the operations a presentation layer drives.
///
/// The ledger is only ever mutated through this type (or the workflow it
/// owns), so every mutation goes through one exclusive-access path.
pub struct TrackerSession {
    ledger: Arc<Mutex<FoodLedger>>,
    suggestions: SuggestionSession,
    workflow: AddFoodWorkflow,
    quantity: f64,
    unit: Unit,
}

impl TrackerSession {
    pub fn new(provider: Arc<dyn NutritionProvider>) -> Self {
        Self::with_debounce(provider, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(provider: Arc<dyn NutritionProvider>, debounce: Duration) -> Self {
        let ledger = Arc::new(Mutex::new(FoodLedger::new()));
        Self {
            suggestions: SuggestionSession::new(Arc::clone(&provider), debounce),
            workflow: AddFoodWorkflow::new(provider, Arc::clone(&ledger)),
            ledger,
            quantity: 100.0,
            unit: Unit::Grams,
        }
    }

    /// Update the food-name query; drives the suggestion flow.
    pub async fn set_query(&mut self, text: &str) {
        self.suggestions.on_query_changed(text).await;
    }

    pub fn set_quantity(&mut self, quantity: f64) {
        self.quantity = quantity;
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
    }

    /// Accept a suggestion as the new query text.
    pub async fn select_suggestion(&mut self, name: &str) {
        self.suggestions.on_suggestion_selected(name).await;
    }

    /// Look up the pending query with the current quantity and unit, and
    /// append the estimate to the ledger.
    ///
    /// On success the query text and suggestion list are cleared, ready
    /// for the next food.
    pub async fn add_food(&mut self) -> Result<FoodEntry> {
        let name = self.suggestions.query().await;
        let entry = self.workflow.add_food(&name, self.quantity, self.unit).await?;
        self.suggestions.reset().await;
        Ok(entry)
    }

    /// Write the ledger to `path` in the export format.
    pub async fn export_ledger<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let ledger = self.ledger.lock().await;
        state::export_ledger(path, &ledger)
    }

    /// Replace the whole ledger with the contents of an exported file.
    ///
    /// On any failure the current entries are kept. Returns the number of
    /// imported entries.
    pub async fn import_ledger<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let entries = state::import_ledger(path)?;
        let count = entries.len();
        self.ledger.lock().await.replace_all(entries)?;
        Ok(count)
    }

    pub async fn totals(&self) -> Totals {
        self.ledger.lock().await.totals()
    }

    pub async fn entries(&self) -> Vec<FoodEntry> {
        self.ledger.lock().await.entries().to_vec()
    }

    pub async fn query(&self) -> String {
        self.suggestions.query().await
    }

    pub async fn suggestions(&self) -> Vec<String> {
        self.suggestions.suggestions().await
    }

    pub async fn suggestion_state(&self) -> SuggestionState {
        self.suggestions.state().await
    }

    pub async fn on_focus(&self) {
        self.suggestions.on_focus().await;
    }

    pub async fn on_blur(&self) {
        self.suggestions.on_blur().await;
    }

    pub async fn pending_add(&self) -> PendingAdd {
        self.workflow.pending().await
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::error::TrackerError;

    /// Provider whose suggestions echo the query and whose lookups return
    /// a fixed banana entry.
    struct BananaProvider;

    fn banana() -> FoodEntry {
        FoodEntry {
            name: "Banana".to_string(),
            calories: 105.0,
            protein: 1.3,
            carbs: 27.0,
            fat: 0.4,
            weight: 118.0,
        }
    }

    #[async_trait]
    impl NutritionProvider for BananaProvider {
        async fn suggest(&self, query: &str) -> Result<Vec<String>> {
            Ok(vec![format!("{} bread", query), "Banana".to_string()])
        }

        async fn lookup(&self, name: &str, _quantity: f64, _unit: Unit) -> Result<FoodEntry> {
            if name == "Banana" {
                Ok(banana())
            } else {
                Err(TrackerError::Provider("unknown food".to_string()))
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_food_uses_query_and_clears_it() {
        let mut session = TrackerSession::new(Arc::new(BananaProvider));
        session.set_query("Banana").await;
        session.set_quantity(1.0);
        session.set_unit(Unit::Piece);

        let entry = session.add_food().await.unwrap();
        assert_eq!(entry, banana());
        assert_eq!(session.totals().await.calories, 105.0);
        assert_eq!(session.query().await, "");
        assert!(session.suggestions().await.is_empty());
        assert_eq!(session.suggestion_state().await, SuggestionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_add_keeps_query_and_totals() {
        let mut session = TrackerSession::new(Arc::new(BananaProvider));
        session.set_query("Dragonfruit").await;

        let err = session.add_food().await.unwrap_err();
        assert!(err.is_provider());
        assert_eq!(session.totals().await, Totals::default());
        assert_eq!(session.query().await, "Dragonfruit");
        assert!(session.pending_add().await.error().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_suggestion_feeds_add() {
        let mut session = TrackerSession::new(Arc::new(BananaProvider));
        session.set_query("Ban").await;
        tokio::time::sleep(DEFAULT_DEBOUNCE + Duration::from_millis(50)).await;
        assert!(!session.suggestions().await.is_empty());

        session.select_suggestion("Banana").await;
        session.set_quantity(1.0);
        session.set_unit(Unit::Piece);
        session.add_food().await.unwrap();

        assert_eq!(session.entries().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_import_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        let mut session = TrackerSession::new(Arc::new(BananaProvider));
        session.set_query("Banana").await;
        session.set_quantity(1.0);
        session.set_unit(Unit::Piece);
        session.add_food().await.unwrap();
        session.export_ledger(&path).await.unwrap();

        let mut fresh = TrackerSession::new(Arc::new(BananaProvider));
        let count = fresh.import_ledger(&path).await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(fresh.entries().await, session.entries().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bad_import_keeps_existing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();

        let mut session = TrackerSession::new(Arc::new(BananaProvider));
        session.set_query("Banana").await;
        session.set_quantity(1.0);
        session.set_unit(Unit::Piece);
        session.add_food().await.unwrap();

        assert!(session.import_ledger(&path).await.is_err());
        assert_eq!(session.entries().await.len(), 1);
    }
}
