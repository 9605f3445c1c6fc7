use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{Result, TrackerError};
use crate::models::{FoodEntry, Unit};
use crate::provider::NutritionProvider;
use crate::state::FoodLedger;

/// Single-flight request state for the add-food flow.
#[derive(Debug, Clone, Default)]
pub struct PendingAdd {
    in_flight: bool,
    error: Option<String>,
}

impl PendingAdd {
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Message from the most recent failed add, cleared when a new add
    /// starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Orchestrates one nutrition lookup and the resulting ledger append.
///
/// While an add is in flight every further `add_food` call is rejected
/// immediately (no queueing); two lookups racing to append would corrupt
/// entry ordering.
pub struct AddFoodWorkflow {
    provider: Arc<dyn NutritionProvider>,
    ledger: Arc<Mutex<FoodLedger>>,
    pending: Arc<Mutex<PendingAdd>>,
}

impl AddFoodWorkflow {
    pub fn new(provider: Arc<dyn NutritionProvider>, ledger: Arc<Mutex<FoodLedger>>) -> Self {
        Self {
            provider,
            ledger,
            pending: Arc::new(Mutex::new(PendingAdd::default())),
        }
    }

    /// Look up `name` with the provider and append the result.
    ///
    /// On failure the ledger is untouched and the user-facing message is
    /// kept in the pending state; resubmitting is up to the user.
    pub async fn add_food(&self, name: &str, quantity: f64, unit: Unit) -> Result<FoodEntry> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::Validation("empty name".to_string()));
        }
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(TrackerError::Validation(format!(
                "quantity must be positive, got {}",
                quantity
            )));
        }

        {
            let mut pending = self.pending.lock().await;
            if pending.in_flight {
                return Err(TrackerError::Validation(
                    "another food is still being added".to_string(),
                ));
            }
            pending.in_flight = true;
            pending.error = None;
        }

        debug!("Adding food {:?} x{} {}", name, quantity, unit);

        // The pending lock is released while the provider call is in
        // flight so callers can observe the in-flight flag.
        let result = self.provider.lookup(name, quantity, unit).await;

        match result {
            Ok(entry) => {
                if let Err(e) = entry.validate() {
                    return self
                        .fail(name, format!("provider returned invalid entry: {}", e))
                        .await;
                }

                self.ledger.lock().await.append(entry.clone());
                self.pending.lock().await.in_flight = false;

                debug!("Added {}", entry.debug_string());
                Ok(entry)
            }
            Err(e) => self.fail(name, e.to_string()).await,
        }
    }

    async fn fail(&self, name: &str, reason: String) -> Result<FoodEntry> {
        warn!("Add of {:?} failed: {}", name, reason);

        let message = format!("Could not add '{}': {}", name, reason);
        let mut pending = self.pending.lock().await;
        pending.in_flight = false;
        pending.error = Some(message.clone());

        Err(TrackerError::Provider(message))
    }

    pub async fn pending(&self) -> PendingAdd {
        self.pending.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

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

    /// Scripted lookup fake; counts calls, optionally delays, and replays
    /// its last scripted response once the script runs out.
    struct ScriptedProvider {
        lookups: AtomicUsize,
        script: std::sync::Mutex<Vec<Option<FoodEntry>>>,
        delay: Duration,
    }

    impl ScriptedProvider {
        fn scripted(script: Vec<Option<FoodEntry>>) -> Self {
            Self {
                lookups: AtomicUsize::new(0),
                script: std::sync::Mutex::new(script),
                delay: Duration::ZERO,
            }
        }

        fn returning(entry: FoodEntry) -> Self {
            Self::scripted(vec![Some(entry)])
        }

        fn failing() -> Self {
            Self::scripted(vec![None])
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn lookup_count(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NutritionProvider for ScriptedProvider {
        async fn suggest(&self, _query: &str) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn lookup(&self, _name: &str, _quantity: f64, _unit: Unit) -> Result<FoodEntry> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let response = {
                let mut script = self.script.lock().unwrap();
                if script.len() > 1 {
                    script.remove(0)
                } else {
                    script[0].clone()
                }
            };

            response.ok_or_else(|| TrackerError::Provider("lookup failed".to_string()))
        }
    }

    fn workflow_with(provider: Arc<ScriptedProvider>) -> (AddFoodWorkflow, Arc<Mutex<FoodLedger>>) {
        let ledger = Arc::new(Mutex::new(FoodLedger::new()));
        (
            AddFoodWorkflow::new(provider, Arc::clone(&ledger)),
            ledger,
        )
    }

    #[tokio::test]
    async fn test_add_food_appends_provider_entry() {
        let provider = Arc::new(ScriptedProvider::returning(banana()));
        let (workflow, ledger) = workflow_with(Arc::clone(&provider));

        let entry = workflow.add_food("Banana", 1.0, Unit::Piece).await.unwrap();
        assert_eq!(entry, banana());

        let ledger = ledger.lock().await;
        assert_eq!(ledger.entries(), &[banana()]);
        assert_eq!(ledger.totals().calories, 105.0);
    }

    #[tokio::test]
    async fn test_blank_name_fails_without_provider_call() {
        let provider = Arc::new(ScriptedProvider::returning(banana()));
        let (workflow, ledger) = workflow_with(Arc::clone(&provider));

        let err = workflow.add_food("   ", 100.0, Unit::Grams).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(provider.lookup_count(), 0);
        assert!(ledger.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_quantity_rejected() {
        let provider = Arc::new(ScriptedProvider::returning(banana()));
        let (workflow, _ledger) = workflow_with(Arc::clone(&provider));

        let err = workflow.add_food("Banana", 0.0, Unit::Grams).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(provider.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_leaves_ledger_and_sets_error() {
        let provider = Arc::new(ScriptedProvider::failing());
        let (workflow, ledger) = workflow_with(Arc::clone(&provider));

        let totals_before = ledger.lock().await.totals();
        let err = workflow.add_food("Banana", 1.0, Unit::Piece).await.unwrap_err();

        assert!(err.is_provider());
        assert_eq!(ledger.lock().await.totals(), totals_before);

        let pending = workflow.pending().await;
        assert!(!pending.in_flight());
        assert!(!pending.error().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_next_add_clears_previous_error() {
        let provider = Arc::new(ScriptedProvider::scripted(vec![None, Some(banana())]));
        let (workflow, ledger) = workflow_with(provider);

        workflow.add_food("Banana", 1.0, Unit::Piece).await.unwrap_err();
        assert!(workflow.pending().await.error().is_some());

        workflow.add_food("Banana", 1.0, Unit::Piece).await.unwrap();
        assert!(workflow.pending().await.error().is_none());
        assert_eq!(ledger.lock().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_add_rejected_while_in_flight() {
        let provider = Arc::new(
            ScriptedProvider::returning(banana()).with_delay(Duration::from_millis(100)),
        );
        let (workflow, ledger) = workflow_with(Arc::clone(&provider));

        let (first, second) = tokio::join!(workflow.add_food("Banana", 1.0, Unit::Piece), async {
            // Let the first call reach its provider await.
            tokio::time::sleep(Duration::from_millis(10)).await;
            workflow.add_food("Egg", 1.0, Unit::Piece).await
        });

        assert!(first.is_ok());
        assert!(second.unwrap_err().is_validation());
        assert_eq!(provider.lookup_count(), 1);
        assert_eq!(ledger.lock().await.len(), 1);
    }
}
