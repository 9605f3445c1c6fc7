use std::sync::Arc;
use std::time::Duration;

use strsim::jaro_winkler;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::provider::NutritionProvider;

/// Default debounce delay between the last keystroke and the suggest call.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Maximum number of suggestions kept after ranking.
const MAX_SUGGESTIONS: usize = 5;

/// Where the suggestion flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionState {
    /// Empty query, nothing shown.
    Idle,
    /// Query typed, waiting for the debounce to expire.
    Debouncing,
    /// Suggestions fetched and visible.
    Showing,
    /// Suggestions fetched but dismissed (focus loss).
    Hidden,
}

struct SuggestShared {
    query: String,
    /// Bumped on every query change; a fetch only applies its result while
    /// its captured generation is still current.
    generation: u64,
    state: SuggestionState,
    suggestions: Vec<String>,
}

/// Debounced query-to-suggestion flow.
///
/// Each query change aborts the outstanding debounce task and invalidates
/// any in-flight suggest call, so a late response can never overwrite a
/// newer query's list.
pub struct SuggestionSession {
    provider: Arc<dyn NutritionProvider>,
    debounce: Duration,
    shared: Arc<Mutex<SuggestShared>>,
    pending: Option<JoinHandle<()>>,
}

impl SuggestionSession {
    pub fn new(provider: Arc<dyn NutritionProvider>, debounce: Duration) -> Self {
        Self {
            provider,
            debounce,
            shared: Arc::new(Mutex::new(SuggestShared {
                query: String::new(),
                generation: 0,
                state: SuggestionState::Idle,
                suggestions: Vec::new(),
            })),
            pending: None,
        }
    }

    /// Record new query text and (re)start the debounce.
    ///
    /// An empty query cancels everything and returns to `Idle` immediately.
    pub async fn on_query_changed(&mut self, text: &str) {
        self.abort_pending();

        let mut shared = self.shared.lock().await;
        shared.query = text.to_string();
        shared.generation += 1;

        if text.trim().is_empty() {
            shared.suggestions.clear();
            shared.state = SuggestionState::Idle;
            return;
        }

        shared.state = SuggestionState::Debouncing;
        let generation = shared.generation;
        let query = shared.query.clone();
        drop(shared);

        let provider = Arc::clone(&self.provider);
        let shared = Arc::clone(&self.shared);
        let delay = self.debounce;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let result = provider.suggest(&query).await;

            let mut shared = shared.lock().await;
            if shared.generation != generation {
                // A newer query superseded this fetch.
                return;
            }

            match result {
                Ok(names) => {
                    shared.suggestions = rank_candidates(&query, names);
                    shared.state = SuggestionState::Showing;
                }
                Err(e) => {
                    // Suggestions are a non-critical enhancement.
                    warn!("Suggestion lookup for {:?} failed: {}", query, e);
                    shared.suggestions.clear();
                    shared.state = SuggestionState::Idle;
                }
            }
        }));
    }

    /// Accept a suggestion: it becomes the query text and the list closes.
    pub async fn on_suggestion_selected(&mut self, name: &str) {
        self.abort_pending();

        let mut shared = self.shared.lock().await;
        shared.query = name.to_string();
        shared.generation += 1;
        shared.suggestions.clear();
        shared.state = SuggestionState::Idle;
    }

    /// Reopen the list on focus when there is something to show.
    pub async fn on_focus(&self) {
        let mut shared = self.shared.lock().await;
        if !shared.suggestions.is_empty() {
            shared.state = SuggestionState::Showing;
        }
    }

    /// Dismiss a visible list without discarding it.
    pub async fn on_blur(&self) {
        let mut shared = self.shared.lock().await;
        if shared.state == SuggestionState::Showing {
            shared.state = SuggestionState::Hidden;
        }
    }

    /// Clear query, suggestions, and any pending fetch.
    pub async fn reset(&mut self) {
        self.on_query_changed("").await;
    }

    pub async fn query(&self) -> String {
        self.shared.lock().await.query.clone()
    }

    pub async fn suggestions(&self) -> Vec<String> {
        self.shared.lock().await.suggestions.clone()
    }

    pub async fn state(&self) -> SuggestionState {
        self.shared.lock().await.state
    }

    fn abort_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

impl Drop for SuggestionSession {
    fn drop(&mut self) {
        self.abort_pending();
    }
}

/// Order candidates by similarity to the query and cap the list.
fn rank_candidates(query: &str, names: Vec<String>) -> Vec<String> {
    let query = query.to_lowercase();

    let mut scored: Vec<(String, f64)> = names
        .into_iter()
        .filter(|n| !n.trim().is_empty())
        .map(|n| {
            let score = jaro_winkler(&n.to_lowercase(), &query);
            (n, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(n, _)| n)
        .collect()
}
