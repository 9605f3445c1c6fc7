use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{Result, TrackerError};
use crate::models::{FoodEntry, Unit};
use crate::provider::NutritionProvider;

/// Environment variable holding the API key.
const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable overriding the model name.
const GEMINI_MODEL_ENV: &str = "GEMINI_MODEL";

/// Default model to use.
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Base URL for the Generative Language API.
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Maximum number of suggestion candidates returned.
const MAX_SUGGESTIONS: usize = 5;

// ============================================================================
// API request/response types
// ============================================================================

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
struct ContentPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    /// Forces the model to emit a bare JSON document.
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

/// Nutrition payload the lookup prompt asks the model for.
///
/// Parsed leniently (extra keys tolerated) before being converted into a
/// validated [`FoodEntry`].
#[derive(Debug, Deserialize)]
struct NutritionPayload {
    name: String,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    weight: f64,
}

// ============================================================================
// Provider implementation
// ============================================================================

/// Nutrition lookups backed by the Google Generative Language API.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Build a provider from `GEMINI_API_KEY`, honoring `GEMINI_MODEL`.
    ///
    /// A missing key is a configuration failure reported through the same
    /// provider error kind the lookups use.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(GEMINI_API_KEY_ENV).map_err(|_| {
            TrackerError::Provider(format!("{} environment variable not set", GEMINI_API_KEY_ENV))
        })?;

        let mut provider = Self::new(api_key);
        if let Ok(model) = env::var(GEMINI_MODEL_ENV) {
            provider.model = model;
        }
        Ok(provider)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            API_BASE_URL, self.model, self.api_key
        )
    }

    /// Send one prompt and return the first candidate's text.
    async fn generate(&self, prompt: String) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![ContentPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.2,
                response_mime_type: "application/json".to_string(),
            },
        };

        let response = self
            .client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {}", e);
                TrackerError::Provider(format!("failed to reach nutrition service: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            TrackerError::Provider(format!("failed to read nutrition response: {}", e))
        })?;

        if !status.is_success() {
            return Err(Self::error_from_body(status, &body));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Unparseable Gemini response: {}", e);
            TrackerError::Provider(format!("unexpected nutrition response: {}", e))
        })?;

        if let Some(api_error) = parsed.error {
            return Err(TrackerError::Provider(api_error.message));
        }

        parsed
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|p| p.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| TrackerError::Provider("nutrition service returned no text".to_string()))
    }

    /// Map a non-success HTTP status to a provider error, preferring the
    /// service's own message when the body carries one.
    fn error_from_body(status: reqwest::StatusCode, body: &str) -> TrackerError {
        #[derive(Deserialize)]
        struct ErrorEnvelope {
            error: GeminiError,
        }

        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.chars().take(200).collect());

        TrackerError::Provider(format!("nutrition service error ({}): {}", status, message))
    }

    fn suggest_prompt(query: &str) -> String {
        format!(
            "List up to {} common food names that complete the partial \
             food name {:?}. Respond with a JSON array of strings and \
             nothing else.",
            MAX_SUGGESTIONS, query
        )
    }

    fn lookup_prompt(name: &str, quantity: f64, unit: Unit) -> String {
        let portion = match unit {
            Unit::Grams => format!("{} grams of {:?}", quantity, name),
            Unit::Piece => format!(
                "{} piece(s) of {:?} (convert pieces to a typical gram weight)",
                quantity, name
            ),
        };
        format!(
            "Estimate the nutrition of {portion}. Respond with a single JSON \
             object with exactly these keys: \"name\" (string), \"calories\", \
             \"protein\", \"carbs\", \"fat\", \"weight\" (numbers; grams for \
             the macros and weight, scaled to the full portion). No other text."
        )
    }

    /// Parse the model's suggestion payload into at most
    /// [`MAX_SUGGESTIONS`] non-empty names.
    fn parse_suggestions(text: &str) -> Result<Vec<String>> {
        let names: Vec<String> = serde_json::from_str(text).map_err(|e| {
            TrackerError::Provider(format!("unexpected suggestion payload: {}", e))
        })?;

        Ok(names
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .take(MAX_SUGGESTIONS)
            .collect())
    }

    /// Parse and validate the model's nutrition payload.
    fn parse_entry(text: &str) -> Result<FoodEntry> {
        let payload: NutritionPayload = serde_json::from_str(text).map_err(|e| {
            TrackerError::Provider(format!("unexpected nutrition payload: {}", e))
        })?;

        let entry = FoodEntry {
            name: payload.name,
            calories: payload.calories,
            protein: payload.protein,
            carbs: payload.carbs,
            fat: payload.fat,
            weight: payload.weight,
        };

        entry.validate().map_err(|e| {
            TrackerError::Provider(format!("nutrition service returned invalid entry: {}", e))
        })?;

        Ok(entry)
    }
}

#[async_trait]
impl NutritionProvider for GeminiProvider {
    async fn suggest(&self, query: &str) -> Result<Vec<String>> {
        debug!("Requesting suggestions for {:?}", query);
        let text = self.generate(Self::suggest_prompt(query)).await?;
        Self::parse_suggestions(&text)
    }

    async fn lookup(&self, name: &str, quantity: f64, unit: Unit) -> Result<FoodEntry> {
        debug!("Looking up {:?} x{} {}", name, quantity, unit);
        let text = self.generate(Self::lookup_prompt(name, quantity, unit)).await?;
        Self::parse_entry(&text)
    }
}
