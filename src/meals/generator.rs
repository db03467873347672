use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use super::{
    dto::Meal,
    llm::{ChatClient, ChatError},
    services::{sentinel_meal, MealSuggester, MealSuggestion, Slot},
};

const SYSTEM_PROMPT: &str = "Ти професійний дієтолог. Ти відповідаєш тільки чистим JSON.";
const TEMPERATURE: f32 = 0.9;

/// Why a generated meal could not be used.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamFailure {
    #[error("unknown slot '{0}'")]
    UnknownSlot(String),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error("completion is not JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("completion has wrong shape: {0}")]
    InvalidShape(String),
}

pub fn build_prompt(slot: Slot) -> String {
    format!(
        r##"Придумай одну смачну та просту страву для категорії '{slot}' ({label}).
Відповідь має бути виключно у форматі JSON без жодного іншого тексту.
Структура JSON:
{{
    "name": "Назва страви (українською)",
    "desc": "Короткий перелік інгредієнтів (українською)",
    "cals": приблизна калорійність (число),
    "p": білки в грамах (число),
    "f": жири в грамах (число),
    "c": вуглеводи в грамах (число),
    "icon": "один емодзі, що пасує до страви",
    "color": "світлий пастельний колір у форматі HEX для фону іконки, наприклад #FFF3E0"
}}"##,
        slot = slot.as_str(),
        label = slot.label_uk(),
    )
}

/// Drops every markdown code-fence marker, wherever it appears.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

fn validate(meal: &Meal) -> Result<(), UpstreamFailure> {
    lazy_static! {
        static ref HEX_COLOR_RE: Regex =
            Regex::new(r"^#(?:[0-9A-Fa-f]{6}|[0-9A-Fa-f]{3})$").unwrap();
    }

    for (field, value) in [
        ("name", &meal.name),
        ("desc", &meal.description),
        ("icon", &meal.icon),
    ] {
        if value.trim().is_empty() {
            return Err(UpstreamFailure::InvalidShape(format!("'{field}' is empty")));
        }
    }
    for (field, value) in [
        ("cals", meal.calories),
        ("p", meal.protein),
        ("f", meal.fat),
        ("c", meal.carbs),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(UpstreamFailure::InvalidShape(format!(
                "'{field}' must be a non-negative number, got {value}"
            )));
        }
    }
    if !HEX_COLOR_RE.is_match(&meal.color) {
        return Err(UpstreamFailure::InvalidShape(format!(
            "'color' is not a hex color: {}",
            meal.color
        )));
    }
    Ok(())
}

/// Parses a completion into a checked `Meal`.
pub fn parse_meal(raw: &str) -> Result<Meal, UpstreamFailure> {
    let cleaned = strip_code_fences(raw);
    let value: serde_json::Value =
        serde_json::from_str(&cleaned).map_err(UpstreamFailure::Parse)?;
    let meal: Meal = serde_json::from_value(value)
        .map_err(|e| UpstreamFailure::InvalidShape(e.to_string()))?;
    validate(&meal)?;
    Ok(meal)
}

/// Meal suggestions from a text-generation service, with a sentinel on any failure.
#[derive(Clone)]
pub struct AiMealGenerator {
    client: Arc<dyn ChatClient>,
}

impl AiMealGenerator {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self { client }
    }

    pub async fn generate(&self, slot: &str) -> Result<Meal, UpstreamFailure> {
        let slot = slot
            .parse::<Slot>()
            .map_err(|_| UpstreamFailure::UnknownSlot(slot.to_string()))?;
        let prompt = build_prompt(slot);
        let raw = self
            .client
            .complete(SYSTEM_PROMPT, &prompt, TEMPERATURE)
            .await?;
        parse_meal(&raw)
    }
}

#[async_trait]
impl MealSuggester for AiMealGenerator {
    #[instrument(skip(self))]
    async fn suggest(&self, slot: &str) -> MealSuggestion {
        match self.generate(slot).await {
            Ok(meal) => {
                info!(meal = %meal.name, "meal generated");
                MealSuggestion::Meal(meal)
            }
            Err(reason) => {
                warn!(error = %reason, "meal generation failed; serving sentinel");
                MealSuggestion::Meal(sentinel_meal())
            }
        }
    }
}
