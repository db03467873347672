use std::{fmt, str::FromStr};

use async_trait::async_trait;

use super::dto::Meal;

/// Meal-time category. Parsing is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Breakfast,
    Lunch,
    Dinner,
}

impl Slot {
    #[cfg(test)]
    pub const ALL: [Slot; 3] = [Slot::Breakfast, Slot::Lunch, Slot::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Breakfast => "breakfast",
            Slot::Lunch => "lunch",
            Slot::Dinner => "dinner",
        }
    }

    /// Ukrainian name used in generation prompts.
    pub fn label_uk(&self) -> &'static str {
        match self {
            Slot::Breakfast => "сніданок",
            Slot::Lunch => "обід",
            Slot::Dinner => "вечеря",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown meal type")]
pub struct UnknownSlot;

impl FromStr for Slot {
    type Err = UnknownSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(Slot::Breakfast),
            "lunch" => Ok(Slot::Lunch),
            "dinner" => Ok(Slot::Dinner),
            _ => Err(UnknownSlot),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MealSuggestion {
    Meal(Meal),
    UnknownSlot,
}

/// Source of meal suggestions. Implementations never fail the request.
#[async_trait]
pub trait MealSuggester: Send + Sync {
    async fn suggest(&self, slot: &str) -> MealSuggestion;
}

/// Returned whenever generation cannot produce a usable meal.
pub fn sentinel_meal() -> Meal {
    Meal {
        name: "Тимчасова страва".into(),
        description: "ШІ відпочиває, спробуйте пізніше".into(),
        calories: 0.0,
        protein: 0.0,
        fat: 0.0,
        carbs: 0.0,
        icon: "🤖".into(),
        color: "#EEEEEE".into(),
    }
}
