use serde::{Deserialize, Serialize, Serializer};

/// Whole values go out as JSON integers (`0`, not `0.0`); clients decode them as ints.
fn whole_as_int<S>(v: &f64, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        s.serialize_i64(*v as i64)
    } else {
        s.serialize_f64(*v)
    }
}

/// A single meal suggestion. Wire keys are the short ones the mobile client reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    #[serde(rename = "desc")]
    pub description: String,
    #[serde(rename = "cals", serialize_with = "whole_as_int")]
    pub calories: f64,
    #[serde(rename = "p", serialize_with = "whole_as_int")]
    pub protein: f64,
    #[serde(rename = "f", serialize_with = "whole_as_int")]
    pub fat: f64,
    #[serde(rename = "c", serialize_with = "whole_as_int")]
    pub carbs: f64,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Deserialize)]
pub struct MealQuery {
    #[serde(rename = "type")]
    pub meal_type: String,
}

#[derive(Debug, Serialize)]
pub struct MealError {
    pub error: String,
}

/// Body of `GET /get_meal`: either a meal or an inline error object, both sent with 200.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MealResponse {
    Meal(Meal),
    Error(MealError),
}
