use serde::{de, Deserialize, Deserializer, Serialize};

/// Only `"male"` selects the male BMR constant; every other value takes the other branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Gender {
    Male,
    Other,
}

impl From<String> for Gender {
    fn from(s: String) -> Self {
        if s == "male" {
            Gender::Male
        } else {
            Gender::Other
        }
    }
}

/// Unrecognised goals are treated as maintenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl From<String> for Goal {
    fn from(s: String) -> Self {
        match s.as_str() {
            "lose" => Goal::Lose,
            "gain" => Goal::Gain,
            _ => Goal::Maintain,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accepts a JSON number or a numeric string such as `"70"`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Lenient::deserialize(deserializer)? {
        Lenient::Int(v) => Ok(v as f64),
        Lenient::Float(v) => Ok(v),
        Lenient::Text(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

/// Accepts an integer, a whole float (`30.0`) or a numeric string.
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let whole = |v: f64| -> Result<i64, D::Error> {
        if v.is_finite() && v.fract() == 0.0 {
            Ok(v as i64)
        } else {
            Err(de::Error::custom(format!("expected a whole number, got {v}")))
        }
    };
    match Lenient::deserialize(deserializer)? {
        Lenient::Int(v) => Ok(v),
        Lenient::Float(v) => whole(v),
        Lenient::Text(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(v) => Ok(v),
                Err(_) => whole(s.parse::<f64>().map_err(de::Error::custom)?),
            }
        }
    }
}

/// Request body for `POST /calculate`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserParams {
    pub gender: Gender,
    #[serde(deserialize_with = "lenient_f64")]
    pub weight: f64, // kg
    #[serde(deserialize_with = "lenient_f64")]
    pub height: f64, // cm
    #[serde(deserialize_with = "lenient_i64")]
    pub age: i64, // years
    #[serde(deserialize_with = "lenient_f64")]
    pub activity: f64, // multiplier
    pub goal: Goal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Macros {
    pub protein: i64,
    pub fat: i64,
    pub carbs: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacroResult {
    pub bmr: i64,
    pub calories: i64,
    pub macros: Macros,
}
