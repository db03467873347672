use std::str::FromStr;

/// Which meal source answers `/get_meal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealStrategy {
    Static,
    Ai,
    Auto,
}

impl FromStr for MealStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "ai" => Ok(Self::Ai),
            "auto" | "" => Ok(Self::Auto),
            other => anyhow::bail!("unknown MEAL_STRATEGY '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres URL. When absent the embedded SQLite store is used.
    pub database_url: Option<String>,
    pub sqlite_url: String,
    pub llm: Option<LlmConfig>,
    pub meal_strategy: MealStrategy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let sqlite_url =
            std::env::var("SQLITE_URL").unwrap_or_else(|_| "sqlite://mealmind.db".into());

        let llm = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|api_key| LlmConfig {
                api_key,
                base_url: std::env::var("OPENAI_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
                model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
                timeout_secs: std::env::var("OPENAI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(30),
            });

        let meal_strategy = std::env::var("MEAL_STRATEGY")
            .map(|v| v.parse::<MealStrategy>())
            .unwrap_or(Ok(MealStrategy::Auto))?;

        let config = Self {
            database_url,
            sqlite_url,
            llm,
            meal_strategy,
        };
        config.resolved_strategy()?;
        Ok(config)
    }

    /// Collapses `Auto` into a concrete strategy and rejects `Ai` without a key.
    pub fn resolved_strategy(&self) -> anyhow::Result<MealStrategy> {
        match (self.meal_strategy, self.llm.is_some()) {
            (MealStrategy::Ai, false) => {
                anyhow::bail!("MEAL_STRATEGY=ai requires OPENAI_API_KEY")
            }
            (MealStrategy::Auto, true) | (MealStrategy::Ai, true) => Ok(MealStrategy::Ai),
            _ => Ok(MealStrategy::Static),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(strategy: MealStrategy, with_key: bool) -> AppConfig {
        AppConfig {
            database_url: None,
            sqlite_url: "sqlite::memory:".into(),
            llm: with_key.then(|| LlmConfig {
                api_key: "sk-test".into(),
                base_url: "http://localhost".into(),
                model: "gpt-4o-mini".into(),
                timeout_secs: 5,
            }),
            meal_strategy: strategy,
        }
    }

    #[test]
    fn parses_strategy_names() {
        assert_eq!("static".parse::<MealStrategy>().unwrap(), MealStrategy::Static);
        assert_eq!(" AI ".parse::<MealStrategy>().unwrap(), MealStrategy::Ai);
        assert_eq!("".parse::<MealStrategy>().unwrap(), MealStrategy::Auto);
        assert!("random".parse::<MealStrategy>().is_err());
    }

    #[test]
    fn auto_follows_key_presence() {
        assert_eq!(
            config(MealStrategy::Auto, true).resolved_strategy().unwrap(),
            MealStrategy::Ai
        );
        assert_eq!(
            config(MealStrategy::Auto, false).resolved_strategy().unwrap(),
            MealStrategy::Static
        );
    }

    #[test]
    fn ai_without_key_is_rejected() {
        let err = config(MealStrategy::Ai, false).resolved_strategy().unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn static_ignores_key() {
        assert_eq!(
            config(MealStrategy::Static, true).resolved_strategy().unwrap(),
            MealStrategy::Static
        );
    }
}
