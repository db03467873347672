use crate::config::{AppConfig, MealStrategy};
use crate::meals::{
    catalog::StaticCatalog, generator::AiMealGenerator, llm::OpenAiClient,
    services::MealSuggester,
};
use crate::users::repo::{PgUserStore, SqliteUserStore, UserStore};
use std::sync::Arc;
use tracing::info;

/// Collaborators built once at startup and shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub meals: Arc<dyn MealSuggester>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let users = match &config.database_url {
            Some(url) => Arc::new(PgUserStore::connect(url).await?) as Arc<dyn UserStore>,
            None => {
                info!(url = %config.sqlite_url, "DATABASE_URL not set; using embedded store");
                Arc::new(SqliteUserStore::connect(&config.sqlite_url).await?) as Arc<dyn UserStore>
            }
        };
        info!(users = users.count().await?, "user store opened");

        let meals = match (config.resolved_strategy()?, &config.llm) {
            (MealStrategy::Ai, Some(llm)) => {
                info!(model = %llm.model, "meal suggestions from text generation");
                let client = Arc::new(OpenAiClient::new(llm)?);
                Arc::new(AiMealGenerator::new(client)) as Arc<dyn MealSuggester>
            }
            _ => {
                info!("meal suggestions from static catalog");
                Arc::new(StaticCatalog) as Arc<dyn MealSuggester>
            }
        };

        Ok(Self::from_parts(config, users, meals))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        meals: Arc<dyn MealSuggester>,
    ) -> Self {
        Self {
            config,
            users,
            meals,
        }
    }

    /// In-memory store and the static catalog.
    #[cfg(test)]
    pub async fn fake() -> Self {
        let config = Arc::new(AppConfig {
            database_url: None,
            sqlite_url: "sqlite::memory:".into(),
            llm: None,
            meal_strategy: MealStrategy::Static,
        });
        let users = Arc::new(
            SqliteUserStore::in_memory()
                .await
                .expect("in-memory sqlite opens"),
        ) as Arc<dyn UserStore>;
        Self::from_parts(config, users, Arc::new(StaticCatalog))
    }
}
