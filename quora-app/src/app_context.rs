use crate::application::{AnswerService, QuestionService, VotingEngine};
use crate::config::Config;
use crate::infrastructure::auth::TokenDecoder;
use crate::infrastructure::db;
use sea_orm::{DatabaseConnection, DbErr};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub voting: Arc<VotingEngine>,
    pub questions: Arc<QuestionService>,
    pub answers: Arc<AnswerService>,
    pub tokens: Arc<TokenDecoder>,
}

impl AppContext {
    pub fn new(database: DatabaseConnection, config: &Config) -> Self {
        Self {
            voting: Arc::new(VotingEngine::new(
                database.clone(),
                config.vote_timeout,
                tracing::info_span!("voting_engine"),
            )),
            questions: Arc::new(QuestionService::new(database.clone())),
            answers: Arc::new(AnswerService::new(database)),
            tokens: Arc::new(TokenDecoder::new(&config.jwt_access_secret)),
        }
    }

    /// Connects to the database, creates missing tables and wires the services.
    pub async fn from_config(config: &Config) -> Result<Self, DbErr> {
        let database = db::create_connection(&config.database_url, config.db_max_connections).await?;
        db::prepare_schema(&database).await?;
        tracing::info!("Database ready");

        Ok(Self::new(database, config))
    }
}
