mod answers;
mod questions;
mod voting_engine;

pub use answers::AnswerService;
pub use questions::QuestionService;
pub use voting_engine::VotingEngine;

use quora_errors::AppError;
use sea_orm::DbErr;

/// Logs a storage failure and hides it behind `AppError::Internal`.
pub(crate) fn storage_error(err: DbErr) -> AppError {
    tracing::error!(error = %err, "Storage failure");
    AppError::Internal(err.to_string())
}
