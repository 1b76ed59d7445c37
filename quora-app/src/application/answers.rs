use super::storage_error;
use crate::domain::{validate_answer, Answer, AnswerPayload};
use crate::infrastructure::db::{AnswerRepository, QuestionRepository};
use quora_errors::AppError;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

pub struct AnswerService {
    questions: QuestionRepository,
    answers: AnswerRepository,
}

impl AnswerService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            questions: QuestionRepository::new(db.clone()),
            answers: AnswerRepository::new(db),
        }
    }

    pub async fn create(&self, answerer_id: Uuid, payload: AnswerPayload) -> Result<Answer, AppError> {
        let valid = validate_answer(&payload)?;
        self.require_question(valid.question_id).await?;

        let answer = Answer::new(valid.question_id, answerer_id, valid.answer);
        let stored = self.answers.create(&answer).await.map_err(storage_error)?;
        tracing::info!(answer_id = %stored.id, question_id = %stored.question_id, "Answer created");
        Ok(stored.into())
    }

    /// Answers of a question, most upvoted first.
    pub async fn list_for_question(&self, question_id: Uuid) -> Result<Vec<Answer>, AppError> {
        self.require_question(question_id).await?;

        let answers = self
            .answers
            .list_for_question(question_id)
            .await
            .map_err(storage_error)?;
        Ok(answers.into_iter().map(Answer::from).collect())
    }

    async fn require_question(&self, question_id: Uuid) -> Result<(), AppError> {
        self.questions
            .find_by_id(question_id)
            .await
            .map_err(storage_error)?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("question".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{QuestionService, VotingEngine};
    use crate::domain::{QuestionPayload, VoteRequest};
    use crate::infrastructure::db::testing::memory_db;
    use std::time::Duration;

    #[tokio::test]
    async fn test_answer_starts_with_zero_counts() {
        let db = memory_db().await;
        let question = QuestionService::new(db.clone())
            .create(Uuid::new_v4(), QuestionPayload { space_id: None, question: "why?".into() })
            .await
            .unwrap();

        let answer = AnswerService::new(db)
            .create(Uuid::new_v4(), AnswerPayload { question_id: question.id.to_string(), answer: "because".into() })
            .await
            .unwrap();

        assert_eq!(answer.question_id, question.id);
        assert_eq!((answer.upvote_count, answer.downvote_count), (0, 0));
    }

    #[tokio::test]
    async fn test_answer_to_missing_question() {
        let db = memory_db().await;
        let err = AnswerService::new(db)
            .create(Uuid::new_v4(), AnswerPayload { question_id: Uuid::new_v4().to_string(), answer: "hello".into() })
            .await
            .unwrap_err();
        assert_eq!(err, AppError::NotFound("question".to_string()));
    }

    #[tokio::test]
    async fn test_list_orders_by_upvotes() {
        let db = memory_db().await;
        let question = QuestionService::new(db.clone())
            .create(Uuid::new_v4(), QuestionPayload { space_id: None, question: "best editor?".into() })
            .await
            .unwrap();
        let service = AnswerService::new(db.clone());
        let engine = VotingEngine::new(db.clone(), Duration::from_secs(10), tracing::Span::none());

        let mut created = Vec::new();
        for text in ["vim", "emacs", "nano"] {
            let answer = service
                .create(Uuid::new_v4(), AnswerPayload { question_id: question.id.to_string(), answer: text.into() })
                .await
                .unwrap();
            created.push(answer);
        }

        for _ in 0..2 {
            engine
                .cast_vote(Uuid::new_v4(), VoteRequest::new(created[2].id.to_string(), "upvote"))
                .await
                .unwrap();
        }
        engine
            .cast_vote(Uuid::new_v4(), VoteRequest::new(created[1].id.to_string(), "upvote"))
            .await
            .unwrap();

        let listed = service.list_for_question(question.id).await.unwrap();
        let order: Vec<&str> = listed.iter().map(|a| a.answer.as_str()).collect();
        assert_eq!(order, ["nano", "emacs", "vim"]);
    }
}
