use super::storage_error;
use crate::domain::{
    top_answer_per_question, validate_question, validate_question_query, Answer, Question,
    QuestionPage, QuestionPayload, QuestionQuery, QuestionWithTopAnswer,
};
use crate::infrastructure::db::{entities::question, AnswerRepository, QuestionRepository, VoteRepository};
use quora_errors::AppError;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

pub struct QuestionService {
    questions: QuestionRepository,
    answers: AnswerRepository,
    votes: VoteRepository,
}

impl QuestionService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            questions: QuestionRepository::new(db.clone()),
            answers: AnswerRepository::new(db),
            votes: VoteRepository::new(),
        }
    }

    pub async fn create(&self, author_id: Uuid, payload: QuestionPayload) -> Result<Question, AppError> {
        let valid = validate_question(&payload)?;
        let question = Question::new(author_id, valid.space_id, valid.question);

        let stored = self.questions.create(&question).await.map_err(storage_error)?;
        tracing::info!(question_id = %stored.id, %author_id, "Question created");
        Ok(stored.into())
    }

    pub async fn list(&self, query: QuestionQuery) -> Result<QuestionPage, AppError> {
        let query = validate_question_query(&query)?;

        let (questions, total) = self.questions.page(&query).await.map_err(storage_error)?;
        let ids: Vec<Uuid> = questions.iter().map(|q| q.id).collect();
        let answers = self
            .answers
            .top_for_questions(&ids)
            .await
            .map_err(storage_error)?
            .into_iter()
            .map(Answer::from)
            .collect();
        let mut top = top_answer_per_question(answers);

        let docs = questions
            .into_iter()
            .map(|q| QuestionWithTopAnswer {
                top_answer: top.remove(&q.id),
                question: q.into(),
            })
            .collect();

        Ok(QuestionPage { docs, total })
    }

    pub async fn update(
        &self,
        author_id: Uuid,
        question_id: Uuid,
        payload: QuestionPayload,
    ) -> Result<Question, AppError> {
        let existing = self.owned_question(author_id, question_id).await?;
        let valid = validate_question(&payload)?;

        let updated = self
            .questions
            .update(existing, valid.space_id, valid.question)
            .await
            .map_err(storage_error)?;
        Ok(updated.into())
    }

    pub async fn delete(&self, author_id: Uuid, question_id: Uuid) -> Result<(), AppError> {
        self.owned_question(author_id, question_id).await?;

        self.questions
            .delete(question_id, &self.votes)
            .await
            .map_err(storage_error)?;
        tracing::info!(%question_id, "Question deleted");
        Ok(())
    }

    async fn owned_question(&self, author_id: Uuid, question_id: Uuid) -> Result<question::Model, AppError> {
        let existing = self
            .questions
            .find_by_id(question_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| AppError::NotFound("question".to_string()))?;

        if existing.author_id != author_id {
            return Err(AppError::Forbidden("not the author".to_string()));
        }
        Ok(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VoteRequest;
    use crate::infrastructure::db::testing::memory_db;
    use crate::application::{AnswerService, VotingEngine};
    use crate::domain::AnswerPayload;
    use std::time::Duration;

    fn payload(text: &str) -> QuestionPayload {
        QuestionPayload {
            space_id: None,
            question: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_with_top_answer() {
        let db = memory_db().await;
        let questions = QuestionService::new(db.clone());
        let answers = AnswerService::new(db.clone());
        let engine = VotingEngine::new(db.clone(), Duration::from_secs(10), tracing::Span::none());
        let author = Uuid::new_v4();

        let asked = questions.create(author, payload("yoo, this work ?")).await.unwrap();
        let unanswered = questions.create(author, payload("anyone?")).await.unwrap();

        let plain = answers
            .create(Uuid::new_v4(), AnswerPayload { question_id: asked.id.to_string(), answer: "maybe".into() })
            .await
            .unwrap();
        let popular = answers
            .create(Uuid::new_v4(), AnswerPayload { question_id: asked.id.to_string(), answer: "yes".into() })
            .await
            .unwrap();
        engine
            .cast_vote(Uuid::new_v4(), VoteRequest::new(popular.id.to_string(), "upvote"))
            .await
            .unwrap();

        let page = questions.list(QuestionQuery::default()).await.unwrap();
        assert_eq!(page.total, 2);

        let with_answers = page.docs.iter().find(|d| d.question.id == asked.id).unwrap();
        let top = with_answers.top_answer.as_ref().unwrap();
        assert_eq!(top.id, popular.id);
        assert_ne!(top.id, plain.id);

        let empty = page.docs.iter().find(|d| d.question.id == unanswered.id).unwrap();
        assert!(empty.top_answer.is_none());
    }

    #[tokio::test]
    async fn test_list_filters_by_space_and_pages() {
        let db = memory_db().await;
        let questions = QuestionService::new(db.clone());
        let author = Uuid::new_v4();
        let space = Uuid::new_v4();

        for i in 0..3 {
            questions
                .create(author, QuestionPayload { space_id: Some(space.to_string()), question: format!("q{i}") })
                .await
                .unwrap();
        }
        questions.create(author, payload("elsewhere")).await.unwrap();

        let query = QuestionQuery {
            limit: 2,
            skip: 0,
            space_ids: vec![space.to_string()],
        };
        let page = questions.list(query).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.docs.len(), 2);
        assert!(page.docs.iter().all(|d| d.question.space_id == Some(space)));

        let err = questions
            .list(QuestionQuery { limit: 0, ..QuestionQuery::default() })
            .await
            .unwrap_err();
        assert!(err.fields().unwrap().contains_key("limit"));
    }

    #[tokio::test]
    async fn test_only_author_may_update_or_delete() {
        let db = memory_db().await;
        let questions = QuestionService::new(db.clone());
        let author = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let asked = questions.create(author, payload("original")).await.unwrap();

        let err = questions.update(stranger, asked.id, payload("hijacked")).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        let err = questions.delete(stranger, asked.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let updated = questions.update(author, asked.id, payload("edited")).await.unwrap();
        assert_eq!(updated.question, "edited");

        questions.delete(author, asked.id).await.unwrap();
        let err = questions.delete(author, asked.id).await.unwrap_err();
        assert_eq!(err, AppError::NotFound("question".to_string()));
    }

    #[tokio::test]
    async fn test_delete_removes_answers_and_votes() {
        let db = memory_db().await;
        let questions = QuestionService::new(db.clone());
        let answers = AnswerService::new(db.clone());
        let engine = VotingEngine::new(db.clone(), Duration::from_secs(10), tracing::Span::none());
        let author = Uuid::new_v4();

        let asked = questions.create(author, payload("short lived")).await.unwrap();
        let answer = answers
            .create(Uuid::new_v4(), AnswerPayload { question_id: asked.id.to_string(), answer: "gone soon".into() })
            .await
            .unwrap();
        let voter = Uuid::new_v4();
        engine
            .cast_vote(voter, VoteRequest::new(answer.id.to_string(), "upvote"))
            .await
            .unwrap();

        questions.delete(author, asked.id).await.unwrap();

        let votes = VoteRepository::new();
        assert!(votes.find(&db, voter, answer.id).await.unwrap().is_none());
        let err = answers.list_for_question(asked.id).await.unwrap_err();
        assert_eq!(err, AppError::NotFound("question".to_string()));
    }
}
