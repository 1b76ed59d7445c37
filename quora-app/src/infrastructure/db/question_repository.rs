use super::entities::{answer, question, Answer, Question};
use super::VoteRepository;
use crate::domain::ValidatedQuery;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, PaginatorTrait, TransactionTrait};
use uuid::Uuid;

#[derive(Clone)]
pub struct QuestionRepository {
    db: DatabaseConnection,
}

impl QuestionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, question_data: &crate::domain::Question) -> Result<question::Model, DbErr> {
        let active = question::ActiveModel {
            id: Set(question_data.id),
            author_id: Set(question_data.author_id),
            space_id: Set(question_data.space_id),
            question: Set(question_data.question.clone()),
            created_at: Set(question_data.created_at),
            updated_at: Set(question_data.updated_at),
        };
        active.insert(&self.db).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<question::Model>, DbErr> {
        Question::find_by_id(id).one(&self.db).await
    }

    /// One page of questions, newest first, and the total matching the filter.
    pub async fn page(&self, query: &ValidatedQuery) -> Result<(Vec<question::Model>, u64), DbErr> {
        let mut select = Question::find();
        if !query.space_ids.is_empty() {
            select = select.filter(question::Column::SpaceId.is_in(query.space_ids.iter().copied()));
        }

        let total = select.clone().count(&self.db).await?;
        let questions = select
            .order_by_desc(question::Column::CreatedAt)
            .order_by_asc(question::Column::Id)
            .offset(query.skip)
            .limit(query.limit)
            .all(&self.db)
            .await?;

        Ok((questions, total))
    }

    pub async fn update(
        &self,
        existing: question::Model,
        space_id: Option<Uuid>,
        text: String,
    ) -> Result<question::Model, DbErr> {
        let mut active: question::ActiveModel = existing.into();
        active.space_id = Set(space_id);
        active.question = Set(text);
        active.updated_at = Set(chrono::Utc::now());
        active.update(&self.db).await
    }

    /// Removes the question with its answers and their votes.
    pub async fn delete(&self, id: Uuid, votes: &VoteRepository) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;

        let answer_ids: Vec<Uuid> = Answer::find()
            .select_only()
            .column(answer::Column::Id)
            .filter(answer::Column::QuestionId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;

        votes.delete_for_answers(&txn, &answer_ids).await?;
        Answer::delete_many()
            .filter(answer::Column::QuestionId.eq(id))
            .exec(&txn)
            .await?;
        Question::delete_by_id(id).exec(&txn).await?;

        txn.commit().await
    }
}
