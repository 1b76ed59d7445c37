use super::entities::{vote, Vote, VoteKind};
use crate::domain::VoteType;
use sea_orm::sea_query::OnConflict;
use sea_orm::{entity::*, query::*, ConnectionTrait, DbErr, PaginatorTrait};
use uuid::Uuid;

/// The vote ledger: at most one row per (voter, answer).
#[derive(Clone, Default)]
pub struct VoteRepository;

impl VoteRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find<C: ConnectionTrait>(
        &self,
        conn: &C,
        voter_id: Uuid,
        answer_id: Uuid,
    ) -> Result<Option<vote::Model>, DbErr> {
        Vote::find_by_id((voter_id, answer_id)).one(conn).await
    }

    /// Creates the record or flips its type in a single upsert. `created_at`
    /// survives a flip.
    pub async fn replace<C: ConnectionTrait>(
        &self,
        conn: &C,
        voter_id: Uuid,
        answer_id: Uuid,
        vote_type: VoteType,
    ) -> Result<(), DbErr> {
        let now = chrono::Utc::now();
        let active = vote::ActiveModel {
            voter_id: Set(voter_id),
            answer_id: Set(answer_id),
            vote_type: Set(vote_type.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Vote::insert(active)
            .on_conflict(
                OnConflict::columns([vote::Column::VoterId, vote::Column::AnswerId])
                    .update_columns([vote::Column::VoteType, vote::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;
        Ok(())
    }

    /// Returns whether a record was removed.
    pub async fn delete<C: ConnectionTrait>(
        &self,
        conn: &C,
        voter_id: Uuid,
        answer_id: Uuid,
    ) -> Result<bool, DbErr> {
        let result = Vote::delete_many()
            .filter(vote::Column::VoterId.eq(voter_id))
            .filter(vote::Column::AnswerId.eq(answer_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_for_answers<C: ConnectionTrait>(
        &self,
        conn: &C,
        answer_ids: &[Uuid],
    ) -> Result<u64, DbErr> {
        if answer_ids.is_empty() {
            return Ok(0);
        }

        let result = Vote::delete_many()
            .filter(vote::Column::AnswerId.is_in(answer_ids.iter().copied()))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Number of ledger rows of one type for an answer.
    pub async fn count<C: ConnectionTrait>(
        &self,
        conn: &C,
        answer_id: Uuid,
        vote_type: VoteType,
    ) -> Result<u64, DbErr> {
        Vote::find()
            .filter(vote::Column::AnswerId.eq(answer_id))
            .filter(vote::Column::VoteType.eq(VoteKind::from(vote_type)))
            .count(conn)
            .await
    }
}
