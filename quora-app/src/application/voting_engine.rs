use super::storage_error;
use crate::domain::{
    validate_answer_id, validate_vote, Answer, VoteRequest, VoteTransition, ValidatedVote,
};
use crate::infrastructure::db::{entities::answer, AnswerRepository, TallyUpdate, VoteRepository};
use quora_errors::AppError;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::future::Future;
use std::time::Duration;
use tracing::{Instrument, Span};
use uuid::Uuid;

/// Records votes and keeps each answer's counters equal to its ledger.
///
/// Every call runs in one transaction: the answer row is locked first, then
/// the voter's record is read, and the ledger change and counter change are
/// committed together. Nothing is written for a repeated vote.
pub struct VotingEngine {
    db: DatabaseConnection,
    answers: AnswerRepository,
    votes: VoteRepository,
    timeout: Duration,
    span: Span,
}

impl VotingEngine {
    /// `span` becomes the parent of every call's span.
    pub fn new(db: DatabaseConnection, timeout: Duration, span: Span) -> Self {
        Self {
            answers: AnswerRepository::new(db.clone()),
            votes: VoteRepository::new(),
            db,
            timeout,
            span,
        }
    }

    pub async fn cast_vote(&self, voter_id: Uuid, request: VoteRequest) -> Result<Answer, AppError> {
        let vote = validate_vote(&request)?;
        let span = tracing::info_span!(
            parent: &self.span,
            "cast_vote",
            %voter_id,
            answer_id = %vote.answer_id,
            vote_type = %vote.vote_type
        );

        self.bounded(self.cast(voter_id, vote)).instrument(span).await
    }

    /// Removes the voter's vote, if any, and the count it contributed.
    pub async fn withdraw_vote(&self, voter_id: Uuid, answer_id: &str) -> Result<Answer, AppError> {
        let answer_id = validate_answer_id(answer_id)?;
        let span = tracing::info_span!(parent: &self.span, "withdraw_vote", %voter_id, %answer_id);

        self.bounded(self.withdraw(voter_id, answer_id)).instrument(span).await
    }

    async fn bounded<F>(&self, call: F) -> Result<Answer, AppError>
    where
        F: Future<Output = Result<Answer, AppError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(timeout_ms = self.timeout.as_millis() as u64, "Vote timed out, rolled back");
                Err(AppError::Internal("vote timed out".to_string()))
            }
        }
    }

    async fn cast(&self, voter_id: Uuid, vote: ValidatedVote) -> Result<Answer, AppError> {
        let txn = self.db.begin().await.map_err(storage_error)?;
        let answer = self.lock_answer(&txn, vote.answer_id).await?;

        let current = self
            .votes
            .find(&txn, voter_id, vote.answer_id)
            .await
            .map_err(storage_error)?
            .map(|record| record.vote_type.into());

        let transition = VoteTransition::cast(current, vote.vote_type);
        self.commit(txn, answer, voter_id, transition).await
    }

    async fn withdraw(&self, voter_id: Uuid, answer_id: Uuid) -> Result<Answer, AppError> {
        let txn = self.db.begin().await.map_err(storage_error)?;
        let answer = self.lock_answer(&txn, answer_id).await?;

        let current = self
            .votes
            .find(&txn, voter_id, answer_id)
            .await
            .map_err(storage_error)?
            .map(|record| record.vote_type.into());

        let transition = VoteTransition::withdraw(current);
        self.commit(txn, answer, voter_id, transition).await
    }

    async fn lock_answer(&self, txn: &DatabaseTransaction, answer_id: Uuid) -> Result<answer::Model, AppError> {
        self.answers
            .find_for_update(txn, answer_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| AppError::NotFound("answer".to_string()))
    }

    /// Applies the ledger change and its counter delta, then commits. Any
    /// early return drops `txn`, which rolls it back.
    async fn commit(
        &self,
        txn: DatabaseTransaction,
        answer: answer::Model,
        voter_id: Uuid,
        transition: VoteTransition,
    ) -> Result<Answer, AppError> {
        let Some(delta) = transition.tally_delta() else {
            txn.rollback().await.map_err(storage_error)?;
            tracing::debug!("Vote unchanged");
            return Ok(answer.into());
        };

        match transition {
            VoteTransition::Create(to) | VoteTransition::Switch { to, .. } => {
                self.votes
                    .replace(&txn, voter_id, answer.id, to)
                    .await
                    .map_err(storage_error)?;
            }
            VoteTransition::Withdraw(_) => {
                self.votes
                    .delete(&txn, voter_id, answer.id)
                    .await
                    .map_err(storage_error)?;
            }
            VoteTransition::Unchanged => {}
        }

        let updated = match self.answers.apply_tally(&txn, answer.id, delta).await.map_err(storage_error)? {
            TallyUpdate::Applied(model) => model,
            TallyUpdate::Missing => return Err(AppError::NotFound("answer".to_string())),
            TallyUpdate::Underflow => {
                tracing::error!(?transition, ?delta, "Tally out of step with ledger");
                return Err(AppError::Conflict("answer tally out of step with its votes".to_string()));
            }
        };

        txn.commit().await.map_err(storage_error)?;
        tracing::info!(
            ?transition,
            upvotes = updated.upvote_count,
            downvotes = updated.downvote_count,
            "Vote recorded"
        );

        Ok(updated.into())
    }
}
