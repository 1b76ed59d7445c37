use super::entities::{answer, Answer};
use crate::domain::TallyDelta;
use sea_orm::sea_query::Expr;
use sea_orm::{
    entity::*, query::*, ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr, Statement, Value,
};
use uuid::Uuid;

/// Outcome of a guarded counter update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TallyUpdate {
    Applied(answer::Model),
    Missing,
    /// The answer exists but the delta would drive a counter below zero.
    Underflow,
}

#[derive(Clone)]
pub struct AnswerRepository {
    db: DatabaseConnection,
}

impl AnswerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, answer_data: &crate::domain::Answer) -> Result<answer::Model, DbErr> {
        let active = answer::ActiveModel {
            id: Set(answer_data.id),
            question_id: Set(answer_data.question_id),
            answerer_id: Set(answer_data.answerer_id),
            answer: Set(answer_data.answer.clone()),
            upvote_count: Set(0),
            downvote_count: Set(0),
            created_at: Set(answer_data.created_at),
            updated_at: Set(answer_data.updated_at),
        };
        active.insert(&self.db).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<answer::Model>, DbErr> {
        Answer::find_by_id(id).one(&self.db).await
    }

    /// Loads the answer and holds its lock until `conn`'s transaction ends.
    ///
    /// SQLite has no row locks, only a database write lock. A no-op `UPDATE`
    /// takes it before the read, so concurrent voters wait on the busy
    /// timeout instead of failing to upgrade a read lock.
    pub async fn find_for_update<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<answer::Model>, DbErr> {
        match conn.get_database_backend() {
            DatabaseBackend::Sqlite => {
                Answer::update_many()
                    .col_expr(answer::Column::UpvoteCount, Expr::col(answer::Column::UpvoteCount).into())
                    .filter(answer::Column::Id.eq(id))
                    .exec(conn)
                    .await?;
                Answer::find_by_id(id).one(conn).await
            }
            _ => Answer::find_by_id(id).lock_exclusive().one(conn).await,
        }
    }

    /// Adjusts both counters in one `UPDATE`, letting the database do the
    /// arithmetic so concurrent callers never overwrite each other.
    pub async fn apply_tally<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        delta: TallyDelta,
    ) -> Result<TallyUpdate, DbErr> {
        let upvotes = Expr::col(answer::Column::UpvoteCount).add(delta.upvote);
        let downvotes = Expr::col(answer::Column::DownvoteCount).add(delta.downvote);

        let result = Answer::update_many()
            .col_expr(answer::Column::UpvoteCount, upvotes.clone())
            .col_expr(answer::Column::DownvoteCount, downvotes.clone())
            .col_expr(answer::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(answer::Column::Id.eq(id))
            .filter(Expr::expr(upvotes).gte(0))
            .filter(Expr::expr(downvotes).gte(0))
            .exec(conn)
            .await?;

        let current = Answer::find_by_id(id).one(conn).await?;
        Ok(match (result.rows_affected, current) {
            (0, Some(_)) => TallyUpdate::Underflow,
            (_, Some(model)) => TallyUpdate::Applied(model),
            (_, None) => TallyUpdate::Missing,
        })
    }

    /// Answers of one question, most upvoted first.
    pub async fn list_for_question(&self, question_id: Uuid) -> Result<Vec<answer::Model>, DbErr> {
        Answer::find()
            .filter(answer::Column::QuestionId.eq(question_id))
            .order_by_desc(answer::Column::UpvoteCount)
            .order_by_desc(answer::Column::UpdatedAt)
            .order_by_asc(answer::Column::Id)
            .all(&self.db)
            .await
    }

    /// The most upvoted answer of each question, ranked in SQL with the same
    /// order as `list_for_question`. Questions without answers are absent.
    pub async fn top_for_questions(&self, question_ids: &[Uuid]) -> Result<Vec<answer::Model>, DbErr> {
        if question_ids.is_empty() {
            return Ok(Vec::new());
        }

        let backend = self.db.get_database_backend();
        let placeholders = (1..=question_ids.len())
            .map(|n| match backend {
                DatabaseBackend::Postgres => format!("${n}"),
                _ => "?".to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT id, question_id, answerer_id, answer, upvote_count, downvote_count, created_at, updated_at \
             FROM (SELECT answers.*, ROW_NUMBER() OVER (\
                 PARTITION BY question_id ORDER BY upvote_count DESC, updated_at DESC, id ASC\
             ) AS answer_rank FROM answers WHERE question_id IN ({placeholders})) ranked \
             WHERE answer_rank = 1"
        );
        let values = question_ids.iter().copied().map(Value::from).collect::<Vec<_>>();

        Answer::find()
            .from_raw_sql(Statement::from_sql_and_values(backend, sql, values))
            .all(&self.db)
            .await
    }
}
