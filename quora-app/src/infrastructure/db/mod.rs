pub mod entities;
mod answer_repository;
mod question_repository;
mod vote_repository;

pub use answer_repository::{AnswerRepository, TallyUpdate};
pub use question_repository::QuestionRepository;
pub use vote_repository::VoteRepository;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Schema,
    Statement,
};
use std::time::Duration;

pub async fn create_connection(database_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(false);

    Database::connect(opt).await
}

/// Creates the tables if they are missing.
pub async fn prepare_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    match db.get_database_backend() {
        DatabaseBackend::Postgres => run_migrations(db).await,
        _ => create_schema_from_entities(db).await,
    }
}

pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let migration = include_str!("../../../../migrations/001_initial.sql");

    for statement in migration.split(';') {
        let statement = statement.trim();
        if !statement.is_empty() {
            db.execute(Statement::from_string(
                DatabaseBackend::Postgres,
                statement.to_string(),
            ))
            .await?;
        }
    }

    tracing::info!("Database migrations applied");
    Ok(())
}

async fn create_schema_from_entities(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut tables = [
        schema.create_table_from_entity(entities::Question),
        schema.create_table_from_entity(entities::Answer),
        schema.create_table_from_entity(entities::Vote),
    ];
    for table in tables.iter_mut() {
        table.if_not_exists();
        db.execute(backend.build(&*table)).await?;
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::entities::{answer, question};
    use sea_orm::{entity::*, ConnectOptions, Database, DatabaseConnection};
    use uuid::Uuid;

    pub async fn memory_db() -> DatabaseConnection {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        super::prepare_schema(&db).await.unwrap();
        db
    }

    /// File-backed SQLite behind a pool of `connections`, so transactions can
    /// overlap. The database lives as long as the returned directory.
    pub async fn file_db(connections: u32) -> (DatabaseConnection, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("votes.db").display());
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(connections).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        super::prepare_schema(&db).await.unwrap();
        (db, dir)
    }

    pub async fn seed_question(db: &DatabaseConnection) -> question::Model {
        let now = chrono::Utc::now();
        question::ActiveModel {
            id: Set(Uuid::new_v4()),
            author_id: Set(Uuid::new_v4()),
            space_id: Set(None),
            question: Set("how do votes work?".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .unwrap()
    }

    pub async fn seed_answer(db: &DatabaseConnection, id: Uuid) -> answer::Model {
        let question = seed_question(db).await;
        let now = chrono::Utc::now();
        answer::ActiveModel {
            id: Set(id),
            question_id: Set(question.id),
            answerer_id: Set(Uuid::new_v4()),
            answer: Set("carefully".to_string()),
            upvote_count: Set(0),
            downvote_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .unwrap()
    }
}
