use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "answers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub question_id: Uuid,
    pub answerer_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub answer: String,
    pub upvote_count: i32,
    pub downvote_count: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::QuestionId",
        to = "super::question::Column::Id",
        on_delete = "Cascade"
    )]
    Question,
    #[sea_orm(has_many = "super::vote::Entity")]
    Votes,
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Answer {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            question_id: m.question_id,
            answerer_id: m.answerer_id,
            answer: m.answer,
            upvote_count: m.upvote_count,
            downvote_count: m.downvote_count,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
