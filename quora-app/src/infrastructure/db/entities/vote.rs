use crate::domain::{VoteRecord, VoteType};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum VoteKind {
    #[sea_orm(string_value = "upvote")]
    Upvote,
    #[sea_orm(string_value = "downvote")]
    Downvote,
}

impl From<VoteType> for VoteKind {
    fn from(t: VoteType) -> Self {
        match t {
            VoteType::Upvote => Self::Upvote,
            VoteType::Downvote => Self::Downvote,
        }
    }
}

impl From<VoteKind> for VoteType {
    fn from(k: VoteKind) -> Self {
        match k {
            VoteKind::Upvote => Self::Upvote,
            VoteKind::Downvote => Self::Downvote,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "votes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub voter_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub answer_id: Uuid,
    pub vote_type: VoteKind,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::answer::Entity",
        from = "Column::AnswerId",
        to = "super::answer::Column::Id",
        on_delete = "Cascade"
    )]
    Answer,
}

impl Related<super::answer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for VoteRecord {
    fn from(m: Model) -> Self {
        Self {
            voter_id: m.voter_id,
            answer_id: m.answer_id,
            vote_type: m.vote_type.into(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
