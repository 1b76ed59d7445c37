use super::Answer;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: uuid::Uuid,
    pub author_id: uuid::Uuid,
    pub space_id: Option<uuid::Uuid>,
    pub question: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Question {
    pub fn new(author_id: uuid::Uuid, space_id: Option<uuid::Uuid>, question: String) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4(),
            author_id,
            space_id,
            question,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, account_id: uuid::Uuid) -> bool {
        self.author_id == account_id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    #[serde(default)]
    pub space_id: Option<String>,
    #[serde(default)]
    pub question: String,
}

/// Paging and filtering for the question feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionQuery {
    pub limit: i64,
    pub skip: i64,
    pub space_ids: Vec<String>,
}

impl Default for QuestionQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            skip: 0,
            space_ids: Vec::new(),
        }
    }
}

/// Question with its most upvoted answer, if it has any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionWithTopAnswer {
    #[serde(flatten)]
    pub question: Question,
    pub top_answer: Option<Answer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPage {
    pub docs: Vec<QuestionWithTopAnswer>,
    pub total: u64,
}
