use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: uuid::Uuid,
    pub question_id: uuid::Uuid,
    pub answerer_id: uuid::Uuid,
    pub answer: String,
    pub upvote_count: i32,
    pub downvote_count: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Answer {
    pub fn new(question_id: uuid::Uuid, answerer_id: uuid::Uuid, answer: String) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4(),
            question_id,
            answerer_id,
            answer,
            upvote_count: 0,
            downvote_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPayload {
    #[serde(default)]
    pub question_id: String,
    #[serde(default)]
    pub answer: String,
}
