use super::{AnswerPayload, QuestionPayload, QuestionQuery, ValidatedVote, VoteRequest, VoteType};
use super::MAX_PAGE_LIMIT;
use quora_errors::{AppError, FieldErrors};
use uuid::Uuid;

const BLANK: &str = "cannot be blank";
const NOT_UUID: &str = "must be a valid UUID";
const NOT_ALLOWED: &str = "must be a valid value";

fn required_uuid(fields: &mut FieldErrors, field: &str, value: &str) -> Option<Uuid> {
    let value = value.trim();
    if value.is_empty() {
        fields.insert(field.to_string(), BLANK.to_string());
        return None;
    }
    match Uuid::parse_str(value) {
        Ok(id) => Some(id),
        Err(_) => {
            fields.insert(field.to_string(), NOT_UUID.to_string());
            None
        }
    }
}

fn required_text(fields: &mut FieldErrors, field: &str, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        fields.insert(field.to_string(), BLANK.to_string());
        None
    } else {
        Some(value.to_string())
    }
}

/// Checks `answerId` and `type`, reporting every rejected field at once.
pub fn validate_vote(request: &VoteRequest) -> Result<ValidatedVote, AppError> {
    let mut fields = FieldErrors::new();

    let answer_id = required_uuid(&mut fields, "answerId", &request.answer_id);

    let vote_type = if request.vote_type.trim().is_empty() {
        fields.insert("type".to_string(), BLANK.to_string());
        None
    } else {
        match request.vote_type.parse::<VoteType>() {
            Ok(vote_type) => Some(vote_type),
            Err(_) => {
                fields.insert("type".to_string(), NOT_ALLOWED.to_string());
                None
            }
        }
    };

    match (answer_id, vote_type) {
        (Some(answer_id), Some(vote_type)) => Ok(ValidatedVote {
            answer_id,
            vote_type,
        }),
        _ => Err(AppError::Validation(fields)),
    }
}

pub fn validate_answer_id(answer_id: &str) -> Result<Uuid, AppError> {
    let mut fields = FieldErrors::new();
    let id = required_uuid(&mut fields, "answerId", answer_id);
    id.ok_or(AppError::Validation(fields))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuestion {
    pub space_id: Option<Uuid>,
    pub question: String,
}

pub fn validate_question(payload: &QuestionPayload) -> Result<ValidatedQuestion, AppError> {
    let mut fields = FieldErrors::new();

    let space_id = match payload.space_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match Uuid::parse_str(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                fields.insert("spaceId".to_string(), NOT_UUID.to_string());
                None
            }
        },
    };
    let question = required_text(&mut fields, "question", &payload.question);

    AppError::check(fields)?;
    Ok(ValidatedQuestion {
        space_id,
        question: question.unwrap_or_default(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAnswer {
    pub question_id: Uuid,
    pub answer: String,
}

pub fn validate_answer(payload: &AnswerPayload) -> Result<ValidatedAnswer, AppError> {
    let mut fields = FieldErrors::new();
    let question_id = required_uuid(&mut fields, "questionId", &payload.question_id);
    let answer = required_text(&mut fields, "answer", &payload.answer);

    match (question_id, answer) {
        (Some(question_id), Some(answer)) => Ok(ValidatedAnswer {
            question_id,
            answer,
        }),
        _ => Err(AppError::Validation(fields)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    pub limit: u64,
    pub skip: u64,
    pub space_ids: Vec<Uuid>,
}

pub fn validate_question_query(query: &QuestionQuery) -> Result<ValidatedQuery, AppError> {
    let mut fields = FieldErrors::new();

    if query.skip < 0 {
        fields.insert("skip".to_string(), "must be no less than 0".to_string());
    }
    if query.limit < 1 {
        fields.insert("limit".to_string(), "must be no less than 1".to_string());
    } else if query.limit > MAX_PAGE_LIMIT {
        fields.insert(
            "limit".to_string(),
            format!("must be no greater than {MAX_PAGE_LIMIT}"),
        );
    }

    let mut space_ids = Vec::with_capacity(query.space_ids.len());
    for raw in &query.space_ids {
        match Uuid::parse_str(raw.trim()) {
            Ok(id) => space_ids.push(id),
            Err(_) => {
                fields.insert("spaceIds".to_string(), NOT_UUID.to_string());
            }
        }
    }

    AppError::check(fields)?;
    Ok(ValidatedQuery {
        limit: query.limit as u64,
        skip: query.skip as u64,
        space_ids,
    })
}
