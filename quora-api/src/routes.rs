use crate::extract::{parse_id, Identity, Payload};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use quora_app::domain::{
    Answer, AnswerPayload, Question, QuestionPage, QuestionPayload, QuestionQuery, VoteRequest,
    DEFAULT_PAGE_LIMIT,
};
use quora_app::AppContext;
use quora_errors::AppError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    limit: Option<i64>,
    skip: Option<i64>,
    /// Comma separated space ids.
    space_ids: Option<String>,
}

impl From<ListParams> for QuestionQuery {
    fn from(params: ListParams) -> Self {
        Self {
            limit: params.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
            skip: params.skip.unwrap_or(0),
            space_ids: params
                .space_ids
                .map(|ids| {
                    ids.split(',')
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn create_question(
    State(ctx): State<AppContext>,
    identity: Identity,
    Payload(payload): Payload<QuestionPayload>,
) -> Result<Json<Question>, AppError> {
    let question = ctx.questions.create(identity.account_id, payload).await?;
    Ok(Json(question))
}

pub async fn list_questions(
    State(ctx): State<AppContext>,
    _identity: Identity,
    params: Result<Query<ListParams>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<QuestionPage>, AppError> {
    let Query(params) = params?;
    let page = ctx.questions.list(params.into()).await?;
    Ok(Json(page))
}

pub async fn update_question(
    State(ctx): State<AppContext>,
    identity: Identity,
    Path(id): Path<String>,
    Payload(payload): Payload<QuestionPayload>,
) -> Result<Json<Question>, AppError> {
    let question_id = parse_id("id", &id)?;
    let question = ctx
        .questions
        .update(identity.account_id, question_id, payload)
        .await?;
    Ok(Json(question))
}

pub async fn delete_question(
    State(ctx): State<AppContext>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let question_id = parse_id("id", &id)?;
    ctx.questions.delete(identity.account_id, question_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_answers(
    State(ctx): State<AppContext>,
    _identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Vec<Answer>>, AppError> {
    let question_id = parse_id("id", &id)?;
    let answers = ctx.answers.list_for_question(question_id).await?;
    Ok(Json(answers))
}

pub async fn answer_question(
    State(ctx): State<AppContext>,
    identity: Identity,
    Payload(payload): Payload<AnswerPayload>,
) -> Result<Json<Answer>, AppError> {
    let answer = ctx.answers.create(identity.account_id, payload).await?;
    Ok(Json(answer))
}

pub async fn cast_vote(
    State(ctx): State<AppContext>,
    identity: Identity,
    Path(answer_id): Path<String>,
    Payload(mut request): Payload<VoteRequest>,
) -> Result<Json<Answer>, AppError> {
    request.answer_id = answer_id;
    let answer = ctx.voting.cast_vote(identity.account_id, request).await?;
    Ok(Json(answer))
}

pub async fn withdraw_vote(
    State(ctx): State<AppContext>,
    identity: Identity,
    Path(answer_id): Path<String>,
) -> Result<Json<Answer>, AppError> {
    let answer = ctx.voting.withdraw_vote(identity.account_id, &answer_id).await?;
    Ok(Json(answer))
}
