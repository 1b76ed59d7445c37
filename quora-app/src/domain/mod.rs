mod answer;
mod question;
mod ranking;
mod validation;
mod vote;

pub use answer::{Answer, AnswerPayload};
pub use question::{
    Question, QuestionPage, QuestionPayload, QuestionQuery, QuestionWithTopAnswer,
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
pub use ranking::{most_upvoted_first, top_answer_per_question};
pub use validation::{
    validate_answer, validate_answer_id, validate_question, validate_question_query,
    validate_vote, ValidatedAnswer, ValidatedQuestion, ValidatedQuery,
};
pub use vote::{TallyDelta, ValidatedVote, VoteRecord, VoteRequest, VoteTransition, VoteType};
