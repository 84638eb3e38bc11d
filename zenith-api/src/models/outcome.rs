use zenith_sdk::QueryResponse;

/// Stage that produced a terminal failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Generation,
    Execution,
    Explanation,
    Recommendation,
}

/// Explained answer, tied to the experience row that recorded it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub interaction_id: Option<i64>,
    pub text: String,
}

/// Terminal failure, tied to the experience row that recorded it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub interaction_id: Option<i64>,
    pub kind: FailureKind,
    pub message: String,
}

pub type Outcome = Result<Answer, Failure>;

pub fn into_response(outcome: Outcome) -> QueryResponse {
    match outcome {
        Ok(answer) => QueryResponse::answer(answer.interaction_id, answer.text),
        Err(failure) => QueryResponse::error(failure.interaction_id, failure.message),
    }
}
