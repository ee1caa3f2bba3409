use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One stored questionnaire response, joined with its question's number.
/// Written once at submission and never updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RawAnswer {
    pub user_id: Uuid,
    pub test_id: Uuid,
    pub question_id: Uuid,
    /// Likert response as submitted, expected "1"–"5".
    pub raw_score: String,
    pub question_number: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionRow {
    pub id: Uuid,
    pub test_name: String,
    pub question: String,
    pub question_number: i32,
}
