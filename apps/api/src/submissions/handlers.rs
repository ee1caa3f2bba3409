//! Axum route handlers for questions and questionnaire submissions.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::answer::QuestionRow;
use crate::models::test::PaymentStatus;
use crate::report::generator::generate_report;
use crate::state::AppState;
use crate::submissions::store::{
    create_test, fetch_questions, find_or_create_user, insert_answers, insert_questions, NewQuestion,
    NewTest, TEST_NAME,
};

/// `pMode` value that skips payment and generates the report right away.
const BYPASS_PAYMENT_MODE: &str = "pass";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnswerInput {
    pub id: String,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    pub email: String,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub answers: Vec<AnswerInput>,
    #[serde(default)]
    pub p_mode: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub message: String,
    pub test_id: Uuid,
    pub payment_link: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    pub test_name: Option<String>,
    pub question: String,
    pub no: i32,
}

#[derive(Debug, Serialize)]
pub struct QuestionsCreated {
    pub inserted: u64,
}

/// Checks the request and pairs every answer with its parsed question id.
fn parse_submission(request: &SubmissionRequest) -> Result<Vec<(Uuid, String)>, AppError> {
    if request.email.trim().is_empty() {
        return Err(AppError::Validation("email cannot be empty".to_string()));
    }
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    if request.answers.is_empty() {
        return Err(AppError::Validation("answers cannot be empty".to_string()));
    }

    request
        .answers
        .iter()
        .map(|a| {
            Uuid::parse_str(a.id.trim())
                .map(|id| (id, a.answer.trim().to_string()))
                .map_err(|_| AppError::Validation(format!("Invalid question ID '{}'", a.id)))
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/submissions
///
/// Stores a completed questionnaire. With `pMode: "pass"` the report is
/// generated in the background; the submission succeeds either way once the
/// answers are stored.
pub async fn handle_submit(
    State(state): State<AppState>,
    Json(request): Json<SubmissionRequest>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let answers = parse_submission(&request)?;
    let bypass = request.p_mode == BYPASS_PAYMENT_MODE;

    let user = find_or_create_user(
        &state.db,
        request.name.trim(),
        request.email.trim(),
        request.gender.as_deref(),
        request.age,
    )
    .await?;

    let payment_status = if bypass {
        PaymentStatus::BypassPayment
    } else {
        PaymentStatus::Pending
    };
    let test = create_test(
        &state.db,
        NewTest {
            test_giver_name: request.name.trim(),
            age: request.age,
            gender: request.gender.as_deref(),
            user_id: user.id,
            payment_status,
            payment_link: "",
        },
    )
    .await?;

    let stored = insert_answers(&state.db, user.id, test.id, &answers).await?;
    info!(
        "Stored {stored} answers for test {} (payment: {})",
        test.id,
        payment_status.as_str()
    );

    if bypass {
        let test = test.clone();
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = generate_report(&state, &test, &user).await {
                error!("Background report generation failed for test {}: {e}", test.id);
            }
        });
    }

    Ok(Json(SubmissionResponse {
        message: "Submission successful".to_string(),
        test_id: test.id,
        payment_link: test.payment_link,
    }))
}

/// GET /api/v1/questions
pub async fn handle_list_questions(
    State(state): State<AppState>,
) -> Result<Json<Vec<QuestionRow>>, AppError> {
    Ok(Json(fetch_questions(&state.db).await?))
}

/// POST /api/v1/questions
///
/// Bulk-loads questionnaire items.
pub async fn handle_create_questions(
    State(state): State<AppState>,
    Json(request): Json<Vec<QuestionInput>>,
) -> Result<Json<QuestionsCreated>, AppError> {
    if request.iter().any(|q| q.question.trim().is_empty() || q.no < 1) {
        return Err(AppError::Validation(
            "every question needs text and a number of at least 1".to_string(),
        ));
    }

    let questions: Vec<NewQuestion> = request
        .into_iter()
        .map(|q| NewQuestion {
            test_name: q.test_name.unwrap_or_else(|| TEST_NAME.to_string()),
            question: q.question,
            question_number: q.no,
        })
        .collect();

    let inserted = insert_questions(&state.db, &questions).await?;
    Ok(Json(QuestionsCreated { inserted }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(answers: serde_json::Value) -> SubmissionRequest {
        serde_json::from_value(serde_json::json!({
            "email": "ada@example.com",
            "name": "Ada",
            "age": 36,
            "gender": "female",
            "answers": answers,
            "pMode": "pass"
        }))
        .unwrap()
    }

    #[test]
    fn test_submission_body_uses_camel_case() {
        let id = Uuid::new_v4();
        let parsed = request(serde_json::json!([{"id": id.to_string(), "answer": " 4 "}]));
        assert_eq!(parsed.p_mode, "pass");
        assert_eq!(parse_submission(&parsed).unwrap(), vec![(id, "4".to_string())]);
    }

    #[test]
    fn test_p_mode_defaults_to_payment() {
        let parsed: SubmissionRequest = serde_json::from_value(serde_json::json!({
            "email": "ada@example.com",
            "name": "Ada",
            "answers": []
        }))
        .unwrap();
        assert_eq!(parsed.p_mode, "");
        assert!(parsed.age.is_none());
    }

    #[test]
    fn test_invalid_question_id_is_rejected() {
        let parsed = request(serde_json::json!([{"id": "not-a-uuid", "answer": "3"}]));
        assert!(matches!(
            parse_submission(&parsed),
            Err(AppError::Validation(msg)) if msg.contains("not-a-uuid")
        ));
    }

    #[test]
    fn test_empty_answers_are_rejected() {
        let parsed = request(serde_json::json!([]));
        assert!(matches!(
            parse_submission(&parsed),
            Err(AppError::Validation(_))
        ));
    }
}
