//! Axum route handlers for the Report API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::report::{FinalReportRow, ReportRow};
use crate::report::generator::{generate_report, ReportOutcome};
use crate::report::store::{count_reports, fetch_final_reports, fetch_reports};
use crate::state::AppState;
use crate::submissions::store::{fetch_test, fetch_user};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    pub test_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportResponse {
    pub message: String,
    #[serde(flatten)]
    pub outcome: ReportOutcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetailResponse {
    pub report: Vec<ReportRow>,
    pub ai_report: Vec<FinalReportRow>,
}

/// POST /api/v1/reports/generate
///
/// Runs the pipeline synchronously. 208 if the test already has reports or
/// another generation for it is in flight.
pub async fn handle_generate_report(
    State(state): State<AppState>,
    Json(request): Json<GenerateReportRequest>,
) -> Result<Json<GenerateReportResponse>, AppError> {
    let test = fetch_test(&state.db, request.test_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Test {} not found", request.test_id)))?;

    let user = fetch_user(&state.db, test.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User for test {} not found", test.id)))?;

    if count_reports(&state.db, test.id).await? > 0 {
        return Err(AppError::AlreadyReported(test.id));
    }

    let outcome = generate_report(&state, &test, &user).await?;

    Ok(Json(GenerateReportResponse {
        message: "Report generated successfully".to_string(),
        outcome,
    }))
}

/// GET /api/v1/reports/:test_id
pub async fn handle_get_report(
    State(state): State<AppState>,
    Path(test_id): Path<Uuid>,
) -> Result<Json<ReportDetailResponse>, AppError> {
    let report = fetch_reports(&state.db, test_id).await?;
    let ai_report = fetch_final_reports(&state.db, test_id).await?;

    if report.is_empty() && ai_report.is_empty() {
        return Err(AppError::NotFound(format!(
            "No report generated for test {test_id}"
        )));
    }

    Ok(Json(ReportDetailResponse { report, ai_report }))
}
