//! Report persistence. Report and FinalReport rows are append-only; the
//! `tests.report_sent_status` column doubles as the generation claim.

use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::report::{FinalReportRow, NewFinalReport, NewReport, ReportRow};
use crate::models::test::ReportSentStatus;

/// Inserts every Report row in one statement. Returns the number written.
pub async fn insert_reports(pool: &PgPool, reports: &[NewReport]) -> Result<u64, sqlx::Error> {
    if reports.is_empty() {
        return Ok(0);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
        "INSERT INTO reports (user_id, test_id, position, name, score, intensity, subdomains, domain_summary) ",
    );
    builder.push_values(reports.iter().enumerate(), |mut row, (position, report)| {
        row.push_bind(report.user_id)
            .push_bind(report.test_id)
            .push_bind(position as i16)
            .push_bind(report.kind.as_str())
            .push_bind(report.score)
            .push_bind(report.intensity.as_str())
            .push_bind(Json(report.subdomains.clone()))
            .push_bind(report.domain_summary.clone());
    });

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected())
}

pub async fn insert_final_report(
    pool: &PgPool,
    report: &NewFinalReport,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO final_reports (user_id, test_id, generated_content)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(report.user_id)
    .bind(report.test_id)
    .bind(Json(&report.generated_content))
    .fetch_one(pool)
    .await
}

pub async fn count_reports(pool: &PgPool, test_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM reports WHERE test_id = $1")
        .bind(test_id)
        .fetch_one(pool)
        .await
}

pub async fn fetch_reports(pool: &PgPool, test_id: Uuid) -> Result<Vec<ReportRow>, sqlx::Error> {
    sqlx::query_as::<_, ReportRow>(
        "SELECT * FROM reports WHERE test_id = $1 ORDER BY created_at, position",
    )
    .bind(test_id)
    .fetch_all(pool)
    .await
}

pub async fn fetch_final_reports(
    pool: &PgPool,
    test_id: Uuid,
) -> Result<Vec<FinalReportRow>, sqlx::Error> {
    sqlx::query_as::<_, FinalReportRow>(
        "SELECT * FROM final_reports WHERE test_id = $1 ORDER BY created_at",
    )
    .bind(test_id)
    .fetch_all(pool)
    .await
}

/// Moves `report_sent_status` to DONE.
pub async fn mark_report_sent(pool: &PgPool, test_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE tests SET report_sent_status = $1 WHERE id = $2")
        .bind(ReportSentStatus::Done.as_str())
        .bind(test_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Moves a PENDING test to IN_PROGRESS. Returns false when another run
/// already holds the claim or the report was sent.
pub async fn claim_report(pool: &PgPool, test_id: Uuid) -> Result<bool, sqlx::Error> {
    let claimed: Option<Uuid> = sqlx::query_scalar(
        r#"
        UPDATE tests SET report_sent_status = $1
        WHERE id = $2 AND report_sent_status = $3
        RETURNING id
        "#,
    )
    .bind(ReportSentStatus::InProgress.as_str())
    .bind(test_id)
    .bind(ReportSentStatus::Pending.as_str())
    .fetch_optional(pool)
    .await?;
    Ok(claimed.is_some())
}

/// Hands an IN_PROGRESS claim back so generation can be retried.
pub async fn release_report_claim(pool: &PgPool, test_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE tests SET report_sent_status = $1 WHERE id = $2 AND report_sent_status = $3")
        .bind(ReportSentStatus::Pending.as_str())
        .bind(test_id)
        .bind(ReportSentStatus::InProgress.as_str())
        .execute(pool)
        .await?;
    Ok(())
}
