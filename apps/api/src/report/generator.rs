//! Report Generation: orchestrates the full report pipeline for one test.
//!
//! Flow: claim → fetch_answers → compute_domains → build_prompts → fan_out →
//!       assemble → deliver (link email, or PDF → S3 + email) → persist → mark sent.
//! A failure anywhere after the claim resets the test to PENDING.
//!
//! Section failures degrade to placeholders inside `build_report`. Delivery
//! and persistence failures are returned to the caller. An email that already
//! went out is not rolled back if persistence fails afterwards.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::DeliveryMode;
use crate::errors::AppError;
use crate::llm_client::CompletionClient;
use crate::models::answer::RawAnswer;
use crate::models::test::TestRow;
use crate::models::user::UserRow;
use crate::notify::{Notifier, ReportDelivery};
use crate::render::PdfRenderer;
use crate::report::archive::ReportArchive;
use crate::report::assembler::{assemble, AssembledReport};
use crate::report::fanout::fan_out;
use crate::report::prompt_builder::build_prompts;
use crate::report::store::{
    claim_report, insert_final_report, insert_reports, mark_report_sent, release_report_claim,
};
use crate::report::Section;
use crate::scoring::compute_domains;
use crate::state::AppState;
use crate::submissions::store::fetch_answers;

/// Summary of a finished generation run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOutcome {
    pub test_id: Uuid,
    pub reports_written: u64,
    pub final_report_id: Uuid,
    /// Sections that carry an error placeholder instead of AI content.
    pub failed_sections: Vec<Section>,
}

/// Scores, prompts, completes and assembles. Performs no I/O besides the completions.
pub async fn build_report(
    llm: Arc<dyn CompletionClient>,
    user_id: Uuid,
    test_id: Uuid,
    answers: &[RawAnswer],
) -> (AssembledReport, Vec<Section>) {
    let started = Instant::now();
    let domains = compute_domains(user_id, test_id, answers);
    info!(
        "Test {test_id}: scored {} domains from {} answers in {}ms",
        domains.len(),
        answers.len(),
        started.elapsed().as_millis()
    );

    let prompts = build_prompts(&domains);

    let started = Instant::now();
    let outputs = fan_out(llm, prompts).await;
    let failed: Vec<Section> = outputs
        .iter()
        .filter(|(_, output)| output.failed)
        .map(|(section, _)| *section)
        .collect();
    info!(
        "Test {test_id}: {} section completions finished in {}ms ({} failed)",
        outputs.len(),
        started.elapsed().as_millis(),
        failed.len()
    );
    if failed.len() == outputs.len() {
        warn!("Test {test_id}: every section failed, report will contain placeholders only");
    }

    (assemble(&domains, &outputs), failed)
}

/// Runs the whole pipeline for `test` and delivers the result to `user`.
///
/// The test's `report_sent_status` is claimed first, so concurrent calls for
/// one test produce exactly one report. A failed run hands the claim back.
pub async fn generate_report(
    state: &AppState,
    test: &TestRow,
    user: &UserRow,
) -> Result<ReportOutcome, AppError> {
    if !claim_report(&state.db, test.id).await? {
        return Err(AppError::AlreadyReported(test.id));
    }

    release_on_failure(test.id, run_claimed(state, test, user), || {
        release_report_claim(&state.db, test.id)
    })
    .await
}

async fn run_claimed(
    state: &AppState,
    test: &TestRow,
    user: &UserRow,
) -> Result<ReportOutcome, AppError> {
    let started = Instant::now();

    // Step 1: Load answers
    let answers = fetch_answers(&state.db, test.id).await?;
    if answers.is_empty() {
        return Err(AppError::Validation(format!(
            "No answers stored for test {}",
            test.id
        )));
    }

    // Steps 2-4: Score, prompt, complete, assemble
    let (assembled, failed_sections) =
        build_report(Arc::clone(&state.llm), test.user_id, test.id, &answers).await;

    // Steps 5-6: Deliver, then persist
    let channels = DeliveryChannels {
        notifier: state.notifier.as_ref(),
        renderer: Arc::clone(&state.renderer),
        archive: state.archive.as_ref(),
    };
    let link = state.config.report_link(&test.id);
    let db = &state.db;
    let report = &assembled;
    let test_id = test.id;

    let (reports_written, final_report_id) = deliver_then_persist(
        &channels,
        state.config.delivery,
        &link,
        test,
        user,
        report,
        move || async move {
            let reports_written = insert_reports(db, &report.reports).await?;
            let final_report_id = insert_final_report(db, &report.final_report).await?;
            mark_report_sent(db, test_id).await?;
            Ok::<_, AppError>((reports_written, final_report_id))
        },
    )
    .await?;

    info!(
        "Generated report for test {} ({} domain rows, final report {}) in {}ms",
        test.id,
        reports_written,
        final_report_id,
        started.elapsed().as_millis()
    );

    Ok(ReportOutcome {
        test_id: test.id,
        reports_written,
        final_report_id,
        failed_sections,
    })
}

/// Awaits `work` and runs `release` if it failed. The original error wins
/// over a release failure.
async fn release_on_failure<T, W, R, RFut>(
    test_id: Uuid,
    work: W,
    release: R,
) -> Result<T, AppError>
where
    W: Future<Output = Result<T, AppError>>,
    R: FnOnce() -> RFut,
    RFut: Future<Output = Result<(), sqlx::Error>>,
{
    let result = work.await;
    if let Err(e) = &result {
        warn!("Test {test_id}: generation failed, releasing claim: {e}");
        if let Err(release_err) = release().await {
            warn!("Test {test_id}: failed to release report claim: {release_err}");
        }
    }
    result
}

/// Everything delivery talks to.
pub struct DeliveryChannels<'a> {
    pub notifier: &'a dyn Notifier,
    pub renderer: Arc<dyn PdfRenderer>,
    pub archive: &'a dyn ReportArchive,
}

/// Delivers first and only persists once delivery succeeded.
async fn deliver_then_persist<T, P, PFut>(
    channels: &DeliveryChannels<'_>,
    mode: DeliveryMode,
    link: &str,
    test: &TestRow,
    user: &UserRow,
    assembled: &AssembledReport,
    persist: P,
) -> Result<T, AppError>
where
    P: FnOnce() -> PFut,
    PFut: Future<Output = Result<T, AppError>>,
{
    let started = Instant::now();
    deliver(channels, mode, link, test, user, assembled).await?;
    info!(
        "Test {}: delivered via {:?} in {}ms",
        test.id,
        mode,
        started.elapsed().as_millis()
    );

    persist().await
}

async fn deliver(
    channels: &DeliveryChannels<'_>,
    mode: DeliveryMode,
    link: &str,
    test: &TestRow,
    user: &UserRow,
    assembled: &AssembledReport,
) -> Result<(), AppError> {
    match mode {
        DeliveryMode::Link => {
            channels
                .notifier
                .send_report(&user.email, &test.test_giver_name, ReportDelivery::Link(link))
                .await?;
        }
        DeliveryMode::Pdf => {
            let dir = tempfile::tempdir()
                .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create temp dir: {e}")))?;
            let path = dir.path().join(format!("{}.pdf", test.id));

            // Rendering is blocking; keep it off the async executor.
            let renderer = Arc::clone(&channels.renderer);
            let content = assembled.rendered.clone();
            let person_name = test.test_giver_name.clone();
            let render_path = path.clone();
            tokio::task::spawn_blocking(move || {
                renderer.render(&content, &person_name, &render_path)
            })
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))??;

            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to read rendered PDF: {e}")))?;
            let key = format!("reports/{}.pdf", test.id);

            let upload = channels.archive.store_pdf(&key, bytes);
            let email = channels.notifier.send_report(
                &user.email,
                &test.test_giver_name,
                ReportDelivery::Attachment(&path),
            );

            let (uploaded, emailed) = tokio::join!(upload, email);
            uploaded?;
            emailed?;
        }
    }
    Ok(())
}
