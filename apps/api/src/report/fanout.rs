//! Fan-out Orchestrator: one concurrent completion per section, joined by count.
//!
//! Each section runs in its own task and reports back through a bounded mpsc
//! channel. The join reads exactly one message per dispatched task. A failed
//! completion still sends a message (an error placeholder), so the join never
//! waits on a leg that will not answer. Dropping the returned future aborts
//! every in-flight task.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::llm_client::CompletionClient;
use crate::report::Section;

/// What one section's completion produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionOutput {
    /// Completion text, or an `Error: ...` placeholder when `failed`.
    pub text: String,
    pub failed: bool,
    pub elapsed: Duration,
}

impl SectionOutput {
    fn failure(message: impl std::fmt::Display, elapsed: Duration) -> Self {
        Self {
            text: format!("Error: {message}"),
            failed: true,
            elapsed,
        }
    }
}

/// Aborts the wrapped tasks when dropped.
struct AbortOnDrop(Vec<JoinHandle<()>>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Runs one completion per prompt concurrently and returns every section's output.
///
/// The result always has one entry per input section.
pub async fn fan_out(
    client: Arc<dyn CompletionClient>,
    prompts: BTreeMap<Section, String>,
) -> BTreeMap<Section, SectionOutput> {
    let expected = prompts.len();
    if expected == 0 {
        return BTreeMap::new();
    }

    let sections: Vec<Section> = prompts.keys().copied().collect();
    let (tx, mut rx) = mpsc::channel::<(Section, SectionOutput)>(expected);
    let mut tasks = AbortOnDrop(Vec::with_capacity(expected));

    for (section, prompt) in prompts {
        let client = Arc::clone(&client);
        let tx = tx.clone();
        tasks.0.push(tokio::spawn(async move {
            let started = Instant::now();
            let output = match client.complete(&prompt).await {
                Ok(text) => SectionOutput {
                    text,
                    failed: false,
                    elapsed: started.elapsed(),
                },
                Err(e) => {
                    warn!("Section {section} completion failed: {e}");
                    SectionOutput::failure(e, started.elapsed())
                }
            };
            if tx.send((section, output)).await.is_err() {
                debug!("Section {section} finished after the join stopped listening");
            }
        }));
    }
    // Only task-held senders remain, so the channel closes once every task has ended.
    drop(tx);

    let mut results = BTreeMap::new();
    for _ in 0..expected {
        match rx.recv().await {
            Some((section, output)) => {
                info!(
                    "Section {section} completed in {}ms (failed: {})",
                    output.elapsed.as_millis(),
                    output.failed
                );
                results.insert(section, output);
            }
            // A task ended without sending, i.e. it panicked.
            None => break,
        }
    }

    for section in sections {
        results.entry(section).or_insert_with(|| {
            warn!("Section {section} task ended without a result");
            SectionOutput::failure("section task ended without a result", Duration::ZERO)
        });
    }

    results
}
