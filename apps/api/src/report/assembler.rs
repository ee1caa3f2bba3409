//! Report Assembler: section outputs + scored domains → persistable records
//! and readable text for rendering.
//!
//! Everything here degrades instead of failing. Unfenced output is used as
//! is, and output that is not JSON is kept as a plain string.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::warn;

use crate::models::report::{NewFinalReport, NewReport};
use crate::report::fanout::SectionOutput;
use crate::report::Section;
use crate::scoring::Domain;

/// Object keys whose names are structural rather than reader-facing.
const TRANSPARENT_KEYS: [&str; 4] = ["summary", "description", "sections", "domains"];

#[derive(Debug, Clone)]
pub struct AssembledReport {
    pub reports: Vec<NewReport>,
    pub final_report: NewFinalReport,
    /// Flattened text per section, in the shape the PDF renderer draws.
    pub rendered: BTreeMap<Section, String>,
}

/// Removes a surrounding ```` ```json ```` / ```` ``` ```` fence.
///
/// Only strips when both the opening and the closing fence are present;
/// anything else comes back unchanged. The language tag on the opening line
/// is dropped whatever its case. Idempotent on its own output.
pub fn strip_markdown_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(after_open) = trimmed.strip_prefix("```") else {
        return text;
    };
    let Some(body) = after_open.strip_suffix("```") else {
        return text;
    };
    let body = match body.split_once('\n') {
        Some((tag, rest)) if is_language_tag(tag.trim()) => rest,
        _ => match body.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &body[4..],
            _ => body,
        },
    };
    body.trim()
}

fn is_language_tag(tag: &str) -> bool {
    tag.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '_'))
}

/// Parses a section's text as JSON, falling back to the text itself.
fn parse_content(section: Section, output: &SectionOutput) -> Value {
    if output.failed {
        return Value::String(output.text.clone());
    }
    let body = strip_markdown_fence(&output.text);
    match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(e) => {
            warn!("Section {section} output is not JSON ({e}), keeping raw text");
            Value::String(body.to_string())
        }
    }
}

/// Turns a JSON section into paragraphs: headings for named keys, text for values.
pub fn flatten_content(value: &Value) -> String {
    let mut paragraphs = Vec::new();
    flatten_into(value, &mut paragraphs);
    paragraphs.join("\n\n")
}

fn flatten_into(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() {
                out.push(s.to_string());
            }
        }
        Value::Bool(_) | Value::Number(_) => out.push(value.to_string()),
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::String(s) => out.push(format!("- {}", s.trim())),
                    other => flatten_into(other, out),
                }
            }
        }
        Value::Object(map) => {
            for (key, inner) in map {
                if !TRANSPARENT_KEYS.contains(&key.as_str()) {
                    out.push(key.clone());
                }
                flatten_into(inner, out);
            }
        }
    }
}

fn domain_summary(result: Option<&Value>, domain: &Domain) -> Option<String> {
    result?
        .get("domains")?
        .get(domain.kind.display_name())?
        .as_str()
        .map(|s| s.trim().to_string())
}

/// Builds one Report per domain and one FinalReport for the whole test.
pub fn assemble(domains: &[Domain], outputs: &BTreeMap<Section, SectionOutput>) -> AssembledReport {
    let parsed: BTreeMap<Section, Value> = outputs
        .iter()
        .map(|(section, output)| (*section, parse_content(*section, output)))
        .collect();

    let result = parsed.get(&Section::Result);
    let reports = domains
        .iter()
        .map(|domain| NewReport {
            user_id: domain.user_id,
            test_id: domain.test_id,
            kind: domain.kind,
            score: domain.score,
            intensity: domain.intensity,
            subdomains: domain.subdomains.clone(),
            domain_summary: domain_summary(result, domain),
        })
        .collect();

    let rendered = parsed
        .iter()
        .map(|(section, value)| (*section, flatten_content(value)))
        .collect();

    let (user_id, test_id) = domains
        .first()
        .map(|d| (d.user_id, d.test_id))
        .unwrap_or_default();

    let generated_content: Map<String, Value> = parsed
        .into_iter()
        .map(|(section, value)| (section.key().to_string(), value))
        .collect();

    AssembledReport {
        reports,
        final_report: NewFinalReport {
            user_id,
            test_id,
            generated_content,
        },
        rendered,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::scoring::compute_domains;
    use crate::scoring::engine::tests::answers_from;

    fn ok(text: &str) -> SectionOutput {
        SectionOutput {
            text: text.to_string(),
            failed: false,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn test_strip_fence_variants() {
        assert_eq!(strip_markdown_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_markdown_fence("  ```\n{\"a\":1}\n```  "), "{\"a\":1}");
        assert_eq!(strip_markdown_fence("{\"a\":1}"), "{\"a\":1}");
        // Unclosed fence is left alone.
        assert_eq!(strip_markdown_fence("```json\n{\"a\":1}"), "```json\n{\"a\":1}");
        assert_eq!(strip_markdown_fence("```"), "```");
    }

    #[test]
    fn test_strip_fence_tag_ignores_case() {
        assert_eq!(strip_markdown_fence("```JSON\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_markdown_fence("```Json \n[1]\n```"), "[1]");
        assert_eq!(strip_markdown_fence("```JSON{\"a\":1}```"), "{\"a\":1}");
        // Prose on a single fenced line is not a tag.
        assert_eq!(strip_markdown_fence("```Plain words```"), "Plain words");
    }

    #[test]
    fn test_strip_fence_is_idempotent() {
        for input in [
            "```json\n{\"a\":1}\n```",
            "```JSON\n{\"a\":1}\n```",
            "plain text",
            "  padded  ",
            "```json\nunclosed",
            "",
        ] {
            let once = strip_markdown_fence(input);
            assert_eq!(strip_markdown_fence(once), once, "{input:?}");
        }
    }

    #[test]
    fn test_non_json_output_degrades_to_text() {
        let value = parse_content(Section::Relationship, &ok("```json\nnot json at all\n```"));
        assert_eq!(value, Value::String("not json at all".to_string()));
    }

    #[test]
    fn test_failed_output_keeps_placeholder() {
        let failed = SectionOutput {
            text: "Error: no choices in response".to_string(),
            failed: true,
            elapsed: Duration::ZERO,
        };
        assert_eq!(
            parse_content(Section::Result, &failed),
            json!("Error: no choices in response")
        );
    }

    #[test]
    fn test_flatten_emits_headings_and_text_in_order() {
        let value = json!({
            "Relationship Blueprint": {
                "description": "How you connect.",
                "sections": {
                    "Your Unique Communication Style": "Direct and warm.",
                    "Patterns in Your Relationships": ["Loyal", "Steady"]
                }
            }
        });

        assert_eq!(
            flatten_content(&value),
            "Relationship Blueprint\n\nHow you connect.\n\n\
             Your Unique Communication Style\n\nDirect and warm.\n\n\
             Patterns in Your Relationships\n\n- Loyal\n\n- Steady"
        );
    }

    #[test]
    fn test_assemble_builds_reports_and_final_report() {
        let user_id = Uuid::new_v4();
        let test_id = Uuid::new_v4();
        let domains = compute_domains(user_id, test_id, &answers_from(&["3"; 60], user_id, test_id));

        let result = json!({
            "summary": "Balanced overall.",
            "domains": {"Neuroticism": "Calm under pressure.", "Openness": "Curious."}
        });
        let mut outputs = BTreeMap::new();
        outputs.insert(Section::Result, ok(&format!("```json\n{result}\n```")));
        outputs.insert(Section::Relationship, ok("just prose"));

        let assembled = assemble(&domains, &outputs);

        assert_eq!(assembled.reports.len(), 5);
        assert_eq!(
            assembled.reports[0].domain_summary.as_deref(),
            Some("Calm under pressure.")
        );
        assert_eq!(assembled.reports[1].domain_summary, None);
        assert!(assembled.reports.iter().all(|r| r.test_id == test_id));

        let content = &assembled.final_report.generated_content;
        assert_eq!(assembled.final_report.user_id, user_id);
        assert_eq!(content["result"], result);
        assert_eq!(content["relationship"], json!("just prose"));
        assert!(assembled.rendered[&Section::Result].starts_with("Balanced overall."));
    }
}
