//! Prompt Builder: scored domains → one prompt per report section.
//!
//! Pure and deterministic. Every prompt shares the same scores block; only the
//! section's instruction and requested JSON shape differ.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::llm_client::prompts::{JSON_OUTPUT_INSTRUCTION, TONE_INSTRUCTION};
use crate::report::prompts::{template_for, SECTION_PROMPT_TEMPLATE};
use crate::report::Section;
use crate::scoring::Domain;

/// Builds the prompt for every section.
pub fn build_prompts(domains: &[Domain]) -> BTreeMap<Section, String> {
    let scores = format_scores(domains);
    Section::ALL
        .iter()
        .map(|&section| (section, build_section_prompt(section, &scores)))
        .collect()
}

fn build_section_prompt(section: Section, scores: &str) -> String {
    let template = template_for(section);
    SECTION_PROMPT_TEMPLATE
        .replace("{instruction}", template.instruction)
        .replace("{tone_instruction}", TONE_INSTRUCTION)
        .replace("{json_instruction}", JSON_OUTPUT_INSTRUCTION)
        .replace("{output_format}", template.output_format)
        // Scores last: they are the only caller-derived text substituted.
        .replace("{scores}", scores)
}

/// Renders domains and their named subdomains as the plain-text scores block.
pub fn format_scores(domains: &[Domain]) -> String {
    let mut out = String::new();
    for domain in domains {
        let name = domain.kind.display_name();
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "Domain: {name} Score: {}/60 ({})",
            domain.score, domain.intensity
        );
        let _ = writeln!(out, "  Subdomains of {name}-");
        for sub in &domain.subdomains {
            let _ = writeln!(
                out,
                "    {} Score: {} ({})",
                sub.name, sub.score, sub.intensity
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::scoring::compute_domains;
    use crate::scoring::engine::tests::uniform_answers;

    fn sample_domains() -> Vec<Domain> {
        compute_domains(Uuid::nil(), Uuid::nil(), &uniform_answers("3"))
    }

    #[test]
    fn test_every_section_gets_a_prompt() {
        let prompts = build_prompts(&sample_domains());
        assert_eq!(prompts.len(), Section::ALL.len());
        for section in Section::ALL {
            let prompt = &prompts[&section];
            assert!(prompt.contains(template_for(section).output_format));
            assert!(!prompt.contains("{scores}"));
            assert!(!prompt.contains("{instruction}"));
        }
    }

    #[test]
    fn test_prompts_are_deterministic() {
        let domains = sample_domains();
        assert_eq!(build_prompts(&domains), build_prompts(&domains));
    }

    #[test]
    fn test_scores_block_lists_domains_and_subdomains() {
        let scores = format_scores(&sample_domains());

        assert!(scores.contains("Domain: Neuroticism Score: 36/60 (Average)"));
        assert!(scores.contains("  Subdomains of Conscientiousness-"));
        assert!(scores.contains("    Anxiety Score: 6 (Average)"));
        assert!(scores.contains("    Cautiousness Score: 6 (Average)"));
        assert_eq!(scores.lines().count(), 5 * (2 + 6));
    }

    #[test]
    fn test_skipped_subdomain_is_absent_from_prompt() {
        let mut answers = uniform_answers("3");
        answers.retain(|a| a.question_number != 1);
        let domains = compute_domains(Uuid::nil(), Uuid::nil(), &answers);

        let prompt = &build_prompts(&domains)[&Section::Result];
        assert!(!prompt.contains("Anxiety"));
        assert!(prompt.contains("Domain: Neuroticism Score: 30/60 (Average)"));
    }
}
