// All prompt templates for report generation.
// Templates are data: one static per Section, picked by `template_for` and filled by report::prompt_builder.

use crate::report::Section;

/// Shared shell for every section prompt.
/// Replace: {instruction}, {tone_instruction}, {scores}, {json_instruction}, {output_format}
pub const SECTION_PROMPT_TEMPLATE: &str = r#"{instruction}

{tone_instruction}.

Tone and Style-
1) Use a positive and empowering tone to highlight strengths and opportunities.
2) Provide constructive insights for areas of growth.
3) Ensure the language is clear, professional, and engaging.

BIG 5 ASSESSMENT SCORES:
{scores}
{json_instruction}

'OUTPUT JSON FORMAT':
{output_format}"#;

pub struct SectionTemplate {
    pub instruction: &'static str,
    pub output_format: &'static str,
}

static RESULT_TEMPLATE: SectionTemplate = SectionTemplate {
    instruction: "Using the Big 5 Assessment scores given below, create a summary that combines \
        all five domains in around 300-400 words in total. Reflect this individual's scores \
        and keep every observation personal to their results.",
    output_format: r#"{
  "summary": "A 150-200 word overview of the whole personality profile.",
  "domains": {
    "Neuroticism": "30-40 words on what this score means for the client.",
    "Extraversion": "30-40 words on what this score means for the client.",
    "Openness": "30-40 words on what this score means for the client.",
    "Agreeableness": "30-40 words on what this score means for the client.",
    "Conscientiousness": "30-40 words on what this score means for the client."
  }
}"#,
};

static CAREER_ACADEMIC_TEMPLATE: SectionTemplate = SectionTemplate {
    instruction: "Using the Big 5 Assessment scores given below, create the Career & Academia \
        page of the report in under 200 words.",
    output_format: r#"{
  "Career Pathways": {
    "description": "Gain insights into your professional strengths, opportunities, and potential for growth.",
    "sections": {
      "Ideal Roles for You": "Roles that align with the client's personality traits and inherent strengths.",
      "Your Perfect Work Environment": "Workplace settings where the client's qualities can thrive.",
      "Unlocking Professional Growth": "Strategies to maximize strengths and address challenges.",
      "Tailored Career Recommendations": "A short curated list of careers that match the profile."
    }
  },
  "Academic Pathways": {
    "description": "Discover your unique strengths and strategies for learning and academic achievement.",
    "sections": {
      "Your Learning Style Decoded": "Preferred methods of learning and knowledge retention.",
      "Academic Strengths to Leverage": "Areas where the client naturally excels in academics.",
      "Optimizing Your Study Habits": "Actionable strategies to enhance study effectiveness.",
      "Recommended Fields of Study": "Disciplines that align with the client's strengths and interests."
    }
  }
}"#,
};

static RELATIONSHIP_TEMPLATE: SectionTemplate = SectionTemplate {
    instruction: "Using the Big 5 Assessment scores given below, create the Relationship page \
        of the report in under 200 words.",
    output_format: r#"{
  "Relationship Blueprint": {
    "description": "Understand how your personality shapes your connections and interactions with others.",
    "sections": {
      "Your Unique Communication Style": "How the client naturally expresses themselves and connects with others.",
      "Navigating Conflicts with Ease": "The client's conflict-resolution style and approaches to harmony.",
      "Building Meaningful Connections": "Tendencies in social settings and tips to deepen bonds.",
      "Patterns in Your Relationships": "Recurring themes in personal and interpersonal dynamics."
    }
  }
}"#,
};

static STRENGTH_WEAKNESS_TEMPLATE: SectionTemplate = SectionTemplate {
    instruction: "Using the Big 5 Assessment scores given below, create the Strength & Weakness \
        page of the report in under 200 words.",
    output_format: r#"{
  "Path to Fulfillment": {
    "description": "Discover a personalized guide for achieving growth, balance, and long-term satisfaction.",
    "sections": {
      "Your Core Strengths": "The client's most defining strengths and how to harness them.",
      "Areas for Growth": "Gently identified areas for growth, paired with actionable guidance.",
      "Steps Toward Fulfillment": "A holistic vision for balance and happiness, written as prose rather than a list."
    }
  }
}"#,
};

pub fn template_for(section: Section) -> &'static SectionTemplate {
    match section {
        Section::Result => &RESULT_TEMPLATE,
        Section::CareerAcademic => &CAREER_ACADEMIC_TEMPLATE,
        Section::Relationship => &RELATIONSHIP_TEMPLATE,
        Section::StrengthWeakness => &STRENGTH_WEAKNESS_TEMPLATE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_section_gets_its_own_template() {
        assert!(template_for(Section::Result).output_format.contains("\"summary\""));
        assert!(template_for(Section::CareerAcademic).instruction.contains("Career & Academia"));
        assert!(template_for(Section::Relationship).instruction.contains("Relationship page"));
        assert!(template_for(Section::StrengthWeakness).output_format.contains("Path to Fulfillment"));

        let formats: std::collections::HashSet<&str> = Section::ALL
            .iter()
            .map(|s| template_for(*s).output_format)
            .collect();
        assert_eq!(formats.len(), Section::ALL.len());
    }

    #[test]
    fn test_output_formats_are_valid_json() {
        for section in Section::ALL {
            let format = template_for(section).output_format;
            let parsed: Result<serde_json::Value, _> = serde_json::from_str(format);
            assert!(parsed.is_ok(), "{section:?} output format is not JSON");
        }
    }
}
