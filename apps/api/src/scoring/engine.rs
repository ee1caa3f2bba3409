//! Scoring Engine: raw Likert answers + fixed rule table → domain/subdomain scores.
//!
//! Pure and deterministic. A subdomain whose items are missing or unparseable
//! is skipped (and logged); the rest of the computation carries on, so a
//! damaged answer set yields a partial but valid result.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::models::answer::RawAnswer;
use crate::scoring::intensity::Intensity;
use crate::scoring::rules::{DomainKind, DomainRule, ItemRef, SubdomainRule, RULES};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subdomain {
    pub code: String,
    pub name: String,
    /// Sum of two adjusted item scores, 2–10.
    pub score: i32,
    pub intensity: Intensity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub kind: DomainKind,
    /// Sum of subdomain scores, 12–60 when every subdomain scored.
    pub score: i32,
    /// In rule-table order. Look facets up by `code` rather than by index.
    pub subdomains: Vec<Subdomain>,
    pub intensity: Intensity,
    pub user_id: Uuid,
    pub test_id: Uuid,
}

#[cfg(test)]
impl Domain {
    pub fn subdomain(&self, code: &str) -> Option<&Subdomain> {
        self.subdomains.iter().find(|s| s.code == code)
    }
}

#[derive(Debug, Error, PartialEq)]
enum ItemError {
    #[error("question {0} has no answer")]
    Missing(u32),
    #[error("question {number} has unparseable answer '{raw}'")]
    Unparseable { number: u32, raw: String },
    #[error("question {number} answer {value} is outside 1-5")]
    OutOfRange { number: u32, value: i32 },
}

/// Scores a test's answers into the five Big-Five domains, in rule-table order.
pub fn compute_domains(user_id: Uuid, test_id: Uuid, answers: &[RawAnswer]) -> Vec<Domain> {
    let mut by_number: HashMap<i32, &RawAnswer> = HashMap::with_capacity(answers.len());
    for answer in answers {
        if by_number.insert(answer.question_number, answer).is_some() {
            warn!(
                "Test {test_id}: duplicate answer for question {}, keeping the last one",
                answer.question_number
            );
        }
    }

    RULES
        .iter()
        .map(|rule| score_domain(rule, &by_number, user_id, test_id))
        .collect()
}

fn score_domain(
    rule: &DomainRule,
    answers: &HashMap<i32, &RawAnswer>,
    user_id: Uuid,
    test_id: Uuid,
) -> Domain {
    let subdomains: Vec<Subdomain> = rule
        .subdomains
        .iter()
        .filter_map(|sub| match score_subdomain(sub, answers) {
            Ok(scored) => Some(scored),
            Err(e) => {
                warn!(
                    "Test {test_id}: skipping subdomain {} ({}) of {}: {e}",
                    sub.code, sub.name, rule.domain
                );
                None
            }
        })
        .collect();

    let score = subdomains.iter().map(|s| s.score).sum();

    Domain {
        kind: rule.domain,
        score,
        subdomains,
        intensity: Intensity::for_domain(score),
        user_id,
        test_id,
    }
}

fn score_subdomain(
    rule: &SubdomainRule,
    answers: &HashMap<i32, &RawAnswer>,
) -> Result<Subdomain, ItemError> {
    let [first, second] = &rule.items;
    let score = item_value(first, answers)? + item_value(second, answers)?;
    Ok(Subdomain {
        code: rule.code.to_string(),
        name: rule.name.to_string(),
        score,
        intensity: Intensity::for_subdomain(score),
    })
}

fn item_value(item: &ItemRef, answers: &HashMap<i32, &RawAnswer>) -> Result<i32, ItemError> {
    let answer = answers
        .get(&(item.number as i32))
        .ok_or(ItemError::Missing(item.number))?;
    let value: i32 = answer
        .raw_score
        .trim()
        .parse()
        .map_err(|_| ItemError::Unparseable {
            number: item.number,
            raw: answer.raw_score.clone(),
        })?;
    if !(1..=5).contains(&value) {
        return Err(ItemError::OutOfRange {
            number: item.number,
            value,
        });
    }
    Ok(item.flow.apply(value))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::scoring::rules::ITEM_COUNT;

    pub(crate) fn answers_from(values: &[&str], user_id: Uuid, test_id: Uuid) -> Vec<RawAnswer> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| RawAnswer {
                user_id,
                test_id,
                question_id: Uuid::new_v4(),
                raw_score: v.to_string(),
                question_number: i as i32 + 1,
            })
            .collect()
    }

    pub(crate) fn uniform_answers(value: &str) -> Vec<RawAnswer> {
        let values = vec![value; ITEM_COUNT as usize];
        answers_from(&values, Uuid::new_v4(), Uuid::new_v4())
    }

    #[test]
    fn test_all_threes_score_average_everywhere() {
        let domains = compute_domains(Uuid::new_v4(), Uuid::new_v4(), &uniform_answers("3"));

        assert_eq!(domains.len(), 5);
        for domain in &domains {
            assert_eq!(domain.subdomains.len(), 6);
            assert_eq!(domain.score, 36);
            assert_eq!(domain.intensity, Intensity::Average);
            for sub in &domain.subdomains {
                assert_eq!(sub.score, 6, "{} should be unaffected by flow", sub.name);
                assert_eq!(sub.intensity, Intensity::Average);
            }
        }
    }

    #[test]
    fn test_reverse_items_invert_raw_value() {
        // All 5s: normal items give 5, reversed items give 1.
        let domains = compute_domains(Uuid::new_v4(), Uuid::new_v4(), &uniform_answers("5"));
        let neuroticism = &domains[0];

        assert_eq!(neuroticism.subdomain("n1").unwrap().score, 10); // N, N
        assert_eq!(neuroticism.subdomain("n5").unwrap().score, 2); // R, R

        let extraversion = &domains[1];
        assert_eq!(extraversion.subdomain("e2").unwrap().score, 6); // N, R
        assert_eq!(extraversion.score, 10 * 5 + 6);
        assert_eq!(extraversion.intensity, Intensity::High);
    }

    #[test]
    fn test_scores_stay_in_range_for_extreme_inputs() {
        for value in ["1", "2", "3", "4", "5"] {
            for domain in compute_domains(Uuid::new_v4(), Uuid::new_v4(), &uniform_answers(value))
            {
                assert!((12..=60).contains(&domain.score), "{}", domain.score);
                for sub in &domain.subdomains {
                    assert!((2..=10).contains(&sub.score));
                }
            }
        }
    }

    #[test]
    fn test_domains_come_back_in_rule_order_with_ids() {
        let user_id = Uuid::new_v4();
        let test_id = Uuid::new_v4();
        let domains = compute_domains(user_id, test_id, &uniform_answers("2"));
        let kinds: Vec<_> = domains.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, RULES.iter().map(|r| r.domain).collect::<Vec<_>>());
        assert!(domains
            .iter()
            .all(|d| d.user_id == user_id && d.test_id == test_id));
    }

    #[test]
    fn test_missing_item_skips_only_that_subdomain() {
        let mut answers = uniform_answers("3");
        answers.retain(|a| a.question_number != 1);

        let domains = compute_domains(Uuid::new_v4(), Uuid::new_v4(), &answers);
        let neuroticism = &domains[0];

        assert_eq!(neuroticism.subdomains.len(), 5);
        assert!(neuroticism.subdomain("n1").is_none());
        assert_eq!(neuroticism.score, 30);
        assert!(domains[1..].iter().all(|d| d.subdomains.len() == 6));
    }

    #[test]
    fn test_unparseable_and_out_of_range_answers_are_skipped() {
        let mut values = vec!["4"; ITEM_COUNT as usize];
        values[12] = "abc"; // e1
        values[24] = "9"; // o1
        let answers = answers_from(&values, Uuid::new_v4(), Uuid::new_v4());

        let domains = compute_domains(Uuid::new_v4(), Uuid::new_v4(), &answers);
        assert!(domains[1].subdomain("e1").is_none());
        assert!(domains[2].subdomain("o1").is_none());
        assert_eq!(domains[1].subdomains.len(), 5);
    }

    #[test]
    fn test_answer_order_does_not_matter() {
        let mut answers = uniform_answers("4");
        answers.reverse();
        let shuffled = compute_domains(Uuid::nil(), Uuid::nil(), &answers);
        answers.sort_by_key(|a| a.question_number);
        let ordered = compute_domains(Uuid::nil(), Uuid::nil(), &answers);
        assert_eq!(shuffled, ordered);
    }

    #[test]
    fn test_no_answers_yields_undefined_domains() {
        let domains = compute_domains(Uuid::nil(), Uuid::nil(), &[]);
        assert_eq!(domains.len(), 5);
        for domain in domains {
            assert!(domain.subdomains.is_empty());
            assert_eq!(domain.score, 0);
            assert_eq!(domain.intensity, Intensity::Undefined);
        }
    }

    #[test]
    fn test_item_value_errors() {
        let answers = answers_from(&[" 2 ", "x"], Uuid::nil(), Uuid::nil());
        let map: HashMap<i32, &RawAnswer> =
            answers.iter().map(|a| (a.question_number, a)).collect();
        let item = |number| ItemRef {
            number,
            flow: crate::scoring::rules::Flow::Reverse,
        };

        assert_eq!(item_value(&item(1), &map), Ok(4));
        assert!(matches!(
            item_value(&item(2), &map),
            Err(ItemError::Unparseable { number: 2, .. })
        ));
        assert_eq!(item_value(&item(3), &map), Err(ItemError::Missing(3)));
    }
}
