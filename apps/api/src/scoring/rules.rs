//! Fixed Big-Five rule table: 5 domains × 6 subdomains, two questionnaire items each.
//!
//! The table is an ordered array, so iteration order is stable and matches
//! the order domains appear in prompts and reports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of questionnaire items the table references.
pub const ITEM_COUNT: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainKind {
    Neuroticism,
    Extraversion,
    Openness,
    Agreeableness,
    Conscientiousness,
}

impl DomainKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainKind::Neuroticism => "neuroticism",
            DomainKind::Extraversion => "extraversion",
            DomainKind::Openness => "openness",
            DomainKind::Agreeableness => "agreeableness",
            DomainKind::Conscientiousness => "conscientiousness",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DomainKind::Neuroticism => "Neuroticism",
            DomainKind::Extraversion => "Extraversion",
            DomainKind::Openness => "Openness",
            DomainKind::Agreeableness => "Agreeableness",
            DomainKind::Conscientiousness => "Conscientiousness",
        }
    }
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an item's 1–5 response is used as-is or inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Normal,
    Reverse,
}

impl Flow {
    /// `Reverse` maps `v` to `6 - v`, flipping the 1–5 scale.
    pub fn apply(&self, value: i32) -> i32 {
        match self {
            Flow::Normal => value,
            Flow::Reverse => 6 - value,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ItemRef {
    pub number: u32,
    pub flow: Flow,
}

#[derive(Debug, Clone, Copy)]
pub struct SubdomainRule {
    /// Stable identifier, e.g. `n1`.
    pub code: &'static str,
    pub name: &'static str,
    pub items: [ItemRef; 2],
}

#[derive(Debug, Clone, Copy)]
pub struct DomainRule {
    pub domain: DomainKind,
    pub subdomains: [SubdomainRule; 6],
}

const fn rule(
    code: &'static str,
    name: &'static str,
    first: (u32, Flow),
    second: (u32, Flow),
) -> SubdomainRule {
    SubdomainRule {
        code,
        name,
        items: [
            ItemRef {
                number: first.0,
                flow: first.1,
            },
            ItemRef {
                number: second.0,
                flow: second.1,
            },
        ],
    }
}

use self::Flow::{Normal as N, Reverse as R};

pub const RULES: [DomainRule; 5] = [
    DomainRule {
        domain: DomainKind::Neuroticism,
        subdomains: [
            rule("n1", "Anxiety", (1, N), (2, N)),
            rule("n2", "Anger", (3, N), (4, N)),
            rule("n3", "Depression", (5, N), (6, N)),
            rule("n4", "Self-consciousness", (7, N), (8, N)),
            rule("n5", "Immoderation", (9, R), (10, R)),
            rule("n6", "Vulnerability", (11, R), (12, R)),
        ],
    },
    DomainRule {
        domain: DomainKind::Extraversion,
        subdomains: [
            rule("e1", "Friendliness", (13, N), (14, N)),
            rule("e2", "Gregariousness", (15, N), (16, R)),
            rule("e3", "Assertiveness", (17, N), (18, N)),
            rule("e4", "Activity Level", (19, N), (20, N)),
            rule("e5", "Excitement Seeking", (21, N), (22, N)),
            rule("e6", "Cheerfulness", (23, N), (24, N)),
        ],
    },
    DomainRule {
        domain: DomainKind::Openness,
        subdomains: [
            rule("o1", "Imagination", (25, N), (26, N)),
            rule("o2", "Artistic Interests", (27, N), (28, R)),
            rule("o3", "Emotionality", (29, N), (30, R)),
            rule("o4", "Adventurousness", (31, R), (32, R)),
            rule("o5", "Intellect", (33, R), (34, R)),
            rule("o6", "Liberalism", (35, N), (36, R)),
        ],
    },
    DomainRule {
        domain: DomainKind::Agreeableness,
        subdomains: [
            rule("a1", "Trust", (37, N), (38, N)),
            rule("a2", "Morality", (39, R), (40, R)),
            rule("a3", "Altruism", (41, N), (42, N)),
            rule("a4", "Cooperation", (43, R), (44, R)),
            rule("a5", "Modesty", (45, R), (46, R)),
            rule("a6", "Sympathy", (47, N), (48, N)),
        ],
    },
    DomainRule {
        domain: DomainKind::Conscientiousness,
        subdomains: [
            rule("c1", "Self Efficacy", (49, N), (50, N)),
            rule("c2", "Orderliness", (51, N), (52, R)),
            rule("c3", "Dutifulness", (53, N), (54, R)),
            rule("c4", "Achievement Striving", (55, N), (56, N)),
            rule("c5", "Self Discipline", (57, N), (58, R)),
            rule("c6", "Cautiousness", (59, R), (60, R)),
        ],
    },
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_reverse_flow_flips_and_is_involutive() {
        for v in 1..=5 {
            assert_eq!(Flow::Reverse.apply(v), 6 - v);
            assert_eq!(Flow::Reverse.apply(Flow::Reverse.apply(v)), v);
            assert_eq!(Flow::Normal.apply(v), v);
        }
    }

    #[test]
    fn test_every_item_referenced_exactly_once() {
        let mut seen = HashSet::new();
        for domain in &RULES {
            for sub in &domain.subdomains {
                for item in &sub.items {
                    assert!(
                        (1..=ITEM_COUNT).contains(&item.number),
                        "item {} out of range",
                        item.number
                    );
                    assert!(seen.insert(item.number), "item {} reused", item.number);
                }
            }
        }
        assert_eq!(seen.len(), ITEM_COUNT as usize);
    }

    #[test]
    fn test_subdomain_codes_are_unique() {
        let codes: HashSet<_> = RULES
            .iter()
            .flat_map(|d| d.subdomains.iter().map(|s| s.code))
            .collect();
        assert_eq!(codes.len(), 30);
    }

    #[test]
    fn test_domain_order_is_fixed() {
        let order: Vec<_> = RULES.iter().map(|d| d.domain).collect();
        assert_eq!(
            order,
            vec![
                DomainKind::Neuroticism,
                DomainKind::Extraversion,
                DomainKind::Openness,
                DomainKind::Agreeableness,
                DomainKind::Conscientiousness,
            ]
        );
    }
}
