use std::fmt;

use serde::{Deserialize, Serialize};

/// Qualitative bucket assigned to a numeric score.
///
/// `Undefined` only occurs for domain scores below 10, which a complete
/// 60-item questionnaire cannot produce but a partially scored one can.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intensity {
    Low,
    #[serde(rename = "Below Average")]
    BelowAverage,
    Average,
    #[serde(rename = "Above Average")]
    AboveAverage,
    High,
    Undefined,
}

impl Intensity {
    /// Subdomain buckets over the 2–10 range.
    pub fn for_subdomain(score: i32) -> Self {
        if score > 8 {
            Intensity::High
        } else if score > 6 {
            Intensity::AboveAverage
        } else if score > 4 {
            Intensity::Average
        } else if score > 3 {
            Intensity::BelowAverage
        } else {
            Intensity::Low
        }
    }

    /// Domain buckets over the 12–60 range.
    pub fn for_domain(score: i32) -> Self {
        if score >= 50 {
            Intensity::High
        } else if score >= 40 {
            Intensity::AboveAverage
        } else if score >= 30 {
            Intensity::Average
        } else if score >= 20 {
            Intensity::BelowAverage
        } else if score >= 10 {
            Intensity::Low
        } else {
            Intensity::Undefined
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Low => "Low",
            Intensity::BelowAverage => "Below Average",
            Intensity::Average => "Average",
            Intensity::AboveAverage => "Above Average",
            Intensity::High => "High",
            Intensity::Undefined => "Undefined",
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
