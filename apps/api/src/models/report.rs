use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::scoring::{DomainKind, Intensity, Subdomain};

/// One scored domain of a test, as stored. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub test_id: Uuid,
    /// Rule-table order of the domain within its test.
    pub position: i16,
    pub name: String,
    pub score: i32,
    pub intensity: String,
    pub subdomains: Value,
    pub domain_summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FinalReportRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub test_id: Uuid,
    pub generated_content: Value,
    pub created_at: DateTime<Utc>,
}

/// A Report row before insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub user_id: Uuid,
    pub test_id: Uuid,
    pub kind: DomainKind,
    pub score: i32,
    pub intensity: Intensity,
    pub subdomains: Vec<Subdomain>,
    /// AI commentary for this domain, taken from the result section.
    pub domain_summary: Option<String>,
}

/// A FinalReport row before insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFinalReport {
    pub user_id: Uuid,
    pub test_id: Uuid,
    /// Section key → parsed JSON, or the raw text when it was not JSON.
    pub generated_content: Map<String, Value>,
}
