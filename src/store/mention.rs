use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::sentiment::Sentiment;

/// Human-facing urgency rank, used only for alert ordering. Supplied
/// at insertion time by the caller; never derived from the sentiment
/// score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Alert sort rank, most urgent first.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// A single externally sourced text item tracked for sentiment.
///
/// `sentiment` and `sentiment_score` are assigned once at creation and
/// never recomputed; `team_approved` is the only field mutated after
/// insertion. Records are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mention {
    pub id: Uuid,
    pub content: String,
    pub source: String,
    pub user_name: String,
    pub timestamp: DateTime<Utc>,
    pub sentiment: Sentiment,
    pub sentiment_score: f32,
    pub suggested_response: Option<String>,
    pub emotions: Option<BTreeMap<String, f32>>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub severity: Option<Severity>,
    #[serde(default)]
    pub team_approved: bool,
}

/// Everything a caller supplies when inserting; id and timestamp are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewMention {
    pub content: String,
    pub source: String,
    pub user_name: String,
    pub sentiment: Sentiment,
    pub sentiment_score: f32,
    pub suggested_response: Option<String>,
    pub emotions: Option<BTreeMap<String, f32>>,
    pub tags: Vec<String>,
    pub severity: Option<Severity>,
}
