use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse three-way classification of a mention's tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Sentiment::Positive => "sentiment-positive",
            Sentiment::Neutral => "sentiment-neutral",
            Sentiment::Negative => "sentiment-negative",
        }
    }

    pub fn all() -> &'static [Sentiment] {
        &[Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative]
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Wire form, matches the serde representation.
        let s = match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        };
        f.write_str(s)
    }
}

/// Outcome of the conditional reply-drafting step.
///
/// `NotNeeded` means the sentiment was not negative and no draft was
/// attempted; `Unavailable` means a draft was attempted but did not
/// succeed. Callers that only care about the wire shape collapse both
/// to `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome {
    NotNeeded,
    Suggested(String),
    Unavailable,
}

impl ReplyOutcome {
    pub fn into_option(self) -> Option<String> {
        match self {
            ReplyOutcome::Suggested(text) => Some(text),
            ReplyOutcome::NotNeeded | ReplyOutcome::Unavailable => None,
        }
    }
}

/// Result of a successful classification pass over one piece of text.
#[derive(Debug, Clone)]
pub struct Classification {
    pub sentiment: Sentiment,
    /// 0.0 is most negative, 1.0 is most positive. Advisory, supplied
    /// by the model and not independently validated.
    pub score: f32,
    pub explanation: String,
    pub reply: ReplyOutcome,
}
