use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::llm::{ChatBackend, ChatRequest};
use super::types::{Classification, ReplyOutcome, Sentiment};

const CLASSIFY_PROMPT: &str = "You are a sentiment analysis expert. Analyze the sentiment of the given text and return ONLY a JSON object with these fields: sentiment (must be exactly 'positive', 'neutral', or 'negative'), score (0-1, where 0 is most negative and 1 is most positive), and a brief explanation.";

const DRAFT_REPLY_PROMPT: &str = "You are a customer service expert. Generate a professional, empathetic, and helpful response to address negative customer feedback. Keep it concise (2-3 sentences), acknowledge the concern, and offer to help.";

const SUGGEST_REPLY_PROMPT: &str = "You are a professional customer service representative. Generate empathetic, professional, and helpful responses to customer feedback. Keep responses concise (2-3 sentences max).";

/// Shape the classification prompt constrains the model to.
#[derive(Deserialize)]
struct ClassificationRaw {
    sentiment: Sentiment,
    score: f32,
    #[serde(default)]
    explanation: String,
}

pub struct SentimentAnalyzer {
    backend: Arc<dyn ChatBackend>,
}

impl SentimentAnalyzer {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Classifies one piece of text, and for negative sentiment drafts
    /// a suggested reply with a second call. The draft step is
    /// non-fatal: if it fails, the classification still succeeds with
    /// `ReplyOutcome::Unavailable`. A failure before that point (bad
    /// gateway response, unparsable JSON) fails the whole call.
    pub async fn classify(&self, content: &str, source: &str) -> Result<Classification> {
        let raw = self
            .backend
            .chat(ChatRequest {
                system: CLASSIFY_PROMPT.to_string(),
                user: format!("Analyze the sentiment of this {source} post: \"{content}\""),
                temperature: None,
                max_tokens: None,
            })
            .await
            .context("Sentiment classification request failed")?;

        let cleaned = strip_code_fences(&raw);
        let parsed: ClassificationRaw = serde_json::from_str(&cleaned)
            .context("Classification response is not the expected JSON shape")?;

        let reply = if parsed.sentiment == Sentiment::Negative {
            info!("Drafting suggested response for negative mention");
            match self.draft_reply(content, source).await {
                Ok(text) => {
                    let text = text.trim();
                    if text.is_empty() {
                        ReplyOutcome::Unavailable
                    } else {
                        ReplyOutcome::Suggested(text.to_string())
                    }
                }
                Err(e) => {
                    warn!("Reply draft failed, continuing without one: {:#}", e);
                    ReplyOutcome::Unavailable
                }
            }
        } else {
            ReplyOutcome::NotNeeded
        };

        Ok(Classification {
            sentiment: parsed.sentiment,
            score: parsed.score,
            explanation: parsed.explanation,
            reply,
        })
    }

    async fn draft_reply(&self, content: &str, source: &str) -> Result<String> {
        self.backend
            .chat(ChatRequest {
                system: DRAFT_REPLY_PROMPT.to_string(),
                user: format!("Generate a professional response to this {source} post: \"{content}\""),
                temperature: None,
                max_tokens: None,
            })
            .await
    }

    /// On-demand reply suggestion for an already classified mention.
    /// Errors propagate to the caller; nothing stored is touched.
    pub async fn suggest_reply(
        &self,
        content: &str,
        sentiment: Sentiment,
        emotions: Option<&BTreeMap<String, f32>>,
    ) -> Result<String> {
        let emotion_context = match emotions.filter(|e| !e.is_empty()) {
            Some(emotions) => {
                let labels: Vec<&str> = emotions.keys().map(String::as_str).collect();
                format!("The user seems to feel: {}.", labels.join(", "))
            }
            None => String::new(),
        };

        let reply = self
            .backend
            .chat(ChatRequest {
                system: SUGGEST_REPLY_PROMPT.to_string(),
                user: format!(
                    "Customer feedback ({sentiment}): \"{content}\". {emotion_context} Generate a professional response."
                ),
                temperature: Some(0.7),
                max_tokens: Some(150),
            })
            .await
            .context("Reply suggestion request failed")?;

        Ok(reply.trim().to_string())
    }
}

/// Models occasionally wrap the JSON answer in a markdown code fence
/// despite the prompt; strip it before decoding.
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}
