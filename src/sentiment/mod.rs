pub mod analyzer;
pub mod llm;
pub mod types;

pub use analyzer::SentimentAnalyzer;
pub use llm::{ChatBackend, ChatRequest, HttpChatBackend};
pub use types::{Classification, ReplyOutcome, Sentiment};
