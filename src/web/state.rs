use std::sync::Arc;

use crate::sentiment::SentimentAnalyzer;
use crate::store::{MentionStore, SettingsStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MentionStore>,
    pub settings: Arc<SettingsStore>,
    pub analyzer: Arc<SentimentAnalyzer>,
    /// How many mentions the dashboard page shows at most.
    pub recent_limit: usize,
}
