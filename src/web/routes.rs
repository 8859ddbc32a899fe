use askama::Template;
use axum::extract::State;
use axum::response::Html;
use chrono::Utc;

use crate::analytics::SentimentStats;
use crate::feed;

use super::state::AppState;

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    total: usize,
    positive: usize,
    neutral: usize,
    negative: usize,
    positive_pct: String,
    neutral_pct: String,
    negative_pct: String,
    open_alerts: usize,
    mentions: Vec<MentionView>,
}

struct MentionView {
    time: String,
    source: String,
    user_name: String,
    content: String,
    sentiment: String,
    sentiment_css: String,
    score: String,
    severity: String,
    suggested_response: String,
    team_approved: bool,
}

pub async fn dashboard(State(state): State<AppState>) -> Html<String> {
    let all = state.store.list().await;
    let stats = SentimentStats::compute(&all, Utc::now());
    let open_alerts = feed::alerts(&all).len();

    let mentions: Vec<MentionView> = all
        .iter()
        .take(state.recent_limit)
        .map(|m| MentionView {
            time: m.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            source: m.source.clone(),
            user_name: m.user_name.clone(),
            content: m.content.clone(),
            sentiment: m.sentiment.label().to_string(),
            sentiment_css: m.sentiment.css_class().to_string(),
            score: format!("{:.0}%", m.sentiment_score * 100.0),
            severity: m.severity.map(|s| s.label().to_string()).unwrap_or_default(),
            suggested_response: m.suggested_response.clone().unwrap_or_default(),
            team_approved: m.team_approved,
        })
        .collect();

    let template = DashboardTemplate {
        total: stats.total,
        positive: stats.positive,
        neutral: stats.neutral,
        negative: stats.negative,
        positive_pct: format!("{:.1}%", stats.positive_pct),
        neutral_pct: format!("{:.1}%", stats.neutral_pct),
        negative_pct: format!("{:.1}%", stats.negative_pct),
        open_alerts,
        mentions,
    };

    Html(template.render().unwrap_or_else(|e| format!("Template error: {}", e)))
}
