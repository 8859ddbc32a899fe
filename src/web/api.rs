use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::analytics::{self, AnalyticsReport, SentimentStats};
use crate::feed::{self, FeedFilter};
use crate::sentiment::Sentiment;
use crate::store::{AlertSettings, Mention, NewMention, Severity};

use super::error::ApiError;
use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub content: String,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub sentiment: Sentiment,
    pub sentiment_score: f32,
    pub explanation: String,
    /// Non-empty string or null, never empty.
    pub suggested_response: Option<String>,
}

/// Classifies text without writing anything; storing the result is the
/// caller's job.
pub async fn analyze_sentiment(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    if request.content.trim().is_empty() {
        return Err(ApiError::EmptyContent);
    }

    let classification = state
        .analyzer
        .classify(&request.content, &request.source)
        .await?;

    Ok(Json(AnalyzeResponse {
        sentiment: classification.sentiment,
        sentiment_score: classification.score,
        explanation: classification.explanation,
        suggested_response: classification.reply.into_option(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub content: String,
    pub sentiment: Sentiment,
    pub emotions: Option<BTreeMap<String, f32>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestResponse {
    pub suggested_reply: String,
}

/// On-demand reply drafting; a failure is surfaced to the caller and
/// leaves any stored response untouched.
pub async fn suggest_reply(
    State(state): State<AppState>,
    Json(request): Json<SuggestRequest>,
) -> Result<Json<SuggestResponse>, ApiError> {
    if request.content.trim().is_empty() {
        return Err(ApiError::EmptyContent);
    }

    let reply = state
        .analyzer
        .suggest_reply(&request.content, request.sentiment, request.emotions.as_ref())
        .await?;

    Ok(Json(SuggestResponse {
        suggested_reply: reply,
    }))
}

pub async fn list_mentions(
    State(state): State<AppState>,
    Query(filter): Query<FeedFilter>,
) -> Json<Vec<Mention>> {
    let mentions = state.store.list().await;
    Json(filter.apply(&mentions))
}

#[derive(Debug, Deserialize)]
pub struct CreateMentionRequest {
    pub content: String,
    pub source: String,
    pub user_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub severity: Option<Severity>,
    pub emotions: Option<BTreeMap<String, f32>>,
}

/// Classifies the text, then inserts the mention with the caller's
/// metadata. Sentiment and score are fixed here for the record's
/// lifetime.
pub async fn create_mention(
    State(state): State<AppState>,
    Json(request): Json<CreateMentionRequest>,
) -> Result<(StatusCode, Json<Mention>), ApiError> {
    if request.content.trim().is_empty() {
        return Err(ApiError::EmptyContent);
    }

    let classification = state
        .analyzer
        .classify(&request.content, &request.source)
        .await?;

    let mention = state
        .store
        .insert(NewMention {
            content: request.content,
            source: request.source,
            user_name: request.user_name,
            sentiment: classification.sentiment,
            sentiment_score: classification.score,
            suggested_response: classification.reply.into_option(),
            emotions: request.emotions,
            tags: request.tags,
            severity: request.severity,
        })
        .await;

    Ok((StatusCode::CREATED, Json(mention)))
}

pub async fn acknowledge_mention(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Mention>, ApiError> {
    let mention = state
        .store
        .acknowledge(id)
        .await
        .map_err(|_| ApiError::NotFound)?;
    Ok(Json(mention))
}

pub async fn list_alerts(State(state): State<AppState>) -> Json<Vec<Mention>> {
    let mentions = state.store.list().await;
    Json(feed::alerts(&mentions))
}

pub async fn stats(State(state): State<AppState>) -> Json<SentimentStats> {
    let mentions = state.store.list().await;
    Json(SentimentStats::compute(&mentions, Utc::now()))
}

pub async fn analytics_report(State(state): State<AppState>) -> Json<AnalyticsReport> {
    let mentions = state.store.list().await;
    Json(analytics::report(&mentions))
}

pub async fn alert_settings(State(state): State<AppState>) -> Json<AlertSettings> {
    Json(state.settings.alert_settings().await)
}

pub async fn update_alert_settings(
    State(state): State<AppState>,
    Json(settings): Json<AlertSettings>,
) -> Result<Json<AlertSettings>, ApiError> {
    state.settings.set_alert_settings(settings.clone()).await?;
    Ok(Json(settings))
}

pub async fn list_competitors(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.settings.competitors().await)
}

#[derive(Debug, Deserialize)]
pub struct CompetitorRequest {
    pub name: String,
}

pub async fn add_competitor(
    State(state): State<AppState>,
    Json(request): Json<CompetitorRequest>,
) -> Result<Json<Vec<String>>, ApiError> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::EmptyName);
    }
    let competitors = state.settings.add_competitor(name).await?;
    Ok(Json(competitors))
}

const SAMPLES: &[(&str, &str, &str)] = &[
    ("This is amazing! Love the new features.", "Twitter", "tech_enthusiast"),
    ("App keeps freezing. Very disappointed.", "Reddit", "frustrated_dev"),
    ("It's decent, does the job.", "Google Reviews", "John S."),
];

/// Inserts one classified sample mention, for demoing the dashboard
/// without live source connections.
pub async fn simulate_mention(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Mention>), ApiError> {
    let (content, source, user_name) = {
        let mut rng = rand::thread_rng();
        *SAMPLES.choose(&mut rng).unwrap_or(&SAMPLES[0])
    };

    let classification = state.analyzer.classify(content, source).await?;

    let emotions = match classification.sentiment {
        Sentiment::Positive => {
            BTreeMap::from([("joy".to_string(), 0.8), ("satisfaction".to_string(), 0.9)])
        }
        Sentiment::Negative => {
            BTreeMap::from([("anger".to_string(), 0.7), ("frustration".to_string(), 0.8)])
        }
        Sentiment::Neutral => BTreeMap::from([("neutral".to_string(), 0.6)]),
    };
    let tags = if content.contains("feature") {
        vec!["feature".to_string(), "product".to_string()]
    } else if content.contains("freezing") {
        vec!["technical".to_string(), "quality".to_string()]
    } else {
        vec!["general".to_string()]
    };
    let severity = if classification.sentiment == Sentiment::Negative {
        Severity::High
    } else {
        Severity::Low
    };

    let mention = state
        .store
        .insert(NewMention {
            content: content.to_string(),
            source: source.to_string(),
            user_name: user_name.to_string(),
            sentiment: classification.sentiment,
            sentiment_score: classification.score,
            suggested_response: classification.reply.into_option(),
            emotions: Some(emotions),
            tags,
            severity: Some(severity),
        })
        .await;

    Ok((StatusCode::CREATED, Json(mention)))
}
