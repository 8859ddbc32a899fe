use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::sentiment::Sentiment;
use crate::store::Mention;

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SentimentStats {
    pub total: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub positive_pct: f64,
    pub neutral_pct: f64,
    pub negative_pct: f64,
    /// Share of mentions carrying a suggested response.
    pub response_rate: f64,
    pub negative_today: usize,
}

fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    // One decimal, matching the dashboard cards.
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

impl SentimentStats {
    pub fn compute(mentions: &[Mention], now: DateTime<Utc>) -> Self {
        let total = mentions.len();
        let positive = mentions.iter().filter(|m| m.sentiment == Sentiment::Positive).count();
        let neutral = mentions.iter().filter(|m| m.sentiment == Sentiment::Neutral).count();
        let negative = mentions.iter().filter(|m| m.sentiment == Sentiment::Negative).count();
        let with_response = mentions.iter().filter(|m| m.suggested_response.is_some()).count();
        let negative_today = mentions
            .iter()
            .filter(|m| {
                m.sentiment == Sentiment::Negative && m.timestamp.date_naive() == now.date_naive()
            })
            .count();

        Self {
            total,
            positive,
            neutral,
            negative,
            positive_pct: pct(positive, total),
            neutral_pct: pct(neutral, total),
            negative_pct: pct(negative, total),
            response_rate: pct(with_response, total),
            negative_today,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmotionIntensity {
    pub emotion: String,
    /// Mean intensity as a 0-100 percentage, one decimal.
    pub intensity: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub emotions: Vec<EmotionIntensity>,
    pub tags: Vec<TagCount>,
    pub keywords: Vec<KeywordCount>,
}

pub fn report(mentions: &[Mention]) -> AnalyticsReport {
    AnalyticsReport {
        emotions: emotion_intensity(mentions),
        tags: tag_breakdown(mentions),
        keywords: top_keywords(mentions),
    }
}

/// Per-label mean intensity across every mention that carries that
/// emotion, strongest first.
pub fn emotion_intensity(mentions: &[Mention]) -> Vec<EmotionIntensity> {
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for mention in mentions {
        if let Some(emotions) = &mention.emotions {
            for (label, value) in emotions {
                let entry = sums.entry(label.as_str()).or_insert((0.0, 0));
                entry.0 += f64::from(*value);
                entry.1 += 1;
            }
        }
    }

    let mut result: Vec<EmotionIntensity> = sums
        .into_iter()
        .map(|(label, (sum, count))| EmotionIntensity {
            emotion: capitalize(label),
            intensity: (sum / count as f64 * 1000.0).round() / 10.0,
        })
        .collect();
    result.sort_by(|a, b| {
        b.intensity
            .partial_cmp(&a.intensity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.emotion.cmp(&b.emotion))
    });
    result
}

/// Tag frequencies, top ten, labels prettified for display.
pub fn tag_breakdown(mentions: &[Mention]) -> Vec<TagCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for mention in mentions {
        for tag in &mention.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut result: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: prettify_tag(tag),
            count,
        })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    result.truncate(10);
    result
}

/// Most frequent words longer than four characters across all mention
/// text, top twenty.
pub fn top_keywords(mentions: &[Mention]) -> Vec<KeywordCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for mention in mentions {
        for word in mention.content.to_lowercase().split_whitespace() {
            if word.chars().count() > 4 {
                *counts.entry(word.to_string()).or_insert(0) += 1;
            }
        }
    }

    let mut result: Vec<KeywordCount> = counts
        .into_iter()
        .map(|(word, count)| KeywordCount { word, count })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    result.truncate(20);
    result
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn prettify_tag(tag: &str) -> String {
    tag.split('_')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn mention(content: &str, sentiment: Sentiment) -> Mention {
        Mention {
            id: Uuid::new_v4(),
            content: content.to_string(),
            source: "Twitter".to_string(),
            user_name: "tester".to_string(),
            timestamp: Utc::now(),
            sentiment,
            sentiment_score: 0.5,
            suggested_response: None,
            emotions: None,
            tags: vec![],
            severity: None,
            team_approved: false,
        }
    }

    #[test]
    fn stats_percentages_have_one_decimal() {
        let now = Utc::now();
        let mentions = vec![
            mention("a", Sentiment::Positive),
            mention("b", Sentiment::Positive),
            mention("c", Sentiment::Negative),
        ];
        let stats = SentimentStats::compute(&mentions, now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.positive_pct, 66.7);
        assert_eq!(stats.negative_pct, 33.3);
        assert_eq!(stats.neutral_pct, 0.0);
    }

    #[test]
    fn stats_on_empty_feed_are_all_zero() {
        let stats = SentimentStats::compute(&[], Utc::now());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.positive_pct, 0.0);
        assert_eq!(stats.response_rate, 0.0);
        assert_eq!(stats.negative_today, 0);
    }

    #[test]
    fn negative_today_ignores_older_mentions() {
        let now = Utc::now();
        let mut yesterday = mention("old gripe", Sentiment::Negative);
        yesterday.timestamp = now - Duration::days(1);
        let today = mention("fresh gripe", Sentiment::Negative);

        let stats = SentimentStats::compute(&[yesterday, today], now);
        assert_eq!(stats.negative, 2);
        assert_eq!(stats.negative_today, 1);
    }

    #[test]
    fn response_rate_counts_suggested_responses() {
        let mut with = mention("bad", Sentiment::Negative);
        with.suggested_response = Some("We're on it.".to_string());
        let without = mention("fine", Sentiment::Neutral);

        let stats = SentimentStats::compute(&[with, without], Utc::now());
        assert_eq!(stats.response_rate, 50.0);
    }

    #[test]
    fn emotion_intensity_averages_per_label() {
        let mut a = mention("x", Sentiment::Negative);
        a.emotions = Some(BTreeMap::from([("anger".to_string(), 0.6)]));
        let mut b = mention("y", Sentiment::Negative);
        b.emotions = Some(BTreeMap::from([
            ("anger".to_string(), 0.8),
            ("frustration".to_string(), 0.5),
        ]));

        let result = emotion_intensity(&[a, b]);
        assert_eq!(result[0].emotion, "Anger");
        assert_eq!(result[0].intensity, 70.0);
        assert_eq!(result[1].emotion, "Frustration");
        assert_eq!(result[1].intensity, 50.0);
    }

    #[test]
    fn tag_breakdown_prettifies_and_ranks() {
        let mut a = mention("x", Sentiment::Neutral);
        a.tags = vec!["billing_issue".to_string(), "product".to_string()];
        let mut b = mention("y", Sentiment::Neutral);
        b.tags = vec!["billing_issue".to_string()];

        let result = tag_breakdown(&[a, b]);
        assert_eq!(result[0].tag, "Billing Issue");
        assert_eq!(result[0].count, 2);
        assert_eq!(result[1].tag, "Product");
    }

    #[test]
    fn keywords_skip_short_words_and_rank_by_frequency() {
        let mentions = vec![
            mention("the checkout process is broken", Sentiment::Negative),
            mention("checkout broken again", Sentiment::Negative),
        ];
        let result = top_keywords(&mentions);
        assert_eq!(result[0].word, "broken");
        assert_eq!(result[0].count, 2);
        assert_eq!(result[1].word, "checkout");
        assert!(result.iter().all(|k| k.word.chars().count() > 4));
        // "the" and "is" never appear.
        assert!(result.iter().all(|k| k.word != "the" && k.word != "is"));
    }
}
