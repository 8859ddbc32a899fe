use serde::Deserialize;

use crate::sentiment::Sentiment;
use crate::store::Mention;

/// Three-predicate AND filter over a mention snapshot. Pure and
/// synchronous; recomputed against a fresh snapshot whenever an input
/// changes. The predicates commute, so the UI may apply them in any
/// order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedFilter {
    /// Case-insensitive substring match over content and author name.
    pub search: Option<String>,
    pub sentiment: Option<Sentiment>,
    pub source: Option<String>,
}

impl FeedFilter {
    pub fn matches(&self, mention: &Mention) -> bool {
        if let Some(search) = self.search.as_deref() {
            let search = search.trim().to_lowercase();
            if !search.is_empty()
                && !mention.content.to_lowercase().contains(&search)
                && !mention.user_name.to_lowercase().contains(&search)
            {
                return false;
            }
        }
        if let Some(sentiment) = self.sentiment {
            if mention.sentiment != sentiment {
                return false;
            }
        }
        if let Some(source) = self.source.as_deref() {
            if !source.is_empty() && mention.source != source {
                return false;
            }
        }
        true
    }

    /// Keeps matching mentions in their input order.
    pub fn apply(&self, mentions: &[Mention]) -> Vec<Mention> {
        mentions.iter().filter(|m| self.matches(m)).cloned().collect()
    }
}

fn severity_rank(mention: &Mention) -> u8 {
    // Missing severity sorts after every explicit rank.
    mention.severity.map(|s| s.rank()).unwrap_or(4)
}

/// Alerts are negative mentions still awaiting acknowledgement,
/// ordered by severity rank ascending (critical first) then recency.
pub fn alerts(mentions: &[Mention]) -> Vec<Mention> {
    let mut alerts: Vec<Mention> = mentions
        .iter()
        .filter(|m| m.sentiment == Sentiment::Negative && !m.team_approved)
        .cloned()
        .collect();
    alerts.sort_by(|a, b| {
        severity_rank(a)
            .cmp(&severity_rank(b))
            .then(b.timestamp.cmp(&a.timestamp))
    });
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Severity;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn mention(content: &str, user: &str, source: &str, sentiment: Sentiment) -> Mention {
        Mention {
            id: Uuid::new_v4(),
            content: content.to_string(),
            source: source.to_string(),
            user_name: user.to_string(),
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

    fn sample_feed() -> Vec<Mention> {
        vec![
            mention("Love the new dashboard", "happy_user", "Twitter", Sentiment::Positive),
            mention("App keeps freezing", "frustrated_dev", "Reddit", Sentiment::Negative),
            mention("It does the job", "John S.", "Google Reviews", Sentiment::Neutral),
            mention("Dashboard is broken again", "angry_admin", "Twitter", Sentiment::Negative),
        ]
    }

    #[test]
    fn search_is_case_insensitive_over_content_and_author() {
        let feed = sample_feed();
        let filter = FeedFilter {
            search: Some("DASHBOARD".to_string()),
            ..Default::default()
        };
        let result = filter.apply(&feed);
        assert_eq!(result.len(), 2);

        let by_author = FeedFilter {
            search: Some("john".to_string()),
            ..Default::default()
        };
        assert_eq!(by_author.apply(&feed).len(), 1);
    }

    #[test]
    fn predicates_commute() {
        let feed = sample_feed();
        let search = FeedFilter {
            search: Some("dashboard".to_string()),
            ..Default::default()
        };
        let sentiment = FeedFilter {
            sentiment: Some(Sentiment::Negative),
            ..Default::default()
        };
        let source = FeedFilter {
            source: Some("Twitter".to_string()),
            ..Default::default()
        };
        let combined = FeedFilter {
            search: search.search.clone(),
            sentiment: sentiment.sentiment,
            source: source.source.clone(),
        };

        let expected: Vec<Uuid> = combined.apply(&feed).iter().map(|m| m.id).collect();

        let orders: [[&FeedFilter; 3]; 6] = [
            [&search, &sentiment, &source],
            [&search, &source, &sentiment],
            [&sentiment, &search, &source],
            [&sentiment, &source, &search],
            [&source, &search, &sentiment],
            [&source, &sentiment, &search],
        ];
        for order in orders {
            let mut result = feed.clone();
            for filter in order {
                result = filter.apply(&result);
            }
            let ids: Vec<Uuid> = result.iter().map(|m| m.id).collect();
            assert_eq!(ids, expected);
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let feed = sample_feed();
        let filter = FeedFilter {
            search: Some("a".to_string()),
            sentiment: Some(Sentiment::Negative),
            source: None,
        };
        let once = filter.apply(&feed);
        let twice = filter.apply(&once);
        let once_ids: Vec<Uuid> = once.iter().map(|m| m.id).collect();
        let twice_ids: Vec<Uuid> = twice.iter().map(|m| m.id).collect();
        assert_eq!(once_ids, twice_ids);
    }

    #[test]
    fn empty_search_matches_everything() {
        let feed = sample_feed();
        let filter = FeedFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&feed).len(), feed.len());
    }

    #[test]
    fn alerts_order_by_severity_then_recency() {
        let severities = [Severity::Low, Severity::Critical, Severity::Medium, Severity::High];
        let base = Utc::now();
        let mentions: Vec<Mention> = severities
            .iter()
            .enumerate()
            .map(|(i, severity)| {
                let mut m = mention("bad", "user", "Twitter", Sentiment::Negative);
                m.severity = Some(*severity);
                m.timestamp = base + Duration::seconds(i as i64);
                m
            })
            .collect();

        let ordered: Vec<Severity> = alerts(&mentions)
            .iter()
            .map(|m| m.severity.unwrap())
            .collect();
        assert_eq!(
            ordered,
            vec![Severity::Critical, Severity::High, Severity::Medium, Severity::Low]
        );
    }

    #[test]
    fn alerts_break_severity_ties_by_recency() {
        let base = Utc::now();
        let mut older = mention("old complaint", "a", "Reddit", Sentiment::Negative);
        older.severity = Some(Severity::High);
        older.timestamp = base - Duration::hours(1);
        let mut newer = mention("new complaint", "b", "Reddit", Sentiment::Negative);
        newer.severity = Some(Severity::High);
        newer.timestamp = base;

        let result = alerts(&[older, newer]);
        assert_eq!(result[0].content, "new complaint");
    }

    #[test]
    fn acknowledged_and_non_negative_mentions_are_not_alerts() {
        let mut feed = sample_feed();
        feed[1].team_approved = true;
        let result = alerts(&feed);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].content, "Dashboard is broken again");
    }

    #[test]
    fn missing_severity_sorts_last() {
        let mut with = mention("ranked", "a", "Twitter", Sentiment::Negative);
        with.severity = Some(Severity::Low);
        let without = mention("unranked", "b", "Twitter", Sentiment::Negative);

        let result = alerts(&[without.clone(), with.clone()]);
        assert_eq!(result[0].content, "ranked");
        assert_eq!(result[1].content, "unranked");
    }
}
