pub mod log;
pub mod mention;
pub mod settings;

pub use log::LogWriter;
pub use mention::{Mention, NewMention, Severity};
pub use settings::{AlertSettings, AlertThreshold, NotificationMethods, SettingsStore};

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

/// Change notification published for every write. Consumers treat the
/// stream as lossy and unordered relative to concurrent writes; the
/// usual reaction is a full refetch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeEvent {
    Inserted { mention: Mention },
    Updated { mention: Mention },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no mention with id {0}")]
    UnknownId(Uuid),
}

/// In-memory source of truth for the mentions collection. Reads hand
/// out a full snapshot, newest first; the snapshot is replaced
/// wholesale rather than patched, which keeps downstream filtering
/// pure. Durability is handled by a `LogWriter` subscribed to the
/// change feed.
pub struct MentionStore {
    mentions: RwLock<Vec<Mention>>,
    tx: broadcast::Sender<ChangeEvent>,
}

impl MentionStore {
    pub fn new(mut seed: Vec<Mention>, tx: broadcast::Sender<ChangeEvent>) -> Self {
        seed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Self {
            mentions: RwLock::new(seed),
            tx,
        }
    }

    /// Snapshot of every mention, ordered by timestamp descending.
    pub async fn list(&self) -> Vec<Mention> {
        self.mentions.read().await.clone()
    }

    pub async fn insert(&self, new: NewMention) -> Mention {
        let mention = Mention {
            id: Uuid::new_v4(),
            content: new.content,
            source: new.source,
            user_name: new.user_name,
            timestamp: Utc::now(),
            sentiment: new.sentiment,
            sentiment_score: new.sentiment_score,
            suggested_response: new.suggested_response,
            emotions: new.emotions,
            tags: new.tags,
            severity: new.severity,
            team_approved: false,
        };

        {
            let mut mentions = self.mentions.write().await;
            mentions.insert(0, mention.clone());
        }

        let _ = self.tx.send(ChangeEvent::Inserted {
            mention: mention.clone(),
        });
        mention
    }

    /// Marks an alert as acknowledged. The record stays in place with
    /// `team_approved` set; nothing is ever removed.
    pub async fn acknowledge(&self, id: Uuid) -> Result<Mention, StoreError> {
        let updated = {
            let mut mentions = self.mentions.write().await;
            let mention = mentions
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or(StoreError::UnknownId(id))?;
            mention.team_approved = true;
            mention.clone()
        };

        let _ = self.tx.send(ChangeEvent::Updated {
            mention: updated.clone(),
        });
        Ok(updated)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::Sentiment;

    fn new_mention(content: &str) -> NewMention {
        NewMention {
            content: content.to_string(),
            source: "Twitter".to_string(),
            user_name: "tester".to_string(),
            sentiment: Sentiment::Neutral,
            sentiment_score: 0.5,
            suggested_response: None,
            emotions: None,
            tags: vec![],
            severity: None,
        }
    }

    fn store() -> MentionStore {
        let (tx, _) = broadcast::channel(16);
        MentionStore::new(vec![], tx)
    }

    #[tokio::test]
    async fn insert_assigns_id_and_lists_newest_first() {
        let store = store();
        let first = store.insert(new_mention("older")).await;
        let second = store.insert(new_mention("newer")).await;
        assert_ne!(first.id, second.id);

        let listed = store.list().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].content, "newer");
        assert_eq!(listed[1].content, "older");
    }

    #[tokio::test]
    async fn acknowledge_sets_the_flag_in_place() {
        let store = store();
        let inserted = store.insert(new_mention("needs attention")).await;
        assert!(!inserted.team_approved);

        let updated = store.acknowledge(inserted.id).await.unwrap();
        assert!(updated.team_approved);

        // Still present, not deleted.
        let listed = store.list().await;
        assert_eq!(listed.len(), 1);
        assert!(listed[0].team_approved);
    }

    #[tokio::test]
    async fn acknowledge_unknown_id_is_an_error() {
        let store = store();
        let err = store.acknowledge(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownId(_)));
    }

    #[tokio::test]
    async fn writes_publish_change_events() {
        let store = store();
        let mut rx = store.subscribe();

        let inserted = store.insert(new_mention("hello")).await;
        match rx.recv().await.unwrap() {
            ChangeEvent::Inserted { mention } => assert_eq!(mention.id, inserted.id),
            other => panic!("unexpected event: {:?}", other),
        }

        store.acknowledge(inserted.id).await.unwrap();
        match rx.recv().await.unwrap() {
            ChangeEvent::Updated { mention } => assert!(mention.team_approved),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
