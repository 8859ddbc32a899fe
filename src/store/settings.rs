use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::info;

/// Which band of mentions should raise alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertThreshold {
    /// All mentions.
    Low,
    /// Neutral and negative.
    Medium,
    /// Negative only.
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMethods {
    pub email: bool,
    pub slack: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertSettings {
    pub auto_alerts_enabled: bool,
    pub alert_threshold: AlertThreshold,
    pub notification_methods: NotificationMethods,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            auto_alerts_enabled: true,
            alert_threshold: AlertThreshold::Medium,
            notification_methods: NotificationMethods {
                email: true,
                slack: false,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct SettingsFile {
    #[serde(default)]
    alert_settings: AlertSettings,
    #[serde(default)]
    competitors: Vec<String>,
}

/// Alert preferences and the tracked competitor list, persisted as one
/// JSON document with upsert semantics.
pub struct SettingsStore {
    path: PathBuf,
    inner: RwLock<SettingsFile>,
}

impl SettingsStore {
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join("settings.json");
        let settings = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&text).context("Failed to parse settings.json")?
        } else {
            SettingsFile::default()
        };

        Ok(Self {
            path,
            inner: RwLock::new(settings),
        })
    }

    pub async fn alert_settings(&self) -> AlertSettings {
        self.inner.read().await.alert_settings.clone()
    }

    pub async fn set_alert_settings(&self, settings: AlertSettings) -> Result<()> {
        let snapshot = {
            let mut inner = self.inner.write().await;
            inner.alert_settings = settings;
            inner.clone()
        };
        self.persist(&snapshot).await?;
        info!("Alert settings saved");
        Ok(())
    }

    pub async fn competitors(&self) -> Vec<String> {
        self.inner.read().await.competitors.clone()
    }

    pub async fn add_competitor(&self, name: String) -> Result<Vec<String>> {
        let snapshot = {
            let mut inner = self.inner.write().await;
            inner.competitors.push(name);
            inner.clone()
        };
        self.persist(&snapshot).await?;
        Ok(snapshot.competitors)
    }

    async fn persist(&self, snapshot: &SettingsFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create data directory")?;
        }
        let json =
            serde_json::to_string_pretty(snapshot).context("Failed to serialize settings")?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("brandpulse-settings-test-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn defaults_when_no_file_exists() {
        let store = SettingsStore::load(&temp_dir()).unwrap();
        let settings = store.alert_settings().await;
        assert!(settings.auto_alerts_enabled);
        assert_eq!(settings.alert_threshold, AlertThreshold::Medium);
        assert!(settings.notification_methods.email);
        assert!(!settings.notification_methods.slack);
    }

    #[tokio::test]
    async fn settings_survive_a_reload() {
        let dir = temp_dir();
        let store = SettingsStore::load(&dir).unwrap();

        let mut settings = store.alert_settings().await;
        settings.alert_threshold = AlertThreshold::High;
        settings.notification_methods.slack = true;
        store.set_alert_settings(settings).await.unwrap();
        store.add_competitor("Acme Corp".to_string()).await.unwrap();

        let reloaded = SettingsStore::load(&dir).unwrap();
        let settings = reloaded.alert_settings().await;
        assert_eq!(settings.alert_threshold, AlertThreshold::High);
        assert!(settings.notification_methods.slack);
        assert_eq!(reloaded.competitors().await, vec!["Acme Corp".to_string()]);
    }
}
