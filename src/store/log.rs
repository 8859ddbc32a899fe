use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{ChangeEvent, Mention};

/// Appends every change to a daily JSONL file. Updates are appended as
/// full records; replay keeps the last record per id, so the log
/// doubles as the durable store without any in-place rewriting.
pub struct LogWriter {
    data_dir: PathBuf,
}

impl LogWriter {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    pub async fn run(self, mut rx: broadcast::Receiver<ChangeEvent>) -> Result<()> {
        info!("Mention log writer started ({})", self.data_dir.display());

        std::fs::create_dir_all(&self.data_dir).context("Failed to create data directory")?;

        loop {
            match rx.recv().await {
                Ok(event) => {
                    let mention = match &event {
                        ChangeEvent::Inserted { mention } | ChangeEvent::Updated { mention } => {
                            mention
                        }
                    };
                    if let Err(e) = self.append(mention).await {
                        error!("Failed to log mention: {:#}", e);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Log writer lagged, skipped {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    info!("Change feed closed, log writer stopping");
                    break;
                }
            }
        }

        Ok(())
    }

    async fn append(&self, mention: &Mention) -> Result<()> {
        use tokio::io::AsyncWriteExt;

        let date_str = Utc::now().format("%Y-%m-%d").to_string();
        let path = self.data_dir.join(format!("mentions_{}.jsonl", date_str));

        let json = serde_json::to_string(mention).context("Failed to serialize mention")?;
        let line = format!("{}\n", json);

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .context("Failed to open mention log")?;

        file.write_all(line.as_bytes())
            .await
            .context("Failed to write to mention log")?;

        Ok(())
    }
}

/// Rebuilds the mention set from the log files. Later records win for
/// a given id, so acknowledgements survive restarts. Unparsable lines
/// are skipped with a warning rather than aborting startup.
pub fn replay(data_dir: &Path) -> Result<Vec<Mention>> {
    let mut by_id: HashMap<Uuid, Mention> = HashMap::new();

    if !data_dir.exists() {
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(data_dir)
        .context("Failed to read data directory")?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("mentions_") && n.ends_with(".jsonl"))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    for path in &paths {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            match serde_json::from_str::<Mention>(line) {
                Ok(mention) => {
                    by_id.insert(mention.id, mention);
                }
                Err(e) => {
                    warn!("Skipping malformed log line in {}: {}", path.display(), e);
                }
            }
        }
    }

    let mut mentions: Vec<Mention> = by_id.into_values().collect();
    mentions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    if !mentions.is_empty() {
        info!("Replayed {} mentions from {} log files", mentions.len(), paths.len());
    }

    Ok(mentions)
}
