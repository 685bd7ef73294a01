use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const EVENTS_FILE_NAME: &str = "events.jsonl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEventType {
    BatchStarted,
    SlotCompleted,
    SlotFailed,
    BatchStopped,
    BatchCompleted,
}

/// One line of a batch's `events.jsonl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    pub event_id: Uuid,
    pub batch_id: Uuid,
    pub event_type: RunEventType,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub details: serde_json::Value,
}

impl RunEvent {
    pub fn new(batch_id: Uuid, event_type: RunEventType, details: serde_json::Value) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            batch_id,
            event_type,
            timestamp: Utc::now(),
            details,
        }
    }
}

/// Append-only JSONL log stored beside a batch's images.
#[derive(Debug, Clone)]
pub struct RunLog {
    events_path: PathBuf,
}

impl RunLog {
    pub fn for_batch_dir(dir: &Path) -> Self {
        Self {
            events_path: dir.join(EVENTS_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.events_path
    }

    pub fn append(&self, event: &RunEvent) -> Result<()> {
        if let Some(parent) = self.events_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.events_path)
            .with_context(|| format!("Failed to open event log {:?}", self.events_path))?;
        file.write_all(serde_json::to_string(event)?.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }

    /// Reads every event back, skipping blank lines.
    pub fn read_all(&self) -> Result<Vec<RunEvent>> {
        if !self.events_path.exists() {
            return Ok(Vec::new());
        }
        let file = fs::File::open(&self.events_path)
            .with_context(|| format!("Failed to open event log {:?}", self.events_path))?;
        let mut events = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            events.push(
                serde_json::from_str(&line)
                    .with_context(|| format!("Malformed event in {:?}", self.events_path))?,
            );
        }
        Ok(events)
    }
}
