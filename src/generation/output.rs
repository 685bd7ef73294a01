//! On-disk layout for generated batches.
//!
//! ```text
//! <root>/<model>/<method>_<nationality>_<gender>_<YYYYmmdd_HHMMSS>/
//!     <image_id>.png
//!     <image_id>.json
//!     diversity_analysis.csv
//!     events.jsonl
//! ```

use super::ImageSettings;
use crate::catalog::Gender;
use crate::profiles::Profile;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Metadata file written beside each image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotMetadata {
    pub profile: Profile,
    pub prompt: String,
    pub negative_prompt: String,
    pub model: String,
    pub image: ImageSettings,
}

/// Files produced for one successful slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotFiles {
    pub image: PathBuf,
    pub metadata: PathBuf,
}

#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the directory for a new batch.
    pub fn create_batch_dir(
        &self,
        model: &str,
        method: &str,
        nationality: &str,
        gender: Gender,
        started_at: DateTime<Utc>,
    ) -> Result<PathBuf> {
        let name = format!(
            "{}_{}_{}_{}",
            clean_filename(method),
            clean_filename(nationality),
            gender.as_str(),
            started_at.format("%Y%m%d_%H%M%S")
        );
        let dir = self.root.join(clean_filename(model)).join(name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create batch directory {:?}", dir))?;
        Ok(dir)
    }

    /// Writes `<image_id>.png` and `<image_id>.json` into `batch_dir`.
    pub fn write_slot(
        &self,
        batch_dir: &Path,
        image: &[u8],
        metadata: &SlotMetadata,
    ) -> Result<SlotFiles> {
        let stem = clean_filename(&metadata.profile.image_id);
        let image_path = batch_dir.join(format!("{stem}.png"));
        let metadata_path = batch_dir.join(format!("{stem}.json"));
        fs::write(&image_path, image)
            .with_context(|| format!("Failed to write image {:?}", image_path))?;
        let json = serde_json::to_string_pretty(metadata)?;
        fs::write(&metadata_path, json)
            .with_context(|| format!("Failed to write metadata {:?}", metadata_path))?;
        Ok(SlotFiles {
            image: image_path,
            metadata: metadata_path,
        })
    }

    /// Every generated image under the output root, sorted by path.
    pub fn list_generated_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        if !self.root.exists() {
            return Ok(files);
        }
        for entry in WalkDir::new(&self.root).into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file() && is_image(entry.path()) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Keeps `[A-Za-z0-9._-]`, mapping anything else to `_`.
pub fn clean_filename(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}
