//! Batch generation: request validation, the image backend, on-disk output,
//! the sequential slot runner and the single-job controller.

pub mod backend;
pub mod events;
pub mod export;
pub mod job;
pub mod output;
pub mod runner;

pub use backend::{HttpImageBackend, ImageBackend, ImageRequest};
pub use events::{RunEvent, RunEventType, RunLog};
pub use job::{JobController, JobError, JobState, JobStatus};
pub use output::OutputLayout;
pub use runner::{BatchOutcome, BatchRunner, SlotIssue};

use crate::catalog::{CategoryCatalog, Gender};
use crate::profiles::TraitOverrides;
use anyhow::{bail, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 80;

/// Inclusive age bounds for a batch, clamped to [18, 80].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAgeRange")]
pub struct AgeRange {
    min: u32,
    max: u32,
}

/// Wire form of [`AgeRange`]; deserialised bounds go through `AgeRange::new`.
#[derive(Deserialize)]
struct RawAgeRange {
    min: u32,
    max: u32,
}

impl TryFrom<RawAgeRange> for AgeRange {
    type Error = anyhow::Error;

    fn try_from(raw: RawAgeRange) -> Result<Self> {
        AgeRange::new(raw.min, raw.max)
    }
}

impl AgeRange {
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min > max {
            bail!("Minimum age {min} is greater than maximum age {max}");
        }
        Ok(Self {
            min: min.clamp(MIN_AGE, MAX_AGE),
            max: max.clamp(MIN_AGE, MAX_AGE),
        })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.min..=self.max)
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        Self {
            min: MIN_AGE,
            max: MAX_AGE,
        }
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Whether categories are drawn per slot or pre-planned across the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    Independent,
    Balanced,
}

/// Parameters forwarded to the image backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSettings {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_cfg_scale")]
    pub cfg_scale: f64,
    #[serde(default = "default_steps")]
    pub steps: u32,
    #[serde(default = "default_sampler_name")]
    pub sampler_name: String,
    /// -1 lets the backend pick.
    #[serde(default = "default_seed")]
    pub seed: i64,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            cfg_scale: default_cfg_scale(),
            steps: default_steps(),
            sampler_name: default_sampler_name(),
            seed: default_seed(),
        }
    }
}

const fn default_width() -> u32 {
    512
}

const fn default_height() -> u32 {
    764
}

const fn default_cfg_scale() -> f64 {
    7.0
}

const fn default_steps() -> u32 {
    20
}

fn default_sampler_name() -> String {
    "DPM++ 2M".to_string()
}

const fn default_seed() -> i64 {
    -1
}

/// One generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub nationality: String,
    pub gender: Gender,
    #[serde(default)]
    pub ages: AgeRange,
    pub count: u32,
    #[serde(default)]
    pub mode: SelectionMode,
    #[serde(default)]
    pub overrides: TraitOverrides,
    #[serde(default)]
    pub image: ImageSettings,
}

impl BatchRequest {
    pub fn new(nationality: impl Into<String>, gender: Gender, count: u32) -> Self {
        Self {
            nationality: nationality.into(),
            gender,
            ages: AgeRange::default(),
            count,
            mode: SelectionMode::default(),
            overrides: TraitOverrides::default(),
            image: ImageSettings::default(),
        }
    }

    /// Rejects requests that cannot produce any slot.
    pub fn validate(&self, max_batch_size: u32, catalog: &CategoryCatalog) -> Result<()> {
        if self.nationality.trim().is_empty() {
            bail!("Nationality must not be empty");
        }
        if self.count == 0 || self.count > max_batch_size {
            bail!(
                "Batch size {} is outside the allowed range 1..={}",
                self.count,
                max_batch_size
            );
        }
        if self.ages.min > self.ages.max {
            bail!("Age range {} is inverted", self.ages);
        }
        if self.image.width == 0 || self.image.height == 0 || self.image.steps == 0 {
            bail!("Image width, height and steps must be positive");
        }
        self.overrides.validate(catalog)?;
        Ok(())
    }

    pub fn method_label(&self) -> &'static str {
        match self.mode {
            SelectionMode::Independent => "weighted",
            SelectionMode::Balanced => "balanced",
        }
    }
}
