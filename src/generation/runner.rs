use super::backend::{ImageBackend, ImageRequest};
use super::events::{RunEvent, RunEventType, RunLog};
use super::export::{export_csv, ANALYSIS_FILE_NAME};
use super::output::{OutputLayout, SlotMetadata};
use super::{BatchRequest, SelectionMode};
use crate::profiles::{build_prompt, AssemblyError, Profile, ProfileAssembler, SlotInputs};
use anyhow::{Context, Result};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

/// Why a slot produced no image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotIssueReason {
    Assembly,
    Backend,
    Storage,
}

/// A failed slot; the batch carries on past it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotIssue {
    pub slot: usize,
    pub reason: SlotIssueReason,
    pub message: String,
}

impl SlotIssue {
    pub fn new(slot: usize, reason: SlotIssueReason, message: impl Into<String>) -> Self {
        Self {
            slot,
            reason,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchEnd {
    Completed,
    Stopped,
}

/// Progress snapshot handed to a [`RunMonitor`] after every slot.
#[derive(Debug, Clone)]
pub struct SlotProgress<'a> {
    pub slot: usize,
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub issue: Option<&'a SlotIssue>,
}

/// Observes a running batch and decides whether it continues.
pub trait RunMonitor {
    /// Checked once before each slot.
    fn keep_running(&self) -> bool {
        true
    }

    fn batch_started(&self, _output_dir: &Path, _total: usize) {}

    fn slot_finished(&self, _progress: &SlotProgress<'_>) {}
}

/// Monitor that never stops a batch.
pub struct Unmonitored;

impl RunMonitor for Unmonitored {}

/// Result of one batch run.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub batch_id: Uuid,
    pub end: BatchEnd,
    pub output_dir: PathBuf,
    pub total: usize,
    pub profiles: Vec<Profile>,
    pub issues: Vec<SlotIssue>,
    pub csv_path: Option<PathBuf>,
}

impl BatchOutcome {
    pub fn completed(&self) -> usize {
        self.profiles.len()
    }

    pub fn describe(&self) -> String {
        let mut line = format!(
            "Batch {} ({:?}) generated {} of {} profiles ({} failed) in {}.",
            self.batch_id,
            self.end,
            self.completed(),
            self.total,
            self.issues.len(),
            self.output_dir.display()
        );
        if let Some(first) = self.issues.first() {
            line.push_str(&format!(
                " First issue: {:?} at slot {}: {}.",
                first.reason, first.slot, first.message
            ));
        }
        line
    }
}

/// Runs a batch slot by slot: assemble, prompt, render, persist.
pub struct BatchRunner<'a> {
    assembler: &'a mut ProfileAssembler,
    backend: &'a dyn ImageBackend,
    layout: &'a OutputLayout,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        assembler: &'a mut ProfileAssembler,
        backend: &'a dyn ImageBackend,
        layout: &'a OutputLayout,
    ) -> Self {
        Self {
            assembler,
            backend,
            layout,
        }
    }

    /// Fails only when the request as a whole is unusable; slot failures are
    /// collected in the outcome.
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        request: &BatchRequest,
        monitor: &dyn RunMonitor,
        rng: &mut R,
    ) -> Result<BatchOutcome> {
        let total = request.count as usize;
        let plan = match request.mode {
            SelectionMode::Balanced => Some(
                self.assembler
                    .plan_batch(request.gender, &request.overrides, total, rng)
                    .context("Unable to plan balanced batch")?,
            ),
            SelectionMode::Independent => None,
        };

        let model = self.backend.current_model();
        let output_dir = self.layout.create_batch_dir(
            &model,
            request.method_label(),
            &request.nationality,
            request.gender,
            Utc::now(),
        )?;
        let log = RunLog::for_batch_dir(&output_dir);
        let batch_id = Uuid::new_v4();
        log.append(&RunEvent::new(
            batch_id,
            RunEventType::BatchStarted,
            json!({
                "total": total,
                "nationality": request.nationality,
                "gender": request.gender,
                "ages": request.ages.to_string(),
                "mode": request.mode,
                "model": model,
            }),
        ))?;
        monitor.batch_started(&output_dir, total);
        info!(%batch_id, total, dir = %output_dir.display(), "batch started");

        let mut profiles = Vec::with_capacity(total);
        let mut issues = Vec::new();
        let mut end = BatchEnd::Completed;

        for slot in 0..total {
            if !monitor.keep_running() {
                end = BatchEnd::Stopped;
                break;
            }
            let result = self.run_slot(request, slot, plan.as_ref(), &model, &output_dir, rng);
            let issue = match result {
                Ok(profile) => {
                    log.append(&RunEvent::new(
                        batch_id,
                        RunEventType::SlotCompleted,
                        json!({ "slot": slot, "image_id": profile.image_id }),
                    ))?;
                    profiles.push(profile);
                    None
                }
                Err(issue) => {
                    warn!(slot, reason = ?issue.reason, "{}", issue.message);
                    log.append(&RunEvent::new(
                        batch_id,
                        RunEventType::SlotFailed,
                        json!({ "slot": slot, "reason": issue.reason, "message": issue.message }),
                    ))?;
                    issues.push(issue);
                    issues.last()
                }
            };
            monitor.slot_finished(&SlotProgress {
                slot,
                total,
                completed: profiles.len(),
                failed: issues.len(),
                issue,
            });
        }

        let csv_path = if profiles.is_empty() {
            None
        } else {
            let path = output_dir.join(ANALYSIS_FILE_NAME);
            export_csv(&path, &profiles)?;
            Some(path)
        };

        let event_type = match end {
            BatchEnd::Completed => RunEventType::BatchCompleted,
            BatchEnd::Stopped => RunEventType::BatchStopped,
        };
        log.append(&RunEvent::new(
            batch_id,
            event_type,
            json!({ "completed": profiles.len(), "failed": issues.len() }),
        ))?;
        info!(%batch_id, completed = profiles.len(), failed = issues.len(), ?end, "batch finished");

        Ok(BatchOutcome {
            batch_id,
            end,
            output_dir,
            total,
            profiles,
            issues,
            csv_path,
        })
    }

    fn run_slot<R: Rng + ?Sized>(
        &mut self,
        request: &BatchRequest,
        slot: usize,
        plan: Option<&crate::selection::BatchPlan>,
        model: &str,
        output_dir: &Path,
        rng: &mut R,
    ) -> std::result::Result<Profile, SlotIssue> {
        let inputs = SlotInputs {
            nationality: &request.nationality,
            gender: request.gender,
            age: request.ages.sample(rng),
            overrides: &request.overrides,
        };
        let profile = self
            .assembler
            .assemble(&inputs, plan.map(|p| (p, slot)), rng)
            .map_err(|err: AssemblyError| {
                SlotIssue::new(slot, SlotIssueReason::Assembly, err.to_string())
            })?;

        let text = build_prompt(&profile);
        let image_request =
            ImageRequest::new(text.prompt.clone(), text.negative_prompt.clone(), &request.image);
        let image = self.backend.generate(&image_request).map_err(|err| {
            SlotIssue::new(slot, SlotIssueReason::Backend, format!("{err:#}"))
        })?;

        let metadata = SlotMetadata {
            profile,
            prompt: text.prompt,
            negative_prompt: text.negative_prompt,
            model: model.to_string(),
            image: request.image.clone(),
        };
        self.layout
            .write_slot(output_dir, &image, &metadata)
            .map_err(|err| SlotIssue::new(slot, SlotIssueReason::Storage, format!("{err:#}")))?;
        Ok(metadata.profile)
    }
}
