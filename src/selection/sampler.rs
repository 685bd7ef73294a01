use super::history::{HistoryStore, DEFAULT_WINDOW};
use crate::catalog::{Category, Segment};
use anyhow::{bail, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Weighting constants for one population segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightPolicy {
    pub penalty_base: f64,
    pub never_used_bonus: f64,
    pub once_used_bonus: f64,
    pub weight_floor: f64,
}

impl WeightPolicy {
    pub const fn general() -> Self {
        Self {
            penalty_base: 0.01,
            never_used_bonus: 50.0,
            once_used_bonus: 20.0,
            weight_floor: 0.001,
        }
    }

    pub const fn gendered() -> Self {
        Self {
            penalty_base: 0.005,
            never_used_bonus: 100.0,
            once_used_bonus: 50.0,
            weight_floor: 0.0001,
        }
    }

    /// Every constant must be finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("penalty_base", self.penalty_base),
            ("never_used_bonus", self.never_used_bonus),
            ("once_used_bonus", self.once_used_bonus),
            ("weight_floor", self.weight_floor),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                bail!("Weight policy {name} must be a positive number, got {value}");
            }
        }
        Ok(())
    }

    /// Weight of a candidate seen `count` times in the recent window.
    pub fn weight(&self, count: usize) -> f64 {
        let mut weight = 1.0;
        if count > 0 {
            weight *= self.penalty_base.powi(count.min(i32::MAX as usize) as i32);
        }
        if count == 0 {
            weight *= self.never_used_bonus;
        }
        if count == 1 {
            weight *= self.once_used_bonus;
        }
        weight.max(self.weight_floor)
    }
}

fn default_window() -> usize {
    DEFAULT_WINDOW
}

const fn default_general() -> WeightPolicy {
    WeightPolicy::general()
}

const fn default_gendered() -> WeightPolicy {
    WeightPolicy::gendered()
}

/// Window size plus the per-segment weight policies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingPolicies {
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_general")]
    pub general: WeightPolicy,
    #[serde(default = "default_gendered")]
    pub gendered: WeightPolicy,
}

impl Default for SamplingPolicies {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            general: WeightPolicy::general(),
            gendered: WeightPolicy::gendered(),
        }
    }
}

impl SamplingPolicies {
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            bail!("Sampling window must be at least 1");
        }
        self.general
            .validate()
            .map_err(|err| err.context("Invalid [sampling.general] policy"))?;
        self.gendered
            .validate()
            .map_err(|err| err.context("Invalid [sampling.gendered] policy"))?;
        Ok(())
    }

    pub fn for_segment(&self, segment: Segment) -> &WeightPolicy {
        if segment.is_gendered() {
            &self.gendered
        } else {
            &self.general
        }
    }
}

/// Anti-repetition weighted draw over a candidate set.
#[derive(Debug, Clone, Default)]
pub struct WeightedSampler {
    policies: SamplingPolicies,
}

impl WeightedSampler {
    pub fn new(policies: SamplingPolicies) -> Self {
        Self { policies }
    }

    /// Candidates still eligible together with their weights.
    ///
    /// Values present in `recent` are excluded unless that would leave
    /// nothing, in which case every candidate stays eligible.
    pub fn weights<'c, S: AsRef<str>>(
        &self,
        candidates: &'c [S],
        recent: &[&str],
        segment: Segment,
    ) -> Vec<(&'c str, f64)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for &value in recent {
            *counts.entry(value).or_default() += 1;
        }

        let mut available: Vec<&str> = candidates
            .iter()
            .map(AsRef::as_ref)
            .filter(|c| !counts.contains_key(c))
            .collect();
        if available.is_empty() {
            available = candidates.iter().map(AsRef::as_ref).collect();
        }

        let policy = self.policies.for_segment(segment);
        available
            .into_iter()
            .map(|c| (c, policy.weight(counts.get(c).copied().unwrap_or(0))))
            .collect()
    }

    /// Draws one candidate. `None` only when `candidates` is empty.
    pub fn choose<S: AsRef<str>, R: Rng + ?Sized>(
        &self,
        candidates: &[S],
        recent: &[&str],
        segment: Segment,
        rng: &mut R,
    ) -> Option<String> {
        let weighted = self.weights(candidates, recent, segment);
        let index = WeightedIndex::new(weighted.iter().map(|(_, w)| *w)).ok()?;
        weighted
            .get(index.sample(rng))
            .map(|(value, _)| (*value).to_string())
    }

    /// Draws against the stored window and records the accepted value.
    pub fn choose_and_record<S: AsRef<str>, R: Rng + ?Sized>(
        &self,
        category: Category,
        segment: Segment,
        candidates: &[S],
        history: &mut HistoryStore,
        rng: &mut R,
    ) -> Option<String> {
        let chosen = {
            let recent = history.recent(category, segment);
            self.choose(candidates, &recent, segment, rng)?
        };
        history.record(category, segment, chosen.clone());
        Some(chosen)
    }
}
