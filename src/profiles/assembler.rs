use super::model::{Demographics, GenerationMethod, Profile};
use crate::catalog::{AgeBandResolver, Category, CategoryCatalog, Gender, Segment, NONE_VALUE};
use crate::selection::{BalancedBatchPlanner, BatchPlan, HistoryStore, SamplingPolicies, WeightedSampler};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Failures that abort a single profile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("unknown trait category '{0}'")]
    UnknownCategory(String),
    #[error("no candidates for '{category}' in segment {segment:?}")]
    EmptyCandidates { category: Category, segment: Segment },
    #[error("'{value}' is not a catalog option for '{category}'")]
    InvalidOverride { category: Category, value: String },
    #[error("batch plan for '{category}' has no value at slot {slot}")]
    PlanExhausted { category: Category, slot: usize },
}

/// Per-category choice carried by a request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitChoice {
    #[default]
    Random,
    Fixed(String),
}

impl TraitChoice {
    pub fn fixed_value(&self) -> Option<&str> {
        match self {
            TraitChoice::Random => None,
            TraitChoice::Fixed(value) => Some(value),
        }
    }

    /// `random`, `aleatorio`, `auto`, `mixed` and blank mean random.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "" | "random" | "aleatorio" | "auto" | "mixed" => TraitChoice::Random,
            _ => TraitChoice::Fixed(trimmed.to_string()),
        }
    }
}

impl FromStr for TraitChoice {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TraitChoice::parse(s))
    }
}

impl fmt::Display for TraitChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraitChoice::Random => f.write_str("random"),
            TraitChoice::Fixed(value) => f.write_str(value),
        }
    }
}

/// Explicit per-category choices; categories not present are random.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitOverrides(BTreeMap<Category, TraitChoice>);

impl TraitOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, category: Category, choice: TraitChoice) {
        match choice {
            TraitChoice::Random => {
                self.0.remove(&category);
            }
            fixed => {
                self.0.insert(category, fixed);
            }
        }
    }

    /// Parses a `category=value` pair.
    pub fn set_from_str(&mut self, category: &str, value: &str) -> Result<(), AssemblyError> {
        let category = category
            .parse::<Category>()
            .map_err(|_| AssemblyError::UnknownCategory(category.trim().to_string()))?;
        self.set(category, TraitChoice::parse(value));
        Ok(())
    }

    pub fn fixed(&self, category: Category) -> Option<&str> {
        self.0.get(&category).and_then(TraitChoice::fixed_value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every fixed value must be an option of its category's full list.
    pub fn validate(&self, catalog: &CategoryCatalog) -> Result<(), AssemblyError> {
        for (category, choice) in &self.0 {
            if let Some(value) = choice.fixed_value() {
                if !catalog.contains(*category, value) {
                    return Err(AssemblyError::InvalidOverride {
                        category: *category,
                        value: value.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Inputs for one batch slot.
#[derive(Debug, Clone)]
pub struct SlotInputs<'a> {
    pub nationality: &'a str,
    pub gender: Gender,
    pub age: u32,
    pub overrides: &'a TraitOverrides,
}

/// Builds profiles one slot at a time against a shared recency ledger.
#[derive(Debug)]
pub struct ProfileAssembler {
    catalog: Arc<CategoryCatalog>,
    sampler: WeightedSampler,
    planner: BalancedBatchPlanner,
    resolver: AgeBandResolver,
    history: HistoryStore,
}

impl ProfileAssembler {
    pub fn new(catalog: Arc<CategoryCatalog>, policies: SamplingPolicies) -> Self {
        Self {
            catalog,
            sampler: WeightedSampler::new(policies),
            planner: BalancedBatchPlanner::new(),
            resolver: AgeBandResolver::new(),
            history: HistoryStore::new(policies.window),
        }
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn catalog_handle(&self) -> Arc<CategoryCatalog> {
        Arc::clone(&self.catalog)
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn reset_history(&mut self) {
        self.history.reset();
        debug!("selection history cleared");
    }

    /// Pre-assigns every balanceable category for a batch of `batch_size`.
    ///
    /// Age-conditioned categories are left to the sampler and gated
    /// categories the gender cannot carry are skipped.
    pub fn plan_batch<R: Rng + ?Sized>(
        &self,
        gender: Gender,
        overrides: &TraitOverrides,
        batch_size: usize,
        rng: &mut R,
    ) -> Result<BatchPlan, AssemblyError> {
        overrides.validate(&self.catalog)?;
        let mut plan = BatchPlan::new(batch_size);
        for category in Category::ALL {
            if category.is_age_conditioned() || is_gated_out(category, gender) {
                continue;
            }
            let values = match overrides.fixed(category) {
                Some(value) => self.planner.plan_fixed(value, batch_size),
                None => {
                    let segment = category.segment_for(gender);
                    let candidates = self.catalog.options_for(category, segment);
                    if candidates.is_empty() {
                        return Err(AssemblyError::EmptyCandidates { category, segment });
                    }
                    self.planner.plan(candidates, batch_size, rng)
                }
            };
            plan.insert(category, values);
        }
        Ok(plan)
    }

    /// Assembles one profile.
    ///
    /// History is only updated when the whole profile succeeds.
    pub fn assemble<R: Rng + ?Sized>(
        &mut self,
        inputs: &SlotInputs<'_>,
        planned: Option<(&BatchPlan, usize)>,
        rng: &mut R,
    ) -> Result<Profile, AssemblyError> {
        let mut accepted: Vec<(Category, Segment, String)> = Vec::new();
        let mut values: BTreeMap<Category, String> = BTreeMap::new();

        for category in Category::ALL {
            let segment = category.segment_for(inputs.gender);
            let value = if is_gated_out(category, inputs.gender) {
                NONE_VALUE.to_string()
            } else if let Some(fixed) = inputs.overrides.fixed(category) {
                if !self.catalog.contains(category, fixed) {
                    return Err(AssemblyError::InvalidOverride {
                        category,
                        value: fixed.to_string(),
                    });
                }
                fixed.to_string()
            } else if let Some((plan, slot)) = planned.filter(|(p, _)| p.covers(category)) {
                let value = plan
                    .value(category, slot)
                    .ok_or(AssemblyError::PlanExhausted { category, slot })?
                    .to_string();
                accepted.push((category, segment, value.clone()));
                value
            } else {
                let value = self.sample(category, segment, inputs.age, rng)?;
                accepted.push((category, segment, value.clone()));
                value
            };
            values.insert(category, value);
        }

        for (category, segment, value) in accepted {
            self.history.record(category, segment, value);
        }

        let region = values.remove(&Category::Region).unwrap_or_default();
        let generated_at = Utc::now();
        let image_id = profile_id(inputs, generated_at.timestamp_nanos_opt().unwrap_or_default(), rng.gen());
        let generation_method = if planned.is_some() {
            GenerationMethod::BalancedBatch
        } else {
            GenerationMethod::WeightedSampling
        };

        Ok(Profile {
            image_id,
            demographics: Demographics {
                nationality: inputs.nationality.to_string(),
                gender: inputs.gender,
                age: inputs.age,
                region,
            },
            traits: values,
            generated_at,
            generation_method,
            uniqueness_score: rng.gen_range(0.8..1.0),
        })
    }

    fn sample<R: Rng + ?Sized>(
        &self,
        category: Category,
        segment: Segment,
        age: u32,
        rng: &mut R,
    ) -> Result<String, AssemblyError> {
        let recent = self.history.recent(category, segment);
        let chosen = match self.resolver.options_for(category, age) {
            Some(banded) => self.sampler.choose(banded, &recent, segment, rng),
            None => {
                let candidates = self.catalog.options_for(category, segment);
                self.sampler.choose(candidates, &recent, segment, rng)
            }
        };
        chosen.ok_or(AssemblyError::EmptyCandidates { category, segment })
    }
}

fn is_gated_out(category: Category, gender: Gender) -> bool {
    category
        .gated_gender()
        .is_some_and(|gated| gated != gender)
}

fn profile_id(inputs: &SlotInputs<'_>, nanos: i64, salt: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(inputs.nationality.as_bytes());
    hasher.update(inputs.gender.as_str().as_bytes());
    hasher.update(inputs.age.to_le_bytes());
    hasher.update(nanos.to_le_bytes());
    hasher.update(salt.to_le_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("profile_{}", &digest[..16])
}
