use crate::catalog::{Category, Gender};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a profile's traits were chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
    WeightedSampling,
    BalancedBatch,
}

impl GenerationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMethod::WeightedSampling => "weighted_sampling",
            GenerationMethod::BalancedBatch => "balanced_batch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    pub nationality: String,
    pub gender: Gender,
    pub age: u32,
    pub region: String,
}

/// One synthetic appearance record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub image_id: String,
    pub demographics: Demographics,
    pub traits: BTreeMap<Category, String>,
    pub generated_at: DateTime<Utc>,
    pub generation_method: GenerationMethod,
    /// Display only.
    pub uniqueness_score: f64,
}

impl Profile {
    pub fn trait_value(&self, category: Category) -> Option<&str> {
        if category == Category::Region {
            return Some(&self.demographics.region);
        }
        self.traits.get(&category).map(String::as_str)
    }

    /// Trait value, treating an absent trait as "none".
    pub fn trait_or_none(&self, category: Category) -> &str {
        self.trait_value(category).unwrap_or(crate::catalog::NONE_VALUE)
    }
}
