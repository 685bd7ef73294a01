use crate::catalog::Category;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Near-uniform pre-assignment of category values across a batch.
#[derive(Debug, Default, Clone, Copy)]
pub struct BalancedBatchPlanner;

impl BalancedBatchPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Every candidate gets `batch_size / k` slots and the first
    /// `batch_size % k` candidates one more, then the slots are shuffled.
    pub fn plan<S: AsRef<str>, R: Rng + ?Sized>(
        &self,
        candidates: &[S],
        batch_size: usize,
        rng: &mut R,
    ) -> Vec<String> {
        if candidates.is_empty() || batch_size == 0 {
            return Vec::new();
        }
        let k = candidates.len();
        let base = batch_size / k;
        let remainder = batch_size % k;

        let mut slots = Vec::with_capacity(batch_size);
        for (index, candidate) in candidates.iter().enumerate() {
            let copies = base + usize::from(index < remainder);
            slots.extend(std::iter::repeat(candidate.as_ref().to_string()).take(copies));
        }
        slots.shuffle(rng);
        slots.truncate(batch_size);
        slots
    }

    /// An explicit choice is repeated for every slot.
    pub fn plan_fixed(&self, value: &str, batch_size: usize) -> Vec<String> {
        vec![value.to_string(); batch_size]
    }
}

/// Per-category slot assignments for one batch, consumed positionally.
#[derive(Debug, Clone, Default)]
pub struct BatchPlan {
    size: usize,
    slots: HashMap<Category, Vec<String>>,
}

impl BatchPlan {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            slots: HashMap::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn insert(&mut self, category: Category, values: Vec<String>) {
        self.slots.insert(category, values);
    }

    pub fn covers(&self, category: Category) -> bool {
        self.slots.contains_key(&category)
    }

    /// Planned value for `category` at `slot`, if the category was planned.
    pub fn value(&self, category: Category, slot: usize) -> Option<&str> {
        self.slots
            .get(&category)
            .and_then(|values| values.get(slot))
            .map(String::as_str)
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.slots.keys().copied()
    }
}
