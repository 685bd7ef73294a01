//! Age-conditioned candidate sets.
//!
//! Bands are half-open and contiguous: an age on a boundary belongs to the
//! higher band, so 19 resolves to the youngest wrinkle band and 20 to the next.

use super::Category;

const WRINKLES_UNDER_20: &[&str] = &["none"];
const WRINKLES_20S: &[&str] = &[
    "none",
    "fine expression lines",
    "barely visible lines",
    "subtle lines",
    "soft lines",
    "gentle lines",
    "faint lines",
];
const WRINKLES_30S: &[&str] = &[
    "fine expression lines",
    "light laugh lines",
    "subtle crow's feet",
    "forehead lines",
    "nasolabial folds",
    "marionette lines",
    "lip lines",
    "chin lines",
    "cheek lines",
];
const WRINKLES_40S: &[&str] = &[
    "moderate expression lines",
    "crow's feet",
    "forehead lines",
    "laugh lines",
    "worry lines",
    "nasolabial folds",
    "marionette lines",
    "lip lines",
    "chin lines",
    "cheek lines",
    "temple lines",
    "brow lines",
    "under eye lines",
];
const WRINKLES_50S: &[&str] = &[
    "deep expression lines",
    "pronounced crow's feet",
    "deep forehead lines",
    "laugh lines",
    "worry lines",
    "neck lines",
    "smile lines",
    "frown lines",
    "nasolabial folds",
    "marionette lines",
    "lip lines",
    "chin lines",
    "cheek lines",
    "temple lines",
    "brow lines",
    "under eye lines",
    "lateral canthal lines",
    "glabellar lines",
    "periorbital lines",
    "perioral lines",
    "mental lines",
];
const WRINKLES_60_PLUS: &[&str] = &[
    "deep wrinkles",
    "pronounced crow's feet",
    "deep forehead lines",
    "laugh lines",
    "worry lines",
    "neck lines",
    "age lines",
    "nasolabial folds",
    "marionette lines",
    "lip lines",
    "chin lines",
    "cheek lines",
    "temple lines",
    "brow lines",
    "under eye lines",
    "lateral canthal lines",
    "glabellar lines",
    "periorbital lines",
    "perioral lines",
    "mental lines",
    "platysmal bands",
    "horizontal neck lines",
    "vertical neck lines",
];

/// Lower bounds of the wrinkle bands, youngest first.
const WRINKLE_BANDS: [(u32, &[&str]); 6] = [
    (0, WRINKLES_UNDER_20),
    (20, WRINKLES_20S),
    (30, WRINKLES_30S),
    (40, WRINKLES_40S),
    (50, WRINKLES_50S),
    (60, WRINKLES_60_PLUS),
];

const SPOTS_30S: &[&str] = &["none", "few age spots", "minimal age spots"];
const AGE_SPOT_BANDS: [(u32, &[&str]); 5] = [
    (0, &["none"]),
    (30, SPOTS_30S),
    (
        40,
        &["none", "few age spots", "minimal age spots", "some age spots", "moderate age spots"],
    ),
    (
        50,
        &["few age spots", "some age spots", "moderate age spots", "several age spots", "visible age spots"],
    ),
    (
        60,
        &[
            "some age spots",
            "moderate age spots",
            "several age spots",
            "visible age spots",
            "many age spots",
            "extensive age spots",
        ],
    ),
];

const ELASTICITY_BANDS: [(u32, &[&str]); 5] = [
    (0, &["firm"]),
    (25, &["firm", "tight", "elastic", "flexible", "resilient"]),
    (35, &["firm", "tight", "elastic", "flexible", "resilient", "moderate"]),
    (45, &["moderate", "loose", "flexible", "elastic", "firm"]),
    (55, &["loose", "very loose", "flexible", "elastic"]),
];

fn bands_for(category: Category) -> Option<&'static [(u32, &'static [&'static str])]> {
    match category {
        Category::Wrinkles => Some(&WRINKLE_BANDS),
        Category::AgeSpots => Some(&AGE_SPOT_BANDS),
        Category::SkinElasticity => Some(&ELASTICITY_BANDS),
        _ => None,
    }
}

fn resolve(bands: &'static [(u32, &'static [&'static str])], age: u32) -> &'static [&'static str] {
    bands
        .iter()
        .rev()
        .find(|(lower, _)| age >= *lower)
        .map(|(_, options)| *options)
        .unwrap_or(bands[0].1)
}

/// Maps an age to the candidate set of each age-conditioned category.
#[derive(Debug, Default, Clone, Copy)]
pub struct AgeBandResolver;

impl AgeBandResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn wrinkle_options(&self, age: u32) -> &'static [&'static str] {
        resolve(&WRINKLE_BANDS, age)
    }

    /// Zero-based wrinkle band for `age`.
    pub fn wrinkle_band(&self, age: u32) -> usize {
        WRINKLE_BANDS
            .iter()
            .rposition(|(lower, _)| age >= *lower)
            .unwrap_or(0)
    }

    pub fn age_spot_options(&self, age: u32) -> &'static [&'static str] {
        resolve(&AGE_SPOT_BANDS, age)
    }

    pub fn elasticity_options(&self, age: u32) -> &'static [&'static str] {
        resolve(&ELASTICITY_BANDS, age)
    }

    /// Candidates for an age-conditioned category, `None` for any other.
    pub fn options_for(&self, category: Category, age: u32) -> Option<&'static [&'static str]> {
        bands_for(category).map(|bands| resolve(bands, age))
    }
}

/// Union of every band of an age-conditioned category, youngest band first.
pub(super) fn all_options(category: Category) -> Vec<&'static str> {
    bands_for(category)
        .map(|bands| {
            bands
                .iter()
                .flat_map(|(_, options)| options.iter().copied())
                .collect()
        })
        .unwrap_or_default()
}
