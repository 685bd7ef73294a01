use super::support::StubBackend;
use super::IntegrationHarness;
use anyhow::Result;
use diversitybase::catalog::{Category, CategoryCatalog, Gender, NONE_VALUE};
use diversitybase::generation::runner::Unmonitored;
use diversitybase::generation::{BatchRequest, BatchRunner, SelectionMode};
use diversitybase::profiles::{GenerationMethod, TraitChoice};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

const TONES: [&str; 7] = ["porcelain", "fair", "light", "medium", "olive", "tan", "deep"];

#[test]
fn balanced_batch_spreads_values_within_one() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut catalog = CategoryCatalog::builtin();
    catalog.replace(Category::SkinTone, TONES.iter().map(|t| t.to_string()).collect())?;
    let mut assembler = harness.assembler_with(catalog);
    let backend = StubBackend::new();
    let layout = harness.layout();
    let mut rng = StdRng::seed_from_u64(2024);

    let mut request = BatchRequest::new("venezuelan", Gender::Female, 10);
    request.mode = SelectionMode::Balanced;
    let outcome = BatchRunner::new(&mut assembler, &backend, &layout).run(
        &request,
        &Unmonitored,
        &mut rng,
    )?;
    assert_eq!(outcome.completed(), 10);
    assert!(outcome
        .output_dir
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("balanced_venezuelan_female_"));

    let mut tones: HashMap<&str, usize> = HashMap::new();
    for profile in &outcome.profiles {
        assert_eq!(profile.generation_method, GenerationMethod::BalancedBatch);
        assert_eq!(profile.trait_or_none(Category::FacialHair), NONE_VALUE);
        *tones.entry(profile.trait_or_none(Category::SkinTone)).or_default() += 1;
    }
    assert_eq!(tones.len(), 7);
    for (index, tone) in TONES.iter().enumerate() {
        let expected = if index < 3 { 2 } else { 1 };
        assert_eq!(tones[tone], expected, "unexpected count for {tone}");
    }
    Ok(())
}

#[test]
fn fixed_override_fills_every_balanced_slot() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut assembler = harness.assembler();
    let backend = StubBackend::new();
    let layout = harness.layout();
    let mut rng = StdRng::seed_from_u64(8);

    let mut request = BatchRequest::new("venezuelan", Gender::Male, 6);
    request.mode = SelectionMode::Balanced;
    request.overrides.set(Category::EyeColor, TraitChoice::Fixed("green".into()));
    request
        .overrides
        .set(Category::Makeup, TraitChoice::Fixed("natural".into()));
    let outcome = BatchRunner::new(&mut assembler, &backend, &layout).run(
        &request,
        &Unmonitored,
        &mut rng,
    )?;

    assert_eq!(outcome.completed(), 6);
    for profile in &outcome.profiles {
        assert_eq!(profile.trait_or_none(Category::EyeColor), "green");
        assert_eq!(profile.trait_or_none(Category::Makeup), NONE_VALUE);
    }
    Ok(())
}
