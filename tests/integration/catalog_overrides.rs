use super::support::StubBackend;
use super::IntegrationHarness;
use anyhow::Result;
use diversitybase::catalog::{Category, CategoryCatalog, Gender};
use diversitybase::generation::runner::Unmonitored;
use diversitybase::generation::{BatchRequest, BatchRunner};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;

#[test]
fn overrides_file_narrows_what_a_batch_can_draw() -> Result<()> {
    let harness = IntegrationHarness::new();
    let path = harness.workspace_path().join("catalog.yaml");
    fs::write(
        &path,
        "region:\n  - caracas\n  - zulia\nclothing_color:\n  - navy\n",
    )?;
    let catalog = CategoryCatalog::with_overrides_file(&path)?;
    let mut assembler = harness.assembler_with(catalog);
    let backend = StubBackend::new();
    let layout = harness.layout();
    let mut rng = StdRng::seed_from_u64(77);

    let request = BatchRequest::new("venezuelan", Gender::Female, 8);
    let outcome = BatchRunner::new(&mut assembler, &backend, &layout).run(
        &request,
        &Unmonitored,
        &mut rng,
    )?;

    assert_eq!(outcome.completed(), 8);
    for profile in &outcome.profiles {
        assert!(["caracas", "zulia"].contains(&profile.demographics.region.as_str()));
        assert_eq!(profile.trait_or_none(Category::ClothingColor), "navy");
    }
    Ok(())
}

#[test]
fn overrides_file_cannot_touch_age_bands() -> Result<()> {
    let harness = IntegrationHarness::new();
    let path = harness.workspace_path().join("catalog.json");
    fs::write(&path, r#"{ "wrinkles": ["none"] }"#)?;
    assert!(CategoryCatalog::with_overrides_file(&path).is_err());

    fs::write(&path, r#"{ "tattoos": ["dragon"] }"#)?;
    let err = CategoryCatalog::with_overrides_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Unknown trait category"));
    Ok(())
}
