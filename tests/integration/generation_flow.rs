use super::support::{StubBackend, FAKE_PNG};
use super::IntegrationHarness;
use anyhow::Result;
use diversitybase::catalog::{Category, Gender, NONE_VALUE};
use diversitybase::generation::export::ANALYSIS_FILE_NAME;
use diversitybase::generation::output::SlotMetadata;
use diversitybase::generation::runner::{BatchEnd, SlotIssueReason, Unmonitored};
use diversitybase::generation::{AgeRange, BatchRequest, BatchRunner, RunEventType, RunLog};
use diversitybase::profiles::GenerationMethod;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;

#[test]
fn weighted_batch_writes_images_metadata_csv_and_events() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut assembler = harness.assembler();
    let backend = StubBackend::new();
    let layout = harness.layout();
    let mut rng = StdRng::seed_from_u64(11);

    let request = BatchRequest::new("venezuelan", Gender::Female, 4);
    let outcome = BatchRunner::new(&mut assembler, &backend, &layout).run(
        &request,
        &Unmonitored,
        &mut rng,
    )?;

    assert_eq!(outcome.end, BatchEnd::Completed);
    assert_eq!(outcome.completed(), 4);
    assert!(outcome.issues.is_empty());
    assert_eq!(backend.call_count(), 4);
    assert!(outcome.output_dir.starts_with(harness.output_root().join("stub-model_v1")));
    let dir_name = outcome.output_dir.file_name().unwrap().to_string_lossy().to_string();
    assert!(dir_name.starts_with("weighted_venezuelan_female_"), "{dir_name}");

    for profile in &outcome.profiles {
        assert!(profile.image_id.starts_with("profile_"));
        assert_eq!(profile.generation_method, GenerationMethod::WeightedSampling);
        let image = outcome.output_dir.join(format!("{}.png", profile.image_id));
        assert_eq!(fs::read(&image)?, FAKE_PNG);
        let json = fs::read_to_string(outcome.output_dir.join(format!("{}.json", profile.image_id)))?;
        let metadata: SlotMetadata = serde_json::from_str(&json)?;
        assert_eq!(metadata.profile.image_id, profile.image_id);
        assert_eq!(metadata.model, "stub-model v1");
        assert!(!metadata.prompt.is_empty());
    }

    let csv_path = outcome.csv_path.clone().expect("csv export");
    assert_eq!(csv_path, outcome.output_dir.join(ANALYSIS_FILE_NAME));
    let csv = fs::read_to_string(&csv_path)?;
    assert_eq!(csv.lines().count(), 5);

    let events = RunLog::for_batch_dir(&outcome.output_dir).read_all()?;
    assert_eq!(events.first().map(|e| e.event_type), Some(RunEventType::BatchStarted));
    assert_eq!(events.last().map(|e| e.event_type), Some(RunEventType::BatchCompleted));
    assert_eq!(
        events.iter().filter(|e| e.event_type == RunEventType::SlotCompleted).count(),
        4
    );
    assert!(events.iter().all(|e| e.batch_id == outcome.batch_id));

    assert_eq!(harness.layout().list_generated_files()?.len(), 4);
    Ok(())
}

#[test]
fn age_45_batches_never_draw_no_wrinkles() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut assembler = harness.assembler();
    let backend = StubBackend::new();
    let layout = harness.layout();
    let mut rng = StdRng::seed_from_u64(45);

    let mut request = BatchRequest::new("venezuelan", Gender::Male, 30);
    request.ages = AgeRange::new(45, 45)?;
    let outcome = BatchRunner::new(&mut assembler, &backend, &layout).run(
        &request,
        &Unmonitored,
        &mut rng,
    )?;

    assert_eq!(outcome.completed(), 30);
    for profile in &outcome.profiles {
        assert_eq!(profile.demographics.age, 45);
        assert_ne!(profile.trait_or_none(Category::Wrinkles), NONE_VALUE);
        assert_eq!(profile.trait_or_none(Category::Makeup), NONE_VALUE);
    }
    Ok(())
}

#[test]
fn backend_failure_only_costs_its_slot() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut assembler = harness.assembler();
    let backend = StubBackend::failing_on(&[1]);
    let layout = harness.layout();
    let mut rng = StdRng::seed_from_u64(3);

    let request = BatchRequest::new("colombian", Gender::Male, 3);
    let outcome = BatchRunner::new(&mut assembler, &backend, &layout).run(
        &request,
        &Unmonitored,
        &mut rng,
    )?;

    assert_eq!(outcome.end, BatchEnd::Completed);
    assert_eq!(outcome.completed(), 2);
    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].slot, 1);
    assert_eq!(outcome.issues[0].reason, SlotIssueReason::Backend);
    assert!(outcome.issues[0].message.contains("refused call 1"));

    let csv = fs::read_to_string(outcome.csv_path.clone().expect("csv export"))?;
    assert_eq!(csv.lines().count(), 3);
    let events = RunLog::for_batch_dir(&outcome.output_dir).read_all()?;
    assert_eq!(
        events.iter().filter(|e| e.event_type == RunEventType::SlotFailed).count(),
        1
    );
    Ok(())
}

#[test]
fn every_failed_slot_skips_the_csv() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut assembler = harness.assembler();
    let backend = StubBackend::failing_on(&[0, 1]);
    let layout = harness.layout();
    let mut rng = StdRng::seed_from_u64(5);

    let request = BatchRequest::new("peruvian", Gender::Female, 2);
    let outcome = BatchRunner::new(&mut assembler, &backend, &layout).run(
        &request,
        &Unmonitored,
        &mut rng,
    )?;

    assert_eq!(outcome.completed(), 0);
    assert!(outcome.csv_path.is_none());
    assert!(!outcome.output_dir.join(ANALYSIS_FILE_NAME).exists());
    assert!(!assembler.history().is_empty());
    Ok(())
}

#[test]
fn backend_prompts_respect_gender_gating() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut assembler = harness.assembler();
    let layout = harness.layout();
    let mut rng = StdRng::seed_from_u64(19);

    let women = StubBackend::new();
    let request = BatchRequest::new("venezuelan", Gender::Female, 12);
    BatchRunner::new(&mut assembler, &women, &layout).run(&request, &Unmonitored, &mut rng)?;
    let prompts = women.prompts();
    assert_eq!(prompts.len(), 12);
    for prompt in &prompts {
        assert!(prompt.contains("woman"), "{prompt}");
        for phrase in [" beard", " mustache", " facial hair"] {
            assert!(!prompt.contains(phrase), "{phrase} in {prompt}");
        }
    }

    let men = StubBackend::new();
    let request = BatchRequest::new("venezuelan", Gender::Male, 12);
    BatchRunner::new(&mut assembler, &men, &layout).run(&request, &Unmonitored, &mut rng)?;
    for prompt in men.prompts() {
        assert!(prompt.contains(" man"), "{prompt}");
        assert!(!prompt.contains(" makeup"), "{prompt}");
    }
    Ok(())
}
