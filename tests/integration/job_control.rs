use super::support::StubBackend;
use super::IntegrationHarness;
use anyhow::Result;
use diversitybase::catalog::Gender;
use diversitybase::generation::{BatchRequest, JobController, JobError, JobState, RunEventType, RunLog};
use std::sync::Arc;
use std::time::Duration;

fn controller(harness: &IntegrationHarness, backend: StubBackend) -> JobController {
    JobController::new(harness.assembler(), Arc::new(backend), harness.layout(), 50)
}

#[test]
fn job_runs_to_completion_and_reports_status() -> Result<()> {
    let harness = IntegrationHarness::new();
    let jobs = controller(&harness, StubBackend::new());
    assert_eq!(jobs.status().state, JobState::Idle);

    jobs.start(BatchRequest::new("venezuelan", Gender::Male, 3))?;
    let status = jobs.wait();

    assert_eq!(status.state, JobState::Completed);
    assert!(!status.running);
    assert!(!jobs.is_running());
    assert_eq!(status.total, 3);
    assert_eq!(status.completed, 3);
    assert_eq!(status.failed, 0);
    assert_eq!(status.progress_percent(), 100.0);
    assert!(status.output_dir.as_ref().is_some_and(|dir| dir.is_dir()));
    assert!(!jobs.with_assembler(|assembler| assembler.history().is_empty()));
    Ok(())
}

#[test]
fn second_start_is_rejected_while_running() -> Result<()> {
    let harness = IntegrationHarness::new();
    let jobs = controller(&harness, StubBackend::slow(Duration::from_millis(20)));

    jobs.start(BatchRequest::new("venezuelan", Gender::Female, 40))?;
    let second = jobs.start(BatchRequest::new("venezuelan", Gender::Male, 1));
    assert!(matches!(second, Err(JobError::AlreadyRunning)));
    assert!(matches!(jobs.reset_history(), Err(JobError::AlreadyRunning)));

    assert!(jobs.stop());
    let status = jobs.wait();
    assert_eq!(status.state, JobState::Stopped);
    assert!(status.completed < 40);
    assert!(!jobs.stop());

    let events = RunLog::for_batch_dir(status.output_dir.as_ref().expect("output dir")).read_all()?;
    assert_eq!(events.last().map(|e| e.event_type), Some(RunEventType::BatchStopped));

    jobs.reset_history()?;
    assert!(jobs.with_assembler(|assembler| assembler.history().is_empty()));

    jobs.start(BatchRequest::new("venezuelan", Gender::Male, 1))?;
    assert_eq!(jobs.wait().state, JobState::Completed);
    Ok(())
}

#[test]
fn invalid_requests_never_start() {
    let harness = IntegrationHarness::new();
    let jobs = controller(&harness, StubBackend::new());

    let empty = jobs.start(BatchRequest::new("venezuelan", Gender::Male, 0));
    assert!(matches!(empty, Err(JobError::InvalidRequest(_))));
    let oversized = jobs.start(BatchRequest::new("venezuelan", Gender::Male, 51));
    assert!(matches!(oversized, Err(JobError::InvalidRequest(_))));

    let mut unknown = BatchRequest::new("venezuelan", Gender::Male, 1);
    unknown
        .overrides
        .set_from_str("eye_color", "ultraviolet")
        .expect("known category");
    assert!(matches!(jobs.start(unknown), Err(JobError::InvalidRequest(_))));

    assert!(!jobs.is_running());
    assert_eq!(jobs.status().state, JobState::Idle);
}

#[test]
fn backend_failures_surface_in_status() -> Result<()> {
    let harness = IntegrationHarness::new();
    let jobs = controller(&harness, StubBackend::failing_on(&[0]));

    jobs.start(BatchRequest::new("venezuelan", Gender::Female, 2))?;
    let status = jobs.wait();
    assert_eq!(status.state, JobState::Completed);
    assert_eq!(status.completed, 1);
    assert_eq!(status.failed, 1);
    assert!(status
        .last_error
        .as_deref()
        .is_some_and(|err| err.contains("refused call 0")));
    Ok(())
}

#[test]
fn panicking_backend_fails_the_job_and_reopens_the_gate() -> Result<()> {
    let harness = IntegrationHarness::new();
    let jobs = controller(&harness, StubBackend::panicking_on(&[0]));

    jobs.start(BatchRequest::new("venezuelan", Gender::Male, 2))?;
    let status = jobs.wait();
    assert_eq!(status.state, JobState::Failed);
    assert!(!status.running);
    assert!(!jobs.is_running());
    assert!(status
        .last_error
        .as_deref()
        .is_some_and(|err| err.contains("panicked")));

    jobs.reset_history()?;
    jobs.start(BatchRequest::new("venezuelan", Gender::Male, 1))?;
    let retry = jobs.wait();
    assert_eq!(retry.state, JobState::Completed);
    assert_eq!(retry.completed, 1);
    Ok(())
}
