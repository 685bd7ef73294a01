use anyhow::{bail, Result};
use diversitybase::generation::{ImageBackend, ImageRequest};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nstub";

/// In-process image backend that records prompts and can fail chosen calls.
#[derive(Default)]
pub struct StubBackend {
    calls: AtomicUsize,
    fail_calls: HashSet<usize>,
    panic_calls: HashSet<usize>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the given zero-based calls.
    pub fn failing_on(calls: &[usize]) -> Self {
        Self {
            fail_calls: calls.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Panics on the given zero-based calls.
    pub fn panicking_on(calls: &[usize]) -> Self {
        Self {
            panic_calls: calls.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ImageBackend for StubBackend {
    fn generate(&self, request: &ImageRequest) -> Result<Vec<u8>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        self.prompts.lock().unwrap().push(request.prompt.clone());
        if self.panic_calls.contains(&call) {
            panic!("stub backend crashed on call {call}");
        }
        if self.fail_calls.contains(&call) {
            bail!("stub backend refused call {call}");
        }
        Ok(FAKE_PNG.to_vec())
    }

    fn current_model(&self) -> String {
        "stub-model v1".to_string()
    }
}
