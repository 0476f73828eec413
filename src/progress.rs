// src/progress.rs
use crate::runner::RunOutcome;

/// Stage reporting for a run. Frontends implement this to surface status to
/// whoever is watching (console, scheduler logs, tests).
pub trait Progress {
    /// Called once, before the page is fetched.
    fn begin(&mut self, _url: &str) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called at the end of a run that did not fail.
    fn finish(&mut self, _outcome: &RunOutcome) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Collects every line; handy in tests.
#[derive(Default)]
pub struct RecordingProgress {
    pub lines: Vec<String>,
}

impl Progress for RecordingProgress {
    fn begin(&mut self, url: &str) {
        self.lines.push(format!("begin {url}"));
    }

    fn log(&mut self, msg: &str) {
        self.lines.push(s!(msg));
    }
}
