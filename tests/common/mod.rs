//! Shared helpers for the integration tests: an isolated snapshot directory
//! per test, plus a recording reporter.
#![allow(dead_code)] // each test binary uses a different subset

use std::fs;
use std::path::PathBuf;

use snapfile::Config;
use tempfile::TempDir;

/// One isolated snapshot store rooted in a temporary directory.
pub struct SnapshotSpace {
    dir: TempDir,
}

impl SnapshotSpace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir for snapshots"),
        }
    }

    /// A config whose subdirectory lives inside this space, with the update
    /// predicate pinned so tests never depend on the real environment.
    pub fn config(&self) -> Config {
        Config::new()
            .subdirectory(self.subdirectory().to_string_lossy().into_owned())
            .should_update(|| false)
    }

    pub fn subdirectory(&self) -> PathBuf {
        self.dir.path().join(".snapshots")
    }

    pub fn slot_file(&self, slot: &str) -> PathBuf {
        self.subdirectory().join(slot)
    }

    pub fn read_slot(&self, slot: &str) -> String {
        fs::read_to_string(self.slot_file(slot)).expect("snapshot file should exist")
    }

    pub fn write_slot(&self, slot: &str, contents: &str) {
        fs::create_dir_all(self.subdirectory()).expect("create snapshot subdirectory");
        fs::write(self.slot_file(slot), contents).expect("write snapshot file");
    }
}

/// Reporter that records every failure routed through it.
#[derive(Default)]
pub struct RecordingReporter {
    pub failed: bool,
    pub soft: Vec<String>,
    pub hard: Vec<String>,
}

impl snapfile::Reporter for RecordingReporter {
    fn already_failed(&self) -> bool {
        self.failed
    }

    fn soft_fail(&mut self, message: &str) {
        self.soft.push(message.to_string());
    }

    fn hard_fail(&mut self, message: &str) {
        self.hard.push(message.to_string());
    }
}
