//! Test-failure reporting.
//!
//! The lifecycle engine returns discriminated errors; this module is the
//! outer layer that turns them into test failures. A [`Reporter`] receives
//! either a soft failure or a hard-stop failure depending on the
//! fatal-on-mismatch flag, and is queried for "already failed" first so a
//! compare is skipped entirely once the surrounding test has failed.

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::config;
use crate::errors::SnapshotError;
use crate::snapshotter::Snapshotter;
use crate::value::ValueSet;

/// The subset of a test harness the snapshot engine reports through.
pub trait Reporter {
    /// True once the surrounding test has already failed.
    fn already_failed(&self) -> bool;
    /// Record a failure and keep running.
    fn soft_fail(&mut self, message: &str);
    /// Record a failure and stop the surrounding test.
    fn hard_fail(&mut self, message: &str);
}

impl Snapshotter {
    /// Runs a compare and routes any failure through the reporter.
    ///
    /// Skipped entirely when the reporter says the test has already failed.
    /// The fatal-on-mismatch flag selects [`Reporter::hard_fail`] over
    /// [`Reporter::soft_fail`].
    pub fn report_with<R, T>(&self, reporter: &mut R, slot: &str, value: &T)
    where
        R: Reporter,
        T: Serialize + ?Sized,
    {
        // skipped before value capture: a failed test reports nothing more,
        // not even a serialization failure
        if reporter.already_failed() {
            return;
        }
        let values = match ValueSet::of(value) {
            Ok(values) => values,
            Err(e) => return self.deliver(reporter, &e),
        };
        self.report_set_with(reporter, slot, &values);
    }

    /// [`Self::report_with`] for a pre-collected value set.
    pub fn report_set_with<R: Reporter>(&self, reporter: &mut R, slot: &str, values: &ValueSet) {
        if reporter.already_failed() {
            return;
        }
        if let Err(e) = self.compare_set(slot, values) {
            self.deliver(reporter, &e);
        }
    }

    fn deliver<R: Reporter>(&self, reporter: &mut R, error: &SnapshotError) {
        let message = error.to_string();
        if self.config().is_fatal_on_mismatch() {
            reporter.hard_fail(&message);
        } else {
            reporter.soft_fail(&message);
        }
    }

    /// Runs a compare and panics on any failure, printing a colored diff to
    /// stderr first. The panic stands in for a hard test failure in plain
    /// Rust tests.
    pub fn assert<T: Serialize + ?Sized>(&self, slot: &str, value: &T) {
        if let Err(e) = self.compare(slot, value) {
            print_failure(&e);
            panic!("snapshot assertion failed: {e}");
        }
    }

    /// [`Self::assert`] for a pre-collected value set.
    pub fn assert_set(&self, slot: &str, values: &ValueSet) {
        if let Err(e) = self.compare_set(slot, values) {
            print_failure(&e);
            panic!("snapshot assertion failed: {e}");
        }
    }
}

/// Asserts a single value through the process-wide default config.
pub fn assert<T: Serialize + ?Sized>(slot: &str, value: &T) {
    Snapshotter::with_config(config::global()).assert(slot, value);
}

/// Prints a snapshot failure to stderr, colorizing any diff it carries
/// (removals red, additions green).
pub fn print_failure(error: &SnapshotError) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let rendered = error.to_string();
    for line in rendered.lines() {
        let color = match line.as_bytes().first().copied() {
            Some(b'-') => Some(Color::Red),
            Some(b'+') => Some(Color::Green),
            _ => None,
        };
        match color {
            Some(color) => {
                let _ = stderr.set_color(ColorSpec::new().set_fg(Some(color)));
                eprintln!("{}", line);
                let _ = stderr.reset();
            }
            None => eprintln!("{}", line),
        }
    }
}
