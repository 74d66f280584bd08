// Test intent: verifies plan, planner and search-table records reach the
// `log` facade when `verbose-logging` is enabled.
#![cfg(feature = "verbose-logging")]

use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use skit::fft::{FftPlan, FftPlanner};
use skit::memmem::{find_bmh, find_kmp};

/// Logger that keeps every formatted record.
struct Capture {
    lines: Mutex<Vec<(Level, String)>>,
}

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.lines
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture {
    lines: Mutex::new(Vec::new()),
};

#[test]
fn records_are_emitted() {
    log::set_logger(&CAPTURE).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let mut plan = FftPlan::<f64>::new(16).unwrap();
    plan.release();

    let mut planner = FftPlanner::<f32>::with_cache_limit(1);
    planner.plan(8).unwrap();
    planner.plan(8).unwrap();
    planner.plan(16).unwrap();

    find_bmh(b"foobarbarfoobar", b"bar", None).unwrap();
    find_kmp(b"foobarbarfoobar", b"bar").unwrap();

    let lines = CAPTURE.lines.lock().unwrap();
    let has = |level: Level, needle: &str| {
        lines
            .iter()
            .any(|(l, msg)| *l == level && msg.contains(needle))
    };
    assert!(has(Level::Debug, "built fft plan: n=16"));
    assert!(has(Level::Debug, "released fft plan: n=16"));
    assert!(has(Level::Trace, "fft planner hit: n=8"));
    assert!(has(Level::Debug, "cache full"));
    assert!(has(Level::Trace, "horspool"));
    assert!(has(Level::Trace, "kmp failure table"));
}
