//! Shared plumbing for the skit benchmarks: allocation tracking and the
//! `benchmarks/latest.json` results file.

use std::alloc::{GlobalAlloc, Layout, System};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use std::{env, fs, process::Command};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub const RESULTS_PATH: &str = "../benchmarks/latest.json";
pub const PREVIOUS_PATH: &str = "../benchmarks/previous.json";

// ---------------- Allocation tracking ----------------

/// Allocator wrapper counting allocations and peak live bytes. Each bench
/// binary installs it with `#[global_allocator]`.
pub struct CountingAllocator;

static ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);
static CURRENT_BYTES: AtomicUsize = AtomicUsize::new(0);
static PEAK_BYTES: AtomicUsize = AtomicUsize::new(0);

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
            let new = CURRENT_BYTES.fetch_add(layout.size(), Ordering::Relaxed) + layout.size();
            update_peak(new);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        CURRENT_BYTES.fetch_sub(layout.size(), Ordering::Relaxed);
    }
}

fn update_peak(new: usize) {
    let mut peak = PEAK_BYTES.load(Ordering::Relaxed);
    while new > peak {
        match PEAK_BYTES.compare_exchange(peak, new, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => break,
            Err(old) => peak = old,
        }
    }
}

pub fn reset_alloc() {
    ALLOCATIONS.store(0, Ordering::Relaxed);
    CURRENT_BYTES.store(0, Ordering::Relaxed);
    PEAK_BYTES.store(0, Ordering::Relaxed);
}

/// `(allocations, peak_bytes)` since the last [`reset_alloc`].
pub fn alloc_stats() -> (usize, usize) {
    (
        ALLOCATIONS.load(Ordering::Relaxed),
        PEAK_BYTES.load(Ordering::Relaxed),
    )
}

// ---------------- Result tracking ----------------

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BenchRecord {
    pub library: String,
    pub workload: String,
    pub size: usize,
    pub mode: String,
    pub time_per_op_ns: f64,
    pub ops_per_sec: f64,
    pub allocations: usize,
    pub peak_bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub prev_time_per_op_ns: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub change_vs_prev: Option<f64>,
    #[serde(default)]
    pub best: bool,
}

impl BenchRecord {
    fn key(&self) -> (String, String, usize, String) {
        (
            self.library.clone(),
            self.workload.clone(),
            self.size,
            self.mode.clone(),
        )
    }
}

#[derive(Serialize, Deserialize)]
pub struct BenchFile {
    pub env: EnvInfo,
    pub results: Vec<BenchRecord>,
}

#[derive(Serialize, Deserialize)]
pub struct EnvInfo {
    pub cpu: String,
    pub os: String,
    pub rustc: String,
    pub flags: String,
    pub date: String,
    pub runner: String,
}

static RESULTS: Lazy<Mutex<Vec<BenchRecord>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Time `iters` runs of `op` over `data`, resetting the allocation
/// counters before each one. `setup` runs outside the timed region.
///
/// When `record` is `Some` it is taken and one [`BenchRecord`] is stored,
/// so only the first sample of each benchmark lands in the results file.
pub fn measure<D, S, F>(
    record: &mut Option<(&str, &str, usize, &str)>,
    iters: u64,
    data: &mut D,
    mut setup: S,
    mut op: F,
) -> Duration
where
    S: FnMut(&mut D),
    F: FnMut(&mut D),
{
    let mut total = Duration::ZERO;
    let mut alloc_total = 0;
    let mut peak = 0;
    for _ in 0..iters {
        setup(data);
        reset_alloc();
        let start = Instant::now();
        op(data);
        let dur = start.elapsed();
        let (a, p) = alloc_stats();
        alloc_total += a;
        peak = peak.max(p);
        total += dur;
    }
    if let Some((library, workload, size, mode)) = record.take() {
        let t = total.as_secs_f64() / iters.max(1) as f64;
        RESULTS.lock().unwrap().push(BenchRecord {
            library: library.into(),
            workload: workload.into(),
            size,
            mode: mode.into(),
            time_per_op_ns: t * 1e9,
            ops_per_sec: if t > 0.0 { 1.0 / t } else { 0.0 },
            allocations: alloc_total / iters.max(1) as usize,
            peak_bytes: peak,
            prev_time_per_op_ns: None,
            change_vs_prev: None,
            best: false,
        });
    }
    total
}

fn command_output(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Compare against the previous run, flag the fastest entry per
/// `(workload, size)` and sort for display.
pub fn annotate(results: &mut [BenchRecord], previous: &[BenchRecord]) {
    let prev_map: HashMap<_, _> = previous
        .iter()
        .map(|r| (r.key(), r.time_per_op_ns))
        .collect();
    for r in results.iter_mut() {
        if let Some(&prev_time) = prev_map.get(&r.key()) {
            r.prev_time_per_op_ns = Some(prev_time);
            r.change_vs_prev = Some((prev_time - r.time_per_op_ns) / prev_time * 100.0);
        }
    }

    let mut best_map: HashMap<(String, usize), f64> = HashMap::new();
    for r in results.iter() {
        let entry = best_map
            .entry((r.workload.clone(), r.size))
            .or_insert(r.time_per_op_ns);
        if r.time_per_op_ns < *entry {
            *entry = r.time_per_op_ns;
        }
    }
    for r in results.iter_mut() {
        if let Some(best) = best_map.get(&(r.workload.clone(), r.size)) {
            r.best = (r.time_per_op_ns - *best).abs() < f64::EPSILON;
        }
    }

    results.sort_by(|a, b| {
        a.workload
            .cmp(&b.workload)
            .then_with(|| a.size.cmp(&b.size))
            .then_with(|| a.time_per_op_ns.total_cmp(&b.time_per_op_ns))
    });
}

/// Merge this run's records into `benchmarks/latest.json`, keeping entries
/// from other bench binaries and moving the old file to `previous.json`.
pub fn save_results() {
    let prev = fs::read(RESULTS_PATH)
        .ok()
        .and_then(|d| serde_json::from_slice::<BenchFile>(&d).ok());
    let fresh = RESULTS.lock().unwrap().clone();
    if fresh.is_empty() {
        return;
    }

    let previous = prev.map(|p| p.results).unwrap_or_default();
    let mut results: Vec<BenchRecord> = previous
        .iter()
        .filter(|old| !fresh.iter().any(|new| new.key() == old.key()))
        .cloned()
        .collect();
    results.extend(fresh);
    annotate(&mut results, &previous);

    let file = BenchFile {
        env: EnvInfo {
            cpu: command_output(
                "sh",
                &["-c", "grep 'model name' /proc/cpuinfo | head -n1 | cut -d: -f2"],
            ),
            os: command_output("uname", &["-srmo"]),
            rustc: command_output("rustc", &["--version"]),
            flags: env::var("RUSTFLAGS").unwrap_or_default(),
            date: chrono::Utc::now().to_rfc3339(),
            runner: env::var("RUNNER_NAME").unwrap_or_else(|_| "local".to_string()),
        },
        results,
    };
    let json = serde_json::to_string_pretty(&file).unwrap();
    fs::create_dir_all("../benchmarks").unwrap();
    if !previous.is_empty() {
        let _ = fs::rename(RESULTS_PATH, PREVIOUS_PATH);
    }
    fs::write(RESULTS_PATH, json).unwrap();
}

/// Sizes selected by `var` as comma-separated powers of two, or `default`.
pub fn sizes_from_env(var: &str, default: std::ops::RangeInclusive<u32>) -> Vec<usize> {
    env::var(var)
        .ok()
        .map(|s| {
            s.split(',')
                .filter_map(|p| p.trim().parse::<u32>().ok())
                .map(|p| 1usize << p)
                .collect()
        })
        .unwrap_or_else(|| default.map(|p| 1usize << p).collect())
}
