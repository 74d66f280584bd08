//! Demonstrates enabling verbose logging for skit.
use skit::fft::FftPlanner;
use skit::memmem::{find_bmh, find_kmp_all};

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .init();

    let mut planner = FftPlanner::<f32>::with_cache_limit(2);
    for n in [8, 8, 16, 32] {
        let plan = planner.plan(n).unwrap();
        let mut re = vec![1.0; n];
        let mut im = vec![0.0; n];
        plan.fft(&mut re, &mut im).unwrap();
    }

    find_bmh(b"foobarbarfoobar", b"bar", None).unwrap();
    find_kmp_all(b"foobarbarfoobar", b"bar").unwrap();
}
