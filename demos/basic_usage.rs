//! Basic usage example for skit
//!
//! Plans an FFT, runs it forward and back, then searches a haystack with
//! every substring engine.

use skit::fft::FftPlanner;
use skit::memmem::{find_kmp_all, Algorithm, SkipTable, SubstringSearch};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== skit Basic Usage Example ===\n");

    // 1. FFT
    println!("1. Fast Fourier Transform (FFT)");
    let mut planner = FftPlanner::<f64>::new();
    let plan = planner.plan(8)?;

    let mut re: Vec<f64> = (1..=8).map(|v| v as f64).collect();
    let mut im = vec![0.0; 8];
    println!("   Input: {:?}", re);

    plan.fft(&mut re, &mut im)?;
    println!(
        "   FFT: {:?}",
        re.iter()
            .zip(&im)
            .map(|(r, i)| format!("{:.2}{:+.2}i", r, i))
            .collect::<Vec<_>>()
    );

    plan.ifft(&mut re, &mut im)?;
    println!("   IFFT: {:?}\n", re.iter().map(|r| format!("{:.2}", r)).collect::<Vec<_>>());

    // 2. Substring search
    println!("2. Substring search");
    let haystack = b"foobarbarfoobar";
    for algo in Algorithm::ALL {
        println!("   {:>8}: {:?}", algo, algo.find(haystack, b"bar")?);
    }
    let mut scratch = SkipTable::new();
    println!(
        "   horspool with scratch: {:?}",
        skit::memmem::find_bmh(haystack, b"foo", Some(&mut scratch))?
    );
    println!("   all matches: {:?}", find_kmp_all(haystack, b"bar")?);

    Ok(())
}
