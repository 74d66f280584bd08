use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rustfft::num_complex::Complex as RustComplex;
use rustfft::FftPlanner as RustFftPlanner;
use skit::fft::{Complex32, FftPlan, FftPlanner};
use skit::fft_recursive;
use skit_bench::{measure, save_results, sizes_from_env, CountingAllocator};

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

fn bench_complex(c: &mut Criterion, size: usize) {
    let mut group = c.benchmark_group(format!("complex_{}", size));

    let input_re: Vec<f32> = (0..size).map(|i| i as f32).collect();
    let input_im = vec![0.0f32; size];
    let mut split = (input_re.clone(), input_im.clone());
    let reset = |(re, im): &mut (Vec<f32>, Vec<f32>)| {
        re.copy_from_slice(&input_re);
        im.copy_from_slice(&input_im);
    };

    // skit plan-based, plan reused across iterations
    let plan = FftPlan::<f32>::new(size).unwrap();
    let mut record = Some(("skit", "Complex", size, "Plan"));
    group.bench_function(BenchmarkId::new("skit/plan", size), |b| {
        b.iter_custom(|iters| {
            measure(&mut record, iters, &mut split, reset, |(re, im)| {
                plan.fft(re, im).unwrap()
            })
        });
    });

    // skit plan built per call, to show table construction cost
    let mut record = Some(("skit", "Complex", size, "PlanPerCall"));
    group.bench_function(BenchmarkId::new("skit/plan_per_call", size), |b| {
        b.iter_custom(|iters| {
            measure(&mut record, iters, &mut split, reset, |(re, im)| {
                FftPlan::<f32>::new(size).unwrap().fft(re, im).unwrap()
            })
        });
    });

    // skit planner cache hit
    let mut planner = FftPlanner::<f32>::new();
    let mut record = Some(("skit", "Complex", size, "Planner"));
    group.bench_function(BenchmarkId::new("skit/planner", size), |b| {
        b.iter_custom(|iters| {
            measure(&mut record, iters, &mut split, reset, |(re, im)| {
                planner.plan(size).unwrap().fft(re, im).unwrap()
            })
        });
    });

    // skit recursive out-of-place
    let input: Vec<Complex32> = (0..size).map(|i| Complex32::new(i as f32, 0.0)).collect();
    let mut output = vec![Complex32::zero(); size];
    let mut record = Some(("skit", "Complex", size, "Recursive"));
    group.bench_function(BenchmarkId::new("skit/recursive", size), |b| {
        b.iter_custom(|iters| {
            measure(&mut record, iters, &mut output, |_| {}, |out| {
                fft_recursive::fft(&input, out).unwrap()
            })
        });
    });

    // rustfft single-threaded
    let mut rust_planner = RustFftPlanner::<f32>::new();
    let rust_fft = rust_planner.plan_fft_forward(size);
    let rust_input: Vec<RustComplex<f32>> =
        (0..size).map(|i| RustComplex::new(i as f32, 0.0)).collect();
    let mut rust_data = rust_input.clone();
    let mut record = Some(("rustfft", "Complex", size, "Single"));
    group.bench_function(BenchmarkId::new("rustfft/single", size), |b| {
        b.iter_custom(|iters| {
            measure(
                &mut record,
                iters,
                &mut rust_data,
                |data| data.copy_from_slice(&rust_input),
                |data| rust_fft.process(data),
            )
        });
    });

    group.finish();
}

fn main_bench(c: &mut Criterion) {
    for size in sizes_from_env("SKIT_BENCH_POWERS", 6..=16) {
        bench_complex(c, size);
    }
    save_results();
}

criterion_group!(benches, main_bench);
criterion_main!(benches);
