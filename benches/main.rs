use criterion::{black_box, criterion_group, criterion_main, Criterion};
use micro_tone::akf::{akf_at_lag, amdf_at_lag, AkfMethod, AnalyzerOptions, TableConfig, ToneAnalyzer, ToneTables};

fn sine(frequency: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| 0.5 * (2.0 * core::f32::consts::PI * frequency * (i as f32) / 44100.0).sin())
        .collect()
}

fn run_analyzer_benchmark(id: &str, c: &mut Criterion, method: AkfMethod, step: usize) {
    let options = AnalyzerOptions {
        akf_method: method,
        ..AnalyzerOptions::with_step(step)
    };
    let mut analyzer = ToneAnalyzer::from_options(&TableConfig::default(), options).unwrap();
    let chunk = sine(220.0, step);
    analyzer.input(&sine(220.0, 2048));

    c.bench_function(id, |b| {
        b.iter(|| {
            analyzer.input(black_box(&chunk[..]));
            black_box(analyzer.get_note().tone);
        })
    });
}

fn analyzer_benchmarks(c: &mut Criterion) {
    run_analyzer_benchmark("Direct AKF, step 1024", c, AkfMethod::Direct, 1024);
    run_analyzer_benchmark("FFT AKF, step 1024", c, AkfMethod::Fft, 1024);
    run_analyzer_benchmark("Direct AKF, step 256", c, AkfMethod::Direct, 256);
    run_analyzer_benchmark("FFT AKF, step 256", c, AkfMethod::Fft, 256);
}

fn lag_benchmarks(c: &mut Criterion) {
    let frame = sine(440.0, 2048);
    c.bench_function("AKF at fractional lag", |b| {
        b.iter(|| akf_at_lag(black_box(&frame), black_box(100.25)))
    });
    c.bench_function("AMDF at fractional lag", |b| {
        b.iter(|| amdf_at_lag(black_box(&frame), black_box(100.25)))
    });
}

fn table_benchmarks(c: &mut Criterion) {
    c.bench_function("Build default tables", |b| {
        b.iter(|| ToneTables::build(black_box(TableConfig::default())).unwrap())
    });
}

criterion_group!(benches, analyzer_benchmarks, lag_benchmarks, table_benchmarks);
criterion_main!(benches);
