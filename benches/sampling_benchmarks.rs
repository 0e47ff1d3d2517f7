use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use humtemp_logger::{
    Aggregator, Averages, LogRow, LoggerConfig, MemorySink, PinSpec, Reading, SampleWindow,
    ScriptedDriver, SensorFault, SensorHandle, Supervisor,
};

fn readings(count: usize) -> Vec<Reading> {
    (0..count)
        .map(|i| Reading::new(18.0 + (i % 7) as f64 * 0.3, 45.0 + (i % 11) as f64 * 0.5))
        .collect()
}

/// Benchmark filling and averaging one window
fn bench_window_average(c: &mut Criterion) {
    for samples in [10usize, 60, 600].iter() {
        let data = readings(*samples);
        c.bench_with_input(
            BenchmarkId::new("window_fill_and_average", samples),
            &data,
            |b, data| {
                let mut window = SampleWindow::with_capacity(data.len());
                b.iter(|| {
                    for reading in data {
                        window.append(*reading);
                    }
                    let averages = window.average();
                    window.clear();
                    averages
                })
            },
        );
    }
}

/// Benchmark CSV row formatting, with and without data
fn bench_row_formatting(c: &mut Criterion) {
    let at = NaiveDate::from_ymd_opt(2025, 5, 17)
        .expect("Should build date")
        .and_hms_opt(14, 30, 0)
        .expect("Should build time");

    c.bench_function("row_format_values", |b| {
        b.iter(|| LogRow::new("D4", at, Averages::new(21.37, 52.5)).to_csv_line())
    });

    c.bench_function("row_format_nan", |b| {
        b.iter(|| LogRow::new("D4", at, Averages::empty()).to_csv_line())
    });
}

/// Benchmark a full tick/flush cycle through one aggregator
fn bench_aggregator_cycle(c: &mut Criterion) {
    let spec: PinSpec = "4".parse().expect("Should parse pin");

    c.bench_function("aggregator_ten_ticks_and_flush", |b| {
        b.iter(|| {
            let outcomes = readings(10).into_iter().enumerate().map(|(i, reading)| {
                if i % 3 == 0 {
                    Err(SensorFault::Timeout { phase: "response" })
                } else {
                    Ok(reading)
                }
            });
            let sensor = SensorHandle::new(&spec, ScriptedDriver::new(outcomes));
            let mut aggregator = Aggregator::new(sensor, MemorySink::new());
            for _ in 0..10 {
                aggregator.tick();
            }
            aggregator.flush().expect("Should write row")
        })
    });
}

/// Benchmark a short supervisor run over several sensors
fn bench_supervisor_run(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Should create tokio runtime");

    for sensors in [1usize, 4, 8].iter() {
        let pins: Vec<String> = (0..*sensors).map(|pin| pin.to_string()).collect();
        let config = LoggerConfig::default()
            .with_pins(pins)
            .with_sample_interval_ms(0)
            .with_samples_per_cycle(5)
            .with_cycles(2);

        c.bench_with_input(
            BenchmarkId::new("supervisor_run", sensors),
            &config,
            |b, config| {
                b.to_async(&rt).iter(|| async move {
                    let assembly = Supervisor::from_config(
                        config,
                        |_| Ok(ScriptedDriver::new(readings(10).into_iter().map(Ok))),
                        |_| Ok(MemorySink::new()),
                    );
                    assembly
                        .supervisor
                        .run_until(std::future::pending())
                        .await
                })
            },
        );
    }
}

criterion_group!(
    benches,
    bench_window_average,
    bench_row_formatting,
    bench_aggregator_cycle,
    bench_supervisor_run
);
criterion_main!(benches);
