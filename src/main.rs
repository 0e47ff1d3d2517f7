//! humtemp_logger - DHT22 Temperature/Humidity Logger Binary
//!
//! Samples the given GPIO pins and appends averaged rows to one CSV file per
//! sensor.

use anyhow::Context;
use clap::Parser;
use humtemp_logger::{
    CsvFileSink, DefaultSensorDriver, LoggerConfig, RunSummary, Supervisor, DEFAULT_LOG_PREFIX,
    DEFAULT_PIN,
};
use tracing::{info, Level};
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "humtemp_logger")]
#[command(about = "Log averaged DHT22 temperature and humidity readings to CSV files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(override_usage = "humtemp_logger [datafile_prefix [pin numbers...]]")]
#[command(after_help = "example:  humtemp_logger beehive_1 4 17\n\
                        A pin may carry its own device id:  humtemp_logger beehive_1 4:north 17:south")]
struct Cli {
    /// Prefix of the log files, `{prefix}_{device id}.csv`
    prefix: Option<String>,

    /// GPIO pins (0-27) with DHT22 sensors, optionally `PIN:DEVICE_ID`
    #[arg(allow_negative_numbers = true)]
    pins: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging
    init_logging(&cli)?;

    let config = build_config(&cli);
    let assembly = Supervisor::from_config(&config, DefaultSensorDriver::connect, CsvFileSink::open);

    for skipped in &assembly.skipped {
        println!("{}", skipped.error);
        println!("skipping pin #{}", skipped.argument);
    }

    let supervisor = assembly.supervisor;
    if supervisor.is_empty() {
        println!("no sensors could be started, nothing to log");
        return Ok(());
    }

    info!("Starting {} sensor(s)", supervisor.len());
    let summary = supervisor.run().await;
    report(&summary);

    if summary.write_failures > 0 {
        anyhow::bail!(
            "{} of {} rows could not be written",
            summary.write_failures,
            summary.write_failures + summary.rows_written
        );
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let filter = log_filter(log_level(cli), std::env::var(EnvFilter::DEFAULT_ENV).ok());

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install the log subscriber")?;

    Ok(())
}

fn log_level(cli: &Cli) -> Level {
    if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    }
}

/// `RUST_LOG` directives when set, otherwise everything at `level` and above.
fn log_filter(level: Level, directives: Option<String>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy(directives.unwrap_or_default())
}

/// Turn the command line into a run configuration, announcing defaults.
fn build_config(cli: &Cli) -> LoggerConfig {
    let prefix = match &cli.prefix {
        Some(prefix) => prefix.clone(),
        None => {
            println!(
                "no data file specified, using default value:  {}",
                DEFAULT_LOG_PREFIX
            );
            DEFAULT_LOG_PREFIX.to_string()
        }
    };

    let config = LoggerConfig::new(prefix, cli.pins.clone());
    if config.uses_default_pin() {
        println!(
            "no gpio data pins specified, using default value:  {}",
            DEFAULT_PIN
        );
    }

    config
}

fn report(summary: &RunSummary) {
    if summary.interrupted {
        println!(
            "stopped early after {} complete cycle(s)",
            summary.cycles_completed
        );
    }
    println!(
        "logged {} row(s) from {} sensor(s); {} of {} samples missed",
        summary.rows_written, summary.sensors, summary.missed_samples, summary.ticks
    );
}
