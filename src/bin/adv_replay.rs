//! Capture replay utility
//! Feeds a capture file through the observer as if it came from a live scan,
//! and prints what the control loop sees on each channel

use pybricks_adv::formats::capture;
use pybricks_adv::observe::{
    run_control_loop, LatestValues, Observer, ObserverConfig, ScanOutcome, ScanReport,
};
use std::env;
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let format_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage: {} <capture.txt> [--config observer.json] [--interval-ms N]",
            args[0]
        );
        eprintln!("\nExample config:");
        eprintln!("  {{ \"channels\": [1, 2], \"queue_depth\": 16, \"max_age_ms\": 1000 }}");
        std::process::exit(1);
    }

    let capture_path = &args[1];
    let mut config = ObserverConfig::default();
    let mut interval = Duration::from_millis(10);

    let mut iter = args.iter().skip(2);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config needs a path"))?;
                config = ObserverConfig::load(path)?;
                tracing::info!("Loaded observer config from {}", path);
            }
            "--interval-ms" => {
                let ms = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--interval-ms needs a number"))?;
                interval = Duration::from_millis(ms.parse()?);
            }
            other => anyhow::bail!("Unknown argument: {}", other),
        }
    }

    let records = capture::load_capture(capture_path)?;
    tracing::info!("Replaying {} advertisement(s) from {}", records.len(), capture_path);

    let mut table = LatestValues::from_config(&config);
    let (observer, rx) = Observer::new(config);

    // Scan side: stands in for the BLE scan callback
    let scan = tokio::spawn(async move {
        let mut delivered = 0usize;
        for record in records {
            let report = ScanReport::new([0; 6], 0, record.data);
            match observer.on_scan_result(&report) {
                Ok(ScanOutcome::Delivered(_)) => delivered += 1,
                Ok(ScanOutcome::Ignored(reason)) => {
                    tracing::debug!("Line {} ignored: {:?}", record.line, reason);
                }
                Ok(ScanOutcome::Dropped(channel)) => {
                    tracing::warn!("Line {} dropped on channel {}", record.line, channel);
                }
                Err(e) => {
                    tracing::warn!("Stopping replay: {}", e);
                    break;
                }
            }
            tokio::time::sleep(interval).await;
        }
        delivered
    });

    // Control side: consumes values[0] per channel like the sample receivers
    let processed = run_control_loop(rx, &mut table, |channel, table| {
        let control = table
            .observe(channel, Instant::now())
            .and_then(|values| values.first());
        match control {
            Some(value) => println!("channel {:>3}: {}", channel, value),
            None => println!("channel {:>3}: <no values>", channel),
        }
    })
    .await;

    let delivered = scan.await?;
    tracing::info!("Delivered {}, processed {}", delivered, processed);

    println!("\n=== Latest values ===");
    let now = Instant::now();
    for channel in table.channels() {
        match table.observe(channel, now) {
            Some(values) => {
                let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                println!("channel {:>3}: [{}]", channel, rendered.join(", "));
            }
            None => println!("channel {:>3}: <stale>", channel),
        }
    }

    Ok(())
}
