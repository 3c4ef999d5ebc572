use std::time::Duration;

use render_pulse::profiler::{ChannelSink, Phase, Profiler, Sample};
use render_pulse::ProfilerConfig;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const FRAME_MS: u64 = 100;
const DEMO_TICKS: u64 = 3;

/// Render cost of the three demo components on a given frame.
fn simulated_renders(frame: u64) -> Vec<Sample> {
    let phase = if frame == 0 { Phase::Mount } else { Phase::Update };
    let at = (frame * FRAME_MS) as f64;
    let jitter = (frame % 7) as f64;

    let mut renders = vec![
        // Updates itself every frame; cheap but constant churn.
        Sample::new("FrequentUpdater", phase, 2.0 + jitter * 0.3, 2.5).with_timing(at, at + 3.0),
    ];
    // Heavy, unmemoized work re-run on every parent render.
    if frame % 2 == 0 {
        renders.push(
            Sample::new("ExpensiveComponent", phase, 18.0 + jitter * 2.0, 36.0)
                .with_timing(at, at + 25.0),
        );
    }
    // Same work behind a memo: only the first render pays for it.
    let optimized = if frame == 0 { 18.0 } else { 0.4 };
    renders.push(
        Sample::new("OptimizedExpensiveComponent", phase, optimized, 18.0).with_timing(at, at + 1.0),
    );
    renders
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ProfilerConfig::from_env()?;
    tracing::info!("render_pulse demo: {:?}", config);

    let (report_tx, mut report_rx) = mpsc::channel(8);
    let mut profiler = Profiler::new(config);
    profiler.on_report(ChannelSink::new(report_tx));
    let (handle, driver) = profiler.spawn();

    let printer = tokio::spawn(async move {
        while let Some(batch) = report_rx.recv().await {
            for report in &batch {
                let flag = if report.exceeds(config.threshold_ms) { "SLOW" } else { "ok" };
                println!(
                    "[{}] {} avg {:.2}ms over {} renders",
                    flag, report.key, report.average_duration, report.sample_count
                );
            }
            match serde_json::to_string_pretty(&batch) {
                Ok(json) => println!("{}", json),
                Err(e) => tracing::warn!("could not serialize report batch: {}", e),
            }
        }
    });

    let mut cadence = tokio::time::interval(Duration::from_millis(FRAME_MS));
    cadence.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let frames = DEMO_TICKS * config.report_interval_ms / FRAME_MS + 1;

    for frame in 0..frames {
        cadence.tick().await;
        for sample in simulated_renders(frame) {
            handle.on_render(sample);
        }
    }

    handle.stop();
    drop(handle);
    let profiler = driver.await?;
    drop(profiler);
    printer.await?;

    tracing::info!("render_pulse demo finished");
    Ok(())
}
