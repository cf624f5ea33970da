use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use habit_voice::extraction::ExtractionPipeline;
use habit_voice::recorder::{ActivityRecorder, InMemoryLog, RecordOutcome};
use habit_voice::session::{TranscriptAccumulator, TranscriptPiece};
use habit_voice::{config, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::Config::load()?;
    println!("✓ Config loaded from ~/.habit-voice.toml");

    telemetry::init(config.telemetry.enabled, &config.telemetry.log_path)?;
    tracing::info!("habit-voice starting");

    let registry = config.registry();
    let pipeline = ExtractionPipeline::new();
    let mut recorder = ActivityRecorder::new(InMemoryLog::new());
    let mut session = TranscriptAccumulator::new();

    println!(
        "✓ Tracking {} activities ({} active)",
        registry.entries().len(),
        registry.active().count()
    );
    println!("\nSpeak by typing one sentence per line. Press Ctrl+D or Ctrl+C to exit.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown signal received");
                break;
            }
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            tracing::info!("input closed");
            break;
        };

        // each typed line is one utterance: it starts as interim speech and then finalizes
        session.apply(&[TranscriptPiece::Interim(line.clone())]);
        let update = session.apply(&[TranscriptPiece::Final(line)]);
        let Some(segment) = update.finalized else {
            continue;
        };

        let Some(result) = pipeline.extract(&segment, &registry) else {
            println!("  (no activity detected)");
            continue;
        };

        match recorder.record(result, &registry)? {
            RecordOutcome::Logged(entry) => {
                let activity = &entry.activity;
                println!(
                    "✓ #{} {} {} {}",
                    entry.id,
                    activity.name,
                    activity.quantity.as_deref().unwrap_or("-"),
                    activity.unit.as_deref().unwrap_or("")
                );
            }
            RecordOutcome::Rejected { normalized, .. } => {
                println!("  ({normalized} is not a tracked activity)");
            }
            RecordOutcome::Unchanged => {}
        }
    }

    println!(
        "\nShutting down, {} activities logged this session.",
        recorder.store().entries().len()
    );
    Ok(())
}
