//! Long running task simulation.
//!
//! Has no data dependency; it exists to exercise progress reporting. Work is
//! split into ten chunks per second, with a sleep per chunk so other tasks on the
//! runtime keep running between progress updates.

use crate::progress::{ProgressSink, ProgressTracker};
use serde::Serialize;
use std::time::Duration;

/// Chunks processed per simulated second.
pub const CHUNKS_PER_SECOND: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationSummary {
    pub status: String,
    pub duration: u64,
    pub chunks_processed: u64,
}

/// Sleep for `duration_seconds` in chunks, reporting progress after each chunk.
pub async fn simulate_long_running_task(
    duration_seconds: u64,
    progress: &dyn ProgressSink,
) -> SimulationSummary {
    progress.info(&format!("Starting {}-second simulation", duration_seconds));

    let chunks = duration_seconds.saturating_mul(CHUNKS_PER_SECOND).max(1);
    let chunk_duration = Duration::from_secs_f64(duration_seconds as f64 / chunks as f64);
    let mut tracker = ProgressTracker::new(progress, chunks);

    for i in 0..chunks {
        tokio::time::sleep(chunk_duration).await;
        tracker.advance_to(i + 1);

        if (i + 1) % 10 == 0 {
            let percentage = (i + 1) as f64 / chunks as f64 * 100.0;
            progress.info(&format!("Processing... {:.1}% complete", percentage));
        }
    }

    progress.info("Simulation completed successfully");
    SimulationSummary {
        status: "completed".to_string(),
        duration: duration_seconds,
        chunks_processed: chunks,
    }
}
