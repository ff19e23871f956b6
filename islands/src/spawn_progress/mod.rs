//! Spawn chunk generation with progress reporting.
//!
//! During startup, generates the chunks around the spawn of every loaded
//! island until the area is `Full`. Generation runs on the blocking pool
//! while this task polls the chunk map and logs progress.
//!
//! Set `PREGEN_RADIUS` environment variable to generate a larger area (e.g., 32).

use std::sync::Arc;
use std::time::{Duration, Instant};

use islands_core::chunk::chunk_access::ChunkStatus;
use islands_core::islands::island_world::IslandWorld;
use islands_utils::{ChunkPos, SectionPos};
use tokio::time::sleep;

/// Spawn chunk radius of an island.
const SPAWN_RADIUS: i32 = 2;

/// Interval between progress lines.
const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Gets the pregeneration radius from environment variable, or returns default spawn radius.
fn get_pregen_radius() -> i32 {
    use std::env;
    env::var("PREGEN_RADIUS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(SPAWN_RADIUS)
}

/// Brings the square around the world spawn to `Full`.
///
/// # Errors
/// Returns an error if generation fails or the blocking task panics.
pub async fn generate_spawn_chunks(world: &Arc<IslandWorld>) -> anyhow::Result<()> {
    let radius = get_pregen_radius();
    let spawn_pos = world.spawn_pos();
    let center_chunk = ChunkPos::new(
        SectionPos::block_to_section_coord(spawn_pos.0.x),
        SectionPos::block_to_section_coord(spawn_pos.0.z),
    );
    let total_chunks = ((radius * 2 + 1) * (radius * 2 + 1)) as usize;

    log::info!(
        "Preparing spawn area of {}: {} chunks (radius {}) around chunk {}",
        world.key(),
        total_chunks,
        radius,
        center_chunk,
    );

    let start = Instant::now();
    let task = tokio::task::spawn_blocking({
        let world = Arc::clone(world);
        move || {
            world
                .chunk_map()
                .generate_area(center_chunk, radius, ChunkStatus::Full)
        }
    });

    let mut last_report = Instant::now();
    let mut last_completed = 0usize;
    while !task.is_finished() {
        if last_report.elapsed() >= REPORT_INTERVAL {
            let completed = world
                .chunk_map()
                .count_at_least(center_chunk, radius, ChunkStatus::Full);
            let chunks_per_sec =
                completed.saturating_sub(last_completed) as f64 / REPORT_INTERVAL.as_secs_f64();
            let percent = (completed as f64 / total_chunks as f64) * 100.0;
            let eta = if chunks_per_sec > 0.0 {
                (total_chunks - completed) as f64 / chunks_per_sec
            } else {
                0.0
            };
            log::info!(
                "Progress: {completed}/{total_chunks} ({percent:.1}%), {chunks_per_sec:.1} chunks/s, ETA: {eta:.0}s",
            );
            last_report = Instant::now();
            last_completed = completed;
        }
        sleep(Duration::from_millis(10)).await;
    }
    task.await??;

    let elapsed = start.elapsed();
    log::info!(
        "Spawn area prepared: {} chunks in {:.2}s ({:.1} chunks/s)",
        total_chunks,
        elapsed.as_secs_f64(),
        total_chunks as f64 / elapsed.as_secs_f64(),
    );
    Ok(())
}
