//! Show motion log statistics.

use std::path::PathBuf;

use stabkit_core::accumulator::accumulate;
use stabkit_motion_model::{MotionOutcome, Trajectory};

use super::load_motion_log;

pub fn run(log: PathBuf) -> anyhow::Result<()> {
    let records = load_motion_log(&log)?;

    println!("Motion log: {}", log.display());
    if records.is_empty() {
        println!("  No records.");
        return Ok(());
    }

    let span = records.last().map(|r| r.frame + 1).unwrap_or(0);
    let failed = records.iter().filter(|r| r.outcome.is_failed()).count();
    let matrices = records
        .iter()
        .filter(|r| matches!(r.outcome, MotionOutcome::Affine { .. }))
        .count();

    // Raw path as if every failed or missing frame had no motion.
    let mut trajectory = Trajectory::ORIGIN;
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
    for sample in records.iter().filter_map(|r| r.outcome.sample()) {
        trajectory = accumulate(trajectory, sample);
        min_x = min_x.min(trajectory.x);
        max_x = max_x.max(trajectory.x);
        min_y = min_y.min(trajectory.y);
        max_y = max_y.max(trajectory.y);
    }

    println!("  Frames: {span}");
    println!("  Records: {}", records.len());
    println!("  Missing frames: {}", span as usize - records.len());
    println!("  Failed estimates: {failed}");
    println!("  Matrix records: {matrices}");
    println!();
    println!("Raw path:");
    println!("  x: [{min_x:.2}, {max_x:.2}] px");
    println!("  y: [{min_y:.2}, {max_y:.2}] px");
    println!(
        "  End pose: ({:.2}, {:.2}) px, {:.3} deg",
        trajectory.x,
        trajectory.y,
        trajectory.a.to_degrees()
    );

    Ok(())
}
