//! Replay a motion log through the stabilizer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use stabkit_common::StabilizationDefaults;
use stabkit_core::{FramePipeline, ReplayEstimator, SizedFrame};
use stabkit_motion_model::{Axis, FrameSize, Trajectory};

use super::load_motion_log;

pub fn run(
    log: PathBuf,
    output: Option<PathBuf>,
    width: u32,
    height: u32,
    stabilization: &StabilizationDefaults,
) -> anyhow::Result<()> {
    let records = load_motion_log(&log)?;
    let frame_count = records.last().map(|r| r.frame + 1).unwrap_or(0);

    let mut pipeline = FramePipeline::from_config(stabilization, ReplayEstimator::new(records))
        .map_err(|e| anyhow::anyhow!("Invalid stabilization settings: {e}"))?;

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|e| {
            anyhow::anyhow!("Failed to create {}: {e}", path.display())
        })?)),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };

    tracing::info!(
        log = %log.display(),
        frames = frame_count,
        width,
        height,
        "Replaying motion log"
    );

    let frame = SizedFrame(FrameSize::new(width, height));
    let mut raw = Vec::with_capacity(frame_count as usize);
    let mut smoothed = Vec::with_capacity(frame_count as usize);

    for _ in 0..frame_count {
        let plan = pipeline.process(frame)?;
        serde_json::to_writer(&mut writer, &plan.report)?;
        writer.write_all(b"\n")?;
        raw.push(plan.report.trajectory);
        smoothed.push(plan.report.smoothed);
    }
    writer.flush()?;
    drop(writer);

    let stats = pipeline.session().stats();
    let mut summary = vec![
        format!("Stabilized {} frames from {}", stats.frames, log.display()),
        format!("  Fallback frames: {}", stats.fallbacks),
    ];
    if let Some(crop) = pipeline.crop() {
        summary.push(format!(
            "  Crop window: [{}, {}) x [{}, {})",
            crop.left, crop.right, crop.top, crop.bottom
        ));
    }
    for axis in Axis::ALL {
        if let (Some(r), Some(s)) = (jitter_rms(&raw, axis), jitter_rms(&smoothed, axis)) {
            summary.push(format!(
                "  Jitter {}: raw {r:.4} -> smoothed {s:.4}",
                axis.name()
            ));
        }
    }
    if let Some(path) = &output {
        summary.push(format!("  Reports written to: {}", path.display()));
    }

    // Reports may be on stdout; keep the summary off it.
    for line in summary {
        if output.is_some() {
            println!("{line}");
        } else {
            eprintln!("{line}");
        }
    }

    Ok(())
}

/// RMS of the second difference of one trajectory axis.
fn jitter_rms(path: &[Trajectory], axis: Axis) -> Option<f64> {
    if path.len() < 3 {
        return None;
    }
    let sum: f64 = path
        .windows(3)
        .map(|w| w[2].component(axis) - 2.0 * w[1].component(axis) + w[0].component(axis))
        .map(|d| d * d)
        .sum();
    Some((sum / (path.len() - 2) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_of_straight_line_is_zero() {
        let path: Vec<Trajectory> = (0..10)
            .map(|i| Trajectory::new(2.0 * i as f64, 0.0, 0.0))
            .collect();
        assert_eq!(jitter_rms(&path, Axis::X), Some(0.0));
        assert_eq!(jitter_rms(&path[..2], Axis::X), None);
    }

    #[test]
    fn test_jitter_of_zigzag() {
        let path: Vec<Trajectory> = [0.0, 1.0, 0.0, 1.0]
            .iter()
            .map(|&x| Trajectory::new(x, 0.0, 0.0))
            .collect();
        // Second differences are -2 and +2.
        assert_eq!(jitter_rms(&path, Axis::X), Some(2.0));
    }
}
