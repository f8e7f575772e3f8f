//! Motion log format.
//!
//! A motion log records what an estimator reported for each frame, so a
//! stream can be re-stabilized without re-running feature tracking. It is
//! JSONL: one record per line, blank lines and `#` comments ignored.
//!
//! ```text
//! # captured from handheld-walk.mp4
//! {"frame":0,"status":"ok","dx":0.0,"dy":0.0,"da":0.0}
//! {"frame":1,"status":"affine","matrix":[[1.0,0.0,2.5],[0.0,1.0,-0.5]]}
//! {"frame":2,"status":"failed","reason":"no correspondence"}
//! ```

use serde::{Deserialize, Serialize};

use crate::affine::RigidAffine;
use crate::motion::MotionSample;

/// Frame index within a stream, starting at zero.
pub type FrameIndex = u64;

/// One line of a motion log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionRecord {
    /// Frame this estimate belongs to.
    pub frame: FrameIndex,

    /// What the estimator produced.
    #[serde(flatten)]
    pub outcome: MotionOutcome,
}

/// Estimator outcome for a single frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MotionOutcome {
    /// Decomposed rigid motion.
    Ok { dx: f64, dy: f64, da: f64 },

    /// Raw 2×3 matrix as returned by the estimator.
    Affine { matrix: [[f64; 3]; 2] },

    /// The estimator could not produce a transform.
    Failed { reason: String },
}

impl MotionRecord {
    pub fn ok(frame: FrameIndex, sample: MotionSample) -> Self {
        Self {
            frame,
            outcome: MotionOutcome::Ok {
                dx: sample.dx,
                dy: sample.dy,
                da: sample.da,
            },
        }
    }

    pub fn failed(frame: FrameIndex, reason: impl Into<String>) -> Self {
        Self {
            frame,
            outcome: MotionOutcome::Failed {
                reason: reason.into(),
            },
        }
    }
}

impl MotionOutcome {
    /// The motion sample, or `None` if estimation failed.
    pub fn sample(&self) -> Option<MotionSample> {
        match self {
            MotionOutcome::Ok { dx, dy, da } => Some(MotionSample::new(*dx, *dy, *da)),
            MotionOutcome::Affine { matrix } => Some(RigidAffine::from_rows(*matrix).decompose()),
            MotionOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, MotionOutcome::Failed { .. })
    }
}

/// Errors from reading a motion log.
#[derive(Debug, thiserror::Error)]
pub enum MotionLogError {
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: frame {frame} does not follow frame {previous}")]
    OutOfOrder {
        line: usize,
        frame: FrameIndex,
        previous: FrameIndex,
    },
}

/// Parse a motion log (one JSON object per line).
///
/// Frame indices must be strictly increasing.
pub fn parse_motion_log(jsonl: &str) -> Result<Vec<MotionRecord>, MotionLogError> {
    let mut records: Vec<MotionRecord> = Vec::new();
    for (idx, raw) in jsonl.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let record: MotionRecord = serde_json::from_str(line)
            .map_err(|source| MotionLogError::Parse { line: idx + 1, source })?;
        if let Some(previous) = records.last() {
            if record.frame <= previous.frame {
                return Err(MotionLogError::OutOfOrder {
                    line: idx + 1,
                    frame: record.frame,
                    previous: previous.frame,
                });
            }
        }
        records.push(record);
    }
    Ok(records)
}

/// Serialize records as JSONL, one per line.
pub fn write_motion_log(records: &[MotionRecord]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LOG: &str = r#"
# header comment
{"frame":0,"status":"ok","dx":1.0,"dy":-2.0,"da":0.01}

{"frame":1,"status":"affine","matrix":[[1.0,0.0,2.5],[0.0,1.0,-0.5]]}
{"frame":3,"status":"failed","reason":"no correspondence"}
"#;

    #[test]
    fn test_parse_all_record_kinds() {
        let records = parse_motion_log(SAMPLE_LOG).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0].outcome.sample(),
            Some(MotionSample::new(1.0, -2.0, 0.01))
        );
        assert_eq!(
            records[1].outcome.sample(),
            Some(MotionSample::new(2.5, -0.5, 0.0))
        );
        assert_eq!(records[2].frame, 3);
        assert!(records[2].outcome.is_failed());
        assert_eq!(records[2].outcome.sample(), None);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let log = "{\"frame\":0,\"status\":\"ok\",\"dx\":1.0,\"dy\":0.0,\"da\":0.0}\nnot json";
        let err = parse_motion_log(log).unwrap_err();
        assert!(matches!(err, MotionLogError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_rejects_repeated_frame() {
        let log = "{\"frame\":4,\"status\":\"failed\",\"reason\":\"x\"}\n{\"frame\":4,\"status\":\"failed\",\"reason\":\"y\"}";
        let err = parse_motion_log(log).unwrap_err();
        assert!(matches!(
            err,
            MotionLogError::OutOfOrder {
                frame: 4,
                previous: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_written_log_parses_back() {
        let records = vec![
            MotionRecord::ok(0, MotionSample::translation(0.5, 0.25)),
            MotionRecord::failed(1, "degenerate point set"),
        ];
        let text = write_motion_log(&records).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(parse_motion_log(&text).unwrap(), records);
    }
}
