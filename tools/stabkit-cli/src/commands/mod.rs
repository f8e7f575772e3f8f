pub mod info;
pub mod init_config;
pub mod run;

use std::path::Path;

use anyhow::Context;
use stabkit_motion_model::{parse_motion_log, MotionRecord};

/// Read and parse a motion log from disk.
pub fn load_motion_log(path: &Path) -> anyhow::Result<Vec<MotionRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Motion log not found: {}", path.display()))?;
    parse_motion_log(&content)
        .with_context(|| format!("Failed to parse motion log {}", path.display()))
}
