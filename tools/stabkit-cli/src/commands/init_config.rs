//! Write the default configuration file.

use std::path::PathBuf;

use stabkit_common::{config_file_path, StabkitConfig};

pub fn run(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(config_file_path);
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    StabkitConfig::default()
        .save_to(&path)
        .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;

    println!("Wrote default config to: {}", path.display());
    Ok(())
}
