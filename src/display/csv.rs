use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::curve;

/// Sample the configured curve once and write it as CSV to `output`, or stdout.
pub fn run(config: &Config, output: Option<&Path>) -> Result<()> {
    let params = config.curve_params();
    let dataset = curve::generate(&params)
        .with_context(|| format!("Failed to sample {} curve", params.family.name()))?;

    info!(
        "Sampled {} points of {} (n={}, d={})",
        dataset.len(),
        params.family.name(),
        params.n,
        params.d
    );

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            dataset.write_csv(BufWriter::new(file))?;
            info!("Wrote dataset to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            dataset.write_csv(BufWriter::new(stdout.lock()))?;
        }
    }

    Ok(())
}
