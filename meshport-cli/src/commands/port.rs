//! Port command implementation.

use anyhow::{Context, Result};
use meshport_core::{PortOptions, Porter};

/// Port the corpus described by `options`, regenerating the output tree.
pub fn port_corpus(options: PortOptions) -> Result<()> {
    tracing::info!("Porting corpus at {:?}", options.source);

    let summary = Porter::new(options)
        .run()
        .context("Failed to port corpus")?;

    if !summary.skipped.is_empty() {
        tracing::warn!(
            "{} page(s) skipped because their source notes are missing",
            summary.skipped.len()
        );
    }

    tracing::info!(
        "✓ Ported {} pages in {} sections",
        summary.pages_written,
        summary.sections_written
    );
    tracing::info!("✓ Output written to {:?}", summary.output_dir);

    Ok(())
}
