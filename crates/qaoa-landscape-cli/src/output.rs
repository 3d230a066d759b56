use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// Write `value` as pretty JSON to `path`, or to stdout without one.
pub fn write_json<T: Serialize>(value: &T, path: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match path {
        Some(p) => {
            std::fs::write(p, json).with_context(|| format!("failed to write {}", p.display()))?;
            tracing::info!(path = %p.display(), "wrote output");
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Progress bar for a known number of grid cells.
pub fn cell_bar(total: u64, message: &str) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} {spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}
