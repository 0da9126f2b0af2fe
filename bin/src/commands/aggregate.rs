//! Aggregate command implementation.
//!
//! This module reads a tick file, builds bars and writes them next to the
//! input or to the given output path.

use crate::display::{Format, spinner};
use anyhow::{Context, Result};
use barmill_lib::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Aggregate the ticks in `input` into bars.
pub(crate) fn aggregate(
    input: &Path,
    unit: &str,
    quantity: f64,
    output: Option<PathBuf>,
    format: Option<Format>,
    quiet: bool,
) -> Result<()> {
    let aggregator = BarAggregator::parse(unit, quantity)?;
    let input_format = FileFormat::from_path(&input.to_string_lossy())?;

    let output_format = match (format, &output) {
        (Some(format), _) => format.file_format(),
        (None, Some(path)) => FileFormat::from_path(&path.to_string_lossy())?,
        (None, None) => input_format,
    };
    let output = output.unwrap_or_else(|| default_output(input, output_format));

    let progress = spinner(format!("Reading {}", input.display()), quiet);
    let data = std::fs::read(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let ticks = input_format
        .read_ticks(data.into())
        .with_context(|| format!("Failed to decode ticks from {}", input.display()))?;

    progress.set_message(format!("Aggregating {} ticks", ticks.len()));
    let bars = aggregator.aggregate(&ticks);
    let rows = bars.len();

    let file = File::create(&output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    output_format.write_frame(&Frame::Bars(bars), &mut writer)?;
    writer.flush()?;

    progress.finish_with_message(format!(
        "Built {rows} {} bars from {} ticks",
        aggregator.unit(),
        ticks.len()
    ));

    if !quiet {
        println!("Output written to: {}", output.display());
    }

    Ok(())
}

/// Returns `<input stem>_bars.<extension>` beside the input file.
fn default_output(input: &Path, format: FileFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "ticks".into(), |s| s.to_string_lossy());
    input.with_file_name(format!("{stem}_bars.{}", format.extension()))
}
