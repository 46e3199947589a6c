use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use log::info;

use crate::{F1LabError, session::Lap};

/// Write an SVG document to `file`
pub fn write_svg(file: &Path, svg: &str) -> Result<(), F1LabError> {
    let svg_file = File::create(file).map_err(|e| F1LabError::WriterError { source: e })?;
    let mut svg_writer = BufWriter::new(svg_file);
    svg_writer
        .write_all(svg.as_bytes())
        .map_err(|e| F1LabError::WriterError { source: e })?;
    svg_writer
        .flush()
        .map_err(|e| F1LabError::WriterError { source: e })?;
    info!("Wrote track map to {:?}", file);
    Ok(())
}

/// Export laps as JSON lines, one lap per line
pub fn write_laps(file: &Path, laps: &[Lap]) -> Result<(), F1LabError> {
    serde_jsonlines::write_json_lines(file, laps)
        .map_err(|e| F1LabError::WriterError { source: e })?;
    info!("Exported {} laps to {:?}", laps.len(), file);
    Ok(())
}
