//! Single-path commands: `encode`, `neighbours`, `split`.

use serde::Serialize;
use tracing::warn;

use its_quadkeys::{QuadPath, QuadRegion};

use crate::error::CliError;

/// Splits producing more paths than this get a warning.
const LARGE_SPLIT: usize = 1 << 16;

#[derive(Debug, Serialize)]
pub struct EncodeReport {
    pub path: QuadPath,
    pub depth: u8,
    pub topic_levels: String,
    pub row: u32,
    pub col: u32,
    pub center: (f64, f64),
}

/// Encode a position into a path.
pub fn encode(lat: f64, lon: f64, depth: u8) -> Result<EncodeReport, CliError> {
    let path = QuadPath::from_position(lat, lon, depth)?;
    let tile = path.to_tile();
    Ok(EncodeReport {
        path,
        depth: path.depth(),
        topic_levels: path.to_str("/"),
        row: tile.row,
        col: tile.col,
        center: path.center(),
    })
}

pub fn render_encode(report: &EncodeReport) -> String {
    format!(
        "{}\n  depth:  {}\n  levels: {}\n  tile:   row={} col={}\n  center: {:.7}, {:.7}",
        report.path,
        report.depth,
        report.topic_levels,
        report.row,
        report.col,
        report.center.0,
        report.center.1
    )
}

#[derive(Debug, Serialize)]
pub struct NeighbourEntry {
    pub direction: &'static str,
    pub path: Option<QuadPath>,
}

/// The eight neighbours of a path, north-west first.
pub fn neighbours(digits: &str) -> Result<Vec<NeighbourEntry>, CliError> {
    let path = QuadPath::new(digits)?;
    Ok(path
        .neighbours()
        .iter()
        .map(|(direction, path)| NeighbourEntry {
            direction: direction.label(),
            path,
        })
        .collect())
}

pub fn render_neighbours(entries: &[NeighbourEntry]) -> String {
    entries
        .iter()
        .map(|e| match e.path {
            Some(p) => format!("{:>2}  {}", e.direction, p),
            None => format!("{:>2}  -", e.direction),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split a path to an absolute depth or by a number of levels.
pub fn split(digits: &str, depth: Option<u8>, by: Option<u8>) -> Result<QuadRegion, CliError> {
    let path = QuadPath::new(digits)?;
    let region = path.split(depth, by)?;
    if region.len() > LARGE_SPLIT {
        warn!(path = %path, paths = region.len(), "large split");
    }
    Ok(region)
}

pub fn render_region(region: &QuadRegion) -> String {
    region.to_strings().join("\n")
}
