//! Region commands.

use serde::Serialize;
use tracing::info;

use its_quadkeys::QuadRegion;

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct OptimiseReport {
    pub input_paths: usize,
    pub region: QuadRegion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ring: Option<QuadRegion>,
}

/// Optimise the given paths, optionally with the ring around the result.
pub fn optimise(paths: &[String], ring_depth: Option<u8>) -> Result<OptimiseReport, CliError> {
    let input = QuadRegion::parse(paths)?;
    let region = input.optimised();
    info!(
        before = input.len(),
        after = region.len(),
        "optimised region"
    );

    let ring = ring_depth.map(|depth| region.neighbours(depth).optimised());

    Ok(OptimiseReport {
        input_paths: paths.len(),
        region,
        ring,
    })
}

pub fn render_optimise(report: &OptimiseReport) -> String {
    let mut out = report.region.to_strings().join("\n");
    if let Some(ring) = &report.ring {
        out.push_str("\n# neighbours\n");
        out.push_str(&ring.to_strings().join("\n"));
    }
    out
}
