//! `roi` command: replay position fixes through a region-of-interest
//! tracker and print the resulting subscription changes.

use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info};

use its_quadkeys::config::{config_file_path, RoiConfig};
use its_quadkeys::roi::{RoiTracker, SubscriptionDelta};
use its_quadkeys::QuadPath;

use crate::error::CliError;

/// A position fix given as `lat,lon` or `lat,lon,speed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub lat: f64,
    pub lon: f64,
    pub speed: f64,
}

impl FromStr for Fix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let number = |v: &str| {
            v.parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", v))
        };
        match parts.as_slice() {
            [lat, lon] => Ok(Fix {
                lat: number(lat)?,
                lon: number(lon)?,
                speed: 0.0,
            }),
            [lat, lon, speed] => Ok(Fix {
                lat: number(lat)?,
                lon: number(lon)?,
                speed: number(speed)?,
            }),
            _ => Err(format!("expected 'lat,lon[,speed]', got '{}'", s)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FixReport {
    pub tile: Option<QuadPath>,
    pub publish_topic: Option<String>,
    pub delta: SubscriptionDelta,
    pub subscribe_filters: Vec<String>,
    pub unsubscribe_filters: Vec<String>,
}

/// Load the configuration from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<RoiConfig, CliError> {
    let default_path = config_file_path();
    let path = path.unwrap_or(&default_path);
    debug!(path = %path.display(), "loading configuration");
    Ok(RoiConfig::load_from(path)?)
}

/// Feed every fix to a fresh tracker, one report per fix.
pub fn replay(config: RoiConfig, fixes: &[Fix]) -> Result<Vec<FixReport>, CliError> {
    let mut tracker = RoiTracker::new(config);
    let mut reports = Vec::with_capacity(fixes.len());

    for fix in fixes {
        let delta = tracker.update(fix.lat, fix.lon, fix.speed)?;
        info!(
            lat = fix.lat,
            lon = fix.lon,
            subscribe = delta.subscribe.len(),
            unsubscribe = delta.unsubscribe.len(),
            "fix processed"
        );
        reports.push(FixReport {
            tile: tracker.position(),
            publish_topic: tracker
                .config()
                .message_types
                .first()
                .and_then(|mt| tracker.publish_topic(mt)),
            subscribe_filters: tracker.filters_for(&delta.subscribe),
            unsubscribe_filters: tracker.filters_for(&delta.unsubscribe),
            delta,
        });
    }

    Ok(reports)
}

pub fn render_reports(reports: &[FixReport]) -> String {
    let mut out = Vec::new();
    for (i, report) in reports.iter().enumerate() {
        match report.tile {
            Some(tile) => out.push(format!("fix {}: {} (depth {})", i + 1, tile, tile.depth())),
            None => out.push(format!("fix {}", i + 1)),
        }
        if let Some(topic) = &report.publish_topic {
            out.push(format!("  publish     {}", topic));
        }
        for filter in &report.subscribe_filters {
            out.push(format!("  subscribe   {}", filter));
        }
        for filter in &report.unsubscribe_filters {
            out.push(format!("  unsubscribe {}", filter));
        }
        if report.delta.is_empty() {
            out.push("  unchanged".to_string());
        }
    }
    out.join("\n")
}
