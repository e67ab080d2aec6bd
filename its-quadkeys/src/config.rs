//! Region-of-interest configuration.
//!
//! Holds the topic settings and the speed-dependent depth thresholds used by
//! [`crate::roi::RoiTracker`]. Can be built in code or loaded from an INI
//! file:
//!
//! ```ini
//! [topics]
//! namespace = its/v2x
//! source_id = vehicle-42
//! message_types = cam, denm, cpm
//!
//! [roi]
//! min_depth = 12
//! max_depth = 18
//! ; speed in m/s : depth
//! thresholds = 0:18, 14:16, 28:14
//! ```

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use crate::quadkey::MAX_DEPTH;

/// Default depth at standstill and low speed (~150 m tiles at mid latitudes).
pub const DEFAULT_MAX_DEPTH: u8 = 18;

/// Shallowest depth the tracker will fall back to.
pub const DEFAULT_MIN_DEPTH: u8 = 12;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Config text is not valid INI
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] ini::ParseError),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Use `depth` once the speed reaches `min_speed` (m/s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthThreshold {
    pub min_speed: f64,
    pub depth: u8,
}

impl DepthThreshold {
    pub fn new(min_speed: f64, depth: u8) -> Self {
        Self { min_speed, depth }
    }
}

/// Region-of-interest and topic configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RoiConfig {
    /// Leading topic levels.
    pub namespace: String,

    /// Identifier of this station in published topics.
    pub source_id: String,

    /// Message types to subscribe to (e.g. "cam", "denm").
    pub message_types: Vec<String>,

    /// Shallowest depth used, whatever the speed.
    pub min_depth: u8,

    /// Deepest depth used, whatever the speed.
    pub max_depth: u8,

    /// Speed thresholds, sorted by ascending speed.
    ///
    /// Faster stations get shallower (larger) tiles so the subscribed area
    /// keeps up with them.
    pub thresholds: Vec<DepthThreshold>,
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            namespace: crate::topic::DEFAULT_NAMESPACE.to_string(),
            source_id: "its-station".to_string(),
            message_types: vec!["cam".to_string(), "denm".to_string(), "cpm".to_string()],
            min_depth: DEFAULT_MIN_DEPTH,
            max_depth: DEFAULT_MAX_DEPTH,
            thresholds: vec![
                DepthThreshold::new(0.0, 18),
                // ~50 km/h
                DepthThreshold::new(14.0, 16),
                // ~100 km/h
                DepthThreshold::new(28.0, 14),
            ],
        }
    }
}

impl RoiConfig {
    /// Create a configuration with defaults and the given source id.
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            ..Default::default()
        }
    }

    /// Set the topic namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Replace the subscribed message types.
    pub fn with_message_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.message_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Set the depth bounds. Values are clamped into `1..=MAX_DEPTH` and
    /// swapped if given in the wrong order.
    pub fn with_depth_range(mut self, min_depth: u8, max_depth: u8) -> Self {
        self.min_depth = min_depth;
        self.max_depth = max_depth;
        (self.min_depth, self.max_depth) = self.depth_bounds();
        self
    }

    /// Replace the speed thresholds.
    pub fn with_thresholds(mut self, mut thresholds: Vec<DepthThreshold>) -> Self {
        thresholds.sort_by(|a, b| a.min_speed.total_cmp(&b.min_speed));
        self.thresholds = thresholds;
        self
    }

    /// Depth to use at `speed` (m/s).
    ///
    /// Picks the fastest threshold not above `speed`, falling back to
    /// `max_depth` below the first threshold, then clamps into the depth
    /// bounds. Negative or NaN speeds count as standing still.
    ///
    /// Bounds set directly on the fields are normalised the same way as in
    /// [`Self::with_depth_range`]: swapped if inverted and kept within
    /// `1..=MAX_DEPTH`.
    pub fn depth_for_speed(&self, speed: f64) -> u8 {
        let speed = if speed.is_nan() { 0.0 } else { speed.max(0.0) };
        let (lo, hi) = self.depth_bounds();
        self.thresholds
            .iter()
            .take_while(|t| t.min_speed <= speed)
            .last()
            .map_or(hi, |t| t.depth)
            .clamp(lo, hi)
    }

    /// `(min, max)` depth, ordered and within `1..=MAX_DEPTH`.
    fn depth_bounds(&self) -> (u8, u8) {
        let a = self.min_depth.clamp(1, MAX_DEPTH);
        let b = self.max_depth.clamp(1, MAX_DEPTH);
        (a.min(b), a.max(b))
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Parse configuration from INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_str(text)?;
        parse_ini(&ini)
    }
}

/// Default config file location (`~/.its-quadkeys/config.ini`).
pub fn config_file_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".its-quadkeys")
        .join("config.ini")
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_depth(section: &str, key: &str, value: &str) -> Result<u8, ConfigFileError> {
    match value.trim().parse::<u8>() {
        Ok(depth) if (1..=MAX_DEPTH).contains(&depth) => Ok(depth),
        _ => Err(invalid(
            section,
            key,
            value,
            &format!("must be an integer between 1 and {}", MAX_DEPTH),
        )),
    }
}

fn parse_thresholds(value: &str) -> Result<Vec<DepthThreshold>, ConfigFileError> {
    let reason = "expected comma-separated 'speed:depth' pairs like '0:18, 14:16'";
    let mut thresholds = Vec::new();
    for pair in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (speed, depth) = pair
            .split_once(':')
            .ok_or_else(|| invalid("roi", "thresholds", value, reason))?;
        let min_speed: f64 = speed
            .trim()
            .parse()
            .ok()
            .filter(|s: &f64| s.is_finite() && *s >= 0.0)
            .ok_or_else(|| invalid("roi", "thresholds", value, reason))?;
        let depth = parse_depth("roi", "thresholds", depth)?;
        thresholds.push(DepthThreshold::new(min_speed, depth));
    }
    Ok(thresholds)
}

/// Overlay INI values on top of the defaults.
fn parse_ini(ini: &Ini) -> Result<RoiConfig, ConfigFileError> {
    let mut config = RoiConfig::default();

    // [topics] section
    if let Some(section) = ini.section(Some("topics")) {
        if let Some(v) = section.get("namespace") {
            let v = v.trim().trim_end_matches('/');
            if v.is_empty() || v.contains(['+', '#']) {
                return Err(invalid(
                    "topics",
                    "namespace",
                    v,
                    "must be non-empty and free of MQTT wildcards",
                ));
            }
            config.namespace = v.to_string();
        }
        if let Some(v) = section.get("source_id") {
            let v = v.trim();
            if v.is_empty() || v.contains(['/', '+', '#']) {
                return Err(invalid(
                    "topics",
                    "source_id",
                    v,
                    "must be a single non-empty topic level",
                ));
            }
            config.source_id = v.to_string();
        }
        if let Some(v) = section.get("message_types") {
            let types: Vec<String> = v
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_lowercase)
                .collect();
            if types.is_empty() {
                return Err(invalid(
                    "topics",
                    "message_types",
                    v,
                    "at least one message type is required",
                ));
            }
            config.message_types = types;
        }
    }

    // [roi] section
    if let Some(section) = ini.section(Some("roi")) {
        let min_depth = match section.get("min_depth") {
            Some(v) => parse_depth("roi", "min_depth", v)?,
            None => config.min_depth,
        };
        let max_depth = match section.get("max_depth") {
            Some(v) => parse_depth("roi", "max_depth", v)?,
            None => config.max_depth,
        };
        if min_depth > max_depth {
            return Err(invalid(
                "roi",
                "min_depth",
                &min_depth.to_string(),
                "must not exceed max_depth",
            ));
        }
        config.min_depth = min_depth;
        config.max_depth = max_depth;

        if let Some(v) = section.get("thresholds") {
            config = config.with_thresholds(parse_thresholds(v)?);
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RoiConfig::default();
        assert_eq!(config.namespace, "its/v2x");
        assert_eq!(config.min_depth, 12);
        assert_eq!(config.max_depth, 18);
        assert_eq!(config.message_types, vec!["cam", "denm", "cpm"]);
    }

    #[test]
    fn test_depth_for_speed() {
        let config = RoiConfig::default();
        assert_eq!(config.depth_for_speed(0.0), 18);
        assert_eq!(config.depth_for_speed(13.9), 18);
        assert_eq!(config.depth_for_speed(14.0), 16);
        assert_eq!(config.depth_for_speed(40.0), 14);
        assert_eq!(config.depth_for_speed(-3.0), 18);
        assert_eq!(config.depth_for_speed(f64::NAN), 18);
    }

    #[test]
    fn test_depth_for_speed_clamped_to_bounds() {
        let config = RoiConfig::default()
            .with_depth_range(15, 17)
            .with_thresholds(vec![DepthThreshold::new(30.0, 10), DepthThreshold::new(0.0, 20)]);
        assert_eq!(config.depth_for_speed(0.0), 17);
        assert_eq!(config.depth_for_speed(50.0), 15);
    }

    #[test]
    fn test_depth_for_speed_with_inverted_fields() {
        let config = RoiConfig {
            min_depth: 18,
            max_depth: 12,
            ..RoiConfig::default()
        };
        assert_eq!(config.depth_for_speed(0.0), 18);
        assert_eq!(config.depth_for_speed(40.0), 14);

        let config = RoiConfig {
            min_depth: 0,
            max_depth: 200,
            thresholds: vec![DepthThreshold::new(0.0, 99)],
            ..RoiConfig::default()
        };
        assert_eq!(config.depth_for_speed(0.0), MAX_DEPTH);
    }

    #[test]
    fn test_with_depth_range_normalizes() {
        let config = RoiConfig::default().with_depth_range(40, 0);
        assert_eq!(config.min_depth, 1);
        assert_eq!(config.max_depth, MAX_DEPTH);
    }

    #[test]
    fn test_parse_full_ini() {
        let config = RoiConfig::from_ini_str(
            "[topics]\n\
             namespace = 5GCroCo/outQueue/v2x/\n\
             source_id = rsu-7\n\
             message_types = CAM, denm\n\
             [roi]\n\
             min_depth = 10\n\
             max_depth = 20\n\
             thresholds = 30:12, 0:20, 10:16\n",
        )
        .unwrap();

        assert_eq!(config.namespace, "5GCroCo/outQueue/v2x");
        assert_eq!(config.source_id, "rsu-7");
        assert_eq!(config.message_types, vec!["cam", "denm"]);
        assert_eq!(config.min_depth, 10);
        assert_eq!(config.max_depth, 20);
        assert_eq!(
            config.thresholds,
            vec![
                DepthThreshold::new(0.0, 20),
                DepthThreshold::new(10.0, 16),
                DepthThreshold::new(30.0, 12),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_bad_depth() {
        let err = RoiConfig::from_ini_str("[roi]\nmax_depth = 40\n").unwrap_err();
        assert!(matches!(err, ConfigFileError::InvalidValue { ref key, .. } if key == "max_depth"));

        let err = RoiConfig::from_ini_str("[roi]\nmin_depth = 19\n").unwrap_err();
        assert!(err.to_string().contains("must not exceed max_depth"));
    }

    #[test]
    fn test_parse_rejects_bad_thresholds() {
        for bad in ["fast:12", "10-12", "10:0", "-5:12"] {
            let text = format!("[roi]\nthresholds = {}\n", bad);
            assert!(
                RoiConfig::from_ini_str(&text).is_err(),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_rejects_wildcard_source() {
        let err = RoiConfig::from_ini_str("[topics]\nsource_id = a/b\n").unwrap_err();
        assert!(err.to_string().contains("topics.source_id"));
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RoiConfig::load_from(&dir.path().join("missing.ini")).unwrap();
        assert_eq!(config, RoiConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[topics]\nsource_id = obu-1\n").unwrap();

        let config = RoiConfig::load_from(&path).unwrap();
        assert_eq!(config.source_id, "obu-1");
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_config_file_path() {
        assert!(config_file_path().ends_with(".its-quadkeys/config.ini"));
    }
}
