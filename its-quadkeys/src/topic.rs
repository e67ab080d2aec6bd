//! MQTT topic scheme for geographically sharded ITS messages.
//!
//! Topic structure: `{namespace}/{message_type}/{source_id}/{d}/{d}/.../{d}`
//!
//! The trailing levels are the digits of the sender's [`QuadPath`], one per
//! level, so a subscriber selects an area with a single-level wildcard on the
//! source and a multi-level wildcard below the tile:
//! `{namespace}/{message_type}/+/1/2/0/#`. Since `#` also matches its parent
//! level, that filter receives messages published at the tile itself and at
//! every deeper tile inside it.

use serde::{Deserialize, Serialize};

use crate::quadkey::QuadPath;
use crate::zone::QuadRegion;

/// Default topic namespace.
pub const DEFAULT_NAMESPACE: &str = "its/v2x";

/// Topic scheme configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicScheme {
    /// Leading topic levels, may itself contain `/`.
    pub namespace: String,
}

impl Default for TopicScheme {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// A received topic split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTopic {
    pub message_type: String,
    pub source_id: String,
    pub path: QuadPath,
}

impl TopicScheme {
    /// Create a topic scheme under the given namespace.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into().trim_end_matches('/').to_string(),
        }
    }

    /// Topic to publish a message located at `path`.
    #[must_use]
    pub fn publish_topic(&self, message_type: &str, source_id: &str, path: &QuadPath) -> String {
        format!(
            "{}/{}/{}/{}",
            self.namespace,
            message_type,
            source_id,
            path.to_str("/")
        )
    }

    /// Filter receiving every message located inside `path`, from any source.
    #[must_use]
    pub fn subscription_filter(&self, message_type: &str, path: &QuadPath) -> String {
        format!(
            "{}/{}/+/{}/#",
            self.namespace,
            message_type,
            path.to_str("/")
        )
    }

    /// One filter per member of `region`, in member order.
    ///
    /// Pass an optimised region to get the smallest set of filters.
    #[must_use]
    pub fn region_filters(&self, message_type: &str, region: &QuadRegion) -> Vec<String> {
        region
            .iter()
            .map(|path| self.subscription_filter(message_type, path))
            .collect()
    }

    /// Parse a concrete (wildcard-free) topic published under this scheme.
    ///
    /// Returns `None` if the namespace differs, a part is missing, or the
    /// trailing levels are not single quadkey digits.
    #[must_use]
    pub fn parse(&self, topic: &str) -> Option<ParsedTopic> {
        let remainder = topic.strip_prefix(&self.namespace)?.strip_prefix('/')?;
        let mut levels = remainder.split('/');

        let message_type = levels.next().filter(|s| !s.is_empty())?;
        let source_id = levels.next().filter(|s| !s.is_empty())?;

        let mut digits = String::new();
        for level in levels {
            if level.len() != 1 {
                return None;
            }
            digits.push_str(level);
        }
        let path = QuadPath::new(&digits).ok()?;

        Some(ParsedTopic {
            message_type: message_type.to_string(),
            source_id: source_id.to_string(),
            path,
        })
    }
}
