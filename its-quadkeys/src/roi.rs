//! Region-of-interest tracking for a moving ITS station.
//!
//! On every position fix the tracker builds the area the station cares about
//! (its own tile plus the surrounding ring, at a depth picked from its speed),
//! and reports which topic filters to add and which to drop compared to the
//! previous fix.

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::RoiConfig;
use crate::error::QuadError;
use crate::quadkey::QuadPath;
use crate::topic::TopicScheme;
use crate::zone::QuadRegion;

/// Changes produced by one position update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubscriptionDelta {
    /// Members of the new region that were not members before.
    pub subscribe: QuadRegion,

    /// Members of the old region that are no longer members.
    pub unsubscribe: QuadRegion,

    /// Area newly covered.
    pub gained_area: QuadRegion,

    /// Area no longer covered.
    pub lost_area: QuadRegion,
}

impl SubscriptionDelta {
    /// True if the subscription set did not change.
    pub fn is_empty(&self) -> bool {
        self.subscribe.is_empty() && self.unsubscribe.is_empty()
    }
}

/// Tracks the optimised region of interest of one station.
#[derive(Debug, Clone)]
pub struct RoiTracker {
    config: RoiConfig,
    topics: TopicScheme,
    current: QuadRegion,
    position: Option<QuadPath>,
}

impl RoiTracker {
    pub fn new(config: RoiConfig) -> Self {
        let topics = TopicScheme::new(config.namespace.clone());
        Self {
            config,
            topics,
            current: QuadRegion::new(),
            position: None,
        }
    }

    pub fn config(&self) -> &RoiConfig {
        &self.config
    }

    pub fn topics(&self) -> &TopicScheme {
        &self.topics
    }

    /// Current region of interest, optimised.
    pub fn region(&self) -> &QuadRegion {
        &self.current
    }

    /// Tile of the last accepted fix.
    pub fn position(&self) -> Option<QuadPath> {
        self.position
    }

    /// Region of interest around a position at the given depth.
    ///
    /// # Errors
    ///
    /// Fails on non-finite coordinates.
    pub fn region_around(lat: f64, lon: f64, depth: u8) -> Result<QuadRegion, QuadError> {
        let centre = QuadPath::from_position(lat, lon, depth)?;
        let mut region = QuadRegion::from(centre);
        let ring = region.neighbours(depth);
        region.union_with(&ring);
        region.optimise();
        Ok(region)
    }

    /// Process a position fix with the station's speed in m/s.
    ///
    /// # Errors
    ///
    /// Fails on non-finite coordinates; the tracked region is left untouched.
    pub fn update(&mut self, lat: f64, lon: f64, speed: f64) -> Result<SubscriptionDelta, QuadError> {
        let depth = self.config.depth_for_speed(speed);
        let next = Self::region_around(lat, lon, depth)?;
        let position = QuadPath::from_position(lat, lon, depth)?;

        trace!(lat, lon, speed, depth, tile = %position, "position fix");

        let delta = self.replace(next);
        self.position = Some(position);

        if !delta.is_empty() {
            debug!(
                tile = %position,
                depth,
                subscribe = delta.subscribe.len(),
                unsubscribe = delta.unsubscribe.len(),
                members = self.current.len(),
                "region of interest changed"
            );
        }

        Ok(delta)
    }

    /// Drop the whole region, returning everything to unsubscribe.
    pub fn clear(&mut self) -> SubscriptionDelta {
        self.position = None;
        self.replace(QuadRegion::new())
    }

    /// Subscription filters for the current region, for every configured
    /// message type.
    pub fn subscription_filters(&self) -> Vec<String> {
        self.filters_for(&self.current)
    }

    /// Subscription filters for an arbitrary region, for every configured
    /// message type.
    pub fn filters_for(&self, region: &QuadRegion) -> Vec<String> {
        self.config
            .message_types
            .iter()
            .flat_map(|mt| self.topics.region_filters(mt, region))
            .collect()
    }

    /// Topic to publish a message of `message_type` at the last fix.
    pub fn publish_topic(&self, message_type: &str) -> Option<String> {
        self.position
            .map(|p| self.topics.publish_topic(message_type, &self.config.source_id, &p))
    }

    fn replace(&mut self, next: QuadRegion) -> SubscriptionDelta {
        let subscribe = next
            .iter()
            .filter(|p| !self.current.is_member(p))
            .copied()
            .collect();
        let unsubscribe = self
            .current
            .iter()
            .filter(|p| !next.is_member(p))
            .copied()
            .collect();
        let gained_area = next.difference(&self.current).optimised();
        let lost_area = self.current.difference(&next).optimised();

        self.current = next;

        SubscriptionDelta {
            subscribe,
            unsubscribe,
            gained_area,
            lost_area,
        }
    }
}
