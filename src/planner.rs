//! Public API for the raid planner.
//!
//! The `PlannerBuilder` provides a fluent API for configuring a run. A
//! `Planner` is cheap to keep around: every call to `plan` builds a fresh
//! `Board`, so no state leaks between runs.

use crate::board::*;
use crate::constants::*;
use crate::detection::DetectionResult;
use crate::error::*;
use crate::location::Location;
use crate::placement::PlacementSearch;
use log::*;
use serde::{Deserialize, Serialize};

/// Everything that tunes a planning run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub marker_count: usize,
    #[serde(default)]
    pub search: PlacementSearch,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            marker_count: DEFAULT_MARKER_COUNT,
            search: PlacementSearch::default(),
        }
    }
}

/// Fluent builder for configuring a `Planner`.
#[derive(Default)]
pub struct PlannerBuilder {
    config: PlannerConfig,
}

impl PlannerBuilder {
    /// Start from the default configuration (6 markers, standard ring).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: PlannerConfig) -> Self {
        PlannerBuilder { config }
    }

    /// Number of markers to place.
    pub fn marker_count(mut self, count: usize) -> Self {
        self.config.marker_count = count;
        self
    }

    /// Candidate ring around each seed: tiles within `outer` cells of the
    /// footprint but more than `inner` away.
    pub fn ring(mut self, outer: u8, inner: u8) -> Self {
        self.config.search.ring_outer_margin = outer;
        self.config.search.ring_inner_margin = inner.min(outer);
        self
    }

    /// Probe offset of the clearance test.
    pub fn clearance(mut self, clearance: u8) -> Self {
        self.config.search.clearance = clearance;
        self
    }

    pub fn build(self) -> Planner {
        Planner {
            config: self.config,
        }
    }
}

pub struct Planner {
    config: PlannerConfig,
}

impl Default for Planner {
    fn default() -> Self {
        PlannerBuilder::default().build()
    }
}

impl Planner {
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Given grid-space structures, return up to `marker_count` marker
    /// locations, best first.
    pub fn plan(&self, structures: &[StructureSpec]) -> PlannerResult<Vec<Location>> {
        let mut board = Board::populate(structures)?;
        let markers = board.place_markers(&self.config.search, self.config.marker_count);

        debug!(
            "Placed {} of {} markers over {} structures",
            markers.len(),
            self.config.marker_count,
            board.registry().live_len()
        );

        Ok(markers)
    }

    /// Plan straight from a detection result, returning the grid markers and
    /// their pixel positions on the source image.
    pub fn plan_detections(
        &self,
        detections: &DetectionResult,
    ) -> PlannerResult<(Vec<Location>, Vec<(f32, f32)>)> {
        let specs = detections.to_structure_specs()?;
        let markers = self.plan(&specs)?;
        let pixels = detections.unproject_markers(&markers);

        Ok((markers, pixels))
    }
}

/// Plan with the default configuration.
pub fn plan_markers(structures: &[StructureSpec]) -> PlannerResult<Vec<Location>> {
    Planner::default().plan(structures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_config() {
        let planner = PlannerBuilder::new()
            .marker_count(3)
            .ring(4, 2)
            .clearance(3)
            .build();

        let config = planner.config();
        assert_eq!(config.marker_count, 3);
        assert_eq!(config.search.ring_outer_margin, 4);
        assert_eq!(config.search.ring_inner_margin, 2);
        assert_eq!(config.search.clearance, 3);
    }

    #[test]
    fn ring_inner_never_exceeds_outer() {
        let planner = PlannerBuilder::new().ring(2, 5).build();
        assert_eq!(planner.config().search.ring_inner_margin, 2);
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = serde_json::to_string(&PlannerConfig::default()).unwrap();
        let config: PlannerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.marker_count, 6);
    }

    #[test]
    fn config_search_defaults_when_omitted() {
        let config: PlannerConfig = serde_json::from_str(r#"{ "marker_count": 2 }"#).unwrap();
        assert_eq!(config.search, PlacementSearch::default());
        let planner = PlannerBuilder::from_config(config).build();
        assert_eq!(planner.config().marker_count, 2);
    }

    #[test]
    fn plan_empty_base() {
        assert!(plan_markers(&[]).unwrap().is_empty());
    }

    #[test]
    fn plan_propagates_bad_input() {
        let result = plan_markers(&[StructureSpec::new("TownHall", 42, 0)]);
        assert!(matches!(result, Err(PlannerError::OutOfBounds { .. })));
    }

    #[test]
    fn plan_is_deterministic() {
        let specs = vec![
            StructureSpec::new("TownHall", 20, 20),
            StructureSpec::new("Cannon", 17, 20),
            StructureSpec::new("Mortar", 20, 24),
            StructureSpec::new("ArmyCamp", 30, 30),
        ];

        assert_eq!(plan_markers(&specs).unwrap(), plan_markers(&specs).unwrap());
    }
}
