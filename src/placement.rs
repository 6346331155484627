//! Marker placement over ranked chains.
//!
//! The search walks a cursor down the ranked chain list. Each chain whose
//! seed hasn't been claimed yet gets one marker on the best clear tile in the
//! ring around its seed, and every member of the chain is then claimed. Once
//! every structure is claimed the claims are dropped and the cursor restarts
//! at the top, so the strongest chains receive further markers.

use crate::chain::Chain;
use crate::constants::*;
use crate::grid::*;
use crate::location::*;
use crate::registry::*;
use fnv::FnvHashSet;
use log::*;
use serde::{Deserialize, Serialize};

/// Geometry of the placement search.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementSearch {
    /// Candidate tiles lie within the seed footprint grown by this margin...
    pub ring_outer_margin: u8,
    /// ...but outside the footprint grown by this one.
    pub ring_inner_margin: u8,
    /// Probe offset of the clearance test.
    pub clearance: u8,
}

impl Default for PlacementSearch {
    fn default() -> Self {
        PlacementSearch {
            ring_outer_margin: DEFAULT_RING_OUTER_MARGIN,
            ring_inner_margin: DEFAULT_RING_INNER_MARGIN,
            clearance: DEFAULT_CLEARANCE_OFFSET,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ScanState {
    /// Visiting chains from the cursor onward.
    Scanning,
    /// Every structure has been claimed; claims are dropped and the cursor
    /// rewinds to the first chain.
    ExhaustedReset,
}

/// Cursor over the ranked chains plus the structures claimed so far.
struct ChainCursor {
    position: usize,
    state: ScanState,
    visited: FnvHashSet<StructureHandle>,
    /// Distinct structures across all chains.
    pool: usize,
    /// Markers placed since the last reset.
    placed_since_reset: usize,
}

impl ChainCursor {
    fn new(chains: &[Chain]) -> Self {
        let pool = chains
            .iter()
            .flat_map(|chain| chain.members.iter())
            .collect::<FnvHashSet<_>>()
            .len();

        ChainCursor {
            position: 0,
            state: ScanState::Scanning,
            visited: FnvHashSet::default(),
            pool,
            placed_since_reset: 0,
        }
    }

    fn claim(&mut self, chain: &Chain) {
        self.visited.extend(chain.members.iter().copied());
    }

    /// Move to the next chain, switching to `ExhaustedReset` when every
    /// structure has been claimed or the list has run out.
    fn advance(&mut self, chain_count: usize) {
        self.position += 1;
        if self.visited.len() >= self.pool || self.position >= chain_count {
            self.state = ScanState::ExhaustedReset;
        }
    }

    fn reset(&mut self) {
        self.visited.clear();
        self.position = 0;
        self.placed_since_reset = 0;
        self.state = ScanState::Scanning;
    }
}

impl PlacementSearch {
    /// Place up to `count` markers on the grid, returning their locations in
    /// placement order. Fewer are returned when no valid tile remains.
    pub fn place_markers(
        &self,
        grid: &mut Grid,
        registry: &Registry,
        chains: &[Chain],
        count: usize,
    ) -> Vec<Location> {
        let mut markers = Vec::with_capacity(count);
        if chains.is_empty() || count == 0 {
            return markers;
        }

        let mut cursor = ChainCursor::new(chains);

        while markers.len() < count {
            match cursor.state {
                ScanState::Scanning => {
                    let chain = &chains[cursor.position];

                    if !cursor.visited.contains(&chain.seed()) {
                        if let Some(tile) = self.best_tile(grid, registry, chain) {
                            grid.place_marker(tile);
                            markers.push(tile);
                            cursor.placed_since_reset += 1;

                            trace!(
                                "Marker {} at ({}, {}) for chain of {}",
                                markers.len(),
                                tile.row(),
                                tile.col(),
                                chain.len()
                            );
                        }
                    }

                    cursor.claim(chain);
                    cursor.advance(chains.len());
                }
                ScanState::ExhaustedReset => {
                    if cursor.placed_since_reset == 0 {
                        // The grid didn't change, so another pass would find nothing.
                        debug!(
                            "Placement exhausted after {} of {} markers",
                            markers.len(),
                            count
                        );
                        break;
                    }
                    cursor.reset();
                }
            }
        }

        markers
    }

    /// Closest valid ring tile around the chain's seed to the origin of the
    /// chain's target. Ties go to the first tile in row-major order.
    pub fn best_tile(&self, grid: &Grid, registry: &Registry, chain: &Chain) -> Option<Location> {
        let seed = registry.get(chain.seed())?;
        let target = registry.get(chain.target())?.origin;

        Grid::surrounding_tiles(seed, self.ring_outer_margin, self.ring_inner_margin)
            .into_iter()
            .filter(|tile| {
                grid.is_valid_attacker_tile_with(tile.row() as i32, tile.col() as i32, self.clearance)
            })
            .min_by_key(|tile| tile.distance_sq_to(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::group_chains;
    use crate::graph::AdjacencyGraph;
    use crate::structure::StructureType;

    struct Fixture {
        registry: Registry,
        grid: Grid,
        chains: Vec<Chain>,
    }

    fn fixture(items: &[(StructureType, u32, u32)]) -> Fixture {
        let mut registry = Registry::new();
        let mut grid = Grid::new();
        for &(ty, row, col) in items {
            let handle = registry.insert(ty, Location::from_coords(row, col));
            grid.place(handle, registry.get(handle).unwrap()).unwrap();
        }
        let graph = AdjacencyGraph::build(&registry);
        let chains = group_chains(&graph, &registry);
        Fixture {
            registry,
            grid,
            chains,
        }
    }

    fn place(f: &mut Fixture, count: usize) -> Vec<Location> {
        PlacementSearch::default().place_markers(&mut f.grid, &f.registry, &f.chains, count)
    }

    #[test]
    fn no_chains_no_markers() {
        let mut f = fixture(&[]);
        assert!(place(&mut f, 6).is_empty());
    }

    #[test]
    fn zero_count_no_markers() {
        let mut f = fixture(&[(StructureType::Cannon, 5, 5)]);
        assert!(place(&mut f, 0).is_empty());
        assert_eq!(f.grid.count(CellKind::MARKER), 0);
    }

    #[test]
    fn single_structure_marker_nearest_its_origin() {
        let mut f = fixture(&[(StructureType::Cannon, 5, 5)]);
        let markers = place(&mut f, 1);

        assert_eq!(markers, vec![Location::from_coords(2, 5)]);
        assert_eq!(f.grid.get(markers[0]), Cell::Marker);
    }

    #[test]
    fn marker_leans_toward_second_member() {
        // Two flush cannons; the chain seeded at the left one targets the
        // right one, so the marker sits on the right-hand side of the ring.
        let mut f = fixture(&[
            (StructureType::Cannon, 10, 10),
            (StructureType::Cannon, 10, 13),
        ]);
        let markers = place(&mut f, 1);

        assert_eq!(markers.len(), 1);
        let target = Location::from_coords(10, 13);
        let seed = Location::from_coords(10, 10);
        assert!(markers[0].distance_sq_to(target) < markers[0].distance_sq_to(seed));
    }

    #[test]
    fn claimed_chains_are_skipped_until_reset() {
        // Both chains cover both cannons, so the second chain's seed is
        // already claimed and the second marker comes after a reset from the
        // top of the list, again near the first seed.
        let mut f = fixture(&[
            (StructureType::Cannon, 10, 10),
            (StructureType::Cannon, 10, 13),
        ]);
        let first_seed = f.chains[0].seed();
        let markers = place(&mut f, 2);

        assert_eq!(markers.len(), 2);
        let seed = f.registry.get(first_seed).unwrap();
        let ring = Grid::surrounding_tiles(seed, 3, 1);
        assert!(markers.iter().all(|m| ring.contains(m)));
    }

    #[test]
    fn markers_are_unique_and_on_clear_cells() {
        let mut f = fixture(&[
            (StructureType::TownHall, 20, 20),
            (StructureType::Cannon, 17, 20),
            (StructureType::Cannon, 24, 21),
            (StructureType::Mortar, 20, 24),
            (StructureType::Bomb, 19, 19),
            (StructureType::ArcherTower, 30, 8),
        ]);
        let before = f.grid.clone();
        let markers = place(&mut f, 12);

        let mut unique = markers.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), markers.len());

        for marker in &markers {
            assert_eq!(before.get(*marker), Cell::Empty);
            assert_eq!(f.grid.get(*marker), Cell::Marker);
        }
        assert_eq!(f.grid.count(CellKind::MARKER), markers.len());
    }

    #[test]
    fn stops_when_no_tile_is_valid() {
        // A lone bomb in the corner with a tight ring: only a few tiles can
        // ever hold a marker, so asking for many returns fewer.
        let mut f = fixture(&[(StructureType::Bomb, 0, 0)]);
        let markers = place(&mut f, 50);

        assert!(!markers.is_empty());
        assert!(markers.len() < 50);
    }
}
