//! Adjacency graph over structures.
//!
//! Two structures share an edge when their footprints touch or are separated
//! by at most `MAX_ADJACENT_GAP` cells on both axes. Edge weights come from
//! `find_distance`, which prefers structures sharing more wall over ones that
//! are merely close in open space.

use crate::constants::*;
use crate::registry::*;
use crate::spatial::SpatialIndex;
use crate::structure::*;
use fnv::FnvHashMap;
use log::*;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub to: StructureHandle,
    pub distance: f32,
}

/// Undirected weighted graph. Every edge is stored in both directions with
/// the same weight; neighbor lists keep insertion order.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyGraph {
    nodes: FnvHashMap<StructureHandle, Vec<Edge>>,
}

impl AdjacencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph over every live structure in the registry.
    pub fn build(registry: &Registry) -> Self {
        let mut graph = AdjacencyGraph::new();
        let mut index = SpatialIndex::new();

        for (handle, structure) in registry.live() {
            graph.add_node(handle);
            index.insert(structure.origin, handle);
        }

        for (handle, structure) in registry.live() {
            for other_handle in index.query_radius(structure.origin, ADJACENCY_QUERY_RADIUS_SQ) {
                if other_handle == handle || graph.has_edge(handle, other_handle) {
                    continue;
                }

                let other = match registry.get(other_handle) {
                    Some(other) => other,
                    None => continue,
                };

                if are_adjacent(structure, other) {
                    graph.add_edge(handle, other_handle, find_distance(structure, other));
                }
            }
        }

        debug!(
            "Adjacency graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        graph
    }

    pub fn add_node(&mut self, node: StructureHandle) {
        self.nodes.entry(node).or_default();
    }

    /// Insert a symmetric edge. Both nodes must already exist; self-loops and
    /// duplicate edges are ignored. Returns true if the edge was added.
    pub fn add_edge(&mut self, a: StructureHandle, b: StructureHandle, distance: f32) -> bool {
        if a == b || !self.contains(a) || !self.contains(b) || self.has_edge(a, b) {
            return false;
        }

        if let Some(edges) = self.nodes.get_mut(&a) {
            edges.push(Edge { to: b, distance });
        }
        if let Some(edges) = self.nodes.get_mut(&b) {
            edges.push(Edge { to: a, distance });
        }

        true
    }

    pub fn contains(&self, node: StructureHandle) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn has_edge(&self, a: StructureHandle, b: StructureHandle) -> bool {
        self.neighbors(a).iter().any(|edge| edge.to == b)
    }

    pub fn neighbors(&self, node: StructureHandle) -> &[Edge] {
        self.nodes.get(&node).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn edge_weight(&self, a: StructureHandle, b: StructureHandle) -> Option<f32> {
        self.neighbors(a)
            .iter()
            .find(|edge| edge.to == b)
            .map(|edge| edge.distance)
    }

    /// Remove a node and every edge that references it.
    pub fn remove_node(&mut self, node: StructureHandle) -> bool {
        let edges = match self.nodes.remove(&node) {
            Some(edges) => edges,
            None => return false,
        };

        for edge in edges {
            if let Some(back_edges) = self.nodes.get_mut(&edge.to) {
                back_edges.retain(|back| back.to != node);
            }
        }

        true
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|edges| edges.len()).sum::<usize>() / 2
    }

    pub fn nodes(&self) -> impl Iterator<Item = StructureHandle> + '_ {
        self.nodes.keys().copied()
    }
}

/// Signed gap between the nearer edges of two footprints along one axis.
/// Negative when the spans overlap.
fn axis_gap(start_a: i32, len_a: i32, start_b: i32, len_b: i32) -> i32 {
    if start_a < start_b {
        start_b - (start_a + len_a)
    } else {
        start_a - (start_b + len_b)
    }
}

fn gaps(a: &Structure, b: &Structure) -> (i32, i32) {
    let (side_a, side_b) = (a.side() as i32, b.side() as i32);

    (
        axis_gap(a.col(), side_a, b.col(), side_b),
        axis_gap(a.row(), side_a, b.row(), side_b),
    )
}

/// True when the footprints are at most `MAX_ADJACENT_GAP` cells apart on
/// both axes.
pub fn are_adjacent(a: &Structure, b: &Structure) -> bool {
    let (horizontal, vertical) = gaps(a, b);

    horizontal <= MAX_ADJACENT_GAP && vertical <= MAX_ADJACENT_GAP
}

/// Edge weight between two structures.
///
/// When the footprints share wall (one axis overlaps and the other touches
/// or overlaps) the result is the sum of the two signed gaps, a non-positive
/// contact score that gets more negative the more boundary they share.
/// Otherwise negative gaps are clamped to zero and the result is the
/// Euclidean distance across the gap.
pub fn find_distance(a: &Structure, b: &Structure) -> f32 {
    let (horizontal, vertical) = gaps(a, b);

    if (horizontal < 0 && vertical <= 0) || (vertical < 0 && horizontal <= 0) {
        (horizontal + vertical) as f32
    } else {
        let h = horizontal.max(0) as f32;
        let v = vertical.max(0) as f32;
        (h * h + v * v).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    fn structure(structure_type: StructureType, row: u32, col: u32) -> Structure {
        Structure {
            structure_type,
            id: 1,
            origin: Location::from_coords(row, col),
        }
    }

    fn registry_with(items: &[(StructureType, u32, u32)]) -> (Registry, Vec<StructureHandle>) {
        let mut registry = Registry::new();
        let handles = items
            .iter()
            .map(|&(ty, row, col)| registry.insert(ty, Location::from_coords(row, col)))
            .collect();
        (registry, handles)
    }

    #[test]
    fn one_cell_gap_is_adjacent() {
        let a = structure(StructureType::Cannon, 5, 5);
        let b = structure(StructureType::Cannon, 5, 9);

        assert!(are_adjacent(&a, &b));
        assert!(are_adjacent(&b, &a));
        assert_eq!(find_distance(&a, &b), 1.0);
    }

    #[test]
    fn two_cell_gap_is_not_adjacent() {
        let a = structure(StructureType::Cannon, 5, 5);
        let b = structure(StructureType::Cannon, 5, 10);

        assert!(!are_adjacent(&a, &b));
        assert!(!are_adjacent(&b, &a));
    }

    #[test]
    fn flush_walls_score_by_contact() {
        let a = structure(StructureType::Cannon, 5, 5);
        let flush = structure(StructureType::Cannon, 5, 8);
        let offset = structure(StructureType::Cannon, 6, 8);

        assert_eq!(find_distance(&a, &flush), -3.0);
        assert_eq!(find_distance(&a, &offset), -2.0);
        assert!(find_distance(&a, &flush) < find_distance(&a, &offset));
    }

    #[test]
    fn diagonal_corner_touch_is_zero() {
        let a = structure(StructureType::Cannon, 5, 5);
        let b = structure(StructureType::Cannon, 8, 8);

        assert!(are_adjacent(&a, &b));
        assert_eq!(find_distance(&a, &b), 0.0);
    }

    #[test]
    fn diagonal_gap_is_euclidean() {
        let a = structure(StructureType::Hut, 5, 5);
        let b = structure(StructureType::Hut, 8, 8);

        assert!(are_adjacent(&a, &b));
        assert!((find_distance(&a, &b) - 2f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = structure(StructureType::TownHall, 10, 10);
        let b = structure(StructureType::Bomb, 15, 12);

        assert_eq!(find_distance(&a, &b), find_distance(&b, &a));
    }

    #[test]
    fn build_links_neighbors_both_ways() {
        let (registry, handles) = registry_with(&[
            (StructureType::Cannon, 5, 5),
            (StructureType::Cannon, 5, 9),
        ]);
        let graph = AdjacencyGraph::build(&registry);

        assert_eq!(graph.neighbors(handles[0]).len(), 1);
        assert_eq!(graph.neighbors(handles[1]).len(), 1);
        assert_eq!(graph.neighbors(handles[0])[0].to, handles[1]);
        assert_eq!(graph.neighbors(handles[1])[0].to, handles[0]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn build_skips_distant_structures() {
        let (registry, handles) = registry_with(&[
            (StructureType::Cannon, 5, 5),
            (StructureType::Cannon, 5, 10),
        ]);
        let graph = AdjacencyGraph::build(&registry);

        assert_eq!(graph.node_count(), 2);
        assert!(graph.neighbors(handles[0]).is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn build_is_symmetric_on_dense_layout() {
        let mut items = Vec::new();
        for row in (0..40).step_by(4) {
            for col in (0..40).step_by(5) {
                let ty = match (row + col) % 3 {
                    0 => StructureType::Cannon,
                    1 => StructureType::Hut,
                    _ => StructureType::Bomb,
                };
                items.push((ty, row, col));
            }
        }
        let (registry, handles) = registry_with(&items);
        let graph = AdjacencyGraph::build(&registry);

        assert!(graph.edge_count() > 0);
        for &a in &handles {
            for edge in graph.neighbors(a) {
                assert_ne!(edge.to, a);
                assert_eq!(graph.edge_weight(edge.to, a), Some(edge.distance));
            }
            let mut seen: Vec<_> = graph.neighbors(a).iter().map(|e| e.to).collect();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), graph.neighbors(a).len());
        }
    }

    #[test]
    fn build_matches_brute_force_adjacency() {
        let items = [
            (StructureType::TownHall, 20, 20),
            (StructureType::ArmyCamp, 25, 25),
            (StructureType::Cannon, 16, 20),
            (StructureType::Bomb, 24, 19),
            (StructureType::Hut, 18, 25),
            (StructureType::Mortar, 30, 30),
        ];
        let (registry, handles) = registry_with(&items);
        let graph = AdjacencyGraph::build(&registry);

        for &a in &handles {
            for &b in &handles {
                if a == b {
                    continue;
                }
                let expected = are_adjacent(registry.get(a).unwrap(), registry.get(b).unwrap());
                assert_eq!(graph.has_edge(a, b), expected);
            }
        }
    }

    #[test]
    fn add_edge_rejects_self_loops_and_duplicates() {
        let (_, handles) = registry_with(&[
            (StructureType::Bomb, 0, 0),
            (StructureType::Bomb, 0, 2),
        ]);
        let mut graph = AdjacencyGraph::new();
        graph.add_node(handles[0]);
        graph.add_node(handles[1]);

        assert!(!graph.add_edge(handles[0], handles[0], 0.0));
        assert!(graph.add_edge(handles[0], handles[1], 1.0));
        assert!(!graph.add_edge(handles[1], handles[0], 1.0));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn remove_node_purges_edges() {
        let (registry, handles) = registry_with(&[
            (StructureType::Cannon, 5, 5),
            (StructureType::Cannon, 5, 8),
            (StructureType::Cannon, 8, 5),
        ]);
        let mut graph = AdjacencyGraph::build(&registry);
        assert!(graph.has_edge(handles[1], handles[0]));

        assert!(graph.remove_node(handles[0]));
        assert!(!graph.remove_node(handles[0]));
        assert!(!graph.contains(handles[0]));
        for node in graph.nodes() {
            assert!(graph.neighbors(node).iter().all(|e| e.to != handles[0]));
        }
    }

    #[test]
    fn query_radius_covers_largest_footprints() {
        let farthest = MAX_FOOTPRINT_SIDE + MAX_ADJACENT_GAP;
        assert!(2 * farthest * farthest <= ADJACENCY_QUERY_RADIUS_SQ);
        assert_eq!(ADJACENCY_QUERY_RADIUS_SQ, 72);
    }
}
