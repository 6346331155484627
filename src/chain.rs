//! Chain grouping: one greedy nearest-neighbor walk per seed structure.

use crate::constants::*;
use crate::graph::*;
use crate::registry::*;
use fnv::FnvHashSet;
use itertools::Itertools;
use log::*;

/// An ordered walk over the adjacency graph, seed first.
#[derive(Clone, Debug, PartialEq)]
pub struct Chain {
    pub members: Vec<StructureHandle>,
}

impl Chain {
    pub fn seed(&self) -> StructureHandle {
        self.members[0]
    }

    /// The structure a marker near the seed should lean toward: the second
    /// member, or the seed itself for a single-structure chain.
    pub fn target(&self) -> StructureHandle {
        self.members.get(1).copied().unwrap_or(self.members[0])
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Among the neighbors of `node` not in `visited`, the one with the smallest
/// edge distance. Ties go to the higher-health structure, then to the
/// neighbor that was linked first.
pub fn nearest_unvisited_neighbor(
    node: StructureHandle,
    graph: &AdjacencyGraph,
    registry: &Registry,
    visited: &FnvHashSet<StructureHandle>,
) -> Option<StructureHandle> {
    let health = |handle: StructureHandle| registry.get(handle).map(|s| s.health()).unwrap_or(0);

    let mut nearest: Option<Edge> = None;
    let mut min_distance = grid_diagonal();

    for edge in graph.neighbors(node) {
        if visited.contains(&edge.to) {
            continue;
        }

        if edge.distance < min_distance {
            min_distance = edge.distance;
            nearest = Some(*edge);
        } else if edge.distance == min_distance {
            match nearest {
                Some(current) if health(edge.to) > health(current.to) => nearest = Some(*edge),
                None => nearest = Some(*edge),
                _ => {}
            }
        }
    }

    nearest.map(|edge| edge.to)
}

/// Walk from `seed`, always hopping to the nearest unvisited neighbor of the
/// current tail. The walk never backtracks.
pub fn walk_chain(seed: StructureHandle, graph: &AdjacencyGraph, registry: &Registry) -> Chain {
    let mut visited = FnvHashSet::default();
    visited.insert(seed);

    let mut members = vec![seed];
    let mut tail = seed;

    while let Some(next) = nearest_unvisited_neighbor(tail, graph, registry, &visited) {
        visited.insert(next);
        members.push(next);
        tail = next;
    }

    Chain { members }
}

/// One chain per live structure, longest first. Chains of equal length keep
/// the registry's creation order.
pub fn group_chains(graph: &AdjacencyGraph, registry: &Registry) -> Vec<Chain> {
    let chains = registry
        .live()
        .map(|(handle, _)| walk_chain(handle, graph, registry))
        .sorted_by(|a, b| b.len().cmp(&a.len()))
        .collect_vec();

    if let Some(longest) = chains.first() {
        debug!(
            "Grouped {} chains, longest has {} structures",
            chains.len(),
            longest.len()
        );
    }

    chains
}
