//! Per-run analysis context.
//!
//! A `Board` owns the registry, the grid and the adjacency graph for exactly
//! one analysis run. Nothing is shared between runs.

use crate::chain::*;
use crate::error::*;
use crate::graph::AdjacencyGraph;
use crate::grid::*;
use crate::location::*;
use crate::placement::PlacementSearch;
use crate::registry::*;
use log::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A structure as handed over by detection: a type name and a grid-space
/// origin that may still be off the grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureSpec {
    pub structure_type: String,
    pub row: i32,
    pub col: i32,
}

impl StructureSpec {
    pub fn new(structure_type: impl Into<String>, row: i32, col: i32) -> Self {
        StructureSpec {
            structure_type: structure_type.into(),
            row,
            col,
        }
    }
}

#[derive(Clone, Default)]
pub struct Board {
    registry: Registry,
    grid: Grid,
    graph: AdjacencyGraph,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate a fresh board from structure specs and build its adjacency
    /// graph. Fails on the first unknown type or footprint that doesn't fit.
    pub fn populate(specs: &[StructureSpec]) -> PlannerResult<Self> {
        let mut board = Board::new();

        for spec in specs {
            board.insert(spec)?;
        }

        board.rebuild_graph();

        debug!(
            "Board populated with {} structures",
            board.registry.live_len()
        );

        Ok(board)
    }

    /// Register a structure and stamp its footprint on the grid. The graph
    /// is not updated; call `rebuild_graph` once all structures are in.
    pub fn insert(&mut self, spec: &StructureSpec) -> PlannerResult<StructureHandle> {
        let structure_type = spec.structure_type.parse()?;

        let origin = Location::checked(spec.row, spec.col).ok_or_else(|| PlannerError::OutOfBounds {
            label: spec.structure_type.clone(),
            row: spec.row,
            col: spec.col,
        })?;

        let handle = self.registry.insert(structure_type, origin);
        let placed = match self.registry.get(handle) {
            Some(structure) => self.grid.place(handle, structure),
            None => Ok(()),
        };

        if let Err(err) = placed {
            self.registry.remove(handle);
            return Err(err);
        }

        Ok(handle)
    }

    pub fn rebuild_graph(&mut self) {
        self.graph = AdjacencyGraph::build(&self.registry);
    }

    /// Knock a structure out: its cells become destroyed and it leaves the
    /// registry and the graph. Returns false if it was already gone.
    pub fn eliminate(&mut self, handle: StructureHandle) -> bool {
        if !self.registry.remove(handle) {
            return false;
        }

        if let Some(structure) = self.registry.get(handle) {
            self.grid.destroy(handle, structure);
        }
        self.graph.remove_node(handle);

        true
    }

    pub fn chains(&self) -> Vec<Chain> {
        group_chains(&self.graph, &self.registry)
    }

    /// Rank chains and place up to `count` markers. Markers stay on the grid.
    pub fn place_markers(&mut self, search: &PlacementSearch, count: usize) -> Vec<Location> {
        let chains = self.chains();

        search.place_markers(&mut self.grid, &self.registry, &chains, count)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn graph(&self) -> &AdjacencyGraph {
        &self.graph
    }
}

impl fmt::Display for Board {
    /// One line per row: `.` empty, `X` destroyed, `Z` marker, otherwise the
    /// first letter of the occupying structure's label.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.grid.rows() {
            let line = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => '.',
                    Cell::Destroyed => 'X',
                    Cell::Marker => 'Z',
                    Cell::Occupied(handle) => self.registry.label(*handle).chars().next().unwrap_or('?'),
                })
                .map(String::from)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
