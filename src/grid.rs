use crate::constants::*;
use crate::error::*;
use crate::location::*;
use crate::registry::StructureHandle;
use crate::structure::*;
use bitflags::*;
use itertools::iproduct;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CellKind: u8 {
        const EMPTY = 1;
        const OCCUPIED = 2;
        const DESTROYED = 4;
        const MARKER = 8;
        /// Cells an attacker may stand on or next to.
        const CLEAR = Self::EMPTY.bits() | Self::DESTROYED.bits();
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(StructureHandle),
    Destroyed,
    Marker,
}

impl Cell {
    pub fn kind(self) -> CellKind {
        match self {
            Cell::Empty => CellKind::EMPTY,
            Cell::Occupied(_) => CellKind::OCCUPIED,
            Cell::Destroyed => CellKind::DESTROYED,
            Cell::Marker => CellKind::MARKER,
        }
    }

    pub fn is_clear(self) -> bool {
        self.kind().intersects(CellKind::CLEAR)
    }
}

/// A 44x44 array for grid-sized data, indexed by (row, col).
#[derive(Clone)]
pub struct GridArray<T: Copy> {
    data: Vec<T>,
}

impl<T: Copy> GridArray<T> {
    pub fn new(initial: T) -> Self {
        GridArray {
            data: vec![initial; (GRID_WIDTH as usize) * (GRID_HEIGHT as usize)],
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &T {
        let index = row * (GRID_WIDTH as usize) + col;
        &self.data[index]
    }

    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        let index = row * (GRID_WIDTH as usize) + col;
        &mut self.data[index]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        *self.get_mut(row, col) = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        self.data.iter().enumerate().map(|(i, v)| {
            let row = i / (GRID_WIDTH as usize);
            let col = i % (GRID_WIDTH as usize);
            ((row, col), v)
        })
    }
}

/// Occupancy of the base grid.
#[derive(Clone)]
pub struct Grid {
    cells: GridArray<Cell>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Grid {
            cells: GridArray::new(Cell::Empty),
        }
    }

    pub fn get(&self, loc: Location) -> Cell {
        *self.cells.get(loc.row() as usize, loc.col() as usize)
    }

    /// Cell at signed coordinates, `None` off the grid.
    pub fn get_rc(&self, row: i32, col: i32) -> Option<Cell> {
        Location::checked(row, col).map(|loc| self.get(loc))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.data.chunks(GRID_WIDTH as usize)
    }

    /// Number of cells of the given kind(s).
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells
            .iter()
            .filter(|(_, cell)| kind.intersects(cell.kind()))
            .count()
    }

    /// Mark a structure's footprint as occupied.
    ///
    /// The whole footprint must be on the grid and empty; otherwise nothing
    /// is written and the error is returned.
    pub fn place(&mut self, handle: StructureHandle, structure: &Structure) -> PlannerResult<()> {
        let label = || {
            format!(
                "{}_{}",
                structure.structure_type.short_name(),
                structure.id
            )
        };

        for (row, col) in structure.footprint() {
            match self.get_rc(row, col) {
                None => {
                    return Err(PlannerError::OutOfBounds {
                        label: label(),
                        row: structure.row(),
                        col: structure.col(),
                    })
                }
                Some(Cell::Empty) => {}
                Some(_) => {
                    return Err(PlannerError::Overlap {
                        label: label(),
                        row,
                        col,
                    })
                }
            }
        }

        for (row, col) in structure.footprint() {
            self.cells
                .set(row as usize, col as usize, Cell::Occupied(handle));
        }

        Ok(())
    }

    /// Mark every cell still owned by the structure as destroyed.
    pub fn destroy(&mut self, handle: StructureHandle, structure: &Structure) {
        for (row, col) in structure.footprint() {
            if let Some(loc) = Location::checked(row, col) {
                if self.get(loc) == Cell::Occupied(handle) {
                    self.cells.set(row as usize, col as usize, Cell::Destroyed);
                }
            }
        }
    }

    /// Put a marker on a clear cell. Returns false if the cell isn't clear.
    pub fn place_marker(&mut self, loc: Location) -> bool {
        if !self.get(loc).is_clear() {
            return false;
        }
        self.cells
            .set(loc.row() as usize, loc.col() as usize, Cell::Marker);
        true
    }

    /// A tile is valid for an attacker if it is clear itself and every cell
    /// `DEFAULT_CLEARANCE_OFFSET` away in the 8 principal directions is clear.
    pub fn is_valid_attacker_tile(&self, row: i32, col: i32) -> bool {
        self.is_valid_attacker_tile_with(row, col, DEFAULT_CLEARANCE_OFFSET)
    }

    /// Clearance test with an explicit probe offset. Probes that fall off the
    /// grid are skipped.
    pub fn is_valid_attacker_tile_with(&self, row: i32, col: i32, clearance: u8) -> bool {
        match self.get_rc(row, col) {
            Some(cell) if cell.is_clear() => {}
            _ => return false,
        }

        let offset = clearance as i32;
        DIRECTIONS_8.iter().all(|&(dr, dc)| {
            self.get_rc(row + dr as i32 * offset, col + dc as i32 * offset)
                .map(Cell::is_clear)
                .unwrap_or(true)
        })
    }

    /// Ring of on-grid cells around a footprint: inside the footprint grown by
    /// `outer` on every side, outside the footprint grown by `inner`.
    /// Returned in row-major order.
    pub fn surrounding_tiles(structure: &Structure, outer: u8, inner: u8) -> Vec<Location> {
        let (row, col, side) = (structure.row(), structure.col(), structure.side() as i32);
        let (outer, inner) = (outer as i32, inner as i32);

        let inside_inner = |r: i32, c: i32| {
            r >= row - inner && r < row + side + inner && c >= col - inner && c < col + side + inner
        };

        iproduct!(
            row - outer..row + side + outer,
            col - outer..col + side + outer
        )
        .filter(|&(r, c)| !inside_inner(r, c))
        .filter_map(|(r, c)| Location::checked(r, c))
        .collect()
    }
}
