pub const GRID_WIDTH: u8 = 44;
pub const GRID_HEIGHT: u8 = 44;

/// Largest footprint side of any recognized structure (army camp, town hall).
pub const MAX_FOOTPRINT_SIDE: i32 = 4;

/// Two footprints closer than this many empty cells on both axes are adjacent.
pub const MAX_ADJACENT_GAP: i32 = 1;

/// Squared origin-to-origin radius used when looking for adjacency candidates.
///
/// Two adjacent footprints can have origins at most `MAX_FOOTPRINT_SIDE +
/// MAX_ADJACENT_GAP` apart on each axis; one extra cell of slack per axis keeps
/// the query radius at sqrt(72).
pub const ADJACENCY_QUERY_RADIUS_SQ: i32 =
    2 * (MAX_FOOTPRINT_SIDE + MAX_ADJACENT_GAP + 1) * (MAX_FOOTPRINT_SIDE + MAX_ADJACENT_GAP + 1);

/// Number of markers placed when the caller doesn't ask for a specific count.
pub const DEFAULT_MARKER_COUNT: usize = 6;

/// Outer margin of the candidate ring around a seed footprint.
pub const DEFAULT_RING_OUTER_MARGIN: u8 = 3;

/// Inner margin of the candidate ring; cells this close to the footprint are skipped.
pub const DEFAULT_RING_INNER_MARGIN: u8 = 1;

/// Offset at which the clearance test probes the 8 principal directions.
pub const DEFAULT_CLEARANCE_OFFSET: u8 = 2;

/// Offsets for the 8 principal directions, scaled by the clearance offset.
pub const DIRECTIONS_8: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Diagonal of the grid, used as an upper bound for edge distances.
pub fn grid_diagonal() -> f32 {
    ((GRID_WIDTH as f32).powi(2) + (GRID_HEIGHT as f32).powi(2)).sqrt()
}
