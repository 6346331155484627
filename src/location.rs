use crate::constants::*;
use serde::*;

/// A cell on the 44x44 base grid.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Location {
    packed: u16,
}

impl Location {
    pub fn from_coords(row: u32, col: u32) -> Self {
        Location {
            packed: ((row << 8) | col) as u16,
        }
    }

    /// Build a location from signed coordinates, returning `None` when the
    /// coordinates fall outside the grid.
    pub fn checked(row: i32, col: i32) -> Option<Self> {
        if in_bounds(row, col) {
            Some(Location::from_coords(row as u32, col as u32))
        } else {
            None
        }
    }

    #[inline]
    pub fn row(self) -> u8 {
        ((self.packed >> 8) & 0xFF) as u8
    }

    #[inline]
    pub fn col(self) -> u8 {
        (self.packed & 0xFF) as u8
    }

    #[inline]
    pub fn packed_repr(self) -> u16 {
        self.packed
    }

    #[inline]
    pub fn from_packed(packed: u16) -> Self {
        Location { packed }
    }

    /// Offset this location, returning `None` if the result leaves the grid.
    pub fn offset(self, d_row: i32, d_col: i32) -> Option<Self> {
        Location::checked(self.row() as i32 + d_row, self.col() as i32 + d_col)
    }

    pub fn distance_to(self, other: Self) -> f32 {
        let dr = self.row() as f32 - other.row() as f32;
        let dc = self.col() as f32 - other.col() as f32;

        (dr * dr + dc * dc).sqrt()
    }

    pub fn distance_sq_to(self, other: Self) -> i32 {
        let dr = self.row() as i32 - other.row() as i32;
        let dc = self.col() as i32 - other.col() as i32;

        dr * dr + dc * dc
    }

    pub fn as_tuple(self) -> (u8, u8) {
        (self.row(), self.col())
    }
}

#[inline]
pub fn in_bounds(row: i32, col: i32) -> bool {
    (0..GRID_HEIGHT as i32).contains(&row) && (0..GRID_WIDTH as i32).contains(&col)
}

impl Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.packed_repr().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let packed = u16::deserialize(deserializer)?;
        let loc = Location::from_packed(packed);
        if !in_bounds(loc.row() as i32, loc.col() as i32) {
            return Err(de::Error::custom("location outside of grid"));
        }
        Ok(loc)
    }
}
