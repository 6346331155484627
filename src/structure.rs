use crate::error::*;
use crate::location::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every structure type the base detector can report.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StructureType {
    Bomb,
    Hut,
    Cannon,
    Laboratory,
    ArcherTower,
    Mortar,
    ClanCastle,
    GoldStorage,
    ElixirStorage,
    GoldMine,
    ElixirMine,
    Barracks,
    ArmyCamp,
    TownHall,
}

pub const ALL_STRUCTURE_TYPES: [StructureType; 14] = [
    StructureType::Bomb,
    StructureType::Hut,
    StructureType::Cannon,
    StructureType::Laboratory,
    StructureType::ArcherTower,
    StructureType::Mortar,
    StructureType::ClanCastle,
    StructureType::GoldStorage,
    StructureType::ElixirStorage,
    StructureType::GoldMine,
    StructureType::ElixirMine,
    StructureType::Barracks,
    StructureType::ArmyCamp,
    StructureType::TownHall,
];

/// Hit points by structure type. Types missing from this table have 0 health.
const HEALTH_TABLE: &[(StructureType, u32)] = &[
    (StructureType::Bomb, 73),
    (StructureType::Hut, 250),
    (StructureType::Cannon, 420),
    (StructureType::Laboratory, 500),
    (StructureType::ArcherTower, 380),
    (StructureType::Mortar, 400),
    (StructureType::ClanCastle, 1200),
    (StructureType::GoldStorage, 400),
    (StructureType::ElixirStorage, 400),
    (StructureType::GoldMine, 400),
    (StructureType::ElixirMine, 400),
    (StructureType::Barracks, 250),
    (StructureType::ArmyCamp, 150),
    (StructureType::TownHall, 1600),
];

impl StructureType {
    /// Number of cells covered by the footprint.
    pub fn footprint_area(self) -> u32 {
        match self {
            StructureType::Bomb => 1,
            StructureType::Hut => 4,
            StructureType::ArmyCamp | StructureType::TownHall => 16,
            _ => 9,
        }
    }

    /// Side length of the square footprint.
    pub fn footprint_side(self) -> u8 {
        match self.footprint_area() {
            1 => 1,
            4 => 2,
            9 => 3,
            _ => 4,
        }
    }

    pub fn health(self) -> u32 {
        HEALTH_TABLE
            .iter()
            .find(|(ty, _)| *ty == self)
            .map(|(_, hp)| *hp)
            .unwrap_or(0)
    }

    pub fn name(self) -> &'static str {
        match self {
            StructureType::Bomb => "Bomb",
            StructureType::Hut => "Hut",
            StructureType::Cannon => "Cannon",
            StructureType::Laboratory => "Laboratory",
            StructureType::ArcherTower => "ArcherTower",
            StructureType::Mortar => "Mortar",
            StructureType::ClanCastle => "ClanCastle",
            StructureType::GoldStorage => "GoldStorage",
            StructureType::ElixirStorage => "ElixirStorage",
            StructureType::GoldMine => "GoldMine",
            StructureType::ElixirMine => "ElixirMine",
            StructureType::Barracks => "Barracks",
            StructureType::ArmyCamp => "ArmyCamp",
            StructureType::TownHall => "TownHall",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            StructureType::Bomb => "BO",
            StructureType::Hut => "HU",
            StructureType::Cannon => "CA",
            StructureType::Laboratory => "LA",
            StructureType::ArcherTower => "AT",
            StructureType::Mortar => "MO",
            StructureType::ClanCastle => "CC",
            StructureType::GoldStorage => "GS",
            StructureType::ElixirStorage => "ES",
            StructureType::GoldMine => "GM",
            StructureType::ElixirMine => "EM",
            StructureType::Barracks => "BA",
            StructureType::ArmyCamp => "AC",
            StructureType::TownHall => "TH",
        }
    }
}

impl FromStr for StructureType {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Older detector exports spell the laboratory without the 'o'.
        if s == "Labratory" {
            return Ok(StructureType::Laboratory);
        }

        ALL_STRUCTURE_TYPES
            .iter()
            .copied()
            .find(|ty| ty.name() == s)
            .ok_or_else(|| PlannerError::UnknownStructureType(s.to_string()))
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A placed building. Identity is the type plus a per-type sequence number.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Structure {
    pub structure_type: StructureType,
    pub id: u32,
    pub origin: Location,
}

impl Structure {
    pub fn side(&self) -> u8 {
        self.structure_type.footprint_side()
    }

    pub fn health(&self) -> u32 {
        self.structure_type.health()
    }

    pub fn row(&self) -> i32 {
        self.origin.row() as i32
    }

    pub fn col(&self) -> i32 {
        self.origin.col() as i32
    }

    /// Every cell covered by the footprint, including ones that would fall
    /// off the grid, as signed (row, col) pairs.
    pub fn footprint(&self) -> impl Iterator<Item = (i32, i32)> {
        let (row, col, side) = (self.row(), self.col(), self.side() as i32);
        (row..row + side).flat_map(move |r| (col..col + side).map(move |c| (r, c)))
    }
}
