//! Detection results and the projection between image pixels and the grid.
//!
//! The detector reports axis-aligned boxes on a screenshot where the base
//! grid appears as a diamond. Projecting onto the grid rotates the box anchors
//! by 45 degrees around the center of the detected base; markers go back
//! through the inverse rotation around the grid center.

use crate::board::StructureSpec;
use crate::constants::*;
use crate::error::*;
use crate::location::Location;
use crate::structure::StructureType;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class: String,
    /// Box center, in pixels.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub confidence: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub image: ImageInfo,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

/// Map a detector class label to a structure type.
pub fn structure_type_for_class(class: &str) -> PlannerResult<StructureType> {
    let structure_type = match class {
        "BOMB" => StructureType::Bomb,
        "HUT" => StructureType::Hut,
        "CANNON" => StructureType::Cannon,
        "LAB" => StructureType::Laboratory,
        "TOWER" => StructureType::ArcherTower,
        "MORTAR" => StructureType::Mortar,
        "CC" => StructureType::ClanCastle,
        "GS" => StructureType::GoldStorage,
        "ES" => StructureType::ElixirStorage,
        "GM" => StructureType::GoldMine,
        "EM" => StructureType::ElixirMine,
        "BARRACKS" => StructureType::Barracks,
        "CAMP" => StructureType::ArmyCamp,
        "TH" => StructureType::TownHall,
        _ => return Err(PlannerError::UnknownStructureType(class.to_string())),
    };

    Ok(structure_type)
}

/// Rotate `(x, y)` around `(cx, cy)` by `degrees`, clockwise in image space.
pub fn rotate(x: f32, y: f32, cx: f32, cy: f32, degrees: f32) -> (f32, f32) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (dx, dy) = (x - cx, y - cy);

    (dx * cos + dy * sin + cx, -dx * sin + dy * cos + cy)
}

fn grid_side() -> f32 {
    GRID_WIDTH as f32
}

impl DetectionResult {
    pub fn from_json(json: &str) -> PlannerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pixel bounding box of every prediction: (min_x, min_y, max_x, max_y).
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        self.predictions.iter().fold(None, |acc, p| {
            let (left, top) = (p.x - p.width / 2.0, p.y - p.height / 2.0);
            let (right, bottom) = (p.x + p.width / 2.0, p.y + p.height / 2.0);

            Some(match acc {
                None => (left, top, right, bottom),
                Some((min_x, min_y, max_x, max_y)) => (
                    min_x.min(left),
                    min_y.min(top),
                    max_x.max(right),
                    max_y.max(bottom),
                ),
            })
        })
    }

    /// Project every prediction onto the grid.
    ///
    /// Pixel coordinates are scaled so the image spans the diamond's diagonal,
    /// then each box's anchor (center shifted left by its width) is rotated 45
    /// degrees around the center of the detected base and rescaled to grid
    /// cells. Origins are rounded and may land off the grid; `Board` rejects
    /// those.
    pub fn to_structure_specs(&self) -> PlannerResult<Vec<StructureSpec>> {
        let (min_x, min_y, max_x, max_y) = match self.bounds() {
            Some(bounds) => bounds,
            None => return Ok(Vec::new()),
        };

        let diamond = grid_diagonal();
        let scale_x = self.image.width / diamond;
        let scale_y = self.image.height / diamond;

        let center_x = (min_x + (max_x - min_x) / 2.0) / scale_x;
        let center_y = (min_y + (max_y - min_y) / 2.0) / scale_y;

        self.predictions
            .iter()
            .map(|p| {
                let structure_type = structure_type_for_class(&p.class)?;

                let anchor_x = p.x / scale_x - p.width / scale_x;
                let anchor_y = p.y / scale_y;

                let (row, col) = rotate(anchor_y, anchor_x, center_y, center_x, 45.0);
                let row = (row / diamond * grid_side()).round() as i32;
                let col = (col / diamond * grid_side()).round() as i32;

                Ok(StructureSpec::new(structure_type.name(), row, col))
            })
            .collect()
    }

    /// Map grid markers back to pixel (x, y) coordinates on the source image.
    pub fn unproject_markers(&self, markers: &[Location]) -> Vec<(f32, f32)> {
        let center = grid_side() / 2.0;

        markers
            .iter()
            .map(|marker| {
                let (row, col) = rotate(
                    marker.row() as f32,
                    marker.col() as f32,
                    center,
                    center,
                    -45.0,
                );
                let y = row / grid_side() * self.image.height;
                let x = col / grid_side() * self.image.width;
                (x, y)
            })
            .collect()
    }
}
