//! Bucketed point index for radius queries over grid locations.
//!
//! The grid is split into square buckets; a radius query only visits the
//! buckets overlapping the query circle's bounding box, so building the
//! adjacency graph stays close to linear in the number of structures.

use crate::location::*;
use fnv::FnvHashMap;

/// Side of a bucket, in cells.
const BUCKET_SIZE: i32 = 8;

pub struct SpatialIndex<T: Copy> {
    points: Vec<(Location, T)>,
    buckets: FnvHashMap<(i32, i32), Vec<usize>>,
}

impl<T: Copy> Default for SpatialIndex<T> {
    fn default() -> Self {
        SpatialIndex {
            points: Vec::new(),
            buckets: FnvHashMap::default(),
        }
    }
}

impl<T: Copy> SpatialIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, loc: Location, value: T) {
        let index = self.points.len();
        self.points.push((loc, value));
        self.buckets.entry(bucket_of(loc)).or_default().push(index);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All values whose location is within `radius_sq` (squared Euclidean
    /// distance, inclusive) of `center`, nearest first. Ties keep insertion
    /// order.
    pub fn query_radius(&self, center: Location, radius_sq: i32) -> Vec<T> {
        let radius = (radius_sq as f32).sqrt().ceil() as i32;
        let (row, col) = (center.row() as i32, center.col() as i32);

        let (min_bucket_row, min_bucket_col) = (
            (row - radius).max(0) / BUCKET_SIZE,
            (col - radius).max(0) / BUCKET_SIZE,
        );
        let (max_bucket_row, max_bucket_col) =
            ((row + radius) / BUCKET_SIZE, (col + radius) / BUCKET_SIZE);

        let mut hits: Vec<(i32, usize)> = Vec::new();
        for bucket_row in min_bucket_row..=max_bucket_row {
            for bucket_col in min_bucket_col..=max_bucket_col {
                if let Some(indices) = self.buckets.get(&(bucket_row, bucket_col)) {
                    for &index in indices {
                        let distance_sq = self.points[index].0.distance_sq_to(center);
                        if distance_sq <= radius_sq {
                            hits.push((distance_sq, index));
                        }
                    }
                }
            }
        }

        hits.sort_unstable();
        hits.into_iter()
            .map(|(_, index)| self.points[index].1)
            .collect()
    }
}

fn bucket_of(loc: Location) -> (i32, i32) {
    (
        loc.row() as i32 / BUCKET_SIZE,
        loc.col() as i32 / BUCKET_SIZE,
    )
}
