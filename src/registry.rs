//! Entity registry: the single owner of every structure in one analysis run.
//!
//! Other components refer to structures through `StructureHandle`, a stable
//! index into the registry's arena. Removal only flips the live flag, so a
//! handle never dangles and never gets reused within a run.

use crate::error::*;
use crate::location::*;
use crate::structure::*;
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

/// Non-owning reference to a structure held by a `Registry`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructureHandle(u32);

impl StructureHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, Default)]
pub struct Registry {
    structures: Vec<Structure>,
    live: Vec<bool>,
    live_len: usize,
    /// Next id to hand out per type. Ids are never reused after removal.
    next_ids: FnvHashMap<StructureType, u32>,
    live_counts: FnvHashMap<StructureType, u32>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a structure from a type name as reported by detection.
    pub fn create(&mut self, type_name: &str, origin: Location) -> PlannerResult<StructureHandle> {
        let structure_type = type_name.parse::<StructureType>()?;

        Ok(self.insert(structure_type, origin))
    }

    pub fn insert(&mut self, structure_type: StructureType, origin: Location) -> StructureHandle {
        let next_id = self.next_ids.entry(structure_type).or_insert(1);
        let id = *next_id;
        *next_id += 1;

        *self.live_counts.entry(structure_type).or_insert(0) += 1;

        let handle = StructureHandle(self.structures.len() as u32);
        self.structures.push(Structure {
            structure_type,
            id,
            origin,
        });
        self.live.push(true);
        self.live_len += 1;

        handle
    }

    /// Remove a structure from the live set.
    ///
    /// Returns `false` if the structure was already removed; the per-type
    /// counter is only decremented once.
    pub fn remove(&mut self, handle: StructureHandle) -> bool {
        match self.live.get_mut(handle.index()) {
            Some(live) if *live => {
                *live = false;
                self.live_len -= 1;

                let structure_type = self.structures[handle.index()].structure_type;
                if let Some(count) = self.live_counts.get_mut(&structure_type) {
                    *count = count.saturating_sub(1);
                }

                true
            }
            _ => false,
        }
    }

    /// Look up a structure. Removed structures are still returned so callers
    /// holding stale handles can read their geometry.
    pub fn get(&self, handle: StructureHandle) -> Option<&Structure> {
        self.structures.get(handle.index())
    }

    pub fn is_live(&self, handle: StructureHandle) -> bool {
        self.live.get(handle.index()).copied().unwrap_or(false)
    }

    /// Live structures in creation order.
    pub fn live(&self) -> impl Iterator<Item = (StructureHandle, &Structure)> {
        self.structures
            .iter()
            .zip(self.live.iter())
            .enumerate()
            .filter(|(_, (_, live))| **live)
            .map(|(index, (structure, _))| (StructureHandle(index as u32), structure))
    }

    pub fn live_len(&self) -> usize {
        self.live_len
    }

    pub fn is_empty(&self) -> bool {
        self.live_len == 0
    }

    pub fn live_count(&self, structure_type: StructureType) -> u32 {
        self.live_counts.get(&structure_type).copied().unwrap_or(0)
    }

    /// Short debugging label, e.g. `TH` or `CA_2` when several cannons are live.
    pub fn label(&self, handle: StructureHandle) -> String {
        match self.get(handle) {
            Some(structure) => {
                let short_name = structure.structure_type.short_name();
                if self.live_count(structure.structure_type) > 1 {
                    format!("{}_{}", short_name, structure.id)
                } else {
                    short_name.to_string()
                }
            }
            None => "??".to_string(),
        }
    }
}
