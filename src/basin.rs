use std::collections::BTreeSet;
use std::fmt;
use std::ops::Index;

use crate::error::{Error, Result};

/// Stable index of a basin in its arena. Never reused, even after the basin
/// has been absorbed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BasinId(pub usize);

impl fmt::Display for BasinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A region of interior cells that currently rises and falls as one body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Basin {
    id: BasinId,
    elevation: u64,
    area: u64,
    stored_volume: u64,
    escape_height: Option<u64>,
    neighbors: BTreeSet<BasinId>,
    absorbed_into: Option<BasinId>,
}

impl Basin {
    pub fn id(&self) -> BasinId {
        self.id
    }

    pub fn elevation(&self) -> u64 {
        self.elevation
    }

    pub fn area(&self) -> u64 {
        self.area
    }

    pub fn stored_volume(&self) -> u64 {
        self.stored_volume
    }

    /// Lowest border height directly next to any cell of this basin.
    pub fn escape_height(&self) -> Option<u64> {
        self.escape_height
    }

    pub fn neighbors(&self) -> &BTreeSet<BasinId> {
        &self.neighbors
    }

    pub fn is_live(&self) -> bool {
        self.absorbed_into.is_none()
    }

    /// True when water standing at the current elevation runs off the grid.
    pub fn can_escape(&self) -> bool {
        self.escape_height.is_some_and(|h| h <= self.elevation)
    }
}

/// What a call to [`Basins::merge`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Volume created by levelling the two sides, zero for equal elevations.
    pub added_volume: u64,
    /// Whether both sides stood at the same elevation when merged.
    pub level: bool,
}

/// Arena of basins addressed by [`BasinId`].
///
/// Adjacency lives in ordered index sets, so iterating a basin's neighbours is
/// deterministic and merging is a rewrite of those sets rather than a graph of
/// references pointing at each other.
#[derive(Clone, Debug, Default)]
pub struct Basins {
    basins: Vec<Basin>,
}

impl Basins {
    pub fn with_capacity(capacity: usize) -> Self {
        Basins {
            basins: Vec::with_capacity(capacity),
        }
    }

    /// Creates a single-cell basin at `elevation`.
    pub fn push(&mut self, elevation: u64) -> BasinId {
        let id = BasinId(self.basins.len());
        self.basins.push(Basin {
            id,
            elevation,
            area: 1,
            stored_volume: 0,
            escape_height: None,
            neighbors: BTreeSet::new(),
            absorbed_into: None,
        });
        id
    }

    /// Number of basins ever created, live or not.
    pub fn len(&self) -> usize {
        self.basins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.basins.is_empty()
    }

    pub fn get(&self, id: BasinId) -> Option<&Basin> {
        self.basins.get(id.0)
    }

    pub fn is_live(&self, id: BasinId) -> bool {
        self.get(id).is_some_and(Basin::is_live)
    }

    /// Ids of all basins not yet absorbed, ascending.
    pub fn live(&self) -> impl Iterator<Item = BasinId> + '_ {
        self.basins.iter().filter(|b| b.is_live()).map(|b| b.id)
    }

    /// Follows absorption links to the live basin that now owns `id`.
    pub fn resolve(&self, mut id: BasinId) -> BasinId {
        while let Some(next) = self.basins[id.0].absorbed_into {
            id = next;
        }
        id
    }

    /// Adds a symmetric edge. Self edges and duplicates are ignored.
    pub fn connect(&mut self, a: BasinId, b: BasinId) {
        if a == b {
            return;
        }
        self.basins[a.0].neighbors.insert(b);
        self.basins[b.0].neighbors.insert(a);
    }

    /// Folds one border height into the basin's escape height.
    pub fn add_escape(&mut self, id: BasinId, height: u64) {
        let basin = &mut self.basins[id.0];
        basin.escape_height = Some(basin.escape_height.map_or(height, |h| h.min(height)));
    }

    /// Raises a basin to `target`, returning the volume of water added.
    ///
    /// Raising to a lower elevation is a contract violation and is reported,
    /// never clamped.
    pub fn raise(&mut self, id: BasinId, target: u64) -> Result<u64> {
        self.check_live(id)?;
        let basin = &mut self.basins[id.0];
        if target < basin.elevation {
            return Err(Error::LoweringRaise {
                basin: id,
                from: basin.elevation,
                to: target,
            });
        }
        let overflow = || Error::VolumeOverflow { basin: id };
        let added = (target - basin.elevation)
            .checked_mul(basin.area)
            .ok_or_else(overflow)?;
        basin.stored_volume = basin
            .stored_volume
            .checked_add(added)
            .ok_or_else(overflow)?;
        basin.elevation = target;
        Ok(added)
    }

    /// Folds `from` into `into`: areas, stored volumes and escape heights are
    /// combined and every edge of `from` is moved over to `into`.
    ///
    /// If the elevations differ the lower side is first levelled up to the
    /// higher one, adding the difference times the lower side's area.
    pub fn merge(&mut self, into: BasinId, from: BasinId) -> Result<MergeOutcome> {
        self.check_live(into)?;
        self.check_live(from)?;
        if into == from {
            return Err(Error::SelfMerge(into));
        }

        let absorbed = &self.basins[from.0];
        let basin = &self.basins[into.0];
        let level = absorbed.elevation == basin.elevation;
        let overflow = || Error::VolumeOverflow { basin: into };

        // nothing is written until every sum is known to fit
        let added_volume = if absorbed.elevation > basin.elevation {
            (absorbed.elevation - basin.elevation).checked_mul(basin.area)
        } else {
            (basin.elevation - absorbed.elevation).checked_mul(absorbed.area)
        }
        .ok_or_else(overflow)?;
        let stored_volume = basin
            .stored_volume
            .checked_add(absorbed.stored_volume)
            .and_then(|v| v.checked_add(added_volume))
            .ok_or_else(overflow)?;
        let area = basin.area.checked_add(absorbed.area).ok_or_else(overflow)?;
        let elevation = basin.elevation.max(absorbed.elevation);
        let from_escape = absorbed.escape_height;

        let basin = &mut self.basins[into.0];
        basin.elevation = elevation;
        basin.stored_volume = stored_volume;
        basin.area = area;
        if let Some(h) = from_escape {
            self.add_escape(into, h);
        }

        // detach the shared edge before walking the absorbed basin's edges
        self.basins[into.0].neighbors.remove(&from);
        let absorbed = &mut self.basins[from.0];
        absorbed.neighbors.remove(&into);
        let moved = std::mem::take(&mut absorbed.neighbors);
        absorbed.absorbed_into = Some(into);

        for other in moved {
            self.basins[other.0].neighbors.remove(&from);
            self.connect(into, other);
        }

        Ok(MergeOutcome {
            added_volume,
            level,
        })
    }

    /// Sum of stored volume over live basins. Absorbed basins are counted
    /// through their absorber.
    pub fn total_volume(&self) -> Result<u64> {
        self.basins
            .iter()
            .filter(|b| b.is_live())
            .try_fold(0u64, |total, b| {
                total
                    .checked_add(b.stored_volume)
                    .ok_or(Error::VolumeOverflow { basin: b.id })
            })
    }

    fn check_live(&self, id: BasinId) -> Result<()> {
        if self.is_live(id) {
            Ok(())
        } else {
            Err(Error::Dead(id))
        }
    }
}

impl Index<BasinId> for Basins {
    type Output = Basin;

    fn index(&self, id: BasinId) -> &Basin {
        &self.basins[id.0]
    }
}
