use std::cmp::Ordering;

use ndarray::Array2;

use crate::basin::BasinId;
use crate::error::{Error, Result};
use crate::graph::BasinGraph;
use crate::grid::Grid;
use crate::options::Options;

/// One step taken by the leveller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelEvent {
    Merge {
        into: BasinId,
        from: BasinId,
        elevation: u64,
        added_volume: u64,
    },
    Raise {
        basin: BasinId,
        from: u64,
        to: u64,
        stored_volume: u64,
    },
}

/// Outcome of levelling one grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelReport {
    /// Total water retained.
    pub volume: u64,
    /// Basins in the graph before any contraction.
    pub basins: usize,
    pub merges: usize,
    /// Merges between basins at different elevations. The leveller only ever
    /// contracts level neighbours, so this stays zero.
    pub unequal_merges: usize,
    pub raises: usize,
    /// Every merge and raise in order, when `Options::record_events` is set.
    pub events: Vec<LevelEvent>,
}

/// Floods every basin of `graph` up to the lowest level at which it drains,
/// either over the border or into a lower neighbour.
///
/// Basins are picked up in `options.order`; same-elevation neighbours are
/// contracted into the basin being settled, which is then raised to the
/// smaller of its escape height and its lowest higher neighbour until it
/// drains.
pub fn level(graph: &mut BasinGraph, options: &Options) -> Result<LevelReport> {
    let count = graph.basins.len();
    let mut leveller = Leveller {
        graph,
        visited: vec![false; count],
        report: LevelReport {
            basins: count,
            ..LevelReport::default()
        },
        record: options.record_events,
    };

    let order = options.order.arrange(leveller.graph.row_major());
    for id in order {
        if leveller.visited[id.0] {
            continue;
        }
        leveller.settle(id)?;
    }

    let mut report = leveller.report;
    report.volume = leveller.graph.basins.total_volume()?;
    Ok(report)
}

struct Leveller<'a> {
    graph: &'a mut BasinGraph,
    visited: Vec<bool>,
    report: LevelReport,
    record: bool,
}

impl Leveller<'_> {
    fn settle(&mut self, id: BasinId) -> Result<()> {
        self.visited[id.0] = true;
        loop {
            let basins = &self.graph.basins;
            let basin = &basins[id];
            let elevation = basin.elevation();

            let mut level = Vec::new();
            let mut lower = false;
            let mut min_higher: Option<u64> = None;
            for &n in basin.neighbors() {
                let h = basins[n].elevation();
                match h.cmp(&elevation) {
                    Ordering::Less => lower = true,
                    Ordering::Equal => level.push(n),
                    Ordering::Greater => {
                        min_higher = Some(min_higher.map_or(h, |m| m.min(h)))
                    }
                }
            }

            if !level.is_empty() {
                for n in level {
                    self.absorb(id, n)?;
                    self.visited[n.0] = true;
                }
                continue;
            }

            if lower || basin.can_escape() {
                return Ok(());
            }

            let target = match (basin.escape_height(), min_higher) {
                (Some(e), Some(h)) => e.min(h),
                (Some(e), None) => e,
                (None, Some(h)) => h,
                (None, None) => return Err(Error::Unbounded(id)),
            };
            self.raise(id, target)?;
        }
    }

    fn absorb(&mut self, into: BasinId, from: BasinId) -> Result<()> {
        let outcome = self.graph.basins.merge(into, from)?;
        self.report.merges += 1;
        if !outcome.level {
            self.report.unequal_merges += 1;
            log::warn!(
                "merged basin {from} into {into} across an elevation step, added {}",
                outcome.added_volume
            );
        }
        let elevation = self.graph.basins[into].elevation();
        log::trace!("basin {into} absorbed {from} at {elevation}");
        if self.record {
            self.report.events.push(LevelEvent::Merge {
                into,
                from,
                elevation,
                added_volume: outcome.added_volume,
            });
        }
        Ok(())
    }

    fn raise(&mut self, id: BasinId, target: u64) -> Result<()> {
        let from = self.graph.basins[id].elevation();
        let added = self.graph.basins.raise(id, target)?;
        self.report.raises += 1;
        log::trace!("basin {id} raised {from} -> {target}, +{added}");
        if self.record {
            let stored_volume = self.graph.basins[id].stored_volume();
            self.report.events.push(LevelEvent::Raise {
                basin: id,
                from,
                to: target,
                stored_volume,
            });
        }
        Ok(())
    }
}

/// Levels `grid` and reports what happened.
pub fn level_with(grid: &Grid, options: &Options) -> Result<LevelReport> {
    let mut graph = BasinGraph::build(grid);
    let report = level(&mut graph, options)?;
    let (rows, columns) = grid.dim();
    log::debug!(
        "{rows}x{columns} grid: volume {}, {} basins, {} merges, {} raises",
        report.volume,
        report.basins,
        report.merges,
        report.raises
    );
    Ok(report)
}

/// Total volume of water `grid` retains, processing basins in row-major order.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use basin_fill::{Grid, trapped_volume};
///
/// let grid = Grid::new(array![
///     [4, 5, 4],
///     [3, 1, 5],
///     [5, 4, 1],
/// ]);
/// assert_eq!(trapped_volume(&grid).unwrap(), 2);
/// ```
pub fn trapped_volume(grid: &Grid) -> Result<u64> {
    level_with(grid, &Options::default()).map(|report| report.volume)
}

/// Water surface after rain: the final basin level for interior cells, the
/// unchanged height for border cells.
pub fn water_surface(grid: &Grid) -> Result<Array2<u64>> {
    let mut graph = BasinGraph::build(grid);
    level(&mut graph, &Options::default())?;
    Ok(Array2::from_shape_fn(grid.dim(), |(row, column)| {
        match graph.owner(row, column) {
            Some(id) => graph.basins[id].elevation(),
            None => grid.height(row, column),
        }
    }))
}
