use ndarray::Array2;

use crate::basin::{BasinId, Basins};
use crate::grid::Grid;

/// Basins over the interior of one grid, plus the map from each interior cell
/// to the basin it started in.
#[derive(Clone, Debug)]
pub struct BasinGraph {
    pub basins: Basins,
    cells: Array2<Option<BasinId>>,
}

impl BasinGraph {
    /// One basin per interior cell, 4-connected to its interior neighbours,
    /// with every directly adjacent border height folded into its escape
    /// height. Grids without an interior give an empty graph.
    pub fn build(grid: &Grid) -> Self {
        let (rows, columns) = grid.dim();
        let mut basins = Basins::with_capacity(grid.interior_len());
        let mut cells = Array2::from_elem((rows, columns), None);

        for row in 1..rows.saturating_sub(1) {
            for column in 1..columns.saturating_sub(1) {
                cells[[row, column]] = Some(basins.push(grid.height(row, column)));
            }
        }

        for ((row, column), cell) in cells.indexed_iter() {
            let Some(id) = *cell else { continue };
            for (r, c) in grid.neighbours(row, column) {
                match cells[[r, c]] {
                    Some(other) => basins.connect(id, other),
                    None => basins.add_escape(id, grid.height(r, c)),
                }
            }
        }

        log::trace!("built {} basins for a {}x{} grid", basins.len(), rows, columns);
        BasinGraph { basins, cells }
    }

    /// Basin the interior cell started in, `None` for border cells.
    pub fn origin(&self, row: usize, column: usize) -> Option<BasinId> {
        self.cells.get([row, column]).copied().flatten()
    }

    /// Live basin that currently owns the interior cell.
    pub fn owner(&self, row: usize, column: usize) -> Option<BasinId> {
        self.origin(row, column).map(|id| self.basins.resolve(id))
    }

    /// Basin ids in row-major order of their cells.
    pub fn row_major(&self) -> Vec<BasinId> {
        self.cells.iter().filter_map(|cell| *cell).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_degenerate_grids_have_no_basins() {
        let degenerate = [
            array![[1u64]],
            array![[1, 2, 3], [4, 5, 6]],
            array![[1, 2], [3, 4], [5, 6]],
        ];
        for heights in degenerate {
            let graph = BasinGraph::build(&Grid::new(heights));
            assert!(graph.basins.is_empty());
            assert_eq!(graph.origin(0, 0), None);
        }
    }

    #[test]
    fn test_single_interior_cell_collects_all_border_heights() {
        let grid = Grid::new(array![[4, 5, 4], [3, 1, 5], [5, 4, 1]]);
        let graph = BasinGraph::build(&grid);
        let id = graph.origin(1, 1).unwrap();
        let basin = &graph.basins[id];
        assert_eq!(basin.elevation(), 1);
        assert_eq!(basin.area(), 1);
        assert_eq!(basin.escape_height(), Some(3));
        assert!(basin.neighbors().is_empty());
    }

    #[test]
    fn test_adjacency_and_escape_per_cell() {
        let grid = Grid::new(array![
            [9, 9, 9, 9, 9],
            [9, 1, 2, 3, 9],
            [9, 4, 5, 6, 9],
            [9, 7, 8, 0, 9],
            [9, 9, 2, 9, 9],
        ]);
        let graph = BasinGraph::build(&grid);
        assert_eq!(graph.basins.len(), 9);

        let centre = graph.origin(2, 2).unwrap();
        assert_eq!(graph.basins[centre].neighbors().len(), 4);
        assert_eq!(graph.basins[centre].escape_height(), None);

        let corner = graph.origin(1, 1).unwrap();
        let expected: Vec<_> = [(1, 2), (2, 1)]
            .iter()
            .map(|&(r, c)| graph.origin(r, c).unwrap())
            .collect();
        assert_eq!(graph.basins[corner].neighbors().iter().copied().collect::<Vec<_>>(), expected);
        assert_eq!(graph.basins[corner].escape_height(), Some(9));

        let bottom = graph.origin(3, 2).unwrap();
        assert_eq!(graph.basins[bottom].escape_height(), Some(2));

        for id in graph.row_major() {
            for &n in graph.basins[id].neighbors() {
                assert!(graph.basins[n].neighbors().contains(&id));
            }
        }
    }
}
