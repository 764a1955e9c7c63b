use ndarray::Array2;

use crate::error::{Error, Result};

/// Row/column offsets of the four axis-aligned neighbours.
pub const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];

/// Immutable rectangular height field.
///
/// The outer ring of cells is the border: it never holds water and acts as a
/// spillway for everything inside it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    heights: Array2<u64>,
}

impl Grid {
    pub fn new(heights: Array2<u64>) -> Self {
        Grid { heights }
    }

    /// Builds a grid from rows, rejecting ragged input.
    ///
    /// # Example
    ///
    /// ```
    /// use basin_fill::Grid;
    ///
    /// let grid = Grid::from_rows(vec![vec![4, 5, 4], vec![3, 1, 5], vec![5, 4, 1]])
    ///     .expect("rectangular rows");
    /// assert_eq!(grid.dim(), (3, 3));
    /// ```
    pub fn from_rows(rows: Vec<Vec<u64>>) -> Result<Self> {
        let columns = rows.first().map_or(0, Vec::len);
        let mut flat = Vec::with_capacity(rows.len() * columns);
        for (line, row) in rows.iter().enumerate() {
            if row.len() != columns {
                return Err(Error::RaggedRow {
                    line: line + 1,
                    expected: columns,
                    found: row.len(),
                });
            }
            flat.extend_from_slice(row);
        }
        let found = flat.len();
        let heights = Array2::from_shape_vec((rows.len(), columns), flat)
            .map_err(|_| Error::RasterSize {
                expected: rows.len() * columns,
                found,
            })?;
        Ok(Grid { heights })
    }

    pub fn dim(&self) -> (usize, usize) {
        self.heights.dim()
    }

    pub fn heights(&self) -> &Array2<u64> {
        &self.heights
    }

    pub fn height(&self, row: usize, column: usize) -> u64 {
        self.heights[[row, column]]
    }

    /// Number of interior cells.
    pub fn interior_len(&self) -> usize {
        let (rows, columns) = self.dim();
        rows.saturating_sub(2) * columns.saturating_sub(2)
    }

    /// In-bounds 4-neighbours of a cell.
    pub fn neighbours(
        &self,
        row: usize,
        column: usize,
    ) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (rows, columns) = self.dim();
        DIRECTIONS.iter().filter_map(move |&(dr, dc)| {
            let r = row.checked_add_signed(dr)?;
            let c = column.checked_add_signed(dc)?;
            (r < rows && c < columns).then_some((r, c))
        })
    }
}

impl From<Array2<u64>> for Grid {
    fn from(heights: Array2<u64>) -> Self {
        Grid::new(heights)
    }
}
