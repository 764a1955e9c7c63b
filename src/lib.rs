//! # Basin-fill
//!
//! `basin-fill` works out how much rain water an integer elevation grid keeps once everything
//! that can drain has drained.  Water only leaves over the outer border of the grid; the border
//! cells themselves never flood and act as a spillway.
//!
//! Every interior cell starts as its own basin.  Basins standing at the same level as a
//! neighbour are contracted into one, and a basin with nowhere lower to go is raised to the
//! lowest of its border escape height and its higher neighbours, storing `rise * area` of water
//! on the way.  The total does not depend on the order basins are visited in.
//!
//! ## Example
//!
//! ```
//! use ndarray::array;
//! use basin_fill::{Grid, trapped_volume, water_surface};
//!
//! let grid = Grid::new(array![
//!     [5, 3, 4, 5],
//!     [6, 2, 1, 4],
//!     [3, 1, 1, 4],
//!     [8, 5, 4, 3],
//! ]);
//!
//! assert_eq!(trapped_volume(&grid).unwrap(), 7);
//! assert_eq!(water_surface(&grid).unwrap()[[1, 1]], 3);
//! ```
pub mod basin;
pub mod batch;
pub mod error;
pub mod graph;
pub mod grid;
pub mod level;
pub mod options;
pub mod raster;

pub use basin::{Basin, BasinId, Basins, MergeOutcome};
pub use batch::{parse_batch, read_batch, solve_batch};
pub use error::{Error, Result};
pub use graph::BasinGraph;
pub use grid::Grid;
pub use level::{LevelEvent, LevelReport, level, level_with, trapped_volume, water_surface};
pub use options::{Options, Order};
pub use raster::{array_to_rasterfile, rasterfile_to_grid};
