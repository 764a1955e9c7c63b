use thiserror::Error;

use crate::basin::BasinId;

/// Everything that can go wrong while reading a grid or leveling its basins.
#[derive(Error, Debug)]
pub enum Error {
    #[error("line {line}: cannot parse {token:?} as a height")]
    Parse { line: usize, token: String },

    #[error("line {line}: expected \"rows columns\", got {found:?}")]
    Dimensions { line: usize, found: String },

    #[error("line {line}: row has {found} values, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("input ended after {line} lines, {missing} more expected")]
    Truncated { line: usize, missing: usize },

    #[error("negative height {value} at row {row}, column {column}")]
    NegativeHeight {
        row: usize,
        column: usize,
        value: i64,
    },

    #[error("unsupported raster sample type {0}")]
    UnsupportedSample(&'static str),

    #[error("raster has {found} samples, expected {expected}")]
    RasterSize { expected: usize, found: usize },

    #[error("basin {basin} cannot be lowered from {from} to {to}")]
    LoweringRaise { basin: BasinId, from: u64, to: u64 },

    #[error("stored volume of basin {basin} does not fit in 64 bits")]
    VolumeOverflow { basin: BasinId },

    #[error("basin {0} has no escape and no higher neighbour")]
    Unbounded(BasinId),

    #[error("basin {0} cannot absorb itself")]
    SelfMerge(BasinId),

    #[error("basin {0} is not live")]
    Dead(BasinId),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Tiff(#[from] tiff::TiffError),
}

pub type Result<T> = std::result::Result<T, Error>;
