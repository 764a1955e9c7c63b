use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::Array2;
use num::ToPrimitive;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{TiffEncoder, colortype};

use crate::error::{Error, Result};
use crate::grid::Grid;

/// Reads the first band of a single-band integer TIFF as a grid.
///
/// Any signed or unsigned integer sample width is accepted; negative samples
/// and floating point rasters are rejected.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use basin_fill::{rasterfile_to_grid, trapped_volume};
///
/// let grid = rasterfile_to_grid(Path::new("dem.tif"))?;
/// println!("{}", trapped_volume(&grid)?);
/// # Ok::<(), basin_fill::Error>(())
/// ```
pub fn rasterfile_to_grid(path: &Path) -> Result<Grid> {
    let mut decoder = Decoder::new(BufReader::new(File::open(path)?))?;
    let (width, height) = decoder.dimensions()?;
    let (rows, columns) = (height as usize, width as usize);

    let heights = match decoder.read_image()? {
        DecodingResult::U8(v) => to_heights(&v, columns)?,
        DecodingResult::U16(v) => to_heights(&v, columns)?,
        DecodingResult::U32(v) => to_heights(&v, columns)?,
        DecodingResult::U64(v) => to_heights(&v, columns)?,
        DecodingResult::I8(v) => to_heights(&v, columns)?,
        DecodingResult::I16(v) => to_heights(&v, columns)?,
        DecodingResult::I32(v) => to_heights(&v, columns)?,
        DecodingResult::I64(v) => to_heights(&v, columns)?,
        DecodingResult::F32(_) => return Err(Error::UnsupportedSample("f32")),
        DecodingResult::F64(_) => return Err(Error::UnsupportedSample("f64")),
    };

    let found = heights.len();
    let heights = Array2::from_shape_vec((rows, columns), heights)
        .map_err(|_| Error::RasterSize {
            expected: rows * columns,
            found,
        })?;
    log::debug!("read {rows}x{columns} grid from {}", path.display());
    Ok(Grid::new(heights))
}

/// Writes heights (a grid or a water surface) as a 64-bit grayscale TIFF.
pub fn array_to_rasterfile(heights: &Array2<u64>, path: &Path) -> Result<()> {
    let (rows, columns) = heights.dim();
    let data: Vec<u64> = heights.iter().copied().collect();
    let mut encoder = TiffEncoder::new(BufWriter::new(File::create(path)?))?;
    encoder.write_image::<colortype::Gray64>(columns as u32, rows as u32, &data)?;
    log::debug!("wrote {rows}x{columns} raster to {}", path.display());
    Ok(())
}

fn to_heights<T: ToPrimitive>(samples: &[T], columns: usize) -> Result<Vec<u64>> {
    let columns = columns.max(1);
    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            sample.to_u64().ok_or_else(|| Error::NegativeHeight {
                row: i / columns,
                column: i % columns,
                value: sample.to_i64().unwrap_or(i64::MIN),
            })
        })
        .collect()
}
