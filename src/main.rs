use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use basin_fill::{
    Grid, Options, Order, array_to_rasterfile, rasterfile_to_grid, read_batch, solve_batch,
    water_surface,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliOrder {
    #[value(name = "row-major")]
    RowMajor,
    Reverse,
    Shuffle,
}

/// Volume of rain water each grid keeps, one line per grid
#[derive(Parser, Debug)]
#[command(name = "basin-fill", version, about)]
struct Cli {
    /// Text batch to read ("-" or nothing for stdin)
    input: Option<PathBuf>,

    /// Solve single-band integer TIFF rasters instead of a text batch
    #[arg(long, num_args = 1.., value_name = "FILE", conflicts_with = "input")]
    tiff: Vec<PathBuf>,

    /// Order in which basins are visited
    #[arg(long, value_enum, default_value_t = CliOrder::RowMajor)]
    order: CliOrder,

    /// Seed for --order shuffle
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Solve the grids of a batch in parallel
    #[arg(long)]
    parallel: bool,

    /// Write each grid's water surface to DIR/grid-<i>.tif
    #[arg(long, value_name = "DIR")]
    surface_dir: Option<PathBuf>,
}

impl Cli {
    fn options(&self) -> Options {
        let order = match self.order {
            CliOrder::RowMajor => Order::RowMajor,
            CliOrder::Reverse => Order::Reverse,
            CliOrder::Shuffle => Order::Shuffled(self.seed),
        };
        Options {
            order,
            parallel: self.parallel,
            record_events: false,
        }
    }

    fn grids(&self) -> Result<Vec<basin_fill::Result<Grid>>> {
        if !self.tiff.is_empty() {
            return Ok(self.tiff.iter().map(|path| rasterfile_to_grid(path)).collect());
        }
        let grids = match &self.input {
            Some(path) if path.as_os_str() != "-" => {
                let file = File::open(path)
                    .with_context(|| format!("cannot open {}", path.display()))?;
                read_batch(file)
            }
            _ => read_batch(io::stdin().lock()),
        };
        grids.context("cannot read grid batch")
    }
}

/// Writes the water surface of every parsed grid, returning how many could
/// not be written.
fn write_surfaces(dir: &Path, grids: &[Option<Grid>]) -> usize {
    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("cannot create {}: {e}", dir.display());
        return grids.iter().flatten().count();
    }
    let mut failed = 0;
    for (i, grid) in grids.iter().enumerate() {
        let Some(grid) = grid else { continue };
        let path = dir.join(format!("grid-{i}.tif"));
        let written = water_surface(grid).and_then(|surface| array_to_rasterfile(&surface, &path));
        if let Err(e) = written {
            failed += 1;
            eprintln!("grid {i}: cannot write {}: {e}", path.display());
        }
    }
    failed
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();
    let options = cli.options();

    let grids = cli.grids()?;
    log::info!("solving {} grids", grids.len());
    let kept: Vec<Option<Grid>> = match cli.surface_dir {
        Some(_) => grids.iter().map(|g| g.as_ref().ok().cloned()).collect(),
        None => Vec::new(),
    };

    let mut failed = 0;
    let mut out = BufWriter::new(io::stdout().lock());
    for (i, volume) in solve_batch(grids, &options).into_iter().enumerate() {
        match volume {
            Ok(volume) => writeln!(out, "{volume}")?,
            Err(e) => {
                failed += 1;
                eprintln!("grid {i}: {e}");
            }
        }
    }
    out.flush()?;

    if let Some(dir) = &cli.surface_dir {
        failed += write_surfaces(dir, &kept);
    }

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
