//! Text batches: a grid count, then for every grid a `rows columns` line
//! followed by `rows` lines of space separated heights.
//!
//! ```text
//! 2
//! 3 3
//! 4 5 4
//! 3 1 5
//! 5 4 1
//! 1 2
//! 7 7
//! ```
use std::io::Read;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::level::level_with;
use crate::options::Options;

/// Numbered non-blank lines.
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last: usize,
}

impl<'a> Lines<'a> {
    fn new(input: &'a str) -> Self {
        Lines {
            inner: input.lines().enumerate(),
            last: 0,
        }
    }

    fn next_line(&mut self, missing: usize) -> Result<(usize, &'a str)> {
        for (i, text) in self.inner.by_ref() {
            self.last = i + 1;
            if !text.trim().is_empty() {
                return Ok((i + 1, text));
            }
        }
        Err(Error::Truncated {
            line: self.last,
            missing,
        })
    }
}

/// Parses a whole batch.
///
/// The outer error is fatal: the count or a dimensions line could not be
/// read, or the input stops early. A bad row only fails its own grid, the
/// rest of the batch still parses.
pub fn parse_batch(input: &str) -> Result<Vec<Result<Grid>>> {
    let mut lines = Lines::new(input);
    let (line, text) = lines.next_line(1)?;
    let count: usize = text
        .trim()
        .parse()
        .map_err(|_| Error::Parse {
            line,
            token: text.trim().to_string(),
        })?;

    // counts come from the input, so they only bound the loops
    let mut grids = Vec::new();
    for _ in 0..count {
        let (line, text) = lines.next_line(1)?;
        let (rows, columns) = parse_dimensions(line, text)?;

        let mut parsed: Result<Vec<Vec<u64>>> = Ok(Vec::new());
        for remaining in (1..=rows).rev() {
            let (line, text) = lines.next_line(remaining)?;
            parsed = parsed.and_then(|mut heights| {
                heights.push(parse_row(line, rows - remaining, text, columns)?);
                Ok(heights)
            });
        }
        grids.push(parsed.and_then(Grid::from_rows));
    }
    Ok(grids)
}

/// Reads and parses a batch from any reader, stdin included.
pub fn read_batch<R: Read>(mut reader: R) -> Result<Vec<Result<Grid>>> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    parse_batch(&input)
}

/// Volume of every grid, in arrival order. A failed grid does not stop the
/// others.
pub fn solve_batch(grids: Vec<Result<Grid>>, options: &Options) -> Vec<Result<u64>> {
    let solve = |grid: Result<Grid>| {
        grid.and_then(|g| level_with(&g, options))
            .map(|r| r.volume)
    };
    if options.parallel {
        grids.into_par_iter().map(solve).collect()
    } else {
        grids.into_iter().map(solve).collect()
    }
}

fn parse_dimensions(line: usize, text: &str) -> Result<(usize, usize)> {
    let bad = || Error::Dimensions {
        line,
        found: text.trim().to_string(),
    };
    let mut fields = text.split_whitespace().map(str::parse::<usize>);
    match (fields.next(), fields.next(), fields.next()) {
        (Some(Ok(rows)), Some(Ok(columns)), None) if rows >= 1 && columns >= 1 => {
            Ok((rows, columns))
        }
        _ => Err(bad()),
    }
}

fn parse_row(line: usize, row: usize, text: &str, columns: usize) -> Result<Vec<u64>> {
    let heights = text
        .split_whitespace()
        .enumerate()
        .map(|(column, token)| parse_height(line, row, column, token))
        .collect::<Result<Vec<u64>>>()?;
    if heights.len() != columns {
        return Err(Error::RaggedRow {
            line,
            expected: columns,
            found: heights.len(),
        });
    }
    Ok(heights)
}

fn parse_height(line: usize, row: usize, column: usize, token: &str) -> Result<u64> {
    if let Ok(height) = token.parse::<u64>() {
        return Ok(height);
    }
    match token.parse::<i64>() {
        Ok(value) if value < 0 => Err(Error::NegativeHeight { row, column, value }),
        _ => Err(Error::Parse {
            line,
            token: token.to_string(),
        }),
    }
}
