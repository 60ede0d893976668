//! Tabular data validation and serialization
//!
//! Plot data travels to gnuplot through plain-text tables of
//! whitespace-separated numeric columns. This module validates inputs
//! before any side effect and writes the column layouts gnuplot expects:
//! x; x,y; x,y,dy; x,y,z; or row-grouped x,y,z for grids with a blank
//! line between groups.
//!
//! Validation always happens before a file is touched, preserving the
//! no-partial-effect guarantee for rejected inputs. An I/O failure
//! mid-write may leave a partially written file on disk; that is
//! accepted, not corrected.

use crate::error::{GnuplotError, Result};
use std::io::Write;

/// Reject empty input.
pub fn check_not_empty(name: &str, len: usize) -> Result<()> {
    if len == 0 {
        return Err(GnuplotError::Validation(format!(
            "input vector {name} is empty, cannot plot data"
        )));
    }
    Ok(())
}

/// Reject paired vectors of differing lengths.
pub fn check_same_length(x_len: usize, other_name: &str, other_len: usize) -> Result<()> {
    if x_len != other_len {
        return Err(GnuplotError::Validation(format!(
            "length of vector {other_name} ({other_len}) differs from x ({x_len})"
        )));
    }
    Ok(())
}

/// Validate a grid: the outer dimension must match `x`, every inner row
/// must match `y`.
pub fn check_grid(x_len: usize, y_len: usize, z: &[Vec<f64>]) -> Result<()> {
    check_not_empty("z", z.len())?;
    if z.len() != x_len {
        return Err(GnuplotError::Validation(format!(
            "grid has {} rows but x has {x_len} entries",
            z.len()
        )));
    }
    for (i, row) in z.iter().enumerate() {
        if row.len() != y_len {
            return Err(GnuplotError::Validation(format!(
                "grid row {i} has {} entries but y has {y_len}",
                row.len()
            )));
        }
    }
    Ok(())
}

/// Write one value per row.
pub fn write_rows_x<W: Write>(w: &mut W, x: &[f64]) -> Result<()> {
    for value in x {
        writeln!(w, "{value}")?;
    }
    w.flush()?;
    Ok(())
}

/// Write x,y pairs, one per row.
pub fn write_rows_xy<W: Write>(w: &mut W, x: &[f64], y: &[f64]) -> Result<()> {
    for (xv, yv) in x.iter().zip(y) {
        writeln!(w, "{xv} {yv}")?;
    }
    w.flush()?;
    Ok(())
}

/// Write x,y,z (or x,y,dy) triples, one per row.
pub fn write_rows_xyz<W: Write>(w: &mut W, x: &[f64], y: &[f64], z: &[f64]) -> Result<()> {
    for ((xv, yv), zv) in x.iter().zip(y).zip(z) {
        writeln!(w, "{xv} {yv} {zv}")?;
    }
    w.flush()?;
    Ok(())
}

/// Write a row-grouped grid: for each x a block of `x y z` rows over all
/// y values, blocks separated by a blank line.
pub fn write_grid<W: Write>(w: &mut W, x: &[f64], y: &[f64], z: &[Vec<f64>]) -> Result<()> {
    for (xv, row) in x.iter().zip(z) {
        for (yv, zv) in y.iter().zip(row) {
            writeln!(w, "{xv} {yv} {zv}")?;
        }
        writeln!(w)?;
    }
    w.flush()?;
    Ok(())
}

/// Write an image buffer as `column row value` rows, row-major.
///
/// The buffer must hold exactly `width * height` bytes.
pub fn write_image<W: Write>(w: &mut W, buf: &[u8], width: u32, height: u32) -> Result<()> {
    check_image_size(buf.len(), width, height)?;
    for (index, value) in buf.iter().map(|&b| f64::from(b)).enumerate() {
        let column = index % width as usize;
        let row = index / width as usize;
        writeln!(w, "{column} {row} {value}")?;
    }
    w.flush()?;
    Ok(())
}

/// Reject an image buffer whose length does not match its dimensions.
pub fn check_image_size(len: usize, width: u32, height: u32) -> Result<()> {
    let expected = width as usize * height as usize;
    if len != expected {
        return Err(GnuplotError::Validation(format!(
            "image buffer has {len} bytes but {width}x{height} needs {expected}"
        )));
    }
    Ok(())
}
