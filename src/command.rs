//! Command formatting for the gnuplot scripting language
//!
//! This module builds complete gnuplot command lines from typed inputs.
//! Every function produces a single string with no embedded newlines,
//! except the inline multi-series command which appends one literal data
//! row per point and an `e` end-of-block marker per series.
//!
//! # Formatting rules
//!
//! - The leading verb is "replot" only when the session is already in the
//!   matching dimensionality and at least one plot has occurred since the
//!   last reset; otherwise "plot" or "splot".
//! - An empty title renders as `notitle`; a non-empty title is quoted
//!   verbatim. Embedded quotes are the caller's responsibility.
//! - An active smoothing style replaces the draw style (`smooth` vs
//!   `with`); the two never appear in the same command.
//! - Numbers go through the ambient `Display` conversion, with no fixed
//!   precision. Golden-output comparisons depend on this.

use crate::types::{PlotStyle, SmoothStyle};
use std::fmt::Write as _;
use std::path::Path;

/// Leading verb for a 2D plot command.
pub fn verb_2d(nplots: u32, two_dim: bool) -> &'static str {
    if nplots > 0 && two_dim {
        "replot"
    } else {
        "plot"
    }
}

/// Leading verb for a 3D plot command.
pub fn verb_3d(nplots: u32, two_dim: bool) -> &'static str {
    if nplots > 0 && !two_dim {
        "replot"
    } else {
        "splot"
    }
}

/// ` notitle` or ` title "<title>"`.
fn title_clause(title: &str) -> String {
    if title.is_empty() {
        " notitle".to_string()
    } else {
        format!(" title \"{title}\"")
    }
}

/// ` smooth <style>` when smoothing is active, else ` with <style>`.
fn draw_clause(style: PlotStyle, smooth: SmoothStyle) -> String {
    match smooth.as_str() {
        Some(keyword) => format!(" smooth {keyword}"),
        None => format!(" with {}", style.as_str()),
    }
}

/// ` lw <w>` for a positive width, empty otherwise.
fn width_clause(line_width: Option<f64>) -> String {
    match line_width {
        Some(w) if w > 0.0 => format!(" lw {w}"),
        _ => String::new(),
    }
}

/// Plot a data file with the given column selector string (`"1"`,
/// `"1:2"`, `"1:2:3"`).
pub fn file_plot(
    verb: &str,
    path: &Path,
    using: &str,
    title: &str,
    style: PlotStyle,
    smooth: SmoothStyle,
    line_width: Option<f64>,
) -> String {
    format!(
        "{verb} \"{}\" using {using}{}{}{}",
        path.display(),
        title_clause(title),
        draw_clause(style, smooth),
        width_clause(line_width),
    )
}

/// Plot a data file as x,y pairs with error bars. Error-bar commands
/// take neither a draw style nor smoothing.
pub fn file_plot_err(
    verb: &str,
    path: &Path,
    column_x: u32,
    column_y: u32,
    column_dy: u32,
    title: &str,
) -> String {
    format!(
        "{verb} \"{}\" using {column_x}:{column_y}:{column_dy} with errorbars{}",
        path.display(),
        title_clause(title),
    )
}

/// Plot a data file as a raw image grid.
pub fn image_plot(verb: &str, path: &Path, title: &str) -> String {
    let mut cmd = format!("{verb} \"{}\" with image", path.display());
    if !title.is_empty() {
        let _ = write!(cmd, " title \"{title}\"");
    }
    cmd
}

/// Plot a 2D expression of the form `y = f(x)`.
pub fn equation_plot(
    verb: &str,
    equation: &str,
    title: &str,
    style: PlotStyle,
    line_width: Option<f64>,
) -> String {
    format!(
        "{verb} {equation}{} with {}{}",
        title_clause(title),
        style.as_str(),
        width_clause(line_width),
    )
}

/// Plot a linear equation `y = a * x + b`. An empty title defaults to
/// the equation itself.
pub fn slope_plot(
    verb: &str,
    a: f64,
    b: f64,
    title: &str,
    style: PlotStyle,
    line_width: Option<f64>,
) -> String {
    let title = if title.is_empty() {
        format!("f(x) = {a} * x + {b}")
    } else {
        title.to_string()
    };
    format!(
        "{verb} {a} * x + {b} title \"{title}\" with {}{}",
        style.as_str(),
        width_clause(line_width),
    )
}

/// Plot a 3D expression of the form `z = f(x, y)`. An empty title
/// defaults to the expression itself.
pub fn equation3d_plot(
    verb: &str,
    equation: &str,
    title: &str,
    style: PlotStyle,
    line_width: Option<f64>,
) -> String {
    let title = if title.is_empty() {
        format!("f(x,y) = {equation}")
    } else {
        title.to_string()
    };
    format!(
        "{verb} {equation} title \"{title}\" with {}{}",
        style.as_str(),
        width_clause(line_width),
    )
}

/// Plot several series as inline data blocks in a single command.
///
/// The header carries one `'-' using 1` clause per series; the data rows
/// follow, one block per series, each terminated by a literal `e` line.
/// Missing or empty titles render as `notitle`.
pub fn inline_multi_plot(
    verb: &str,
    series: &[Vec<f64>],
    titles: &[&str],
    style: PlotStyle,
    smooth: SmoothStyle,
    line_width: Option<f64>,
) -> String {
    let clauses: Vec<String> = (0..series.len())
        .map(|k| {
            let title = titles.get(k).copied().unwrap_or("");
            format!(
                "'-' using 1{}{}{}",
                title_clause(title),
                draw_clause(style, smooth),
                width_clause(line_width),
            )
        })
        .collect();

    let mut cmd = format!("{verb} {}", clauses.join(", "));
    for block in series {
        for value in block {
            let _ = write!(cmd, "\n{value}");
        }
        cmd.push_str("\ne");
    }
    cmd
}
