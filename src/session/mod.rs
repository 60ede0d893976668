//! Gnuplot session: child-process ownership and plot-state bookkeeping
//!
//! A [`GnuplotSession`] owns a single long-lived gnuplot child process
//! opened once at construction; every command funnels through it until
//! teardown. The session tracks the small amount of state the command
//! formatter needs: 2D vs 3D mode, the cumulative plot count since the
//! last reset, the active draw/smoothing styles, the active line width
//! and the contour configuration.
//!
//! Control flow for a plotting call: validate input → write data into a
//! tracked temporary file → format the command → write it to the pipe
//! and flush → update the counters that decide "plot" vs "replot" vs
//! "splot" on the next call.
//!
//! The session is a single-owner value: every operation takes
//! `&mut self`, there is no internal locking, and no operation suspends.
//! A hung gnuplot process blocks the calling thread indefinitely.

mod transport;

#[cfg(any(test, feature = "mock-pipe"))]
mod mock;

pub use transport::{PipeTransport, ProcessPipe};

#[cfg(any(test, feature = "mock-pipe"))]
pub use mock::{CommandLog, MockPipe};

use crate::command;
use crate::config::GnuplotConfig;
use crate::data;
use crate::error::{GnuplotError, Result};
use crate::tmpfile::TempFileRegistry;
use crate::types::{
    CommandKind, ContourParam, ContourSettings, ContourType, PlotStyle, SmoothStyle,
};
use std::path::{Path, PathBuf};

/// A live connection to a gnuplot child process.
///
/// # Example
///
/// ```no_run
/// use gnuplot_pipe::{GnuplotConfig, GnuplotSession, PlotStyle};
///
/// fn main() -> gnuplot_pipe::Result<()> {
///     let mut session = GnuplotSession::open(GnuplotConfig::new())?;
///     session.set_style(PlotStyle::Lines);
///     session.set_xlabel("t")?.set_ylabel("v")?;
///     session.plot_xy(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0], "measured")?;
///     session.remove_temp_files()?;
///     Ok(())
/// }
/// ```
pub struct GnuplotSession {
    /// Pipe to the child; `None` after an explicit close
    transport: Option<Box<dyn PipeTransport>>,
    config: GnuplotConfig,
    tmpfiles: TempFileRegistry,
    /// true = the last plot was 2D
    two_dim: bool,
    /// Number of plots since the last reset
    nplots: u32,
    style: PlotStyle,
    smooth: SmoothStyle,
    line_width: Option<f64>,
    contour: ContourSettings,
}

impl std::fmt::Debug for GnuplotSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GnuplotSession")
            .field("transport", &self.transport.as_ref().map(|_| "<pipe>"))
            .field("config", &self.config)
            .field("tmpfiles", &self.tmpfiles)
            .field("two_dim", &self.two_dim)
            .field("nplots", &self.nplots)
            .field("style", &self.style)
            .field("smooth", &self.smooth)
            .field("line_width", &self.line_width)
            .field("contour", &self.contour)
            .finish()
    }
}

impl GnuplotSession {
    /// Locate gnuplot, spawn it and select the default display terminal.
    ///
    /// The executable is looked up at the configured directory first,
    /// then on `PATH`. Fails with [`GnuplotError::Launch`] when the
    /// executable cannot be found or the child cannot be spawned.
    pub fn open(config: GnuplotConfig) -> Result<Self> {
        #[cfg(unix)]
        if config.terminal.contains("x11") && std::env::var_os("DISPLAY").is_none() {
            return Err(GnuplotError::Launch(
                "cannot find DISPLAY variable".to_string(),
            ));
        }

        let executable = config.locate_executable()?;
        let pipe = ProcessPipe::spawn(&executable)?;
        Self::with_transport(Box::new(pipe), config)
    }

    /// Build a session over an already opened transport.
    ///
    /// This is the seam tests use to substitute a recording mock for a
    /// real child process; hosts may also use it to drive a custom
    /// transport. The initial `set output` / `set terminal` pair is sent
    /// exactly as [`open`](Self::open) would.
    pub fn with_transport(
        transport: Box<dyn PipeTransport>,
        config: GnuplotConfig,
    ) -> Result<Self> {
        let tmpfiles = match &config.temp_dir {
            Some(dir) => TempFileRegistry::with_dir(dir),
            None => TempFileRegistry::new(),
        };
        let mut session = Self {
            transport: Some(transport),
            config,
            tmpfiles,
            two_dim: false,
            nplots: 0,
            style: PlotStyle::None,
            smooth: SmoothStyle::None,
            line_width: None,
            contour: ContourSettings::default(),
        };
        session.show_on_screen()?;
        Ok(session)
    }

    /// Whether the pipe to gnuplot is still open.
    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    /// Number of plots since the last reset.
    pub fn plot_count(&self) -> u32 {
        self.nplots
    }

    /// Whether the session is in 2D mode.
    pub fn is_two_dim(&self) -> bool {
        self.two_dim
    }

    /// Number of temporary data files created and not yet cleaned up.
    pub fn temp_file_count(&self) -> usize {
        self.tmpfiles.len()
    }

    /// Paths of all tracked temporary data files, in creation order.
    pub fn temp_file_paths(&self) -> &[PathBuf] {
        self.tmpfiles.paths()
    }

    /// Send a raw command string to gnuplot.
    ///
    /// The command's effect on the plot counters is inferred by
    /// substring containment ("replot", then "splot", then "plot"),
    /// which is fragile: a literal title containing the word "plot"
    /// is misclassified. The typed plotting operations on this type
    /// carry their intent explicitly and are not affected; prefer them
    /// where possible.
    pub fn cmd(&mut self, text: &str) -> Result<&mut Self> {
        self.send(CommandKind::classify(text), text)?;
        Ok(self)
    }

    /// Write a command line and apply its declared state effect.
    fn send(&mut self, kind: CommandKind, text: &str) -> Result<()> {
        let transport = self.transport.as_mut().ok_or_else(|| {
            GnuplotError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "session already closed",
            ))
        })?;
        transport.send(text)?;
        tracing::debug!(command = text, "sent to gnuplot");

        match kind {
            CommandKind::Plot2d => {
                self.two_dim = true;
                self.nplots += 1;
            }
            CommandKind::Plot3d => {
                self.two_dim = false;
                self.nplots += 1;
            }
            CommandKind::Replot | CommandKind::Setting => {}
        }
        Ok(())
    }

    /// Emit a non-plotting command.
    fn setting(&mut self, text: impl AsRef<str>) -> Result<&mut Self> {
        self.send(CommandKind::Setting, text.as_ref())?;
        Ok(self)
    }

    fn verb_2d(&self) -> (&'static str, CommandKind) {
        let verb = command::verb_2d(self.nplots, self.two_dim);
        let kind = if verb == "replot" {
            CommandKind::Replot
        } else {
            CommandKind::Plot2d
        };
        (verb, kind)
    }

    fn verb_3d(&self) -> (&'static str, CommandKind) {
        let verb = command::verb_3d(self.nplots, self.two_dim);
        let kind = if verb == "replot" {
            CommandKind::Replot
        } else {
            CommandKind::Plot3d
        };
        (verb, kind)
    }

    // ------------------------------------------------------------------
    // Style state
    // ------------------------------------------------------------------

    /// Set the draw style for subsequent plots.
    pub fn set_style(&mut self, style: PlotStyle) -> &mut Self {
        self.style = style;
        self
    }

    /// Set the smoothing style for subsequent plots. Any style other
    /// than [`SmoothStyle::None`] replaces the draw style per command.
    pub fn set_smooth(&mut self, smooth: SmoothStyle) -> &mut Self {
        self.smooth = smooth;
        self
    }

    /// Set the line width for subsequent plots. Non-positive widths are
    /// ignored.
    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        if width > 0.0 {
            self.line_width = Some(width);
        }
        self
    }

    /// Set the point size used in plots.
    pub fn set_pointsize(&mut self, pointsize: f64) -> Result<&mut Self> {
        self.setting(format!("set pointsize {pointsize}"))
    }

    // ------------------------------------------------------------------
    // Output routing
    // ------------------------------------------------------------------

    /// Route output to the configured display terminal.
    pub fn show_on_screen(&mut self) -> Result<&mut Self> {
        let terminal = self.config.terminal.clone();
        self.setting("set output")?;
        self.setting(format!("set terminal {terminal}"))
    }

    /// Route output to a file through the given terminal (e.g. "ps",
    /// "png").
    pub fn save_to_figure(&mut self, filename: &str, terminal: &str) -> Result<&mut Self> {
        self.setting(format!("set terminal {terminal}"))?;
        self.setting(format!("set output \"{filename}\""))
    }

    // ------------------------------------------------------------------
    // Axes, scales, toggles
    // ------------------------------------------------------------------

    /// Enable the grid.
    pub fn set_grid(&mut self) -> Result<&mut Self> {
        self.setting("set grid")
    }

    /// Disable the grid (the default).
    pub fn unset_grid(&mut self) -> Result<&mut Self> {
        self.setting("unset grid")
    }

    /// Enable multiplot mode.
    pub fn set_multiplot(&mut self) -> Result<&mut Self> {
        self.setting("set multiplot")
    }

    /// Disable multiplot mode.
    pub fn unset_multiplot(&mut self) -> Result<&mut Self> {
        self.setting("unset multiplot")
    }

    /// Set the sampling rate for plotted functions.
    pub fn set_samples(&mut self, samples: u32) -> Result<&mut Self> {
        self.setting(format!("set samples {samples}"))
    }

    /// Set the isoline density for 3D surface plots.
    pub fn set_isosamples(&mut self, isolines: u32) -> Result<&mut Self> {
        self.setting(format!("set isosamples {isolines}"))
    }

    /// Enable hidden line removal for 3D surfaces.
    pub fn set_hidden3d(&mut self) -> Result<&mut Self> {
        self.setting("set hidden3d")
    }

    /// Disable hidden line removal (the default).
    pub fn unset_hidden3d(&mut self) -> Result<&mut Self> {
        self.setting("unset hidden3d")
    }

    /// Enable the display of 3D surfaces (the default).
    pub fn set_surface(&mut self) -> Result<&mut Self> {
        self.setting("set surface")
    }

    /// Disable the display of 3D surfaces.
    pub fn unset_surface(&mut self) -> Result<&mut Self> {
        self.setting("unset surface")
    }

    /// Enable the legend at the given position (`"inside"`, `"outside"`,
    /// `"left"`, `"top"`, `"box"`, … per the gnuplot `set key` syntax).
    pub fn set_legend(&mut self, position: &str) -> Result<&mut Self> {
        self.setting(format!("set key {position}"))
    }

    /// Disable the legend.
    pub fn unset_legend(&mut self) -> Result<&mut Self> {
        self.setting("unset key")
    }

    /// Set the plot title.
    pub fn set_title(&mut self, title: &str) -> Result<&mut Self> {
        self.setting(format!("set title \"{title}\""))
    }

    /// Clear the plot title.
    pub fn unset_title(&mut self) -> Result<&mut Self> {
        self.set_title("")
    }

    /// Set the x-axis label.
    pub fn set_xlabel(&mut self, label: &str) -> Result<&mut Self> {
        self.setting(format!("set xlabel \"{label}\""))
    }

    /// Set the y-axis label.
    pub fn set_ylabel(&mut self, label: &str) -> Result<&mut Self> {
        self.setting(format!("set ylabel \"{label}\""))
    }

    /// Set the z-axis label.
    pub fn set_zlabel(&mut self, label: &str) -> Result<&mut Self> {
        self.setting(format!("set zlabel \"{label}\""))
    }

    /// Set the x-axis range.
    pub fn set_xrange(&mut self, from: f64, to: f64) -> Result<&mut Self> {
        self.setting(format!("set xrange[{from}:{to}]"))
    }

    /// Set the y-axis range.
    pub fn set_yrange(&mut self, from: f64, to: f64) -> Result<&mut Self> {
        self.setting(format!("set yrange[{from}:{to}]"))
    }

    /// Set the z-axis range.
    pub fn set_zrange(&mut self, from: f64, to: f64) -> Result<&mut Self> {
        self.setting(format!("set zrange[{from}:{to}]"))
    }

    /// Set the palette color range.
    pub fn set_cbrange(&mut self, from: f64, to: f64) -> Result<&mut Self> {
        self.setting(format!("set cbrange[{from}:{to}]"))
    }

    /// Re-enable autoscaling for the x-axis.
    pub fn set_xautoscale(&mut self) -> Result<&mut Self> {
        self.setting("set xrange restore")?;
        self.setting("set autoscale x")
    }

    /// Re-enable autoscaling for the y-axis.
    pub fn set_yautoscale(&mut self) -> Result<&mut Self> {
        self.setting("set yrange restore")?;
        self.setting("set autoscale y")
    }

    /// Re-enable autoscaling for the z-axis.
    pub fn set_zautoscale(&mut self) -> Result<&mut Self> {
        self.setting("set zrange restore")?;
        self.setting("set autoscale z")
    }

    /// Enable logarithmic scaling of the x-axis.
    pub fn set_xlogscale(&mut self, base: f64) -> Result<&mut Self> {
        self.setting(format!("set logscale x {base}"))
    }

    /// Enable logarithmic scaling of the y-axis.
    pub fn set_ylogscale(&mut self, base: f64) -> Result<&mut Self> {
        self.setting(format!("set logscale y {base}"))
    }

    /// Enable logarithmic scaling of the z-axis.
    pub fn set_zlogscale(&mut self, base: f64) -> Result<&mut Self> {
        self.setting(format!("set logscale z {base}"))
    }

    /// Disable logarithmic scaling of the x-axis.
    pub fn unset_xlogscale(&mut self) -> Result<&mut Self> {
        self.setting("unset logscale x")
    }

    /// Disable logarithmic scaling of the y-axis.
    pub fn unset_ylogscale(&mut self) -> Result<&mut Self> {
        self.setting("unset logscale y")
    }

    /// Disable logarithmic scaling of the z-axis.
    pub fn unset_zlogscale(&mut self) -> Result<&mut Self> {
        self.setting("unset logscale z")
    }

    // ------------------------------------------------------------------
    // Contours
    // ------------------------------------------------------------------

    /// Set the contour placement.
    pub fn set_contour_type(&mut self, kind: ContourType) -> &mut Self {
        self.contour.kind = kind;
        self
    }

    /// Set how contour levels are derived.
    pub fn set_contour_param(&mut self, param: ContourParam) -> &mut Self {
        self.contour.param = param;
        self
    }

    /// Set the number of contour levels. Zero is ignored.
    pub fn set_contour_levels(&mut self, levels: u32) -> &mut Self {
        if levels > 0 {
            self.contour.levels = levels;
        }
        self
    }

    /// Set the contour increment range and step size.
    pub fn set_contour_increment(&mut self, start: f64, step: f64, end: f64) -> &mut Self {
        self.contour.increment_start = start;
        self.contour.increment_step = step;
        self.contour.increment_end = end;
        self
    }

    /// Set discrete contour levels.
    pub fn set_contour_discrete_levels(&mut self, levels: Vec<f64>) -> &mut Self {
        self.contour.discrete_levels = levels;
        self
    }

    /// Send the configured contour commands to gnuplot.
    pub fn apply_contour_settings(&mut self) -> Result<&mut Self> {
        for cmd in self.contour.commands() {
            self.setting(cmd)?;
        }
        Ok(self)
    }

    /// Disable contour drawing.
    pub fn unset_contour(&mut self) -> Result<&mut Self> {
        self.setting("unset contour")
    }

    // ------------------------------------------------------------------
    // Plotting from slices
    // ------------------------------------------------------------------

    /// Plot a single vector against its index.
    pub fn plot_x(&mut self, x: &[f64], title: &str) -> Result<&mut Self> {
        data::check_not_empty("x", x.len())?;
        let (mut file, path) = self.tmpfiles.create()?;
        data::write_rows_x(&mut file, x)?;
        self.plot_file_x(&path, 1, title)
    }

    /// Plot several vectors in one command using inline data blocks.
    ///
    /// `titles` may be shorter than `series`; missing entries render as
    /// `notitle`. This is the only multi-line command the formatter
    /// produces.
    pub fn plot_x_multi(&mut self, series: &[Vec<f64>], titles: &[&str]) -> Result<&mut Self> {
        data::check_not_empty("series", series.len())?;
        for (k, block) in series.iter().enumerate() {
            data::check_not_empty(&format!("series[{k}]"), block.len())?;
        }
        let (verb, kind) = self.verb_2d();
        let cmd = command::inline_multi_plot(
            verb,
            series,
            titles,
            self.style,
            self.smooth,
            self.line_width,
        );
        self.send(kind, &cmd)?;
        Ok(self)
    }

    /// Plot x,y pairs.
    pub fn plot_xy(&mut self, x: &[f64], y: &[f64], title: &str) -> Result<&mut Self> {
        data::check_not_empty("x", x.len())?;
        data::check_not_empty("y", y.len())?;
        data::check_same_length(x.len(), "y", y.len())?;
        let (mut file, path) = self.tmpfiles.create()?;
        data::write_rows_xy(&mut file, x, y)?;
        self.plot_file_xy(&path, 1, 2, title)
    }

    /// Plot x,y pairs with error bars dy.
    pub fn plot_xy_err(
        &mut self,
        x: &[f64],
        y: &[f64],
        dy: &[f64],
        title: &str,
    ) -> Result<&mut Self> {
        data::check_not_empty("x", x.len())?;
        data::check_not_empty("y", y.len())?;
        data::check_not_empty("dy", dy.len())?;
        data::check_same_length(x.len(), "y", y.len())?;
        data::check_same_length(x.len(), "dy", dy.len())?;
        let (mut file, path) = self.tmpfiles.create()?;
        data::write_rows_xyz(&mut file, x, y, dy)?;
        self.plot_file_xy_err(&path, 1, 2, 3, title)
    }

    /// Plot x,y,z triples.
    pub fn plot_xyz(&mut self, x: &[f64], y: &[f64], z: &[f64], title: &str) -> Result<&mut Self> {
        data::check_not_empty("x", x.len())?;
        data::check_not_empty("y", y.len())?;
        data::check_not_empty("z", z.len())?;
        data::check_same_length(x.len(), "y", y.len())?;
        data::check_same_length(x.len(), "z", z.len())?;
        let (mut file, path) = self.tmpfiles.create()?;
        data::write_rows_xyz(&mut file, x, y, z)?;
        self.plot_file_xyz(&path, 1, 2, 3, title)
    }

    /// Plot a 3D grid of z values over the x,y axes.
    ///
    /// `z` must have one row per x entry and one column per y entry.
    pub fn plot_grid3d(
        &mut self,
        x: &[f64],
        y: &[f64],
        z: &[Vec<f64>],
        title: &str,
    ) -> Result<&mut Self> {
        data::check_not_empty("x", x.len())?;
        data::check_not_empty("y", y.len())?;
        data::check_grid(x.len(), y.len(), z)?;
        let (mut file, path) = self.tmpfiles.create()?;
        data::write_grid(&mut file, x, y, z)?;
        self.plot_file_xyz(&path, 1, 2, 3, title)
    }

    /// Plot a grayscale image buffer of `width * height` bytes.
    pub fn plot_image(
        &mut self,
        buf: &[u8],
        width: u32,
        height: u32,
        title: &str,
    ) -> Result<&mut Self> {
        data::check_not_empty("image buffer", buf.len())?;
        data::check_image_size(buf.len(), width, height)?;
        let (mut file, path) = self.tmpfiles.create()?;
        data::write_image(&mut file, buf, width, height)?;
        let (verb, kind) = self.verb_2d();
        let cmd = command::image_plot(verb, &path, title);
        self.send(kind, &cmd)?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Plotting from files and equations
    // ------------------------------------------------------------------

    /// Plot a single column from a data file.
    pub fn plot_file_x(&mut self, path: &Path, column: u32, title: &str) -> Result<&mut Self> {
        let (verb, kind) = self.verb_2d();
        let cmd = command::file_plot(
            verb,
            path,
            &column.to_string(),
            title,
            self.style,
            self.smooth,
            self.line_width,
        );
        self.send(kind, &cmd)?;
        Ok(self)
    }

    /// Plot x,y columns from a data file.
    pub fn plot_file_xy(
        &mut self,
        path: &Path,
        column_x: u32,
        column_y: u32,
        title: &str,
    ) -> Result<&mut Self> {
        let (verb, kind) = self.verb_2d();
        let cmd = command::file_plot(
            verb,
            path,
            &format!("{column_x}:{column_y}"),
            title,
            self.style,
            self.smooth,
            self.line_width,
        );
        self.send(kind, &cmd)?;
        Ok(self)
    }

    /// Plot x,y,dy columns from a data file with error bars.
    pub fn plot_file_xy_err(
        &mut self,
        path: &Path,
        column_x: u32,
        column_y: u32,
        column_dy: u32,
        title: &str,
    ) -> Result<&mut Self> {
        let (verb, kind) = self.verb_2d();
        let cmd = command::file_plot_err(verb, path, column_x, column_y, column_dy, title);
        self.send(kind, &cmd)?;
        Ok(self)
    }

    /// Plot x,y,z columns from a data file.
    pub fn plot_file_xyz(
        &mut self,
        path: &Path,
        column_x: u32,
        column_y: u32,
        column_z: u32,
        title: &str,
    ) -> Result<&mut Self> {
        let (verb, kind) = self.verb_3d();
        let cmd = command::file_plot(
            verb,
            path,
            &format!("{column_x}:{column_y}:{column_z}"),
            title,
            self.style,
            SmoothStyle::None,
            self.line_width,
        );
        self.send(kind, &cmd)?;
        Ok(self)
    }

    /// Plot a linear equation `y = a * x + b`.
    pub fn plot_slope(&mut self, a: f64, b: f64, title: &str) -> Result<&mut Self> {
        let (verb, kind) = self.verb_2d();
        let cmd = command::slope_plot(verb, a, b, title, self.style, self.line_width);
        self.send(kind, &cmd)?;
        Ok(self)
    }

    /// Plot a 2D equation of the form `y = f(x)`, e.g. `"sin(x)"`.
    pub fn plot_equation(&mut self, equation: &str, title: &str) -> Result<&mut Self> {
        let (verb, kind) = self.verb_2d();
        let cmd = command::equation_plot(verb, equation, title, self.style, self.line_width);
        self.send(kind, &cmd)?;
        Ok(self)
    }

    /// Plot a 3D equation of the form `z = f(x, y)`, e.g. `"x**2 + y**2"`.
    pub fn plot_equation3d(&mut self, equation: &str, title: &str) -> Result<&mut Self> {
        let (verb, kind) = self.verb_3d();
        let cmd = command::equation3d_plot(verb, equation, title, self.style, self.line_width);
        self.send(kind, &cmd)?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Session resets and teardown
    // ------------------------------------------------------------------

    /// Repeat the last plot or splot command, if any plot exists.
    pub fn replot(&mut self) -> Result<&mut Self> {
        if self.nplots > 0 {
            self.send(CommandKind::Replot, "replot")?;
        }
        Ok(self)
    }

    /// Reset the plot counter so the next plot erases all previous ones.
    pub fn reset_plot(&mut self) -> &mut Self {
        self.nplots = 0;
        self
    }

    /// Reset the session and restore all variables to their defaults.
    pub fn reset_all(&mut self) -> Result<&mut Self> {
        self.nplots = 0;
        self.setting("reset")?;
        self.setting("clear")?;
        self.style = PlotStyle::None;
        self.smooth = SmoothStyle::None;
        self.show_on_screen()
    }

    /// Delete every temporary data file created by this session.
    pub fn remove_temp_files(&mut self) -> Result<()> {
        self.tmpfiles.remove_all()
    }

    /// Close the pipe to gnuplot.
    ///
    /// Called implicitly on drop, where a failure is logged instead of
    /// propagated; call explicitly to observe close errors.
    pub fn close(&mut self) -> Result<()> {
        match self.transport.take() {
            Some(mut transport) => transport.close(),
            None => Ok(()),
        }
    }
}

impl Drop for GnuplotSession {
    fn drop(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            if let Err(e) = transport.close() {
                tracing::warn!(error = %e, "problem closing communication to gnuplot");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mock_session() -> (GnuplotSession, CommandLog) {
        let dir = tempfile::tempdir().unwrap();
        let config = GnuplotConfig::new()
            .with_terminal("dumb")
            .with_temp_dir(dir.keep());
        let pipe = MockPipe::new();
        let log = pipe.log();
        let session = GnuplotSession::with_transport(Box::new(pipe), config).unwrap();
        (session, log)
    }

    fn cleanup(mut session: GnuplotSession) {
        session.remove_temp_files().unwrap();
        let dir = session.config.temp_dir.clone().unwrap();
        drop(session);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_open_sends_terminal_pair() {
        let (session, log) = mock_session();
        assert_eq!(log.commands(), vec!["set output", "set terminal dumb"]);
        assert_eq!(session.plot_count(), 0);
        cleanup(session);
    }

    #[test]
    fn test_plot_xy_golden() {
        let (mut session, log) = mock_session();
        session
            .plot_xy(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], "")
            .unwrap();

        assert_eq!(session.temp_file_count(), 1);
        let path = session.temp_file_paths()[0].clone();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "1 4\n2 5\n3 6\n");

        let cmd = log.last().unwrap();
        assert_eq!(
            cmd,
            format!("plot \"{}\" using 1:2 notitle with points", path.display())
        );
        assert!(session.is_two_dim());
        assert_eq!(session.plot_count(), 1);
        cleanup(session);
    }

    #[test]
    fn test_second_plot_same_dimensionality_replots() {
        let (mut session, log) = mock_session();
        session.plot_xy(&[1.0], &[2.0], "").unwrap();
        session.plot_xy(&[3.0], &[4.0], "").unwrap();

        assert!(log.last().unwrap().starts_with("replot "));
        // replot leaves the counter untouched
        assert_eq!(session.plot_count(), 1);
        cleanup(session);
    }

    #[test]
    fn test_reset_plot_forces_plain_verbs() {
        let (mut session, log) = mock_session();
        session.plot_equation("sin(x)", "").unwrap();
        session.reset_plot();
        session.plot_equation("cos(x)", "").unwrap();
        assert!(log.last().unwrap().starts_with("plot "));

        session.plot_equation3d("x*y", "").unwrap();
        session.reset_plot();
        session.plot_equation3d("x+y", "").unwrap();
        assert!(log.last().unwrap().starts_with("splot "));
        cleanup(session);
    }

    #[test]
    fn test_dimension_switch_avoids_replot() {
        let (mut session, log) = mock_session();
        session.plot_xy(&[1.0], &[2.0], "").unwrap();
        session.plot_xyz(&[1.0], &[2.0], &[3.0], "").unwrap();
        assert!(log.last().unwrap().starts_with("splot "));
        assert!(!session.is_two_dim());
        assert_eq!(session.plot_count(), 2);
        cleanup(session);
    }

    #[test]
    fn test_empty_input_rejected_without_side_effects() {
        let (mut session, log) = mock_session();
        let sent_before = log.len();

        let err = session.plot_xy(&[], &[], "").unwrap_err();
        assert!(matches!(err, GnuplotError::Validation(_)));
        assert_eq!(session.temp_file_count(), 0);
        assert_eq!(log.len(), sent_before);
        assert_eq!(session.plot_count(), 0);

        assert!(session.plot_x(&[], "").is_err());
        assert!(session.plot_xyz(&[], &[], &[], "").is_err());
        assert!(session.plot_grid3d(&[], &[], &[], "").is_err());
        assert!(session.plot_image(&[], 0, 0, "").is_err());
        assert!(session.plot_x_multi(&[], &[]).is_err());
        assert_eq!(session.temp_file_count(), 0);
        assert_eq!(log.len(), sent_before);
        cleanup(session);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let (mut session, log) = mock_session();
        let sent_before = log.len();

        let err = session.plot_xy(&[1.0, 2.0], &[1.0], "").unwrap_err();
        assert!(matches!(err, GnuplotError::Validation(_)));
        assert!(session
            .plot_xy_err(&[1.0], &[1.0], &[1.0, 2.0], "")
            .is_err());
        assert!(session.plot_xyz(&[1.0], &[1.0, 2.0], &[1.0], "").is_err());
        assert_eq!(session.temp_file_count(), 0);
        assert_eq!(log.len(), sent_before);
        cleanup(session);
    }

    #[test]
    fn test_grid_dimension_validation() {
        let (mut session, _log) = mock_session();
        let z = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        assert!(session
            .plot_grid3d(&[1.0, 2.0, 3.0], &[1.0, 2.0], &z, "")
            .is_err());
        session.plot_grid3d(&[1.0, 2.0], &[1.0, 2.0], &z, "").unwrap();
        assert!(!session.is_two_dim());
        cleanup(session);
    }

    #[test]
    fn test_grid_file_layout() {
        let (mut session, _log) = mock_session();
        let z = vec![vec![5.0, 6.0], vec![7.0, 8.0]];
        session
            .plot_grid3d(&[1.0, 2.0], &[3.0, 4.0], &z, "")
            .unwrap();
        let path = session.temp_file_paths()[0].clone();
        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content, "1 3 5\n1 4 6\n\n2 3 7\n2 4 8\n\n");
        cleanup(session);
    }

    #[test]
    fn test_error_bars_command() {
        let (mut session, log) = mock_session();
        session
            .plot_xy_err(&[1.0], &[2.0], &[0.5], "measured")
            .unwrap();
        let cmd = log.last().unwrap();
        assert!(cmd.contains("using 1:2:3 with errorbars"));
        assert!(cmd.ends_with("title \"measured\""));
        cleanup(session);
    }

    #[test]
    fn test_smoothing_replaces_style() {
        let (mut session, log) = mock_session();
        session.set_style(PlotStyle::Lines);
        session.set_smooth(SmoothStyle::CSplines);
        session.plot_xy(&[1.0, 2.0], &[3.0, 4.0], "").unwrap();
        let cmd = log.last().unwrap();
        assert!(cmd.contains("smooth csplines"));
        assert!(!cmd.contains("with lines"));
        cleanup(session);
    }

    #[test]
    fn test_line_width_clause() {
        let (mut session, log) = mock_session();
        session.set_style(PlotStyle::Lines);
        session.set_line_width(2.5);
        session.set_line_width(-1.0); // ignored
        session.plot_equation("x", "").unwrap();
        assert!(log.last().unwrap().ends_with("with lines lw 2.5"));
        cleanup(session);
    }

    #[test]
    fn test_title_containing_plot_is_not_misclassified() {
        let (mut session, _log) = mock_session();
        session.set_title("my plot of doom").unwrap();
        assert_eq!(session.plot_count(), 0);
        cleanup(session);
    }

    #[test]
    fn test_raw_cmd_substring_classification() {
        let (mut session, _log) = mock_session();
        session.cmd("set grid").unwrap();
        assert_eq!(session.plot_count(), 0);
        session.cmd("splot sin(x)*cos(y) notitle").unwrap();
        assert_eq!(session.plot_count(), 1);
        assert!(!session.is_two_dim());
        session.cmd("replot").unwrap();
        assert_eq!(session.plot_count(), 1);
        cleanup(session);
    }

    #[test]
    fn test_inline_multi_plot_is_single_command() {
        let (mut session, log) = mock_session();
        let sent_before = log.len();
        session
            .plot_x_multi(&[vec![1.0, 2.0], vec![3.0]], &["a"])
            .unwrap();
        assert_eq!(log.len(), sent_before + 1);
        let cmd = log.last().unwrap();
        assert!(cmd.starts_with("plot '-' using 1 title \"a\""));
        assert!(cmd.ends_with("\ne"));
        assert_eq!(session.temp_file_count(), 0);
        cleanup(session);
    }

    #[test]
    fn test_replot_noop_without_plots() {
        let (mut session, log) = mock_session();
        let sent_before = log.len();
        session.replot().unwrap();
        assert_eq!(log.len(), sent_before);
        session.plot_equation("x", "").unwrap();
        session.replot().unwrap();
        assert_eq!(log.last().unwrap(), "replot");
        cleanup(session);
    }

    #[test]
    fn test_reset_all_restores_defaults() {
        let (mut session, log) = mock_session();
        session.set_style(PlotStyle::Lines);
        session.plot_equation("x", "").unwrap();
        session.reset_all().unwrap();

        assert_eq!(session.plot_count(), 0);
        let commands = log.commands();
        let tail = &commands[commands.len() - 4..];
        assert_eq!(tail, ["reset", "clear", "set output", "set terminal dumb"]);

        // next plot draws points again, not lines
        session.plot_equation("x", "").unwrap();
        assert!(log.last().unwrap().ends_with("with points"));
        cleanup(session);
    }

    #[test]
    fn test_apply_contour_settings() {
        let (mut session, log) = mock_session();
        session
            .set_contour_type(ContourType::Base)
            .set_contour_param(ContourParam::Levels)
            .set_contour_levels(7);
        session.apply_contour_settings().unwrap();
        let commands = log.commands();
        assert!(commands.contains(&"set contour base".to_string()));
        assert_eq!(log.last().unwrap(), "set cntrparam levels 7");
        cleanup(session);
    }

    #[test]
    fn test_save_to_figure_command_pair() {
        let (mut session, log) = mock_session();
        session.save_to_figure("out.png", "png").unwrap();
        let commands = log.commands();
        let tail = &commands[commands.len() - 2..];
        assert_eq!(tail, ["set terminal png", "set output \"out.png\""]);
        cleanup(session);
    }

    #[test]
    fn test_close_then_send_fails() {
        let (mut session, log) = mock_session();
        session.close().unwrap();
        assert!(log.is_closed());
        assert!(!session.is_open());
        assert!(session.cmd("set grid").is_err());
        // closing twice is a no-op
        session.close().unwrap();
        cleanup(session);
    }

    #[test]
    fn test_drop_closes_pipe() {
        let pipe = MockPipe::new();
        let log = pipe.log();
        let config = GnuplotConfig::new().with_terminal("dumb");
        let session = GnuplotSession::with_transport(Box::new(pipe), config).unwrap();
        drop(session);
        assert!(log.is_closed());
    }

    #[test]
    fn test_send_failure_propagates() {
        let pipe = MockPipe::new().with_failing_sends();
        let config = GnuplotConfig::new().with_terminal("dumb");
        let err = GnuplotSession::with_transport(Box::new(pipe), config).unwrap_err();
        assert!(matches!(err, GnuplotError::Io(_)));
    }

    proptest! {
        #[test]
        fn prop_paired_plot_writes_one_row_per_point(
            points in proptest::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 1..40)
        ) {
            let (mut session, log) = mock_session();
            let x: Vec<f64> = points.iter().map(|p| p.0).collect();
            let y: Vec<f64> = points.iter().map(|p| p.1).collect();

            session.plot_xy(&x, &y, "").unwrap();

            prop_assert_eq!(session.temp_file_count(), 1);
            let path = session.temp_file_paths()[0].clone();
            let content = std::fs::read_to_string(path).unwrap();
            let lines: Vec<&str> = content.lines().collect();
            prop_assert_eq!(lines.len(), points.len());
            for (line, (xv, yv)) in lines.iter().zip(&points) {
                prop_assert_eq!(*line, format!("{xv} {yv}"));
            }
            prop_assert!(log.last().unwrap().contains("using 1:2"));
            cleanup(session);
        }

        #[test]
        fn prop_mismatched_lengths_never_touch_disk(
            x_len in 1usize..20,
            y_len in 1usize..20,
        ) {
            prop_assume!(x_len != y_len);
            let (mut session, log) = mock_session();
            let sent_before = log.len();
            let x = vec![0.0; x_len];
            let y = vec![0.0; y_len];
            prop_assert!(session.plot_xy(&x, &y, "").is_err());
            prop_assert_eq!(session.temp_file_count(), 0);
            prop_assert_eq!(log.len(), sent_before);
            cleanup(session);
        }
    }
}
