//! Core plotting vocabulary for the gnuplot pipe driver
//!
//! This module contains the typed equivalents of gnuplot's style,
//! smoothing and contour keywords, plus the command classification used
//! by the session's plot-state bookkeeping.

/// Drawing style requested in a `with <style>` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotStyle {
    /// Default fallback style (renders as points)
    #[default]
    None,
    /// Lines connecting the data points
    Lines,
    /// Individual data points
    Points,
    /// Lines connecting data points with points marked
    LinesPoints,
    /// Vertical lines from the x-axis to the data points
    Impulses,
    /// Small dots for data points
    Dots,
    /// Stepwise connection of data points
    Steps,
    /// Finite steps between data points
    FSteps,
    /// Histogram-like steps between data points
    HiSteps,
    /// Boxes for histogram-like data
    Boxes,
    /// Filled areas under curves
    FilledCurves,
    /// Histograms
    Histograms,
}

impl PlotStyle {
    /// The gnuplot keyword for this style.
    pub fn as_str(self) -> &'static str {
        match self {
            PlotStyle::Lines => "lines",
            PlotStyle::Points => "points",
            PlotStyle::LinesPoints => "linespoints",
            PlotStyle::Impulses => "impulses",
            PlotStyle::Dots => "dots",
            PlotStyle::Steps => "steps",
            PlotStyle::FSteps => "fsteps",
            PlotStyle::HiSteps => "histeps",
            PlotStyle::Boxes => "boxes",
            PlotStyle::FilledCurves => "filledcurves",
            PlotStyle::Histograms => "histograms",
            PlotStyle::None => "points",
        }
    }
}

/// Smoothing requested in a `smooth <style>` clause.
///
/// When a smoothing style other than [`SmoothStyle::None`] is active, a
/// plot command requests smoothing instead of a draw style; the two are
/// mutually exclusive per command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmoothStyle {
    /// No smoothing (default)
    #[default]
    None,
    /// Unique smoothing
    Unique,
    /// Frequency-based smoothing
    Frequency,
    /// Cubic spline interpolation
    CSplines,
    /// Approximation cubic splines
    ACSplines,
    /// Bezier curve smoothing
    Bezier,
    /// Subdivided Bezier smoothing
    SBezier,
}

impl SmoothStyle {
    /// The gnuplot keyword for this smoothing style, or `None` when no
    /// smoothing is requested.
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            SmoothStyle::None => None,
            SmoothStyle::Unique => Some("unique"),
            SmoothStyle::Frequency => Some("frequency"),
            SmoothStyle::CSplines => Some("csplines"),
            SmoothStyle::ACSplines => Some("acsplines"),
            SmoothStyle::Bezier => Some("bezier"),
            SmoothStyle::SBezier => Some("sbezier"),
        }
    }
}

/// Contour placement for 3D plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContourType {
    /// Disables contouring
    #[default]
    None,
    /// Contours on the base (XY-plane)
    Base,
    /// Contours on the surface
    Surface,
    /// Contours on both base and surface
    Both,
}

/// How contour levels are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContourParam {
    /// Number of contour levels
    #[default]
    Levels,
    /// Contour increment settings
    Increment,
    /// Specific discrete contour levels
    Discrete,
}

/// Active contour configuration for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourSettings {
    /// Contour placement
    pub kind: ContourType,
    /// How levels are derived
    pub param: ContourParam,
    /// Specific levels for [`ContourParam::Discrete`]
    pub discrete_levels: Vec<f64>,
    /// Start of increment range
    pub increment_start: f64,
    /// Step size for increments
    pub increment_step: f64,
    /// End of increment range
    pub increment_end: f64,
    /// Number of contour levels
    pub levels: u32,
}

impl Default for ContourSettings {
    fn default() -> Self {
        Self {
            kind: ContourType::None,
            param: ContourParam::Levels,
            discrete_levels: Vec::new(),
            increment_start: 0.0,
            increment_step: 0.1,
            increment_end: 1.0,
            levels: 10,
        }
    }
}

impl ContourSettings {
    /// Render the gnuplot commands that apply this configuration.
    ///
    /// Disabled contours render as a single `unset contour`; otherwise the
    /// placement command is followed by the matching `set cntrparam`.
    pub fn commands(&self) -> Vec<String> {
        let placement = match self.kind {
            ContourType::None => return vec!["unset contour".to_string()],
            ContourType::Base => "set contour base",
            ContourType::Surface => "set contour surface",
            ContourType::Both => "set contour both",
        };

        let param = match self.param {
            ContourParam::Levels => format!("set cntrparam levels {}", self.levels),
            ContourParam::Increment => format!(
                "set cntrparam increment {},{},{}",
                self.increment_start, self.increment_step, self.increment_end
            ),
            ContourParam::Discrete => {
                let levels: Vec<String> =
                    self.discrete_levels.iter().map(|l| l.to_string()).collect();
                format!("set cntrparam level discrete {}", levels.join(", "))
            }
        };

        vec![placement.to_string(), param]
    }
}

/// Effect of a command on the session's plot-state counters.
///
/// Typed plotting operations state their intent explicitly instead of
/// relying on substring sniffing of the command text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// A 2D plot: flips the session to 2D mode and increments the counter
    Plot2d,
    /// A 3D plot: flips the session to 3D mode and increments the counter
    Plot3d,
    /// A replot of the current plot: leaves the counters untouched
    Replot,
    /// Any non-plotting command (`set …`, `unset …`, `reset`, …)
    Setting,
}

impl CommandKind {
    /// Classify a raw command string by substring containment.
    ///
    /// This mirrors the historical behavior of pipe-based gnuplot
    /// wrappers and is fragile by construction: a literal title
    /// containing the word "plot" is misclassified. Fixed priority
    /// order: "replot", then "splot", then "plot". Exactly one rule
    /// applies per command text.
    pub fn classify(text: &str) -> Self {
        if text.contains("replot") {
            CommandKind::Replot
        } else if text.contains("splot") {
            CommandKind::Plot3d
        } else if text.contains("plot") {
            CommandKind::Plot2d
        } else {
            CommandKind::Setting
        }
    }
}
