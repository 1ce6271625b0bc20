//! Geometry types produced by the mood chart renderer

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::palette::ColorToken;
use crate::error::ComputeError;
use crate::types::MoodLevel;

/// Space reserved around the plot area, in surface units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for Padding {
    /// Room for y-axis labels on the left and x-axis labels below
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 40.0,
            left: 40.0,
        }
    }
}

/// Drawing surface size and padding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub padding: Padding,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 240.0,
            padding: Padding::default(),
        }
    }
}

impl ChartLayout {
    pub fn new(width: f64, height: f64, padding: Padding) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    /// Copy of this layout with a new surface size.
    ///
    /// Fails on NaN or infinite dimensions, which would project every
    /// point to NaN.
    pub fn resized(&self, width: f64, height: f64) -> Result<Self, ComputeError> {
        let layout = Self {
            width,
            height,
            ..*self
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Check every dimension is finite
    pub fn validate(&self) -> Result<(), ComputeError> {
        let p = &self.padding;
        let dimensions = [
            ("width", self.width),
            ("height", self.height),
            ("padding.top", p.top),
            ("padding.right", p.right),
            ("padding.bottom", p.bottom),
            ("padding.left", p.left),
        ];
        match dimensions.iter().find(|(_, value)| !value.is_finite()) {
            Some((name, value)) => Err(ComputeError::InvalidLayout(format!(
                "{name} must be finite, got {value}"
            ))),
            None => Ok(()),
        }
    }

    /// Horizontal extent of the plot area, never negative
    pub fn plot_width(&self) -> f64 {
        (self.width - self.padding.left - self.padding.right).max(0.0)
    }

    /// Vertical extent of the plot area, never negative
    pub fn plot_height(&self) -> f64 {
        (self.height - self.padding.top - self.padding.bottom).max(0.0)
    }
}

/// A projected series sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub level: MoodLevel,
    /// X-axis label drawn below the point
    pub label: String,
}

/// Bare coordinate used in path commands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
}

impl From<&ChartPoint> for PathPoint {
    fn from(point: &ChartPoint) -> Self {
        Self {
            x: point.x,
            y: point.y,
        }
    }
}

/// One drawing instruction of the smoothed curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo { to: PathPoint },
    QuadTo { control: PathPoint, to: PathPoint },
}

/// Continuous curve through every projected point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SmoothPath {
    commands: Vec<PathCommand>,
}

impl SmoothPath {
    pub(crate) fn new(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Render as an SVG path `d` attribute, e.g. `M 40 120 Q 40 120, 55 95`
    pub fn to_svg(&self) -> String {
        let mut d = String::new();
        for command in &self.commands {
            if !d.is_empty() {
                d.push(' ');
            }
            // Writing to a String cannot fail.
            let _ = match command {
                PathCommand::MoveTo { to } => write!(d, "M {} {}", to.x, to.y),
                PathCommand::QuadTo { control, to } => {
                    write!(d, "Q {} {}, {} {}", control.x, control.y, to.x, to.y)
                }
            };
        }
        d
    }
}

/// Gradient endpoints for the segment between two consecutive points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentColors {
    pub start: ColorToken,
    pub end: ColorToken,
}

/// Horizontal reference rule for one mood level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub level: MoodLevel,
    pub y: f64,
    pub x_start: f64,
    pub x_end: f64,
}

/// Everything a vector surface needs to draw the trend chart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartGeometry {
    pub points: Vec<ChartPoint>,
    pub path: SmoothPath,
    pub segments: Vec<SegmentColors>,
    pub gridlines: Vec<GridLine>,
}

impl ChartGeometry {
    /// True when there is nothing to plot
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Outcome of a render pass.
///
/// `Empty` is the designated no-data state, distinct from any error, so the
/// shell can show a placeholder instead of a blank plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChartRender {
    Empty { message: String },
    Plotted(ChartGeometry),
}

impl ChartRender {
    pub fn is_empty(&self) -> bool {
        matches!(self, ChartRender::Empty { .. })
    }

    pub fn geometry(&self) -> Option<&ChartGeometry> {
        match self {
            ChartRender::Plotted(geometry) => Some(geometry),
            ChartRender::Empty { .. } => None,
        }
    }
}
