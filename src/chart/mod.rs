//! Mood trend chart geometry
//!
//! Turns a labeled mood series into coordinates, a smoothed curve and colors
//! for a vector drawing surface. Pixels are the surface's business; this
//! module only describes shape and color.
//!
//! Pipeline: MoodSeries → project → (smooth path, segment colors, gridlines) → ChartGeometry

mod palette;
mod path;
mod projection;
mod types;

pub use palette::{color_for, legend, ColorToken};
pub use path::{build_segment_colors, build_smooth_path};
pub use projection::{gridlines, project, y_for};
pub use types::{
    ChartGeometry, ChartLayout, ChartPoint, ChartRender, GridLine, Padding, PathCommand,
    PathPoint, SegmentColors, SmoothPath,
};

use tracing::debug;

use crate::types::MoodSeries;

/// Placeholder shown instead of a chart when the series is empty
pub const EMPTY_SERIES_MESSAGE: &str = "No mood data for the last week.";

/// Renderer bound to one surface layout
#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    layout: ChartLayout,
}

impl ChartRenderer {
    pub fn new(layout: ChartLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    /// Compute the full geometry for a series.
    ///
    /// An empty series yields an empty geometry rather than an error.
    pub fn geometry(&self, series: &MoodSeries) -> ChartGeometry {
        if series.is_empty() {
            return ChartGeometry::default();
        }

        let points = project(series, &self.layout);
        let path = build_smooth_path(&points);
        let segments = build_segment_colors(&points);

        ChartGeometry {
            points,
            path,
            segments,
            gridlines: gridlines(&self.layout),
        }
    }

    /// Render a series, signalling the no-data state explicitly
    pub fn render(&self, series: &MoodSeries) -> ChartRender {
        if series.is_empty() {
            debug!("mood series is empty, rendering placeholder");
            return ChartRender::Empty {
                message: EMPTY_SERIES_MESSAGE.to_string(),
            };
        }

        let geometry = self.geometry(series);
        debug!(
            points = geometry.points.len(),
            segments = geometry.segments.len(),
            "rendered mood chart"
        );
        ChartRender::Plotted(geometry)
    }
}
