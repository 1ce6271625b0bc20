//! Projection of a mood series onto the drawing surface
//!
//! The vertical axis uses the fixed domain 1..=5 rather than the observed
//! range, so level 3 always sits at the vertical centre of the plot and
//! charts from different weeks stay comparable.

use super::types::{ChartLayout, ChartPoint, GridLine};
use crate::types::{MoodLevel, MoodSeries, MAX_MOOD_LEVEL, MIN_MOOD_LEVEL};

/// Vertical position of a level inside the layout's plot area
pub fn y_for(level: MoodLevel, layout: &ChartLayout) -> f64 {
    let plot_height = layout.plot_height();
    let span = f64::from(MAX_MOOD_LEVEL - MIN_MOOD_LEVEL);
    let ratio = f64::from(level.get() - MIN_MOOD_LEVEL) / span;
    layout.padding.top + plot_height - ratio * plot_height
}

/// Place every series entry on the surface.
///
/// Points are spaced evenly along X in series order; a lone point sits at
/// the horizontal centre of the plot area.
pub fn project(series: &MoodSeries, layout: &ChartLayout) -> Vec<ChartPoint> {
    let n = series.len();
    let plot_width = layout.plot_width();
    let step = plot_width / (n.saturating_sub(1).max(1)) as f64;

    series
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let x = if n == 1 {
                layout.padding.left + plot_width / 2.0
            } else {
                layout.padding.left + i as f64 * step
            };
            ChartPoint {
                x,
                y: y_for(entry.level, layout),
                level: entry.level,
                label: entry.label.clone(),
            }
        })
        .collect()
}

/// Horizontal reference rules for each level, lowest first
pub fn gridlines(layout: &ChartLayout) -> Vec<GridLine> {
    let x_start = layout.padding.left;
    let x_end = x_start + layout.plot_width();
    MoodLevel::ALL
        .iter()
        .map(|level| GridLine {
            level: *level,
            y: y_for(*level, layout),
            x_start,
            x_end,
        })
        .collect()
}
