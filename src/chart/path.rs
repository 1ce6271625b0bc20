//! Smoothed curve and per-segment colors

use super::palette::color_for;
use super::types::{ChartPoint, PathCommand, PathPoint, SegmentColors, SmoothPath};

/// Build a curve passing through every point.
///
/// Each consecutive pair contributes two quadratic segments: the first uses
/// the left point as control and ends at the pair's midpoint, the second uses
/// the right point as both control and end. The curve therefore hits every
/// sample exactly. Fewer than two points yield an empty path.
pub fn build_smooth_path(points: &[ChartPoint]) -> SmoothPath {
    if points.len() < 2 {
        return SmoothPath::default();
    }

    let mut commands = Vec::with_capacity(1 + 2 * (points.len() - 1));
    commands.push(PathCommand::MoveTo {
        to: PathPoint::from(&points[0]),
    });

    for pair in points.windows(2) {
        let current = PathPoint::from(&pair[0]);
        let next = PathPoint::from(&pair[1]);
        let mid = PathPoint {
            x: (current.x + next.x) / 2.0,
            y: (current.y + next.y) / 2.0,
        };

        commands.push(PathCommand::QuadTo {
            control: current,
            to: mid,
        });
        commands.push(PathCommand::QuadTo {
            control: next,
            to: next,
        });
    }

    SmoothPath::new(commands)
}

/// Start and end colors for each segment between consecutive points
pub fn build_segment_colors(points: &[ChartPoint]) -> Vec<SegmentColors> {
    points
        .windows(2)
        .map(|pair| SegmentColors {
            start: color_for(pair[0].level),
            end: color_for(pair[1].level),
        })
        .collect()
}
