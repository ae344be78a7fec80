//! Path length calculation and arc-length sampling for trajectory runs.
//!
//! A batch of `total` experiment runs starts each run at a different offset
//! along the same perimeter path. [`sample_length`] turns the trajectory index
//! into an offset and [`sample`] cuts the path at that offset.

use crate::error::{ConvertError, Result};
use crate::geometry::tolerance::{safe_div, EPS_LEN};
use crate::model::{Path, TrajectoryIndex, Vertex};

fn require_segment(path: &[Vertex]) -> Result<()> {
    if path.len() < 2 {
        return Err(ConvertError::DegeneratePath {
            id: String::new(),
            vertices: path.len(),
        });
    }
    Ok(())
}

/// Length of the segment from `path[segment]` to `path[segment + 1]`.
pub fn segment_length(path: &[Vertex], segment: usize) -> f64 {
    path[segment].distance(&path[segment + 1])
}

/// Sum of all segment lengths; zero for a single vertex.
pub fn path_length(path: &[Vertex]) -> f64 {
    path.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// Direction of the first segment in radians, `atan2(dy, dx)`.
pub fn heading(path: &[Vertex]) -> Result<f64> {
    require_segment(path)?;
    Ok((path[1].y - path[0].y).atan2(path[1].x - path[0].x))
}

/// Arc-length offset for one trajectory of a batch:
/// `length * (current - 1) / total`.
pub fn sample_length(length: f64, index: TrajectoryIndex) -> Result<f64> {
    index.validate()?;
    let ratio = (index.current - 1) as f64 / index.total as f64;
    Ok(length * ratio)
}

/// Prefix of `path` up to arc length `target`.
///
/// Whole segments are copied while they fit under `target`; the segment that
/// would overshoot is cut by linear interpolation. The final segment of the
/// path is never copied whole, so the last output point always comes from
/// interpolation, even when it lands exactly on a vertex.
///
/// `target == 0` yields only the first vertex.
pub fn sample(path: &[Vertex], target: f64) -> Result<Path> {
    require_segment(path)?;
    let total = path_length(path);
    if !target.is_finite() || target < 0.0 || target > total + EPS_LEN * total.max(1.0) {
        return Err(ConvertError::Range {
            what: format!("sample length {} for path of length {}", target, total),
        });
    }

    let mut trajectory = vec![path[0]];
    if target == 0.0 {
        return Ok(trajectory);
    }

    let mut accumulated = 0.0;
    let mut next_segment = 0;
    // segments: len - 1; copied whole at most: len - 2
    while next_segment < path.len() - 2 {
        let next_len = segment_length(path, next_segment);
        if accumulated + next_len > target {
            break;
        }
        accumulated += next_len;
        trajectory.push(path[next_segment + 1]);
        next_segment += 1;
    }

    let remaining = target - accumulated;
    let fraction = safe_div(remaining, segment_length(path, next_segment), 0.0);
    let start = path[next_segment];
    let end = path[next_segment + 1];
    trajectory.push(start.lerp(&end, fraction));
    Ok(trajectory)
}
