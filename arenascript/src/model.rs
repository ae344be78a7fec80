use crate::error::{ConvertError, Result};

/// A point in simulation space (Y up), produced once by [`crate::Transform::apply`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Self {
        Vertex { x, y }
    }

    pub fn distance(&self, other: &Vertex) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point at `fraction` of the way from `self` to `other`.
    pub fn lerp(&self, other: &Vertex, fraction: f64) -> Vertex {
        Vertex {
            x: self.x + (other.x - self.x) * fraction,
            y: self.y + (other.y - self.y) * fraction,
        }
    }
}

/// Ordered vertex sequence. A closed path repeats its first vertex at the end.
pub type Path = Vec<Vertex>;

/// Text annotation taken from a layer, already in simulation space.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub at: Vertex,
    pub text: String,
}

/// 1-indexed position of this run within a batch of trajectory runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrajectoryIndex {
    pub current: u32,
    pub total: u32,
}

impl Default for TrajectoryIndex {
    fn default() -> Self {
        TrajectoryIndex { current: 1, total: 1 }
    }
}

impl TrajectoryIndex {
    pub fn validate(&self) -> Result<()> {
        if self.total == 0 || self.current == 0 || self.current > self.total {
            return Err(ConvertError::Range {
                what: format!("trajectory {} of {}", self.current, self.total),
            });
        }
        Ok(())
    }
}
