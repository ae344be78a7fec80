use crate::model::Vertex;

/// Graphics space (Y down, SVG units) to simulation space (Y up, scaled).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: f64,
}

impl Transform {
    pub fn new(scale: f64) -> Self {
        Transform { scale }
    }

    pub fn identity() -> Self {
        Transform { scale: 1.0 }
    }

    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> Vertex {
        Vertex {
            x: x * self.scale,
            y: -y * self.scale,
        }
    }
}
