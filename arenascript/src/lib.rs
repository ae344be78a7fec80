pub mod config;
pub mod error;
pub mod flatten;
pub mod layers;
pub mod model;
pub mod geometry {
    pub mod limits;
    pub mod path_length;
    pub mod tolerance;
    pub mod transform;
    pub mod wkt;
}
pub mod script;
pub mod svg;

pub use config::ConvertOptions;
pub use error::{ConvertError, ErrorKind, ScriptError};
pub use flatten::{ExternalFlattener, Flattener, PassthroughFlattener};
pub use geometry::transform::Transform;
pub use model::{Label, Path, TrajectoryIndex, Vertex};
pub use script::Compiler;
