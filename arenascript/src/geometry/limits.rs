// Ingestion limits for path data coming out of the flattener

// Characters in one `d` attribute
pub const MAX_PATH_DATA_LEN: usize = 8 * 1024 * 1024;
// Vertices emitted for one path (closing vertex included)
pub const MAX_PATH_VERTICES: usize = 500_000;

// Numeric bounds, pre-transform
pub const COORD_MIN: f64 = -10_000_000.0;
pub const COORD_MAX: f64 = 10_000_000.0;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }
