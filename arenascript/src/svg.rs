//! Interpreter for flattened SVG path data (`M m L l Z z` only).

use crate::error::{ConvertError, Result};
use crate::geometry::limits;
use crate::geometry::transform::Transform;
use crate::model::Path;
use log::trace;

fn malformed(reason: impl Into<String>) -> ConvertError {
    ConvertError::parse("path data", reason)
}

/// Separates operator letters from their numbers and turns commas into spaces,
/// so the result splits cleanly on whitespace.
fn normalize(d: &str) -> String {
    let mut out = String::with_capacity(d.len() + 16);
    for c in d.chars() {
        match c {
            ',' => out.push(' '),
            'M' | 'm' | 'L' | 'l' | 'Z' | 'z' => {
                out.push(' ');
                out.push(c);
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

fn parse_coord(token: &str) -> Result<f64> {
    let v = token
        .parse::<f64>()
        .map_err(|_| malformed(format!("unexpected token '{}'", token)))?;
    if !limits::in_coord_bounds(v) {
        return Err(malformed(format!("coordinate '{}' out of bounds", token)));
    }
    Ok(v)
}

/// Parses a `d` attribute into simulation-space vertices.
///
/// The operator mode and the running point are local to the call. Numbers
/// following `m`/`l` are offsets from the previous point, numbers following
/// `M`/`L` are absolute. A `Z`/`z` repeats the first vertex and has to be the
/// last token.
pub fn parse_path_data(d: &str, transform: &Transform) -> Result<Path> {
    if d.len() > limits::MAX_PATH_DATA_LEN {
        return Err(malformed(format!("{} characters exceeds limit", d.len())));
    }
    let normalized = normalize(d);
    let mut tokens = normalized.split_whitespace();
    let mut path: Path = Vec::new();
    // pre-transform coordinates
    let mut prev = (0.0f64, 0.0f64);
    let mut relative: Option<bool> = None;

    while let Some(token) = tokens.next() {
        match token {
            "M" | "L" => relative = Some(false),
            "m" | "l" => relative = Some(true),
            "Z" | "z" => {
                let first = *path
                    .first()
                    .ok_or_else(|| malformed("close operator before any vertex"))?;
                if let Some(extra) = tokens.next() {
                    return Err(malformed(format!(
                        "close operator followed by '{}', it must be the final token",
                        extra
                    )));
                }
                path.push(first);
            }
            _ => {
                let relative = relative.ok_or_else(|| {
                    malformed(format!("coordinate '{}' before any move/line operator", token))
                })?;
                let mut x = parse_coord(token)?;
                let y_token = tokens
                    .next()
                    .ok_or_else(|| malformed(format!("x coordinate '{}' has no y", token)))?;
                let mut y = parse_coord(y_token)?;
                if relative {
                    x += prev.0;
                    y += prev.1;
                    if !limits::in_coord_bounds(x) || !limits::in_coord_bounds(y) {
                        return Err(malformed("accumulated coordinate out of bounds"));
                    }
                }
                prev = (x, y);
                if path.len() >= limits::MAX_PATH_VERTICES {
                    return Err(malformed("too many vertices"));
                }
                path.push(transform.apply(x, y));
            }
        }
    }

    if path.is_empty() {
        return Err(malformed("no vertices"));
    }
    trace!("parsed {} vertices from {} bytes of path data", path.len(), d.len());
    Ok(path)
}
