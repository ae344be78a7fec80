use crate::model::Vertex;
use std::fmt::Write;

/// `MULTIPOLYGON(((x y,x y,...)),((...)))`, one polygon per path, each path a
/// single exterior ring. Coordinates use `precision` decimal places.
pub fn multipolygon_wkt<P: AsRef<[Vertex]>>(paths: &[P], precision: usize) -> String {
    let mut out = String::from("MULTIPOLYGON(");
    for (i, path) in paths.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str("((");
        for (j, v) in path.as_ref().iter().enumerate() {
            if j > 0 {
                out.push(',');
            }
            let _ = write!(out, "{:.*} {:.*}", precision, v.x, precision, v.y);
        }
        out.push_str("))");
    }
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_triangle() {
        let tri = vec![
            Vertex::new(0.0, 0.0),
            Vertex::new(1.0, 0.0),
            Vertex::new(0.5, -1.0),
            Vertex::new(0.0, 0.0),
        ];
        assert_eq!(
            multipolygon_wkt(&[tri], 1),
            "MULTIPOLYGON(((0.0 0.0,1.0 0.0,0.5 -1.0,0.0 0.0)))"
        );
    }

    #[test]
    fn several_rings_default_precision() {
        let a = vec![Vertex::new(1.0, 2.0)];
        let b = vec![Vertex::new(3.0, 4.0), Vertex::new(5.0, 6.0)];
        assert_eq!(
            multipolygon_wkt(&[a, b], 6),
            "MULTIPOLYGON(((1.000000 2.000000)),((3.000000 4.000000,5.000000 6.000000)))"
        );
    }

    #[test]
    fn no_paths() {
        let none: Vec<Vec<Vertex>> = Vec::new();
        assert_eq!(multipolygon_wkt(&none, 6), "MULTIPOLYGON()");
    }
}
