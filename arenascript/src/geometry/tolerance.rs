// Tolerances for arc-length bookkeeping

pub const EPS_LEN: f64 = 1e-9;            // relative slack on a sample target past the path end
pub const EPS_DENOM: f64 = 1e-12;         // denominator guard for interpolation fractions

#[inline] pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool { (a - b).abs() <= eps }

#[inline]
pub fn safe_div(num: f64, den: f64, fallback: f64) -> f64 {
    if den.abs() <= EPS_DENOM { fallback } else { num/den }
}
