/// Number of decimal places kept by every rounded engine operation.
pub const DEFAULT_PRECISION: u32 = 9;

/// Most decimal places an f64 can keep for values around 1.
pub const MAX_PRECISION: u32 = 15;

/// Replace `-0.0` by `+0.0`, anything else is returned as is.
#[inline(always)]
pub fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Round half away from zero to `precision` decimal places.
///
/// Values too large to be scaled without overflowing are only normalized, they
/// already carry no fractional digits at that magnitude.
pub fn round_to(value: f64, precision: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(i32::try_from(precision).unwrap_or(i32::MAX));
    let scaled = value * factor;
    if !scaled.is_finite() || scaled.abs() >= 2f64.powi(52) {
        return normalize_zero(value);
    }
    normalize_zero(scaled.round() / factor)
}

/// Accept both `1,5` and `1.5` as the same number. Non-finite values are rejected.
pub fn parse_decimal(token: &str) -> Option<f64> {
    token
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
