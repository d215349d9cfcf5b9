//! Pure conversions from a reading to derived physical quantities.

/// Simplified-formula result (°F) above which the full regression is used.
const ROTHFUSZ_THRESHOLD_F: f64 = 80.0;

/// Magnus coefficients (Alduchov & Eskridge variant used by most consumer stations).
const MAGNUS_A: f64 = 17.27;
const MAGNUS_B: f64 = 237.7;

/// Rainfall at which the gauge reads full.
const RAIN_GAUGE_FULL_MM: f64 = 100.0;

fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

/// Apparent ("feels like") temperature in °C.
///
/// Uses Steadman's simplified formula and switches to the Rothfusz
/// regression once the simplified estimate exceeds 80 °F. `rel_humidity_pct`
/// is expected in 0..=100 and is not validated.
///
/// # Examples
///
/// ```
/// use edgelink::heat_index;
///
/// let feels_like = heat_index(20.0, 50.0);
/// assert!((feels_like - 19.4).abs() < 0.1);
/// ```
pub fn heat_index(temp_c: f64, rel_humidity_pct: f64) -> f64 {
    let t = celsius_to_fahrenheit(temp_c);
    let rh = rel_humidity_pct;

    let mut hi = 0.5 * (t + 61.0 + (t - 68.0) * 1.2 + rh * 0.094);

    if hi > ROTHFUSZ_THRESHOLD_F {
        hi = -42.379 + 2.04901523 * t + 10.14333127 * rh
            - 0.22475541 * t * rh
            - 0.00683783 * t * t
            - 0.05481717 * rh * rh
            + 0.00122874 * t * t * rh
            + 0.00085282 * t * rh * rh
            - 0.00000199 * t * t * rh * rh;
    }

    fahrenheit_to_celsius(hi)
}

/// Dew point in °C from the Magnus approximation.
///
/// Takes the logarithm of the humidity, so the result is NaN or -inf for
/// `rel_humidity_pct <= 0`. Callers filter such readings beforehand.
pub fn dew_point(temp_c: f64, rel_humidity_pct: f64) -> f64 {
    let alpha = (MAGNUS_A * temp_c) / (MAGNUS_B + temp_c) + (rel_humidity_pct / 100.0).ln();
    (MAGNUS_B * alpha) / (MAGNUS_A - alpha)
}

/// Fill level of the rain gauge in percent.
pub fn rain_gauge_percent(rainfall_mm: f64) -> f64 {
    (rainfall_mm / RAIN_GAUGE_FULL_MM * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_index_simplified_branch() {
        // 68 °F stays well below the regression threshold.
        let hi = heat_index(20.0, 50.0);
        assert!((hi - 20.0).abs() < 1.0, "got {hi}");
        assert!((hi - 19.36).abs() < 0.01, "got {hi}");
    }

    #[test]
    fn test_heat_index_regression_branch() {
        // 35 °C / 60 % is ~45 °C apparent per NOAA tables.
        let hi = heat_index(35.0, 60.0);
        assert!(hi > 44.0 && hi < 47.0, "got {hi}");
        assert!(hi > 35.0);
    }

    #[test]
    fn test_dew_point_reference_value() {
        let dp = dew_point(25.0, 60.0);
        assert!((dp - 16.7).abs() <= 0.1, "got {dp}");
    }

    #[test]
    fn test_dew_point_saturated_air_equals_temperature() {
        assert!((dew_point(12.0, 100.0) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_dew_point_outside_domain() {
        assert!(!dew_point(20.0, 0.0).is_finite());
        assert!(dew_point(20.0, -5.0).is_nan());
    }

    #[test]
    fn test_calculations_are_bit_identical() {
        for (t, rh) in [(20.0, 50.0), (31.7, 83.0), (-4.0, 12.5)] {
            assert_eq!(heat_index(t, rh).to_bits(), heat_index(t, rh).to_bits());
            assert_eq!(dew_point(t, rh).to_bits(), dew_point(t, rh).to_bits());
        }
    }

    #[test]
    fn test_rain_gauge_clamps() {
        assert_eq!(rain_gauge_percent(0.0), 0.0);
        assert_eq!(rain_gauge_percent(12.5), 12.5);
        assert_eq!(rain_gauge_percent(250.0), 100.0);
        assert_eq!(rain_gauge_percent(-1.0), 0.0);
    }
}
