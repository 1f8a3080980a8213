/// Returns the temperature of replicate `index` on a geometric ladder.
///
/// The ladder starts at `start` and grows by a factor of `exp(exponent)` per
/// replicate, so `temperature(start, k, 0)` is exactly `start`.
#[inline]
pub fn temperature(start: f64, exponent: f64, index: usize) -> f64 {
    start * (exponent * index as f64).exp()
}

/// Formats a temperature the way it is written into a parameter file.
///
/// The value is printed in full (shortest round-trip form, no rounding) and
/// integral values keep a trailing `.0`, e.g. `205.0`.
///
/// Very small or very large magnitudes stay in positional form (`0.00005`,
/// not `5e-05`); no exponent notation is ever produced.
pub fn format_temperature(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rel_eq(a: f64, b: f64) {
        assert!(
            ((a - b) / b).abs() < 1e-12,
            "expected {} to be close to {}",
            a,
            b
        );
    }

    #[test]
    fn first_replicate_is_exactly_the_start_temperature() {
        assert_eq!(temperature(205.0, 0.025, 0), 205.0);
        assert_eq!(temperature(-3.5, 10.0, 0), -3.5);
    }

    #[test]
    fn temperature_grows_geometrically() {
        assert_rel_eq(temperature(205.0, 0.025, 1), 205.0 * 0.025f64.exp());
        assert_rel_eq(temperature(205.0, 0.025, 15), 205.0 * 0.375f64.exp());

        let ratio_a = temperature(300.0, 0.05, 4) / temperature(300.0, 0.05, 3);
        let ratio_b = temperature(300.0, 0.05, 9) / temperature(300.0, 0.05, 8);
        assert_rel_eq(ratio_a, ratio_b);
    }

    #[test]
    fn zero_exponent_gives_flat_ladder() {
        assert!((0..5).all(|i| temperature(310.0, 0.0, i) == 310.0));
    }

    #[test]
    fn positive_exponent_gives_increasing_ladder() {
        let temps: Vec<f64> = (0..16).map(|i| temperature(205.0, 0.025, i)).collect();
        assert_eq!(temps[0], 205.0);
        assert!(temps.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn tiny_and_huge_values_stay_positional() {
        assert_eq!(format_temperature(0.00005), "0.00005");
        assert_eq!(format_temperature(1e16), "10000000000000000.0");
    }

    #[test]
    fn integral_values_keep_a_decimal_point() {
        assert_eq!(format_temperature(205.0), "205.0");
        assert_eq!(format_temperature(0.0), "0.0");
        assert_eq!(format_temperature(-12.0), "-12.0");
    }

    #[test]
    fn fractional_values_are_printed_in_full() {
        assert_eq!(format_temperature(210.5), "210.5");

        let t = temperature(205.0, 0.025, 1);
        let text = format_temperature(t);
        assert_eq!(text.parse::<f64>().unwrap(), t);
        assert!(text.starts_with("210.18"));
    }
}
