//! Number formatting for calculator output.

/// Magnitude at and above which numbers are written in exponential form.
const EXPONENT_UPPER: f64 = 1e21;

/// Magnitude below which non-zero numbers are written in exponential form.
const EXPONENT_LOWER: f64 = 1e-6;

/// Fractional digits kept when formatting a non-integer for display.
const DISPLAY_DECIMALS: usize = 10;

/// Render a number in its plain shortest form.
///
/// Very large and very small magnitudes use exponential notation with an
/// explicit exponent sign (`1e+21`, `1.2e-7`). This is the form a committed
/// result takes when it becomes the next expression.
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= EXPONENT_UPPER || magnitude < EXPONENT_LOWER {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }

    format!("{}", value)
}

/// Format a number for display.
///
/// Integers have no decimal point. Other values are rounded to ten
/// fractional digits and then written in their shortest form, so binary
/// noise past the tenth digit never shows. Anything whose plain form is
/// exponential is returned in that form.
pub fn format_number(value: f64) -> String {
    let plain = number_to_string(value);

    if !value.is_finite() || value.fract() == 0.0 || plain.contains('e') {
        return plain;
    }

    let fixed = format!("{:.*}", DISPLAY_DECIMALS, value);
    match fixed.parse::<f64>() {
        Ok(rounded) => number_to_string(rounded),
        Err(_) => plain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(-12.0), "-12");
        assert_eq!(format_number(1_000_000.0), "1000000");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_decimals_trimmed() {
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(2.25), "2.25");
        assert_eq!(format_number(1.0 / 3.0), "0.3333333333");
        assert_eq!(format_number(-2.0 / 3.0), "-0.6666666667");
    }

    #[test]
    fn test_floating_noise_in_display() {
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(1234567.1), "1234567.1");
        assert_eq!(format_number(99999999.99), "99999999.99");
        assert_eq!(format_number(-1234567.1), "-1234567.1");
    }

    #[test]
    fn test_rounds_to_ten_decimals() {
        assert_eq!(format_number(2.99999999999), "3");
        assert_eq!(format_number(-0.00000000004 - 1e-6), "-0.000001");
        assert_eq!(format_number(0.0000015), "0.0000015");
    }

    #[test]
    fn test_exponential_passthrough() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e22), "1.5e+22");
        assert_eq!(format_number(1.2e-7), "1.2e-7");
        assert_eq!(format_number(-3e-9), "-3e-9");
    }

    #[test]
    fn test_number_to_string_keeps_precision() {
        assert_eq!(number_to_string(0.333333333333), "0.333333333333");
        assert_eq!(number_to_string(42.0), "42");
        assert_eq!(number_to_string(1e20), "100000000000000000000");
        assert_eq!(number_to_string(0.000001), "0.000001");
        assert_eq!(number_to_string(f64::INFINITY), "Infinity");
        assert_eq!(number_to_string(f64::NAN), "NaN");
    }
}
