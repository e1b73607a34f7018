//! Unit conversions and engineering-notation rendering.
//!
//! Internal math operates in SI units throughout the workspace; schematic
//! components carry their parameter values as human-readable strings because
//! the downstream consumer is a textual netlist. The rendering of a
//! (value, quantity) pair into such a string is centralized here.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// ============================================================================
// Angle and decibel conversions
// ============================================================================

/// Convert degrees to radians.
#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Convert radians to degrees.
#[inline]
pub fn rad_to_deg(radians: f64) -> f64 {
    radians * 180.0 / PI
}

/// Convert a power ratio to decibels: dB = 10·log₁₀(ratio).
#[inline]
pub fn power_to_db(ratio: f64) -> f64 {
    10.0 * ratio.log10()
}

/// Convert decibels to a power ratio: ratio = 10^(dB/10).
#[inline]
pub fn db_to_power(db: f64) -> f64 {
    10.0_f64.powf(db / 10.0)
}

/// Convert a voltage amplitude ratio to decibels: dB = 20·log₁₀(ratio).
#[inline]
pub fn amplitude_to_db(ratio: f64) -> f64 {
    20.0 * ratio.log10()
}

/// Convert decibels to a voltage amplitude ratio: ratio = 10^(dB/20).
#[inline]
pub fn db_to_amplitude(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

// ============================================================================
// Engineering notation
// ============================================================================

/// Physical quantity tag controlling the unit letter appended to a
/// rendered value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quantity {
    /// Ohms (Ω)
    Resistance,
    /// Henries (H)
    Inductance,
    /// Farads (F)
    Capacitance,
    /// Meters (m)
    Length,
    /// Bare number, no unit letter
    Dimensionless,
}

impl Quantity {
    fn unit_letter(self) -> &'static str {
        match self {
            Quantity::Resistance => "Ω",
            Quantity::Inductance => "H",
            Quantity::Capacitance => "F",
            Quantity::Length => "m",
            Quantity::Dimensionless => "",
        }
    }
}

const PREFIXES: [(f64, &str); 9] = [
    (1e9, "G"),
    (1e6, "M"),
    (1e3, "k"),
    (1.0, ""),
    (1e-3, "m"),
    (1e-6, "u"),
    (1e-9, "n"),
    (1e-12, "p"),
    (1e-15, "f"),
];

/// Render a number with up to four decimal places, trailing zeros trimmed.
fn format_number(x: f64) -> String {
    let s = format!("{x:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".into() } else { s.to_string() }
}

/// Render an SI value as an engineering-notation string with unit suffix,
/// e.g. `format_value(2.34e-9, Quantity::Inductance)` → `"2.34 nH"`.
///
/// Magnitudes below 1e-18 render as `"0"` with the bare unit letter.
pub fn format_value(value: f64, quantity: Quantity) -> String {
    let unit = quantity.unit_letter();
    let magnitude = value.abs();
    if magnitude < 1e-18 {
        return if unit.is_empty() {
            "0".into()
        } else {
            format!("0 {unit}")
        };
    }

    let (factor, prefix) = PREFIXES
        .iter()
        .find(|(f, _)| magnitude >= *f)
        .copied()
        .unwrap_or((1e-15, "f"));

    let scaled = value / factor;
    if unit.is_empty() && prefix.is_empty() {
        format_number(scaled)
    } else {
        format!("{} {prefix}{unit}", format_number(scaled))
    }
}

/// Render a complex impedance, e.g. `"50-j25 Ω"`. A purely real value
/// renders like [`format_value`] with [`Quantity::Resistance`].
pub fn format_complex_impedance(z: Complex64) -> String {
    if z.im.abs() < 1e-18 {
        return format_value(z.re, Quantity::Resistance);
    }
    let sign = if z.im < 0.0 { '-' } else { '+' };
    format!(
        "{}{}j{} Ω",
        format_number(z.re),
        sign,
        format_number(z.im.abs())
    )
}

/// Parse an engineering-notation string back to an SI value; the inverse
/// of [`format_value`]. Accepts with or without the unit letter, e.g.
/// `"3.26 pF"`, `"74.948 mm"`, `"50 Ω"`, `"1.5k"`.
pub fn parse_value(s: &str) -> Option<f64> {
    let s = s.trim();
    let (number_part, suffix) = match s.split_once(' ') {
        Some((n, u)) => (n, u),
        None => {
            let split = s.find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-' && c != 'e')
                .unwrap_or(s.len());
            (&s[..split], &s[split..])
        }
    };
    let mantissa: f64 = number_part.parse().ok()?;
    let factor = match suffix.chars().next() {
        Some('G') => 1e9,
        Some('M') => 1e6,
        Some('k') => 1e3,
        Some('m') if suffix != "mil" => 1e-3,
        Some('u') => 1e-6,
        Some('n') => 1e-9,
        Some('p') => 1e-12,
        Some('f') if suffix != "ft" => 1e-15,
        _ => 1.0,
    };
    Some(mantissa * factor)
}

// ============================================================================
// Display length units
// ============================================================================

/// User-selectable display unit for line and stub lengths. Lengths are held
/// in meters internally and converted only at component emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LengthUnit {
    #[default]
    Mm,
    Mil,
    Um,
    Nm,
    Inch,
    Ft,
    M,
}

impl LengthUnit {
    /// Meters per one display unit.
    pub fn meters_per_unit(self) -> f64 {
        match self {
            LengthUnit::Mm => 1e-3,
            LengthUnit::Mil => 2.54e-5,
            LengthUnit::Um => 1e-6,
            LengthUnit::Nm => 1e-9,
            LengthUnit::Inch => 0.0254,
            LengthUnit::Ft => 0.3048,
            LengthUnit::M => 1.0,
        }
    }

    /// Unit suffix as it appears in rendered parameter strings.
    pub fn suffix(self) -> &'static str {
        match self {
            LengthUnit::Mm => "mm",
            LengthUnit::Mil => "mil",
            LengthUnit::Um => "um",
            LengthUnit::Nm => "nm",
            LengthUnit::Inch => "inch",
            LengthUnit::Ft => "ft",
            LengthUnit::M => "m",
        }
    }
}

/// Convert a length in meters into a rendered string in the given display
/// unit, e.g. `format_length(74.948e-3, LengthUnit::Mm)` → `"74.948 mm"`.
pub fn format_length(meters: f64, unit: LengthUnit) -> String {
    let scaled = meters / unit.meters_per_unit();
    format!("{} {}", format_number(scaled), unit.suffix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    // ================================================================
    // Decibel conversions
    // ================================================================

    #[test]
    fn db_power_round_trip() {
        assert_relative_eq!(db_to_power(power_to_db(42.0)), 42.0, max_relative = 1e-12);
    }

    #[test]
    fn three_db_is_factor_two() {
        assert_relative_eq!(db_to_power(3.0103), 2.0, max_relative = 1e-4);
    }

    #[test]
    fn amplitude_20db_is_factor_ten() {
        assert_relative_eq!(db_to_amplitude(20.0), 10.0, max_relative = 1e-12);
    }

    // ================================================================
    // Engineering notation
    // ================================================================

    #[test]
    fn renders_nanohenries() {
        assert_eq!(format_value(2.34e-9, Quantity::Inductance), "2.34 nH");
    }

    #[test]
    fn renders_picofarads() {
        assert_eq!(format_value(3.26e-12, Quantity::Capacitance), "3.26 pF");
    }

    #[test]
    fn renders_plain_ohms() {
        assert_eq!(format_value(50.0, Quantity::Resistance), "50 Ω");
    }

    #[test]
    fn renders_kilo_ohms() {
        assert_eq!(format_value(1.5e3, Quantity::Resistance), "1.5 kΩ");
    }

    #[test]
    fn renders_dimensionless_without_unit() {
        assert_eq!(format_value(4.4, Quantity::Dimensionless), "4.4");
    }

    #[test]
    fn tiny_values_render_as_zero() {
        assert_eq!(format_value(1e-20, Quantity::Capacitance), "0 F");
        assert_eq!(format_value(0.0, Quantity::Dimensionless), "0");
    }

    #[test]
    fn negative_values_keep_sign() {
        assert_eq!(format_value(-12.5, Quantity::Resistance), "-12.5 Ω");
    }

    #[test]
    fn complex_impedance_renders_both_parts() {
        assert_eq!(
            format_complex_impedance(Complex64::new(25.0, 50.0)),
            "25+j50 Ω"
        );
        assert_eq!(
            format_complex_impedance(Complex64::new(75.0, -30.0)),
            "75-j30 Ω"
        );
        assert_eq!(format_complex_impedance(Complex64::new(50.0, 0.0)), "50 Ω");
    }

    #[test]
    fn parse_inverts_format() {
        for v in [3.26e-12, 12.97e-9, 50.0, 100e6, 74.948e-3] {
            let s = format_value(v, Quantity::Capacitance);
            let back = parse_value(&s).unwrap();
            assert_relative_eq!(back, v, max_relative = 1e-3);
        }
        assert_relative_eq!(parse_value("74.948 mm").unwrap(), 74.948e-3);
        assert_relative_eq!(parse_value("1 mil").unwrap(), 1.0);
        assert_relative_eq!(parse_value("50 Ω").unwrap(), 50.0);
    }

    // ================================================================
    // Length units
    // ================================================================

    #[test]
    fn quarter_wave_at_1ghz_in_mm() {
        assert_eq!(format_length(74.948e-3, LengthUnit::Mm), "74.948 mm");
    }

    #[test]
    fn mil_conversion() {
        // 1 mil = 25.4 μm
        assert_eq!(format_length(2.54e-5, LengthUnit::Mil), "1 mil");
    }

    #[test]
    fn inch_and_foot_factors() {
        assert_relative_eq!(LengthUnit::Inch.meters_per_unit(), 0.0254);
        assert_relative_eq!(
            LengthUnit::Ft.meters_per_unit() / LengthUnit::Inch.meters_per_unit(),
            12.0,
            max_relative = 1e-12
        );
    }

    proptest! {
        #[test]
        fn formatted_value_is_parseable(v in 1e-15..1e9f64) {
            let s = format_value(v, Quantity::Resistance);
            let number = s.split_whitespace().next().unwrap();
            prop_assert!(number.parse::<f64>().is_ok());
        }

        #[test]
        fn scaled_mantissa_in_engineering_range(v in 1e-15..1e9f64) {
            let s = format_value(v, Quantity::Dimensionless);
            let number: f64 = s
                .trim_end_matches(|c: char| c.is_alphabetic())
                .trim()
                .parse()
                .unwrap();
            // Rendering rounds to 4 decimals, so allow the boundary.
            prop_assert!(number.abs() < 1000.0 + 1e-9);
        }
    }
}
