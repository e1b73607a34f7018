//! Physical constants for RF network synthesis.
//!
//! All values use SI units and are sourced from CODATA 2018 recommended values.

use std::f64::consts::PI;

// ============================================================================
// Fundamental electromagnetic constants
// ============================================================================

/// Speed of light in vacuum (m/s)
pub const C_0: f64 = 299_792_458.0;

/// Permeability of free space (H/m)
pub const MU_0: f64 = 4.0e-7 * PI;

/// Permittivity of free space (F/m)
/// ε₀ = 1/(μ₀·c₀²)
pub const EPSILON_0: f64 = 8.854_187_812_8e-12;

/// Intrinsic impedance of free space (Ω)
/// η₀ = √(μ₀/ε₀) ≈ 376.73 Ω
pub const ETA_0: f64 = 376.730_313_668;

// ============================================================================
// Derived quantities
// ============================================================================

/// Compute the wavelength in free space for a given frequency (Hz).
///
/// λ = c₀ / f
///
/// # Panics
/// Does not panic. Returns `f64::INFINITY` for zero frequency.
#[inline]
pub fn wavelength(frequency_hz: f64) -> f64 {
    C_0 / frequency_hz
}

/// Compute the quarter-wavelength λ/4 in free space for a given frequency (Hz).
#[inline]
pub fn quarter_wavelength(frequency_hz: f64) -> f64 {
    C_0 / (4.0 * frequency_hz)
}

/// Compute the angular frequency ω = 2πf for a given frequency (Hz).
#[inline]
pub fn angular_frequency(frequency_hz: f64) -> f64 {
    2.0 * PI * frequency_hz
}

/// Compute the free-space wavenumber β = ω/c₀ = 2π/λ for a given frequency (Hz).
#[inline]
pub fn wavenumber(frequency_hz: f64) -> f64 {
    2.0 * PI * frequency_hz / C_0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn speed_of_light_is_exact_si_value() {
        assert_eq!(C_0, 299_792_458.0);
    }

    #[test]
    fn eta_0_equals_sqrt_mu_0_over_epsilon_0() {
        let computed = (MU_0 / EPSILON_0).sqrt();
        assert_relative_eq!(ETA_0, computed, max_relative = 1e-6);
    }

    #[test]
    fn wavelength_at_1ghz() {
        assert_relative_eq!(wavelength(1.0e9), 0.2998, max_relative = 1e-3);
    }

    #[test]
    fn quarter_wavelength_at_1ghz_is_74_948_mm() {
        assert_relative_eq!(quarter_wavelength(1.0e9), 74.948e-3, max_relative = 1e-4);
    }

    #[test]
    fn wavenumber_relation_to_wavelength() {
        let f = 2.4e9;
        assert_relative_eq!(
            wavenumber(f) * wavelength(f),
            2.0 * std::f64::consts::PI,
            max_relative = 1e-10
        );
    }

    #[test]
    fn wavelength_zero_frequency_is_infinity() {
        assert!(wavelength(0.0).is_infinite());
    }
}
