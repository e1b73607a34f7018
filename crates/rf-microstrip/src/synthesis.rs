//! Newton-iteration synthesis of a single microstrip line.

use crate::analysis::analyze_microstrip;
use rf_core::MicrostripSubstrate;
use serde::{Deserialize, Serialize};

/// Impedance tolerance for the Newton iteration (Ω).
const MAX_ERROR: f64 = 1e-7;

/// Iteration cap; reaching it without convergence yields the sentinel.
const MAX_ITERATIONS: u32 = 150;

/// Result of a single-line synthesis.
///
/// On non-convergence `width`, `er_eff`, and `length` are set to −1; callers
/// check [`MicrostripSynthesis::converged`] or propagate the sentinel into
/// the schematic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MicrostripSynthesis {
    /// Strip width (m)
    pub width: f64,
    /// Physical length (m): electrical length shortened by 1/√ε_eff
    pub length: f64,
    /// Effective relative permittivity at the design frequency
    pub er_eff: f64,
    /// Achieved characteristic impedance (Ω)
    pub z0: f64,
    /// Newton steps taken
    pub iterations: u32,
}

impl MicrostripSynthesis {
    pub fn converged(&self) -> bool {
        self.width > 0.0
    }
}

/// Solve for the microstrip width realizing `z0_target` at `freq`, and
/// shorten `electrical_length` by the resulting effective permittivity.
///
/// Newton iteration with a finite-difference derivative: each step probes
/// `Z(w)` and `Z(w + w/100)` and updates
/// `w ← w − (Z(w) − Z_target)·(w/100)/(Z(w + w/100) − Z(w))`, clamping the
/// width strictly positive. Terminates when `|Z − Z_target| < 1e-7` or
/// after 150 steps (sentinel result).
pub fn synthesize_microstrip(
    z0_target: f64,
    electrical_length: f64,
    freq: f64,
    subs: &MicrostripSubstrate,
) -> MicrostripSynthesis {
    let mut width = 1e-3; // start with 1 mm
    let mut iterations = 0;

    while iterations < MAX_ITERATIONS {
        let (er_eff, z0) = analyze_microstrip(width, freq, subs);

        if (z0_target - z0).abs() < MAX_ERROR {
            return MicrostripSynthesis {
                width,
                length: electrical_length / er_eff.sqrt(),
                er_eff,
                z0,
                iterations,
            };
        }

        let increment = width / 100.0;
        let (_, z0_probe) = analyze_microstrip(width + increment, freq, subs);

        let derivative = (z0_probe - z0) / increment;
        width -= (z0 - z0_target) / derivative;

        if width <= 0.0 {
            width = increment;
        }

        iterations += 1;
    }

    MicrostripSynthesis {
        width: -1.0,
        length: -1.0,
        er_eff: -1.0,
        z0: -1.0,
        iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fr4() -> MicrostripSubstrate {
        MicrostripSubstrate::fr4()
    }

    #[test]
    fn fifty_ohm_on_fr4_at_2ghz() {
        let result = synthesize_microstrip(50.0, 20e-3, 2e9, &fr4());
        assert!(result.converged());
        assert_relative_eq!(result.width, 3.05e-3, epsilon = 0.1e-3);
        let (_, z0) = analyze_microstrip(result.width, 2e9, &fr4());
        assert_relative_eq!(z0, 50.0, epsilon = 0.1);
    }

    #[test]
    fn achieved_impedance_within_solver_tolerance() {
        for target in [25.0, 50.0, 75.0, 100.0] {
            let result = synthesize_microstrip(target, 10e-3, 1e9, &fr4());
            assert!(result.converged(), "no convergence for {target} Ω");
            let (_, z0) = analyze_microstrip(result.width, 1e9, &fr4());
            assert_relative_eq!(z0, target, max_relative = 1e-4);
        }
    }

    #[test]
    fn length_shortening_follows_effective_permittivity() {
        let electrical = 74.948e-3;
        let result = synthesize_microstrip(50.0, electrical, 1e9, &fr4());
        assert!(result.converged());
        assert_relative_eq!(
            result.length / electrical,
            1.0 / result.er_eff.sqrt(),
            max_relative = 1e-9
        );
        assert!(result.length < electrical, "dielectric must shorten the line");
    }

    #[test]
    fn higher_impedance_needs_narrower_strip() {
        let low = synthesize_microstrip(30.0, 10e-3, 1e9, &fr4());
        let high = synthesize_microstrip(90.0, 10e-3, 1e9, &fr4());
        assert!(low.converged() && high.converged());
        assert!(high.width < low.width);
    }

    #[test]
    fn unreachable_impedance_returns_sentinel() {
        let result = synthesize_microstrip(1e6, 10e-3, 1e9, &fr4());
        assert!(!result.converged());
        assert_eq!(result.width, -1.0);
        assert_eq!(result.length, -1.0);
        assert_eq!(result.iterations, 150);
    }
}
