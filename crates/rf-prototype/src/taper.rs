//! Impedance taper weights for multisection λ/4 transformers.
//!
//! The Chebyshev weights equate the reflection-coefficient polynomial to
//! the N-th Chebyshev polynomial; closed forms are tabulated for
//! N = 1..7. Reference: Pozar, "Microwave Engineering", 4th ed.,
//! pp. 256-261.

use rf_core::{RfError, RfResult};

/// Binomial coefficient C(n, k).
pub fn binomial_coefficient(n: usize, k: usize) -> u64 {
    let mut coeff = 1.0f64;
    for i in 1..=k {
        coeff *= (n + 1 - i) as f64 / i as f64;
    }
    coeff.round() as u64
}

/// Chebyshev section weights for N cascaded λ/4 sections.
///
/// `sec_theta_m` is sec(θ_m) = cosh(acosh(|ln(R_L/Z₀)|/2γ)/N).
pub fn chebyshev_taper_weights(n: usize, sec_theta_m: f64) -> RfResult<Vec<f64>> {
    let s = sec_theta_m;
    let w = match n {
        1 => vec![s],
        2 => vec![s * s, 2.0 * (s * s - 1.0)],
        3 => {
            let w1 = 3.0 * (s.powi(3) - s);
            vec![s.powi(3), w1, w1]
        }
        4 => {
            let w1 = 4.0 * s * s * (s * s - 1.0);
            vec![
                s.powi(4),
                w1,
                2.0 * (1.0 - 4.0 * s * s + 3.0 * s.powi(4)),
                w1,
            ]
        }
        5 => {
            let w1 = 5.0 * (s.powi(5) - s.powi(3));
            let w2 = 10.0 * s.powi(5) - 15.0 * s.powi(3) + 5.0 * s;
            vec![s.powi(5), w1, w2, w2, w1]
        }
        6 => {
            let w1 = 6.0 * s.powi(4) * (s * s - 1.0);
            let w2 = 15.0 * s.powi(6) - 24.0 * s.powi(4) + 9.0 * s * s;
            let w3 = 2.0 * (10.0 * s.powi(6) - 18.0 * s.powi(4) + 9.0 * s * s - 1.0);
            vec![s.powi(6), w1, w2, w3, w2, w1]
        }
        7 => {
            let w1 = 7.0 * s.powi(5) * (s * s - 1.0);
            let w2 = 21.0 * s.powi(7) - 35.0 * s.powi(5) + 14.0 * s.powi(3);
            let w3 = 35.0 * s.powi(7) - 70.0 * s.powi(5) + 42.0 * s.powi(3) - 7.0 * s;
            vec![s.powi(7), w1, w2, w3, w3, w2, w1]
        }
        _ => {
            return Err(RfError::configuration(format!(
                "Chebyshev taper weights are available for 1-7 sections, got {n}"
            )));
        }
    };
    Ok(w)
}
