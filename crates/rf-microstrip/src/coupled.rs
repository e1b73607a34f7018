//! Coupled microstrip analysis and joint (width, gap) synthesis.
//!
//! Static even/odd mode model by Hammerstad-Jensen, dispersion by
//! Kirschning-Jansen. The synthesis runs a two-dimensional Newton iteration
//! with a finite-difference Jacobian built from four probe evaluations per
//! step.

use crate::analysis::kirschning_dispersion;
use nalgebra::{Matrix2, Vector2};
use rf_core::MicrostripSubstrate;
use rf_core::constants::ETA_0;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Impedance tolerance for both modes (Ω).
const MAX_ERROR: f64 = 1e-7;

/// Iteration cap of the 2-D Newton loop.
const MAX_ITERATIONS: u32 = 200;

/// Even/odd mode analysis result at one (width, gap, frequency) point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoupledAnalysis {
    pub z_even: f64,
    pub z_odd: f64,
    pub er_eff_even: f64,
    pub er_eff_odd: f64,
}

/// Result of a coupled-line synthesis. Negative `width`/`gap` is the
/// non-convergence sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoupledSynthesis {
    /// Strip width of each line (m)
    pub width: f64,
    /// Gap between the lines (m)
    pub gap: f64,
    /// Physical length (m), shortened by the averaged ε_eff
    pub length: f64,
    /// Average of even and odd mode effective permittivities
    pub er_eff: f64,
    pub z_even: f64,
    pub z_odd: f64,
    pub iterations: u32,
}

impl CoupledSynthesis {
    pub fn converged(&self) -> bool {
        self.width > 0.0
    }
}

/// Even/odd mode analysis of a symmetric coupled microstrip pair.
///
/// `width` and `gap` in meters; `freq` in Hz.
pub fn analyze_coupled_microstrip(
    width: f64,
    gap: f64,
    freq: f64,
    subs: &MicrostripSubstrate,
) -> CoupledAnalysis {
    let h = subs.height;
    let t = subs.metal_thickness;
    let er = subs.er;

    // Width correction due to metal thickness
    let mut da = 0.0;
    let mut db = 0.0;
    if t > 1e-20 {
        if width > h / (2.0 * PI) {
            if h > t * 4.0 * PI {
                da = t / PI * (1.0 + (2.0 * h / t).ln());
            }
        } else if width > t * 2.0 {
            da = t / PI * (1.0 + (4.0 * PI * width / t).ln());
        }
        if gap > 20.0 * t {
            db = 2.0 * t / gap / er;
            da *= 1.0 - 0.5 * (-0.69 * da / db).exp();
        } else {
            da = 0.0;
            db = 0.0;
        }
    }
    let wh_e = (width + da) / h;
    let wh_o = wh_e + db;

    let g = gap / h;
    let fn_ghz_mm = freq / 1e6 * h;

    // Static zero-thickness relative permittivity by Hammerstad and Jensen
    let single_er = |u: f64| -> f64 {
        let a = u * u;
        let b = a * a;
        let mut e = -0.564 * ((er - 0.9) / (er + 3.0)).powf(0.053);
        e *= 1.0
            + ((b + a / 2704.0) / (b + 0.432)).ln() / 49.0
            + (1.0 + a * u / 5929.741).ln() / 18.7;
        (er + 1.0) / 2.0 + (er - 1.0) / 2.0 * (1.0 + 10.0 / u).powf(e)
    };
    let er_e_single = single_er(wh_e);
    let er_o_single = single_er(wh_o);

    // Static effective permittivity of even mode
    let mut er_eff_e = 0.5 * (er + 1.0);
    let b = wh_e * (20.0 + g * g) / (10.0 + g * g) + g * (-g).exp();
    let mut a = -0.564 * ((er - 0.9) / (er + 3.0)).powf(0.053);
    a *= 1.0
        + (b * b * (b * b + 3.698e-4) / (b * b * b * b + 0.432)).ln() / 49.0
        + (1.0 + (b / 18.1).powf(3.0)).ln() / 18.7;
    er_eff_e += 0.5 * (er - 1.0) * (1.0 + 10.0 / b).powf(a);

    // Static effective permittivity of odd mode
    let mut b = 0.747 * er / (0.15 + er);
    b -= (b - 0.207) * (-0.414 * wh_o).exp();
    b *= g.powf(0.593 + 0.694 * (-0.562 * wh_o).exp());
    let a = 0.7287 * (er_o_single - 0.5 * (er + 1.0)) * (1.0 - (-0.179 * wh_o).exp());
    let mut er_eff_o = er_o_single + (0.5 * (er + 1.0) + a - er_o_single) * (-b).exp();

    // Static zero-thickness characteristic impedance by Hammerstad and Jensen
    let single_zl = |u: f64, eps: f64| -> f64 {
        let term = 6.0 + 0.283_185_3 * (-(30.666 / u).powf(0.7528)).exp();
        ETA_0 / eps.sqrt() / (2.0 * PI) * (term / u + (1.0 + 4.0 / (u * u)).sqrt()).ln()
    };

    // Static characteristic impedance of even mode
    let mut zl_e = single_zl(wh_e, er_e_single);
    let q2 = 1.0 + 0.7519 * g + 0.189 * g.powf(2.31);
    let q3 = 0.1975
        + (16.6 + (8.4 / g).powf(6.0)).powf(-0.387)
        + (g.powf(10.0) / (1.0 + (g / 3.4).powf(10.0))).ln() / 241.0;
    let mut a = q2 * ((-g).exp() * wh_e.powf(q3) + (2.0 - (-g).exp()) * wh_e.powf(-q3)); // 1/Q4
    a = 1.739 * wh_e.powf(0.194) / a; // Q1·Q4
    zl_e *= (er_e_single / er_eff_e).sqrt() / (1.0 - zl_e / ETA_0 * er_e_single.sqrt() * a);

    // Static characteristic impedance of odd mode
    let mut zl_o = single_zl(wh_o, er_o_single);
    let mut a = (-6.5 - 0.95 * g.ln() - (g / 0.15).powf(5.0)).exp(); // Q8
    a += 1.0 / 16.5; // Q9
    a *= ((10.0 + 190.0 * g * g) / (1.0 + 82.3 * g * g * g)).ln(); // log(Q7)
    a = wh_o.powf(-a); // Q10_1
    a *= 0.2305
        + (g.powf(10.0) / (1.0 + (g / 5.8).powf(10.0))).ln() / 281.3
        + (1.0 + 0.598 * g.powf(1.154)).ln() / 5.1; // Q6
    a = (wh_o.ln() * a).exp(); // Q10_2
    a *= 1.794 + 1.14 * (1.0 + 0.638 / (g + 0.517 * g.powf(2.43))).ln(); // Q5
    a /= q2; // Q10_3
    a = 1.739 * wh_o.powf(0.194)
        / q2
        / ((-g).exp() * wh_o.powf(q3) + (2.0 - (-g).exp()) * wh_o.powf(-q3))
        - a; // Q4/Q10
    zl_o *= (er_o_single / er_eff_o).sqrt() / (1.0 - zl_o / ETA_0 * er_o_single.sqrt() * a);

    // Keep the static values; dispersion needs both
    let er_e_static = er_eff_e;
    let er_o_static = er_eff_o;

    // Dispersive relative permittivity of even mode
    let mut a =
        0.0363 * (-4.6 * wh_e).exp() * (1.0 - (-(fn_ghz_mm / 38.7).powf(4.97)).exp()); // P3
    let p4 = 1.0 + 2.751 * (1.0 - (-(er / 15.916).powf(8.0)).exp()); // P4
    a *= p4;
    let mut b = 0.334 * (-3.3 * (er / 15.0).powf(3.0)).exp() + 0.746; // P5
    b *= (-(fn_ghz_mm / 18.0).powf(0.368)).exp(); // P6
    b = 1.0
        + 4.069 * b * g.powf(0.479) * (-1.347 * g.powf(0.595) - 0.17 * g.powf(2.5)).exp(); // P7
    a = ((a + 0.1844 * b) * fn_ghz_mm).powf(1.5763); // Fe
    a *= 0.27488 + (0.6315 + 0.525 / (1.0 + 0.0157 * fn_ghz_mm).powf(20.0)) * wh_e
        - 0.065683 * (-8.7513 * wh_e).exp(); // P1
    let p2 = 0.33622 * (1.0 - (-0.03442 * er).exp()); // P2
    er_eff_e = er - (er - er_eff_e) / (1.0 + a * p2);

    // Dispersive relative permittivity of odd mode
    let mut a = 0.7168 * (1.0 + 1.076 / (1.0 + 0.0576 * (er - 1.0))); // P8
    a -= 0.7913
        * (1.0 - (-(fn_ghz_mm / 20.0).powf(1.424)).exp())
        * (2.481 * (er / 8.0).powf(0.946)).atan(); // P9
    a += (1.0 - a) / (1.0 + 1.183 * wh_o.powf(1.376)); // P12
    let mut b = 0.242 * (er - 1.0).powf(0.55); // P10
    b = -1.695 * b / (0.414 + 1.605 * b); // P13
    a *= (b * g.powf(1.092)).exp(); // P15_1
    a /= 0.8928 + 0.1072 * (1.0 - (-0.42 * (fn_ghz_mm / 20.0).powf(3.215)).exp()); // P14
    let mut b = 0.6366
        * ((-0.3401 * fn_ghz_mm).exp() - 1.0)
        * (1.263 * (wh_o / 3.0).powf(1.629)).atan(); // P11
    b = (1.0 - 0.8928 * (1.0 + b) * a).abs(); // P15_2
    let mut a =
        0.0363 * (-4.6 * wh_o).exp() * (1.0 - (-(fn_ghz_mm / 38.7).powf(4.97)).exp()); // P3
    a = ((a * p4 + 0.1844) * fn_ghz_mm * b).powf(1.5763); // Fo
    a *= 0.27488 + (0.6315 + 0.525 / (1.0 + 0.0157 * fn_ghz_mm).powf(20.0)) * wh_o
        - 0.065683 * (-8.7513 * wh_o).exp(); // P1
    er_eff_o = er - (er - er_eff_o) / (1.0 + a * p2);

    // Dispersive characteristic impedance of even mode
    let q11 = 0.893 * (1.0 - 0.3 / (1.0 + 0.7 * (er - 1.0)));
    let mut a = -2.121
        * ((fn_ghz_mm / 20.0).powf(4.91) / (1.0 + q11 * (fn_ghz_mm / 20.0).powf(4.91)))
        * (-2.87 * g).exp()
        * g.powf(0.902); // Q12
    let q13 = 1.0 + 0.038 * (er / 8.0).powf(5.1);
    let q14 = 1.0 + 1.203 * (er / 15.0).powf(4.0) / (1.0 + (er / 15.0).powf(4.0));
    let b = 1.887 * (-1.5 * g.powf(0.84)).exp() * g.powf(q14)
        / (1.0
            + 0.41 * (fn_ghz_mm / 15.0).powf(3.0) * wh_e.powf(2.0 / q13)
                / (0.125 + wh_e.powf(1.626 / q13))); // Q15
    a += b * (1.0 + 9.0 / (1.0 + 0.403 * (er - 1.0).powi(2))); // Q16
    a -= 0.394
        * (1.0 - (-1.47 * (wh_e / 7.0).powf(0.672)).exp())
        * (1.0 - (-4.25 * (fn_ghz_mm / 20.0).powf(1.87)).exp()); // Q17
    a += 0.61 * (1.0 - (-2.13 * (wh_e / 8.0).powf(1.593)).exp()) / (1.0 + 6.544 * g.powf(4.17)); // Q18
    let b = 0.21 * g.powi(4)
        / ((1.0 + 0.18 * g.powf(4.9))
            * (1.0 + 0.1 * wh_e * wh_e)
            * (1.0 + (fn_ghz_mm / 24.0).powf(3.0))); // Q19
    a += b * (0.09 + 1.0 / (1.0 + 0.1 * (er - 1.0).powf(2.7))); // Q20

    let b = 4.766 * (-3.228 * wh_e.powf(0.641)).exp(); // pe
    a += 1.275
        * (1.0 - (-0.004625 * b * er.powf(1.674) * (fn_ghz_mm / 18.365).powf(2.745)).exp())
        + 1.0; // Ce

    let mut b = (1.0
        - 42.54 * g.powf(0.133) * (-0.812 * g).exp() * wh_e.powf(2.5)
            / (1.0 + 0.033 * wh_e.powf(2.5)))
    .abs(); // Q21
    b = 0.016 + (0.0514 * er * b).powf(4.524); // qe
    let c = (fn_ghz_mm / 28.843).powf(12.0); // re
    let b = 5.086 * b * c / (0.3838 + 0.386 * b)
        * ((-22.2 * wh_e.powf(1.92)).exp() / (1.0 + 1.2992 * c))
        * ((er - 1.0).powf(6.0) / (1.0 + 10.0 * (er - 1.0).powf(6.0))); // de

    let (er_disp_e, _, r17) = kirschning_dispersion(er, wh_e, fn_ghz_mm, er_e_static, 1.0);
    let q = (0.9408 * er_disp_e.powf(a) - 0.9603)
        / ((0.9408 - b) * er_e_static.powf(a) - 0.9603);
    let zl_e = zl_e * q.powf(r17);

    // Dispersive characteristic impedance of odd mode
    let (_, zl_single_disp, _) =
        kirschning_dispersion(er, wh_o, fn_ghz_mm, er_o_static, zl_o);
    let d = zl_single_disp;

    let mut a = ((er - 1.0) / 13.0).powf(12.0);
    a = 30.0 - 22.2 * a / (1.0 + 3.0 * a); // Q26
    a -= 15.16 / (1.0 + 0.196 * (er - 1.0).powi(2)); // Q29
    a = 0.925 * (fn_ghz_mm / a).powf(1.536) / (1.0 + 0.3 * (fn_ghz_mm / 30.0).powf(1.536)); // Q22
    let mut zl_o = zl_o * (er_eff_o / er_o_static).powf(a);

    let mut a = (er - 1.0).powf(1.5);
    a = 0.4 * g.powf(0.84) * (1.0 + 2.5 * a / (5.0 + a)); // Q27
    a = 1.0
        + 0.005 * fn_ghz_mm * a
            / ((1.0 + 0.812 * (fn_ghz_mm / 15.0).powf(1.9)) * (1.0 + 0.025 * wh_o * wh_o)); // Q23
    zl_o -= d * a;

    let mut a = (er - 1.0).powi(2);
    a = (0.3 * fn_ghz_mm * fn_ghz_mm / (10.0 + fn_ghz_mm * fn_ghz_mm))
        * (1.0 + 2.333 * a / (5.0 + a)); // Q25
    let mut b = (er - 1.0).powf(3.0);
    b = 0.149 * b / (94.5 + 0.038 * b); // Q28
    let c = wh_o.powf(0.894);
    b *= 2.506 * c * ((1.0 + 1.3 * wh_o) * fn_ghz_mm / 99.25).powf(4.29) / (3.575 + c); // Q24
    let zl_o = d + zl_o / (1.0 + b + (0.46 * g).powf(2.2) * a);

    CoupledAnalysis {
        z_even: zl_e,
        z_odd: zl_o,
        er_eff_even: er_eff_e,
        er_eff_odd: er_eff_o,
    }
}

/// Jointly solve for the (width, gap) realizing the target even and odd
/// mode impedances at `freq`, shortening `electrical_length` by the average
/// effective permittivity.
///
/// The initial guess combines Wheeler's single-line synthesis per mode with
/// the cosh identities relating coupled geometry to the equivalent single
/// strips. Each Newton step evaluates the model at (w, g), (w + w/100, g),
/// and (w, g + g/100) to build the 2×2 Jacobian.
pub fn synthesize_coupled_microstrip(
    z_even: f64,
    z_odd: f64,
    electrical_length: f64,
    freq: f64,
    subs: &MicrostripSubstrate,
) -> CoupledSynthesis {
    let h = subs.height;
    let er = subs.er;

    // Wheeler estimate of w/h for a single line of each mode impedance
    let wheeler = |zl: f64| -> f64 {
        let a = (zl * (er + 1.0).sqrt() / 84.8).exp() - 1.0;
        8.0 * (a * ((7.0 + 4.0 / er) / 11.0) + ((1.0 + 1.0 / er) / 0.81)).sqrt() / a
    };
    let wh_even = wheeler(z_even);
    let wh_odd = wheeler(z_odd);

    // First rough estimation of the coupled geometry
    let ce = (0.5 * PI * wh_even).cosh();
    let co = (0.5 * PI * wh_odd).cosh();
    let mut gap = (2.0 / PI) * ((ce + co - 2.0) / (co - ce)).acosh() * h;
    let mut width = (((ce * co - 1.0) / (co - ce)).acosh() / PI - gap / 2.0) * h;

    let mut iterations = 0;
    while iterations < MAX_ITERATIONS {
        let current = analyze_coupled_microstrip(width, gap, freq, subs);

        if (z_even - current.z_even).abs() < MAX_ERROR
            && (z_odd - current.z_odd).abs() < MAX_ERROR
        {
            let er_eff = 0.5 * (current.er_eff_even + current.er_eff_odd);
            return CoupledSynthesis {
                width,
                gap,
                length: electrical_length / er_eff.sqrt(),
                er_eff,
                z_even: current.z_even,
                z_odd: current.z_odd,
                iterations,
            };
        }

        let dw = width / 100.0;
        let probe_w = analyze_coupled_microstrip(width + dw, gap, freq, subs);

        let dg = gap / 100.0;
        let probe_g = analyze_coupled_microstrip(width, gap + dg, freq, subs);

        let jacobian = Matrix2::new(
            (probe_w.z_even - current.z_even) / dw,
            (probe_g.z_even - current.z_even) / dg,
            (probe_w.z_odd - current.z_odd) / dw,
            (probe_g.z_odd - current.z_odd) / dg,
        );
        let residual = Vector2::new(current.z_even - z_even, current.z_odd - z_odd);

        let mut det = jacobian.determinant();
        if det.abs() < 1e-15 {
            det = 1e-15;
        }

        // Cramer solve of J·δ = residual
        width -= (jacobian[(1, 1)] * residual[0] - jacobian[(0, 1)] * residual[1]) / det;
        gap -= (jacobian[(0, 0)] * residual[1] - jacobian[(1, 0)] * residual[0]) / det;

        if width <= 0.0 {
            width = dw;
        }
        if gap <= 0.0 {
            gap = dg;
        }

        iterations += 1;
    }

    CoupledSynthesis {
        width: -1.0,
        gap: -1.0,
        length: -1.0,
        er_eff: -1.0,
        z_even: -1.0,
        z_odd: -1.0,
        iterations,
    }
}
