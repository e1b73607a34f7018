//! Single-line quasi-static analysis with dispersion.

use rf_core::MicrostripSubstrate;
use rf_core::constants::ETA_0;
use std::f64::consts::PI;

/// Kirschning-Jansen dispersion of effective permittivity and impedance.
///
/// `fn_ghz_mm` is the normalized frequency f·h in GHz·mm. Returns the
/// dispersed `(er_eff, zl)` pair plus the R17 impedance exponent, which the
/// coupled-line model reuses.
pub(crate) fn kirschning_dispersion(
    er: f64,
    w_h: f64,
    fn_ghz_mm: f64,
    er_eff: f64,
    zl: f64,
) -> (f64, f64, f64) {
    // Relative effective permittivity
    let mut a = 0.0363 * (-4.6 * w_h).exp() * (1.0 - (-(fn_ghz_mm / 38.7).powf(4.97)).exp());
    a *= 1.0 + 2.751 * (1.0 - (-(er / 15.916).powf(8.0)).exp());
    a = ((0.1844 + a) * fn_ghz_mm).powf(1.5763);
    a *= 0.27488 + w_h * (0.6315 + 0.525 / (1.0 + 0.0157 * fn_ghz_mm).powf(20.0))
        - 0.065683 * (-8.7513 * w_h).exp();
    a *= 0.33622 * (1.0 - (-0.03442 * er).exp());
    let er_freq = er - (er - er_eff) / (1.0 + a);

    // Characteristic impedance
    let a7 = -0.03891 * er.powf(1.4);
    let b7 = -0.267 * w_h.powf(7.0);
    let mut r7 = 1.206 - 0.3144 * a7.exp() * (1.0 - b7.exp());

    let mut a = 0.016 + (0.0514 * er).powf(4.524);
    let b = (fn_ghz_mm / 28.843).powf(12.0);
    a = 5.086 * a * b / (0.3838 + 0.386 * a) / (1.0 + 1.2992 * b);
    a *= (-22.2 * w_h.powf(1.92)).exp();
    let b = (er - 1.0).powf(6.0);
    let r9 = a * b / (1.0 + 10.0 * b);

    let mut a = 4.766 * (-3.228 * w_h.powf(0.641)).exp(); // R3
    a = 1.0
        + 1.275
            * (1.0
                - (-0.004625 * a * er.powf(1.674) * (fn_ghz_mm / 18.365).powf(2.745)).exp()); // R8

    let mut b = 0.9408 * er_freq.powf(a) - 0.9603; // R13
    b /= (0.9408 - r9) * er_eff.powf(a) - 0.9603; // R13 / R14
    let ratio = b;

    let mut a = 0.00044 * er.powf(2.136) + 0.0184; // R10
    a *= 0.707 * (fn_ghz_mm / 12.3).powf(1.097); // R15
    a = (-0.026 * fn_ghz_mm.powf(1.15656) - a).exp();
    let mut b = (fn_ghz_mm / 19.47).powf(6.0);
    b /= 1.0 + 0.0962 * b; // R11
    b = 1.0 + 0.0503 * er * er * b * (1.0 - (-(w_h / 15.0).powf(6.0)).exp()); // R16
    r7 *= 1.0 - 1.1241 * a / b / (1.0 + 0.00245 * w_h * w_h); // R17

    (er_freq, zl * ratio.powf(r7), r7)
}

/// Quasi-static microstrip analysis by Hammerstad-Jensen with metal
/// thickness correction and Kirschning dispersion.
///
/// # Arguments
/// * `width` - Strip width (m), must be > 0
/// * `freq` - Operating frequency (Hz)
/// * `subs` - Substrate definition
///
/// # Returns
/// `(er_eff, z0)`: effective relative permittivity and characteristic
/// impedance (Ω) at the given frequency.
pub fn analyze_microstrip(width: f64, freq: f64, subs: &MicrostripSubstrate) -> (f64, f64) {
    let h = subs.height;
    let t_norm = subs.metal_thickness / h;
    let er = subs.er;
    let mut w_h = width / h;

    // Width correction due to metal thickness
    let mut w1 = w_h;
    if t_norm > 1e-100 {
        let coth = 1.0 / (6.517 * w_h).sqrt().tanh();
        let b = t_norm / PI * (1.0 + 10.873_127 / (t_norm * coth * coth)).ln();
        w1 += b;
        w_h += 0.5 * b * (1.0 + 1.0 / (er - 1.0).sqrt().cosh()); // sech
    }

    // Relative effective permittivity
    let a = w_h * w_h;
    let b = a * a;
    let mut exponent = -0.564 * ((er - 0.9) / (er + 3.0)).powf(0.053);
    exponent *= 1.0
        + ((b + a / 2704.0) / (b + 0.432)).ln() / 49.0
        + (1.0 + a * w_h / 5929.741).ln() / 18.7;
    let mut er_eff = (er + 1.0) / 2.0 + (er - 1.0) / 2.0 * (1.0 + 10.0 / w_h).powf(exponent);

    // Characteristic impedance for the bare and thickness-corrected widths
    let zl_of = |u: f64| -> f64 {
        let term = 6.0 + 0.283_185_3 * (-(30.666 / u).powf(0.7528)).exp();
        ETA_0 / (2.0 * PI) * (term / u + (1.0 + 4.0 / (u * u)).sqrt()).ln()
    };
    let mut zl = zl_of(w_h);
    let zl_w1 = zl_of(w1);

    let correction = zl_w1 / zl;
    zl /= er_eff.sqrt();
    er_eff *= correction * correction;

    // Dispersion; frequency normalized to GHz·mm
    let fn_ghz_mm = freq * h / 1e6;
    let (er_freq, zl_disp, _) = kirschning_dispersion(er, w_h, fn_ghz_mm, er_eff, zl);

    (er_freq, zl_disp)
}

/// Equivalent length extension of a microstrip open end, normalized to the
/// substrate height (Kirschning model).
pub fn open_end_correction(w_h: f64, er: f64, er_eff: f64) -> f64 {
    let q4 = er_eff.powf(0.81);
    let q5 = w_h.powf(0.8544);
    let q1 = 0.434907 * (q4 + 0.26) / (q4 - 0.189) * (q5 + 0.236) / (q5 + 0.87);

    let mut q3 = 1.0 + w_h.powf(0.371) / (2.358 * er + 1.0);
    q3 = 1.0 + 0.5274 / er_eff.powf(0.9236) * (0.084 * w_h.powf(1.9413 / q3)).atan();

    let q4 = 1.0
        + 0.0377 * (6.0 - 5.0 * (0.036 * (1.0 - er)).exp()) * (0.067 * w_h.powf(1.456)).atan();

    let q5 = 1.0 - 0.218 * (-7.5 * w_h).exp();

    q1 * q3 * q5 / q4
}
