//! Multisection λ/4 transformer matching.
//!
//! Section impedances follow a logarithmic taper weighted binomially
//! (maximally flat) or by Chebyshev polynomials (equal ripple Γ_max).
//! Reference: Pozar, "Microwave Engineering", 4th ed., pp. 246-261.

use crate::spec::{MatchingNetworkSpec, TaperWeighting};
use rf_core::constants::quarter_wavelength;
use rf_core::units::{LengthUnit, format_length};
use rf_core::{RfError, RfResult};
use rf_prototype::{binomial_coefficient, chebyshev_taper_weights};
use rf_schematic::{LineEmitter, Schematic, TlRealization};

/// Binomial section impedances between `z0` and the load resistance.
fn design_binomial(z0: f64, rl: f64, n_sections: usize) -> Vec<f64> {
    let n = n_sections + 1;
    let mut z = Vec::with_capacity(n_sections);
    let mut z_prev = z0;
    for i in 1..n {
        let ci = binomial_coefficient(n - 1, i - 1) as f64;
        let zi = (z_prev.ln() + ci / 2.0f64.powi(n as i32 - 1) * (rl / z0).ln()).exp();
        z_prev = zi;
        z.push(zi);
    }
    z
}

/// Chebyshev section impedances with passband tolerance `gamma_max`.
fn design_chebyshev(
    z0: f64,
    rl: f64,
    n_sections: usize,
    gamma_max: f64,
) -> RfResult<Vec<f64>> {
    let log_ratio = (rl / z0).ln() / (2.0 * gamma_max);
    if log_ratio.abs() < 1.0 {
        return Err(RfError::configuration(
            "load ratio too small for the requested Chebyshev tolerance",
        ));
    }
    let sec_theta_m = ((1.0 / n_sections as f64) * log_ratio.abs().acosh()).cosh();
    let weights = chebyshev_taper_weights(n_sections, sec_theta_m)?;

    let mut z = Vec::with_capacity(n_sections);
    let mut z_prev = z0;
    for w in weights {
        let zi = if rl < z0 {
            (z_prev.ln() - gamma_max * w).exp()
        } else {
            (z_prev.ln() + gamma_max * w).exp()
        };
        z_prev = zi;
        z.push(zi);
    }
    Ok(z)
}

pub fn synthesize(spec: &MatchingNetworkSpec, frequency: f64) -> RfResult<Schematic> {
    let lambda4 = quarter_wavelength(frequency);
    let rl = spec.zl.re;
    if rl <= 0.0 {
        return Err(RfError::unmatchable(
            "quarter-wave transformers match resistive loads",
        ));
    }

    let impedances = match spec.weighting {
        TaperWeighting::Binomial => design_binomial(spec.z0, rl, spec.n_sections),
        TaperWeighting::Chebyshev => design_chebyshev(spec.z0, rl, spec.n_sections, spec.gamma_max)?,
    };

    let emitter = LineEmitter::new(spec.realization, &spec.substrate, spec.length_unit, frequency);
    let mut sch = Schematic::new();

    let port = sch.add_port(spec.z0, 0, 0, 0);
    let mut prev = (port, 0u8);
    let mut prev_width: Option<f64> = None;
    let mut posx = 50;

    for &zi in &impedances {
        // Width step between adjacent microstrip sections
        if spec.realization == TlRealization::Microstrip {
            let width = emitter.width_for(zi);
            if let Some(w_prev) = prev_width {
                posx += 10;
                let step = sch.add_microstrip_step(
                    &format_length(w_prev, LengthUnit::Mm),
                    &format_length(width, LengthUnit::Mm),
                    &spec.substrate,
                    posx,
                    0,
                );
                sch.wire(&prev.0, prev.1, &step, 0);
                prev = (step, 1);
                posx += 60;
            }
            prev_width = Some(width);
        }

        let line = emitter.series_segment(&mut sch, zi, lambda4, 90, posx, 0);
        sch.wire(&prev.0, prev.1, &line, 0);
        prev = (line, 1);
        posx += 60;
    }

    let load = sch.add_complex_load(spec.zl, 0, posx, 50);
    let load_gnd = sch.add_load_ground(posx, 100);
    sch.wire(&load, 1, &prev.0, prev.1);
    sch.wire(&load, 0, &load_gnd, 0);

    Ok(sch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::MatchingTopology;
    use approx::assert_relative_eq;
    use num_complex::Complex64;
    use rf_core::units::parse_value;
    use rf_schematic::ComponentKind;

    fn spec(weighting: TaperWeighting, n: usize) -> MatchingNetworkSpec {
        MatchingNetworkSpec {
            topology: MatchingTopology::MultisectionQuarterWave,
            zl: Complex64::new(200.0, 0.0),
            n_sections: n,
            weighting,
            ..MatchingNetworkSpec::default()
        }
    }

    #[test]
    fn binomial_single_section_is_geometric_mean() {
        let z = design_binomial(50.0, 200.0, 1);
        assert_eq!(z.len(), 1);
        assert_relative_eq!(z[0], 100.0, max_relative = 1e-9);
    }

    #[test]
    fn binomial_impedances_increase_monotonically_toward_larger_load() {
        let z = design_binomial(50.0, 200.0, 4);
        for pair in z.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert!(z[0] > 50.0 && z[3] < 200.0);
    }

    #[test]
    fn chebyshev_taper_stays_between_terminations() {
        let z = design_chebyshev(50.0, 200.0, 3, 0.05).unwrap();
        for zi in &z {
            assert!(*zi > 50.0 && *zi < 200.0, "Z = {zi}");
        }
    }

    #[test]
    fn chebyshev_descends_for_small_load() {
        let z = design_chebyshev(50.0, 12.5, 3, 0.05).unwrap();
        for pair in z.windows(2) {
            assert!(pair[1] < pair[0]);
        }
    }

    #[test]
    fn emits_one_quarter_wave_line_per_section() {
        let sch = synthesize(&spec(TaperWeighting::Binomial, 4), 1e9).unwrap();
        sch.validate().unwrap();
        assert_eq!(sch.count_of(ComponentKind::TransmissionLine), 4);
        let lambda4 = quarter_wavelength(1e9);
        for line in sch
            .components
            .iter()
            .filter(|c| c.kind == ComponentKind::TransmissionLine)
        {
            let len = parse_value(line.param("Length").unwrap()).unwrap();
            assert_relative_eq!(len, lambda4, max_relative = 1e-3);
        }
    }

    #[test]
    fn microstrip_realization_steps_between_sections() {
        let s = MatchingNetworkSpec {
            realization: TlRealization::Microstrip,
            ..spec(TaperWeighting::Chebyshev, 3)
        };
        let sch = synthesize(&s, 1e9).unwrap();
        sch.validate().unwrap();
        assert_eq!(sch.count_of(ComponentKind::MicrostripLine), 3);
        assert_eq!(sch.count_of(ComponentKind::MicrostripStep), 2);
    }

    #[test]
    fn eight_chebyshev_sections_are_rejected() {
        let s = spec(TaperWeighting::Chebyshev, 8);
        assert!(synthesize(&s, 1e9).is_err());
    }

    #[test]
    fn reactive_load_is_rejected() {
        let s = MatchingNetworkSpec {
            zl: Complex64::new(0.0, 75.0),
            ..spec(TaperWeighting::Binomial, 3)
        };
        assert!(synthesize(&s, 1e9).is_err());
    }
}
