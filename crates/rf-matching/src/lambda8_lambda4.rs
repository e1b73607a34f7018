//! λ/8 + λ/4 transformer matching.
//!
//! A λ/8 line of impedance |Z_L| rotates the complex load onto the real
//! axis; a λ/4 line of impedance √(Z₀·R_L·|Z_L|/(|Z_L|−X_L)) completes
//! the match. A purely resistive load needs only the λ/4 section.
//! Reference: Bahl, "Fundamentals of RF and Microwave Transistor
//! Amplifiers", Wiley 2009, pp. 159-160.

use crate::spec::MatchingNetworkSpec;
use rf_core::constants::quarter_wavelength;
use rf_core::{RfError, RfResult};
use rf_schematic::{LineEmitter, Schematic};

pub fn synthesize(spec: &MatchingNetworkSpec, frequency: f64) -> RfResult<Schematic> {
    let rl = spec.zl.re;
    let xl = spec.zl.im;
    let z_mag = spec.zl.norm();

    if z_mag - xl <= 0.0 || rl <= 0.0 {
        return Err(RfError::unmatchable(
            "λ/8+λ/4 transformation needs a load with positive resistance",
        ));
    }

    let z_mm = z_mag;
    let z_m = (spec.z0 * rl * z_mag / (z_mag - xl)).sqrt();

    let l4 = quarter_wavelength(frequency);
    let l8 = 0.5 * l4;

    let emitter = LineEmitter::new(spec.realization, &spec.substrate, spec.length_unit, frequency);
    let mut sch = Schematic::new();

    let port = sch.add_port(spec.z0, 0, 0, 0);
    let mut x = 50;

    let quarter = emitter.series_segment(&mut sch, z_m, l4, 90, x, 0);
    sch.wire(&port, 0, &quarter, 0);
    let mut prev = (quarter, 1u8);

    if xl != 0.0 {
        x += 50;
        let eighth = emitter.series_segment(&mut sch, z_mm, l8, 90, x, 0);
        sch.wire(&prev.0, prev.1, &eighth, 0);
        prev = (eighth, 1);
    }

    x += 50;
    let load = sch.add_complex_load(spec.zl, 0, x, 50);
    let load_gnd = sch.add_load_ground(x, 100);
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
    use rf_core::constants::C_0;
    use rf_core::units::parse_value;
    use rf_schematic::ComponentKind;
    use std::f64::consts::PI;

    fn spec(zl: Complex64) -> MatchingNetworkSpec {
        MatchingNetworkSpec {
            topology: MatchingTopology::Lambda8Lambda4,
            zl,
            ..MatchingNetworkSpec::default()
        }
    }

    fn line_params(sch: &Schematic) -> Vec<(f64, f64)> {
        sch.components
            .iter()
            .filter(|c| c.kind == ComponentKind::TransmissionLine)
            .map(|c| {
                (
                    parse_value(c.param("Z0").unwrap()).unwrap(),
                    parse_value(c.param("Length").unwrap()).unwrap(),
                )
            })
            .collect()
    }

    /// Input impedance through the emitted line cascade.
    fn input_impedance(lines: &[(f64, f64)], zl: Complex64, f: f64) -> Complex64 {
        let beta = 2.0 * PI * f / C_0;
        let j = Complex64::new(0.0, 1.0);
        let mut z = zl;
        for &(z0, len) in lines.iter().rev() {
            let z0c = Complex64::new(z0, 0.0);
            let t = Complex64::new((beta * len).tan(), 0.0);
            z = z0c * (z + j * z0c * t) / (z0c + j * z * t);
        }
        z
    }

    #[test]
    fn complex_load_uses_two_sections_and_matches() {
        let zl = Complex64::new(30.0, 40.0);
        let sch = synthesize(&spec(zl), 1e9).unwrap();
        sch.validate().unwrap();
        let lines = line_params(&sch);
        assert_eq!(lines.len(), 2);
        // λ/8 section has the load-magnitude impedance
        assert_relative_eq!(lines[1].0, 50.0, max_relative = 1e-3); // |30+j40| = 50
        assert_relative_eq!(lines[1].1, C_0 / 1e9 / 8.0, max_relative = 1e-3);

        let z_in = input_impedance(&lines, zl, 1e9);
        assert_relative_eq!(z_in.re, 50.0, max_relative = 1e-3);
        assert!(z_in.im.abs() < 0.1, "residual reactance {z_in}");
    }

    #[test]
    fn resistive_load_degenerates_to_quarter_wave() {
        let zl = Complex64::new(100.0, 0.0);
        let sch = synthesize(&spec(zl), 1e9).unwrap();
        let lines = line_params(&sch);
        assert_eq!(lines.len(), 1);
        // Single λ/4 section at √(Z₀·R_L)
        assert_relative_eq!(lines[0].0, (50.0f64 * 100.0).sqrt(), max_relative = 1e-3);
        let z_in = input_impedance(&lines, zl, 1e9);
        assert_relative_eq!(z_in.re, 50.0, max_relative = 1e-3);
    }

    #[test]
    fn inductive_dominated_load_is_rejected() {
        // |Z_L| − X_L → 0 collapses the transformer impedance
        let zl = Complex64::new(0.0, 75.0);
        assert!(synthesize(&spec(zl), 1e9).is_err());
    }
}
