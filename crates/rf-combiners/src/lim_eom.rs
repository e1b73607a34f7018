//! Lim-Eom three-way divider with arbitrary (M, N, K) power split.
//!
//! With d₁ = M+N+K and d₂ = N+K the five line impedances are
//! Z₁ = Z₀√(d₁/d₂), Z₂ = Z₀√(d₁/M), Z₃ = Z₀, Z₄ = Z₀√(d₂/N),
//! Z₅ = Z₀√(d₂/K); two Z₀ isolation resistors tie the skeleton.

use crate::spec::CombinerSpec;
use rf_core::constants::quarter_wavelength;
use rf_core::{RfError, RfResult};
use rf_schematic::{LineEmitter, Schematic};

pub fn synthesize(spec: &CombinerSpec) -> RfResult<Schematic> {
    let realization = spec
        .realization
        .line()
        .ok_or_else(|| RfError::configuration("Lim-Eom dividers are transmission-line networks"))?;
    let emitter = LineEmitter::new(realization, &spec.substrate, spec.length_unit, spec.frequency);

    let m = spec.output_ratios[0];
    let n = spec.output_ratios[1];
    let k = spec.output_ratios[2];
    let d1 = m + n + k;
    let d2 = n + k;
    let z0 = spec.z0;

    let z1 = z0 * (d1 / d2).sqrt();
    let z2 = z0 * (d1 / m).sqrt();
    let z4 = z0 * (d2 / n).sqrt();
    let z5 = z0 * (d2 / k).sqrt();

    let lambda4 = quarter_wavelength(spec.frequency);

    let mut sch = Schematic::new();

    // Input splits into the M-branch (straight through) and the
    // (N, K)-subtree
    let t1 = sch.add_port(z0, 0, 0, 0);
    let n_in = sch.add_node(50, 0);
    sch.wire(&t1, 0, &n_in.id, 0);

    // M-branch line to the first output
    let line_m = emitter.series_segment(&mut sch, z2, lambda4, 90, 100, 0);
    sch.wire(&n_in.id, 0, &line_m, 0);
    let n_m = sch.add_node(150, 0);
    sch.wire(&line_m, 1, &n_m.id, 0);
    let t2 = sch.add_port(z0, 180, 250, 0);

    // First isolation resistor between the M output and the subtree
    let r1 = sch.add_resistor(z0, 0, 150, 60);
    sch.wire(&n_m.id, 0, &t2, 0);
    sch.wire(&r1, 1, &n_m.id, 0);

    // Subtree feed at Z₁
    let line_sub = emitter.series_segment(&mut sch, z1, lambda4, 0, 50, 60);
    sch.wire(&n_in.id, 0, &line_sub, 1);
    let n_sub = sch.add_node(50, 120);
    sch.wire(&line_sub, 0, &n_sub.id, 0);
    sch.wire(&r1, 0, &n_sub.id, 0);

    // N-branch
    let line_n = emitter.series_segment(&mut sch, z4, lambda4, 90, 100, 120);
    sch.wire(&n_sub.id, 0, &line_n, 0);
    let n_n = sch.add_node(150, 120);
    sch.wire(&line_n, 1, &n_n.id, 0);
    let t3 = sch.add_port(z0, 180, 250, 120);
    sch.wire(&n_n.id, 0, &t3, 0);

    // Second isolation resistor between the N and K outputs
    let r2 = sch.add_resistor(z0, 0, 150, 180);
    sch.wire(&r2, 1, &n_n.id, 0);

    // K-branch
    let line_k = emitter.series_segment(&mut sch, z5, lambda4, 90, 100, 240);
    sch.wire(&n_sub.id, 0, &line_k, 0);
    let n_k = sch.add_node(150, 240);
    sch.wire(&line_k, 1, &n_k.id, 0);
    sch.wire(&r2, 0, &n_k.id, 0);
    let t4 = sch.add_port(z0, 180, 250, 240);
    sch.wire(&n_k.id, 0, &t4, 0);

    Ok(sch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::CombinerTopology;
    use approx::assert_relative_eq;
    use rf_core::units::parse_value;
    use rf_schematic::ComponentKind;

    fn spec(m: f64, n: f64, k: f64) -> CombinerSpec {
        CombinerSpec {
            topology: CombinerTopology::LimEom,
            n_outputs: 3,
            output_ratios: vec![m, n, k],
            ..CombinerSpec::default()
        }
    }

    #[test]
    fn equal_split_impedance_plan() {
        let sch = synthesize(&spec(1.0, 1.0, 1.0)).unwrap();
        sch.validate().unwrap();
        assert_eq!(sch.count_of(ComponentKind::TransmissionLine), 4);
        assert_eq!(sch.count_of(ComponentKind::Resistor), 2);
        assert_eq!(sch.count_of(ComponentKind::Port), 4);

        let z: Vec<f64> = sch
            .components
            .iter()
            .filter(|c| c.kind == ComponentKind::TransmissionLine)
            .map(|c| parse_value(c.param("Z0").unwrap()).unwrap())
            .collect();
        // Z₂ = 50√3, Z₁ = 50√(3/2), Z₄ = Z₅ = 50√2
        assert_relative_eq!(z[0], 86.6025, max_relative = 1e-4);
        assert_relative_eq!(z[1], 61.2372, max_relative = 1e-4);
        assert_relative_eq!(z[2], 70.7107, max_relative = 1e-4);
        assert_relative_eq!(z[3], 70.7107, max_relative = 1e-4);
    }

    #[test]
    fn isolators_are_port_impedance() {
        let sch = synthesize(&spec(2.0, 1.0, 1.0)).unwrap();
        for id in ["R1", "R2"] {
            let r = parse_value(sch.component(id).unwrap().param("R").unwrap()).unwrap();
            assert_relative_eq!(r, 50.0);
        }
    }

    #[test]
    fn heavier_m_ratio_lowers_the_m_branch_impedance() {
        let light = synthesize(&spec(1.0, 1.0, 1.0)).unwrap();
        let heavy = synthesize(&spec(4.0, 1.0, 1.0)).unwrap();
        let z_light =
            parse_value(light.component("TLIN1").unwrap().param("Z0").unwrap()).unwrap();
        let z_heavy =
            parse_value(heavy.component("TLIN1").unwrap().param("Z0").unwrap()).unwrap();
        assert!(z_heavy < z_light);
    }
}
