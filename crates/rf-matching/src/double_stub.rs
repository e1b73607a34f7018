//! Double-stub matching with fixed λ/8 stub spacing.
//!
//! Reference: Pozar, "Microwave Engineering", 4th ed., pp. 241-245.
//! Loads with G_L > Y₀(1+t²)/(2t²) fall inside the forbidden region and
//! are rejected.

use crate::spec::MatchingNetworkSpec;
use rf_core::constants::C_0;
use rf_core::{RfError, RfResult};
use rf_schematic::{LineEmitter, Schematic};
use std::f64::consts::PI;

pub fn synthesize(spec: &MatchingNetworkSpec, frequency: f64) -> RfResult<Schematic> {
    let lambda = C_0 / frequency;
    let z0 = spec.z0;
    let rl = spec.zl.re;
    let xl = spec.zl.im;

    let d = lambda / 8.0; // Fixed spacing between the stubs
    let y0 = 1.0 / z0;
    let gl = rl / (rl * rl + xl * xl);
    let bl = -xl / (rl * rl + xl * xl);
    let beta = 2.0 * PI / lambda;
    let t = (beta * d).tan();

    if gl > y0 * (1.0 + t * t) / (2.0 * t * t) {
        return Err(RfError::unmatchable(
            "conductance exceeds the double-stub matchable region",
        ));
    }

    let root = ((1.0 + t * t) * gl * y0 - gl * gl * t * t).sqrt();
    let b11 = -bl + (y0 + root) / t;
    let b21 = (y0 * root + gl * y0) / (gl * t);

    let fraction = |b: f64| -> f64 {
        let mut ll = if spec.short_stub {
            -(1.0 / (b * z0)).atan() / (2.0 * PI)
        } else {
            (b * z0).atan() / (2.0 * PI)
        };
        if ll < 0.0 {
            ll += 0.5;
        }
        if spec.short_stub && ll > 0.5 {
            ll -= 0.5;
        }
        ll
    };
    let l_stub1 = fraction(b21) * lambda;
    let l_stub2 = fraction(b11) * lambda;

    let emitter = LineEmitter::new(spec.realization, &spec.substrate, spec.length_unit, frequency);
    let mut sch = Schematic::new();

    let port = sch.add_port(z0, 0, 0, 0);
    let load = sch.add_complex_load(spec.zl, 0, 250, 50);
    let load_gnd = sch.add_load_ground(250, 100);

    let node1 = sch.add_node(50, 0);
    let node2 = sch.add_node(175, 0);

    let emit_stub = |sch: &mut Schematic, length: f64, x: i32| -> String {
        if spec.short_stub {
            emitter.short_stub(sch, z0, length, x, 50)
        } else {
            emitter.open_stub(sch, z0, length, x, 50)
        }
    };

    let stub1 = emit_stub(&mut sch, l_stub1, 50);
    let line = emitter.series_segment(&mut sch, z0, d, 90, 112, 0);
    let stub2 = emit_stub(&mut sch, l_stub2, 175);

    sch.wire(&port, 0, &node1.id, 0);
    sch.wire(&node1.id, 0, &stub1, 1);
    sch.wire(&node1.id, 0, &line, 0);
    sch.wire(&line, 1, &node2.id, 0);
    sch.wire(&node2.id, 0, &stub2, 1);
    sch.wire(&load, 1, &node2.id, 0);
    sch.wire(&load, 0, &load_gnd, 0);

    Ok(sch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::MatchingTopology;
    use num_complex::Complex64;
    use rf_core::units::parse_value;
    use rf_schematic::ComponentKind;

    fn spec(zl: Complex64, short_stub: bool) -> MatchingNetworkSpec {
        MatchingNetworkSpec {
            topology: MatchingTopology::DoubleStub,
            zl,
            short_stub,
            ..MatchingNetworkSpec::default()
        }
    }

    /// |Γ| at the input: stub2 ∥ load, λ/8 line, stub1 in shunt.
    fn input_reflection(
        l1: f64,
        l2: f64,
        zl: Complex64,
        z0: f64,
        short: bool,
        f: f64,
    ) -> f64 {
        let beta = 2.0 * PI * f / C_0;
        let d = C_0 / f / 8.0;
        let j = Complex64::new(0.0, 1.0);
        let z0c = Complex64::new(z0, 0.0);

        let stub_z = |l: f64| -> Complex64 {
            if short {
                j * z0 * (beta * l).tan()
            } else {
                -j * z0 / (beta * l).tan()
            }
        };

        let y_load_side = 1.0 / zl + 1.0 / stub_z(l2);
        let z_load_side = 1.0 / y_load_side;
        let tan_bd = Complex64::new((beta * d).tan(), 0.0);
        let z_after_line =
            z0c * (z_load_side + j * z0c * tan_bd) / (z0c + j * z_load_side * tan_bd);
        let y_in = 1.0 / z_after_line + 1.0 / stub_z(l1);
        let z_in = 1.0 / y_in;
        ((z_in - z0c) / (z_in + z0c)).norm()
    }

    fn stub_lengths(sch: &Schematic, short: bool) -> (f64, f64) {
        let kind = if short {
            ComponentKind::ShortStub
        } else {
            ComponentKind::OpenStub
        };
        let stubs: Vec<f64> = sch
            .components
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| parse_value(c.param("Length").unwrap()).unwrap())
            .collect();
        (stubs[0], stubs[1])
    }

    #[test]
    fn open_stubs_achieve_match() {
        let zl = Complex64::new(60.0, -80.0);
        let sch = synthesize(&spec(zl, false), 2e9).unwrap();
        sch.validate().unwrap();
        let (l1, l2) = stub_lengths(&sch, false);
        let gamma = input_reflection(l1, l2, zl, 50.0, false, 2e9);
        assert!(gamma < 1e-3, "|Γ| = {gamma}");
    }

    #[test]
    fn short_stubs_achieve_match() {
        let zl = Complex64::new(60.0, -80.0);
        let sch = synthesize(&spec(zl, true), 2e9).unwrap();
        let (l1, l2) = stub_lengths(&sch, true);
        let gamma = input_reflection(l1, l2, zl, 50.0, true, 2e9);
        assert!(gamma < 1e-3, "|Γ| = {gamma}");
    }

    #[test]
    fn spacing_is_one_eighth_wavelength() {
        let sch = synthesize(&spec(Complex64::new(100.0, 50.0), false), 1e9).unwrap();
        let line = sch
            .components
            .iter()
            .find(|c| c.kind == ComponentKind::TransmissionLine && c.position.1 == 0)
            .unwrap();
        let d = parse_value(line.param("Length").unwrap()).unwrap();
        approx::assert_relative_eq!(d, C_0 / 1e9 / 8.0, max_relative = 1e-3);
    }

    #[test]
    fn forbidden_region_load_is_rejected() {
        // High-conductance load: G_L > Y₀·(1+t²)/(2t²) with t = tan(π/4) = 1
        let zl = Complex64::new(10.0, 0.0); // G_L = 0.1 S > 0.02 S
        assert!(matches!(
            synthesize(&spec(zl, false), 1e9),
            Err(RfError::UnmatchableLoad { .. })
        ));
    }
}
