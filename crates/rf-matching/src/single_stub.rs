//! Single-stub matching.
//!
//! A series line of length d moves the load to the unit-conductance
//! circle; one shunt stub cancels the remaining susceptance.
//! Reference: Pozar, "Microwave Engineering", 4th ed., pp. 234-241.

use crate::spec::MatchingNetworkSpec;
use rf_core::RfResult;
use rf_core::constants::C_0;
use rf_schematic::{LineEmitter, Schematic};
use std::f64::consts::PI;

/// Solve tan(βd) for the distance bringing Re(Y) to Y₀.
fn line_tangent(rl: f64, xl: f64, z0: f64) -> f64 {
    if rl == z0 {
        return -xl / (2.0 * z0);
    }
    let discriminant = ((rl / z0) * ((z0 - rl) * (z0 - rl) + xl * xl).abs()).sqrt();
    let t1 = (xl + discriminant) / (rl - z0);
    let t2 = (xl - discriminant) / (rl - z0);
    if t1 != 0.0 { t1 } else { t2 }
}

/// Normalized susceptance at the stub attachment point.
fn susceptance(t: f64, rl: f64, xl: f64, z0: f64) -> f64 {
    (rl * rl * t - (z0 - xl * t) * (z0 * t + xl))
        / (z0 * (rl * rl + (z0 * t + xl) * (z0 * t + xl)))
}

fn normalize_phase(phase: f64) -> f64 {
    if phase < 0.0 {
        (PI + phase) / (2.0 * PI)
    } else {
        phase / (2.0 * PI)
    }
}

/// Stub length cancelling susceptance `b`, in fractions of λ, resolved
/// by the open/short branch and normalized into [0, λ/2).
fn stub_length_fraction(b: f64, z0: f64, short_stub: bool) -> f64 {
    if short_stub {
        let mut ll = (1.0 / (b * z0)).atan() / (2.0 * PI);
        if ll > 0.5 {
            ll -= 0.5;
        }
        if ll < 0.0 {
            ll += 0.5;
        }
        ll
    } else {
        let mut ll = -(b * z0).atan() / (2.0 * PI);
        if ll < 0.0 {
            ll += 0.5;
        }
        ll
    }
}

pub fn synthesize(spec: &MatchingNetworkSpec, frequency: f64) -> RfResult<Schematic> {
    let lambda = C_0 / frequency;
    let z0 = spec.z0;
    let rl = spec.zl.re;
    let xl = spec.zl.im;

    let t = line_tangent(rl, xl, z0);
    let b = susceptance(t, rl, xl, z0);
    let d = normalize_phase(t.atan()) * lambda;
    let l_stub = stub_length_fraction(b, z0, spec.short_stub) * lambda;

    let emitter = LineEmitter::new(spec.realization, &spec.substrate, spec.length_unit, frequency);
    let mut sch = Schematic::new();

    let port = sch.add_port(z0, 0, 0, 0);
    let load = sch.add_complex_load(spec.zl, 0, 175, 50);
    let load_gnd = sch.add_load_ground(175, 100);

    let node = sch.add_node(50, 0);
    let stub = if spec.short_stub {
        emitter.short_stub(&mut sch, z0, l_stub, 50, 50)
    } else {
        emitter.open_stub(&mut sch, z0, l_stub, 50, 50)
    };
    let line = emitter.series_segment(&mut sch, z0, d, 90, 100, 0);

    sch.wire(&port, 0, &node.id, 0);
    sch.wire(&line, 0, &node.id, 0);
    sch.wire(&node.id, 0, &stub, 1);
    sch.wire(&load, 1, &line, 1);
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
    use rf_schematic::{ComponentKind, TlRealization};

    fn spec(short_stub: bool) -> MatchingNetworkSpec {
        MatchingNetworkSpec {
            topology: MatchingTopology::SingleStub,
            zl: Complex64::new(25.0, 50.0),
            short_stub,
            ..MatchingNetworkSpec::default()
        }
    }

    /// |Γ| at the input of the emitted line+stub network.
    fn input_reflection(d: f64, l_stub: f64, zl: Complex64, z0: f64, short: bool, f: f64) -> f64 {
        let beta = 2.0 * PI * f / C_0;
        let j = Complex64::new(0.0, 1.0);
        let z0c = Complex64::new(z0, 0.0);
        // Line transformation
        let tan_bd = Complex64::new((beta * d).tan(), 0.0);
        let z_at_stub = z0c * (zl + j * z0c * tan_bd) / (z0c + j * zl * tan_bd);
        // Stub input impedance
        let z_stub = if short {
            j * z0 * (beta * l_stub).tan()
        } else {
            -j * z0 / (beta * l_stub).tan()
        };
        let y = 1.0 / z_at_stub + 1.0 / z_stub;
        let z_in = 1.0 / y;
        ((z_in - z0c) / (z_in + z0c)).norm()
    }

    #[test]
    fn open_stub_achieves_match() {
        let s = spec(false);
        let sch = synthesize(&s, 1e9).unwrap();
        sch.validate().unwrap();

        let line = sch
            .components
            .iter()
            .find(|c| c.kind == ComponentKind::TransmissionLine && c.position.1 == 0)
            .unwrap();
        let stub = sch
            .components
            .iter()
            .find(|c| c.kind == ComponentKind::OpenStub)
            .unwrap();
        let d = parse_value(line.param("Length").unwrap()).unwrap();
        let l = parse_value(stub.param("Length").unwrap()).unwrap();
        let gamma = input_reflection(d, l, s.zl, 50.0, false, 1e9);
        assert!(gamma < 1e-3, "|Γ| = {gamma}");
    }

    #[test]
    fn short_stub_achieves_match() {
        let s = spec(true);
        let sch = synthesize(&s, 1e9).unwrap();
        let line = sch
            .components
            .iter()
            .find(|c| c.kind == ComponentKind::TransmissionLine && c.position.1 == 0)
            .unwrap();
        let stub = sch
            .components
            .iter()
            .find(|c| c.kind == ComponentKind::ShortStub)
            .unwrap();
        let d = parse_value(line.param("Length").unwrap()).unwrap();
        let l = parse_value(stub.param("Length").unwrap()).unwrap();
        let gamma = input_reflection(d, l, s.zl, 50.0, true, 1e9);
        assert!(gamma < 1e-3, "|Γ| = {gamma}");
    }

    #[test]
    fn matched_resistive_load_needs_short_line() {
        // RL == Z0: t = -XL/(2Z0) handles the degenerate branch
        let s = MatchingNetworkSpec {
            zl: Complex64::new(50.0, 30.0),
            ..spec(false)
        };
        let sch = synthesize(&s, 1e9).unwrap();
        sch.validate().unwrap();
    }

    #[test]
    fn stub_lengths_are_below_half_wave() {
        for short in [false, true] {
            let s = spec(short);
            let sch = synthesize(&s, 1e9).unwrap();
            let kind = if short {
                ComponentKind::ShortStub
            } else {
                ComponentKind::OpenStub
            };
            let stub = sch.components.iter().find(|c| c.kind == kind).unwrap();
            let l = parse_value(stub.param("Length").unwrap()).unwrap();
            let lambda = C_0 / 1e9;
            assert!(l >= 0.0 && l < lambda / 2.0);
        }
    }

    #[test]
    fn microstrip_realization_is_structurally_valid() {
        let s = MatchingNetworkSpec {
            realization: TlRealization::Microstrip,
            ..spec(true)
        };
        let sch = synthesize(&s, 1e9).unwrap();
        sch.validate().unwrap();
        assert_eq!(sch.count_of(ComponentKind::MicrostripLine), 2);
        assert_eq!(sch.count_of(ComponentKind::MicrostripVia), 1);
    }
}
