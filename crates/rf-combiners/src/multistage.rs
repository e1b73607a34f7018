//! Multistage Wilkinson divider.
//!
//! The branch sections follow a Chebyshev taper between Z₀ and 2Z₀;
//! each stage's isolation resistor comes from back-propagating the port
//! impedance through the downstream sections with a lossy propagation
//! constant γ = α + jβ, R_k = 2·Z₀Z'/(Z' − Z₀). Lumped mode maps each
//! λ/4 section onto its LC equivalent.

use crate::spec::CombinerSpec;
use num_complex::Complex64;
use rf_core::constants::{C_0, angular_frequency, quarter_wavelength};
use rf_core::{RfError, RfResult};
use rf_prototype::chebyshev_taper_weights;
use rf_schematic::{LineEmitter, Schematic};

/// Chebyshev-tapered section impedances from Z₀ toward the load ratio
/// `rl` at ripple `gamma`.
fn chebyshev_taper(z0: f64, rl: f64, n: usize, gamma: f64) -> RfResult<Vec<f64>> {
    let log_ratio = (rl / z0).ln() / (2.0 * gamma);
    let sec_theta_m = if log_ratio.abs() < 1.0 {
        0.0
    } else {
        ((1.0 / n as f64) * log_ratio.abs().acosh()).cosh()
    };
    let weights = chebyshev_taper_weights(n, sec_theta_m)?;

    let mut z = Vec::with_capacity(n);
    let mut z_prev = z0;
    for w in weights {
        let zi = if rl < z0 {
            (z_prev.ln() - gamma * w).exp()
        } else {
            (z_prev.ln() + gamma * w).exp()
        };
        z_prev = zi;
        z.push(zi);
    }
    Ok(z)
}

/// Isolation resistors, one per stage, emitted front-first.
///
/// Walks the taper from the output end, transforming the port impedance
/// through each lossy λ/4 section.
fn isolation_resistors(
    spec: &CombinerSpec,
    z_lines: &[f64],
    lambda4: f64,
    gamma: Complex64,
) -> Vec<f64> {
    let n = spec.n_stages;
    let mut z_aux = z_lines[n - 1];
    let mut resistors = std::collections::VecDeque::new();

    for &z_line in z_lines.iter().take(n) {
        let tanh_gl = (gamma * lambda4).tanh();
        let z_seen = (Complex64::new(z_aux, 0.0)
            * (Complex64::new(spec.z0, 0.0) + Complex64::new(z_aux, 0.0) * tanh_gl)
            / (Complex64::new(z_aux, 0.0) + Complex64::new(spec.z0, 0.0) * tanh_gl))
            .norm();
        z_aux = z_line;
        let r = spec.z0 * z_seen / (z_seen - spec.z0);
        resistors.push_front(2.0 * r);
    }
    resistors.into()
}

pub fn synthesize(spec: &CombinerSpec) -> RfResult<Schematic> {
    let z_lines = chebyshev_taper(spec.z0, 2.0 * spec.z0, spec.n_stages, 0.05)?;
    let lambda4 = quarter_wavelength(spec.frequency);
    let alpha = (0.1 * spec.alpha_db).powi(10).ln();
    let gamma = Complex64::new(alpha, angular_frequency(spec.frequency) / C_0);
    let risol = isolation_resistors(spec, &z_lines, lambda4, gamma);

    match spec.realization.line() {
        Some(realization) => build_lines(spec, &z_lines, &risol, lambda4, realization),
        None => build_lumped(spec, &z_lines, &risol),
    }
}

fn build_lines(
    spec: &CombinerSpec,
    z_lines: &[f64],
    risol: &[f64],
    lambda4: f64,
    realization: rf_schematic::TlRealization,
) -> RfResult<Schematic> {
    let emitter = LineEmitter::new(realization, &spec.substrate, spec.length_unit, spec.frequency);
    let y_upper = -60;
    let y_lower = 60;

    let mut sch = Schematic::new();
    let mut posx = 0;

    let t1 = sch.add_port(spec.z0, 0, posx, 0);
    posx += 50;

    // Input feed at the port impedance
    let feed = emitter.series_segment(&mut sch, spec.z0, lambda4, 90, posx, 0);
    sch.wire(&t1, 0, &feed, 0);
    posx += 50;

    let n_center = sch.add_node(posx, 0);
    let mut n_up = sch.add_hidden_node(posx, y_upper);
    let mut n_down = sch.add_hidden_node(posx, y_lower);
    sch.wire(&feed, 1, &n_center.id, 0);
    sch.wire(&n_center.id, 0, &n_up.id, 0);
    sch.wire(&n_center.id, 0, &n_down.id, 0);

    for (z_line, r_iso) in z_lines.iter().zip(risol) {
        posx += 50;
        let upper = emitter.series_segment(&mut sch, *z_line, lambda4, 90, posx, y_upper);
        let lower = emitter.series_segment(&mut sch, *z_line, lambda4, 90, posx, y_lower);
        sch.wire(&upper, 0, &n_up.id, 0);
        sch.wire(&lower, 0, &n_down.id, 0);

        posx += 50;
        n_up = sch.add_node(posx, y_upper);
        n_down = sch.add_node(posx, y_lower);
        sch.wire(&upper, 1, &n_up.id, 0);
        sch.wire(&lower, 1, &n_down.id, 0);

        let riso = sch.add_resistor(*r_iso, 0, posx, 0);
        sch.wire(&riso, 1, &n_up.id, 0);
        sch.wire(&riso, 0, &n_down.id, 0);
    }

    posx += 50;
    let t2 = sch.add_port(spec.z0, 180, posx, y_upper);
    let t3 = sch.add_port(spec.z0, 180, posx, y_lower);
    sch.wire(&t2, 0, &n_up.id, 0);
    sch.wire(&t3, 0, &n_down.id, 0);

    Ok(sch)
}

fn build_lumped(spec: &CombinerSpec, z_lines: &[f64], risol: &[f64]) -> RfResult<Schematic> {
    let w = angular_frequency(spec.frequency);
    let n = spec.n_stages;
    let l: Vec<f64> = z_lines.iter().map(|z| z / w).collect();
    let c: Vec<f64> = l.iter().map(|li| 1.0 / (li * w * w)).collect();

    let y_upper = -60;
    let y_lower = 60;

    let mut sch = Schematic::new();
    let mut posx = 0;

    let t1 = sch.add_port(spec.z0, 0, posx, 0);
    posx += 50;

    // Shared input shunt capacitor of both first-stage sections
    let c_in = sch.add_capacitor(2.0 * c[0], 0, posx, 30);
    let gnd_in = sch.add_ground(posx, 80);
    sch.wire(&c_in, 0, &gnd_in, 0);
    let n_in = sch.add_node(posx, 0);
    sch.wire(&n_in.id, 0, &t1, 0);
    sch.wire(&c_in, 1, &n_in.id, 0);

    posx += 50;
    let n_center = sch.add_node(posx, 0);
    let mut n_up = sch.add_hidden_node(posx, y_upper);
    let mut n_down = sch.add_hidden_node(posx, y_lower);
    sch.wire(&n_in.id, 0, &n_center.id, 0);
    sch.wire(&n_center.id, 0, &n_up.id, 0);
    sch.wire(&n_center.id, 0, &n_down.id, 0);

    for i in 0..n {
        // Joint capacitance merges the adjacent sections
        let c_joint = if i != n - 1 { c[i] + c[i + 1] } else { c[i] };

        posx += 100;
        let stage = |sch: &mut Schematic, y: i32, prev: &str| -> String {
            let ind = sch.add_inductor(l[i], -90, posx - 50, y);
            let cap = sch.add_capacitor(c_joint, 0, posx, y + 30);
            let gnd = sch.add_ground(posx, y + 80);
            let joint = sch.add_node(posx, y);
            sch.wire(&ind, 1, prev, 0);
            sch.wire(&ind, 0, &joint.id, 0);
            sch.wire(&cap, 1, &joint.id, 0);
            sch.wire(&cap, 0, &gnd, 0);
            joint.id
        };

        let joint_up = stage(&mut sch, y_upper, &n_up.id);
        let joint_down = stage(&mut sch, y_lower, &n_down.id);

        let riso = sch.add_resistor(risol[i], 0, posx, 0);
        sch.wire(&riso, 1, &joint_up, 0);
        sch.wire(&riso, 0, &joint_down, 0);

        n_up = sch.add_node(posx + 50, y_upper);
        n_down = sch.add_node(posx + 50, y_lower);
        sch.wire(&joint_up, 0, &n_up.id, 0);
        sch.wire(&joint_down, 0, &n_down.id, 0);
        posx += 50;
    }

    posx += 50;
    let t2 = sch.add_port(spec.z0, 180, posx, y_upper);
    let t3 = sch.add_port(spec.z0, 180, posx, y_lower);
    sch.wire(&t2, 0, &n_up.id, 0);
    sch.wire(&t3, 0, &n_down.id, 0);

    Ok(sch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{CombinerRealization, CombinerTopology};
    use approx::assert_relative_eq;
    use rf_core::units::parse_value;
    use rf_schematic::ComponentKind;

    fn spec(n_stages: usize) -> CombinerSpec {
        CombinerSpec {
            topology: CombinerTopology::MultistageWilkinson,
            n_stages,
            ..CombinerSpec::default()
        }
    }

    #[test]
    fn taper_runs_from_z0_toward_2z0() {
        let z = chebyshev_taper(50.0, 100.0, 3, 0.05).unwrap();
        assert_eq!(z.len(), 3);
        for pair in z.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert!(z[0] > 50.0 && z[2] < 100.0);
    }

    #[test]
    fn three_stage_structure() {
        let sch = synthesize(&spec(3)).unwrap();
        sch.validate().unwrap();
        // Input feed + 2 branch lines per stage
        assert_eq!(sch.count_of(ComponentKind::TransmissionLine), 7);
        assert_eq!(sch.count_of(ComponentKind::Resistor), 3);
        assert_eq!(sch.count_of(ComponentKind::Port), 3);
    }

    #[test]
    fn isolation_resistors_are_positive_and_finite() {
        let sch = synthesize(&spec(4)).unwrap();
        for r in sch
            .components
            .iter()
            .filter(|c| c.kind == ComponentKind::Resistor)
        {
            let value = parse_value(r.param("R").unwrap()).unwrap();
            assert!(value.is_finite() && value > 0.0, "R = {value}");
        }
    }

    #[test]
    fn branch_impedances_mirror_on_both_arms() {
        let sch = synthesize(&spec(2)).unwrap();
        let z: Vec<f64> = sch
            .components
            .iter()
            .filter(|c| c.kind == ComponentKind::TransmissionLine)
            .map(|c| parse_value(c.param("Z0").unwrap()).unwrap())
            .collect();
        // feed, stage1 upper, stage1 lower, stage2 upper, stage2 lower
        assert_relative_eq!(z[1], z[2], max_relative = 1e-9);
        assert_relative_eq!(z[3], z[4], max_relative = 1e-9);
        assert!(z[3] > z[1], "taper must ascend toward the outputs");
    }

    #[test]
    fn lumped_realization_shares_joint_capacitors() {
        let s = CombinerSpec {
            realization: CombinerRealization::Lumped,
            ..spec(3)
        };
        let sch = synthesize(&s).unwrap();
        sch.validate().unwrap();
        // 2 inductors per stage
        assert_eq!(sch.count_of(ComponentKind::Inductor), 6);
        // Input cap + 2 joint caps per stage
        assert_eq!(sch.count_of(ComponentKind::Capacitor), 7);
        assert_eq!(sch.count_of(ComponentKind::Resistor), 3);
    }

    #[test]
    fn eight_stages_are_rejected() {
        assert!(synthesize(&spec(8)).is_err());
    }
}
