//! 2-way Wilkinson power divider/combiner.
//!
//! Branch impedances Z₂ = Z₀√(2(1+K)/K), Z₃ = Z₀√(2(1+K)) with the
//! isolation resistor R = Z₀K + Z₀/K between the branch outputs; unequal
//! splits get λ/4 output transformers at √(Z₀·R₂) and √(Z₀·R₃). The
//! lumped realization maps each λ/4 line onto an LC π-equivalent with
//! L = Z/ω and C = 1/(Lω²), sharing the shunt capacitors at the joints.

use crate::spec::CombinerSpec;
use rf_core::RfResult;
use rf_core::constants::{angular_frequency, quarter_wavelength};
use rf_schematic::{LineEmitter, Schematic};

struct Params {
    z2: f64,
    z3: f64,
    r2: f64,
    r3: f64,
    r_iso: f64,
}

fn params(spec: &CombinerSpec) -> Params {
    let k = spec.ratio();
    let z0 = spec.z0;
    Params {
        z2: z0 * (2.0 * (1.0 + k) / k).sqrt(),
        z3: z0 * (2.0 * (1.0 + k)).sqrt(),
        r2: z0 * k,
        r3: z0 / k,
        r_iso: z0 * k + z0 / k,
    }
}

pub fn synthesize(spec: &CombinerSpec) -> RfResult<Schematic> {
    match spec.realization.line() {
        Some(realization) => build_lines(spec, realization),
        None => build_lumped(spec),
    }
}

fn build_lines(
    spec: &CombinerSpec,
    realization: rf_schematic::TlRealization,
) -> RfResult<Schematic> {
    let p = params(spec);
    let lambda4 = quarter_wavelength(spec.frequency);
    let equal_split = spec.ratio() == 1.0;
    let emitter = LineEmitter::new(realization, &spec.substrate, spec.length_unit, spec.frequency);

    // Topology-local grid
    let y_upper = -60;
    let y_lower = 60;
    let port_in = (0, 0);
    let tl1_pos = (50, 0);
    let split = 100;
    let branch_x = 150;
    let join_x = 200;
    let match_x = 250;
    let port_out_x = if equal_split { 250 } else { 300 };

    let mut sch = Schematic::new();

    let t1 = sch.add_port(spec.z0, 0, port_in.0, port_in.1);

    // Input feed line at the port impedance
    let feed = emitter.series_segment(&mut sch, spec.z0, lambda4, 90, tl1_pos.0, tl1_pos.1);
    sch.wire(&t1, 0, &feed, 0);

    // Split node plus two hidden routing nodes onto the branches
    let n_center = sch.add_node(split, 0);
    let n_up = sch.add_hidden_node(split, y_upper);
    let n_down = sch.add_hidden_node(split, y_lower);
    sch.wire(&feed, 1, &n_center.id, 0);
    sch.wire(&n_up.id, 0, &n_center.id, 0);
    sch.wire(&n_down.id, 0, &n_center.id, 0);

    // Branch lines
    let upper = emitter.series_segment(&mut sch, p.z2, lambda4, 90, branch_x, y_upper);
    let lower = emitter.series_segment(&mut sch, p.z3, lambda4, 90, branch_x, y_lower);
    sch.wire(&upper, 0, &n_up.id, 0);
    sch.wire(&lower, 0, &n_down.id, 0);

    let n4 = sch.add_node(join_x, y_upper);
    let n5 = sch.add_node(join_x, y_lower);
    sch.wire(&upper, 1, &n4.id, 0);
    sch.wire(&lower, 1, &n5.id, 0);

    // Isolation resistor between the branch outputs
    let riso = sch.add_resistor(p.r_iso, 0, join_x, 0);
    sch.wire(&riso, 1, &n4.id, 0);
    sch.wire(&riso, 0, &n5.id, 0);

    let t2 = sch.add_port(spec.z0, 180, port_out_x, y_upper);
    let t3 = sch.add_port(spec.z0, 180, port_out_x, y_lower);

    if equal_split {
        sch.wire(&n4.id, 0, &t2, 0);
        sch.wire(&n5.id, 0, &t3, 0);
    } else {
        // λ/4 transformers restore the port impedance at each output
        let up_match = emitter.series_segment(
            &mut sch,
            (spec.z0 * p.r2).sqrt(),
            lambda4,
            90,
            match_x,
            y_upper,
        );
        let down_match = emitter.series_segment(
            &mut sch,
            (spec.z0 * p.r3).sqrt(),
            lambda4,
            90,
            match_x,
            y_lower,
        );
        sch.wire(&up_match, 0, &n4.id, 0);
        sch.wire(&up_match, 1, &t2, 0);
        sch.wire(&down_match, 0, &n5.id, 0);
        sch.wire(&down_match, 1, &t3, 0);
    }

    Ok(sch)
}

fn build_lumped(spec: &CombinerSpec) -> RfResult<Schematic> {
    let p = params(spec);
    let w = angular_frequency(spec.frequency);
    let equal_split = spec.ratio() == 1.0;

    // LC equivalents of the quarter-wave branches
    let l2 = p.z2 / w;
    let c2 = 1.0 / (l2 * w * w);
    let l3 = p.z3 / w;
    let c3 = 1.0 / (l3 * w * w);
    let c_input = c2 + c3;

    // Extra matching sections for the unequal split
    let (l2m, c2m, l3m, c3m) = if equal_split {
        (0.0, 0.0, 0.0, 0.0)
    } else {
        let k = spec.ratio();
        let z4 = spec.z0 * k.sqrt();
        let z5 = spec.z0 / k.sqrt();
        let l2m = z4 / w;
        let l3m = z5 / w;
        (l2m, 1.0 / (l2m * w * w), l3m, 1.0 / (l3m * w * w))
    };
    let c2_total = c2 + c2m;
    let c3_total = c3 + c3m;

    let y_upper = 0;
    let y_central = -60;
    let y_lower = -120;

    let mut sch = Schematic::new();

    let t1 = sch.add_port(spec.z0, 0, 50, y_central);

    // Shared input shunt capacitor
    let c_in = sch.add_capacitor(c_input, 0, 100, y_central + 30);
    let gnd_in = sch.add_ground(100, y_central + 80);
    sch.wire(&c_in, 0, &gnd_in, 0);

    let n_in = sch.add_node(100, y_central);
    sch.wire(&c_in, 1, &n_in.id, 0);
    sch.wire(&t1, 0, &n_in.id, 0);

    let n_center = sch.add_node(150, y_central);
    let n_up = sch.add_hidden_node(150, y_upper);
    let n_down = sch.add_hidden_node(150, y_lower);
    sch.wire(&n_in.id, 0, &n_center.id, 0);
    sch.wire(&n_center.id, 0, &n_up.id, 0);
    sch.wire(&n_center.id, 0, &n_down.id, 0);

    // One branch: series L into a shunt C at the joint
    let branch = |sch: &mut Schematic, l: f64, c: f64, y: i32| -> (String, String) {
        let ind = sch.add_inductor(l, -90, 200, y);
        let cap = sch.add_capacitor(c, 0, 250, y + 30);
        let gnd = sch.add_ground(250, y + 80);
        let joint = sch.add_node(250, y);
        sch.wire(&cap, 0, &gnd, 0);
        sch.wire(&cap, 1, &joint.id, 0);
        sch.wire(&ind, 0, &joint.id, 0);
        (ind, joint.id)
    };

    let (ind_up, joint_up) = branch(&mut sch, l2, c2_total, y_upper);
    sch.wire(&n_up.id, 0, &ind_up, 1);
    let (ind_down, joint_down) = branch(&mut sch, l3, c3_total, y_lower);
    sch.wire(&n_down.id, 0, &ind_down, 1);

    let riso = sch.add_resistor(p.r_iso, 0, 300, y_central);
    sch.wire(&riso, 0, &joint_up, 0);
    sch.wire(&riso, 1, &joint_down, 0);

    let t2 = sch.add_port(spec.z0, 180, 400, y_upper);
    let t3 = sch.add_port(spec.z0, 180, 400, y_lower);

    if equal_split {
        sch.wire(&joint_up, 0, &t2, 0);
        sch.wire(&joint_down, 0, &t3, 0);
    } else {
        // Second L-section per branch toward the output ports
        let l_up = sch.add_inductor(l2m, -90, 300, y_upper);
        let c_up = sch.add_capacitor(c2m, 0, 350, y_upper + 30);
        let g_up = sch.add_ground(350, y_upper + 80);
        let n_out_up = sch.add_node(350, y_upper);
        sch.wire(&l_up, 1, &joint_up, 0);
        sch.wire(&l_up, 0, &n_out_up.id, 0);
        sch.wire(&c_up, 1, &n_out_up.id, 0);
        sch.wire(&c_up, 0, &g_up, 0);
        sch.wire(&n_out_up.id, 0, &t2, 0);

        let l_down = sch.add_inductor(l3m, -90, 300, y_lower);
        let c_down = sch.add_capacitor(c3m, 0, 350, y_lower + 30);
        let g_down = sch.add_ground(350, y_lower + 80);
        let n_out_down = sch.add_node(350, y_lower);
        sch.wire(&l_down, 1, &joint_down, 0);
        sch.wire(&l_down, 0, &n_out_down.id, 0);
        sch.wire(&c_down, 1, &n_out_down.id, 0);
        sch.wire(&c_down, 0, &g_down, 0);
        sch.wire(&n_out_down.id, 0, &t3, 0);
    }

    Ok(sch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::CombinerRealization;
    use approx::assert_relative_eq;
    use rf_core::units::parse_value;
    use rf_schematic::ComponentKind;

    fn parse(sch: &Schematic, id: &str, key: &str) -> f64 {
        parse_value(sch.component(id).unwrap().param(key).unwrap()).unwrap()
    }

    #[test]
    fn equal_split_at_1ghz() {
        // Exactly three λ/4 lines of 74.948 mm, one 100 Ω isolation
        // resistor, three ports.
        let sch = synthesize(&CombinerSpec::default()).unwrap();
        sch.validate().unwrap();

        assert_eq!(sch.count_of(ComponentKind::TransmissionLine), 3);
        assert_eq!(sch.count_of(ComponentKind::Resistor), 1);
        assert_eq!(sch.count_of(ComponentKind::Port), 3);

        for line in sch
            .components
            .iter()
            .filter(|c| c.kind == ComponentKind::TransmissionLine)
        {
            let len = parse_value(line.param("Length").unwrap()).unwrap();
            assert_relative_eq!(len, 74.948e-3, max_relative = 1e-3);
        }

        assert_relative_eq!(parse(&sch, "R1", "R"), 100.0, max_relative = 1e-9);
        // Branch impedances √2·50
        assert_relative_eq!(parse(&sch, "TLIN2", "Z0"), 70.7107, max_relative = 1e-3);
        assert_relative_eq!(parse(&sch, "TLIN3", "Z0"), 70.7107, max_relative = 1e-3);
    }

    #[test]
    fn isolation_resistor_connects_branch_outputs() {
        let sch = synthesize(&CombinerSpec::default()).unwrap();
        let riso_wires: Vec<&rf_schematic::Wire> = sch
            .wires
            .iter()
            .filter(|w| w.from.element == "R1" || w.to.element == "R1")
            .collect();
        assert_eq!(riso_wires.len(), 2);
        // Both resistor wires land on the λ/4 branch output nodes
        for wire in riso_wires {
            let other = if wire.from.element == "R1" {
                &wire.to.element
            } else {
                &wire.from.element
            };
            assert!(other.starts_with('N'), "R1 wired to {other}");
        }
    }

    #[test]
    fn unequal_split_adds_matching_transformers() {
        let spec = CombinerSpec {
            output_ratios: vec![2.0],
            ..CombinerSpec::default()
        };
        let sch = synthesize(&spec).unwrap();
        sch.validate().unwrap();
        assert_eq!(sch.count_of(ComponentKind::TransmissionLine), 5);

        // Z2 = 50·√(2·3/2) = 50√3, Z3 = 50·√6
        assert_relative_eq!(parse(&sch, "TLIN2", "Z0"), 86.6025, max_relative = 1e-3);
        assert_relative_eq!(parse(&sch, "TLIN3", "Z0"), 122.4745, max_relative = 1e-3);
        // R = 50·2 + 50/2 = 125
        assert_relative_eq!(parse(&sch, "R1", "R"), 125.0, max_relative = 1e-9);
        // Output transformers √(50·100) and √(50·25)
        assert_relative_eq!(parse(&sch, "TLIN4", "Z0"), 70.7107, max_relative = 1e-3);
        assert_relative_eq!(parse(&sch, "TLIN5", "Z0"), 35.3553, max_relative = 1e-3);
    }

    #[test]
    fn microstrip_realization_synthesizes_widths() {
        let spec = CombinerSpec {
            realization: CombinerRealization::Microstrip,
            ..CombinerSpec::default()
        };
        let sch = synthesize(&spec).unwrap();
        sch.validate().unwrap();
        assert_eq!(sch.count_of(ComponentKind::MicrostripLine), 3);

        // Feed line analyzes back to 50 Ω
        let feed = sch.component("MLIN1").unwrap();
        let width = parse_value(feed.param("Width").unwrap()).unwrap();
        let (_, z0) =
            rf_microstrip::analyze_microstrip(width, 1e9, &rf_core::MicrostripSubstrate::fr4());
        assert_relative_eq!(z0, 50.0, max_relative = 1e-3);
    }

    #[test]
    fn lumped_realization_maps_branches_to_lc() {
        let spec = CombinerSpec {
            realization: CombinerRealization::Lumped,
            ..CombinerSpec::default()
        };
        let sch = synthesize(&spec).unwrap();
        sch.validate().unwrap();

        assert_eq!(sch.count_of(ComponentKind::Inductor), 2);
        assert_eq!(sch.count_of(ComponentKind::Capacitor), 3);
        assert_eq!(sch.count_of(ComponentKind::Port), 3);

        // Branch inductance L = Z₂/ω with Z₂ = 50√2 at 1 GHz
        let w = angular_frequency(1e9);
        assert_relative_eq!(parse(&sch, "L1", "L"), 70.7107 / w, max_relative = 1e-3);
        // Input capacitor is the sum of both branch capacitors
        let l = 70.7107 / w;
        let c_branch = 1.0 / (l * w * w);
        assert_relative_eq!(parse(&sch, "C1", "C"), 2.0 * c_branch, max_relative = 1e-3);
    }
}
