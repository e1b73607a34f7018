//! Recombinant three-way Wilkinson mesh.
//!
//! Fixed parameter table scaled to Z₀: an input line Z₁ = 0.72·Z₀ feeds
//! a mesh of λ/4 arms Z₂ = Z₃ = Z₅ = 0.8·Z₀ and Z₄ = Z₆ = 1.6·Z₀ whose
//! recombination points carry isolators R₁ = Z₀ and R₂ = 2·Z₀ on the
//! way to the three outputs.

use crate::spec::CombinerSpec;
use rf_core::constants::quarter_wavelength;
use rf_core::{RfError, RfResult};
use rf_schematic::{LineEmitter, Schematic};

pub fn synthesize(spec: &CombinerSpec) -> RfResult<Schematic> {
    let realization = spec.realization.line().ok_or_else(|| {
        RfError::configuration("recombinant dividers are transmission-line networks")
    })?;
    let emitter = LineEmitter::new(realization, &spec.substrate, spec.length_unit, spec.frequency);

    let z0 = spec.z0;
    let z1 = 0.72 * z0;
    let z_low = 0.8 * z0; // Z₂ = Z₃ = Z₅
    let z_high = 1.6 * z0; // Z₄ = Z₆
    let r1 = z0;
    let r2 = 2.0 * z0;
    let lambda4 = quarter_wavelength(spec.frequency);

    let mut sch = Schematic::new();

    let t1 = sch.add_port(z0, 0, 0, 0);

    // Input line into the first split
    let feed = emitter.series_segment(&mut sch, z1, lambda4, 90, 50, 0);
    sch.wire(&t1, 0, &feed, 0);
    let n_split = sch.add_node(100, 0);
    sch.wire(&feed, 1, &n_split.id, 0);

    // First mesh stage: two Z_low arms
    let arm_up = emitter.series_segment(&mut sch, z_low, lambda4, 90, 150, -60);
    let arm_down = emitter.series_segment(&mut sch, z_low, lambda4, 90, 150, 60);
    sch.wire(&n_split.id, 0, &arm_up, 0);
    sch.wire(&n_split.id, 0, &arm_down, 0);

    let n_up = sch.add_node(200, -60);
    let n_down = sch.add_node(200, 60);
    sch.wire(&arm_up, 1, &n_up.id, 0);
    sch.wire(&arm_down, 1, &n_down.id, 0);

    // First recombination isolator
    let riso1 = sch.add_resistor(r1, 0, 200, 0);
    sch.wire(&riso1, 1, &n_up.id, 0);
    sch.wire(&riso1, 0, &n_down.id, 0);

    // Second mesh stage: each intermediate node fans into an outer
    // Z_high arm and a Z_low arm toward the recombined center output
    let outer_up = emitter.series_segment(&mut sch, z_high, lambda4, 90, 250, -120);
    let center_up = emitter.series_segment(&mut sch, z_low, lambda4, 90, 250, -30);
    let center_down = emitter.series_segment(&mut sch, z_low, lambda4, 90, 250, 30);
    let outer_down = emitter.series_segment(&mut sch, z_high, lambda4, 90, 250, 120);
    sch.wire(&n_up.id, 0, &outer_up, 0);
    sch.wire(&n_up.id, 0, &center_up, 0);
    sch.wire(&n_down.id, 0, &center_down, 0);
    sch.wire(&n_down.id, 0, &outer_down, 0);

    let n_out_up = sch.add_node(300, -120);
    let n_center = sch.add_node(300, 0);
    let n_out_down = sch.add_node(300, 120);
    sch.wire(&outer_up, 1, &n_out_up.id, 0);
    sch.wire(&center_up, 1, &n_center.id, 0);
    sch.wire(&center_down, 1, &n_center.id, 0);
    sch.wire(&outer_down, 1, &n_out_down.id, 0);

    // Output isolators between the center and the outer outputs
    let riso2 = sch.add_resistor(r2, 0, 300, -60);
    sch.wire(&riso2, 1, &n_out_up.id, 0);
    sch.wire(&riso2, 0, &n_center.id, 0);
    let riso3 = sch.add_resistor(r2, 0, 300, 60);
    sch.wire(&riso3, 1, &n_center.id, 0);
    sch.wire(&riso3, 0, &n_out_down.id, 0);

    for (node, y) in [(&n_out_up, -120), (&n_center, 0), (&n_out_down, 120)] {
        let port = sch.add_port(z0, 180, 350, y);
        sch.wire(&node.id, 0, &port, 0);
    }

    Ok(sch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::CombinerTopology;
    use approx::assert_relative_eq;
    use rf_core::units::parse_value;
    use rf_schematic::ComponentKind;

    fn spec() -> CombinerSpec {
        CombinerSpec {
            topology: CombinerTopology::Recombinant3Way,
            n_outputs: 3,
            ..CombinerSpec::default()
        }
    }

    #[test]
    fn mesh_structure() {
        let sch = synthesize(&spec()).unwrap();
        sch.validate().unwrap();
        assert_eq!(sch.count_of(ComponentKind::TransmissionLine), 7);
        assert_eq!(sch.count_of(ComponentKind::Resistor), 3);
        assert_eq!(sch.count_of(ComponentKind::Port), 4);
        assert_eq!(sch.ports_at_rotation(180), 3);
    }

    #[test]
    fn parameter_table_scaled_to_z0() {
        let sch = synthesize(&spec()).unwrap();
        let z = |id: &str| parse_value(sch.component(id).unwrap().param("Z0").unwrap()).unwrap();
        assert_relative_eq!(z("TLIN1"), 36.0, max_relative = 1e-9);
        assert_relative_eq!(z("TLIN2"), 40.0, max_relative = 1e-9);
        assert_relative_eq!(z("TLIN4"), 80.0, max_relative = 1e-9);

        let r = |id: &str| parse_value(sch.component(id).unwrap().param("R").unwrap()).unwrap();
        assert_relative_eq!(r("R1"), 50.0);
        assert_relative_eq!(r("R2"), 100.0);
    }
}
