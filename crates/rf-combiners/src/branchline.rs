//! 90° branch-line hybrid.
//!
//! 2×2 λ/4 lattice: shunt arms at Z_A = Z₀√(K/(K+1)), series arms at
//! Z_B = Z₀√K, with a Z₀ isolation resistor terminating the fourth port.

use crate::spec::CombinerSpec;
use rf_core::constants::quarter_wavelength;
use rf_core::{RfError, RfResult};
use rf_schematic::{LineEmitter, Schematic};

pub fn synthesize(spec: &CombinerSpec) -> RfResult<Schematic> {
    let realization = spec
        .realization
        .line()
        .ok_or_else(|| RfError::configuration("branch-line hybrids are transmission-line networks"))?;
    let emitter = LineEmitter::new(realization, &spec.substrate, spec.length_unit, spec.frequency);

    let k = spec.ratio();
    let lambda4 = quarter_wavelength(spec.frequency);
    let z_shunt = spec.z0 * (k / (k + 1.0)).sqrt();
    let z_series = spec.z0 * k.sqrt();

    let top = 0;
    let bottom = 120;

    let mut sch = Schematic::new();

    let t1 = sch.add_port(spec.z0, 0, 0, top);
    let t2 = sch.add_port(spec.z0, 180, 200, top);
    let t3 = sch.add_port(spec.z0, 180, 200, bottom);

    let nw = sch.add_node(50, top);
    let ne = sch.add_node(150, top);
    let sw = sch.add_node(50, bottom);
    let se = sch.add_node(150, bottom);

    // Series arms along the top and bottom rows
    let arm_top = emitter.series_segment(&mut sch, z_series, lambda4, 90, 100, top);
    let arm_bottom = emitter.series_segment(&mut sch, z_series, lambda4, 90, 100, bottom);
    // Shunt arms down the columns
    let arm_left = emitter.series_segment(&mut sch, z_shunt, lambda4, 0, 50, 60);
    let arm_right = emitter.series_segment(&mut sch, z_shunt, lambda4, 0, 150, 60);

    sch.wire(&t1, 0, &nw.id, 0);
    sch.wire(&nw.id, 0, &arm_top, 0);
    sch.wire(&arm_top, 1, &ne.id, 0);
    sch.wire(&ne.id, 0, &t2, 0);

    sch.wire(&nw.id, 0, &arm_left, 1);
    sch.wire(&arm_left, 0, &sw.id, 0);
    sch.wire(&ne.id, 0, &arm_right, 1);
    sch.wire(&arm_right, 0, &se.id, 0);

    sch.wire(&sw.id, 0, &arm_bottom, 0);
    sch.wire(&arm_bottom, 1, &se.id, 0);
    sch.wire(&se.id, 0, &t3, 0);

    // Isolated port terminated in Z₀
    let riso = sch.add_resistor(spec.z0, 0, 0, bottom + 50);
    let gnd = sch.add_ground(0, bottom + 100);
    sch.wire(&sw.id, 0, &riso, 1);
    sch.wire(&riso, 0, &gnd, 0);

    Ok(sch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{CombinerRealization, CombinerTopology};
    use approx::assert_relative_eq;
    use rf_core::units::parse_value;
    use rf_schematic::ComponentKind;

    fn spec(ratio: f64) -> CombinerSpec {
        CombinerSpec {
            topology: CombinerTopology::Branchline,
            output_ratios: vec![ratio],
            ..CombinerSpec::default()
        }
    }

    #[test]
    fn equal_split_arm_impedances() {
        let sch = synthesize(&spec(1.0)).unwrap();
        sch.validate().unwrap();
        assert_eq!(sch.count_of(ComponentKind::TransmissionLine), 4);
        let z: Vec<f64> = sch
            .components
            .iter()
            .filter(|c| c.kind == ComponentKind::TransmissionLine)
            .map(|c| parse_value(c.param("Z0").unwrap()).unwrap())
            .collect();
        // Series arms Z₀/√2 for 3 dB coupling, shunt arms Z₀/√2 · ... :
        // Z_B = 50, Z_A = 50/√2
        assert_relative_eq!(z[0], 50.0, max_relative = 1e-9);
        assert_relative_eq!(z[2], 35.3553, max_relative = 1e-4);
    }

    #[test]
    fn isolation_resistor_is_port_impedance() {
        let sch = synthesize(&spec(1.0)).unwrap();
        let r = parse_value(sch.component("R1").unwrap().param("R").unwrap()).unwrap();
        assert_relative_eq!(r, 50.0);
        assert_eq!(sch.count_of(ComponentKind::Ground), 1);
    }

    #[test]
    fn microstrip_lattice_is_valid() {
        let s = CombinerSpec {
            realization: CombinerRealization::Microstrip,
            ..spec(2.0)
        };
        let sch = synthesize(&s).unwrap();
        sch.validate().unwrap();
        assert_eq!(sch.count_of(ComponentKind::MicrostripLine), 4);
        assert_eq!(sch.count_of(ComponentKind::Port), 3);
    }
}
