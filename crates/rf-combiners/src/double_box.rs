//! Double-box branch-line hybrid.
//!
//! Three-column, six-line λ/4 lattice. With t = √((1+K)·r), r = 1:
//! Z_A = Z₀√(r(t²−r))/(t−r) for the outer shunt arms,
//! Z_D = Z₀√(r(t²−r))/(t−1) for the center shunt arm,
//! Z_B = Z₀√(r−r²/t²) for the series arms.

use crate::spec::CombinerSpec;
use rf_core::constants::quarter_wavelength;
use rf_core::{RfError, RfResult};
use rf_schematic::{LineEmitter, Schematic};

pub fn synthesize(spec: &CombinerSpec) -> RfResult<Schematic> {
    let realization = spec.realization.line().ok_or_else(|| {
        RfError::configuration("branch-line hybrids are transmission-line networks")
    })?;
    let emitter = LineEmitter::new(realization, &spec.substrate, spec.length_unit, spec.frequency);

    let k = spec.ratio();
    let r = 1.0;
    let t = ((1.0 + k) * r).sqrt();
    let z_a = spec.z0 * (r * (t * t - r)).sqrt() / (t - r);
    let z_d = spec.z0 * (r * (t * t - r)).sqrt() / (t - 1.0);
    let z_b = spec.z0 * (r - r * r / (t * t)).sqrt();

    let lambda4 = quarter_wavelength(spec.frequency);
    let top = 0;
    let bottom = 120;
    let columns = [50, 150, 250];

    let mut sch = Schematic::new();

    let t1 = sch.add_port(spec.z0, 0, 0, top);
    let t2 = sch.add_port(spec.z0, 180, 300, top);
    let t3 = sch.add_port(spec.z0, 180, 300, bottom);

    // Lattice nodes: three per row
    let top_nodes: Vec<_> = columns.iter().map(|&x| sch.add_node(x, top)).collect();
    let bottom_nodes: Vec<_> = columns.iter().map(|&x| sch.add_node(x, bottom)).collect();

    // Series arms along both rows
    for (row, nodes) in [(top, &top_nodes), (bottom, &bottom_nodes)] {
        for i in 0..2 {
            let arm = emitter.series_segment(&mut sch, z_b, lambda4, 90, columns[i] + 50, row);
            sch.wire(&nodes[i].id, 0, &arm, 0);
            sch.wire(&arm, 1, &nodes[i + 1].id, 0);
        }
    }

    // Shunt arms: outer columns at Z_A, center at Z_D
    for (i, &x) in columns.iter().enumerate() {
        let z = if i == 1 { z_d } else { z_a };
        let arm = emitter.series_segment(&mut sch, z, lambda4, 0, x, 60);
        sch.wire(&top_nodes[i].id, 0, &arm, 1);
        sch.wire(&arm, 0, &bottom_nodes[i].id, 0);
    }

    sch.wire(&t1, 0, &top_nodes[0].id, 0);
    sch.wire(&top_nodes[2].id, 0, &t2, 0);
    sch.wire(&bottom_nodes[2].id, 0, &t3, 0);

    // Isolated port terminated in Z₀
    let riso = sch.add_resistor(spec.z0, 0, 0, bottom + 50);
    let gnd = sch.add_ground(0, bottom + 100);
    sch.wire(&bottom_nodes[0].id, 0, &riso, 1);
    sch.wire(&riso, 0, &gnd, 0);

    Ok(sch)
}
