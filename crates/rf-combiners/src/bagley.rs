//! Bagley polygon divider.
//!
//! Two vertical λ/4 arms feed a row of N_out output taps joined by
//! N_out−1 horizontal λ/2 arms, all at Z_branch = 2Z₀/√N_out. Only odd
//! output counts are realizable.

use crate::spec::CombinerSpec;
use rf_core::constants::quarter_wavelength;
use rf_core::{RfError, RfResult};
use rf_schematic::{LineEmitter, Schematic};

pub fn synthesize(spec: &CombinerSpec) -> RfResult<Schematic> {
    let realization = spec
        .realization
        .line()
        .ok_or_else(|| RfError::configuration("Bagley polygons are transmission-line networks"))?;
    let emitter = LineEmitter::new(realization, &spec.substrate, spec.length_unit, spec.frequency);

    let n_out = spec.n_outputs;
    let lambda4 = quarter_wavelength(spec.frequency);
    let lambda2 = 2.0 * lambda4;
    let z_branch = 2.0 * spec.z0 / (n_out as f64).sqrt();

    let spacing = 100;
    let row_y = 100;
    let width = (n_out - 1) as i32 * spacing;

    let mut sch = Schematic::new();

    // Input port feeding the top vertex
    let t_in = sch.add_port(spec.z0, 0, width / 2, 0);
    let apex = sch.add_node(width / 2, 30);
    sch.wire(&t_in, 0, &apex.id, 0);

    // Output tap nodes along the bottom row
    let taps: Vec<_> = (0..n_out)
        .map(|i| sch.add_node(i as i32 * spacing, row_y))
        .collect();

    // Two λ/4 arms from the apex to the outer taps
    let left_arm = emitter.series_segment(&mut sch, z_branch, lambda4, 0, width / 4, 60);
    let right_arm = emitter.series_segment(&mut sch, z_branch, lambda4, 0, 3 * width / 4, 60);
    sch.wire(&apex.id, 0, &left_arm, 0);
    sch.wire(&left_arm, 1, &taps[0].id, 0);
    sch.wire(&apex.id, 0, &right_arm, 0);
    sch.wire(&right_arm, 1, &taps[n_out - 1].id, 0);

    // λ/2 arms between adjacent taps
    for i in 0..n_out - 1 {
        let arm = emitter.series_segment(
            &mut sch,
            z_branch,
            lambda2,
            90,
            i as i32 * spacing + spacing / 2,
            row_y,
        );
        sch.wire(&taps[i].id, 0, &arm, 0);
        sch.wire(&arm, 1, &taps[i + 1].id, 0);
    }

    // Output ports below each tap
    for (i, tap) in taps.iter().enumerate() {
        let port = sch.add_port(spec.z0, 180, i as i32 * spacing, row_y + 50);
        sch.wire(tap.id.as_str(), 0, &port, 0);
    }

    Ok(sch)
}
