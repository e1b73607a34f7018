//! Three-way Wilkinson divider with improved isolation.
//!
//! Two-stage tree with first-stage arms Z₁ = 2.28·Z₀, second-stage arms
//! Z₂ = 1.316·Z₀; star resistors R₁ = 1.319·Z₀ after the first stage
//! and R₂ = 4·Z₀ between the outer outputs.

use crate::spec::CombinerSpec;
use rf_core::constants::quarter_wavelength;
use rf_core::{RfError, RfResult};
use rf_schematic::{LineEmitter, Schematic};

pub fn synthesize(spec: &CombinerSpec) -> RfResult<Schematic> {
    let realization = spec.realization.line().ok_or_else(|| {
        RfError::configuration("3-way Wilkinson trees are transmission-line networks")
    })?;
    let emitter = LineEmitter::new(realization, &spec.substrate, spec.length_unit, spec.frequency);

    let z0 = spec.z0;
    let z1 = 2.28 * z0;
    let z2 = 1.316 * z0;
    let r1 = 1.319 * z0;
    let r2 = 4.0 * z0;
    let lambda4 = quarter_wavelength(spec.frequency);

    let rows = [-120, 0, 120];

    let mut sch = Schematic::new();

    let t1 = sch.add_port(z0, 0, 0, 0);
    let n_split = sch.add_node(50, 0);
    sch.wire(&t1, 0, &n_split.id, 0);

    // First stage: one Z₁ arm per branch from the split
    let mut mids = Vec::new();
    for &y in &rows {
        let arm = emitter.series_segment(&mut sch, z1, lambda4, 90, 100, y);
        sch.wire(&n_split.id, 0, &arm, 0);
        let mid = sch.add_node(150, y);
        sch.wire(&arm, 1, &mid.id, 0);
        mids.push(mid.id);
    }

    // First-stage star resistors from the outer branches to the center
    let r_top = sch.add_resistor(r1, 0, 150, -60);
    sch.wire(&r_top, 1, &mids[0], 0);
    sch.wire(&r_top, 0, &mids[1], 0);
    let r_bottom = sch.add_resistor(r1, 0, 150, 60);
    sch.wire(&r_bottom, 1, &mids[1], 0);
    sch.wire(&r_bottom, 0, &mids[2], 0);

    // Second stage: Z₂ arms to the outputs
    let mut outs = Vec::new();
    for (&y, mid) in rows.iter().zip(&mids) {
        let arm = emitter.series_segment(&mut sch, z2, lambda4, 90, 200, y);
        sch.wire(mid.as_str(), 0, &arm, 0);
        let out = sch.add_node(250, y);
        sch.wire(&arm, 1, &out.id, 0);
        outs.push(out.id);
    }

    // Outer-output isolation resistor
    let r_outer = sch.add_resistor(r2, 0, 250, 60);
    sch.wire(&r_outer, 1, &outs[0], 0);
    sch.wire(&r_outer, 0, &outs[2], 0);

    for (&y, out) in rows.iter().zip(&outs) {
        let port = sch.add_port(z0, 180, 300, y);
        sch.wire(out.as_str(), 0, &port, 0);
    }

    Ok(sch)
}
