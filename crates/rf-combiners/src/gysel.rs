//! Gysel high-power divider.
//!
//! Two √2·Z₀ λ/4 divider arms, Z₀ λ/4 feeds to the ring, a Z₀/√2 λ/2
//! center line, and two grounded Z₀ loads. The grounded loads give the
//! isolation function of a Wilkinson without floating resistors, so the
//! dissipated power can be heat-sunk.

use crate::spec::CombinerSpec;
use rf_core::constants::quarter_wavelength;
use rf_core::{RfError, RfResult};
use rf_schematic::{LineEmitter, Schematic};
use std::f64::consts::SQRT_2;

pub fn synthesize(spec: &CombinerSpec) -> RfResult<Schematic> {
    let realization = spec
        .realization
        .line()
        .ok_or_else(|| RfError::configuration("Gysel dividers are transmission-line networks"))?;
    let emitter = LineEmitter::new(realization, &spec.substrate, spec.length_unit, spec.frequency);

    let z0 = spec.z0;
    let lambda4 = quarter_wavelength(spec.frequency);
    let lambda2 = 2.0 * lambda4;

    let mut sch = Schematic::new();

    // Input port and split node
    let t1 = sch.add_port(z0, 0, 0, 0);
    let n1 = sch.add_node(50, 0);
    sch.wire(&n1.id, 0, &t1, 0);

    // Divider arms at √2·Z₀: up to the top-left node, down to the
    // bottom-left node
    let arm_up = emitter.series_segment(&mut sch, SQRT_2 * z0, lambda4, 0, 50, -60);
    let arm_down = emitter.series_segment(&mut sch, SQRT_2 * z0, lambda4, 0, 50, 60);
    sch.wire(&arm_up, 0, &n1.id, 0);
    sch.wire(&arm_down, 1, &n1.id, 0);

    let n2 = sch.add_node(50, -120);
    let n3 = sch.add_node(50, 120);
    sch.wire(&arm_up, 1, &n2.id, 0);
    sch.wire(&arm_down, 0, &n3.id, 0);

    // Output ports at the divider nodes
    let t2 = sch.add_port(z0, 180, 0, -120);
    let t3 = sch.add_port(z0, 180, 0, 120);
    sch.wire(&n2.id, 0, &t2, 0);
    sch.wire(&n3.id, 0, &t3, 0);

    // Z₀ feeds from the outputs into the isolation ring
    let feed_top = emitter.series_segment(&mut sch, z0, lambda4, 90, 125, -120);
    let feed_bottom = emitter.series_segment(&mut sch, z0, lambda4, 90, 125, 120);
    sch.wire(&feed_top, 0, &n2.id, 0);
    sch.wire(&feed_bottom, 0, &n3.id, 0);

    let n4 = sch.add_node(200, -120);
    let n5 = sch.add_node(200, 120);
    sch.wire(&feed_top, 1, &n4.id, 0);
    sch.wire(&feed_bottom, 1, &n5.id, 0);

    // λ/2 center line closing the ring
    let center = emitter.series_segment(&mut sch, z0 / SQRT_2, lambda2, 0, 200, 0);
    sch.wire(&center, 1, &n4.id, 0);
    sch.wire(&center, 0, &n5.id, 0);

    // Grounded isolation loads
    let r_top = sch.add_resistor(z0, 0, 250, -120);
    let gnd_top = sch.add_ground(300, -120);
    sch.wire(&r_top, 1, &n4.id, 0);
    sch.wire(&r_top, 0, &gnd_top, 0);

    let r_bottom = sch.add_resistor(z0, 0, 250, 120);
    let gnd_bottom = sch.add_ground(300, 120);
    sch.wire(&r_bottom, 1, &n5.id, 0);
    sch.wire(&r_bottom, 0, &gnd_bottom, 0);

    Ok(sch)
}
