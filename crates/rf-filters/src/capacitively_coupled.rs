//! Capacitively-coupled shunt-resonator bandpass filter.
//!
//! Short-circuited λ/4 resonators coupled through series capacitors.
//! The coupling capacitance detunes each resonator; the line lengths are
//! shortened accordingly and negative lengths are normalized by +λ/4.
//! Reference: Pozar, "Microwave Engineering", 4th ed., pp. 443-448.

use rf_schematic::LineEmitter;
use crate::spec::FilterSpec;
use rf_core::RfResult;
use rf_core::constants::{C_0, angular_frequency};
use rf_prototype::lowpass_prototype;
use rf_schematic::Schematic;
use std::f64::consts::PI;

pub fn synthesize(spec: &FilterSpec) -> RfResult<Schematic> {
    let gi = lowpass_prototype(spec.response, spec.order, spec.ripple_db)?;
    let mut sch = Schematic::new();
    let emitter = LineEmitter::new(spec.realization, &spec.substrate, spec.length_unit, spec.fc);

    let n = spec.order;
    let delta = spec.bw / spec.fc;
    let w0 = angular_frequency(spec.fc);
    let z0 = spec.zs;
    let lambda0 = C_0 / spec.fc;

    let mut j = vec![0.0; n + 1];
    let mut c = vec![0.0; n + 1];

    let p1 = sch.add_port(z0, 0, 0, 0);
    let mut prev = (p1.clone(), 0u8);
    let mut posx = 50;

    // Resonator length for the (k-1)-th section once both neighbor
    // couplings are known.
    let resonator_length = |c_left: f64, c_right: f64| -> f64 {
        let delta_c = -c_left - c_right;
        let mut l = lambda0 / 4.0 + (z0 * w0 * delta_c / (2.0 * PI)) * lambda0;
        if l < 0.0 {
            l += lambda0 / 4.0;
        }
        l
    };

    for k in 0..n {
        if k == 0 {
            j[0] = (PI * delta / (4.0 * gi[1])).sqrt() / z0;
            c[0] = j[0] / (w0 * (1.0 - z0 * z0 * j[0] * j[0]).sqrt());

            let cap = sch.add_capacitor(c[0], 90, posx, 0);
            sch.wire(&cap, 0, &p1, 0);
            prev = (cap, 1);
            posx += 50;
            continue;
        }

        let node = sch.add_node(posx, 0);
        sch.wire(&prev.0, prev.1, &node.id, 0);

        j[k] = (0.25 * PI * delta / (gi[k] * gi[k + 1]).sqrt()) / z0;
        c[k] = j[k] / w0;
        let length = resonator_length(c[k - 1], c[k]);

        let stub = emitter.short_stub(&mut sch, z0, length, posx, 50);
        sch.wire(&node.id, 0, &stub, 1);
        posx += 50;

        let cap = sch.add_capacitor(c[k], 90, posx, 0);
        sch.wire(&node.id, 0, &cap, 0);
        prev = (cap, 1);
        posx += 50;
    }

    // Last resonator and output coupling
    let node = sch.add_node(posx, 0);
    sch.wire(&prev.0, prev.1, &node.id, 0);

    j[n] = (PI * delta / (4.0 * gi[n + 1] * gi[n])).sqrt() / z0;
    c[n] = j[n] / (w0 * (1.0 - z0 * z0 * j[n] * j[n]).sqrt());
    let length = resonator_length(c[n - 1], c[n]);

    let stub = emitter.short_stub(&mut sch, z0, length, posx, 50);
    sch.wire(&stub, 1, &node.id, 0);
    posx += 50;

    let cap = sch.add_capacitor(c[n], 90, posx, 0);
    sch.wire(&node.id, 0, &cap, 0);
    posx += 50;

    let g_load = gi[n + 1];
    let z_out = if spec.first_shunt {
        spec.zs / g_load
    } else {
        spec.zs * g_load
    };
    let p2 = sch.add_port(z_out, 180, posx, 0);
    sch.wire(&p2, 0, &cap, 1);
    Ok(sch)
}
