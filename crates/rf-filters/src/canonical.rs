//! Canonical LC ladder synthesis for the four filter classes.
//!
//! Components march left to right along y = 0; shunt branches hang at
//! y = +50 with their grounds at y = +100. The semi-lumped variant
//! replaces inductors with high-impedance line segments and shunt
//! capacitors with low-impedance open stubs, lengths per Hong & Lancaster
//! eq. 5.9.

use rf_schematic::LineEmitter;
use crate::spec::{FilterClass, FilterSpec, FilterTopology, SemiLumpedStyle};
use rf_core::constants::{C_0, angular_frequency};
use rf_core::{RfError, RfResult};
use rf_prototype::lowpass_prototype;
use rf_schematic::Schematic;
use std::f64::consts::PI;

pub fn synthesize(spec: &FilterSpec) -> RfResult<Schematic> {
    let gi = lowpass_prototype(spec.response, spec.order, spec.ripple_db)?;
    match spec.class {
        FilterClass::Lowpass => lowpass(spec, &gi),
        FilterClass::Highpass => highpass(spec, &gi),
        FilterClass::Bandpass => bandpass(spec, &gi),
        FilterClass::Bandstop => bandstop(spec, &gi),
    }
}

/// Output termination after the ladder: CLC divides the source impedance
/// by the load ratio, LCL multiplies.
fn output_impedance(spec: &FilterSpec, gi: &[f64]) -> f64 {
    let g_load = gi[spec.order + 1];
    if spec.first_shunt {
        spec.zs / g_load
    } else {
        spec.zs * g_load
    }
}

fn shunt_position(spec: &FilterSpec, k: usize) -> bool {
    (spec.first_shunt && k % 2 == 0) || (!spec.first_shunt && k % 2 != 0)
}

/// Stub length λ₀/(2π)·asin(x); rejects element values the realizable
/// impedance range cannot absorb.
fn stub_length(lambda0: f64, x: f64) -> RfResult<f64> {
    if x.abs() > 1.0 {
        return Err(RfError::configuration(
            "element value outside the realizable line impedance range",
        ));
    }
    Ok(lambda0 / (2.0 * PI) * x.asin())
}

fn lowpass(spec: &FilterSpec, gi: &[f64]) -> RfResult<Schematic> {
    let mut sch = Schematic::new();
    let semilumped = spec.topology == FilterTopology::SemiLumped;
    let emitter = LineEmitter::new(spec.realization, &spec.substrate, spec.length_unit, spec.fc);
    let w_c = angular_frequency(spec.fc);
    let lambda0 = C_0 / spec.fc;

    let p1 = sch.add_port(spec.zs, 0, 0, 0);
    let mut prev = (p1, 0u8);
    let mut posx = 50;

    for k in 0..spec.order {
        let g = gi[k + 1];
        if shunt_position(spec, k) {
            let node = sch.add_node(posx, 0);
            let c_val = g / (w_c * spec.zs);

            if semilumped && spec.semi_lumped_style == SemiLumpedStyle::InductorsAndShuntCaps {
                let l_ci = stub_length(lambda0, w_c * spec.min_z * c_val)?;
                let stub = emitter.open_stub(&mut sch, spec.min_z, l_ci, posx, 50);
                sch.wire(&node.id, 0, &stub, 1);
            } else {
                let cap = sch.add_capacitor(c_val, 0, posx, 50);
                let ground = sch.add_ground(posx, 100);
                sch.wire(&ground, 0, &cap, 0);
                sch.wire(&node.id, 0, &cap, 1);
            }

            sch.wire(&prev.0, prev.1, &node.id, 0);
            prev = (node.id, 0);
        } else {
            let l_val = g * spec.zs / w_c;
            let id = if semilumped {
                let l_li = stub_length(lambda0, w_c * l_val / spec.max_z)?;
                emitter.series_segment(&mut sch, spec.max_z, l_li, 90, posx, 0)
            } else {
                sch.add_inductor(l_val, -90, posx, 0)
            };
            sch.wire(&prev.0, prev.1, &id, 0);
            prev = (id, 1);
        }
        posx += 50;
    }

    let p2 = sch.add_port(output_impedance(spec, gi), 180, posx, 0);
    sch.wire(&p2, 0, &prev.0, prev.1);
    Ok(sch)
}

fn highpass(spec: &FilterSpec, gi: &[f64]) -> RfResult<Schematic> {
    let mut sch = Schematic::new();
    let semilumped = spec.topology == FilterTopology::SemiLumped;
    let emitter = LineEmitter::new(spec.realization, &spec.substrate, spec.length_unit, spec.fc);
    let w_c = angular_frequency(spec.fc);
    let lambda0 = C_0 / spec.fc;

    let p1 = sch.add_port(spec.zs, 0, 0, 0);
    let mut prev = (p1, 0u8);
    let mut posx = 50;

    for k in 0..spec.order {
        let g = gi[k + 1];
        if shunt_position(spec, k) {
            // LP→HP: shunt capacitor becomes shunt inductor
            let node = sch.add_node(posx, 0);
            sch.wire(&prev.0, prev.1, &node.id, 0);

            let l_val = spec.zs / (w_c * g);
            if semilumped {
                let l_li = stub_length(lambda0, w_c * l_val / spec.max_z)?;
                let stub = emitter.short_stub(&mut sch, spec.max_z, l_li, posx, 50);
                sch.wire(&node.id, 0, &stub, 1);
            } else {
                let ind = sch.add_inductor(l_val, 0, posx, 50);
                let ground = sch.add_ground(posx, 100);
                sch.wire(&node.id, 0, &ind, 1);
                sch.wire(&ground, 0, &ind, 0);
            }
            prev = (node.id, 0);
        } else {
            // LP→HP: series inductor becomes series capacitor
            let c_val = 1.0 / (w_c * g * spec.zs);
            let cap = sch.add_capacitor(c_val, 90, posx, 0);
            sch.wire(&prev.0, prev.1, &cap, 0);
            prev = (cap, 1);
        }
        posx += 50;
    }

    let p2 = sch.add_port(output_impedance(spec, gi), 180, posx, 0);
    sch.wire(&p2, 0, &prev.0, prev.1);
    Ok(sch)
}

fn bandpass(spec: &FilterSpec, gi: &[f64]) -> RfResult<Schematic> {
    let mut sch = Schematic::new();
    let w_c = angular_frequency(spec.fc);
    let delta = angular_frequency(spec.bw);
    let w0_sq = w_c * w_c - 0.25 * delta * delta;

    let p1 = sch.add_port(spec.zs, 0, 0, 0);
    let mut prev = (p1, 0u8);
    let mut posx = 0;

    if spec.first_shunt {
        posx += 50;
    }

    for k in 0..spec.order {
        let g = gi[k + 1];
        if shunt_position(spec, k) {
            // Shunt element becomes a parallel LC resonator at ω₀
            let pos_c = (posx - 25, 60);
            let pos_l = (posx + 25, 60);

            let cap = sch.add_capacitor(g / (delta * spec.zs), 0, pos_c.0, pos_c.1);
            let gnd_c = sch.add_ground(pos_c.0, pos_c.1 + 50);
            let ind = sch.add_inductor(spec.zs * delta / (w0_sq * g), 0, pos_l.0, pos_l.1);
            let gnd_l = sch.add_ground(pos_l.0, pos_l.1 + 50);

            let node = sch.add_node(posx, 0);
            // Hidden routing nodes keep the resonator wiring unambiguous
            // for export.
            let n_left = sch.add_hidden_node(pos_c.0, pos_c.1 - 40);
            let n_center = sch.add_hidden_node(posx, pos_c.1 - 40);
            let n_right = sch.add_hidden_node(pos_l.0, pos_l.1 - 40);

            sch.wire(&node.id, 0, &n_center.id, 0);
            sch.wire(&n_center.id, 0, &n_left.id, 0);
            sch.wire(&n_left.id, 0, &cap, 1);
            sch.wire(&n_center.id, 0, &n_right.id, 0);
            sch.wire(&n_right.id, 0, &ind, 1);
            sch.wire(&gnd_c, 0, &cap, 0);
            sch.wire(&gnd_l, 0, &ind, 0);
            sch.wire(&prev.0, prev.1, &node.id, 0);
            prev = (node.id, 0);
        } else {
            if k == 0 {
                posx += 50;
            }
            // Series element becomes a series LC resonator at ω₀
            let ind = sch.add_inductor(g * spec.zs / delta, -90, posx - 20, 0);
            let cap = sch.add_capacitor(delta / (w0_sq * spec.zs * g), 90, posx + 20, 0);
            sch.wire(&prev.0, prev.1, &ind, 0);
            sch.wire(&ind, 1, &cap, 0);
            prev = (cap, 1);
        }
        posx += 80;
    }

    let p2 = sch.add_port(output_impedance(spec, gi), 180, posx, 0);
    sch.wire(&p2, 0, &prev.0, prev.1);
    Ok(sch)
}

fn bandstop(spec: &FilterSpec, gi: &[f64]) -> RfResult<Schematic> {
    let mut sch = Schematic::new();
    let w_c = angular_frequency(spec.fc);
    let delta = angular_frequency(spec.bw);
    let w0_sq = w_c * w_c - 0.25 * delta * delta;

    let p1 = sch.add_port(spec.zs, 0, 0, 0);
    let mut prev = (p1, 0u8);
    let mut posx = 0;

    if spec.first_shunt {
        posx += 50;
    }

    for k in 0..spec.order {
        let g = gi[k + 1];
        if shunt_position(spec, k) {
            // Shunt element becomes a series LC resonator to ground
            let ind = sch.add_inductor(spec.zs / (delta * g), 0, posx, 50);
            let cap = sch.add_capacitor(g * delta / (w0_sq * spec.zs), 0, posx, 100);
            let ground = sch.add_ground(posx, 150);
            let node = sch.add_node(posx, 0);

            sch.wire(&node.id, 0, &ind, 1);
            sch.wire(&ind, 0, &cap, 1);
            sch.wire(&ground, 0, &cap, 0);
            sch.wire(&prev.0, prev.1, &node.id, 0);
            prev = (node.id, 0);
        } else {
            if k == 0 {
                posx += 50;
            }
            // Series element becomes a parallel LC resonator
            let node1 = sch.add_node(posx - 20, 0);
            posx += 20;
            let ind = sch.add_inductor(g * spec.zs * delta / w0_sq, -90, posx, 0);
            let cap = sch.add_capacitor(1.0 / (g * delta * spec.zs), 90, posx, -60);
            posx += 20;
            let node2 = sch.add_node(posx + 20, 0);

            sch.wire(&prev.0, prev.1, &node1.id, 0);
            sch.wire(&node1.id, 0, &ind, 0);
            sch.wire(&node1.id, 0, &cap, 0);
            sch.wire(&node2.id, 0, &ind, 1);
            sch.wire(&node2.id, 0, &cap, 1);
            prev = (node2.id, 0);
        }
        posx += 50;
    }

    let p2 = sch.add_port(output_impedance(spec, gi), 180, posx, 0);
    sch.wire(&p2, 0, &prev.0, prev.1);
    Ok(sch)
}
