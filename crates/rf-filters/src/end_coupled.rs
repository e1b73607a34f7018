//! End-coupled bandpass filter.
//!
//! Resonator lines separated by series gap capacitors acting as
//! admittance inverters. Reference: Hong & Lancaster, "Microstrip Filters
//! for RF/Microwave Applications", pp. 121-123.

use rf_schematic::LineEmitter;
use crate::spec::FilterSpec;
use rf_core::constants::{C_0, angular_frequency};
use rf_core::{RfError, RfResult};
use rf_prototype::lowpass_prototype;
use rf_schematic::Schematic;
use std::f64::consts::PI;

pub fn synthesize(spec: &FilterSpec) -> RfResult<Schematic> {
    let gi = lowpass_prototype(spec.response, spec.order, spec.ripple_db)?;
    let mut sch = Schematic::new();
    let emitter = LineEmitter::new(spec.realization, &spec.substrate, spec.length_unit, spec.fc);

    let n = spec.order;
    let fractional_bw = spec.bw / spec.fc;
    let w0 = angular_frequency(spec.fc);
    let z0 = spec.zs;
    let lambda_g0 = C_0 / spec.fc;

    let p1 = sch.add_port(z0, 0, 0, 0);
    let mut prev = (p1, 0u8);
    let mut posx = 50;

    let mut b_prev = 0.0f64;
    for k in 0..=n {
        // Inverter J-value; edge sections take the geometric-mean form
        let j_val = if k == 0 {
            (0.5 * PI * fractional_bw / (gi[0] * gi[1])).sqrt()
        } else if k == n {
            (0.5 * PI * fractional_bw / (gi[n] * gi[n + 1])).sqrt()
        } else {
            0.5 * PI * fractional_bw / (gi[k] * gi[k + 1]).sqrt()
        };

        let inverter_denominator = 1.0 - j_val * j_val;
        if inverter_denominator.abs() < 1e-12 {
            return Err(RfError::NumericOverflow {
                context: "end-coupled inverter susceptance 1 - J²",
            });
        }
        let b_val = j_val / inverter_denominator;
        let theta = PI - 0.5 * ((2.0 * b_prev).atan() + (2.0 * b_val).atan());
        b_prev = b_val;

        let c_val = b_val / z0 / w0;
        let line_length = theta * lambda_g0 / (2.0 * PI);

        if k > 0 {
            let line = emitter.series_segment(&mut sch, z0, line_length, 90, posx, 0);
            sch.wire(&prev.0, prev.1, &line, 0);
            prev = (line, 1);
            posx += 50;
        }

        let cap = sch.add_capacitor(c_val, 90, posx, 0);
        sch.wire(&cap, 0, &prev.0, prev.1);
        prev = (cap, 1);
        posx += 50;
    }

    let g_load = gi[n + 1];
    let z_out = if spec.first_shunt {
        spec.zs / g_load
    } else {
        spec.zs * g_load
    };
    let p2 = sch.add_port(z_out, 180, posx, 0);
    sch.wire(&p2, 0, &prev.0, prev.1);
    Ok(sch)
}
