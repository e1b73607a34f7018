//! Quarter-wave stub bandpass/bandstop filters.
//!
//! λ/4 connecting lines at the port impedance with λ/4 stubs at each
//! junction: short-circuited stubs for bandpass, open-circuited for
//! bandstop. Stub impedances π·Z₀·Δ/(4g) and 4Z₀/(π·Δ·g) respectively.

use rf_schematic::LineEmitter;
use crate::spec::{FilterClass, FilterSpec};
use rf_core::constants::quarter_wavelength;
use rf_core::{RfError, RfResult};
use rf_prototype::lowpass_prototype;
use rf_schematic::Schematic;
use std::f64::consts::PI;

pub fn synthesize(spec: &FilterSpec) -> RfResult<Schematic> {
    let full = lowpass_prototype(spec.response, spec.order, spec.ripple_db)?;
    // Reactive elements only; terminations are not stub positions
    let gi = &full[1..=spec.order];

    let mut sch = Schematic::new();
    let emitter = LineEmitter::new(spec.realization, &spec.substrate, spec.length_unit, spec.fc);

    let lambda4 = quarter_wavelength(spec.fc);
    let fractional_bw = spec.bw / spec.fc;
    let z0 = spec.zs;

    let p1 = sch.add_port(z0, 0, 0, 0);
    let mut prev = (p1, 0u8);
    let mut posx = -50;

    for &g in gi {
        posx += 100;

        let line = emitter.series_segment(&mut sch, z0, lambda4, 90, posx, 0);
        let node = sch.add_node(posx + 50, 0);
        sch.wire(&prev.0, prev.1, &line, 0);
        sch.wire(&node.id, 0, &line, 1);

        match spec.class {
            FilterClass::Bandpass => {
                let z = PI * z0 * fractional_bw / (4.0 * g);
                let stub = emitter.short_stub(&mut sch, z, lambda4, posx + 50, 50);
                sch.wire(&node.id, 0, &stub, 1);
            }
            FilterClass::Bandstop => {
                let z = 4.0 * z0 / (PI * fractional_bw * g);
                let stub = emitter.open_stub(&mut sch, z, lambda4, posx + 50, 50);
                sch.wire(&node.id, 0, &stub, 1);
            }
            _ => {
                return Err(RfError::configuration(
                    "quarter-wave stub filters are bandpass/bandstop networks",
                ));
            }
        }

        prev = (node.id, 0);
    }

    // Final connecting line to the output port
    posx += 100;
    let line = emitter.series_segment(&mut sch, z0, lambda4, 90, posx, 0);
    let p2 = sch.add_port(z0, 180, posx + 50, 0);
    sch.wire(&prev.0, prev.1, &line, 0);
    sch.wire(&p2, 0, &line, 1);

    Ok(sch)
}
