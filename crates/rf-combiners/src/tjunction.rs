//! Lossless T-junction splitter.
//!
//! A λ/4 input feed at Z₀ splits into branches of Z₀(K+1) and
//! Z₀(K+1)/K, where K is the squared amplitude ratio. Unequal splits
//! get λ/4 matching lines at √(2Z₀²(K+1)) and √(2Z₀²(K+1)/K).

use crate::spec::CombinerSpec;
use rf_core::constants::quarter_wavelength;
use rf_core::{RfError, RfResult};
use rf_schematic::{LineEmitter, Schematic};

pub fn synthesize(spec: &CombinerSpec) -> RfResult<Schematic> {
    let realization = spec
        .realization
        .line()
        .ok_or_else(|| RfError::configuration("T-junctions are transmission-line networks"))?;
    let emitter = LineEmitter::new(realization, &spec.substrate, spec.length_unit, spec.frequency);

    let k = spec.ratio() * spec.ratio();
    let lambda4 = quarter_wavelength(spec.frequency);
    let z0 = spec.z0;
    let equal_split = k == 1.0;

    let y_upper = -60;
    let y_lower = 60;

    let mut sch = Schematic::new();

    let t1 = sch.add_port(z0, 0, 0, 0);
    let feed = emitter.series_segment(&mut sch, z0, lambda4, 90, 50, 0);
    sch.wire(&t1, 0, &feed, 0);

    let n_split = sch.add_node(100, 0);
    let n_up = sch.add_hidden_node(100, y_upper);
    let n_down = sch.add_hidden_node(100, y_lower);
    sch.wire(&feed, 1, &n_split.id, 0);
    sch.wire(&n_split.id, 0, &n_up.id, 0);
    sch.wire(&n_split.id, 0, &n_down.id, 0);

    let upper = emitter.series_segment(&mut sch, z0 * (k + 1.0), lambda4, 90, 150, y_upper);
    let lower = emitter.series_segment(&mut sch, z0 * (k + 1.0) / k, lambda4, 90, 150, y_lower);
    sch.wire(&upper, 0, &n_up.id, 0);
    sch.wire(&lower, 0, &n_down.id, 0);

    let out_x = if equal_split { 200 } else { 300 };
    let t2 = sch.add_port(z0, 180, out_x, y_upper);
    let t3 = sch.add_port(z0, 180, out_x, y_lower);

    if equal_split {
        sch.wire(&upper, 1, &t2, 0);
        sch.wire(&lower, 1, &t3, 0);
    } else {
        let up_match = emitter.series_segment(
            &mut sch,
            (2.0 * z0 * z0 * (k + 1.0)).sqrt(),
            lambda4,
            90,
            225,
            y_upper,
        );
        let down_match = emitter.series_segment(
            &mut sch,
            (2.0 * z0 * z0 * (k + 1.0) / k).sqrt(),
            lambda4,
            90,
            225,
            y_lower,
        );
        sch.wire(&upper, 1, &up_match, 0);
        sch.wire(&up_match, 1, &t2, 0);
        sch.wire(&lower, 1, &down_match, 0);
        sch.wire(&down_match, 1, &t3, 0);
    }

    Ok(sch)
}
