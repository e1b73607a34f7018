//! Cascaded LC section matching.
//!
//! A geometric progression of intermediate resistance levels
//! R_k = R₁^((N−k−1)/N)·R₂^((k+1)/N) between the source and load
//! resistances; each stage is an L-section at its ratio. The lowpass
//! solution uses series L / shunt C, the highpass solution shunt L /
//! series C. Reference: Bahl, "Fundamentals of RF and Microwave
//! Transistor Amplifiers", Wiley 2009, pp. 169-170.

use crate::spec::MatchingNetworkSpec;
use rf_core::constants::angular_frequency;
use rf_core::{RfError, RfResult};
use rf_schematic::Schematic;

struct Stage {
    /// Series reactive element (H for lowpass L, F for highpass C)
    series: f64,
    /// Shunt reactive element at the high-resistance side
    shunt: f64,
}

/// Per-stage element values walking from the higher resistance `r1` down
/// to `r2`. `lowpass` selects series-L/shunt-C; otherwise shunt-L/series-C.
fn design_stages(r1: f64, r2: f64, n: usize, w: f64, lowpass: bool) -> Vec<Stage> {
    let mut stages = Vec::with_capacity(n);
    let mut r_prev = r1;
    for i in 0..n {
        let r_i = r1.powf((n - i - 1) as f64 / n as f64) * r2.powf((i + 1) as f64 / n as f64);
        let q = (r_prev / r_i - 1.0).sqrt();
        let stage = if lowpass {
            Stage {
                series: q * r_i / w,        // L (H)
                shunt: q / (r_prev * w),    // C (F)
            }
        } else {
            Stage {
                series: 1.0 / (q * r_i * w), // C (F)
                shunt: r_prev / (w * q),     // L (H)
            }
        };
        r_prev = r_i;
        stages.push(stage);
    }
    stages
}

pub fn synthesize(spec: &MatchingNetworkSpec, frequency: f64) -> RfResult<Schematic> {
    let rs = spec.z0;
    let rl = spec.zl.re;
    if rl <= 0.0 {
        return Err(RfError::unmatchable(
            "cascaded LC sections match resistive loads",
        ));
    }

    let w = angular_frequency(frequency);
    let n = spec.n_sections;
    let lowpass = spec.solution == 1;
    let (r_high, r_low) = if rs > rl { (rs, rl) } else { (rl, rs) };
    let stages = design_stages(r_high, r_low, n, w, lowpass);

    let mut sch = Schematic::new();
    let port = sch.add_port(rs, 0, 0, 0);
    let mut prev = (port, 0u8);

    let x_spacing = 80;
    let mut x = 50;

    let emit_shunt = |sch: &mut Schematic, value: f64, x: i32| -> String {
        let id = if lowpass {
            sch.add_capacitor(value, 0, x, 50)
        } else {
            sch.add_inductor(value, 0, x, 50)
        };
        let gnd = sch.add_ground(x, 100);
        sch.wire(&id, 0, &gnd, 0);
        id
    };
    let emit_series = |sch: &mut Schematic, value: f64, x: i32| -> String {
        if lowpass {
            sch.add_inductor(value, -90, x, 0)
        } else {
            sch.add_capacitor(value, -90, x, 0)
        }
    };

    if rs > rl {
        // Shunt at the source side of every stage, series toward the load
        for stage in &stages {
            let node = sch.add_node(x, 0);
            let shunt = emit_shunt(&mut sch, stage.shunt, x);
            let series = emit_series(&mut sch, stage.series, x + x_spacing / 2);
            sch.wire(&prev.0, prev.1, &node.id, 0);
            sch.wire(&node.id, 0, &shunt, 1);
            sch.wire(&node.id, 0, &series, 1);
            prev = (series, 0);
            x += x_spacing;
        }
    } else {
        // Mirrored: series first, shunt at the load side of every stage
        for stage in stages.iter().rev() {
            let series = emit_series(&mut sch, stage.series, x);
            let node = sch.add_node(x + x_spacing / 2, 0);
            let shunt = emit_shunt(&mut sch, stage.shunt, x + x_spacing / 2);
            sch.wire(&prev.0, prev.1, &series, 1);
            sch.wire(&series, 0, &node.id, 0);
            sch.wire(&node.id, 0, &shunt, 1);
            prev = (node.id, 0);
            x += x_spacing;
        }
    }

    let load = sch.add_complex_load(spec.zl, 0, x, 50);
    let load_gnd = sch.add_load_ground(x, 100);
    sch.wire(&load, 1, &prev.0, prev.1);
    sch.wire(&load, 0, &load_gnd, 0);

    Ok(sch)
}
