//! Two-element L-section matching.
//!
//! Reference: Vizmuller, "RF Design Guide: Systems, Circuits, and
//! Equations", Artech House 1995.
//!
//! The shunt-first shape applies when Z₀ > R_L, the series-first shape
//! when Z₀ < R_L; within each shape the solution selector picks one of
//! the two closed-form branches.

use crate::spec::MatchingNetworkSpec;
use rf_core::constants::angular_frequency;
use rf_core::{RfError, RfResult};
use rf_schematic::Schematic;

pub fn synthesize(
    spec: &MatchingNetworkSpec,
    frequency: f64,
) -> RfResult<Schematic> {
    let z0 = spec.z0;
    let rl = spec.zl.re;
    let xl = spec.zl.im;
    let w0 = angular_frequency(frequency);

    if rl <= 0.0 {
        return Err(RfError::unmatchable(
            "an L-section cannot match a purely reactive load",
        ));
    }

    let mut sch = Schematic::new();
    let port = sch.add_port(z0, 0, 0, 0);
    let load = sch.add_complex_load(spec.zl, 0, 175, 50);
    let load_gnd = sch.add_load_ground(175, 100);

    // Reactance into a series element
    let series_element = |sch: &mut Schematic, x: f64, px: i32| -> String {
        if x < 0.0 {
            sch.add_capacitor(-1.0 / (w0 * x), -90, px, 0)
        } else {
            sch.add_inductor(x / w0, -90, px, 0)
        }
    };
    // Susceptance into a shunt element
    let shunt_element = |sch: &mut Schematic, b: f64, px: i32| -> String {
        if b > 0.0 {
            sch.add_capacitor(b / w0, 0, px, 50)
        } else {
            sch.add_inductor(-1.0 / (w0 * b), 0, px, 50)
        }
    };

    if z0 > rl {
        // Shunt element at the source side, series element at the load
        let (x, b) = if spec.solution == 1 {
            (
                (rl * (z0 - rl)).sqrt() - xl,
                ((z0 - rl) / rl).sqrt() / z0,
            )
        } else {
            (
                -(rl * (z0 - rl)).sqrt() - xl,
                -((z0 - rl) / rl).sqrt() / z0,
            )
        };

        let shunt = shunt_element(&mut sch, b, 50);
        let ground = sch.add_ground(50, 100);
        let node = sch.add_node(50, 0);
        let series = series_element(&mut sch, x, 100);

        sch.wire(&port, 0, &node.id, 0);
        sch.wire(&shunt, 1, &node.id, 0);
        sch.wire(&shunt, 0, &ground, 0);
        sch.wire(&node.id, 0, &series, 1);
        sch.wire(&load, 1, &series, 0);
    } else {
        // Series element at the source side, shunt element at the load
        let discriminant = rl * rl + xl * xl - z0 * rl;
        if discriminant < 0.0 {
            return Err(RfError::unmatchable(
                "load falls inside the forbidden region of the series-first L-section",
            ));
        }
        let root = (rl / z0).sqrt() * discriminant.sqrt();
        let b = if spec.solution == 1 {
            (xl + root) / (rl * rl + xl * xl)
        } else {
            (xl - root) / (rl * rl + xl * xl)
        };
        let x = 1.0 / b + xl * z0 / rl - z0 / (b * rl);

        let series = series_element(&mut sch, x, 50);
        let node = sch.add_node(100, 0);
        let shunt = shunt_element(&mut sch, b, 100);
        let ground = sch.add_ground(100, 100);

        sch.wire(&port, 0, &series, 1);
        sch.wire(&series, 0, &node.id, 0);
        sch.wire(&node.id, 0, &shunt, 1);
        sch.wire(&shunt, 0, &ground, 0);
        sch.wire(&load, 1, &node.id, 0);
    }

    sch.wire(&load, 0, &load_gnd, 0);
    Ok(sch)
}
