//! Elliptic ladder synthesis.
//!
//! Element values come from the Amstutz solver; the schematic is built
//! starting from the load end, inserting one section per series resonator
//! plus the central element, exactly as the element arrays are ordered by
//! the permutation method. Each section leaves its open pin set in an
//! unconnected list that the next section (and finally the source port)
//! ties up. Sections inserted before the central element orient their
//! branch group toward the load; sections after it mirror.
//!
//! Section shapes per class and orientation:
//! - Lowpass min-L: shunt C, series L∥C resonator
//! - Lowpass min-C: series L, shunt L+C chain to ground
//! - Highpass min-C: shunt L, series C∥L resonator
//! - Highpass min-L: series C, shunt L+C chain to ground
//! - Bandpass/bandstop: the corresponding reactance transformations,
//!   one resonator pair per branch
//! - Semi-lumped (type S only): lowpass min-C and highpass min-L with
//!   inductors realized as high-impedance line segments and shunt
//!   capacitors optionally as low-impedance open stubs

use rf_schematic::LineEmitter;
use crate::spec::{FilterClass, FilterSpec, FilterTopology, SemiLumpedStyle};
use rf_core::constants::{C_0, angular_frequency};
use rf_core::{RfError, RfResult};
use rf_prototype::{EllipticPrototype, elliptic_prototype};
use rf_schematic::Schematic;
use std::f64::consts::PI;

pub fn synthesize(spec: &FilterSpec) -> RfResult<Schematic> {
    let proto = elliptic_prototype(
        spec.elliptic_type,
        spec.order,
        spec.ripple_db,
        spec.stopband_db,
        spec.zs,
    )?;

    let semilumped = spec.topology == FilterTopology::SemiLumped;
    if semilumped && !matches!(spec.class, FilterClass::Lowpass | FilterClass::Highpass) {
        return Err(RfError::configuration(
            "semi-lumped elliptic synthesis covers lowpass and highpass only",
        ));
    }

    // Load resistance transforms with the class/orientation duality
    let mut rl = proto.rl;
    if spec.class == FilterClass::Lowpass && !spec.first_shunt {
        rl = spec.zs * spec.zs / rl;
    }
    if spec.class == FilterClass::Highpass && spec.first_shunt {
        rl = spec.zs * spec.zs / rl;
    }

    let n = spec.order;
    let m = 2 * n + 1;
    let lumped_classes = matches!(spec.class, FilterClass::Lowpass | FilterClass::Highpass);
    let stride = if lumped_classes { 150 } else { 300 };

    let mut builder = Builder {
        spec,
        proto: &proto,
        sch: Schematic::new(),
        prevs: Vec::new(),
        posx: n as i32 * if lumped_classes { 50 } else { 300 },
        kl: spec.zs / angular_frequency(spec.fc),
        kc: 1.0 / (angular_frequency(spec.fc) * spec.zs),
        delta: spec.bw / spec.fc,
        semilumped,
    };

    // Load termination
    let load = builder.sch.add_port(rl, 180, builder.posx, 0);
    builder.prevs.push((load, 0));
    builder.posx -= 100;

    // Sections from the load toward the center
    let mut j = 0;
    while j < n {
        builder.insert_section(j, true, false)?;
        builder.posx -= stride;
        j += 2;
    }

    // Central element
    builder.insert_section(n, false, true)?;

    // Remaining sections toward the source
    let mut k = n as isize - 1 - (n % 2) as isize;
    let mut idx = n + 3;
    while idx <= m {
        builder.insert_section(k as usize, false, false)?;
        k -= 2;
        builder.posx -= stride;
        idx += 2;
    }

    // Source termination
    builder.posx += 100;
    let source = builder.sch.add_port(spec.zs, 0, builder.posx, 0);
    for (id, pin) in builder.prevs.clone() {
        builder.sch.wire(&source, 0, &id, pin);
    }

    Ok(builder.sch)
}

/// One open (element, pin) end awaiting connection.
type Pin = (String, u8);

struct Builder<'a> {
    spec: &'a FilterSpec,
    proto: &'a EllipticPrototype,
    sch: Schematic,
    /// Open ends the next section must connect
    prevs: Vec<Pin>,
    posx: i32,
    /// Inductance denormalization Z_S/ω_c
    kl: f64,
    /// Capacitance denormalization 1/(ω_c·Z_S)
    kc: f64,
    /// Fractional bandwidth (bandpass/bandstop)
    delta: f64,
    semilumped: bool,
}

impl<'a> Builder<'a> {
    fn emitter(&self) -> LineEmitter<'a> {
        let spec = self.spec;
        LineEmitter::new(spec.realization, &spec.substrate, spec.length_unit, spec.fc)
    }

    /// Wire every pin of `a` to every pin of `b`.
    fn join(&mut self, a: &[Pin], b: &[Pin]) {
        for (aid, apin) in a {
            for (bid, bpin) in b {
                self.sch.wire(aid, *apin, bid, *bpin);
            }
        }
    }

    /// Stub length λ₀/(2π)·asin(x) with realizability guard.
    fn stub_length(&self, x: f64) -> RfResult<f64> {
        if x.abs() > 1.0 {
            return Err(RfError::configuration(
                "element value outside the realizable line impedance range",
            ));
        }
        Ok(C_0 / self.spec.fc / (2.0 * PI) * x.asin())
    }

    fn insert_section(&mut self, j: usize, flip: bool, central: bool) -> RfResult<()> {
        if self.semilumped {
            return match self.spec.class {
                FilterClass::Lowpass => self.semilumped_lowpass_section(j, flip, central),
                FilterClass::Highpass => self.semilumped_highpass_section(j, flip, central),
                _ => unreachable!("guarded in synthesize"),
            };
        }
        match (self.spec.class, self.spec.first_shunt) {
            (FilterClass::Lowpass, true) => self.lowpass_min_l_section(j, flip, central),
            (FilterClass::Lowpass, false) => self.lowpass_min_c_section(j, flip, central),
            (FilterClass::Highpass, false) => self.highpass_min_c_section(j, flip, central),
            (FilterClass::Highpass, true) => self.highpass_min_l_section(j, flip, central),
            (FilterClass::Bandpass, true) => self.bandpass_shunt_section(j, flip, central),
            (FilterClass::Bandpass, false) => self.bandpass_series_section(j, flip, central),
            (FilterClass::Bandstop, true) => self.bandstop_shunt_section(j, flip, central),
            (FilterClass::Bandstop, false) => self.bandstop_series_section(j, flip, central),
        }
        Ok(())
    }

    /// Close out a section around its node: flip sections tie the previous
    /// open ends to the node and leave the group's far pins open; non-flip
    /// sections tie the far pins back to the previous ends and leave the
    /// node open. A section with no series group (central) always leaves
    /// the node open.
    fn finish_section(&mut self, node: Pin, far: Vec<Pin>, flip: bool) {
        let prevs = std::mem::take(&mut self.prevs);
        if far.is_empty() {
            self.join(&prevs, std::slice::from_ref(&node));
            self.prevs = vec![node];
        } else if flip {
            self.join(&prevs, std::slice::from_ref(&node));
            self.prevs = far;
        } else {
            self.join(&far, &prevs);
            self.prevs = vec![node];
        }
    }

    // ====================================================================
    // Lowpass
    // ====================================================================

    /// Shunt C at the node, series L∥C resonator on the group side.
    fn lowpass_min_l_section(&mut self, j: usize, flip: bool, central: bool) {
        let node = self.sch.add_node(self.posx + 50, 0);

        let c_shunt = self.kc * self.proto.c_shunt[j];
        if c_shunt != 0.0 {
            let cap = self.sch.add_capacitor(c_shunt, 0, self.posx + 50, 50);
            let gnd = self.sch.add_ground(self.posx + 50, 100);
            self.sch.wire(&gnd, 0, &cap, 0);
            self.sch.wire(&node.id, 0, &cap, 1);
        }

        let mut far = Vec::new();
        if !central {
            let l_series = self.kl * self.proto.l_series[j];
            let ind = self.sch.add_inductor(l_series, -90, self.posx, 0);
            self.sch.wire(&node.id, 0, &ind, 1);
            far.push((ind, 0));

            let c_series = self.kc * self.proto.c_series[j];
            if c_series != 0.0 {
                let cap = self.sch.add_capacitor(c_series, 90, self.posx, -80);
                self.sch.wire(&node.id, 0, &cap, 1);
                far.push((cap, 0));
            }
        }
        self.finish_section((node.id, 0), far, flip);
    }

    /// Series L from the shunt array, shunt L+C chain to ground.
    fn lowpass_min_c_section(&mut self, j: usize, flip: bool, central: bool) {
        if central {
            let l = self.kl * self.proto.c_shunt[j];
            let ind = self.sch.add_inductor(l, -90, self.posx + 50, 0);
            let prevs = std::mem::take(&mut self.prevs);
            self.join(&[(ind.clone(), 1)], &prevs);
            self.prevs = vec![(ind, 0)];
            return;
        }

        let node = self.sch.add_node(self.posx + 50, 0);

        // Shunt branch: inductor from the series-capacitor array over the
        // capacitor from the series-inductor array
        let l_shunt = self.kl * self.proto.c_series[j];
        let c_shunt = self.kc * self.proto.l_series[j];
        let cap = self.sch.add_capacitor(c_shunt, 0, self.posx, 100);
        let gnd = self.sch.add_ground(self.posx, 140);
        self.sch.wire(&gnd, 0, &cap, 0);
        if l_shunt != 0.0 {
            let ind = self.sch.add_inductor(l_shunt, 0, self.posx, 30);
            self.sch.wire(&node.id, 0, &ind, 1);
            self.sch.wire(&ind, 0, &cap, 1);
        } else {
            self.sch.wire(&node.id, 0, &cap, 1);
        }

        // Series element
        let mut far = Vec::new();
        let l_series = self.kl * self.proto.c_shunt[j];
        if l_series != 0.0 {
            let ind = self.sch.add_inductor(l_series, -90, self.posx - 50, 0);
            self.sch.wire(&node.id, 0, &ind, 1);
            far.push((ind, 0));
        }
        self.finish_section((node.id, 0), far, flip);
    }

    // ====================================================================
    // Highpass
    // ====================================================================

    /// Shunt L at the node, series C∥L resonator on the group side.
    fn highpass_min_c_section(&mut self, j: usize, flip: bool, central: bool) {
        let node = self.sch.add_node(self.posx + 50, 0);

        let c_shunt = self.proto.c_shunt[j];
        if c_shunt != 0.0 {
            let ind = self.sch.add_inductor(self.kl / c_shunt, 0, self.posx + 50, 50);
            let gnd = self.sch.add_ground(self.posx + 50, 100);
            self.sch.wire(&gnd, 0, &ind, 0);
            self.sch.wire(&node.id, 0, &ind, 1);
        }

        let mut far = Vec::new();
        if !central {
            let cap = self
                .sch
                .add_capacitor(self.kc / self.proto.l_series[j], 90, self.posx, 0);
            self.sch.wire(&node.id, 0, &cap, 1);
            far.push((cap, 0));

            let c_series = self.proto.c_series[j];
            if c_series != 0.0 {
                let ind = self.sch.add_inductor(self.kl / c_series, -90, self.posx, -80);
                self.sch.wire(&node.id, 0, &ind, 1);
                far.push((ind, 0));
            }
        }
        self.finish_section((node.id, 0), far, flip);
    }

    /// Series C from the shunt array, shunt L+C chain to ground.
    fn highpass_min_l_section(&mut self, j: usize, flip: bool, central: bool) {
        if central {
            let cap =
                self.sch
                    .add_capacitor(self.kc / self.proto.c_shunt[j], 90, self.posx + 50, 0);
            let prevs = std::mem::take(&mut self.prevs);
            self.join(&[(cap.clone(), 1)], &prevs);
            self.prevs = vec![(cap, 0)];
            return;
        }

        let node = self.sch.add_node(self.posx + 50, 0);

        // Shunt branch: inductor over capacitor to ground
        let l_shunt = self.kl / self.proto.l_series[j];
        let c_series_lp = self.proto.c_series[j];
        let ind = self.sch.add_inductor(l_shunt, 0, self.posx, 30);
        self.sch.wire(&node.id, 0, &ind, 1);
        if c_series_lp != 0.0 {
            let cap = self.sch.add_capacitor(self.kc / c_series_lp, 0, self.posx, 100);
            let gnd = self.sch.add_ground(self.posx, 150);
            self.sch.wire(&ind, 0, &cap, 1);
            self.sch.wire(&gnd, 0, &cap, 0);
        } else {
            let gnd = self.sch.add_ground(self.posx, 80);
            self.sch.wire(&gnd, 0, &ind, 0);
        }

        // Series capacitor
        let mut far = Vec::new();
        let c_shunt_lp = self.proto.c_shunt[j];
        if c_shunt_lp != 0.0 {
            let cap = self.sch.add_capacitor(self.kc / c_shunt_lp, 90, self.posx - 50, 0);
            self.sch.wire(&node.id, 0, &cap, 1);
            far.push((cap, 0));
        }
        self.finish_section((node.id, 0), far, flip);
    }

    // ====================================================================
    // Bandpass
    // ====================================================================

    /// Shunt parallel-LC at the node; the series resonator becomes a
    /// series L-C chain with a parallel C-L leg.
    fn bandpass_shunt_section(&mut self, j: usize, flip: bool, central: bool) {
        let node = self.sch.add_node(self.posx + 25, 0);

        let cs = self.proto.c_shunt[j];
        if cs != 0.0 {
            let cap = self
                .sch
                .add_capacitor(self.kc * cs / self.delta, 0, self.posx + 50, 50);
            let gnd_c = self.sch.add_ground(self.posx + 50, 100);
            let ind = self
                .sch
                .add_inductor(self.kl * self.delta / cs, 0, self.posx, 50);
            let gnd_l = self.sch.add_ground(self.posx, 100);
            self.sch.wire(&cap, 0, &gnd_c, 0);
            self.sch.wire(&ind, 0, &gnd_l, 0);
            self.sch.wire(&ind, 1, &node.id, 0);
            self.sch.wire(&cap, 1, &node.id, 0);
        }

        let mut far = Vec::new();
        if !central {
            // Main series chain: L then C from the series-inductor array
            let ls = self.proto.l_series[j];
            let ind_main = self
                .sch
                .add_inductor(self.kl * ls / self.delta, -90, self.posx - 40, 0);
            let cap_main = self
                .sch
                .add_capacitor(self.kc * self.delta / ls, 90, self.posx - 110, 0);
            self.sch.wire(&node.id, 0, &ind_main, 1);
            self.sch.wire(&ind_main, 0, &cap_main, 1);
            far.push((cap_main, 0));

            // Parallel leg: C then L from the series-capacitor array
            let csr = self.proto.c_series[j];
            if csr != 0.0 {
                let cap_leg = self
                    .sch
                    .add_capacitor(self.kc * csr / self.delta, 90, self.posx - 40, -60);
                let ind_leg = self
                    .sch
                    .add_inductor(self.kl * self.delta / csr, -90, self.posx - 110, -60);
                self.sch.wire(&node.id, 0, &cap_leg, 1);
                self.sch.wire(&cap_leg, 0, &ind_leg, 1);
                far.push((ind_leg, 0));
            }
        }
        self.finish_section((node.id, 0), far, flip);
    }

    /// Series L-C chain from the shunt array; two series-LC legs to
    /// ground form the shunt branch.
    fn bandpass_series_section(&mut self, j: usize, flip: bool, central: bool) {
        let cs = self.proto.c_shunt[j];
        if central {
            let ind = self
                .sch
                .add_inductor(self.kl * cs / self.delta, -90, self.posx + 75, 0);
            let cap = self
                .sch
                .add_capacitor(self.kc * self.delta / cs, 90, self.posx + 25, 0);
            self.sch.wire(&ind, 0, &cap, 1);
            let prevs = std::mem::take(&mut self.prevs);
            self.join(&[(ind.clone(), 1)], &prevs);
            self.prevs = vec![(cap, 0)];
            return;
        }

        let node = self.sch.add_node(self.posx + 50, 0);

        // Shunt legs
        let csr = self.proto.c_series[j];
        if csr != 0.0 {
            let cap = self
                .sch
                .add_capacitor(self.kc * self.delta / csr, 0, self.posx - 25, 50);
            let ind = self
                .sch
                .add_inductor(self.kl * csr / self.delta, 0, self.posx - 25, 110);
            let gnd = self.sch.add_ground(self.posx - 25, 160);
            self.sch.wire(&node.id, 0, &cap, 1);
            self.sch.wire(&cap, 0, &ind, 1);
            self.sch.wire(&ind, 0, &gnd, 0);
        }
        let ls = self.proto.l_series[j];
        if ls != 0.0 {
            let cap = self
                .sch
                .add_capacitor(self.kc * ls / self.delta, 0, self.posx + 25, 50);
            let ind = self
                .sch
                .add_inductor(self.kl * self.delta / ls, 0, self.posx + 25, 110);
            let gnd = self.sch.add_ground(self.posx + 25, 160);
            self.sch.wire(&node.id, 0, &cap, 1);
            self.sch.wire(&cap, 0, &ind, 1);
            self.sch.wire(&ind, 0, &gnd, 0);
        }

        // Series L-C chain
        let mut far = Vec::new();
        if cs != 0.0 {
            let ind = self
                .sch
                .add_inductor(self.kl * cs / self.delta, -90, self.posx - 40, 0);
            let cap = self
                .sch
                .add_capacitor(self.kc * self.delta / cs, 90, self.posx - 90, 0);
            self.sch.wire(&node.id, 0, &ind, 1);
            self.sch.wire(&ind, 0, &cap, 1);
            far.push((cap, 0));
        }
        self.finish_section((node.id, 0), far, flip);
    }

    // ====================================================================
    // Bandstop
    // ====================================================================

    /// Series parallel-LC from the shunt array; the resonator arrays
    /// become two series-LC legs to ground.
    fn bandstop_shunt_section(&mut self, j: usize, flip: bool, central: bool) {
        let cs = self.proto.c_shunt[j];
        if central {
            // Shunt series-LC at the central node
            let node = self.sch.add_node(self.posx + 25, 0);
            let ind = self
                .sch
                .add_inductor(self.kl / (self.delta * cs), 0, self.posx + 25, 50);
            let cap = self
                .sch
                .add_capacitor(self.kc * cs * self.delta, 0, self.posx + 25, 110);
            let gnd = self.sch.add_ground(self.posx + 25, 160);
            self.sch.wire(&ind, 1, &node.id, 0);
            self.sch.wire(&ind, 0, &cap, 1);
            self.sch.wire(&cap, 0, &gnd, 0);
            self.finish_section((node.id, 0), Vec::new(), flip);
            return;
        }

        let node = self.sch.add_node(self.posx + 50, 0);

        // Shunt legs from the resonator arrays
        let ls = self.proto.l_series[j];
        if ls != 0.0 {
            let cap = self
                .sch
                .add_capacitor(self.kc * ls * self.delta, 0, self.posx - 25, 50);
            let ind = self
                .sch
                .add_inductor(self.kl / (self.delta * ls), 0, self.posx - 25, 110);
            let gnd = self.sch.add_ground(self.posx - 25, 160);
            self.sch.wire(&node.id, 0, &cap, 1);
            self.sch.wire(&cap, 0, &ind, 1);
            self.sch.wire(&ind, 0, &gnd, 0);
        }
        let csr = self.proto.c_series[j];
        if csr != 0.0 {
            let cap = self
                .sch
                .add_capacitor(self.kc / (csr * self.delta), 0, self.posx + 25, 50);
            let ind = self
                .sch
                .add_inductor(self.kl * self.delta * csr, 0, self.posx + 25, 110);
            let gnd = self.sch.add_ground(self.posx + 25, 160);
            self.sch.wire(&node.id, 0, &cap, 1);
            self.sch.wire(&cap, 0, &ind, 1);
            self.sch.wire(&ind, 0, &gnd, 0);
        }

        // Series parallel-LC toward the group side
        let mut far = Vec::new();
        if cs != 0.0 {
            let node2 = self.sch.add_node(self.posx - 90, 0);
            let cap = self
                .sch
                .add_capacitor(self.kc / (self.delta * cs), 90, self.posx - 45, -60);
            let ind = self
                .sch
                .add_inductor(self.kl * cs * self.delta, -90, self.posx - 45, 0);
            self.sch.wire(&node.id, 0, &ind, 1);
            self.sch.wire(&node.id, 0, &cap, 1);
            self.sch.wire(&node2.id, 0, &ind, 0);
            self.sch.wire(&node2.id, 0, &cap, 0);
            far.push((node2.id, 0));
        }
        self.finish_section((node.id, 0), far, flip);
    }

    /// Two cascaded series parallel-LC pairs from the resonator arrays;
    /// the shunt array becomes a series-LC leg to ground.
    fn bandstop_series_section(&mut self, j: usize, flip: bool, central: bool) {
        let cs = self.proto.c_shunt[j];
        if central {
            // Series parallel-LC between the halves
            let node_r = self.sch.add_node(self.posx + 100, 0);
            let node_l = self.sch.add_node(self.posx, 0);
            let ind = self
                .sch
                .add_inductor(self.kl * cs * self.delta, -90, self.posx + 50, 0);
            let cap = self
                .sch
                .add_capacitor(self.kc / (self.delta * cs), 90, self.posx + 50, -60);
            self.sch.wire(&node_r.id, 0, &ind, 1);
            self.sch.wire(&node_r.id, 0, &cap, 1);
            self.sch.wire(&node_l.id, 0, &ind, 0);
            self.sch.wire(&node_l.id, 0, &cap, 0);
            let prevs = std::mem::take(&mut self.prevs);
            self.join(&[(node_r.id, 0)], &prevs);
            self.prevs = vec![(node_l.id, 0)];
            return;
        }

        let node = self.sch.add_node(self.posx + 50, 0);

        // Shunt series-LC leg
        if cs != 0.0 {
            let ind = self
                .sch
                .add_inductor(self.kl / (self.delta * cs), 0, self.posx + 50, 50);
            let cap = self
                .sch
                .add_capacitor(self.kc * cs * self.delta, 0, self.posx + 50, 110);
            let gnd = self.sch.add_ground(self.posx + 50, 160);
            self.sch.wire(&node.id, 0, &ind, 1);
            self.sch.wire(&ind, 0, &cap, 1);
            self.sch.wire(&cap, 0, &gnd, 0);
        }

        // First series pair from the series-inductor array
        let ls = self.proto.l_series[j];
        let mid = self.sch.add_node(self.posx - 40, 0);
        let ind1 = self
            .sch
            .add_inductor(self.kl * ls * self.delta, -90, self.posx - 20, 0);
        let cap1 = self
            .sch
            .add_capacitor(self.kc / (self.delta * ls), 90, self.posx - 20, -60);
        self.sch.wire(&node.id, 0, &ind1, 1);
        self.sch.wire(&node.id, 0, &cap1, 1);
        self.sch.wire(&mid.id, 0, &ind1, 0);
        self.sch.wire(&mid.id, 0, &cap1, 0);

        // Second series pair from the series-capacitor array
        let mut far = Vec::new();
        let csr = self.proto.c_series[j];
        if csr != 0.0 {
            let end = self.sch.add_node(self.posx - 90, 0);
            let ind2 = self
                .sch
                .add_inductor(self.kl / (csr * self.delta), -90, self.posx - 65, 0);
            let cap2 = self
                .sch
                .add_capacitor(self.kc * self.delta * csr, 90, self.posx - 65, -60);
            self.sch.wire(&mid.id, 0, &ind2, 1);
            self.sch.wire(&mid.id, 0, &cap2, 1);
            self.sch.wire(&end.id, 0, &ind2, 0);
            self.sch.wire(&end.id, 0, &cap2, 0);
            far.push((end.id, 0));
        } else {
            far.push((mid.id.clone(), 0));
        }
        self.finish_section((node.id, 0), far, flip);
    }

    // ====================================================================
    // Semi-lumped (type S, lowpass/highpass)
    // ====================================================================

    /// Lowpass min-C structure with inductors as high-impedance segments.
    fn semilumped_lowpass_section(&mut self, j: usize, flip: bool, central: bool) -> RfResult<()> {
        let emitter = self.emitter();
        let w_c = angular_frequency(self.spec.fc);
        let max_z = self.spec.max_z;

        if central {
            let l = self.kl * self.proto.c_shunt[j];
            let length = self.stub_length(w_c * l / max_z)?;
            let line = emitter.series_segment(&mut self.sch, max_z, length, -90, self.posx + 50, 0);
            let prevs = std::mem::take(&mut self.prevs);
            self.join(&[(line.clone(), 1)], &prevs);
            self.prevs = vec![(line, 0)];
            return Ok(());
        }

        let node = self.sch.add_node(self.posx + 50, 0);

        // Shunt branch: line segment standing in for the inductor, then
        // the capacitor (lumped or open stub)
        let l_shunt = self.kl * self.proto.c_series[j];
        let c_shunt = self.kc * self.proto.l_series[j];
        let chain_top = if l_shunt != 0.0 {
            let length = self.stub_length(w_c * l_shunt / max_z)?;
            let line = emitter.series_segment(&mut self.sch, max_z, length, 0, self.posx, 30);
            self.sch.wire(&node.id, 0, &line, 1);
            Some(line)
        } else {
            None
        };

        if self.spec.semi_lumped_style == SemiLumpedStyle::InductorsOnly {
            let cap = self.sch.add_capacitor(c_shunt, 0, self.posx, 100);
            let gnd = self.sch.add_ground(self.posx, 140);
            self.sch.wire(&gnd, 0, &cap, 0);
            match &chain_top {
                Some(line) => self.sch.wire(line, 0, &cap, 1),
                None => self.sch.wire(&node.id, 0, &cap, 1),
            }
        } else {
            let length = self.stub_length(w_c * self.spec.min_z * c_shunt)?;
            let stub = emitter.open_stub(&mut self.sch, self.spec.min_z, length, self.posx, 75);
            match &chain_top {
                Some(line) => self.sch.wire(line, 0, &stub, 1),
                None => self.sch.wire(&node.id, 0, &stub, 1),
            }
        }

        // Series segment on the group side
        let mut far = Vec::new();
        let l_series = self.kl * self.proto.c_shunt[j];
        if l_series != 0.0 {
            let length = self.stub_length(w_c * l_series / max_z)?;
            let line = emitter.series_segment(&mut self.sch, max_z, length, 90, self.posx - 50, 0);
            self.sch.wire(&node.id, 0, &line, 1);
            far.push((line, 0));
        }
        self.finish_section((node.id, 0), far, flip);
        Ok(())
    }

    /// Highpass min-L structure with the shunt inductors as segments.
    fn semilumped_highpass_section(&mut self, j: usize, flip: bool, central: bool) -> RfResult<()> {
        let emitter = self.emitter();
        let w_c = angular_frequency(self.spec.fc);
        let max_z = self.spec.max_z;

        if central {
            let cap =
                self.sch
                    .add_capacitor(self.kc / self.proto.c_shunt[j], 90, self.posx + 50, 0);
            let prevs = std::mem::take(&mut self.prevs);
            self.join(&[(cap.clone(), 1)], &prevs);
            self.prevs = vec![(cap, 0)];
            return Ok(());
        }

        let node = self.sch.add_node(self.posx + 50, 0);

        // Shunt branch: inductor segment, then capacitor to ground or a
        // direct short
        let l_shunt = self.kl / self.proto.l_series[j];
        let length = self.stub_length(w_c * l_shunt / max_z)?;
        let c_series_lp = self.proto.c_series[j];
        if c_series_lp != 0.0 {
            let line = emitter.series_segment(&mut self.sch, max_z, length, 0, self.posx, 30);
            self.sch.wire(&node.id, 0, &line, 1);
            let cap = self.sch.add_capacitor(self.kc / c_series_lp, 0, self.posx, 100);
            let gnd = self.sch.add_ground(self.posx, 150);
            self.sch.wire(&line, 0, &cap, 1);
            self.sch.wire(&gnd, 0, &cap, 0);
        } else {
            let stub = emitter.short_stub(&mut self.sch, max_z, length, self.posx, 30);
            self.sch.wire(&node.id, 0, &stub, 1);
        }

        // Series capacitor on the group side
        let mut far = Vec::new();
        let c_shunt_lp = self.proto.c_shunt[j];
        if c_shunt_lp != 0.0 {
            let cap = self.sch.add_capacitor(self.kc / c_shunt_lp, 90, self.posx - 50, 0);
            self.sch.wire(&node.id, 0, &cap, 1);
            far.push((cap, 0));
        }
        self.finish_section((node.id, 0), far, flip);
        Ok(())
    }
}
