//! Realization-aware emission of distributed elements.
//!
//! Synthesizers describe lines and stubs by (impedance, electrical
//! length); the emitter turns each into either an ideal element
//! (TransmissionLine/OpenStub/ShortStub) or a synthesized-width
//! MicrostripLine terminated by MicrostripOpen (open stubs) or
//! MicrostripVia (short stubs). A non-convergent width synthesis
//! propagates its negative sentinel into the emitted geometry.

use crate::schematic::Schematic;
use rf_core::MicrostripSubstrate;
use rf_core::units::LengthUnit;
use rf_microstrip::synthesize_microstrip;
use serde::{Deserialize, Serialize};

/// Transmission-line realization of distributed elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TlRealization {
    #[default]
    Ideal,
    Microstrip,
}

/// Context threaded through every distributed-element emission.
#[derive(Clone, Copy)]
pub struct LineEmitter<'a> {
    pub realization: TlRealization,
    pub subs: &'a MicrostripSubstrate,
    pub unit: LengthUnit,
    pub freq: f64,
}

impl<'a> LineEmitter<'a> {
    pub fn new(
        realization: TlRealization,
        subs: &'a MicrostripSubstrate,
        unit: LengthUnit,
        freq: f64,
    ) -> Self {
        Self {
            realization,
            subs,
            unit,
            freq,
        }
    }

    /// Series line segment of impedance `z0` and electrical length
    /// `length`. Returns the id of the emitted two-pin element.
    pub fn series_segment(
        &self,
        sch: &mut Schematic,
        z0: f64,
        length: f64,
        rotation: i32,
        x: i32,
        y: i32,
    ) -> String {
        match self.realization {
            TlRealization::Ideal => sch.add_tline(z0, length, self.unit, rotation, x, y),
            TlRealization::Microstrip => {
                let ms = synthesize_microstrip(z0, length, self.freq, self.subs);
                sch.add_microstrip_line(ms.width, ms.length, self.subs, rotation, x, y)
            }
        }
    }

    /// Open-circuited stub hanging below a node. The returned id exposes
    /// pin 1 as the connection pin; the open end is wired internally for
    /// the microstrip realization.
    pub fn open_stub(&self, sch: &mut Schematic, z0: f64, length: f64, x: i32, y: i32) -> String {
        match self.realization {
            TlRealization::Ideal => sch.add_open_stub(z0, length, self.unit, 0, x, y),
            TlRealization::Microstrip => {
                let ms = synthesize_microstrip(z0, length, self.freq, self.subs);
                let line = sch.add_microstrip_line(ms.width, ms.length, self.subs, 0, x, y);
                let open = sch.add_microstrip_open(ms.width, self.subs, x, y + 50);
                sch.wire(&line, 0, &open, 0);
                line
            }
        }
    }

    /// Short-circuited stub hanging below a node; pin 1 is the connection
    /// pin, the grounded end is wired internally for microstrip.
    pub fn short_stub(&self, sch: &mut Schematic, z0: f64, length: f64, x: i32, y: i32) -> String {
        match self.realization {
            TlRealization::Ideal => sch.add_short_stub(z0, length, self.unit, 0, x, y),
            TlRealization::Microstrip => {
                let ms = synthesize_microstrip(z0, length, self.freq, self.subs);
                let line = sch.add_microstrip_line(ms.width, ms.length, self.subs, 0, x, y);
                let via = sch.add_microstrip_via(self.subs, x, y + 50);
                sch.wire(&line, 0, &via, 0);
                line
            }
        }
    }

    /// Width of the microstrip realizing `z0`, for step discontinuities.
    /// Only meaningful for the microstrip realization.
    pub fn width_for(&self, z0: f64) -> f64 {
        synthesize_microstrip(z0, 1e-3, self.freq, self.subs).width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;

    #[test]
    fn ideal_stub_is_a_single_component() {
        let subs = MicrostripSubstrate::fr4();
        let emitter = LineEmitter::new(TlRealization::Ideal, &subs, LengthUnit::Mm, 1e9);
        let mut sch = Schematic::new();
        emitter.short_stub(&mut sch, 35.0, 25e-3, 0, 50);
        assert_eq!(sch.count_of(ComponentKind::ShortStub), 1);
        assert!(sch.wires.is_empty());
    }

    #[test]
    fn microstrip_short_stub_is_line_plus_via() {
        let subs = MicrostripSubstrate::fr4();
        let emitter = LineEmitter::new(TlRealization::Microstrip, &subs, LengthUnit::Mm, 1e9);
        let mut sch = Schematic::new();
        emitter.short_stub(&mut sch, 35.0, 25e-3, 0, 50);
        assert_eq!(sch.count_of(ComponentKind::MicrostripLine), 1);
        assert_eq!(sch.count_of(ComponentKind::MicrostripVia), 1);
        assert_eq!(sch.wires.len(), 1);
    }

    #[test]
    fn microstrip_open_stub_is_line_plus_open() {
        let subs = MicrostripSubstrate::fr4();
        let emitter = LineEmitter::new(TlRealization::Microstrip, &subs, LengthUnit::Mm, 1e9);
        let mut sch = Schematic::new();
        emitter.open_stub(&mut sch, 25.0, 10e-3, 0, 50);
        assert_eq!(sch.count_of(ComponentKind::MicrostripOpen), 1);
        sch.validate().unwrap();
    }
}
