//! Typed component catalog.
//!
//! Each kind has a fixed identifier prefix and pin arity. Two-terminal
//! components expose pins 0 and 1; stubs expose pin 1 as the connection
//! pin and pin 0 as the open/short end; grounds, vias, and opens expose a
//! single pin 0.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closed set of component kinds a schematic can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Resistor,
    Inductor,
    Capacitor,
    Ground,
    Port,
    ConnectionNode,
    TransmissionLine,
    OpenStub,
    ShortStub,
    MicrostripLine,
    MicrostripOpen,
    MicrostripVia,
    MicrostripStep,
    ComplexImpedance,
    SParameterBlock,
}

impl ComponentKind {
    /// Identifier prefix, e.g. `R` for resistors → `R3`.
    pub fn prefix(self) -> &'static str {
        match self {
            ComponentKind::Resistor => "R",
            ComponentKind::Inductor => "L",
            ComponentKind::Capacitor => "C",
            ComponentKind::Ground => "GND",
            ComponentKind::Port => "T",
            ComponentKind::ConnectionNode => "N",
            ComponentKind::TransmissionLine => "TLIN",
            ComponentKind::OpenStub => "OSTUB",
            ComponentKind::ShortStub => "SSTUB",
            ComponentKind::MicrostripLine => "MLIN",
            ComponentKind::MicrostripOpen => "MOPEN",
            ComponentKind::MicrostripVia => "MSVIA",
            ComponentKind::MicrostripStep => "MSTEP",
            ComponentKind::ComplexImpedance => "Z",
            ComponentKind::SParameterBlock => "SPAR",
        }
    }

    /// Number of electrical pins the kind exposes.
    pub fn pin_count(self) -> u8 {
        match self {
            ComponentKind::Ground
            | ComponentKind::MicrostripOpen
            | ComponentKind::MicrostripVia
            | ComponentKind::Port => 1,
            ComponentKind::ConnectionNode => 1,
            _ => 2,
        }
    }
}

/// A placed, parameterized component instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Unique identifier, kind prefix plus running counter (`C3`, `TLIN5`)
    pub id: String,
    pub kind: ComponentKind,
    /// Rotation in degrees, multiples of 90
    pub rotation: i32,
    /// Pixel-grid position; part of the output contract
    pub position: (i32, i32),
    /// Parameter name → rendered value with engineering unit
    pub params: BTreeMap<String, String>,
}

impl Component {
    pub fn new(id: String, kind: ComponentKind, rotation: i32, x: i32, y: i32) -> Self {
        Self {
            id,
            kind,
            rotation,
            position: (x, y),
            params: BTreeMap::new(),
        }
    }

    /// Set a parameter, returning `self` for chained construction.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Fetch a parameter string, if present.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}
