//! Append-only schematic graph with auto-named elements.
//!
//! Identifiers are generated from per-kind running counters (`C1`, `C2`,
//! `TLIN1`, …). Wires are deduplicated on their unordered endpoint pair:
//! appending an already-present connection is a no-op, so the stored wire
//! set is canonical for export and for tests.

use crate::component::{Component, ComponentKind};
use num_complex::Complex64;
use rf_core::units::{
    LengthUnit, Quantity, format_complex_impedance, format_length, format_value,
};
use rf_core::{MicrostripSubstrate, RfError, RfResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A connection node on the main drawing grid.
///
/// Hidden nodes (`visible == false`) are routing aids that keep the wire
/// topology unambiguous for export; they are preserved, never optimized away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub position: (i32, i32),
    pub visible: bool,
}

/// One end of a wire: an element identifier plus a pin number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Endpoint {
    pub element: String,
    pub pin: u8,
}

/// A two-ended wire between components and/or nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub id: String,
    pub from: Endpoint,
    pub to: Endpoint,
}

/// The complete output of one synthesis call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schematic {
    pub components: Vec<Component>,
    pub nodes: Vec<Node>,
    pub wires: Vec<Wire>,
    /// Per-kind running counters used to generate unique identifiers
    pub counters: BTreeMap<ComponentKind, u32>,
    wire_counter: u32,
}

impl Schematic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next identifier for a kind, bumping its counter.
    pub fn next_id(&mut self, kind: ComponentKind) -> String {
        let counter = self.counters.entry(kind).or_insert(0);
        *counter += 1;
        format!("{}{}", kind.prefix(), counter)
    }

    /// Append a fully-formed component, returning its identifier.
    pub fn push(&mut self, component: Component) -> String {
        let id = component.id.clone();
        self.components.push(component);
        id
    }

    /// Append a visible connection node at a grid position.
    pub fn add_node(&mut self, x: i32, y: i32) -> Node {
        self.place_node(x, y, true)
    }

    /// Append a hidden routing node at a grid position.
    pub fn add_hidden_node(&mut self, x: i32, y: i32) -> Node {
        self.place_node(x, y, false)
    }

    fn place_node(&mut self, x: i32, y: i32, visible: bool) -> Node {
        let id = self.next_id(ComponentKind::ConnectionNode);
        let node = Node {
            id,
            position: (x, y),
            visible,
        };
        self.nodes.push(node.clone());
        node
    }

    /// Append a wire between two (element, pin) endpoints.
    ///
    /// A wire whose unordered endpoint pair is already present is dropped;
    /// wire identifiers are assigned only to stored wires.
    pub fn wire(&mut self, a: &str, pin_a: u8, b: &str, pin_b: u8) {
        let from = Endpoint {
            element: a.to_string(),
            pin: pin_a,
        };
        let to = Endpoint {
            element: b.to_string(),
            pin: pin_b,
        };
        let duplicate = self.wires.iter().any(|w| {
            (w.from == from && w.to == to) || (w.from == to && w.to == from)
        });
        if duplicate {
            return;
        }
        self.wire_counter += 1;
        self.wires.push(Wire {
            id: format!("W{}", self.wire_counter),
            from,
            to,
        });
    }

    // ========================================================================
    // Component emitters
    // ========================================================================

    /// Port termination. Input ports sit at rotation 0, output ports at 180.
    pub fn add_port(&mut self, z: f64, rotation: i32, x: i32, y: i32) -> String {
        let id = self.next_id(ComponentKind::Port);
        self.push(
            Component::new(id, ComponentKind::Port, rotation, x, y)
                .with("Z", format_value(z, Quantity::Resistance)),
        )
    }

    pub fn add_ground(&mut self, x: i32, y: i32) -> String {
        let id = self.next_id(ComponentKind::Ground);
        self.push(Component::new(id, ComponentKind::Ground, 0, x, y))
    }

    /// Ground attached to a load termination. Tagged with a `GND_ZL` prefix
    /// so the two-port composition can strip it together with the load.
    pub fn add_load_ground(&mut self, x: i32, y: i32) -> String {
        let counter = self.counters.entry(ComponentKind::Ground).or_insert(0);
        *counter += 1;
        let id = format!("GND_ZL{counter}");
        self.push(Component::new(id, ComponentKind::Ground, 0, x, y))
    }

    pub fn add_resistor(&mut self, r: f64, rotation: i32, x: i32, y: i32) -> String {
        let id = self.next_id(ComponentKind::Resistor);
        self.push(
            Component::new(id, ComponentKind::Resistor, rotation, x, y)
                .with("R", format_value(r, Quantity::Resistance)),
        )
    }

    pub fn add_inductor(&mut self, l: f64, rotation: i32, x: i32, y: i32) -> String {
        let id = self.next_id(ComponentKind::Inductor);
        self.push(
            Component::new(id, ComponentKind::Inductor, rotation, x, y)
                .with("L", format_value(l, Quantity::Inductance)),
        )
    }

    pub fn add_capacitor(&mut self, c: f64, rotation: i32, x: i32, y: i32) -> String {
        let id = self.next_id(ComponentKind::Capacitor);
        self.push(
            Component::new(id, ComponentKind::Capacitor, rotation, x, y)
                .with("C", format_value(c, Quantity::Capacitance)),
        )
    }

    /// Ideal transmission line of characteristic impedance `z0` and physical
    /// length `length` (meters, rendered in `unit`).
    pub fn add_tline(
        &mut self,
        z0: f64,
        length: f64,
        unit: LengthUnit,
        rotation: i32,
        x: i32,
        y: i32,
    ) -> String {
        let id = self.next_id(ComponentKind::TransmissionLine);
        self.push(
            Component::new(id, ComponentKind::TransmissionLine, rotation, x, y)
                .with("Z0", format_value(z0, Quantity::Resistance))
                .with("Length", format_length(length, unit)),
        )
    }

    pub fn add_open_stub(
        &mut self,
        z0: f64,
        length: f64,
        unit: LengthUnit,
        rotation: i32,
        x: i32,
        y: i32,
    ) -> String {
        let id = self.next_id(ComponentKind::OpenStub);
        self.push(
            Component::new(id, ComponentKind::OpenStub, rotation, x, y)
                .with("Z0", format_value(z0, Quantity::Resistance))
                .with("Length", format_length(length, unit)),
        )
    }

    pub fn add_short_stub(
        &mut self,
        z0: f64,
        length: f64,
        unit: LengthUnit,
        rotation: i32,
        x: i32,
        y: i32,
    ) -> String {
        let id = self.next_id(ComponentKind::ShortStub);
        self.push(
            Component::new(id, ComponentKind::ShortStub, rotation, x, y)
                .with("Z0", format_value(z0, Quantity::Resistance))
                .with("Length", format_length(length, unit)),
        )
    }

    /// Complex load termination held at a fixed impedance over frequency.
    pub fn add_complex_load(&mut self, z: Complex64, rotation: i32, x: i32, y: i32) -> String {
        let id = self.next_id(ComponentKind::ComplexImpedance);
        self.push(
            Component::new(id, ComponentKind::ComplexImpedance, rotation, x, y)
                .with("Z", format_complex_impedance(z)),
        )
    }

    fn with_substrate(component: Component, subs: &MicrostripSubstrate) -> Component {
        component
            .with("er", format_value(subs.er, Quantity::Dimensionless))
            .with("h", format_value(subs.height, Quantity::Dimensionless))
            .with(
                "cond",
                format_value(subs.metal_conductivity, Quantity::Dimensionless),
            )
            .with(
                "th",
                format_value(subs.metal_thickness, Quantity::Dimensionless),
            )
            .with("tand", format_value(subs.tand, Quantity::Dimensionless))
    }

    /// Microstrip line with synthesized geometry. Width and length in meters.
    ///
    /// A negative width is the non-convergence sentinel of the microstrip
    /// solver; it is rendered as-is so downstream harnesses can assert on it.
    pub fn add_microstrip_line(
        &mut self,
        width: f64,
        length: f64,
        subs: &MicrostripSubstrate,
        rotation: i32,
        x: i32,
        y: i32,
    ) -> String {
        let id = self.next_id(ComponentKind::MicrostripLine);
        let line = Component::new(id, ComponentKind::MicrostripLine, rotation, x, y)
            .with("Width", format_length(width, LengthUnit::Mm))
            .with("Length", format_length(length, LengthUnit::Mm));
        self.push(Self::with_substrate(line, subs))
    }

    /// Microstrip open-end termination matching a line of the given width.
    pub fn add_microstrip_open(
        &mut self,
        width: f64,
        subs: &MicrostripSubstrate,
        x: i32,
        y: i32,
    ) -> String {
        let id = self.next_id(ComponentKind::MicrostripOpen);
        let open = Component::new(id, ComponentKind::MicrostripOpen, 0, x, y)
            .with("Width", format_length(width, LengthUnit::Mm));
        self.push(Self::with_substrate(open, subs))
    }

    /// Microstrip via to ground: four parallel 0.5 mm drills.
    pub fn add_microstrip_via(&mut self, subs: &MicrostripSubstrate, x: i32, y: i32) -> String {
        let id = self.next_id(ComponentKind::MicrostripVia);
        let via = Component::new(id, ComponentKind::MicrostripVia, 0, x, y)
            .with("D", format_length(0.5e-3, LengthUnit::Mm))
            .with("N", "4");
        self.push(Self::with_substrate(via, subs))
    }

    /// Width-step discontinuity between two adjacent microstrip lines.
    /// The widths are the already-rendered strings of the neighbor lines.
    pub fn add_microstrip_step(
        &mut self,
        w1: &str,
        w2: &str,
        subs: &MicrostripSubstrate,
        x: i32,
        y: i32,
    ) -> String {
        let id = self.next_id(ComponentKind::MicrostripStep);
        let step = Component::new(id, ComponentKind::MicrostripStep, 0, x, y)
            .with("W1", w1)
            .with("W2", w2);
        self.push(Self::with_substrate(step, subs))
    }

    /// Recompute the per-kind counters from the stored elements. Needed
    /// after compositions that remove or renumber components; identifiers
    /// allocated afterwards may reuse freed numbers.
    pub fn rebuild_counters(&mut self) {
        self.counters.clear();
        for c in &self.components {
            *self.counters.entry(c.kind).or_insert(0) += 1;
        }
        if !self.nodes.is_empty() {
            self.counters
                .insert(ComponentKind::ConnectionNode, self.nodes.len() as u32);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Number of emitted components of a kind.
    pub fn count_of(&self, kind: ComponentKind) -> usize {
        self.components.iter().filter(|c| c.kind == kind).count()
    }

    /// Number of Port components at a given rotation.
    pub fn ports_at_rotation(&self, rotation: i32) -> usize {
        self.components
            .iter()
            .filter(|c| c.kind == ComponentKind::Port && c.rotation == rotation)
            .count()
    }

    /// Structural validation of the finished schematic:
    /// every wire endpoint must reference an existing element and a pin
    /// within its arity, all identifiers must be unique, and each kind
    /// counter must match the number of emitted elements of that kind.
    pub fn validate(&self) -> RfResult<()> {
        let mut seen = BTreeSet::new();
        for c in &self.components {
            if !seen.insert(c.id.as_str()) {
                return Err(RfError::configuration(format!(
                    "duplicate component identifier {}",
                    c.id
                )));
            }
        }
        for n in &self.nodes {
            if !seen.insert(n.id.as_str()) {
                return Err(RfError::configuration(format!(
                    "duplicate node identifier {}",
                    n.id
                )));
            }
        }

        for w in &self.wires {
            for end in [&w.from, &w.to] {
                if let Some(c) = self.component(&end.element) {
                    if end.pin >= c.kind.pin_count() {
                        return Err(RfError::configuration(format!(
                            "wire {} references pin {} of {}, which has {} pins",
                            w.id,
                            end.pin,
                            c.id,
                            c.kind.pin_count()
                        )));
                    }
                } else if let Some(_node) = self.node(&end.element) {
                    if end.pin != 0 {
                        return Err(RfError::configuration(format!(
                            "wire {} references pin {} of node {}; nodes expose pin 0 only",
                            w.id, end.pin, end.element
                        )));
                    }
                } else {
                    return Err(RfError::configuration(format!(
                        "wire {} references unknown element {}",
                        w.id, end.element
                    )));
                }
            }
        }

        for (kind, counter) in &self.counters {
            let emitted = if *kind == ComponentKind::ConnectionNode {
                self.nodes.len()
            } else {
                self.count_of(*kind)
            };
            if emitted != *counter as usize {
                return Err(RfError::configuration(format!(
                    "counter for {kind:?} is {counter} but {emitted} elements were emitted"
                )));
            }
        }

        Ok(())
    }
}
