//! Schematic building blocks shared by every synthesizer.
//!
//! A synthesizer produces a [`Schematic`]: an ordered list of components,
//! connection nodes, and wires, each with an auto-generated identifier.
//! The schematic is append-only while being built and immutable from the
//! caller's perspective once returned.

pub mod component;
pub mod emit;
pub mod schematic;

pub use component::{Component, ComponentKind};
pub use emit::{LineEmitter, TlRealization};
pub use schematic::{Endpoint, Node, Schematic, Wire};
