//! Two-port matching composition.
//!
//! The input network is synthesized against the device input target and
//! the output network against the output target; the output network is
//! then mirrored horizontally about the plane of its load, its element
//! identifiers are renumbered past the input network's counters, both
//! load terminations and their grounds are removed, and an S-parameter
//! block representing the device is spliced in at the shared boundary.

use crate::spec::MatchingSpec;
use crate::synthesize_one_port;
use rf_core::units::{Quantity, format_value};
use rf_core::{RfError, RfResult};
use rf_schematic::{Component, ComponentKind, Schematic};
use std::collections::BTreeMap;

pub fn synthesize(spec: &MatchingSpec) -> RfResult<Schematic> {
    let device = spec
        .two_port
        .as_ref()
        .ok_or_else(|| RfError::configuration("two-port synthesis needs a device description"))?;

    let mut imn = synthesize_one_port(&spec.input, spec.frequency)?;
    let mut omn = synthesize_one_port(&device.output, spec.frequency)?;

    let load_x = |sch: &Schematic| -> RfResult<i32> {
        sch.components
            .iter()
            .find(|c| c.id == "Z1")
            .map(|c| c.position.0)
            .ok_or_else(|| RfError::configuration("matching network has no load termination"))
    };
    let imn_load_x = load_x(&imn)?;
    let omn_load_x = load_x(&omn)?;

    // Mirror the output network about its load plane and renumber its
    // elements past the input network's counters.
    let mut replace_id: BTreeMap<String, String> = BTreeMap::new();
    let mut mirrored_series: Vec<String> = Vec::new();

    for comp in &mut omn.components {
        if comp.id == "Z1" {
            comp.id = "Z2".into();
            comp.rotation = 180;
            continue;
        }

        comp.position.0 = imn_load_x + (omn_load_x - comp.position.0);

        if comp.id == "T1" {
            comp.rotation = 180;
            replace_id.insert("T1".into(), "T2".into());
            comp.id = "T2".into();
            continue;
        }

        // Series elements flip their pin orientation under the mirror
        if comp.rotation == 90 || comp.rotation == -90 {
            mirrored_series.push(comp.id.clone());
        }

        let counter = imn.counters.entry(comp.kind).or_insert(0);
        *counter += 1;
        let new_id = if comp.id.starts_with("GND_ZL") {
            format!("GND_ZL{counter}")
        } else {
            format!("{}{}", comp.kind.prefix(), counter)
        };
        replace_id.insert(comp.id.clone(), new_id.clone());
        comp.id = new_id;
    }

    for node in &mut omn.nodes {
        node.position.0 = imn_load_x + (omn_load_x - node.position.0);
        let renamed = format!("{}out", node.id);
        replace_id.insert(node.id.clone(), renamed.clone());
        node.id = renamed;
    }

    let mirrored_new: Vec<&String> = mirrored_series
        .iter()
        .filter_map(|id| replace_id.get(id))
        .collect();
    for wire in &mut omn.wires {
        for end in [&mut wire.from, &mut wire.to] {
            if end.element == "Z1" {
                end.element = "Z2".into();
            } else if let Some(renamed) = replace_id.get(&end.element) {
                end.element = renamed.clone();
            }
            if mirrored_new.iter().any(|id| **id == end.element) {
                end.pin = 1 - end.pin;
            }
        }
    }

    // Compose: input network, then the mirrored output network
    let mut sch = imn;
    sch.components.append(&mut omn.components);
    sch.nodes.append(&mut omn.nodes);
    for wire in omn.wires {
        sch.wire(&wire.from.element, wire.from.pin, &wire.to.element, wire.to.pin);
    }

    // Drop both loads and their grounds; the device replaces them
    sch.components
        .retain(|c| c.id != "Z1" && c.id != "Z2" && !c.id.starts_with("GND_ZL"));

    // Device S-parameter block at the shared boundary
    let spar_id = sch.next_id(ComponentKind::SParameterBlock);
    let mut spar = Component::new(spar_id.clone(), ComponentKind::SParameterBlock, 0, imn_load_x, 0);
    for (name, value) in [
        ("S11", device.s_params[0]),
        ("S12", device.s_params[1]),
        ("S21", device.s_params[2]),
        ("S22", device.s_params[3]),
    ] {
        spar = spar
            .with(
                &format!("{name}r"),
                format_value(value.re, Quantity::Dimensionless),
            )
            .with(
                &format!("{name}i"),
                format_value(value.im, Quantity::Dimensionless),
            );
    }
    sch.push(spar);

    // Splice the load connections onto the device and discard the ground
    // wires that went with the removed terminations
    sch.wires.retain(|w| {
        !w.from.element.starts_with("GND_ZL") && !w.to.element.starts_with("GND_ZL")
    });
    for wire in &mut sch.wires {
        for end in [&mut wire.from, &mut wire.to] {
            if end.element == "Z1" {
                end.element = spar_id.clone();
                end.pin = 0;
            } else if end.element == "Z2" {
                end.element = spar_id.clone();
                end.pin = 1;
            }
        }
    }

    // Removals above invalidate the running counters; recount
    sch.rebuild_counters();

    Ok(sch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{MatchingNetworkSpec, MatchingTopology, TwoPortDevice};
    use num_complex::Complex64;
    use rf_schematic::ComponentKind;

    fn two_port_spec(input_topo: MatchingTopology, output_topo: MatchingTopology) -> MatchingSpec {
        // Conjugate-match targets for a generic device
        let input = MatchingNetworkSpec {
            topology: input_topo,
            zl: Complex64::new(25.0, 40.0),
            ..MatchingNetworkSpec::default()
        };
        let output = MatchingNetworkSpec {
            topology: output_topo,
            zl: Complex64::new(80.0, -30.0),
            ..MatchingNetworkSpec::default()
        };
        MatchingSpec {
            frequency: 2e9,
            input,
            two_port: Some(TwoPortDevice {
                output,
                s_params: [
                    Complex64::new(0.4, -0.3),
                    Complex64::new(0.05, 0.02),
                    Complex64::new(3.2, 1.1),
                    Complex64::new(0.5, -0.2),
                ],
            }),
        }
    }

    #[test]
    fn composition_splices_device_between_networks() {
        let spec = two_port_spec(MatchingTopology::LSection, MatchingTopology::LSection);
        let sch = synthesize(&spec).unwrap();
        sch.validate().unwrap();

        // Loads and their grounds are gone, replaced by one device block
        assert_eq!(sch.count_of(ComponentKind::ComplexImpedance), 0);
        assert_eq!(sch.count_of(ComponentKind::SParameterBlock), 1);
        assert!(!sch.components.iter().any(|c| c.id.starts_with("GND_ZL")));

        // One input port and one mirrored output port
        assert_eq!(sch.ports_at_rotation(0), 1);
        assert_eq!(sch.ports_at_rotation(180), 1);
    }

    #[test]
    fn device_block_carries_all_eight_s_parameters() {
        let spec = two_port_spec(MatchingTopology::LSection, MatchingTopology::SingleStub);
        let sch = synthesize(&spec).unwrap();
        let spar = sch
            .components
            .iter()
            .find(|c| c.kind == ComponentKind::SParameterBlock)
            .unwrap();
        for key in ["S11r", "S11i", "S12r", "S12i", "S21r", "S21i", "S22r", "S22i"] {
            assert!(spar.param(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn renumbered_elements_stay_unique() {
        let spec = two_port_spec(MatchingTopology::SingleStub, MatchingTopology::SingleStub);
        let sch = synthesize(&spec).unwrap();
        sch.validate().unwrap();
        let mut ids: Vec<&str> = sch.components.iter().map(|c| c.id.as_str()).collect();
        ids.extend(sch.nodes.iter().map(|n| n.id.as_str()));
        let mut deduped = ids.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
    }

    #[test]
    fn both_device_pins_are_wired() {
        let spec = two_port_spec(MatchingTopology::LSection, MatchingTopology::LSection);
        let sch = synthesize(&spec).unwrap();
        let spar = sch
            .components
            .iter()
            .find(|c| c.kind == ComponentKind::SParameterBlock)
            .unwrap();
        for pin in [0u8, 1] {
            assert!(
                sch.wires.iter().any(|w| {
                    (w.from.element == spar.id && w.from.pin == pin)
                        || (w.to.element == spar.id && w.to.pin == pin)
                }),
                "device pin {pin} left floating"
            );
        }
    }

    #[test]
    fn missing_device_is_a_configuration_error() {
        let mut spec = two_port_spec(MatchingTopology::LSection, MatchingTopology::LSection);
        spec.two_port = None;
        assert!(synthesize(&spec).is_err());
    }
}
