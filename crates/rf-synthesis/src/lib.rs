//! Passive RF network synthesis from high-level specifications.
//!
//! The entry point is [`synthesize`]: it consumes a [`NetworkSpec`] —
//! a filter, matching, or combiner specification — validates the
//! requested (class, topology, realization) combination, and returns the
//! finished [`Schematic`]: components with engineering-notation
//! parameter strings, grid positions, connection nodes, and wires.
//!
//! Synthesis is purely functional per call; independent calls can run on
//! different threads without coordination.
//!
//! ```
//! use rf_synthesis::{FilterSpec, NetworkSpec, synthesize};
//!
//! let schematic = synthesize(&NetworkSpec::Filter(FilterSpec::default())).unwrap();
//! assert!(schematic.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

pub use rf_combiners::{CombinerRealization, CombinerSpec, CombinerTopology};
pub use rf_core::units::{LengthUnit, Quantity, format_length, format_value, parse_value};
pub use rf_core::{Complex64, MicrostripSubstrate, RfError, RfResult};
pub use rf_filters::{
    EllipticType, FilterClass, FilterResponse, FilterSpec, FilterTopology, SemiLumpedStyle,
};
pub use rf_matching::{
    MatchingNetworkSpec, MatchingSpec, MatchingTopology, TaperWeighting, TwoPortDevice,
};
pub use rf_schematic::{Component, ComponentKind, Node, Schematic, TlRealization, Wire};

/// Closed union over the three specification families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NetworkSpec {
    Filter(FilterSpec),
    Matching(MatchingSpec),
    Combiner(CombinerSpec),
}

/// Synthesize a schematic from any supported specification.
///
/// # Errors
/// [`RfError::Configuration`] for unsupported combinations (e.g. a
/// stepped-impedance bandpass, an even Bagley, an out-of-table order),
/// [`RfError::UnmatchableLoad`] for loads the requested matching
/// topology cannot transform, [`RfError::NumericOverflow`] for divisor
/// collapse in a filter transformation.
pub fn synthesize(spec: &NetworkSpec) -> RfResult<Schematic> {
    match spec {
        NetworkSpec::Filter(filter) => rf_filters::synthesize_filter(filter),
        NetworkSpec::Matching(matching) => rf_matching::synthesize_matching(matching),
        NetworkSpec::Combiner(combiner) => rf_combiners::synthesize_combiner(combiner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn filter_dispatch_produces_two_port() {
        let sch = synthesize(&NetworkSpec::Filter(FilterSpec::default())).unwrap();
        sch.validate().unwrap();
        assert_eq!(sch.ports_at_rotation(0), 1);
        assert_eq!(sch.ports_at_rotation(180), 1);
    }

    #[test]
    fn matching_dispatch_produces_one_port_with_load() {
        let spec = MatchingSpec::one_port(1e9, MatchingNetworkSpec::default());
        let sch = synthesize(&NetworkSpec::Matching(spec)).unwrap();
        sch.validate().unwrap();
        assert_eq!(sch.count_of(ComponentKind::ComplexImpedance), 1);
    }

    #[test]
    fn combiner_dispatch_produces_three_ports() {
        let sch = synthesize(&NetworkSpec::Combiner(CombinerSpec::default())).unwrap();
        sch.validate().unwrap();
        assert_eq!(sch.count_of(ComponentKind::Port), 3);
    }

    #[test]
    fn configuration_errors_surface_without_partial_schematics() {
        let bad = FilterSpec {
            topology: FilterTopology::SteppedImpedance,
            class: FilterClass::Bandpass,
            ..FilterSpec::default()
        };
        match synthesize(&NetworkSpec::Filter(bad)) {
            Err(RfError::Configuration { .. }) => {}
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[test]
    fn spec_union_serde_round_trip() {
        let spec = NetworkSpec::Combiner(CombinerSpec::default());
        let json = serde_json::to_string(&spec).unwrap();
        let back: NetworkSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }

    #[test]
    fn independent_calls_share_no_state() {
        // Running the same synthesis twice yields identical schematics
        let spec = NetworkSpec::Filter(FilterSpec::default());
        let a = synthesize(&spec).unwrap();
        let b = synthesize(&spec).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn microstrip_filter_width_recovers_impedance() {
        // End-to-end: synthesize a microstrip quarter-wave filter and
        // re-analyze an emitted line width.
        let spec = FilterSpec {
            topology: FilterTopology::QuarterWave,
            class: FilterClass::Bandpass,
            response: FilterResponse::Butterworth,
            fc: 3e9,
            bw: 300e6,
            realization: TlRealization::Microstrip,
            ..FilterSpec::default()
        };
        let sch = synthesize(&NetworkSpec::Filter(spec)).unwrap();
        let line = sch
            .components
            .iter()
            .find(|c| c.kind == ComponentKind::MicrostripLine)
            .unwrap();
        let width = parse_value(line.param("Width").unwrap()).unwrap();
        let (_, z0) = rf_microstrip::analyze_microstrip(width, 3e9, &MicrostripSubstrate::fr4());
        assert_relative_eq!(z0, 50.0, max_relative = 1e-3);
    }
}
