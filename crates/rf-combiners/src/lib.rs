//! Power combiner/divider synthesis.
//!
//! Each topology is a parameterized schematic generator: it computes its
//! line impedances and isolator values, lays the components out on a
//! topology-local grid, and wires a 1-input, N-output network. The
//! Wilkinson family additionally supports a lumped LC realization.

pub mod bagley;
pub mod branchline;
pub mod double_box;
pub mod gysel;
pub mod lim_eom;
pub mod multistage;
pub mod recombinant;
pub mod spec;
pub mod tjunction;
pub mod wilkinson;
pub mod wilkinson3way;

pub use spec::{CombinerRealization, CombinerSpec, CombinerTopology};

use rf_core::RfResult;
use rf_schematic::Schematic;

/// Synthesize a combiner/divider schematic from a specification.
pub fn synthesize_combiner(spec: &CombinerSpec) -> RfResult<Schematic> {
    spec.validate()?;
    match spec.topology {
        CombinerTopology::Wilkinson => wilkinson::synthesize(spec),
        CombinerTopology::MultistageWilkinson => multistage::synthesize(spec),
        CombinerTopology::TJunction => tjunction::synthesize(spec),
        CombinerTopology::Branchline => branchline::synthesize(spec),
        CombinerTopology::DoubleBoxBranchline => double_box::synthesize(spec),
        CombinerTopology::Bagley => bagley::synthesize(spec),
        CombinerTopology::Gysel => gysel::synthesize(spec),
        CombinerTopology::LimEom => lim_eom::synthesize(spec),
        CombinerTopology::Wilkinson3WayImproved => wilkinson3way::synthesize(spec),
        CombinerTopology::Recombinant3Way => recombinant::synthesize(spec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_schematic::ComponentKind;

    /// Every topology satisfies the port census: one input at rotation 0
    /// plus N_out outputs.
    #[test]
    fn port_census_holds_across_topologies() {
        let cases = [
            (CombinerTopology::Wilkinson, 2, vec![1.0]),
            (CombinerTopology::MultistageWilkinson, 2, vec![1.0]),
            (CombinerTopology::TJunction, 2, vec![1.0]),
            (CombinerTopology::Branchline, 2, vec![1.0]),
            (CombinerTopology::DoubleBoxBranchline, 2, vec![1.0]),
            (CombinerTopology::Bagley, 3, vec![1.0]),
            (CombinerTopology::Gysel, 2, vec![1.0]),
            (CombinerTopology::LimEom, 3, vec![1.0, 1.0, 1.0]),
            (CombinerTopology::Wilkinson3WayImproved, 3, vec![1.0]),
            (CombinerTopology::Recombinant3Way, 3, vec![1.0]),
        ];
        for (topology, n_outputs, output_ratios) in cases {
            let spec = CombinerSpec {
                topology,
                n_outputs,
                output_ratios,
                ..CombinerSpec::default()
            };
            let sch = synthesize_combiner(&spec).unwrap();
            sch.validate().unwrap();
            assert_eq!(
                sch.count_of(ComponentKind::Port),
                1 + n_outputs,
                "{topology:?}"
            );
            assert_eq!(sch.ports_at_rotation(0), 1, "{topology:?}");
        }
    }

    #[test]
    fn microstrip_realization_works_across_line_topologies() {
        for topology in [
            CombinerTopology::Wilkinson,
            CombinerTopology::TJunction,
            CombinerTopology::Branchline,
            CombinerTopology::Gysel,
            CombinerTopology::Bagley,
        ] {
            let n_outputs = if topology == CombinerTopology::Bagley { 3 } else { 2 };
            let spec = CombinerSpec {
                topology,
                n_outputs,
                realization: CombinerRealization::Microstrip,
                ..CombinerSpec::default()
            };
            let sch = synthesize_combiner(&spec).unwrap();
            sch.validate().unwrap();
            assert!(
                sch.count_of(ComponentKind::MicrostripLine) > 0,
                "{topology:?}"
            );
            assert_eq!(sch.count_of(ComponentKind::TransmissionLine), 0, "{topology:?}");
        }
    }

    #[test]
    fn invalid_spec_is_rejected() {
        let spec = CombinerSpec {
            z0: -50.0,
            ..CombinerSpec::default()
        };
        assert!(synthesize_combiner(&spec).is_err());
    }
}
