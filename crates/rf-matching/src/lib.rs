//! Impedance matching network synthesis.
//!
//! One-port topologies:
//! - L-section (two lumped elements, two closed-form branches)
//! - Single stub and double stub (open or short-circuited)
//! - Multisection λ/4 transformer (binomial or Chebyshev taper)
//! - Cascaded LC sections through geometric resistance levels
//! - λ/8 + λ/4 two-line transformer
//!
//! Two-port mode designs input and output networks against a device's
//! conjugate reflection targets and composes them around an S-parameter
//! block.

pub mod cascaded_lc;
pub mod double_stub;
pub mod l_section;
pub mod lambda8_lambda4;
pub mod multisection;
pub mod single_stub;
pub mod spec;
pub mod two_port;

pub use spec::{
    MatchingNetworkSpec, MatchingSpec, MatchingTopology, TaperWeighting, TwoPortDevice,
};

use rf_core::RfResult;
use rf_schematic::Schematic;

/// Synthesize one matching network at the given frequency.
pub fn synthesize_one_port(
    network: &MatchingNetworkSpec,
    frequency: f64,
) -> RfResult<Schematic> {
    network.validate()?;
    match network.topology {
        MatchingTopology::LSection => l_section::synthesize(network, frequency),
        MatchingTopology::SingleStub => single_stub::synthesize(network, frequency),
        MatchingTopology::DoubleStub => double_stub::synthesize(network, frequency),
        MatchingTopology::MultisectionQuarterWave => {
            multisection::synthesize(network, frequency)
        }
        MatchingTopology::CascadedLc => cascaded_lc::synthesize(network, frequency),
        MatchingTopology::Lambda8Lambda4 => lambda8_lambda4::synthesize(network, frequency),
    }
}

/// Synthesize a matching schematic: one-port, or the two-port composition
/// when a device description is present.
pub fn synthesize_matching(spec: &MatchingSpec) -> RfResult<Schematic> {
    spec.validate()?;
    if spec.two_port.is_some() {
        two_port::synthesize(spec)
    } else {
        synthesize_one_port(&spec.input, spec.frequency)
    }
}
