//! Passive filter synthesis.
//!
//! Synthesizers for the supported filter families:
//! - Canonical LC ladders (lowpass, highpass, bandpass, bandstop), with an
//!   optional semi-lumped realization replacing L and C by stub segments
//! - Elliptic ladders from the Amstutz element solver
//! - Distributed bandpass/bandstop topologies: stepped-impedance,
//!   quarter-wave stub, end-coupled, capacitively-coupled shunt resonator,
//!   and side-coupled line filters
//!
//! Every synthesizer consumes a [`FilterSpec`] and emits a
//! [`rf_schematic::Schematic`]; [`synthesize_filter`] dispatches on the
//! topology tag after validating the (class, topology, realization) triple.

pub mod canonical;
pub mod capacitively_coupled;
pub mod coupled_line;

pub mod elliptic;
pub mod end_coupled;
pub mod quarter_wave;
pub mod spec;
pub mod stepped_impedance;

pub use rf_prototype::{EllipticType, FilterResponse};
pub use spec::{FilterClass, FilterSpec, FilterTopology, SemiLumpedStyle, TlRealization};

use rf_core::RfResult;
use rf_schematic::Schematic;

/// Synthesize a filter schematic from a specification.
///
/// Validates the topology support matrix first: stepped-impedance is
/// lowpass-only; quarter-wave is bandpass/bandstop; end-coupled,
/// capacitively-coupled, and coupled-line are bandpass-only; semi-lumped
/// ladders cover lowpass and highpass.
pub fn synthesize_filter(spec: &FilterSpec) -> RfResult<Schematic> {
    spec.validate()?;

    let schematic = match spec.topology {
        FilterTopology::LcLadder => {
            if spec.response == FilterResponse::Elliptic {
                elliptic::synthesize(spec)?
            } else {
                canonical::synthesize(spec)?
            }
        }
        FilterTopology::SemiLumped => {
            if spec.response == FilterResponse::Elliptic {
                // Semi-lumped elliptic synthesis is only defined for type S
                let mut forced = spec.clone();
                forced.elliptic_type = EllipticType::TypeS;
                elliptic::synthesize(&forced)?
            } else {
                canonical::synthesize(spec)?
            }
        }
        FilterTopology::SteppedImpedance => stepped_impedance::synthesize(spec)?,
        FilterTopology::QuarterWave => quarter_wave::synthesize(spec)?,
        FilterTopology::EndCoupled => end_coupled::synthesize(spec)?,
        FilterTopology::CapacitivelyCoupled => capacitively_coupled::synthesize(spec)?,
        FilterTopology::CoupledLine => coupled_line::synthesize(spec)?,
    };

    Ok(schematic)
}

/// Support matrix of (topology, class); used by [`FilterSpec::validate`].
pub(crate) fn class_supported(
    topology: FilterTopology,
    class: FilterClass,
) -> bool {
    use FilterClass::*;
    use FilterTopology::*;
    match topology {
        LcLadder => true,
        SemiLumped => matches!(class, Lowpass | Highpass),
        SteppedImpedance => class == Lowpass,
        QuarterWave => matches!(class, Bandpass | Bandstop),
        EndCoupled | CapacitivelyCoupled | CoupledLine => class == Bandpass,
    }
}
