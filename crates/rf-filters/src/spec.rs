//! Filter specification record.

use crate::{FilterResponse, class_supported};
use rf_core::units::LengthUnit;
use rf_core::{MicrostripSubstrate, RfError, RfResult};
use rf_prototype::EllipticType;
use serde::{Deserialize, Serialize};

/// Filter pass characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterClass {
    Lowpass,
    Highpass,
    Bandpass,
    Bandstop,
}

/// Filter implementation topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterTopology {
    /// Lumped LC ladder
    LcLadder,
    /// LC ladder with inductors/capacitors replaced by stub segments
    SemiLumped,
    /// Alternating high-Z / low-Z line sections (lowpass)
    SteppedImpedance,
    /// λ/4 connecting lines with λ/4 stubs (bandpass/bandstop)
    QuarterWave,
    /// Series-gap coupled resonator line (bandpass)
    EndCoupled,
    /// Capacitively coupled λ/4 short-circuited resonators (bandpass)
    CapacitivelyCoupled,
    /// Parallel (side) coupled line sections (bandpass)
    CoupledLine,
}

pub use rf_schematic::TlRealization;

/// Which ladder elements the semi-lumped conversion replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SemiLumpedStyle {
    /// Replace inductors only; shunt capacitors stay lumped
    #[default]
    InductorsOnly,
    /// Replace inductors and shunt capacitors
    InductorsAndShuntCaps,
}

/// Complete filter synthesis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub topology: FilterTopology,
    pub response: FilterResponse,
    pub class: FilterClass,
    /// Number of reactive elements (attenuation peaks for elliptic)
    pub order: usize,
    /// Cutoff (LP/HP) or center (BP/BS) frequency (Hz)
    pub fc: f64,
    /// Bandwidth (Hz); only bandpass/bandstop use it
    pub bw: f64,
    /// Passband ripple (dB)
    pub ripple_db: f64,
    /// Stopband attenuation (dB); elliptic only
    pub stopband_db: f64,
    /// Elliptic sub-type
    pub elliptic_type: EllipticType,
    /// Source impedance (Ω)
    pub zs: f64,
    /// Lowest realizable line impedance (Ω)
    pub min_z: f64,
    /// Highest realizable line impedance (Ω)
    pub max_z: f64,
    pub realization: TlRealization,
    pub semi_lumped_style: SemiLumpedStyle,
    /// First element shunt (CLC) when true, series (LCL) when false
    pub first_shunt: bool,
    pub substrate: MicrostripSubstrate,
    pub length_unit: LengthUnit,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            topology: FilterTopology::LcLadder,
            response: FilterResponse::Chebyshev,
            class: FilterClass::Lowpass,
            order: 3,
            fc: 1e9,
            bw: 100e6,
            ripple_db: 0.1,
            stopband_db: 40.0,
            elliptic_type: EllipticType::TypeS,
            zs: 50.0,
            min_z: 20.0,
            max_z: 120.0,
            realization: TlRealization::Ideal,
            semi_lumped_style: SemiLumpedStyle::default(),
            first_shunt: true,
            substrate: MicrostripSubstrate::fr4(),
            length_unit: LengthUnit::Mm,
        }
    }
}

impl FilterSpec {
    /// Reject unsupported (class, topology, response) combinations and
    /// out-of-range numeric inputs before synthesis starts.
    pub fn validate(&self) -> RfResult<()> {
        if self.order == 0 {
            return Err(RfError::configuration("filter order must be at least 1"));
        }
        if !(self.fc > 0.0) {
            return Err(RfError::configuration("design frequency must be positive"));
        }
        if !(self.zs > 0.0) {
            return Err(RfError::configuration("source impedance must be positive"));
        }
        if matches!(self.class, FilterClass::Bandpass | FilterClass::Bandstop) && !(self.bw > 0.0)
        {
            return Err(RfError::configuration(
                "bandpass/bandstop synthesis needs a positive bandwidth",
            ));
        }
        if !class_supported(self.topology, self.class) {
            return Err(RfError::configuration(format!(
                "{:?} topology does not support the {:?} class",
                self.topology, self.class
            )));
        }
        if matches!(
            self.response,
            FilterResponse::Bessel | FilterResponse::Gaussian | FilterResponse::Legendre
        ) && !(1..=10).contains(&self.order)
        {
            return Err(RfError::configuration(format!(
                "{:?} coefficients are tabulated for orders 1-10, got {}",
                self.response, self.order
            )));
        }
        if self.response == FilterResponse::Elliptic
            && !matches!(
                self.topology,
                FilterTopology::LcLadder | FilterTopology::SemiLumped
            )
        {
            return Err(RfError::configuration(
                "elliptic responses are realized as LC or semi-lumped ladders",
            ));
        }
        if self.topology == FilterTopology::CoupledLine
            && self.realization != TlRealization::Microstrip
        {
            return Err(RfError::configuration(
                "coupled-line filters require the microstrip realization",
            ));
        }
        Ok(())
    }

}
