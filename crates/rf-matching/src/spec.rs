//! Matching network specification records.

use num_complex::Complex64;
use rf_core::units::LengthUnit;
use rf_core::{MicrostripSubstrate, RfError, RfResult};
use rf_schematic::TlRealization;
use serde::{Deserialize, Serialize};

/// Matching topology selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchingTopology {
    /// Two-element L-section
    LSection,
    /// Series line plus one shunt stub
    SingleStub,
    /// Two stubs with fixed λ/8 spacing
    DoubleStub,
    /// N cascaded λ/4 transformer sections
    MultisectionQuarterWave,
    /// Cascade of LC L-sections through intermediate resistance levels
    CascadedLc,
    /// λ/4 transformer preceded by a λ/8 reactance-absorbing line
    Lambda8Lambda4,
}

/// Section weighting of the multisection transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TaperWeighting {
    #[default]
    Binomial,
    Chebyshev,
}

/// One-port matching request: match `zl` to the reference `z0` at the
/// design frequency of the enclosing [`MatchingSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingNetworkSpec {
    pub topology: MatchingTopology,
    /// Reference (source) impedance (Ω)
    pub z0: f64,
    /// Complex load impedance (Ω)
    pub zl: Complex64,
    /// Closed-form branch selector (1 or 2)
    pub solution: u8,
    /// Short-circuited stubs when true, open-circuited otherwise
    pub short_stub: bool,
    /// Number of sections (multisection λ/4 and cascaded LC)
    pub n_sections: usize,
    /// Chebyshev passband tolerance Γ_max
    pub gamma_max: f64,
    pub weighting: TaperWeighting,
    pub realization: TlRealization,
    pub substrate: MicrostripSubstrate,
    pub length_unit: LengthUnit,
}

impl Default for MatchingNetworkSpec {
    fn default() -> Self {
        Self {
            topology: MatchingTopology::LSection,
            z0: 50.0,
            zl: Complex64::new(100.0, 25.0),
            solution: 1,
            short_stub: false,
            n_sections: 3,
            gamma_max: 0.05,
            weighting: TaperWeighting::default(),
            realization: TlRealization::Ideal,
            substrate: MicrostripSubstrate::fr4(),
            length_unit: LengthUnit::Mm,
        }
    }
}

impl MatchingNetworkSpec {
    pub fn validate(&self) -> RfResult<()> {
        if !(self.z0 > 0.0) {
            return Err(RfError::configuration("reference impedance must be positive"));
        }
        if !(self.solution == 1 || self.solution == 2) {
            return Err(RfError::configuration(
                "solution selector must be 1 or 2",
            ));
        }
        if self.n_sections == 0
            && matches!(
                self.topology,
                MatchingTopology::MultisectionQuarterWave | MatchingTopology::CascadedLc
            )
        {
            return Err(RfError::configuration(
                "multisection topologies need at least one section",
            ));
        }
        Ok(())
    }
}

/// Device description for two-port matching: input and output networks
/// are designed against the conjugate reflection targets of a 2×2
/// S-matrix, then composed around an S-parameter block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoPortDevice {
    /// Output matching network parameters
    pub output: MatchingNetworkSpec,
    /// S-matrix in row order: S11, S12, S21, S22
    pub s_params: [Complex64; 4],
}

/// Complete matching synthesis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingSpec {
    /// Design frequency (Hz)
    pub frequency: f64,
    /// Input (or sole) matching network
    pub input: MatchingNetworkSpec,
    /// Present in two-port mode
    pub two_port: Option<TwoPortDevice>,
}

impl MatchingSpec {
    pub fn one_port(frequency: f64, network: MatchingNetworkSpec) -> Self {
        Self {
            frequency,
            input: network,
            two_port: None,
        }
    }

    pub fn validate(&self) -> RfResult<()> {
        if !(self.frequency > 0.0) {
            return Err(RfError::configuration("design frequency must be positive"));
        }
        self.input.validate()?;
        if let Some(device) = &self.two_port {
            device.output.validate()?;
        }
        Ok(())
    }
}
