//! Power combiner/divider specification record.

use rf_core::units::LengthUnit;
use rf_core::{MicrostripSubstrate, RfError, RfResult};
use rf_schematic::TlRealization;
use serde::{Deserialize, Serialize};

/// Combiner/divider topology selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombinerTopology {
    /// Classic 2-way Wilkinson, equal or unequal split
    Wilkinson,
    /// N-stage broadband Wilkinson with Chebyshev-tapered sections
    MultistageWilkinson,
    /// Lossless T-junction splitter
    TJunction,
    /// 90° branch-line hybrid
    Branchline,
    /// Three-column double-box branch-line hybrid
    DoubleBoxBranchline,
    /// N-way Bagley polygon (N odd)
    Bagley,
    /// Gysel high-power divider with grounded loads
    Gysel,
    /// Lim-Eom three-way divider with arbitrary (M, N, K) split
    LimEom,
    /// Three-way Wilkinson tree with improved isolation
    Wilkinson3WayImproved,
    /// Recombinant three-way Wilkinson mesh
    Recombinant3Way,
}

/// Element realization of the combiner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CombinerRealization {
    /// λ/4 lines mapped onto LC π-equivalents (Wilkinson family only)
    Lumped,
    #[default]
    Ideal,
    Microstrip,
}

impl CombinerRealization {
    /// Line realization for topologies built from transmission lines;
    /// `None` for the lumped mapping.
    pub fn line(self) -> Option<TlRealization> {
        match self {
            CombinerRealization::Lumped => None,
            CombinerRealization::Ideal => Some(TlRealization::Ideal),
            CombinerRealization::Microstrip => Some(TlRealization::Microstrip),
        }
    }
}

/// Complete combiner synthesis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinerSpec {
    pub topology: CombinerTopology,
    /// Number of output ports
    pub n_outputs: usize,
    /// Design frequency (Hz)
    pub frequency: f64,
    /// Port impedance (Ω)
    pub z0: f64,
    /// Linear output power ratios, one per split
    pub output_ratios: Vec<f64>,
    /// Line attenuation (dB) entering the multistage isolator computation
    pub alpha_db: f64,
    /// Number of stages (multistage Wilkinson)
    pub n_stages: usize,
    pub realization: CombinerRealization,
    pub substrate: MicrostripSubstrate,
    pub length_unit: LengthUnit,
}

impl Default for CombinerSpec {
    fn default() -> Self {
        Self {
            topology: CombinerTopology::Wilkinson,
            n_outputs: 2,
            frequency: 1e9,
            z0: 50.0,
            output_ratios: vec![1.0],
            alpha_db: 0.1,
            n_stages: 3,
            realization: CombinerRealization::Ideal,
            substrate: MicrostripSubstrate::fr4(),
            length_unit: LengthUnit::Mm,
        }
    }
}

impl CombinerSpec {
    /// Split ratio K of the first output pair.
    pub(crate) fn ratio(&self) -> f64 {
        self.output_ratios.first().copied().unwrap_or(1.0)
    }

    pub fn validate(&self) -> RfResult<()> {
        if !(self.frequency > 0.0) {
            return Err(RfError::configuration("design frequency must be positive"));
        }
        if !(self.z0 > 0.0) {
            return Err(RfError::configuration("port impedance must be positive"));
        }
        if self.output_ratios.iter().any(|r| !(*r > 0.0)) {
            return Err(RfError::configuration("output ratios must be positive"));
        }

        let expected_outputs: Option<usize> = match self.topology {
            CombinerTopology::Wilkinson
            | CombinerTopology::MultistageWilkinson
            | CombinerTopology::TJunction
            | CombinerTopology::Branchline
            | CombinerTopology::DoubleBoxBranchline
            | CombinerTopology::Gysel => Some(2),
            CombinerTopology::LimEom
            | CombinerTopology::Wilkinson3WayImproved
            | CombinerTopology::Recombinant3Way => Some(3),
            CombinerTopology::Bagley => None,
        };
        if let Some(n) = expected_outputs {
            if self.n_outputs != n {
                return Err(RfError::configuration(format!(
                    "{:?} is a {n}-output topology, got {}",
                    self.topology, self.n_outputs
                )));
            }
        }

        if self.topology == CombinerTopology::Bagley {
            if self.n_outputs < 3 || self.n_outputs % 2 == 0 {
                return Err(RfError::configuration(
                    "Bagley polygons need an odd number of outputs (3, 5, …)",
                ));
            }
        }
        if self.topology == CombinerTopology::LimEom && self.output_ratios.len() != 3 {
            return Err(RfError::configuration(
                "Lim-Eom dividers need the three (M, N, K) power ratios",
            ));
        }
        if self.realization == CombinerRealization::Lumped
            && !matches!(
                self.topology,
                CombinerTopology::Wilkinson | CombinerTopology::MultistageWilkinson
            )
        {
            return Err(RfError::configuration(
                "the lumped LC realization covers the Wilkinson topologies only",
            ));
        }
        if self.topology == CombinerTopology::MultistageWilkinson
            && !(1..=7).contains(&self.n_stages)
        {
            return Err(RfError::configuration(
                "multistage Wilkinson supports 1-7 stages",
            ));
        }
        Ok(())
    }
}
