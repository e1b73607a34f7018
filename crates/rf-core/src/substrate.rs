//! Microstrip substrate definition shared by every synthesizer that
//! realizes transmission lines on a dielectric slab.

use serde::{Deserialize, Serialize};

/// Microstrip substrate stack-up. All dimensions in SI units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MicrostripSubstrate {
    /// Substrate relative permittivity
    pub er: f64,
    /// Substrate height (m)
    pub height: f64,
    /// Metal conductivity (S/m)
    pub metal_conductivity: f64,
    /// Metal thickness (m)
    pub metal_thickness: f64,
    /// Dielectric loss tangent
    pub tand: f64,
}

impl MicrostripSubstrate {
    /// Create a substrate from permittivity and height, with copper
    /// metallization defaults (35 μm, 5.88e7 S/m).
    pub fn new(er: f64, height: f64) -> Self {
        Self {
            er,
            height,
            metal_conductivity: 5.88e7,
            metal_thickness: 35e-6,
            tand: 0.0,
        }
    }

    /// Standard 1.6 mm FR-4 substrate (εr = 4.4, tanδ = 0.02).
    pub fn fr4() -> Self {
        Self {
            er: 4.4,
            height: 1.6e-3,
            metal_conductivity: 5.88e7,
            metal_thickness: 35e-6,
            tand: 0.02,
        }
    }
}

impl Default for MicrostripSubstrate {
    fn default() -> Self {
        Self::fr4()
    }
}
