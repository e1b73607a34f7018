//! Microstrip line analysis and synthesis.
//!
//! - Quasi-static analysis by Hammerstad-Jensen, including metal thickness
//!   correction, with frequency dispersion by Kirschning-Jansen
//! - Newton-iteration synthesis: invert the model to find the strip width
//!   realizing a target characteristic impedance at the design frequency
//! - Coupled-line analysis and joint (width, gap) synthesis against target
//!   even/odd mode impedances
//!
//! All geometry is in SI units (meters). Synthesis failures are reported
//! through a negative-width sentinel in the result record, which callers
//! propagate into the emitted schematic.

pub mod analysis;
pub mod coupled;
pub mod synthesis;

pub use analysis::{analyze_microstrip, open_end_correction};
pub use coupled::{CoupledAnalysis, CoupledSynthesis, analyze_coupled_microstrip,
                  synthesize_coupled_microstrip};
pub use synthesis::{MicrostripSynthesis, synthesize_microstrip};
