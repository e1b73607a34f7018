//! Lowpass prototype element computation.
//!
//! - Normalized g-coefficients for the classical all-pole approximations
//! - Elliptic (Cauer) element values by Amstutz's iterative method
//! - Binomial and Chebyshev weights for multisection impedance tapers

pub mod elliptic;
pub mod lowpass;
pub mod taper;

pub use elliptic::{EllipticPrototype, EllipticType, elliptic_prototype};
pub use lowpass::{FilterResponse, lowpass_prototype, lowpass_to_highpass};
pub use taper::{binomial_coefficient, chebyshev_taper_weights};
