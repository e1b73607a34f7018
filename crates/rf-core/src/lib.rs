pub mod constants;
pub mod error;
pub mod substrate;
pub mod units;

pub use error::{RfError, RfResult};
pub use num_complex::Complex64;
pub use substrate::MicrostripSubstrate;
