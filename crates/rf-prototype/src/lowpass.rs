//! Normalized lowpass prototype g-coefficients.
//!
//! Returns the sequence `g[0..=N+1]` with `g[0] = 1` (source) and `g[N+1]`
//! the load termination ratio. Butterworth and Chebyshev are analytical;
//! Bessel, Gaussian, and Legendre come from the Zverev tables for orders
//! 1–10.
//!
//! References:
//! - Matthaei, Young, Jones, "Design of Microwave Filters,
//!   Impedance-Matching Networks and Coupling Structures", pp. 97-99
//! - Zverev, "Handbook of Filter Synthesis", Wiley 1967, pp. 323-340

use rf_core::{RfError, RfResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Filter approximation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterResponse {
    Butterworth,
    Chebyshev,
    Bessel,
    Gaussian,
    Legendre,
    Elliptic,
}

/// Maximally flat group delay element values (equal terminations).
#[rustfmt::skip]
const BESSEL: [&[f64]; 10] = [
    &[1.0, 2.0000, 1.0],
    &[1.0, 0.5775, 2.1478, 1.0],
    &[1.0, 0.3374, 0.9705, 2.2034, 1.0],
    &[1.0, 0.2334, 0.6725, 1.0815, 2.2404, 1.0],
    &[1.0, 0.1743, 0.5072, 0.8040, 1.1110, 2.2582, 1.0],
    &[1.0, 0.1365, 0.4002, 0.6392, 0.8538, 1.1126, 2.2645, 1.0],
    &[1.0, 0.1106, 0.3259, 0.5249, 0.7020, 0.8690, 1.1052, 2.2659, 1.0],
    &[1.0, 0.0919, 0.2719, 0.4409, 0.5936, 0.7303, 0.8695, 1.0956, 2.2656, 1.0],
    &[1.0, 0.0780, 0.2313, 0.3770, 0.5108, 0.6306, 0.7407, 0.8639, 1.0863, 2.2649, 1.0],
    &[1.0, 0.0672, 0.1998, 0.3270, 0.4454, 0.5528, 0.6493, 0.7420, 0.8561, 1.0781, 2.2641, 1.0],
];

/// Optimum transient response element values.
#[rustfmt::skip]
const GAUSSIAN: [&[f64]; 10] = [
    &[1.0, 2.0000, 1.0],
    &[1.0, 0.4738, 2.1850, 1.0],
    &[1.0, 0.2624, 0.8167, 2.2262, 1.0],
    &[1.0, 0.1772, 0.5302, 0.9321, 2.2450, 1.0],
    &[1.0, 0.1312, 0.3896, 0.6485, 0.9782, 2.2533, 1.0],
    &[1.0, 0.1026, 0.3045, 0.5004, 0.7050, 0.9982, 2.2568, 1.0],
    &[1.0, 0.0833, 0.2473, 0.4055, 0.5606, 0.7333, 1.0073, 2.2583, 1.0],
    &[1.0, 0.0695, 0.2065, 0.3388, 0.4658, 0.5942, 0.7479, 1.0116, 2.2590, 1.0],
    &[1.0, 0.0591, 0.1761, 0.2892, 0.3973, 0.5025, 0.6134, 0.7556, 1.0137, 2.2593, 1.0],
    &[1.0, 0.0512, 0.1525, 0.2509, 0.3451, 0.4353, 0.5250, 0.6244, 0.7597, 1.0147, 2.2594, 1.0],
];

/// Steepest monotonic rolloff element values.
#[rustfmt::skip]
const LEGENDRE: [&[f64]; 10] = [
    &[1.0, 2.0000, 1.0],
    &[1.0, 0.4738, 2.1850, 1.0],
    &[1.0, 1.1737, 1.3538, 2.1801, 1.0],
    &[1.0, 1.0826, 1.4769, 1.9584, 1.5645, 1.0],
    &[1.0, 0.9512, 1.4780, 2.0673, 1.5395, 1.9990, 1.0],
    &[1.0, 0.9160, 1.4852, 1.9857, 1.7442, 1.9040, 1.5763, 1.0],
    &[1.0, 0.8394, 1.4770, 1.9394, 1.7270, 2.1506, 1.5895, 1.8640, 1.0],
    &[1.0, 0.8205, 1.4688, 1.9115, 1.7672, 2.0515, 1.8411, 1.8501, 1.5564, 1.0],
    &[1.0, 0.7695, 1.4555, 1.8674, 1.7755, 2.0662, 1.7816, 2.1585, 1.6134, 1.7645, 1.0],
    &[1.0, 0.7575, 1.4454, 1.8537, 1.7839, 2.0327, 1.8453, 2.0409, 1.8953, 1.8122, 1.5286, 1.0],
];

/// Compute the normalized lowpass prototype coefficients `g[0..=N+1]`.
///
/// `ripple_db` is the passband ripple; only Chebyshev uses it.
///
/// # Errors
/// Configuration error for order 0, and for tabulated responses outside
/// orders 1–10.
pub fn lowpass_prototype(
    response: FilterResponse,
    order: usize,
    ripple_db: f64,
) -> RfResult<Vec<f64>> {
    if order == 0 {
        return Err(RfError::configuration("filter order must be at least 1"));
    }

    match response {
        FilterResponse::Butterworth => Ok(butterworth(order)),
        FilterResponse::Chebyshev => Ok(chebyshev(order, ripple_db)),
        FilterResponse::Bessel => tabulated(&BESSEL, "Bessel", order),
        FilterResponse::Gaussian => tabulated(&GAUSSIAN, "Gaussian", order),
        FilterResponse::Legendre => tabulated(&LEGENDRE, "Legendre", order),
        FilterResponse::Elliptic => Err(RfError::configuration(
            "elliptic responses use the elliptic solver, not g-coefficients",
        )),
    }
}

/// g[k] = 2·sin(π(2k−1)/(2N)) for 1 ≤ k ≤ N; equal terminations.
fn butterworth(order: usize) -> Vec<f64> {
    let n = order as f64;
    let mut gi = Vec::with_capacity(order + 2);
    gi.push(1.0); // Source
    for k in 1..=order {
        gi.push(2.0 * (PI * (2.0 * k as f64 - 1.0) / (2.0 * n)).sin());
    }
    gi.push(1.0); // Load
    gi
}

/// Recurrence from β = ln(coth(ripple/17.37)), γ = sinh(β/2N). The load of
/// an even-order filter is coth²(β/4); odd orders are equi-terminated.
fn chebyshev(order: usize, ripple_db: f64) -> Vec<f64> {
    let n = order as f64;
    let beta = (1.0 / (ripple_db / 17.37).tanh()).ln();
    let gamma = (beta / (2.0 * n)).sinh();

    let ak: Vec<f64> = (1..=order)
        .map(|k| (PI * (2.0 * k as f64 - 1.0) / (2.0 * n)).sin())
        .collect();
    let bk: Vec<f64> = (1..=order)
        .map(|k| gamma * gamma + (k as f64 * PI / n).sin().powi(2))
        .collect();

    let mut gi = Vec::with_capacity(order + 2);
    gi.push(1.0); // Source
    gi.push(2.0 * ak[0] / gamma);
    for k in 2..=order {
        gi.push(4.0 * ak[k - 2] * ak[k - 1] / (bk[k - 2] * gi[k - 1]));
    }

    if order % 2 == 0 {
        gi.push(1.0 / (beta / 4.0).tanh().powi(2));
    } else {
        gi.push(1.0);
    }
    gi
}

fn tabulated(table: &[&[f64]; 10], name: &str, order: usize) -> RfResult<Vec<f64>> {
    if order > 10 {
        return Err(RfError::configuration(format!(
            "{name} coefficients are tabulated for orders 1-10, got {order}"
        )));
    }
    Ok(table[order - 1].to_vec())
}

/// Lowpass-to-highpass transformation of a g-sequence: every reactive
/// element maps to its reciprocal, terminations stay. An involution.
pub fn lowpass_to_highpass(gi: &[f64]) -> Vec<f64> {
    let last = gi.len() - 1;
    gi.iter()
        .enumerate()
        .map(|(k, &g)| if k == 0 || k == last { g } else { 1.0 / g })
        .collect()
}
