//! Side-coupled (parallel coupled line) bandpass filter.
//!
//! Each of the N+1 coupled sections is characterized by its admittance
//! inverter J and the resulting even/odd mode impedances
//! Z₀e = Z₀(1 + JZ₀ + (JZ₀)²), Z₀o = Z₀(1 − JZ₀ + (JZ₀)²); the coupled
//! microstrip synthesizer turns each pair into a (width, gap) geometry.
//! Reference: Pozar, "Microwave Engineering", 4th ed., pp. 426-430.
//!
//! Each section is emitted as its two physical strips: the feed strip
//! enters from the left node and ends in an open, the pick-up strip
//! starts open and continues to the right node. Both carry the
//! synthesized width and the coupling gap.

use crate::spec::FilterSpec;
use rf_core::RfResult;
use rf_core::constants::quarter_wavelength;
use rf_core::units::{LengthUnit, format_length};
use rf_microstrip::synthesize_coupled_microstrip;
use rf_prototype::lowpass_prototype;
use rf_schematic::Schematic;
use std::f64::consts::PI;

pub fn synthesize(spec: &FilterSpec) -> RfResult<Schematic> {
    let gi = lowpass_prototype(spec.response, spec.order, spec.ripple_db)?;
    let mut sch = Schematic::new();

    let n = spec.order;
    let delta = spec.bw / spec.fc;
    let z0 = spec.zs;
    let lambda4 = quarter_wavelength(spec.fc);

    let p1 = sch.add_port(z0, 0, 0, 0);
    let mut prev = (p1, 0u8);
    let mut posx = 50;

    for k in 0..=n {
        let j_z0 = if k == 0 {
            (0.5 * PI * delta / (gi[0] * gi[1])).sqrt()
        } else if k == n {
            (0.5 * PI * delta / (gi[n] * gi[n + 1])).sqrt()
        } else {
            0.5 * PI * delta / (gi[k] * gi[k + 1]).sqrt()
        };

        let z_even = z0 * (1.0 + j_z0 + j_z0 * j_z0);
        let z_odd = z0 * (1.0 - j_z0 + j_z0 * j_z0);

        let coupled =
            synthesize_coupled_microstrip(z_even, z_odd, lambda4, spec.fc, &spec.substrate);

        let gap = format_length(coupled.gap, LengthUnit::Mm);
        let strip = |sch: &mut Schematic, x: i32, y: i32| -> String {
            let id =
                sch.add_microstrip_line(coupled.width, coupled.length, &spec.substrate, 90, x, y);
            if let Some(line) = sch.components.last_mut() {
                line.params.insert("Gap".into(), gap.clone());
            }
            id
        };

        // Feed strip: driven end at the left node, far end open
        let feed = strip(&mut sch, posx, 0);
        let feed_open = sch.add_microstrip_open(coupled.width, &spec.substrate, posx + 25, 50);
        sch.wire(&prev.0, prev.1, &feed, 0);
        sch.wire(&feed, 1, &feed_open, 0);

        // Pick-up strip: near end open, far end continues rightward
        let pickup = strip(&mut sch, posx + 25, 25);
        let pickup_open = sch.add_microstrip_open(coupled.width, &spec.substrate, posx, -25);
        sch.wire(&pickup, 0, &pickup_open, 0);

        prev = (pickup, 1);
        posx += 60;
    }

    let g_load = gi[n + 1];
    let z_out = if spec.first_shunt {
        spec.zs / g_load
    } else {
        spec.zs * g_load
    };
    let p2 = sch.add_port(z_out, 180, posx, 0);
    sch.wire(&p2, 0, &prev.0, prev.1);
    Ok(sch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{FilterClass, FilterTopology, TlRealization};
    use approx::assert_relative_eq;
    use rf_core::units::parse_value;
    use rf_microstrip::analyze_coupled_microstrip;
    use rf_prototype::FilterResponse;
    use rf_schematic::ComponentKind;

    fn spec() -> FilterSpec {
        FilterSpec {
            topology: FilterTopology::CoupledLine,
            class: FilterClass::Bandpass,
            response: FilterResponse::Chebyshev,
            order: 3,
            fc: 2e9,
            bw: 200e6,
            ripple_db: 0.5,
            realization: TlRealization::Microstrip,
            ..FilterSpec::default()
        }
    }

    #[test]
    fn emits_two_strips_per_coupled_section() {
        let sch = synthesize(&spec()).unwrap();
        sch.validate().unwrap();
        // N+1 = 4 sections × 2 strips
        assert_eq!(sch.count_of(ComponentKind::MicrostripLine), 8);
        assert_eq!(sch.count_of(ComponentKind::MicrostripOpen), 8);
    }

    #[test]
    fn section_geometry_recovers_mode_impedances() {
        let sch = synthesize(&spec()).unwrap();
        let gi = lowpass_prototype(FilterResponse::Chebyshev, 3, 0.5).unwrap();
        let delta = 0.1;
        let j_z0 = (0.5 * PI * delta / (gi[0] * gi[1])).sqrt();
        let z_even = 50.0 * (1.0 + j_z0 + j_z0 * j_z0);
        let z_odd = 50.0 * (1.0 - j_z0 + j_z0 * j_z0);

        let first = sch
            .components
            .iter()
            .find(|c| c.kind == ComponentKind::MicrostripLine)
            .unwrap();
        let width = parse_value(first.param("Width").unwrap()).unwrap();
        let gap = parse_value(first.param("Gap").unwrap()).unwrap();

        let check =
            analyze_coupled_microstrip(width, gap, 2e9, &rf_core::MicrostripSubstrate::fr4());
        assert_relative_eq!(check.z_even, z_even, max_relative = 1e-3);
        assert_relative_eq!(check.z_odd, z_odd, max_relative = 1e-3);
    }

    #[test]
    fn interior_sections_couple_more_loosely_than_edges() {
        let sch = synthesize(&spec()).unwrap();
        let gaps: Vec<f64> = sch
            .components
            .iter()
            .filter(|c| c.kind == ComponentKind::MicrostripLine)
            .step_by(2)
            .map(|c| parse_value(c.param("Gap").unwrap()).unwrap())
            .collect();
        // Interior J is smaller → wider gap than the edge sections
        assert!(gaps[1] > gaps[0]);
        assert!(gaps[2] > gaps[3]);
    }
}
