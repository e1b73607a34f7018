//! Stepped-impedance lowpass filter.
//!
//! Shunt capacitors become short low-impedance line sections, series
//! inductors short high-impedance sections. Reference: Pozar, "Microwave
//! Engineering", 4th ed., p. 424.

use rf_schematic::LineEmitter;
use crate::spec::{FilterSpec, TlRealization};
use rf_core::RfResult;
use rf_core::constants::wavenumber;
use rf_prototype::lowpass_prototype;
use rf_schematic::Schematic;

pub fn synthesize(spec: &FilterSpec) -> RfResult<Schematic> {
    let gi = lowpass_prototype(spec.response, spec.order, spec.ripple_db)?;
    let mut sch = Schematic::new();
    let emitter = LineEmitter::new(spec.realization, &spec.substrate, spec.length_unit, spec.fc);

    let beta = wavenumber(spec.fc);
    let z_low = spec.min_z;
    let z_high = spec.max_z;

    let p1 = sch.add_port(spec.zs, 0, 0, 0);
    let mut prev = p1;
    let mut prev_is_port = true;
    let mut prev_width = 0.0;
    let mut posx = 50;

    for k in 0..spec.order {
        let g = gi[k + 1];
        let (z_line, length) = if (spec.first_shunt && k % 2 == 0)
            || (!spec.first_shunt && k % 2 != 0)
        {
            // Shunt capacitor → low-impedance section
            (z_low, g * z_low / (beta * spec.zs))
        } else {
            // Series inductor → high-impedance section
            (z_high, g * spec.zs / (beta * z_high))
        };

        // Width steps between adjacent sections of different impedance
        if spec.realization == TlRealization::Microstrip && !prev_is_port {
            posx += 10;
            let width = emitter.width_for(z_line);
            let w1 = rf_core::units::format_length(prev_width, rf_core::units::LengthUnit::Mm);
            let w2 = rf_core::units::format_length(width, rf_core::units::LengthUnit::Mm);
            let step = sch.add_microstrip_step(&w1, &w2, &spec.substrate, posx, 0);
            sch.wire(&prev, 1, &step, 0);
            prev = step;
            posx += 60;
        }

        let line = emitter.series_segment(&mut sch, z_line, length, 90, posx, 0);
        if prev_is_port {
            sch.wire(&prev, 0, &line, 0);
        } else {
            sch.wire(&prev, 1, &line, 0);
        }
        if spec.realization == TlRealization::Microstrip {
            prev_width = emitter.width_for(z_line);
        }
        prev = line;
        prev_is_port = false;
        posx += 50;
    }

    let g_load = gi[spec.order + 1];
    let z_out = if spec.first_shunt {
        spec.zs / g_load
    } else {
        spec.zs * g_load
    };
    let p2 = sch.add_port(z_out, 180, posx, 0);
    sch.wire(&p2, 0, &prev, 1);
    Ok(sch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{FilterClass, FilterTopology};
    use approx::assert_relative_eq;
    use rf_core::units::parse_value;
    use rf_prototype::FilterResponse;
    use rf_schematic::ComponentKind;

    fn spec() -> FilterSpec {
        FilterSpec {
            topology: FilterTopology::SteppedImpedance,
            response: FilterResponse::Butterworth,
            class: FilterClass::Lowpass,
            order: 5,
            fc: 2e9,
            ..FilterSpec::default()
        }
    }

    #[test]
    fn one_line_per_element() {
        let sch = synthesize(&spec()).unwrap();
        sch.validate().unwrap();
        assert_eq!(sch.count_of(ComponentKind::TransmissionLine), 5);
        assert_eq!(sch.count_of(ComponentKind::Port), 2);
    }

    #[test]
    fn sections_alternate_low_and_high_impedance() {
        let sch = synthesize(&spec()).unwrap();
        let z: Vec<f64> = sch
            .components
            .iter()
            .filter(|c| c.kind == ComponentKind::TransmissionLine)
            .map(|c| parse_value(c.param("Z0").unwrap()).unwrap())
            .collect();
        assert_eq!(z, vec![20.0, 120.0, 20.0, 120.0, 20.0]);
    }

    #[test]
    fn lengths_follow_pozar_formulas() {
        let sch = synthesize(&spec()).unwrap();
        let beta = wavenumber(2e9);
        let gi = lowpass_prototype(FilterResponse::Butterworth, 5, 0.0).unwrap();
        let lines: Vec<&rf_schematic::Component> = sch
            .components
            .iter()
            .filter(|c| c.kind == ComponentKind::TransmissionLine)
            .collect();
        // First section replaces a shunt capacitor
        let l0 = parse_value(lines[0].param("Length").unwrap()).unwrap();
        assert_relative_eq!(l0, gi[1] * 20.0 / (beta * 50.0), max_relative = 1e-3);
        // Second replaces a series inductor
        let l1 = parse_value(lines[1].param("Length").unwrap()).unwrap();
        assert_relative_eq!(l1, gi[2] * 50.0 / (beta * 120.0), max_relative = 1e-3);
    }

    #[test]
    fn microstrip_realization_inserts_steps() {
        let ms = FilterSpec {
            realization: TlRealization::Microstrip,
            ..spec()
        };
        let sch = synthesize(&ms).unwrap();
        sch.validate().unwrap();
        assert_eq!(sch.count_of(ComponentKind::MicrostripLine), 5);
        // A step between every adjacent pair of different-width lines
        assert_eq!(sch.count_of(ComponentKind::MicrostripStep), 4);
        for step in sch
            .components
            .iter()
            .filter(|c| c.kind == ComponentKind::MicrostripStep)
        {
            assert!(step.param("W1").is_some() && step.param("W2").is_some());
        }
    }
}
