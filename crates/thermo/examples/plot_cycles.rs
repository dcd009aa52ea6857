use plotters::prelude::*;
use simcore::CycleKind;
use thermo::{sample, solve, CurveSample, CycleParameters, Process};

fn leg_color(process: Process) -> RGBColor {
    match process {
        Process::Intake | Process::ExhaustStroke => RGBColor(150, 150, 150),
        Process::Compression => BLUE,
        Process::Combustion => RED,
        Process::Expansion => RGBColor(230, 120, 0),
        Process::Exhaust | Process::HeatRejection => RGBColor(0, 150, 80),
    }
}

fn draw_cycle(filename: &str, title: &str, curve: &CurveSample) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(filename, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    // Liters and kPa on the axes
    let (v_min, v_max) = curve.volume_range();
    let (p_min, p_max) = curve.pressure_range();
    let x_range = (v_min * 1000.0 * 0.95)..(v_max * 1000.0 * 1.05);
    let y_range = 0.0..(p_max / 1000.0 * 1.05).max(p_min / 1000.0 + 1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("Arial", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Volume (L)")
        .y_desc("Pressure (kPa)")
        .draw()?;

    for leg in &curve.legs {
        let color = leg_color(leg.process);
        let points: Vec<(f64, f64)> = leg
            .range()
            .map(|i| (curve.volumes[i] * 1000.0, curve.pressures[i] / 1000.0))
            .collect();
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))?
            .label(leg.process.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.filled()));
    }

    chart.configure_series_labels().border_style(&BLACK).draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    for kind in CycleKind::ALL {
        let params = CycleParameters::defaults_for(kind);
        let result = solve(kind, &params)?;
        let curve = sample(&result);

        let filename = format!("pv_{}.png", kind.name().to_lowercase());
        let title = format!(
            "{} cycle  r={}  eta={:.1}%  W={:.0} J",
            kind,
            params.compression_ratio,
            result.efficiency * 100.0,
            result.net_work
        );
        draw_cycle(&filename, &title, &curve)?;
        println!("wrote {filename} (enclosed work {:.1} J)", curve.enclosed_work());
    }
    Ok(())
}
