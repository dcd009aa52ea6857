use engine_sim_app::{run_simulation, to_kpa, to_liters, EngineLayout, SimulationConfig, SimulationRun};
use kinematics::{PistonAnimator, PistonFrame};
use simcore::{CycleKind, Model};
use thermo::{default_compression_ratio, Aspiration};

use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Vec2};
use egui_plot::{Legend, Line, Plot, PlotPoints};
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_millis(50);

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Engine Cycle Simulator"),
        ..Default::default()
    };
    eframe::run_native(
        "Engine Cycle Simulator",
        options,
        Box::new(|_cc| Ok(Box::new(App::new()))),
    )
}

struct App {
    config: SimulationConfig,
    compression_ratio: f64,
    run: Option<SimulationRun>,
    error: Option<String>,

    // Animation
    piston: PistonAnimator,
    animating: bool,
    paused: bool,
    last_tick: Instant,
}

impl App {
    fn new() -> Self {
        let config = SimulationConfig::default();
        Self {
            compression_ratio: default_compression_ratio(config.cycle),
            piston: PistonAnimator::new(config.cycle, config.rpm),
            config,
            run: None,
            error: None,
            animating: false,
            paused: false,
            last_tick: Instant::now(),
        }
    }

    fn change_cycle(&mut self, cycle: CycleKind) {
        self.config.cycle = cycle;
        self.compression_ratio = default_compression_ratio(cycle);
        self.piston.set_cycle_kind(cycle);
    }

    fn simulate(&mut self) {
        self.config.compression_ratio = Some(self.compression_ratio);
        match run_simulation(&self.config) {
            Ok(run) => {
                self.run = Some(run);
                self.error = None;
                self.piston.set_rpm(self.config.rpm);
                self.piston.reset();
                self.animating = true;
                self.paused = false;
                self.last_tick = Instant::now();
            }
            Err(err) => {
                self.run = None;
                self.error = Some(err.to_string());
            }
        }
    }

    fn advance_animation(&mut self) {
        if !self.animating || self.paused {
            self.last_tick = Instant::now();
            return;
        }
        while self.last_tick.elapsed() >= TICK {
            self.piston.tick();
            self.last_tick += TICK;
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Engine");

        let mut cycle = self.config.cycle;
        egui::ComboBox::from_label("Cycle")
            .selected_text(cycle.name())
            .show_ui(ui, |ui| {
                for kind in CycleKind::ALL {
                    ui.selectable_value(&mut cycle, kind, kind.name());
                }
            });
        if cycle != self.config.cycle {
            self.change_cycle(cycle);
        }

        ui.label("Total displacement");
        ui.add(egui::DragValue::new(&mut self.config.displacement_l).range(0.1..=16.0).speed(0.05).suffix(" L"));

        egui::ComboBox::from_label("Cylinders")
            .selected_text(self.config.layout.name())
            .show_ui(ui, |ui| {
                for layout in EngineLayout::ALL {
                    ui.selectable_value(&mut self.config.layout, layout, layout.name());
                }
            });

        ui.label("Compression ratio");
        ui.add(egui::DragValue::new(&mut self.compression_ratio).range(1.5..=30.0).speed(0.1));

        ui.label("Intake pressure");
        ui.add(egui::DragValue::new(&mut self.config.intake_pressure).range(10_000.0..=500_000.0).speed(100.0).suffix(" Pa"));

        ui.label("RPM");
        ui.add(egui::Slider::new(&mut self.config.rpm, 0.0..=9000.0));

        egui::ComboBox::from_label("Mode")
            .selected_text(match self.config.aspiration {
                Aspiration::Natural => "Naturally aspirated",
                Aspiration::Turbo => "Turbo",
            })
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut self.config.aspiration, Aspiration::Natural, "Naturally aspirated");
                ui.selectable_value(&mut self.config.aspiration, Aspiration::Turbo, "Turbo");
            });

        ui.separator();
        if ui.button("Simulate").clicked() {
            self.simulate();
        }
        ui.add_enabled_ui(self.animating, |ui| {
            if ui.button(if self.paused { "▶ Resume animation" } else { "⏸ Pause animation" }).clicked() {
                self.paused = !self.paused;
            }
        });

        ui.separator();
        if let Some(err) = &self.error {
            ui.colored_label(Color32::RED, err);
        }
        if let Some(run) = &self.run {
            ui.label(format!("Power: {:.2} kW", run.power.kilowatts));
            ui.label(format!("Power: {:.2} cv", run.power.horsepower));
            ui.label(format!("Efficiency: {:.2}%", run.result.efficiency * 100.0));
            ui.label(format!("Work: {:.2} J", run.result.net_work));
        }
    }

    fn plots(&self, ui: &mut egui::Ui, run: &SimulationRun) {
        let curve = &run.curve;
        ui.columns(2, |cols| {
            cols[0].heading(format!("P-V diagram ({})", run.result.kind));
            Plot::new("pv_plot")
                .legend(Legend::default())
                .height(300.0)
                .x_axis_label("Volume per cylinder (L)")
                .y_axis_label("Pressure (kPa)")
                .show(&mut cols[0], |plot_ui| {
                    let points = PlotPoints::from_iter(
                        curve
                            .volumes
                            .iter()
                            .zip(&curve.pressures)
                            .map(|(&v, &p)| [to_liters(v), to_kpa(p)]),
                    );
                    plot_ui.line(Line::new("P-V", points).color(Color32::BLUE).width(2.0));
                });

            cols[1].heading("P-T diagram");
            Plot::new("pt_plot")
                .legend(Legend::default())
                .height(300.0)
                .x_axis_label("Temperature (K)")
                .y_axis_label("Pressure (kPa)")
                .show(&mut cols[1], |plot_ui| {
                    let points = PlotPoints::from_iter(
                        curve
                            .temperatures
                            .iter()
                            .zip(&curve.pressures)
                            .map(|(&t, &p)| [t, to_kpa(p)]),
                    );
                    plot_ui.line(Line::new("P-T", points).color(Color32::RED).width(2.0));
                });
        });
    }
}

fn rgba(c: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3])
}

fn paint_piston(ui: &mut egui::Ui, frame: &PistonFrame, rpm: f64) {
    let (response, painter) = ui.allocate_painter(Vec2::new(ui.available_width(), 320.0), Sense::hover());
    let area = response.rect;
    painter.rect_filled(area, 0.0, Color32::WHITE);

    let cyl_h = area.height() * 0.6;
    let cyl_w = cyl_h * 0.66;
    let cyl = Rect::from_min_size(
        Pos2::new(area.center().x - cyl_w / 2.0, area.top() + (area.height() - cyl_h) / 2.0),
        Vec2::new(cyl_w, cyl_h),
    );
    let slate = Color32::from_rgb(0x47, 0x55, 0x69);
    let dark = Color32::from_rgb(0x33, 0x41, 0x55);
    let light = Color32::from_rgb(0x94, 0xa3, 0xb8);

    painter.rect_filled(cyl, 0.0, dark);
    painter.rect_stroke(cyl, 0.0, Stroke::new(4.0, slate), StrokeKind::Inside);

    // Piston crown travels from top dead center (0) to bottom dead center (1)
    let piston_h = 30.0;
    let piston_y = cyl.top() + 20.0 + frame.piston_position as f32 * (cyl_h - 80.0);

    let gas = Rect::from_min_max(Pos2::new(cyl.left() + 4.0, cyl.top() + 20.0), Pos2::new(cyl.right() - 4.0, piston_y));
    if gas.height() > 0.0 {
        painter.rect_filled(gas, 0.0, rgba(frame.gas_rgba));
    }
    if frame.flame_intensity > 0.0 {
        let [r, g, b] = frame.flame_rgb;
        let alpha = (frame.flame_intensity * 255.0) as u8;
        painter.circle_filled(
            Pos2::new(cyl.center().x, cyl.top() + 30.0),
            cyl_w * 0.35,
            Color32::from_rgba_unmultiplied(r, g, b, alpha),
        );
    }

    // Head, spark plug or injector
    painter.rect_filled(
        Rect::from_min_max(Pos2::new(cyl.left() - 10.0, cyl.top() - 15.0), Pos2::new(cyl.right() + 10.0, cyl.top())),
        0.0,
        Color32::from_rgb(0x64, 0x74, 0x8b),
    );
    let plug = if frame.kind == CycleKind::Diesel { Color32::from_rgb(0xef, 0x44, 0x44) } else { light };
    painter.rect_filled(
        Rect::from_center_size(Pos2::new(cyl.center().x, cyl.top() - 22.0), Vec2::new(10.0, 15.0)),
        0.0,
        plug,
    );
    if frame.spark {
        for i in -1..=1 {
            let x = cyl.center().x + i as f32 * 8.0;
            painter.line_segment(
                [Pos2::new(x, cyl.top() - 15.0), Pos2::new(x, cyl.top())],
                Stroke::new(2.0, Color32::from_rgb(255, 255, 100)),
            );
        }
    }
    if frame.injection {
        for i in -2..=2 {
            let offset = i as f32 * 6.0;
            let x = cyl.center().x;
            painter.line_segment(
                [Pos2::new(x + offset, cyl.top() - 15.0), Pos2::new(x + 2.0 * offset, cyl.top() + 5.0)],
                Stroke::new(1.0, Color32::from_rgb(255, 200, 100)),
            );
        }
    }

    // Valves
    let valve = |x: f32, open: bool, open_color: Color32| {
        let y = if open { cyl.top() } else { cyl.top() - 10.0 };
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(x, y - 15.0), Vec2::new(15.0, 15.0)),
            0.0,
            if open { open_color } else { slate },
        );
    };
    valve(cyl.left() + 15.0, frame.intake_valve_open, Color32::from_rgb(0x22, 0xc5, 0x5e));
    valve(cyl.right() - 30.0, frame.exhaust_valve_open, Color32::from_rgb(0xef, 0x44, 0x44));

    // Piston, rod and crank
    let piston = Rect::from_min_max(Pos2::new(cyl.left() + 5.0, piston_y), Pos2::new(cyl.right() - 5.0, piston_y + piston_h));
    painter.rect_filled(piston, 0.0, light);
    for offset in [8.0, 16.0, 24.0] {
        painter.line_segment(
            [Pos2::new(piston.left(), piston_y + offset), Pos2::new(piston.right(), piston_y + offset)],
            Stroke::new(2.0, Color32::from_rgb(0x1e, 0x29, 0x3b)),
        );
    }
    let rod_bottom = cyl.bottom() + 30.0;
    painter.line_segment(
        [Pos2::new(cyl.center().x, piston_y + piston_h), Pos2::new(cyl.center().x, rod_bottom)],
        Stroke::new(6.0, slate),
    );
    let crank_center = Pos2::new(cyl.center().x, rod_bottom + 10.0);
    painter.circle_filled(crank_center, 20.0, Color32::from_rgb(0x64, 0x74, 0x8b));
    let (cx, _) = frame.crank_offset;
    painter.circle_filled(Pos2::new(crank_center.x + 20.0 * cx as f32, crank_center.y), 8.0, light);

    painter.text(
        Pos2::new(area.left() + 10.0, area.bottom() - 40.0),
        Align2::LEFT_TOP,
        frame.stroke.label(),
        FontId::proportional(14.0),
        Color32::BLACK,
    );
    painter.text(
        Pos2::new(area.left() + 10.0, area.bottom() - 20.0),
        Align2::LEFT_TOP,
        format!("{} | RPM: {}", frame.kind.name().to_uppercase(), rpm),
        FontId::proportional(12.0),
        Color32::BLACK,
    );
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.advance_animation();

        egui::SidePanel::left("controls").exact_width(300.0).show(ctx, |ui| {
            self.controls(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(run) = &self.run {
                self.plots(ui, run);
            } else {
                ui.label("Press Simulate to solve the cycle.");
            }
            ui.separator();
            paint_piston(ui, &self.piston.frame(), self.piston.rpm());
        });

        ctx.request_repaint_after(TICK);
    }
}
