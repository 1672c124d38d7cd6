//! Interactive particle viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`Simulation`] and the
//! [`Canvas`] it renders into, and implements [`eframe::App`] to play the
//! run back and paint the presented frames.

use eframe::App;
use glam::Vec2;
use rand::Rng;
use sim_core::{
    config::{Config, Demo},
    driver::Simulation,
    error::SimError,
};
use tracing::{error, info};

use crate::canvas::Canvas;

/// Marker radius in canvas units at scale 1.
const MARKER_RADIUS: f32 = 10.0;

/// Main application state for the viewer.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions.
/// 2. If `running` is `true` and at least the configured frame delay has
///    passed, call [`Viewer::step_once`].
/// 3. Paint the canvas' presented frame.
///
/// ### Fields
/// - `sim` - The simulation being played back.
/// - `canvas` - Batched drawing surface the simulation renders into.
/// - `demo` - Demo selected in the UI; applied on reset.
///
/// - `running` - Whether frames are advanced automatically.
/// - `zoom` - Canvas units to screen pixels.
/// - `pan` - Screen-space pan offset in pixels.
/// - `hover` - Canvas position under the pointer, if any.
///
/// - `last_step_time` - egui time of the last automatic step.
pub struct Viewer {
    sim: Simulation,
    canvas: Canvas,
    demo: Demo,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,
    hover: Option<Vec2>,

    last_step_time: f64,
}

impl Viewer {
    /// Creates a viewer for `demo` with a freshly seeded simulation.
    pub fn new(demo: Demo) -> Result<Self, SimError> {
        let (sim, canvas) = Self::start(demo)?;
        Ok(Self {
            sim,
            canvas,
            demo,
            running: true,
            zoom: 1.0,
            pan: egui::vec2(0.0, 0.0),
            hover: None,
            last_step_time: 0.0,
        })
    }

    fn start(demo: Demo) -> Result<(Simulation, Canvas), SimError> {
        let mut cfg = Config::for_demo(demo);
        cfg.seed = Some(rand::rng().random());
        let mut sim = Simulation::new(cfg)?;
        let mut canvas = Canvas::default();
        sim.attach(&mut canvas)?;
        Ok((sim, canvas))
    }

    /// Rebuilds the simulation for the selected demo with a new seed and
    /// stops auto-running. Camera settings are kept.
    fn reset(&mut self) {
        match Self::start(self.demo) {
            Ok((sim, canvas)) => {
                info!(demo = ?self.demo, seed = ?sim.config().seed, "viewer reset");
                self.sim = sim;
                self.canvas = canvas;
            }
            Err(err) => error!(%err, "reset failed"),
        }
        self.running = false;
    }

    /// Advances the simulation by one frame.
    ///
    /// Stops auto-running when the run is over or a frame fails.
    fn step_once(&mut self) {
        match self.sim.step_frame(&mut self.canvas) {
            Ok(true) => {}
            Ok(false) => self.running = false,
            Err(err) => {
                error!(%err, frame = self.sim.frame(), "frame failed");
                self.running = false;
            }
        }
    }

    /// Converts a canvas position to screen-space.
    ///
    /// The canvas square is centered in `rect`, scaled by `zoom` and
    /// offset by `pan`. The y-axis is flipped so that positive y goes up.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        let half = self.sim.config().drawing_size * 0.5;
        egui::pos2(
            center.x + (p.x - half) * self.zoom + self.pan.x,
            center.y - (p.y - half) * self.zoom + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`].
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let half = self.sim.config().drawing_size * 0.5;
        let x = (p.x - center.x - self.pan.x) / self.zoom + half;
        let y = (center.y - p.y + self.pan.y) / self.zoom + half;
        Vec2::new(x, y)
    }

    /// Builds the top panel UI (run controls, demo choice, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    self.step_once();
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                let herd = ui.selectable_value(&mut self.demo, Demo::Herd, "Herd");
                let particles = ui.selectable_value(&mut self.demo, Demo::Particles, "Particles");
                if herd.changed() || particles.changed() {
                    self.reset();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=5.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar.
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!(
                    "frame = {} / {}",
                    self.sim.frame(),
                    self.sim.total_frames()
                ));
                match self.sim.current_signal() {
                    Some(s) => ui.label(format!("signal = {s:.3}")),
                    None => ui.label("signal = -"),
                };
                ui.separator();
                ui.label(format!("objects = {}", self.sim.store().object_count()));
                ui.label(format!(
                    "control vars = {}",
                    self.sim.store().control_variable_count()
                ));
                if let Some(seed) = self.sim.config().seed {
                    ui.label(format!("seed = {seed}"));
                }
                if let Some(p) = self.hover {
                    ui.separator();
                    ui.label(format!("({:.1}, {:.1})", p.x, p.y));
                }
            });
        });
    }

    /// Builds the central panel where the presented frame is painted.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            if response.dragged() {
                self.pan += response.drag_delta();
            }
            self.hover = response.hover_pos().map(|p| self.screen_to_world(p, rect));

            let frame = self.canvas.visible();

            if let Some(size) = frame.outline {
                let corners = [
                    Vec2::new(0.0, 0.0),
                    Vec2::new(size, 0.0),
                    Vec2::new(size, size),
                    Vec2::new(0.0, size),
                ];
                let points: Vec<egui::Pos2> = corners
                    .iter()
                    .map(|&c| self.world_to_screen(c, rect))
                    .collect();
                painter.add(egui::Shape::closed_line(
                    points,
                    egui::Stroke::new(1.0, egui::Color32::GRAY),
                ));
            }

            for m in &frame.markers {
                let p = self.world_to_screen(m.position, rect);
                let r = (MARKER_RADIUS * m.scale.abs() * self.zoom).max(1.0);
                let [red, green, blue] = m.color;
                painter.circle_filled(p, r, egui::Color32::from_rgb(red, green, blue));
            }

            if self.running {
                let now = ctx.input(|i| i.time);
                let interval = self.sim.config().frame_delay.as_secs_f64();
                if now - self.last_step_time >= interval {
                    self.step_once();
                    self.last_step_time = now;
                }
                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_central_panel(ctx);
    }
}
