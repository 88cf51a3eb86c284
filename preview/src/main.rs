//! Desktop preview app for stagelight effects
//!
//! Renders two simulated LED strips in a window and drives a small demo
//! show through the `StageManager`, using synthetic time so playback can
//! be paused and scaled.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant as StdInstant;

use eframe::egui::{self, Color32};
use stagelight::{
    Breathing, BreathingWave, Chase, DeviceId, Effect, EffectOptions, Fade, FadeDirection,
    FrameScheduler, Gradient, Hsv, Instant, LiquidFill, OutputDriver, Rgb, ScrollingColorSource,
    SourceSlot, StageDevice, StageManager, StaticBrightness, StaticColor,
};

/// Number of LEDs in the simulated main strip
const STRIP_LEDS: usize = 60;

/// Number of LEDs in the simulated accent bar
const BAR_LEDS: usize = 24;

/// Size of each LED rectangle in pixels
const LED_SIZE: f32 = 12.0;

/// Gap between LEDs
const LED_GAP: f32 = 2.0;

const STRIP: DeviceId = DeviceId(0);
const BAR: DeviceId = DeviceId(1);

/// Demo show phases, advanced when the previous phase's effects finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Fill,
    Show,
    FadeOut,
    Idle,
}

/// Frame buffer shared between the stage manager's driver and the UI.
#[derive(Clone)]
struct SharedStrip {
    frame: Rc<RefCell<Vec<Rgb>>>,
}

impl SharedStrip {
    fn new(len: usize) -> Self {
        Self {
            frame: Rc::new(RefCell::new(vec![Rgb { r: 0, g: 0, b: 0 }; len])),
        }
    }
}

impl OutputDriver for SharedStrip {
    fn write(&mut self, colors: &[Rgb]) {
        self.frame.borrow_mut().copy_from_slice(colors);
    }
}

fn leak(slot: SourceSlot<'static>) -> &'static SourceSlot<'static> {
    Box::leak(Box::new(slot))
}

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 420.0])
            .with_title("Stagelight Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "stagelight-preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new()))),
    )
}

struct PreviewApp {
    /// The frame scheduler driving the demo show
    scheduler: FrameScheduler<'static, SharedStrip>,
    /// UI-side views of the two simulated devices
    strip_view: SharedStrip,
    bar_view: SharedStrip,

    /// Leaked color sources shared by the demo effects
    strip_source: &'static SourceSlot<'static>,
    chase_source: &'static SourceSlot<'static>,
    idle_source: &'static SourceSlot<'static>,

    /// Current phase of the demo show
    phase: Phase,
    /// Synthetic time in milliseconds
    t_ms: u64,
    /// Wall-clock reference for delta time
    last_frame: StdInstant,
    /// Whether animation is playing
    playing: bool,
    /// Time scale multiplier (1.0 = realtime)
    time_scale: f32,
    /// LED pixel size for display
    led_size: f32,
}

impl PreviewApp {
    fn new() -> Self {
        let strip_view = SharedStrip::new(STRIP_LEDS);
        let bar_view = SharedStrip::new(BAR_LEDS);

        let manager = StageManager::new(vec![
            StageDevice::new(STRIP, STRIP_LEDS, strip_view.clone()),
            StageDevice::new(BAR, BAR_LEDS, bar_view.clone()),
        ]);

        let strip_source = leak(StaticColor::new(Hsv::new(0.05, 1.0, 1.0)).into());
        let chase_source = leak(
            Gradient::new(Hsv::new(0.0, 0.0, 1.0), Hsv::new(0.05, 1.0, 1.0)).into(),
        );
        let idle_base = leak(
            Gradient::new(Hsv::new(0.55, 0.8, 0.4), Hsv::new(0.5, 1.0, 1.0)).into(),
        );
        let idle_source = leak(
            ScrollingColorSource::new(idle_base, 4.0)
                .mirrored()
                .into(),
        );

        let mut app = Self {
            scheduler: FrameScheduler::new(manager),
            strip_view,
            bar_view,
            strip_source,
            chase_source,
            idle_source,
            phase: Phase::Fill,
            t_ms: 0,
            last_frame: StdInstant::now(),
            playing: true,
            time_scale: 1.0,
            led_size: LED_SIZE,
        };
        app.enter_phase(Phase::Fill);
        app
    }

    /// Install the effects for a phase.
    fn enter_phase(&mut self, phase: Phase) {
        self.phase = phase;
        let stage = self.scheduler.stage_mut();
        stage.clear_all();

        match phase {
            Phase::Fill => {
                let fill = Effect::new(STRIP, STRIP_LEDS, self.strip_source, LiquidFill::new(7))
                    .with_options(EffectOptions::default().with_speed(25.0));
                let _ = stage.add_effect(fill);
            }
            Phase::Show => {
                let breath = Effect::new(
                    STRIP,
                    STRIP_LEDS,
                    self.strip_source,
                    Breathing::new(BreathingWave::Cosine { cycle_duration: 4.0 })
                        .with_levels(0.4, 1.0)
                        .with_duration(8.0),
                );
                let chase = Effect::new(
                    BAR,
                    BAR_LEDS,
                    self.chase_source,
                    Chase::new(3).with_loop_interval(0.5),
                )
                .with_options(EffectOptions::default().with_speed(20.0).with_reverse());
                let _ = stage.add_effect(breath);
                let _ = stage.add_effect(chase);
            }
            Phase::FadeOut => {
                for (device, leds) in [(STRIP, STRIP_LEDS), (BAR, BAR_LEDS)] {
                    let fade = Effect::new(
                        device,
                        leds,
                        self.strip_source,
                        Fade::new(FadeDirection::Out, 1.5),
                    );
                    let _ = stage.add_effect(fade);
                }
            }
            Phase::Idle => {
                let idle =
                    Effect::new(STRIP, STRIP_LEDS, self.idle_source, StaticBrightness::new(1.0));
                let _ = stage.add_effect(idle);
            }
        }
    }

    /// Advance the show once the blocking effects of a phase finish.
    fn advance_phases(&mut self) {
        let stage = self.scheduler.stage();
        let next = match self.phase {
            Phase::Fill if stage.is_idle(STRIP) => Some(Phase::Show),
            // The breathing layer carries a duration; the looping chase
            // on the bar never finishes, so the strip gates the phase.
            Phase::Show if stage.is_idle(STRIP) => Some(Phase::FadeOut),
            Phase::FadeOut if stage.is_idle(STRIP) && stage.is_idle(BAR) => Some(Phase::Idle),
            _ => None,
        };
        if let Some(phase) = next {
            self.enter_phase(phase);
        }
    }

    /// Restart the show from the beginning.
    fn reset_time(&mut self) {
        self.t_ms = 0;
        self.last_frame = StdInstant::now();
        self.enter_phase(Phase::Fill);
    }

    fn toggle_playing(&mut self) {
        self.playing = !self.playing;
    }

    /// Update synthetic time based on wall clock and time scale
    fn update_time(&mut self) {
        let now = StdInstant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        if self.playing {
            let delta_ms = delta.as_secs_f64() * 1000.0 * f64::from(self.time_scale);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let delta_ms = if delta_ms.is_finite() {
                delta_ms.max(0.0) as u64
            } else {
                0
            };
            self.t_ms = self.t_ms.wrapping_add(delta_ms);
        }
    }

    fn draw_strip(&self, ui: &mut egui::Ui, label: &str, view: &SharedStrip) {
        ui.label(label);
        let frame = view.frame.borrow();
        let width = frame.len() as f32 * (self.led_size + LED_GAP);
        let (response, painter) =
            ui.allocate_painter(egui::vec2(width, self.led_size), egui::Sense::hover());
        let origin = response.rect.min;
        for (i, led) in frame.iter().enumerate() {
            let x = origin.x + i as f32 * (self.led_size + LED_GAP);
            let rect = egui::Rect::from_min_size(
                egui::pos2(x, origin.y),
                egui::vec2(self.led_size, self.led_size),
            );
            painter.rect_filled(rect, 2.0, Color32::from_rgb(led.r, led.g, led.b));
        }
        ui.add_space(8.0);
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_time();

        if self.playing {
            let now = Instant::from_millis(self.t_ms);
            self.scheduler.tick(now);
            self.advance_phases();
        }

        // Request continuous repaint for animation
        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("⏮ Reset").clicked() {
                    self.reset_time();
                }
                if ui
                    .button(if self.playing { "⏸ Pause" } else { "▶ Play" })
                    .clicked()
                {
                    self.toggle_playing();
                }

                ui.add_space(8.0);

                let secs = self.t_ms / 1000;
                let ms = self.t_ms % 1000;
                ui.label(format!("Time: {secs}.{ms:03}s"));

                ui.add_space(8.0);
                ui.label(format!("Phase: {:?}", self.phase));
            });

            ui.add_space(4.0);

            ui.horizontal(|ui| {
                ui.label("Speed:");
                ui.add(egui::Slider::new(&mut self.time_scale, 0.1..=5.0).logarithmic(true));

                ui.add_space(8.0);
                ui.label("Size:");
                ui.add(egui::Slider::new(&mut self.led_size, 4.0..=32.0));
            });

            ui.add_space(16.0);

            let strip_view = self.strip_view.clone();
            let bar_view = self.bar_view.clone();
            self.draw_strip(ui, "strip (60 px)", &strip_view);
            self.draw_strip(ui, "bar (24 px)", &bar_view);
        });
    }
}
