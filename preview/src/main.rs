//! Desktop preview for the fractured-light show
//!
//! Runs the demo playlist on a simulated installation and draws every line as
//! a vertical column. Interrupts are queued through the same request channel
//! the firmware uses.

use std::time::Instant as StdInstant;

use eframe::egui::{self};
use rand::{Rng, seq::SliceRandom};
use fractured_light::{
    Duration, FrameScheduler, Instant, InterruptRequest, LineLayout, OutputDriver, Palette,
    PatternInstance, PatternType, Program, ProgramConfig, RequestChannel, RequestSender, Rgb,
    Segment,
    color::{
        WHITE,
        named::{BLUE, CYAN, GREEN, MAGENTA, ORANGE, PINK, PURPLE, RED, TEAL, YELLOW},
    },
    pattern::{
        BreathingParams, FlameParams, FlashbulbParams, GrowParams, PopParams, SpinParams,
    },
};

/// Number of lines of the simulated installation
const LINES: u8 = 8;

/// LEDs per line, shorter than the real strips so the window stays readable
const LEDS_PER_LINE: u16 = 60;

/// Size of each LED rectangle in pixels
const LED_SIZE: f32 = 8.0;

/// Gap between LEDs
const LED_GAP: f32 = 2.0;

/// Request channel size
const REQUEST_CHANNEL_SIZE: usize = 4;

/// Static request channel between the UI and the render loop
static REQUESTS: RequestChannel<REQUEST_CHANNEL_SIZE> = RequestChannel::new();

const ALL_LINES: [u8; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

/// Time between automatic pop interrupts
const AUTO_INTERRUPT_PERIOD_MS: u64 = 5000;

/// Keeps the last frame written by the scheduler
#[derive(Default)]
struct FrameCapture {
    frame: Vec<Rgb>,
}

impl OutputDriver for FrameCapture {
    fn write(&mut self, colors: &[Rgb]) {
        self.frame.clear();
        self.frame.extend_from_slice(colors);
    }
}

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 800.0])
            .with_title("Fractured Light Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "fractured-light-preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new()))),
    )
}

fn demo_playlist(program: &mut Program) {
    let spin = SpinParams {
        speed: 75,
        separation: 20,
        span: 15,
        palette: Palette::new(&[RED, BLUE, GREEN, YELLOW]),
        looping: true,
        continuous: true,
        blend: true,
    };
    let breathing = BreathingParams {
        speed: 50,
        palette: Palette::new(&[PURPLE, MAGENTA, BLUE, CYAN]),
    };
    let flame = FlameParams {
        speed: 80,
        cooling: 55,
        sparking: 120,
        warm_base: false,
    };
    let grow = GrowParams {
        speed: 60,
        n: 1,
        fade_delay: Duration::from_millis(100),
        hold_delay: Duration::from_millis(2000),
        palette: Palette::new(&[CYAN, BLUE, PURPLE, MAGENTA, RED, ORANGE]),
        transition_speed: 40,
        offset_delay: Duration::from_millis(1000),
    };
    let mixed = vec![
        PatternInstance::new(
            BreathingParams {
                speed: 60,
                palette: Palette::new(&[Rgb { r: 0, g: 255, b: 128 }, GREEN, TEAL]),
            },
            &[0, 1, 2],
        ),
        PatternInstance::new(
            FlameParams {
                speed: 90,
                cooling: 60,
                sparking: 130,
                warm_base: false,
            },
            &[3, 4, 5],
        ),
        PatternInstance::new(grow.clone(), &[6, 7]),
    ];
    let pop = PopParams {
        speed: 10,
        hold_delay: Duration::from_millis(300),
        palette: Palette::new(&[RED, ORANGE, YELLOW, GREEN, BLUE, PURPLE, PINK, WHITE]),
        random: true,
        acceleration_time: Duration::from_secs(8),
    };

    let segments = [
        Segment::single(spin, &ALL_LINES, Duration::from_secs(15)),
        Segment::single(breathing, &ALL_LINES, Duration::from_secs(10)),
        Segment::new(
            vec![PatternInstance::new(flame, &ALL_LINES).with_reverse(true)],
            Duration::from_secs(10),
        ),
        Segment::new(
            vec![PatternInstance::new(grow, &ALL_LINES).with_reverse(true)],
            Duration::from_secs(10),
        ),
        Segment::with_seconds(mixed, 5),
        Segment::single(pop, &ALL_LINES, Duration::from_secs(20)),
    ];
    for (index, segment) in segments.into_iter().enumerate() {
        let _ = program.add_segment(index, segment);
    }
}

struct PreviewApp {
    scheduler: FrameScheduler<'static, FrameCapture, REQUEST_CHANNEL_SIZE>,
    requests: RequestSender<'static, REQUEST_CHANNEL_SIZE>,

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

    /// Pattern of the next interrupt
    interrupt_pattern: PatternType,
    /// Interrupt duration in milliseconds
    interrupt_ms: u64,
    /// Lines the next interrupt runs on
    interrupt_lines: [bool; LINES as usize],
    /// Message from the last trigger attempt
    status: String,
    /// Fire a random pop interrupt every few seconds
    auto_interrupts: bool,
    /// Synthetic time of the last automatic interrupt
    last_auto_ms: u64,
}

impl PreviewApp {
    fn new() -> Self {
        let config = ProgramConfig {
            layout: LineLayout::new(LINES, 1, LEDS_PER_LINE).unwrap_or_default(),
            ..ProgramConfig::default()
        };
        let mut program = Program::new(config, 6);
        demo_playlist(&mut program);
        program.start(Instant::from_millis(0));

        let scheduler = FrameScheduler::new(program, REQUESTS.receiver(), FrameCapture::default());

        Self {
            scheduler,
            requests: REQUESTS.sender(),
            t_ms: 0,
            last_frame: StdInstant::now(),
            playing: true,
            time_scale: 1.0,
            led_size: LED_SIZE,
            interrupt_pattern: PatternType::Pop,
            interrupt_ms: 4000,
            interrupt_lines: [true; LINES as usize],
            status: String::new(),
            auto_interrupts: false,
            last_auto_ms: 0,
        }
    }

    /// Pop on one to four random lines with randomized timing
    fn send_auto_interrupt(&mut self) {
        let mut rng = rand::thread_rng();

        let mut lines: Vec<u8> = (0..LINES).collect();
        lines.shuffle(&mut rng);
        lines.truncate(rng.gen_range(1..=4));

        let params = PopParams {
            speed: rng.gen_range(5..20),
            hold_delay: Duration::from_millis(rng.gen_range(200..500)),
            palette: Palette::new(&[RED, ORANGE, YELLOW, GREEN, BLUE, PURPLE, PINK, WHITE]),
            random: true,
            acceleration_time: Duration::from_secs(rng.gen_range(3..8)),
        };
        let duration = Duration::from_millis(rng.gen_range(2000..6000));
        let request = InterruptRequest::new(params, &lines, duration);
        self.status = match self.requests.try_send(request) {
            Ok(()) => format!("queued auto pop on {lines:?}"),
            Err(_) => "request queue is full".to_string(),
        };
    }

    fn poll_auto_interrupt(&mut self) {
        if !self.auto_interrupts {
            self.last_auto_ms = self.t_ms;
            return;
        }
        if self.t_ms.saturating_sub(self.last_auto_ms) >= AUTO_INTERRUPT_PERIOD_MS {
            self.last_auto_ms = self.t_ms;
            self.send_auto_interrupt();
        }
    }

    /// Queue an interrupt with the pattern's default parameters
    fn send_interrupt(&mut self) {
        let lines: Vec<u8> = (0..LINES)
            .filter(|&line| self.interrupt_lines[line as usize])
            .collect();
        let request = InterruptRequest::with_defaults(
            self.interrupt_pattern,
            &lines,
            Duration::from_millis(self.interrupt_ms),
        );
        self.status = match self.requests.try_send(request) {
            Ok(()) => format!("queued {}", self.interrupt_pattern.as_str()),
            Err(_) => "request queue is full".to_string(),
        };
    }

    /// Flash every selected line
    fn send_flashbulb(&mut self) {
        let lines: Vec<u8> = (0..LINES)
            .filter(|&line| self.interrupt_lines[line as usize])
            .collect();
        let params = FlashbulbParams {
            flash_duration: Duration::from_millis(100),
            fade_duration: Duration::from_millis(400),
            transition_duration: Duration::from_millis(1000),
        };
        let request = InterruptRequest::new(params, &lines, Duration::from_millis(0));
        self.status = match self.requests.try_send(request) {
            Ok(()) => "queued flashbulb".to_string(),
            Err(_) => "request queue is full".to_string(),
        };
    }

    /// Update synthetic time based on wall clock and time scale
    fn update_time(&mut self) {
        let now = StdInstant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        if self.playing {
            let delta_ms_f64 = delta.as_secs_f64() * 1000.0 * f64::from(self.time_scale);
            let delta_ms_f64 = if delta_ms_f64.is_finite() {
                #[allow(clippy::cast_precision_loss)]
                delta_ms_f64.clamp(0.0, u64::MAX as f64)
            } else {
                0.0
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let delta_ms = delta_ms_f64 as u64;
            self.t_ms = self.t_ms.wrapping_add(delta_ms);
        }
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_time();
        self.poll_auto_interrupt();
        if self.playing {
            self.scheduler.tick(Instant::from_millis(self.t_ms));
        }
        let frame = self.scheduler.output().frame.clone();

        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                // <PlaybackControls>
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        if ui
                            .button(if self.playing { "⏸ Pause" } else { "▶ Play" })
                            .clicked()
                        {
                            self.playing = !self.playing;
                        }
                    });

                    ui.add_space(4.0);

                    let secs = self.t_ms / 1000;
                    let ms = self.t_ms % 1000;
                    ui.label(format!("Time: {secs}.{ms:03}s"));

                    let program = self.scheduler.program();
                    ui.label(format!(
                        "Segment: {} / {}",
                        program.current_index() + 1,
                        program.slot_count()
                    ));
                    ui.label(format!("Interrupt: {:?}", program.interrupt_state()));

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        ui.label("Speed:");
                        ui.add(egui::Slider::new(&mut self.time_scale, 0.1..=5.0).logarithmic(true));
                    });
                    ui.horizontal(|ui| {
                        ui.label("Size: ");
                        ui.add(egui::Slider::new(&mut self.led_size, 2.0..=24.0));
                    });
                });
                // </PlaybackControls>
                ui.add_space(16.0);
                // <InterruptControls>
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label("Interrupt:");
                        egui::ComboBox::from_id_salt("interrupt_pattern")
                            .selected_text(self.interrupt_pattern.as_str())
                            .show_ui(ui, |ui| {
                                for pattern in [
                                    PatternType::Breathing,
                                    PatternType::Flame,
                                    PatternType::Grow,
                                    PatternType::Chase,
                                    PatternType::Pop,
                                    PatternType::Spin,
                                ] {
                                    ui.selectable_value(
                                        &mut self.interrupt_pattern,
                                        pattern,
                                        pattern.as_str(),
                                    );
                                }
                            });
                        ui.add(
                            egui::DragValue::new(&mut self.interrupt_ms)
                                .range(0u64..=60_000u64)
                                .suffix(" ms"),
                        );
                    });

                    ui.horizontal(|ui| {
                        ui.label("Lines:");
                        for (line, selected) in self.interrupt_lines.iter_mut().enumerate() {
                            ui.checkbox(selected, line.to_string());
                        }
                    });

                    ui.horizontal(|ui| {
                        if ui.button("Trigger").clicked() {
                            self.send_interrupt();
                        }
                        if ui.button("Flashbulb").clicked() {
                            self.send_flashbulb();
                        }
                        ui.checkbox(&mut self.auto_interrupts, "Auto pops");
                        ui.label(&self.status);
                    });
                });
                // </InterruptControls>
            });

            ui.add_space(16.0);

            // === LED Display ===
            let led_pitch = self.led_size + LED_GAP;
            let per_line = usize::from(LEDS_PER_LINE);
            let line_pitch = led_pitch * 4.0;

            #[allow(clippy::cast_precision_loss)]
            let size = egui::vec2(
                f32::from(LINES) * line_pitch,
                per_line as f32 * led_pitch,
            );
            let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
            let origin = response.rect.min;

            #[allow(clippy::cast_precision_loss)]
            for (line, pixels) in frame.chunks(per_line).enumerate() {
                for (offset, pixel) in pixels.iter().enumerate() {
                    let x = origin.x + line as f32 * line_pitch;
                    let y = origin.y + offset as f32 * led_pitch;

                    let rect = egui::Rect::from_min_size(
                        egui::pos2(x, y),
                        egui::vec2(self.led_size, self.led_size),
                    );
                    let color = egui::Color32::from_rgb(pixel.r, pixel.g, pixel.b);
                    painter.rect_filled(rect, 2.0, color);
                }
            }
        });
    }
}
