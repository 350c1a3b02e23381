use eframe::egui;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::deck::document::ItemStyle;
use crate::deck::{Bounds, Deck, DeckOptions, Host, Key, KeyAction, PrintState};
use crate::error::HostError;
use crate::parser;
use crate::render;
use crate::theme::Palette;

const CHROME_MARGIN: f32 = 16.0;
/// Frames to wait for a print screenshot before giving up on it.
const CAPTURE_FRAME_LIMIT: u32 = 120;

pub struct RunOptions {
    pub file: PathBuf,
    pub windowed: bool,
    pub start_slide: Option<usize>,
    pub theme: Option<String>,
    pub print_to: Option<PathBuf>,
}

/// Platform services backed by the egui viewport.
///
/// Viewport commands are queued while input is being read and sent once the
/// input closure has returned (sending inside `ctx.input()` deadlocks).
#[derive(Default)]
struct EguiHost {
    /// Fullscreen state as reported by the backend, `None` if unknown.
    fullscreen: Option<bool>,
    commands: Vec<egui::ViewportCommand>,
    print_requested: bool,
}

impl Host for EguiHost {
    fn is_fullscreen(&self) -> bool {
        self.fullscreen.unwrap_or(false)
    }

    fn request_fullscreen(&mut self) -> Result<(), HostError> {
        if self.fullscreen.is_none() {
            return Err(HostError::Fullscreen(
                "the window backend does not report fullscreen support".into(),
            ));
        }
        self.commands.push(egui::ViewportCommand::Fullscreen(true));
        self.fullscreen = Some(true);
        Ok(())
    }

    fn exit_fullscreen(&mut self) {
        self.commands.push(egui::ViewportCommand::Fullscreen(false));
        self.fullscreen = Some(false);
    }

    fn print(&mut self) {
        self.print_requested = true;
    }
}

/// Where the current print capture is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrintPhase {
    Idle,
    /// Print layout is being drawn; the screenshot is requested after it.
    Layout,
    /// Waiting for the screenshot of the print layout.
    Capturing,
}

struct PresentationApp {
    deck: Deck,
    host: EguiHost,
    print_output: PathBuf,
    print_phase: PrintPhase,
    capture_frames: u32,
    last_banner: Option<Bounds>,
}

impl PresentationApp {
    fn new(deck: Deck, print_output: PathBuf) -> Self {
        Self {
            deck,
            host: EguiHost::default(),
            print_output,
            print_phase: PrintPhase::Idle,
            capture_frames: 0,
            last_banner: None,
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        let mut keys = Vec::new();

        let (print, quit, cycle_theme) = ctx.input_mut(|i| {
            self.host.fullscreen = i.viewport().fullscreen;

            let print = i.consume_key(egui::Modifiers::COMMAND, egui::Key::P);
            let quit = i.consume_key(egui::Modifiers::NONE, egui::Key::Q);
            let cycle_theme = i.consume_key(egui::Modifiers::NONE, egui::Key::T);

            // Consumed so focused widgets never see them (Space would click a button)
            for (egui_key, key) in [
                (egui::Key::ArrowRight, Key::ArrowRight),
                (egui::Key::Space, Key::Space),
                (egui::Key::ArrowLeft, Key::ArrowLeft),
                (egui::Key::Home, Key::Home),
                (egui::Key::End, Key::End),
                (egui::Key::Escape, Key::Escape),
            ] {
                if KeyAction::from_key(key).is_some()
                    && i.consume_key(egui::Modifiers::NONE, egui_key)
                {
                    keys.push(key);
                }
            }

            // Pointer drags stand in for touch gestures
            if i.pointer.primary_pressed() {
                if let Some(pos) = i.pointer.interact_pos() {
                    self.deck.touch_start(pos.x, pos.y);
                }
            }
            if i.pointer.primary_released() {
                if let Some(pos) = i.pointer.interact_pos() {
                    self.deck.touch_end(pos.x, pos.y);
                }
            }

            (print, quit, cycle_theme)
        });

        if self.deck.print_state() == PrintState::Printing {
            return;
        }

        for key in keys {
            self.deck.handle_key(key, &mut self.host);
        }
        if cycle_theme {
            self.deck.cycle_theme();
        }
        if print {
            self.deck.generate_pdf(&mut self.host);
        }
        if quit {
            self.host.commands.push(egui::ViewportCommand::Close);
        }
    }

    /// Pick up a finished print capture, or start a requested one.
    fn advance_print(&mut self, ctx: &egui::Context) {
        if self.print_phase == PrintPhase::Capturing {
            let image = ctx.input(|i| {
                i.events.iter().find_map(|event| match event {
                    egui::Event::Screenshot { image, .. } => Some(image.clone()),
                    _ => None,
                })
            });
            if let Some(image) = image {
                match render::save_color_image(&image, &self.print_output) {
                    Ok(()) => log::info!("printed deck to {}", self.print_output.display()),
                    Err(e) => log::error!("failed to write {}: {e}", self.print_output.display()),
                }
                self.deck.after_print();
                self.print_phase = PrintPhase::Idle;
            } else {
                self.capture_frames += 1;
                if self.capture_frames >= CAPTURE_FRAME_LIMIT {
                    log::warn!(
                        "no print capture after {} frames, leaving print layout",
                        self.capture_frames
                    );
                    self.deck.after_print();
                    self.print_phase = PrintPhase::Idle;
                }
            }
        }

        if self.host.print_requested && self.print_phase == PrintPhase::Idle {
            self.host.print_requested = false;
            self.deck.finish_animation();
            self.deck.before_print();
            self.print_phase = PrintPhase::Layout;
        }
    }

    fn draw_presentation(&self, ui: &egui::Ui, ctx: &egui::Context, rect: egui::Rect) {
        let palette = Palette::from_theme(self.deck.theme());
        let scale = render::compute_scale(rect);
        let pointer = ctx.input(|i| i.pointer.hover_pos());

        let deck = &self.deck;
        let current = deck.current();
        if let (Some(slide), Some(view)) = (
            deck.presentation().slides.get(current - 1),
            deck.document().slide(current),
        ) {
            if view.is_visible() {
                render::draw_slide(ui, slide, view, &palette, rect, scale, pointer);
            }
        }

        render::draw_progress(ui, rect, deck.progress().fill(), &palette);

        let document = deck.document();
        let counter = (&document.current_counter, &document.total_counter);
        if let (Some(current), Some(total)) = counter {
            let color = Palette::with_opacity(palette.foreground, 0.5);
            let galley = ui.painter().layout_no_wrap(
                format!("{current} / {total}"),
                egui::FontId::monospace(16.0),
                color,
            );
            let pos = egui::pos2(
                rect.center().x - galley.rect.width() / 2.0,
                rect.bottom() - 36.0,
            );
            ui.painter().galley(pos, galley, color);
        }

        if let Some(footer) = &deck.presentation().meta.footer {
            let color = Palette::with_opacity(palette.foreground, 0.4);
            let galley = ui.painter().layout_no_wrap(
                footer.clone(),
                egui::FontId::proportional(14.0),
                color,
            );
            let pos = egui::pos2(rect.left() + CHROME_MARGIN, rect.bottom() - 34.0);
            ui.painter().galley(pos, galley, color);
        }
    }

    /// Every visible slide stacked top to bottom, as the printed page shows them.
    fn draw_print_layout(&self, ui: &mut egui::Ui, rect: egui::Rect) {
        let palette = Palette::from_theme(self.deck.theme());
        let document = self.deck.document();
        let visible = document.visible_positions();
        if visible.is_empty() {
            return;
        }

        let gap = 8.0;
        let count = visible.len() as f32;
        let cell_height = ((rect.height() - gap * (count - 1.0)) / count)
            .min(rect.width() * 9.0 / 16.0)
            .max(1.0);
        let cell_width = cell_height * 16.0 / 9.0;
        let left = rect.center().x - cell_width / 2.0;

        for (row, position) in visible.into_iter().enumerate() {
            let (Some(slide), Some(view)) = (
                self.deck.presentation().slides.get(position - 1),
                document.slide(position),
            ) else {
                continue;
            };
            let top = rect.top() + row as f32 * (cell_height + gap);
            let cell = egui::Rect::from_min_size(
                egui::pos2(left, top),
                egui::vec2(cell_width, cell_height),
            );
            render::draw_background(ui, cell, &palette);
            let child = ui.new_child(
                egui::UiBuilder::new()
                    .max_rect(cell)
                    .id_salt(("print_slide", position)),
            );
            // Paper has no entry animation
            let mut view = view.clone();
            view.items.fill(ItemStyle::VISIBLE);
            let scale = render::compute_scale(cell);
            render::draw_slide(&child, slide, &view, &palette, cell, scale, None);
        }
    }

    fn draw_banner(&mut self, ctx: &egui::Context, screen: egui::Rect, palette: &Palette) {
        let Some(text) = self.deck.document().banner.as_ref().map(|b| b.text.clone()) else {
            return;
        };
        let response = egui::Area::new(egui::Id::new("banner"))
            .anchor(
                egui::Align2::RIGHT_TOP,
                egui::vec2(-CHROME_MARGIN, CHROME_MARGIN),
            )
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(Palette::with_opacity(palette.surface, 0.85))
                    .stroke(egui::Stroke::new(1.0, Palette::with_opacity(palette.primary, 0.6)))
                    .corner_radius(8.0)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(text).color(palette.foreground));
                    });
            })
            .response;

        let bounds = Bounds {
            top: response.rect.top(),
            right: screen.right() - response.rect.right(),
            width: response.rect.width(),
            height: response.rect.height(),
        };
        if self.last_banner != Some(bounds) {
            self.last_banner = Some(bounds);
            self.deck.on_resize(Some(bounds));
        }
    }

    fn draw_navigation(&mut self, ctx: &egui::Context) {
        let document = self.deck.document();
        let Some(nav) = document.navigation else {
            return;
        };
        let prev_enabled = document.prev_button.is_some_and(|b| !b.disabled);
        let next_enabled = document.next_button.is_some_and(|b| !b.disabled);
        let has_prev = document.prev_button.is_some();
        let has_next = document.next_button.is_some();

        let mut go_prev = false;
        let mut go_next = false;
        egui::Area::new(egui::Id::new("navigation"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-nav.right, nav.top))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if has_prev {
                        go_prev = ui
                            .add_enabled(prev_enabled, egui::Button::new("\u{25C0} Prev"))
                            .clicked();
                    }
                    if has_next {
                        go_next = ui
                            .add_enabled(next_enabled, egui::Button::new("Next \u{25B6}"))
                            .clicked();
                    }
                });
            });

        if go_prev {
            self.deck.previous_slide();
        }
        if go_next {
            self.deck.next_slide();
        }
    }
}

impl eframe::App for PresentationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.advance_print(ctx);
        if self.print_phase == PrintPhase::Idle {
            self.handle_input(ctx);
            self.advance_print(ctx);
        }

        for cmd in self.host.commands.drain(..) {
            ctx.send_viewport_cmd(cmd);
        }

        if self.deck.tick(Instant::now()) {
            ctx.request_repaint();
        }

        let palette = Palette::from_theme(self.deck.theme());
        let printing = self.deck.print_state() == PrintState::Printing;

        let screen = egui::CentralPanel::default()
            .frame(egui::Frame::new().inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                if printing {
                    ui.painter().rect_filled(rect, 0.0, egui::Color32::WHITE);
                    self.draw_print_layout(ui, rect);
                } else {
                    render::draw_background(ui, rect, &palette);
                    self.draw_presentation(ui, ctx, rect);
                }
                rect
            })
            .inner;

        if !printing {
            self.draw_banner(ctx, screen, &palette);
            self.draw_navigation(ctx);
        }

        if self.print_phase == PrintPhase::Layout {
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            self.print_phase = PrintPhase::Capturing;
            self.capture_frames = 0;
        }
        if self.print_phase != PrintPhase::Idle {
            ctx.request_repaint();
        }
    }
}

fn log_controls() {
    log::info!("presentation ready");
    log::info!("controls:");
    log::info!("  \u{2190} \u{2192}      navigate slides");
    log::info!("  Space    next slide");
    log::info!("  Home/End first/last slide");
    log::info!("  Escape   toggle fullscreen");
    log::info!("  Ctrl+P   print deck");
    log::info!("  T        cycle theme");
    log::info!("  Q        quit");
}

pub fn run(options: RunOptions) -> anyhow::Result<()> {
    let presentation = parser::load(&options.file)?;
    let config = Config::load_or_default();

    let deck_options = DeckOptions {
        start_slide: options.start_slide.or(config.start_slide()).unwrap_or(1),
        theme_override: options.theme,
        default_theme: config.default_theme().map(str::to_string),
    };
    let print_output = options.print_to.unwrap_or_else(|| config.print_output());

    let title = presentation.meta.title.clone().unwrap_or_else(|| {
        format!(
            "slidedeck - {}",
            options.file.file_name().unwrap_or_default().to_string_lossy()
        )
    });

    let deck = Deck::new(presentation, &deck_options)?;
    log::debug!(
        "{} slides, starting at {}, theme {}",
        deck.total(),
        deck.current(),
        deck.theme().name
    );
    log_controls();

    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native_options,
        Box::new(move |_cc| Ok(Box::new(PresentationApp::new(deck, print_output)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_at(slide: usize) -> PresentationApp {
        let presentation = parser::parse("# One\n\n# Two\n\n# Three\n\n# Four").unwrap();
        let options = DeckOptions {
            start_slide: slide,
            ..DeckOptions::default()
        };
        let deck = Deck::new(presentation, &options).unwrap();
        PresentationApp::new(deck, PathBuf::from("print.png"))
    }

    fn key(key: egui::Key, modifiers: egui::Modifiers) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        }
    }

    fn button(pos: egui::Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        }
    }

    /// Input handling plus the widgets that could also react to the input.
    fn frame(ctx: &egui::Context, app: &mut PresentationApp, events: Vec<egui::Event>) {
        let input = egui::RawInput {
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            app.handle_input(ctx);
            app.draw_navigation(ctx);
        });
    }

    #[test]
    fn test_space_on_focused_button_advances_once() {
        let ctx = egui::Context::default();
        let mut app = app_at(2);
        frame(&ctx, &mut app, vec![]);
        for _ in 0..2 {
            frame(&ctx, &mut app, vec![key(egui::Key::Tab, egui::Modifiers::NONE)]);
        }

        frame(&ctx, &mut app, vec![key(egui::Key::Space, egui::Modifiers::NONE)]);
        assert_eq!(app.deck.current(), 3);
    }

    #[test]
    fn test_mapped_keys_are_consumed() {
        let ctx = egui::Context::default();
        let mut app = app_at(1);
        let input = egui::RawInput {
            events: vec![
                key(egui::Key::ArrowRight, egui::Modifiers::NONE),
                key(egui::Key::A, egui::Modifiers::NONE),
            ],
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            app.handle_input(ctx);
            assert!(!ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)));
            assert!(ctx.input(|i| i.key_pressed(egui::Key::A)));
        });
        assert_eq!(app.deck.current(), 2);
    }

    #[test]
    fn test_print_shortcut_does_not_swallow_swipe() {
        let ctx = egui::Context::default();
        let mut app = app_at(2);
        let start = egui::pos2(400.0, 300.0);
        let end = egui::pos2(340.0, 300.0);

        frame(
            &ctx,
            &mut app,
            vec![egui::Event::PointerMoved(start), button(start, true)],
        );
        frame(
            &ctx,
            &mut app,
            vec![
                egui::Event::PointerMoved(end),
                key(egui::Key::P, egui::Modifiers::COMMAND),
                button(end, false),
            ],
        );

        assert!(app.host.print_requested);
        assert_eq!(app.deck.current(), 3);
    }

    #[test]
    fn test_stalled_capture_leaves_print_layout() {
        let ctx = egui::Context::default();
        let mut app = app_at(2);
        app.host.print_requested = true;

        let _ = ctx.run(egui::RawInput::default(), |ctx| app.advance_print(ctx));
        assert_eq!(app.print_phase, PrintPhase::Layout);
        assert_eq!(app.deck.print_state(), PrintState::Printing);

        app.print_phase = PrintPhase::Capturing;
        for _ in 0..CAPTURE_FRAME_LIMIT - 1 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| app.advance_print(ctx));
        }
        assert_eq!(app.deck.print_state(), PrintState::Printing);

        let _ = ctx.run(egui::RawInput::default(), |ctx| app.advance_print(ctx));
        assert_eq!(app.print_phase, PrintPhase::Idle);
        assert_eq!(app.deck.print_state(), PrintState::Normal);
        assert_eq!(app.deck.document().visible_positions(), vec![2]);
        assert_eq!(app.deck.current(), 2);
    }

    #[test]
    fn test_print_layout_renders_in_panel() {
        let ctx = egui::Context::default();
        let mut app = app_at(3);
        app.deck.before_print();

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let rect = ui.max_rect();
                app.draw_print_layout(ui, rect);
            });
        });
        assert_eq!(app.deck.document().visible_positions(), vec![1, 2, 3, 4]);
    }
}
