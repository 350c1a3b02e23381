use std::path::PathBuf;

use eframe::egui;

use crate::config::Config;
use crate::deck::{Deck, DeckOptions};
use crate::parser::{self, Slide};
use crate::render;
use crate::theme::Palette;

/// Steps through the deck one slide per captured frame.
struct ExportApp {
    deck: Deck,
    output_dir: PathBuf,
    position: usize,
    screenshot_requested: bool,
    done: bool,
}

impl ExportApp {
    fn new(mut deck: Deck, output_dir: PathBuf) -> Self {
        deck.go_to_slide(1);
        deck.finish_animation();
        Self {
            deck,
            output_dir,
            position: 1,
            screenshot_requested: false,
            done: false,
        }
    }

    fn save_frame(&self, image: &egui::ColorImage) {
        let filename = format!("slide-{:02}.png", self.position);
        let path = self.output_dir.join(&filename);
        match render::save_color_image(image, &path) {
            Ok(()) => log::info!("  Saved {filename}"),
            Err(e) => log::error!("Failed to save {}: {e}", path.display()),
        }
    }
}

impl eframe::App for ExportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.done {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        let image = ctx.input(|i| {
            i.events.iter().find_map(|event| match event {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });

        if let Some(image) = image {
            self.save_frame(&image);
            self.screenshot_requested = false;
            if self.position >= self.deck.total() {
                self.done = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }
            self.position += 1;
            self.deck.go_to_slide(self.position);
            // Exported frames show every item in its final place
            self.deck.finish_animation();
        }

        let palette = Palette::from_theme(self.deck.theme());

        egui::CentralPanel::default()
            .frame(egui::Frame::new().inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                render::draw_background(ui, rect, &palette);

                let scale = render::compute_scale(rect);
                let deck = &self.deck;
                if let (Some(slide), Some(view)) = (
                    deck.presentation().slides.get(self.position - 1),
                    deck.document().slide(self.position),
                ) {
                    render::draw_slide(ui, slide, view, &palette, rect, scale, None);
                }
                render::draw_progress(ui, rect, deck.progress().fill(), &palette);
            });

        // Request screenshot after rendering (will arrive next frame)
        if !self.screenshot_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            self.screenshot_requested = true;
        }

        ctx.request_repaint();
    }
}

pub fn run(file: PathBuf, output_dir: PathBuf, width: u32, height: u32) -> anyhow::Result<()> {
    let presentation = parser::load(&file)?;
    let config = Config::load_or_default();
    let options = DeckOptions {
        default_theme: config.default_theme().map(str::to_string),
        ..DeckOptions::default()
    };

    std::fs::create_dir_all(&output_dir)?;

    let title = presentation
        .meta
        .title
        .as_deref()
        .or_else(|| presentation.slides.first().and_then(Slide::title))
        .unwrap_or("slidedeck export")
        .to_string();
    let deck = Deck::new(presentation, &options)?;

    log::info!(
        "Exporting {} slides to {} ({}x{})",
        deck.total(),
        output_dir.display(),
        width,
        height,
    );

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([width as f32, height as f32])
        .with_title(&title)
        .with_decorations(false);

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native_options,
        Box::new(move |_cc| Ok(Box::new(ExportApp::new(deck, output_dir)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    log::info!("Export complete.");
    Ok(())
}
