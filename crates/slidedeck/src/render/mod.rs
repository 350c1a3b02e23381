use eframe::egui::{self, Color32, FontId, Pos2, Rect};
use std::path::Path;

use crate::deck::document::{ItemStyle, SlideView};
use crate::parser::{Block, Slide};
use crate::theme::Palette;

const REF_WIDTH: f32 = 1920.0;
const REF_HEIGHT: f32 = 1080.0;
const PROGRESS_HEIGHT: f32 = 4.0;
const HOVER_LIFT: f32 = 5.0;
const HOVER_GROW: f32 = 1.02;

pub fn compute_scale(rect: Rect) -> f32 {
    (rect.width() / REF_WIDTH).min(rect.height() / REF_HEIGHT)
}

/// Fill `rect` with the theme's diagonal (135deg) background gradient.
pub fn draw_background(ui: &egui::Ui, rect: Rect, palette: &Palette) {
    let mid = lerp_color(palette.background_start, palette.background_end, 0.5);
    let mut mesh = egui::Mesh::default();
    mesh.colored_vertex(rect.left_top(), palette.background_start);
    mesh.colored_vertex(rect.right_top(), mid);
    mesh.colored_vertex(rect.left_bottom(), mid);
    mesh.colored_vertex(rect.right_bottom(), palette.background_end);
    mesh.add_triangle(0, 2, 1);
    mesh.add_triangle(1, 2, 3);
    ui.painter().add(egui::Shape::mesh(mesh));
}

/// Thin completion bar along the top edge of `rect`.
pub fn draw_progress(ui: &egui::Ui, rect: Rect, fill: f32, palette: &Palette) {
    let track = Rect::from_min_size(rect.min, egui::vec2(rect.width(), PROGRESS_HEIGHT));
    ui.painter()
        .rect_filled(track, 0.0, Palette::with_opacity(palette.primary, 0.2));

    let width = rect.width() * fill.clamp(0.0, 1.0);
    if width <= 0.0 {
        return;
    }
    let bar = Rect::from_min_size(rect.min, egui::vec2(width, PROGRESS_HEIGHT));
    let mut mesh = egui::Mesh::default();
    mesh.colored_vertex(bar.left_top(), palette.primary);
    mesh.colored_vertex(bar.right_top(), palette.secondary);
    mesh.colored_vertex(bar.left_bottom(), palette.primary);
    mesh.colored_vertex(bar.right_bottom(), palette.secondary);
    mesh.add_triangle(0, 2, 1);
    mesh.add_triangle(1, 2, 3);
    ui.painter().add(egui::Shape::mesh(mesh));
}

/// Draw one slide's content into `rect`.
///
/// Animatable items take their opacity and offset from `view`. When
/// `pointer` hovers an item it is lifted slightly.
pub fn draw_slide(
    ui: &egui::Ui,
    slide: &Slide,
    view: &SlideView,
    palette: &Palette,
    rect: Rect,
    scale: f32,
    pointer: Option<Pos2>,
) {
    let padding = 96.0 * scale;
    let content = rect.shrink(padding);
    let width = content.width();
    let mut y = content.top();
    let mut item_index = 0;

    for block in &slide.blocks {
        if y > content.bottom() {
            break;
        }
        match block {
            Block::Heading { level, text } => {
                let (size, color) = match level {
                    1 => (72.0, palette.foreground),
                    2 => (52.0, palette.primary),
                    _ => (40.0, palette.secondary),
                };
                let font = FontId::proportional(size * scale);
                let h = draw_text(ui, text, font, color, content.left(), y, width);
                y += h + 36.0 * scale;
            }
            Block::Paragraph { text } => {
                let font = FontId::proportional(32.0 * scale);
                let h = draw_text(ui, text, font, palette.muted, content.left(), y, width);
                y += h + 24.0 * scale;
            }
            Block::Item { ordinal, text } => {
                let style = view
                    .items
                    .get(item_index)
                    .copied()
                    .unwrap_or(ItemStyle::VISIBLE);
                item_index += 1;
                let label = match ordinal {
                    Some(n) => format!("{n}. {text}"),
                    None => text.clone(),
                };
                let slot = (content.left(), y, width);
                let h = draw_item(ui, &label, style, palette, slot, scale, pointer);
                y += h + 14.0 * scale;
            }
            Block::Quote { text } => {
                let font = FontId::proportional(34.0 * scale);
                let x = content.left() + 24.0 * scale;
                let h = draw_text(ui, text, font, palette.foreground, x, y, width - 24.0 * scale);
                let bar = Rect::from_min_size(
                    Pos2::new(content.left(), y),
                    egui::vec2(4.0 * scale, h),
                );
                ui.painter().rect_filled(bar, 2.0 * scale, palette.primary);
                y += h + 24.0 * scale;
            }
            Block::Code { code, .. } => {
                let font = FontId::monospace(24.0 * scale);
                let inset = 20.0 * scale;
                let galley = ui.painter().layout(
                    code.clone(),
                    font,
                    palette.foreground,
                    width - inset * 2.0,
                );
                let frame = Rect::from_min_size(
                    Pos2::new(content.left(), y),
                    egui::vec2(width, galley.rect.height() + inset * 2.0),
                );
                ui.painter().rect_filled(
                    frame,
                    8.0 * scale,
                    Palette::with_opacity(palette.surface, 0.8),
                );
                ui.painter().galley(
                    Pos2::new(frame.left() + inset, frame.top() + inset),
                    galley,
                    palette.foreground,
                );
                y += frame.height() + 24.0 * scale;
            }
        }
    }
}

fn draw_text(
    ui: &egui::Ui,
    text: &str,
    font: FontId,
    color: Color32,
    x: f32,
    y: f32,
    width: f32,
) -> f32 {
    let galley = ui.painter().layout(text.to_string(), font, color, width);
    let height = galley.rect.height();
    ui.painter().galley(Pos2::new(x, y), galley, color);
    height
}

/// `slot` is the item's `(x, y, width)` in the slide's flow.
fn draw_item(
    ui: &egui::Ui,
    text: &str,
    style: ItemStyle,
    palette: &Palette,
    slot: (f32, f32, f32),
    scale: f32,
    pointer: Option<Pos2>,
) -> f32 {
    let (x, y, width) = slot;
    let inset = 18.0 * scale;
    let base_size = 30.0 * scale;
    let natural = ui.painter().layout(
        text.to_string(),
        FontId::proportional(base_size),
        palette.foreground,
        width - inset * 3.0,
    );
    let height = natural.rect.height() + inset * 2.0;
    let slot = Rect::from_min_size(Pos2::new(x, y), egui::vec2(width, height));

    if style.opacity <= 0.0 {
        return height;
    }

    let hovered = style.opacity >= 1.0 && pointer.is_some_and(|p| slot.contains(p));
    let (lift, grow) = if hovered {
        (HOVER_LIFT * scale, HOVER_GROW)
    } else {
        (0.0, 1.0)
    };

    let card = slot.translate(egui::vec2(0.0, style.offset_y * scale - lift));
    let card = Rect::from_center_size(card.center(), card.size() * grow);
    ui.painter().rect_filled(
        card,
        10.0 * scale,
        Palette::with_opacity(palette.surface, 0.55 * style.opacity),
    );
    let accent = Rect::from_min_size(card.min, egui::vec2(5.0 * scale, card.height()));
    ui.painter().rect_filled(
        accent,
        2.0 * scale,
        Palette::with_opacity(palette.primary, style.opacity),
    );

    let color = Palette::with_opacity(palette.foreground, style.opacity);
    let galley = ui.painter().layout(
        text.to_string(),
        FontId::proportional(base_size * grow),
        color,
        card.width() - inset * 3.0,
    );
    ui.painter().galley(
        Pos2::new(card.left() + inset * 1.5, card.top() + inset),
        galley,
        color,
    );
    height
}

/// Write a captured frame to `path` as PNG.
pub fn save_color_image(image: &egui::ColorImage, path: &Path) -> image::ImageResult<()> {
    let width = image.width() as u32;
    let height = image.height() as u32;
    let pixels: Vec<u8> = image
        .pixels
        .iter()
        .flat_map(|c| [c.r(), c.g(), c.b(), c.a()])
        .collect();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    image::save_buffer(path, &pixels, width, height, image::ColorType::Rgba8)
}

fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_scale_fits_reference_frame() {
        let full = Rect::from_min_size(Pos2::ZERO, egui::vec2(1920.0, 1080.0));
        assert_eq!(compute_scale(full), 1.0);
        let tall = Rect::from_min_size(Pos2::ZERO, egui::vec2(960.0, 1080.0));
        assert_eq!(compute_scale(tall), 0.5);
    }

    #[test]
    fn test_save_color_image_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shots").join("frame.png");
        let image = egui::ColorImage::from_rgba_unmultiplied([4, 2], &[255, 0, 0, 255].repeat(8));
        save_color_image(&image, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_lerp_color_midpoint() {
        let a = Color32::from_rgb(0, 100, 200);
        let b = Color32::from_rgb(100, 200, 0);
        assert_eq!(lerp_color(a, b, 0.5), Color32::from_rgb(50, 150, 100));
        assert_eq!(lerp_color(a, b, 0.0), a);
    }
}
