use std::fmt;

use eframe::egui::Color32;

use crate::deck::Document;

pub const PRIMARY_VAR: &str = "--primary-color";
pub const SECONDARY_VAR: &str = "--secondary-color";
pub const DEFAULT_THEME: &str = "network";

/// A two-stop linear gradient, rendered as CSS-like text when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub angle: u16,
    pub start: &'static str,
    pub end: &'static str,
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "linear-gradient({}deg, {} 0%, {} 100%)",
            self.angle, self.start, self.end
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub background: Gradient,
}

pub static THEMES: [Theme; 3] = [
    Theme {
        name: "network",
        primary: "#3b82f6",
        secondary: "#06b6d4",
        background: Gradient {
            angle: 135,
            start: "#0f172a",
            end: "#1e293b",
        },
    },
    Theme {
        name: "cyber",
        primary: "#10b981",
        secondary: "#059669",
        background: Gradient {
            angle: 135,
            start: "#064e3b",
            end: "#065f46",
        },
    },
    Theme {
        name: "corporate",
        primary: "#6366f1",
        secondary: "#8b5cf6",
        background: Gradient {
            angle: 135,
            start: "#1e1b4b",
            end: "#312e81",
        },
    },
];

pub const THEME_NAMES: [&str; 3] = ["network", "cyber", "corporate"];

impl Theme {
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        THEMES.iter().find(|t| t.name == name)
    }
}

/// Tracks which catalog theme is applied to the document root.
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    active: &'static Theme,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self { active: &THEMES[0] }
    }
}

impl ThemeRegistry {
    pub fn active(&self) -> &'static Theme {
        self.active
    }

    /// Apply a theme by name. Unknown names leave the document untouched.
    pub fn apply_theme(&mut self, name: &str, document: &mut Document) -> bool {
        let Some(theme) = Theme::by_name(name) else {
            log::debug!("ignoring unknown theme {name:?}");
            return false;
        };

        document.set_root_var(PRIMARY_VAR, theme.primary);
        document.set_root_var(SECONDARY_VAR, theme.secondary);
        document.body_background = Some(theme.background.to_string());
        self.active = theme;
        log::info!("theme: {}", theme.name);
        true
    }

    /// Apply the theme that follows the active one in catalog order.
    pub fn cycle(&mut self, document: &mut Document) -> &'static Theme {
        let idx = THEMES
            .iter()
            .position(|t| t.name == self.active.name)
            .unwrap_or(0);
        let next = THEMES[(idx + 1) % THEMES.len()].name;
        self.apply_theme(next, document);
        self.active
    }
}

/// Render colors resolved from a theme's opaque color strings.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub primary: Color32,
    pub secondary: Color32,
    pub background_start: Color32,
    pub background_end: Color32,
    pub foreground: Color32,
    pub muted: Color32,
    pub surface: Color32,
}

const FALLBACK: Color32 = Color32::from_rgb(0x64, 0x74, 0x8B);

impl Palette {
    pub fn from_theme(theme: &Theme) -> Self {
        let color = |s: &str| parse_hex_color(s).unwrap_or(FALLBACK);
        Self {
            primary: color(theme.primary),
            secondary: color(theme.secondary),
            background_start: color(theme.background.start),
            background_end: color(theme.background.end),
            foreground: Color32::from_rgb(0xF1, 0xF5, 0xF9),
            muted: Color32::from_rgb(0x94, 0xA3, 0xB8),
            surface: Color32::from_rgb(0x0F, 0x17, 0x2A),
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(
            color.r(),
            color.g(),
            color.b(),
            (opacity.clamp(0.0, 1.0) * 255.0) as u8,
        )
    }
}

/// Parse `#rgb` or `#rrggbb`. Anything else yields `None`.
pub fn parse_hex_color(s: &str) -> Option<Color32> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |h: &str| u8::from_str_radix(h, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = channel(&c.to_string())?;
                rgb[i] = v * 17;
            }
            Some(Color32::from_rgb(rgb[0], rgb[1], rgb[2]))
        }
        6 => Some(Color32::from_rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_known_theme_sets_root_vars() {
        let mut doc = Document::with_slides(2);
        let mut registry = ThemeRegistry::default();

        assert!(registry.apply_theme("cyber", &mut doc));
        assert_eq!(registry.active().name, "cyber");
        assert_eq!(doc.root_var(PRIMARY_VAR), Some("#10b981"));
        assert_eq!(doc.root_var(SECONDARY_VAR), Some("#059669"));
        assert_eq!(
            doc.body_background.as_deref(),
            Some("linear-gradient(135deg, #064e3b 0%, #065f46 100%)")
        );
    }

    #[test]
    fn test_unknown_theme_is_ignored() {
        let mut doc = Document::with_slides(2);
        let mut registry = ThemeRegistry::default();
        registry.apply_theme("corporate", &mut doc);

        assert!(!registry.apply_theme("solarized", &mut doc));
        assert_eq!(registry.active().name, "corporate");
        assert_eq!(doc.root_var(PRIMARY_VAR), Some("#6366f1"));
    }

    #[test]
    fn test_cycle_wraps_around_catalog() {
        let mut doc = Document::with_slides(1);
        let mut registry = ThemeRegistry::default();
        assert_eq!(registry.cycle(&mut doc).name, "cyber");
        assert_eq!(registry.cycle(&mut doc).name, "corporate");
        assert_eq!(registry.cycle(&mut doc).name, "network");
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#3b82f6"),
            Some(Color32::from_rgb(0x3b, 0x82, 0xf6))
        );
        assert_eq!(
            parse_hex_color("#fff"),
            Some(Color32::from_rgb(0xff, 0xff, 0xff))
        );
        assert_eq!(parse_hex_color("blue"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }

    #[test]
    fn test_palette_falls_back_on_malformed_colors() {
        let theme = Theme {
            name: "broken",
            primary: "not-a-color",
            ..THEMES[0]
        };
        let palette = Palette::from_theme(&theme);
        assert_eq!(palette.primary, FALLBACK);
        assert_eq!(palette.secondary, Color32::from_rgb(0x06, 0xb6, 0xd4));
    }
}
