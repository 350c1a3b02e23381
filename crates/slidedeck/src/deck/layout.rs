use super::document::Document;

/// Gap between the bottom of the banner and the navigation controls.
pub const NAV_GAP: f32 = 12.0;
/// Distance of the navigation controls from the right edge (1rem).
pub const NAV_RIGHT: f32 = 16.0;

/// Place the navigation controls just below the banner.
///
/// Skipped unless both the banner (with measured bounds) and the
/// navigation overlay exist.
pub fn position_navigation(document: &mut Document) {
    let Some(bounds) = document.banner.as_ref().and_then(|b| b.bounds) else {
        return;
    };
    let Some(nav) = document.navigation.as_mut() else {
        return;
    };
    nav.top = bounds.bottom() + NAV_GAP;
    nav.right = NAV_RIGHT;
}
