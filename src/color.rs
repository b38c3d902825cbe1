use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            to_color32(Hsl::new(hue, 0.75, 0.55))
        })
        .collect()
}

/// Colour of the `index`-th of `n` categories.
pub fn category_color(index: usize, n: usize) -> Color32 {
    generate_palette(n)
        .get(index)
        .copied()
        .unwrap_or(Color32::GRAY)
}

// ---------------------------------------------------------------------------
// Continuous scale: value in [0, 1] → Color32
// ---------------------------------------------------------------------------

/// Blue-to-yellow scale for numeric colouring. `t` is clamped to `[0, 1]`.
pub fn gradient(t: f64) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let low = Hsl::new(240.0, 0.65, 0.35);
    let high = Hsl::new(55.0, 0.9, 0.55);
    to_color32(low.mix(high, t as f32))
}
