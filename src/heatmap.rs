use ratatui::style::Color;

/// Floor applied to the shared normalization range so a comparison where every
/// cell is zero never divides by zero.
pub const MAX_HEAT_EPSILON: f64 = 1e-6;

const BLUE_RGB: (u8, u8, u8) = (59, 130, 246);
const RED_RGB: (u8, u8, u8) = (239, 68, 68);

/// One of the two fixed color identities distinguishing player A from
/// player B across every visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Blue,
    Red,
}

impl Accent {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Accent::Blue => BLUE_RGB,
            Accent::Red => RED_RGB,
        }
    }

    pub fn color(self) -> Color {
        let (r, g, b) = self.rgb();
        Color::Rgb(r, g, b)
    }
}

/// Clamps an intensity to [0, 1]. Missing or non-numeric input comes through
/// as NaN and is treated as zero rather than an error.
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Visual descriptor for a single heat zone. Every field is a monotonically
/// non-decreasing function of the clamped intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneStyle {
    pub width_pct: f64,
    pub core_opacity: f64,
    pub fade_opacity: f64,
    pub blur_px: f64,
    pub glow_radius: f64,
    pub glow_opacity: f64,
    pub accent: Accent,
}

pub fn zone_style(value: f64, accent: Accent) -> ZoneStyle {
    let n = clamp01(value);
    ZoneStyle {
        width_pct: 40.0 + n * 40.0,
        core_opacity: 0.15 + n * 0.55,
        fade_opacity: 0.04 + n * 0.16,
        blur_px: 12.0 + n * 18.0,
        glow_radius: 22.0 + n * 36.0,
        glow_opacity: 0.12 + n * 0.25,
        accent,
    }
}

/// Renders a clamped intensity as a rounded percentage string, "0%" to "100%".
pub fn pct(value: f64) -> String {
    format!("{}%", (clamp01(value) * 100.0).round() as i64)
}

/// Shared normalization range: the maximum cell across both players'
/// intensity matrices, floored at `MAX_HEAT_EPSILON`.
pub fn max_heat(matrix_a: &[Vec<f64>], matrix_b: &[Vec<f64>]) -> f64 {
    let max = matrix_a
        .iter()
        .chain(matrix_b.iter())
        .flat_map(|row| row.iter().copied())
        .filter(|cell| cell.is_finite())
        .fold(0.0_f64, f64::max);
    max.max(MAX_HEAT_EPSILON)
}

/// Background/border pair for one heatmap cell, normalized by the shared
/// range and mapped linearly onto opacity 0.15..=0.90.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub norm: f64,
    pub opacity: f64,
    pub background: Color,
    pub border: Color,
}

pub fn cell_style(value: f64, max_heat: f64, accent: Accent) -> CellStyle {
    let norm = clamp01(value / max_heat);
    let opacity = 0.15 + norm * 0.75;
    CellStyle {
        norm,
        opacity,
        background: scale_color(accent, opacity),
        border: accent.color(),
    }
}

/// An accent at the given opacity over the dark terminal background: the
/// channels scaled down, since the terminal has no alpha compositing.
pub fn scale_color(accent: Accent, opacity: f64) -> Color {
    let o = clamp01(opacity);
    let (r, g, b) = accent.rgb();
    Color::Rgb(
        (f64::from(r) * o).round() as u8,
        (f64::from(g) * o).round() as u8,
        (f64::from(b) * o).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(1.5), 1.0);
        assert_eq!(clamp01(f64::NAN), 0.0);
        assert_eq!(clamp01(0.37), 0.37);
    }

    #[test]
    fn zone_style_ranges() {
        let lo = zone_style(0.0, Accent::Blue);
        let hi = zone_style(1.0, Accent::Blue);
        assert_eq!(lo.width_pct, 40.0);
        assert_eq!(hi.width_pct, 80.0);
        assert_eq!(lo.core_opacity, 0.15);
        assert!((hi.core_opacity - 0.70).abs() < 1e-12);
        assert_eq!(lo.blur_px, 12.0);
        assert_eq!(hi.blur_px, 30.0);
        assert_eq!(lo.glow_radius, 22.0);
        assert_eq!(hi.glow_radius, 58.0);
    }

    #[test]
    fn max_heat_floors_at_epsilon() {
        let zero = vec![vec![0.0, 0.0]];
        assert_eq!(max_heat(&zero, &zero), MAX_HEAT_EPSILON);
    }
}
