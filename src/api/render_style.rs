use crate::core::types::Pillar;
use crate::render::Color;

/// Colors used when chart controllers materialize a `RenderFrame`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPalette {
    pub card_background: Color,
    pub accent: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub grid: Color,
    pub crosshair: Color,
    /// Score band colors from the top band (80+) down to the bottom band (<20).
    pub score_bands: [Color; 5],
    /// Pillar colors in `Pillar::ALL` order.
    pub pillars: [Color; 5],
    pub gain: Color,
    pub loss: Color,
}

impl Default for ChartPalette {
    fn default() -> Self {
        let green_bright = Color::from_rgb_u32(0x22c55e);
        let green = Color::from_rgb_u32(0x34d399);
        let red = Color::from_rgb_u32(0xef4444);
        Self {
            card_background: Color::from_rgb_u32(0x171e32),
            accent: Color::from_rgb_u32(0x4b7bff),
            text_primary: Color::from_rgb_u32(0xf0f2f8),
            text_secondary: Color::rgba(1.0, 1.0, 1.0, 0.55),
            text_muted: Color::rgba(1.0, 1.0, 1.0, 0.28),
            grid: Color::rgba(1.0, 1.0, 1.0, 0.05),
            crosshair: Color::rgba(1.0, 1.0, 1.0, 0.15),
            score_bands: [
                green_bright,
                green,
                Color::from_rgb_u32(0xfbbf24),
                Color::from_rgb_u32(0xf97316),
                red,
            ],
            pillars: [
                Color::from_rgb_u32(0xa5b4fc),
                Color::from_rgb_u32(0x34d399),
                Color::from_rgb_u32(0xfcd34d),
                Color::from_rgb_u32(0x38bdf8),
                Color::from_rgb_u32(0xf9a8d4),
            ],
            gain: green,
            loss: red,
        }
    }
}

impl ChartPalette {
    /// Band color for a 0..=100 score: 80+, 60+, 40+, 20+, below 20.
    #[must_use]
    pub fn score_color(&self, score: f64) -> Color {
        let band = if score >= 80.0 {
            0
        } else if score >= 60.0 {
            1
        } else if score >= 40.0 {
            2
        } else if score >= 20.0 {
            3
        } else {
            4
        };
        self.score_bands[band]
    }

    #[must_use]
    pub fn pillar_color(&self, pillar: Pillar) -> Color {
        self.pillars[pillar.index()]
    }

    /// Gain color for non-negative values, loss color otherwise.
    #[must_use]
    pub fn signed_color(&self, value: f64) -> Color {
        if value >= 0.0 { self.gain } else { self.loss }
    }
}
