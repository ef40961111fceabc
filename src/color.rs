//! RGBW color type and the named color table

/// A single RGBW pixel value. Each channel is an 8-bit intensity; the `w`
/// channel drives the dedicated white LED on SK6812-style strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub w: u8,
}

impl Color {
    /// All channels off.
    pub const BLACK: Color = Color::rgbw(0, 0, 0, 0);

    /// Create a color from explicit channel values.
    pub const fn rgbw(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self { r, g, b, w }
    }

    /// Look up a common color by name.
    ///
    /// Recognized names: `red`, `green`, `blue`, `white`, `yellow`, `cyan`,
    /// `magenta`, `orange`, `purple`, `black`. Unrecognized names fall back
    /// to black.
    pub fn named(name: &str) -> Color {
        match name {
            "red" => Color::rgbw(255, 0, 0, 0),
            "green" => Color::rgbw(0, 255, 0, 0),
            "blue" => Color::rgbw(0, 0, 255, 0),
            "white" => Color::rgbw(255, 255, 255, 0),
            "yellow" => Color::rgbw(255, 255, 0, 0),
            "cyan" => Color::rgbw(0, 255, 255, 0),
            "magenta" => Color::rgbw(255, 0, 255, 0),
            "orange" => Color::rgbw(255, 132, 0, 0),
            "purple" => Color::rgbw(128, 0, 128, 0),
            _ => Color::BLACK,
        }
    }
}
