use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Rgb – backend-neutral colour
// ---------------------------------------------------------------------------

/// An 8-bit sRGB colour with alpha, converted by each sink into its own type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);
    pub const RED: Rgb = Rgb::new(0xff, 0x00, 0x00);
    pub const BLUE: Rgb = Rgb::new(0x00, 0x00, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b, a: 0xff }
    }

    pub const fn hex(v: u32) -> Self {
        Rgb::new((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Rgb {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    pub fn alpha_f64(&self) -> f64 {
        self.a as f64 / 255.0
    }

    /// Relative luminance, used to pick readable annotation text.
    pub fn luminance(&self) -> f64 {
        let lin: LinSrgb = self.to_srgb().into_linear();
        0.2126 * lin.red as f64 + 0.7152 * lin.green as f64 + 0.0722 * lin.blue as f64
    }

    fn to_srgb(self) -> Srgb {
        Srgb::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }

    fn from_srgb(rgb: Srgb) -> Self {
        Rgb::new(
            (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
            (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
            (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
        )
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Rgb::from_srgb(rgb)
        })
        .collect()
}

/// The ten-colour qualitative cycle used for overlaid series.
pub const DEEP: [Rgb; 10] = [
    Rgb::hex(0x4c72b0),
    Rgb::hex(0xdd8452),
    Rgb::hex(0x55a868),
    Rgb::hex(0xc44e52),
    Rgb::hex(0x8172b3),
    Rgb::hex(0x937860),
    Rgb::hex(0xda8bc3),
    Rgb::hex(0x8c8c8c),
    Rgb::hex(0xccb974),
    Rgb::hex(0x64b5cd),
];

/// A qualitative cycle of at least `n` colours: the fixed cycle when it is
/// long enough, evenly spaced hues otherwise.
pub fn qualitative(base: &[Rgb], n: usize) -> Vec<Rgb> {
    if n <= base.len() {
        base[..n].to_vec()
    } else {
        generate_palette(n)
    }
}

// ---------------------------------------------------------------------------
// Sequential colour map: value in [0, 1] → Rgb
// ---------------------------------------------------------------------------

/// Piecewise-linear colour map interpolated in linear RGB.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    stops: Vec<Rgb>,
}

impl ColorMap {
    pub fn new(stops: Vec<Rgb>) -> Self {
        ColorMap { stops }
    }

    /// Dark purple through red to pale cream.
    pub fn rocket() -> Self {
        ColorMap::new(vec![
            Rgb::hex(0x03051a),
            Rgb::hex(0x4c1d4b),
            Rgb::hex(0xa11a5b),
            Rgb::hex(0xe83f3f),
            Rgb::hex(0xf69c73),
            Rgb::hex(0xfaebdd),
        ])
    }

    /// Light to dark blue, used for filled densities.
    pub fn blues() -> Self {
        ColorMap::new(vec![
            Rgb::hex(0xdeebf7),
            Rgb::hex(0x9ecae1),
            Rgb::hex(0x4292c6),
            Rgb::hex(0x08519c),
        ])
    }

    /// Colour for `t` in `[0, 1]`; out-of-range values are clamped.
    pub fn at(&self, t: f64) -> Rgb {
        match self.stops.len() {
            0 => Rgb::BLACK,
            1 => self.stops[0],
            n => {
                let pos = t.clamp(0.0, 1.0) * (n - 1) as f64;
                let i = (pos.floor() as usize).min(n - 2);
                let frac = (pos - i as f64) as f32;
                let a: LinSrgb = self.stops[i].to_srgb().into_linear();
                let b: LinSrgb = self.stops[i + 1].to_srgb().into_linear();
                Rgb::from_srgb(Srgb::from_linear(a.mix(b, frac)))
            }
        }
    }

    /// Map `value` within `[lo, hi]`.
    pub fn map(&self, value: f64, lo: f64, hi: f64) -> Rgb {
        if hi > lo {
            self.at((value - lo) / (hi - lo))
        } else {
            self.at(0.5)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_map_endpoints() {
        let cmap = ColorMap::rocket();
        assert_eq!(cmap.at(0.0), Rgb::hex(0x03051a));
        assert_eq!(cmap.at(1.0), Rgb::hex(0xfaebdd));
        assert_eq!(cmap.at(7.0), cmap.at(1.0));
        assert!(cmap.at(0.2).luminance() < cmap.at(0.9).luminance());
    }

    #[test]
    fn test_qualitative_falls_back_to_generated() {
        assert_eq!(qualitative(&DEEP, 3), DEEP[..3].to_vec());
        assert_eq!(qualitative(&DEEP, 12).len(), 12);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(Rgb::RED.with_alpha(0.5).a, 128);
        assert_eq!(Rgb::hex(0x4c72b0), Rgb::new(0x4c, 0x72, 0xb0));
    }
}
