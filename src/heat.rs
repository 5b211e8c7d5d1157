//! Heat-map colouring of proximity deviations
//!
//! A value is compared with its baseline average and normalised to `[-1, 1]`
//! by the larger distance from the average to either end of `[0, 1]`.
//! Below-average values fade from a cool hue into white, above-average values
//! from white into a warm hue. A value equal to its average is pure white.

use serde::Serialize;

/// Default hue for below-average values (blue)
pub const COOL_HUE: f64 = 210.0;

/// Default hue for above-average values (orange)
pub const WARM_HUE: f64 = 30.0;

/// An 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    /// CSS `rgb(r,g,b)` notation
    pub fn to_css(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }

    /// ANSI 24-bit background escape sequence
    pub fn ansi_background(&self) -> String {
        format!("\x1b[48;2;{};{};{}m", self.r, self.g, self.b)
    }
}

/// A colour in hue/saturation/brightness form
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatColor {
    /// Hue in degrees
    pub hue: f64,
    /// Saturation in `[0, 1]`; 0 is white at full brightness
    pub saturation: f64,
    /// Brightness in `[0, 1]`
    pub brightness: f64,
}

impl HeatColor {
    pub fn is_white(&self) -> bool {
        self.saturation == 0.0 && self.brightness == 1.0
    }

    /// Convert to RGB, truncating each channel
    pub fn to_rgb(&self) -> Rgb {
        let s = self.saturation.clamp(0.0, 1.0);
        let v = self.brightness.clamp(0.0, 1.0);

        let sector = self.hue.rem_euclid(360.0) / 60.0;
        let i = sector.floor();
        let f = sector - i;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match i as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        Rgb {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }
}

fn channel(value: f64) -> u8 {
    (value * 255.0) as u8
}

/// Maps a value and its baseline average to a heat colour
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatMapper {
    cool_hue: f64,
    warm_hue: f64,
}

impl Default for HeatMapper {
    fn default() -> Self {
        Self {
            cool_hue: COOL_HUE,
            warm_hue: WARM_HUE,
        }
    }
}

impl HeatMapper {
    pub fn new(cool_hue: f64, warm_hue: f64) -> Self {
        Self { cool_hue, warm_hue }
    }

    pub fn cool_hue(&self) -> f64 {
        self.cool_hue
    }

    pub fn warm_hue(&self) -> f64 {
        self.warm_hue
    }

    /// Deviation of `value` from `average`, clamped to `[-1, 1]`
    ///
    /// The divisor `max(average, 1 - average)` is at least 0.5 for any
    /// average in `[0, 1]`.
    pub fn normalize(value: f64, average: f64) -> f64 {
        let max_dist = average.max(1.0 - average);
        ((value - average) / max_dist).clamp(-1.0, 1.0)
    }

    pub fn color_for(&self, value: f64, average: f64) -> HeatColor {
        let norm = Self::normalize(value, average);
        if norm < 0.0 {
            HeatColor {
                hue: self.cool_hue,
                saturation: 1.0 - (norm + 1.0),
                brightness: 1.0,
            }
        } else {
            HeatColor {
                hue: self.warm_hue,
                saturation: norm,
                brightness: 1.0,
            }
        }
    }

    /// Shorthand for `color_for(..).to_rgb()`
    pub fn rgb_for(&self, value: f64, average: f64) -> Rgb {
        self.color_for(value, average).to_rgb()
    }
}
