use serde::{Deserialize, Serialize};
use std::fmt;

/// Degrees of hue advanced per unit of animation time.
pub const HUE_RATE: f32 = 80.0;
/// Hue offset between adjacent rings, in degrees.
pub const RING_HUE_STEP: f32 = 120.0;
/// Saturation used for all ring colors.
pub const RING_SATURATION: f32 = 0.75;
/// Value (brightness) used for all ring colors.
pub const RING_VALUE: f32 = 1.0;

/// 24-bit RGB color packed as R<<16 | G<<8 | B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackedRgb(pub u32);

impl PackedRgb {
    pub const fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub const fn b(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Channels as floats in [0, 1], the form shaders consume.
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r() as f32 / 255.0,
            self.g() as f32 / 255.0,
            self.b() as f32 / 255.0,
        ]
    }
}

impl fmt::Display for PackedRgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Convert hue (degrees), saturation and value to a packed RGB color using the
/// six-sector piecewise-linear formula. Channels are rounded to the nearest
/// integer in [0, 255].
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> PackedRgb {
    let h = hue.rem_euclid(360.0);
    let c = value * saturation;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = value - c;
    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };
    PackedRgb::from_channels(
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}

/// Color of ring `ring_index` at animation time `t`.
///
/// Hue = (t * 80 + ring_index * 120) mod 360, at fixed saturation 0.75 and
/// value 1.0. Periodic in `t` with period 4.5; adjacent rings sit 120 degrees
/// apart on the hue wheel at any instant.
pub fn ring_color(t: f32, ring_index: usize) -> PackedRgb {
    let hue = (t * HUE_RATE + ring_index as f32 * RING_HUE_STEP).rem_euclid(360.0);
    hsv_to_rgb(hue, RING_SATURATION, RING_VALUE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_roundtrip() {
        let c = PackedRgb::from_channels(0x12, 0x34, 0x56);
        assert_eq!(c.0, 0x123456);
        assert_eq!((c.r(), c.g(), c.b()), (0x12, 0x34, 0x56));
    }

    #[test]
    fn primary_hues_match_formula() {
        // s=0.75, v=1.0: c=0.75, m=0.25, so the off channels land on
        // round(0.25*255) = 64 and the peak channel on 255.
        assert_eq!(hsv_to_rgb(0.0, 0.75, 1.0), PackedRgb::from_channels(255, 64, 64));
        assert_eq!(hsv_to_rgb(120.0, 0.75, 1.0), PackedRgb::from_channels(64, 255, 64));
        assert_eq!(hsv_to_rgb(240.0, 0.75, 1.0), PackedRgb::from_channels(64, 64, 255));
    }

    #[test]
    fn hsv_agrees_with_reference_formula() {
        for step in 0..72 {
            let hue = step as f32 * 5.0;
            let c = hsv_to_rgb(hue, 0.75, 1.0);
            // Recompute with an independent phrasing of the same formula.
            let cv = 0.75;
            let x = cv * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
            let m = 1.0 - cv;
            let sector = (hue / 60.0) as usize;
            let (r, g, b) = match sector {
                0 => (cv, x, 0.0),
                1 => (x, cv, 0.0),
                2 => (0.0, cv, x),
                3 => (0.0, x, cv),
                4 => (x, 0.0, cv),
                _ => (cv, 0.0, x),
            };
            assert_eq!(c.r(), ((r + m) * 255.0).round() as u8, "hue {hue}");
            assert_eq!(c.g(), ((g + m) * 255.0).round() as u8, "hue {hue}");
            assert_eq!(c.b(), ((b + m) * 255.0).round() as u8, "hue {hue}");
        }
    }

    #[test]
    fn ring_color_is_periodic() {
        // Period is 360 / 80 = 4.5 time units. The sample points are chosen so
        // t * 80 is exact in f32 and no channel sits on a rounding boundary.
        for t in [0.0_f32, 0.5, 1.0, 2.25] {
            for ring in 0..3 {
                assert_eq!(ring_color(t, ring), ring_color(t + 4.5, ring));
            }
        }
    }

    #[test]
    fn rings_offset_by_120_degrees() {
        // 120 degrees of hue is 1.5 time units, so ring i+1 now shows the
        // color ring i will show 1.5 units later.
        for t in [0.0_f32, 0.5, 2.25] {
            for ring in 0..2 {
                assert_eq!(ring_color(t, ring + 1), ring_color(t + 1.5, ring));
            }
        }
    }

    #[test]
    fn ring_color_deterministic() {
        assert_eq!(ring_color(1.23, 1), ring_color(1.23, 1));
    }
}
