// Gamma-correct blending via table lookups instead of powf.
// Visual: the translucent brush cursor and the mask tint mix without dark fringes.

use std::sync::OnceLock;

pub struct GammaLut {
    // sRGB(0..255) -> linear (0..1) as f32
    srgb_to_linear: [f32; 256],
    // linear(0..1) -> sRGB(0..255) via 4096-step quantization
    // (index = (linear * 4095).round())
    linear_to_srgb: [u8; 4096],
}

impl GammaLut {
    /// Build both tables.
    pub fn new() -> Self {
        let mut s2l = [0.0f32; 256];
        for (v, slot) in s2l.iter_mut().enumerate() {
            let c = v as f32 / 255.0;
            *slot = if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) };
        }

        let mut l2s = [0u8; 4096];
        for (i, slot) in l2s.iter_mut().enumerate() {
            let l = (i as f32) / 4095.0;
            let s = if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 };
            *slot = (s * 255.0).round().clamp(0.0, 255.0) as u8;
        }

        Self { srgb_to_linear: s2l, linear_to_srgb: l2s }
    }

    /// Process-wide tables, built on first use.
    pub fn shared() -> &'static GammaLut {
        static LUT: OnceLock<GammaLut> = OnceLock::new();
        LUT.get_or_init(GammaLut::new)
    }

    #[inline]
    pub fn srgb_u8_to_linear(&self, v: u8) -> f32 {
        self.srgb_to_linear[v as usize]
    }

    #[inline]
    pub fn linear_to_srgb_u8(&self, l: f32) -> u8 {
        let idx = (l.clamp(0.0, 1.0) * 4095.0).round() as usize;
        self.linear_to_srgb[idx]
    }

    /// Mix `src` over `dst` (both 0x00RRGGBB) with coverage `alpha` in linear light.
    pub fn blend(&self, dst: u32, src: u32, alpha: f32) -> u32 {
        if alpha <= 0.0 {
            return dst;
        }
        if alpha >= 1.0 {
            return src;
        }
        let inv = 1.0 - alpha;
        let mut out = 0u32;
        for shift in [16u32, 8, 0] {
            let d = self.srgb_u8_to_linear(((dst >> shift) & 0xFF) as u8);
            let s = self.srgb_u8_to_linear(((src >> shift) & 0xFF) as u8);
            let c = self.linear_to_srgb_u8(alpha * s + inv * d) as u32;
            out |= c << shift;
        }
        out
    }
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_round_trip_the_endpoints() {
        let lut = GammaLut::shared();
        assert_eq!(lut.linear_to_srgb_u8(lut.srgb_u8_to_linear(0)), 0);
        assert_eq!(lut.linear_to_srgb_u8(lut.srgb_u8_to_linear(255)), 255);
    }

    #[test]
    fn blend_extremes_and_midpoint() {
        let lut = GammaLut::shared();
        assert_eq!(lut.blend(0x000000, 0xFFFFFF, 0.0), 0x000000);
        assert_eq!(lut.blend(0x000000, 0xFFFFFF, 1.0), 0xFFFFFF);
        // Half coverage in linear light is brighter than the sRGB midpoint
        let mid = lut.blend(0x000000, 0xFFFFFF, 0.5);
        let r = (mid >> 16) & 0xFF;
        assert!(r > 0x80 && r < 0xFF);
        assert_eq!(mid & 0xFF, r);
    }
}
