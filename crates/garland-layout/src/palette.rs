//! Fixed color palettes, keyed by decoration class

use garland_core::Color;

/// Metallic ornament colors: gold, cardinal red, silver, white, orange-red
pub const ORNAMENT_PALETTE: [u32; 5] = [0xFFD700, 0xC41E3A, 0xC0C0C0, 0xFFFFFF, 0xFF4500];

/// Foliage greens, dark to lime
pub const GREEN_PALETTE: [u32; 5] = [0x006400, 0x228B22, 0x32CD32, 0x2E8B57, 0x008000];

/// Warm fairy-light colors
pub const LIGHT_PALETTE: [u32; 4] = [0xFFFEC4, 0xFFEB3B, 0xFF9800, 0xFFFFFF];

/// One color per ribbon strand: gold and cardinal red
pub const RIBBON_COLORS: [u32; 2] = [0xFFD700, 0xC41E3A];

/// Accent pair the heart cloud blends between (deep pink, light pink)
pub const HEART_ACCENTS: [u32; 2] = [0xFF007F, 0xFFC0CB];

/// The tree-topper star is always gold.
pub fn star_color() -> Color {
    Color::from_hex(0xFFD700)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_decode_to_valid_colors() {
        for hex in ORNAMENT_PALETTE
            .iter()
            .chain(&GREEN_PALETTE)
            .chain(&LIGHT_PALETTE)
            .chain(&RIBBON_COLORS)
            .chain(&HEART_ACCENTS)
        {
            let c = Color::from_hex(*hex);
            assert!(c.r >= 0.0 && c.r <= 1.0);
            assert!(c.g >= 0.0 && c.g <= 1.0);
            assert!(c.b >= 0.0 && c.b <= 1.0);
            assert_eq!(c.a, 1.0);
        }
    }

    #[test]
    fn greens_are_green_dominant() {
        for hex in GREEN_PALETTE {
            let c = Color::from_hex(hex);
            assert!(c.g >= c.r && c.g >= c.b, "{hex:#x} is not green-dominant");
        }
    }
}
