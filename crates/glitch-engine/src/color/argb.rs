//! Packed ARGB channel access.

/// Alpha bits of a fully opaque pixel.
pub const OPAQUE: u32 = 0xFF00_0000;

#[inline]
pub fn red(argb: u32) -> u8 {
    (argb >> 16) as u8
}

#[inline]
pub fn green(argb: u32) -> u8 {
    (argb >> 8) as u8
}

#[inline]
pub fn blue(argb: u32) -> u8 {
    argb as u8
}

/// Split a packed color into its `[r, g, b]` bytes, discarding alpha.
#[inline]
pub fn rgb_components(argb: u32) -> [u8; 3] {
    [red(argb), green(argb), blue(argb)]
}

/// Pack `[r, g, b]` into an opaque ARGB color.
#[inline]
pub fn compose(rgb: [u8; 3]) -> u32 {
    OPAQUE | (u32::from(rgb[0]) << 16) | (u32::from(rgb[1]) << 8) | u32::from(rgb[2])
}

/// Force the alpha byte of `argb` to 255.
#[inline]
pub fn with_opaque_alpha(argb: u32) -> u32 {
    argb | OPAQUE
}

/// Largest absolute per-channel difference between two colors.
///
/// # Example
///
/// ```
/// use glitch_engine::color::max_color_diff;
///
/// assert_eq!(max_color_diff(0xFF10_2030, 0xFF18_2000), 48);
/// ```
pub fn max_color_diff(a: u32, b: u32) -> u8 {
    let [ar, ag, ab] = rgb_components(a);
    let [br, bg, bb] = rgb_components(b);
    ar.abs_diff(br).max(ag.abs_diff(bg)).max(ab.abs_diff(bb))
}

/// Per-channel mean of two colors, truncated, alpha forced opaque.
pub fn mean_color(a: u32, b: u32) -> u32 {
    let ca = rgb_components(a);
    let cb = rgb_components(b);
    let mut out = [0u8; 3];
    for c in 0..3 {
        out[c] = ((u16::from(ca[c]) + u16::from(cb[c])) / 2) as u8;
    }
    compose(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_and_compose() {
        let argb = 0x7F12_3456;
        assert_eq!(rgb_components(argb), [0x12, 0x34, 0x56]);
        assert_eq!(compose([0x12, 0x34, 0x56]), 0xFF12_3456);
    }

    #[test]
    fn test_max_color_diff_symmetric() {
        let a = 0xFF00_80FF;
        let b = 0xFF40_7000;
        assert_eq!(max_color_diff(a, b), 255);
        assert_eq!(max_color_diff(b, a), 255);
        assert_eq!(max_color_diff(a, a), 0);
    }

    #[test]
    fn test_max_color_diff_ignores_alpha() {
        assert_eq!(max_color_diff(0x0011_2233, 0xFF11_2233), 0);
    }

    #[test]
    fn test_mean_color_truncates() {
        assert_eq!(mean_color(0xFF01_0203, 0xFF02_0304), 0xFF01_0203);
        assert_eq!(mean_color(0x00FF_0000, 0x0000_00FF), 0xFF7F_007F);
    }
}
