//! CPU reference for the blend operators over premultiplied RGBA8.
//!
//! Renderers are free to implement blending however they like; these functions define the
//! expected result. Non-normal modes follow the W3C separable blend formulas:
//! `co = cs * (1 - ab) + cb * (1 - as) + as * ab * B(Cb, Cs)`.

use crate::foundation::error::{ScenecutError, ScenecutResult};
use crate::foundation::math::{mul_div255_u8, u8_to_unit, unit_to_u8};
use crate::project::properties::BlendMode;

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Composite `src` (scaled by `opacity`) onto `dst` with `mode`.
pub fn blend_pixel(
    mode: BlendMode,
    dst: PremulRgba8,
    src: PremulRgba8,
    opacity: f32,
) -> PremulRgba8 {
    let opacity = if opacity.is_nan() {
        0.0
    } else {
        opacity.clamp(0.0, 1.0)
    };
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }
    match mode {
        BlendMode::Normal => over(dst, src, opacity),
        _ => separable(mode, dst, src, opacity),
    }
}

/// Blend equal-length RGBA8 buffers in place.
pub fn blend_in_place(
    mode: BlendMode,
    dst: &mut [u8],
    src: &[u8],
    opacity: f32,
) -> ScenecutResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ScenecutError::validation(
            "blend_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = blend_pixel(
            mode,
            [d[0], d[1], d[2], d[3]],
            [s[0], s[1], s[2], s[3]],
            opacity,
        );
        d.copy_from_slice(&out);
    }
    Ok(())
}

fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

fn separable(mode: BlendMode, dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let sa = u8_to_unit(src[3]) * opacity;
    let da = u8_to_unit(dst[3]);

    let mut out = [0u8; 4];
    out[3] = unit_to_u8(sa + da * (1.0 - sa));

    for i in 0..3 {
        let sc = u8_to_unit(src[i]) * opacity;
        let dc = u8_to_unit(dst[i]);
        let cs = if sa > 0.0 { (sc / sa).min(1.0) } else { 0.0 };
        let cb = if da > 0.0 { (dc / da).min(1.0) } else { 0.0 };
        let mixed = blend_channel(mode, cb, cs);
        out[i] = unit_to_u8(sc * (1.0 - da) + dc * (1.0 - sa) + sa * da * mixed);
    }
    out
}

/// `B(Cb, Cs)` on straight-alpha channel values in `[0, 1]`.
fn blend_channel(mode: BlendMode, cb: f32, cs: f32) -> f32 {
    match mode {
        BlendMode::Normal => cs,
        BlendMode::Multiply => cb * cs,
        BlendMode::Screen => screen(cb, cs),
        BlendMode::Overlay => hard_light(cs, cb),
        BlendMode::Add => (cb + cs).min(1.0),
        BlendMode::SoftLight => soft_light(cb, cs),
    }
}

fn screen(cb: f32, cs: f32) -> f32 {
    cb + cs - cb * cs
}

// Overlay is hard-light with the layers swapped.
fn hard_light(cb: f32, cs: f32) -> f32 {
    if cs <= 0.5 {
        cb * 2.0 * cs
    } else {
        screen(cb, 2.0 * cs - 1.0)
    }
}

fn soft_light(cb: f32, cs: f32) -> f32 {
    if cs <= 0.5 {
        cb - (1.0 - 2.0 * cs) * cb * (1.0 - cb)
    } else {
        let d = if cb <= 0.25 {
            ((16.0 * cb - 12.0) * cb + 4.0) * cb
        } else {
            cb.sqrt()
        };
        cb + (2.0 * cs - 1.0) * (d - cb)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/blend.rs"]
mod tests;
